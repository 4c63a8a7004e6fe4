//! Nutrition normalization module
//!
//! Value parsing, serving rescaling, and quantity handling.

pub mod normalizer;
pub mod quantity;
pub mod values;

pub use normalizer::{
    canonicalize, normalize, rescale, sanitize_serving_size, RawNutritionRecord, ServingContext,
    DEFAULT_SERVING_SIZE_G,
};
pub use quantity::{extract_gram_quantity, meal_multiplier, MealUnit};
pub use values::{compute_protein_density, format_for_display, parse_str, parse_value};
