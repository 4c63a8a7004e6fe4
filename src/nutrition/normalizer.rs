//! Nutrition normalization
//!
//! Turns untrusted upstream nutrition payloads into canonical records and
//! projects them onto a requested gram quantity.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::values::parse_value;
use crate::models::Nutrition;

/// Serving size assumed when the source omits one or reports nonsense
pub const DEFAULT_SERVING_SIZE_G: f64 = 100.0;

/// Nutrition fields as delivered by the food backend
///
/// Every field may be missing, `null`, a number, a numeric string, or "N/A".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawNutritionRecord {
    #[serde(default)]
    pub calories: Option<Value>,
    #[serde(default)]
    pub protein_g: Option<Value>,
    #[serde(default)]
    pub carbohydrates_total_g: Option<Value>,
    #[serde(default)]
    pub carbs_g: Option<Value>,
    #[serde(default)]
    pub fat_total_g: Option<Value>,
    #[serde(default)]
    pub fat_g: Option<Value>,
    #[serde(default)]
    pub fiber_g: Option<Value>,
    #[serde(default)]
    pub sugar_g: Option<Value>,
    #[serde(default)]
    pub fat_saturated_g: Option<Value>,
    #[serde(default)]
    pub sodium_mg: Option<Value>,
    #[serde(default)]
    pub cholesterol_mg: Option<Value>,
}

/// Serving the nutrition values refer to, and the quantity the user asked for
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ServingContext {
    pub serving_size_grams: f64,
    pub requested_grams: Option<f64>,
}

impl Default for ServingContext {
    fn default() -> Self {
        Self {
            serving_size_grams: DEFAULT_SERVING_SIZE_G,
            requested_grams: None,
        }
    }
}

impl ServingContext {
    /// Build a context, replacing an unusable serving size with 100g and
    /// dropping a negative or non-finite request
    pub fn new(serving_size_grams: f64, requested_grams: Option<f64>) -> Self {
        Self {
            serving_size_grams: sanitize_serving_size(serving_size_grams),
            requested_grams: requested_grams.filter(|g| g.is_finite() && *g >= 0.0),
        }
    }

    /// Multiplier from the source serving to the requested quantity
    pub fn multiplier(&self) -> f64 {
        match self.requested_grams {
            Some(requested) => requested / sanitize_serving_size(self.serving_size_grams),
            None => 1.0,
        }
    }
}

/// Serving sizes must be positive and finite; anything else becomes 100g
pub fn sanitize_serving_size(serving_size_grams: f64) -> f64 {
    if serving_size_grams.is_finite() && serving_size_grams > 0.0 {
        serving_size_grams
    } else {
        DEFAULT_SERVING_SIZE_G
    }
}

/// Coerce a raw record into canonical nutrition without rescaling
pub fn canonicalize(raw: &RawNutritionRecord) -> Nutrition {
    Nutrition {
        calories: parse_value(raw.calories.as_ref()),
        protein: parse_value(raw.protein_g.as_ref()),
        carbs: preferred(raw.carbs_g.as_ref(), raw.carbohydrates_total_g.as_ref()),
        fat: preferred(raw.fat_g.as_ref(), raw.fat_total_g.as_ref()),
        fiber: parse_value(raw.fiber_g.as_ref()),
        sugar: parse_value(raw.sugar_g.as_ref()),
        saturated_fat: parse_value(raw.fat_saturated_g.as_ref()),
        sodium: parse_value(raw.sodium_mg.as_ref()),
        cholesterol: parse_value(raw.cholesterol_mg.as_ref()),
    }
}

// Short field names win when they carry a non-zero value
fn preferred(short: Option<&Value>, long: Option<&Value>) -> f64 {
    let value = parse_value(short);
    if value > 0.0 {
        value
    } else {
        parse_value(long)
    }
}

/// Rescale nutrition from its source serving to the requested quantity
///
/// With no requested quantity the input is returned unchanged.
pub fn rescale(nutrition: &Nutrition, serving: &ServingContext) -> Nutrition {
    if serving.requested_grams.is_none() {
        return nutrition.clone();
    }
    nutrition.scale(serving.multiplier()).sanitized()
}

/// Canonicalize a raw record and rescale it in one step
pub fn normalize(raw: &RawNutritionRecord, serving: &ServingContext) -> Nutrition {
    rescale(&canonicalize(raw), serving)
}
