//! Data models
//!
//! Nutrition records, search results, and stored entities.

mod analysis_count;
mod food_record;
mod meal_log;
mod nutrition;

pub use analysis_count::AnalysisCount;
pub use food_record::{FoodRecord, RawFoodItem};
pub use meal_log::{
    meal_totals, MealLog, MealLogCreate, MealLogItem, MealLogItemCreate, MealType,
};
pub use nutrition::Nutrition;
