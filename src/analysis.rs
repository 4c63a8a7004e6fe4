//! Food analysis
//!
//! Combines normalization and classification into the view of a single
//! search result.

use serde::Serialize;

use crate::classify::{classify, pros_and_cons, ClassificationResult, DataSource, ProsAndCons};
use crate::models::{FoodRecord, Nutrition, RawFoodItem};
use crate::nutrition::{compute_protein_density, format_for_display};

/// Display strings for the main nutrients
#[derive(Debug, Clone, Serialize)]
pub struct NutritionDisplay {
    pub calories: String,
    pub protein: String,
    pub carbs: String,
    pub fat: String,
    pub fiber: String,
    pub sugar: String,
    pub saturated_fat: String,
    pub sodium: String,
    pub cholesterol: String,
}

impl From<&Nutrition> for NutritionDisplay {
    fn from(n: &Nutrition) -> Self {
        Self {
            calories: format_for_display(Some(n.calories)),
            protein: format_for_display(Some(n.protein)),
            carbs: format_for_display(Some(n.carbs)),
            fat: format_for_display(Some(n.fat)),
            fiber: format_for_display(Some(n.fiber)),
            sugar: format_for_display(Some(n.sugar)),
            saturated_fat: format_for_display(Some(n.saturated_fat)),
            sodium: format_for_display(Some(n.sodium)),
            cholesterol: format_for_display(Some(n.cholesterol)),
        }
    }
}

/// Everything shown for one food result
#[derive(Debug, Clone, Serialize)]
pub struct FoodAnalysis {
    pub name: String,
    pub source: String,
    pub source_badge: &'static str,
    pub serving_description: String,
    pub grams: f64,
    pub nutrition: Nutrition,
    pub display: NutritionDisplay,
    pub protein_density: f64,
    pub classification: ClassificationResult,
    #[serde(flatten)]
    pub pros_and_cons: ProsAndCons,
}

/// Analyze a normalized record
pub fn analyze_record(record: &FoodRecord) -> FoodAnalysis {
    let nutrition = record.per_serving();

    FoodAnalysis {
        name: record.display_name.clone(),
        source: record.source.clone(),
        source_badge: DataSource::from_source(&record.source).badge(),
        serving_description: record.serving_description.clone(),
        grams: record.effective_grams(),
        display: NutritionDisplay::from(&nutrition),
        protein_density: compute_protein_density(nutrition.protein, nutrition.calories),
        classification: classify(record),
        pros_and_cons: pros_and_cons(&nutrition),
        nutrition,
    }
}

/// Analyze a backend item for the quantity mentioned in the search query
pub fn analyze(raw: &RawFoodItem, query: &str) -> FoodAnalysis {
    analyze_record(&FoodRecord::from_query(raw, query))
}
