//! Food classification module
//!
//! Category rules, health indicators, and product scoring.

pub mod category;
pub mod health;
pub mod score;
pub mod source;

use std::collections::BTreeSet;

use serde::Serialize;

use crate::models::FoodRecord;

pub use category::{categorize, CategorySubject, FoodCategory, CATEGORY_RULES};
pub use health::{health_indicators, pros_and_cons, HealthIndicator, ProsAndCons};
pub use score::{score_product, HealthScore, Product, ProductNutriments, ScoreColor};
pub use source::DataSource;

/// Category and health flags derived from a food record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationResult {
    pub category: FoodCategory,
    pub label: &'static str,
    pub icon: &'static str,
    pub health_indicators: BTreeSet<HealthIndicator>,
}

/// Classify a food record using its per-serving nutrition
pub fn classify(record: &FoodRecord) -> ClassificationResult {
    let subject = CategorySubject::new(
        &record.display_name,
        &record.source,
        record.is_raw,
        record.is_cooked,
    );
    let category = categorize(&subject);
    tracing::debug!(name = %record.display_name, category = category.as_str(), "classified food");

    ClassificationResult {
        category,
        label: category.label(),
        icon: category.icon(),
        health_indicators: health_indicators(&record.per_serving()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawFoodItem;
    use serde_json::json;

    fn record(value: serde_json::Value, query: &str) -> FoodRecord {
        let raw: RawFoodItem = serde_json::from_value(value).unwrap();
        FoodRecord::from_query(&raw, query)
    }

    #[test]
    fn test_classify_grilled_chicken_breast() {
        let r = record(json!({"name": "Grilled Chicken Breast", "protein_g": 31}), "chicken");
        let result = classify(&r);
        assert_eq!(result.category, FoodCategory::Breast);
        assert_eq!(result.label, "Chicken Breast");
        assert!(result.health_indicators.contains(&HealthIndicator::HighProtein));
    }

    #[test]
    fn test_classify_uses_rescaled_values() {
        // 31g protein per 100g, but only 40g requested -> 12.4g
        let r = record(json!({"name": "Chicken Breast", "protein_g": 31}), "40g chicken breast");
        assert!(classify(&r).health_indicators.is_empty());
    }

    #[test]
    fn test_classify_uncategorized_dish() {
        let r = record(json!({"name": "Chole Bhature", "source": "CalorieNinjas"}), "chole bhature");
        assert_eq!(classify(&r).category, FoodCategory::Generic);
    }

    #[test]
    fn test_classify_explicit_flags() {
        let r = record(json!({"name": "Dal Tadka", "is_cooked": true}), "dal");
        assert_eq!(classify(&r).category, FoodCategory::Cooked);
    }
}
