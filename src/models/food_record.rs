//! Food record model
//!
//! A single food result from the search backend, before and after
//! normalization.

use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::Nutrition;
use crate::nutrition::{canonicalize, extract_gram_quantity, rescale, RawNutritionRecord, ServingContext};

fn default_name() -> String { "Unknown Food".to_string() }
fn default_source() -> String { "Unknown Source".to_string() }
fn default_serving_description() -> String { "per 100g".to_string() }

/// Text field that falls back to `default` when null, blank, or missing
///
/// Numbers and booleans are kept as their text form; arrays and objects are
/// rejected.
fn text_or<'de, D>(deserializer: D, default: fn() -> String) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) if !s.trim().is_empty() => Ok(s),
        Value::String(_) | Value::Null => Ok(default()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(de::Error::custom(format!("expected text, got {}", other))),
    }
}

fn name_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    text_or(deserializer, default_name)
}

fn source_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    text_or(deserializer, default_source)
}

fn serving_description_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    text_or(deserializer, default_serving_description)
}

/// Only real booleans count; anything else is unknown
fn bool_or_none<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<bool>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(b) => Some(b),
        _ => None,
    })
}

/// A food item exactly as the backend returned it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawFoodItem {
    #[serde(default = "default_name", deserialize_with = "name_or_default")]
    pub name: String,
    #[serde(default = "default_source", deserialize_with = "source_or_default")]
    pub source: String,
    #[serde(default)]
    pub serving_size_g: Option<Value>,
    #[serde(default = "default_serving_description", deserialize_with = "serving_description_or_default")]
    pub serving_description: String,
    #[serde(default, deserialize_with = "bool_or_none")]
    pub is_raw: Option<bool>,
    #[serde(default, deserialize_with = "bool_or_none")]
    pub is_cooked: Option<bool>,
    #[serde(flatten)]
    pub nutrition: RawNutritionRecord,
}

impl RawFoodItem {
    /// A named item with no nutrition data
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            source: default_source(),
            serving_size_g: None,
            serving_description: default_serving_description(),
            is_raw: None,
            is_cooked: None,
            nutrition: RawNutritionRecord::default(),
        }
    }
}

/// A normalized food record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodRecord {
    pub display_name: String,
    pub source: String,
    pub serving_description: String,
    pub is_raw: bool,
    pub is_cooked: bool,
    /// Nutrition per source serving
    pub nutrition: Nutrition,
    pub serving: ServingContext,
}

impl FoodRecord {
    /// Build a record from a backend item, optionally for an explicit gram quantity
    pub fn from_raw(raw: &RawFoodItem, requested_grams: Option<f64>) -> Self {
        let serving_size = crate::nutrition::parse_value(raw.serving_size_g.as_ref());
        let display_name = if raw.name.trim().is_empty() { default_name() } else { raw.name.clone() };

        Self {
            display_name,
            source: raw.source.clone(),
            serving_description: raw.serving_description.clone(),
            is_raw: raw.is_raw.unwrap_or(false),
            is_cooked: raw.is_cooked.unwrap_or(false),
            nutrition: canonicalize(&raw.nutrition),
            serving: ServingContext::new(serving_size, requested_grams),
        }
    }

    /// Build a record using the gram quantity mentioned in a search query
    pub fn from_query(raw: &RawFoodItem, query: &str) -> Self {
        Self::from_raw(raw, extract_gram_quantity(query).map(|g| g as f64))
    }

    /// Nutrition for the requested quantity (or the source serving)
    pub fn per_serving(&self) -> Nutrition {
        rescale(&self.nutrition, &self.serving)
    }

    /// Grams the per-serving values refer to
    pub fn effective_grams(&self) -> f64 {
        self.serving.requested_grams.unwrap_or(self.serving.serving_size_grams)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw_item() -> RawFoodItem {
        serde_json::from_value(json!({
            "name": "Chicken Breast, raw",
            "source": "IFCT 2017",
            "serving_size_g": "100",
            "calories": 120,
            "protein_g": "22.5",
            "fat_total_g": 2.6
        }))
        .unwrap()
    }

    #[test]
    fn test_defaults_for_missing_fields() {
        let raw: RawFoodItem = serde_json::from_value(json!({})).unwrap();
        let record = FoodRecord::from_raw(&raw, None);
        assert_eq!(record.display_name, "Unknown Food");
        assert_eq!(record.source, "Unknown Source");
        assert_eq!(record.serving_description, "per 100g");
        assert_eq!(record.serving.serving_size_grams, 100.0);
        assert_eq!(record.nutrition, Nutrition::zero());
    }

    #[test]
    fn test_defaults_for_null_and_blank_fields() {
        let raw: RawFoodItem = serde_json::from_value(json!({
            "name": null,
            "source": "  ",
            "serving_description": null,
            "is_raw": "yes",
            "is_cooked": null
        }))
        .unwrap();
        assert_eq!(raw.name, "Unknown Food");
        assert_eq!(raw.source, "Unknown Source");
        assert_eq!(raw.serving_description, "per 100g");
        assert_eq!(raw.is_raw, None);
        assert_eq!(raw.is_cooked, None);
    }

    #[test]
    fn test_scalar_names_kept_as_text() {
        let raw: RawFoodItem = serde_json::from_value(json!({"name": 7, "is_cooked": true})).unwrap();
        assert_eq!(raw.name, "7");
        assert_eq!(raw.is_cooked, Some(true));
        assert!(serde_json::from_value::<RawFoodItem>(json!({"name": ["x"]})).is_err());
    }

    #[test]
    fn test_from_query_rescales() {
        let record = FoodRecord::from_query(&raw_item(), "200g chicken breast");
        assert_eq!(record.serving.requested_grams, Some(200.0));
        assert_eq!(record.effective_grams(), 200.0);
        let n = record.per_serving();
        assert_eq!(n.calories, 240.0);
        assert_eq!(n.protein, 45.0);
    }

    #[test]
    fn test_from_query_without_grams() {
        let record = FoodRecord::from_query(&raw_item(), "chicken breast");
        assert_eq!(record.per_serving(), record.nutrition);
        assert_eq!(record.effective_grams(), 100.0);
    }
}
