//! Quantity extraction and meal portion multipliers
//!
//! Reads gram amounts out of free-form search text and turns logged meal
//! quantities into nutrition multipliers.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

// The leading group keeps "1.5g" from matching as 5g; the trailing \b keeps
// "2 garlic" from matching as 2g. "mg" never matches because the digits must
// be followed directly by the g.
static GRAM_QUANTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:^|[^\d.])(\d+)\s*g(?:rams?)?\b").expect("valid regex")
});

/// Extract the first gram quantity from a search query
///
/// Examples:
/// - "200g chicken" -> Some(200)
/// - "chicken 50 g" -> Some(50)
/// - "5mg salt" -> None
/// - "chicken" -> None
pub fn extract_gram_quantity(query: &str) -> Option<u64> {
    GRAM_QUANTITY
        .captures(query)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<u64>().ok())
}

/// Unit a meal item quantity is logged in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MealUnit {
    /// Grams of the food
    #[default]
    G,
    /// Pieces, scaled by the source serving weight relative to 100g
    Pcs,
    /// Any other unit; nutrition stays at one source serving
    Other,
}

impl MealUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            MealUnit::G => "g",
            MealUnit::Pcs => "pcs",
            MealUnit::Other => "other",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "g" | "gram" | "grams" => MealUnit::G,
            "pcs" | "pc" | "piece" | "pieces" => MealUnit::Pcs,
            _ => MealUnit::Other,
        }
    }
}

/// Multiplier applied to per-serving nutrition for a logged quantity
///
/// - grams: `quantity / base_serving_g`
/// - pieces: `quantity * base_serving_g / 100`
/// - anything else: 1
///
/// A non-positive or non-finite base serving falls back to 100g, and a
/// negative or non-finite quantity gives 0.
pub fn meal_multiplier(quantity: f64, unit: MealUnit, base_serving_g: f64) -> f64 {
    if !quantity.is_finite() || quantity < 0.0 {
        return 0.0;
    }
    let base = super::sanitize_serving_size(base_serving_g);

    match unit {
        MealUnit::G => quantity / base,
        MealUnit::Pcs => quantity * (base / 100.0),
        MealUnit::Other => 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_gram_quantity() {
        assert_eq!(extract_gram_quantity("200g chicken"), Some(200));
        assert_eq!(extract_gram_quantity("chicken 50 g"), Some(50));
        assert_eq!(extract_gram_quantity("150 grams paneer"), Some(150));
        assert_eq!(extract_gram_quantity("100G rice"), Some(100));
        assert_eq!(extract_gram_quantity("chicken"), None);
    }

    #[test]
    fn test_extract_rejects_other_units() {
        assert_eq!(extract_gram_quantity("5mg salt"), None);
        assert_eq!(extract_gram_quantity("2 kg rice"), None);
        assert_eq!(extract_gram_quantity("2 garlic cloves"), None);
        assert_eq!(extract_gram_quantity("1.5g salt"), None);
    }

    #[test]
    fn test_extract_first_match_wins() {
        assert_eq!(extract_gram_quantity("5mg salt and 30g butter"), Some(30));
        assert_eq!(extract_gram_quantity("100g rice, 50g dal"), Some(100));
    }

    #[test]
    fn test_meal_multiplier_grams() {
        assert!((meal_multiplier(150.0, MealUnit::G, 100.0) - 1.5).abs() < 1e-9);
        assert!((meal_multiplier(40.0, MealUnit::G, 80.0) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_meal_multiplier_pieces() {
        // 2 rotis with a 40g serving
        assert!((meal_multiplier(2.0, MealUnit::Pcs, 40.0) - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_meal_multiplier_guards() {
        assert_eq!(meal_multiplier(3.0, MealUnit::Other, 100.0), 1.0);
        assert!((meal_multiplier(50.0, MealUnit::G, 0.0) - 0.5).abs() < 1e-9);
        assert_eq!(meal_multiplier(-1.0, MealUnit::G, 100.0), 0.0);
    }

    #[test]
    fn test_meal_unit_from_str() {
        assert_eq!(MealUnit::from_str("G"), MealUnit::G);
        assert_eq!(MealUnit::from_str("pieces"), MealUnit::Pcs);
        assert_eq!(MealUnit::from_str("bowl"), MealUnit::Other);
    }
}
