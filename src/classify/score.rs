//! Packaged product health score
//!
//! Scores a barcode-scanned product from its Nutri-Score grade when one is
//! printed, otherwise from per-100g nutriments.

use serde::{Deserialize, Serialize};

use super::source::DataSource;

/// Nutriments per 100g as reported by product databases
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductNutriments {
    #[serde(default)]
    pub sugars_100g: Option<f64>,
    #[serde(default)]
    pub salt_100g: Option<f64>,
    #[serde(default)]
    pub fat_100g: Option<f64>,
    #[serde(default)]
    pub fiber_100g: Option<f64>,
    #[serde(default)]
    pub proteins_100g: Option<f64>,
}

/// A scanned product
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Product {
    #[serde(default)]
    pub nutriscore_grade: Option<String>,
    #[serde(default)]
    pub nutriments: Option<ProductNutriments>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreColor {
    Green,
    Yellow,
    Red,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthScore {
    pub score: u8,
    pub color: ScoreColor,
    pub label: String,
}

impl HealthScore {
    fn new(score: u8, color: ScoreColor, label: &str) -> Self {
        Self {
            score,
            color,
            label: label.to_string(),
        }
    }

    /// Colour and label for a 0..=100 score
    pub fn from_score(score: u8) -> Self {
        match score {
            85.. => Self::new(score, ScoreColor::Green, "Very Healthy"),
            70..=84 => Self::new(score, ScoreColor::Green, "Healthy"),
            55..=69 => Self::new(score, ScoreColor::Yellow, "Moderate"),
            40..=54 => Self::new(score, ScoreColor::Yellow, "Less Healthy"),
            _ => Self::new(score, ScoreColor::Red, "Unhealthy"),
        }
    }
}

const BASE_SCORE: f64 = 50.0;

fn grade_score(grade: &str) -> HealthScore {
    match grade.trim().to_lowercase().as_str() {
        "a" => HealthScore::new(90, ScoreColor::Green, "Very Healthy"),
        "b" => HealthScore::new(75, ScoreColor::Green, "Healthy"),
        "c" => HealthScore::new(60, ScoreColor::Yellow, "Moderate"),
        "d" => HealthScore::new(40, ScoreColor::Yellow, "Less Healthy"),
        "e" => HealthScore::new(20, ScoreColor::Red, "Unhealthy"),
        _ => HealthScore::new(50, ScoreColor::Yellow, "Moderate"),
    }
}

// Penalty (or bonus) for the first band the value exceeds
fn band(value: Option<f64>, high: f64, high_delta: f64, mid: f64, mid_delta: f64) -> f64 {
    match value {
        Some(v) if v > high => high_delta,
        Some(v) if v > mid => mid_delta,
        _ => 0.0,
    }
}

/// Score a product, optionally crediting a match in an Indian dataset
pub fn score_product(product: &Product, indian_match: Option<DataSource>) -> HealthScore {
    if let Some(grade) = product.nutriscore_grade.as_deref().filter(|g| !g.trim().is_empty()) {
        return grade_score(grade);
    }

    let mut score = BASE_SCORE;

    if let Some(nut) = &product.nutriments {
        score += band(nut.sugars_100g, 22.5, -20.0, 5.0, -10.0);
        score += band(nut.salt_100g, 1.5, -15.0, 0.3, -7.0);
        score += band(nut.fat_100g, 17.5, -20.0, 3.0, -10.0);
        score += band(nut.fiber_100g, 6.0, 15.0, 3.0, 7.0);
        score += band(nut.proteins_100g, 12.0, 15.0, 6.0, 7.0);
    }

    score += match indian_match {
        Some(DataSource::Ifct) => 10.0,
        Some(DataSource::Indb) => 5.0,
        _ => 0.0,
    };

    HealthScore::from_score(score.round().clamp(0.0, 100.0) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_nutriments(n: ProductNutriments) -> Product {
        Product {
            nutriscore_grade: None,
            nutriments: Some(n),
        }
    }

    #[test]
    fn test_grade_takes_precedence() {
        let product = Product {
            nutriscore_grade: Some("B".to_string()),
            nutriments: Some(ProductNutriments {
                sugars_100g: Some(50.0),
                ..Default::default()
            }),
        };
        let score = score_product(&product, None);
        assert_eq!(score.score, 75);
        assert_eq!(score.label, "Healthy");
    }

    #[test]
    fn test_unknown_grade() {
        let product = Product {
            nutriscore_grade: Some("z".to_string()),
            nutriments: None,
        };
        assert_eq!(score_product(&product, None).score, 50);
    }

    #[test]
    fn test_no_data_is_less_healthy_baseline() {
        let score = score_product(&Product::default(), None);
        assert_eq!(score.score, 50);
        assert_eq!(score.color, ScoreColor::Yellow);
        assert_eq!(score.label, "Less Healthy");
    }

    #[test]
    fn test_sugary_salty_fatty_product() {
        let product = with_nutriments(ProductNutriments {
            sugars_100g: Some(30.0),
            salt_100g: Some(2.0),
            fat_100g: Some(20.0),
            fiber_100g: Some(1.0),
            proteins_100g: Some(2.0),
        });
        // 50 - 20 - 15 - 20 = -5, clamped
        let score = score_product(&product, None);
        assert_eq!(score.score, 0);
        assert_eq!(score.color, ScoreColor::Red);
    }

    #[test]
    fn test_wholesome_product_with_ifct_match() {
        let product = with_nutriments(ProductNutriments {
            sugars_100g: Some(2.0),
            salt_100g: Some(0.1),
            fat_100g: Some(2.0),
            fiber_100g: Some(7.0),
            proteins_100g: Some(13.0),
        });
        // 50 + 15 + 15 + 10 = 90
        let score = score_product(&product, Some(DataSource::Ifct));
        assert_eq!(score.score, 90);
        assert_eq!(score.label, "Very Healthy");
    }

    #[test]
    fn test_mid_bands() {
        let product = with_nutriments(ProductNutriments {
            sugars_100g: Some(10.0),
            salt_100g: Some(0.5),
            fat_100g: Some(5.0),
            fiber_100g: Some(4.0),
            proteins_100g: Some(7.0),
        });
        // 50 - 10 - 7 - 10 + 7 + 7 + 5 = 42
        let score = score_product(&product, Some(DataSource::Indb));
        assert_eq!(score.score, 42);
        assert_eq!(score.label, "Less Healthy");
    }
}
