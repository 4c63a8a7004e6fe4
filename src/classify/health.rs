//! Nutrient threshold checks
//!
//! Health indicator flags and the benefits/considerations lists. All
//! thresholds are exclusive and apply to per-serving values.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::models::Nutrition;

/// At-a-glance flag raised when a nutrient crosses a threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HealthIndicator {
    HighProtein,
    HighFiber,
    HighSugar,
    HighSatfat,
    HighSodium,
}

impl HealthIndicator {
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthIndicator::HighProtein => "high-protein",
            HealthIndicator::HighFiber => "high-fiber",
            HealthIndicator::HighSugar => "high-sugar",
            HealthIndicator::HighSatfat => "high-satfat",
            HealthIndicator::HighSodium => "high-sodium",
        }
    }
}

pub const HIGH_PROTEIN_G: f64 = 15.0;
pub const HIGH_FIBER_G: f64 = 5.0;
pub const HIGH_SUGAR_G: f64 = 20.0;
pub const HIGH_SATURATED_FAT_G: f64 = 5.0;
pub const HIGH_SODIUM_MG: f64 = 500.0;

/// Flags for every threshold the nutrition crosses
pub fn health_indicators(nutrition: &Nutrition) -> BTreeSet<HealthIndicator> {
    let checks = [
        (nutrition.protein > HIGH_PROTEIN_G, HealthIndicator::HighProtein),
        (nutrition.fiber > HIGH_FIBER_G, HealthIndicator::HighFiber),
        (nutrition.sugar > HIGH_SUGAR_G, HealthIndicator::HighSugar),
        (nutrition.saturated_fat > HIGH_SATURATED_FAT_G, HealthIndicator::HighSatfat),
        (nutrition.sodium > HIGH_SODIUM_MG, HealthIndicator::HighSodium),
    ];

    checks
        .into_iter()
        .filter_map(|(raised, indicator)| raised.then_some(indicator))
        .collect()
}

/// Benefits and considerations of a food
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProsAndCons {
    pub pros: Vec<String>,
    pub cons: Vec<String>,
}

/// Build the benefits/considerations lists
///
/// Protein and carbohydrate checks are if/else pairs; the rest are
/// independent.
pub fn pros_and_cons(nutrition: &Nutrition) -> ProsAndCons {
    let mut pros = Vec::new();
    let mut cons = Vec::new();

    if nutrition.protein > 20.0 {
        pros.push("High in protein");
    } else if nutrition.protein > 10.0 {
        pros.push("Good source of protein");
    }

    if nutrition.carbs < 5.0 {
        pros.push("Low in carbs");
    } else if nutrition.carbs > 50.0 {
        cons.push("High in carbohydrates");
    }

    if nutrition.fiber > 5.0 {
        pros.push("High in fiber");
    }
    if nutrition.sugar > 10.0 {
        cons.push("High in sugar");
    }
    if nutrition.fat > 15.0 {
        cons.push("High in fat");
    }
    if nutrition.saturated_fat > 5.0 {
        cons.push("High in saturated fat");
    }
    if nutrition.sodium > 500.0 {
        cons.push("High in sodium");
    }
    if nutrition.cholesterol > 50.0 {
        cons.push("Contains cholesterol");
    }
    if nutrition.calories < 100.0 {
        pros.push("Low calorie food");
    }

    ProsAndCons {
        pros: pros.into_iter().map(String::from).collect(),
        cons: cons.into_iter().map(String::from).collect(),
    }
}
