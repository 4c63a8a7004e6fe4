//! Food categorization
//!
//! An ordered rule table over the lower-cased name and source of a food.
//! Rules are evaluated top to bottom and the first match decides the
//! category, so "grilled chicken breast" is a breast, not a grilled dish.

use serde::{Deserialize, Serialize};

use super::source::DataSource;

/// Display category of a food
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FoodCategory {
    Raw,
    Breast,
    Thigh,
    Leg,
    Wing,
    Mince,
    Curry,
    Fried,
    Grilled,
    Biryani,
    Cooked,
    Generic,
}

impl FoodCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            FoodCategory::Raw => "raw",
            FoodCategory::Breast => "breast",
            FoodCategory::Thigh => "thigh",
            FoodCategory::Leg => "leg",
            FoodCategory::Wing => "wing",
            FoodCategory::Mince => "mince",
            FoodCategory::Curry => "curry",
            FoodCategory::Fried => "fried",
            FoodCategory::Grilled => "grilled",
            FoodCategory::Biryani => "biryani",
            FoodCategory::Cooked => "cooked",
            FoodCategory::Generic => "generic",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FoodCategory::Raw => "Raw Ingredient",
            FoodCategory::Breast => "Chicken Breast",
            FoodCategory::Thigh => "Chicken Thigh",
            FoodCategory::Leg => "Chicken Leg",
            FoodCategory::Wing => "Chicken Wing",
            FoodCategory::Mince => "Chicken Mince",
            FoodCategory::Curry => "Curry Dish",
            FoodCategory::Fried => "Fried Dish",
            FoodCategory::Grilled => "Grilled / Roasted",
            FoodCategory::Biryani => "Rice Dish",
            FoodCategory::Cooked => "Prepared Dish",
            FoodCategory::Generic => "Food",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            FoodCategory::Raw => "leaf",
            FoodCategory::Breast
            | FoodCategory::Thigh
            | FoodCategory::Leg
            | FoodCategory::Wing
            | FoodCategory::Mince => "drumstick",
            FoodCategory::Curry => "soup",
            FoodCategory::Fried => "flame",
            FoodCategory::Grilled => "beef",
            FoodCategory::Biryani => "wheat",
            FoodCategory::Cooked => "chef-hat",
            FoodCategory::Generic => "utensils",
        }
    }
}

/// What the rules look at
#[derive(Debug, Clone)]
pub struct CategorySubject {
    /// Lower-cased "name source"
    pub text: String,
    pub source: DataSource,
    pub is_raw: bool,
    pub is_cooked: bool,
}

impl CategorySubject {
    pub fn new(name: &str, source: &str, is_raw: bool, is_cooked: bool) -> Self {
        Self {
            text: format!("{} {}", name, source).to_lowercase(),
            source: DataSource::from_source(source),
            is_raw,
            is_cooked,
        }
    }

    fn has(&self, keyword: &str) -> bool {
        self.text.contains(keyword)
    }

    fn has_any(&self, keywords: &[&str]) -> bool {
        keywords.iter().any(|k| self.text.contains(k))
    }

    fn is_chicken_with(&self, cuts: &[&str]) -> bool {
        self.has("chicken") && self.has_any(cuts)
    }
}

/// A single row of the rule table
pub struct CategoryRule {
    pub category: FoodCategory,
    pub matches: fn(&CategorySubject) -> bool,
}

/// Rules in priority order
pub const CATEGORY_RULES: &[CategoryRule] = &[
    CategoryRule {
        category: FoodCategory::Raw,
        matches: |s| {
            s.is_raw
                || s.has("raw")
                || (s.source.is_verified_raw() && !s.has_any(&["curry", "masala"]))
        },
    },
    CategoryRule {
        category: FoodCategory::Breast,
        matches: |s| s.is_chicken_with(&["breast"]),
    },
    CategoryRule {
        category: FoodCategory::Thigh,
        matches: |s| s.is_chicken_with(&["thigh"]),
    },
    CategoryRule {
        category: FoodCategory::Leg,
        matches: |s| s.is_chicken_with(&["leg", "drumstick"]),
    },
    CategoryRule {
        category: FoodCategory::Wing,
        matches: |s| s.is_chicken_with(&["wing"]),
    },
    CategoryRule {
        category: FoodCategory::Mince,
        matches: |s| s.is_chicken_with(&["mince", "keema"]),
    },
    CategoryRule {
        category: FoodCategory::Curry,
        matches: |s| s.has_any(&["curry", "masala", "gravy"]),
    },
    CategoryRule {
        category: FoodCategory::Fried,
        matches: |s| s.has("fried"),
    },
    CategoryRule {
        category: FoodCategory::Grilled,
        matches: |s| s.has_any(&["grilled", "roast", "tandoori"]),
    },
    CategoryRule {
        category: FoodCategory::Biryani,
        matches: |s| s.has_any(&["biryani", "pulao"]),
    },
    CategoryRule {
        category: FoodCategory::Cooked,
        matches: |s| s.is_cooked || s.source.is_prepared_dish(),
    },
];

/// Categorize a subject; falls through to `Generic`
pub fn categorize(subject: &CategorySubject) -> FoodCategory {
    CATEGORY_RULES
        .iter()
        .find(|rule| (rule.matches)(subject))
        .map(|rule| rule.category)
        .unwrap_or(FoodCategory::Generic)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> FoodCategory {
        categorize(&CategorySubject::new(name, "", false, false))
    }

    fn sourced(name: &str, source: &str) -> FoodCategory {
        categorize(&CategorySubject::new(name, source, false, false))
    }

    #[test]
    fn test_chicken_cuts() {
        assert_eq!(named("Grilled Chicken Breast"), FoodCategory::Breast);
        assert_eq!(named("Chicken Thigh"), FoodCategory::Thigh);
        assert_eq!(named("Chicken Drumstick"), FoodCategory::Leg);
        assert_eq!(named("Chicken Leg Piece"), FoodCategory::Leg);
        assert_eq!(named("Chicken Wings"), FoodCategory::Wing);
        assert_eq!(named("Chicken Keema"), FoodCategory::Mince);
    }

    #[test]
    fn test_cut_beats_preparation() {
        assert_eq!(named("Fried Chicken Wing"), FoodCategory::Wing);
        assert_eq!(named("Chicken Breast Curry"), FoodCategory::Breast);
    }

    #[test]
    fn test_preparations() {
        assert_eq!(named("Butter Chicken Masala"), FoodCategory::Curry);
        assert_eq!(named("Paneer Gravy"), FoodCategory::Curry);
        assert_eq!(named("Fried Rice"), FoodCategory::Fried);
        assert_eq!(named("Tandoori Roti"), FoodCategory::Grilled);
        assert_eq!(named("Veg Pulao"), FoodCategory::Biryani);
        assert_eq!(named("Hyderabadi Biryani"), FoodCategory::Biryani);
    }

    #[test]
    fn test_curry_before_fried() {
        assert_eq!(named("Fried Fish Curry"), FoodCategory::Curry);
    }

    #[test]
    fn test_raw_rules() {
        assert_eq!(named("Raw Mango"), FoodCategory::Raw);
        assert_eq!(sourced("Spinach", "IFCT 2017"), FoodCategory::Raw);
        assert_eq!(sourced("Chicken Curry", "IFCT 2017"), FoodCategory::Curry);
        assert_eq!(
            categorize(&CategorySubject::new("Chicken Breast", "", true, false)),
            FoodCategory::Raw
        );
    }

    #[test]
    fn test_cooked_rules() {
        assert_eq!(sourced("Chole Bhature", "INDB"), FoodCategory::Cooked);
        assert_eq!(
            categorize(&CategorySubject::new("Dal", "", false, true)),
            FoodCategory::Cooked
        );
    }

    #[test]
    fn test_generic_fallthrough() {
        assert_eq!(named("Chole Bhature"), FoodCategory::Generic);
        assert_eq!(named(""), FoodCategory::Generic);
    }

    #[test]
    fn test_labels() {
        assert_eq!(FoodCategory::Breast.label(), "Chicken Breast");
        assert_eq!(FoodCategory::Generic.as_str(), "generic");
    }
}
