//! Canonical nutrition record
//!
//! Used by the normalizer, the classifier, food analyses, and meal logs.

use serde::{Deserialize, Serialize};

/// Nutritional information with every field numeric and non-negative
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Nutrition {
    pub calories: f64,
    pub protein: f64,       // grams
    pub carbs: f64,         // grams
    pub fat: f64,           // grams
    pub fiber: f64,         // grams
    pub sugar: f64,         // grams
    pub saturated_fat: f64, // grams
    pub sodium: f64,        // milligrams
    pub cholesterol: f64,   // milligrams
}

impl Nutrition {
    pub fn zero() -> Self {
        Self::default()
    }

    /// Apply `f` to every field
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            calories: f(self.calories),
            protein: f(self.protein),
            carbs: f(self.carbs),
            fat: f(self.fat),
            fiber: f(self.fiber),
            sugar: f(self.sugar),
            saturated_fat: f(self.saturated_fat),
            sodium: f(self.sodium),
            cholesterol: f(self.cholesterol),
        }
    }

    /// Scale nutrition values by a multiplier
    pub fn scale(&self, multiplier: f64) -> Self {
        self.map(|v| v * multiplier)
    }

    /// Replace negative and non-finite values with 0
    pub fn sanitized(&self) -> Self {
        self.map(|v| if v.is_finite() && v > 0.0 { v } else { 0.0 })
    }

    /// Round every field to two decimal places
    pub fn rounded(&self) -> Self {
        self.map(|v| (v * 100.0).round() / 100.0)
    }

    pub fn add(&self, other: &Nutrition) -> Self {
        Self {
            calories: self.calories + other.calories,
            protein: self.protein + other.protein,
            carbs: self.carbs + other.carbs,
            fat: self.fat + other.fat,
            fiber: self.fiber + other.fiber,
            sugar: self.sugar + other.sugar,
            saturated_fat: self.saturated_fat + other.saturated_fat,
            sodium: self.sodium + other.sodium,
            cholesterol: self.cholesterol + other.cholesterol,
        }
    }
}

impl std::ops::Add for Nutrition {
    type Output = Nutrition;

    fn add(self, other: Nutrition) -> Nutrition {
        Nutrition::add(&self, &other)
    }
}

impl std::ops::Mul<f64> for Nutrition {
    type Output = Nutrition;

    fn mul(self, multiplier: f64) -> Nutrition {
        self.scale(multiplier)
    }
}

impl std::iter::Sum for Nutrition {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Nutrition::zero(), |acc, n| acc + n)
    }
}
