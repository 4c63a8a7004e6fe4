//! Upstream dataset recognition
//!
//! Source tags are free text from the backend ("IFCT 2017", "INDB",
//! "CalorieNinjas (Generic)"), so datasets are recognised by substring.

use serde::{Deserialize, Serialize};

/// Dataset a food record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    /// Indian Food Composition Tables; measured raw ingredients
    Ifct,
    /// Indian Nutrient Databank; prepared recipes
    Indb,
    CalorieNinjas,
    Unknown,
}

impl DataSource {
    pub fn from_source(source: &str) -> Self {
        let lower = source.to_lowercase();
        if lower.contains("ifct") {
            DataSource::Ifct
        } else if lower.contains("indb") {
            DataSource::Indb
        } else if lower.contains("calorieninjas") {
            DataSource::CalorieNinjas
        } else {
            DataSource::Unknown
        }
    }

    /// Short badge text
    pub fn badge(&self) -> &'static str {
        match self {
            DataSource::Ifct => "IFCT",
            DataSource::Indb => "INDB",
            DataSource::CalorieNinjas => "CalorieNinjas",
            DataSource::Unknown => "Other",
        }
    }

    /// Verified raw-ingredient dataset
    pub fn is_verified_raw(&self) -> bool {
        matches!(self, DataSource::Ifct)
    }

    /// Prepared-dish dataset
    pub fn is_prepared_dish(&self) -> bool {
        matches!(self, DataSource::Indb)
    }
}
