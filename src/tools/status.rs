//! FoodLens Status Tool
//!
//! Runtime status of the service plus a short usage guide for assistants.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;
use crate::config::Config;

/// How to use the food tools, for AI assistants
pub const FOOD_INSTRUCTIONS: &str = r#"
# FoodLens Instructions

## Looking foods up

Call `analyze_food` with what the user ate, e.g. "200g paneer tikka".
A gram amount in the query rescales every result to that weight; without
one, results stay at the source serving (usually 100g).

Each analysis uses one of the daily analyses. Check `analysis_quota`
before running many lookups.

Sources carry badges:
- IFCT: verified raw ingredients
- INDB: prepared Indian dishes
- CalorieNinjas: general foods

## Foods you already have numbers for

- `normalize_nutrition` cleans a raw payload ("12g", "N/A", nulls) into numbers
- `classify_food` adds category, health indicators, pros and cons
- `score_product` rates a packaged product from its Nutri-Score grade and nutriments

## Logging meals

`log_meal` takes a date (YYYY-MM-DD, defaults to today), a meal type
(breakfast, lunch, dinner, snack) and items. Each item has a name, a
quantity and a unit:

| unit | meaning |
|------|---------|
| g    | grams eaten |
| pcs  | pieces, each weighing one source serving |
| other | one source serving, quantity ignored |

Items without `nutrition` are looked up by name. Items that cannot be
found are reported under `unresolved` and left out of the meal.

Use `list_meal_logs`, `get_meal_log`, `delete_meal_log`,
`delete_meal_logs` and `clear_meal_logs` to review history.
"#;

/// Runtime status of the FoodLens service
#[derive(Debug, Clone, Serialize)]
pub struct FoodLensStatus {
    /// Build information
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,

    /// Database information
    pub database_path: String,
    pub database_size_bytes: Option<u64>,

    /// Food backend
    pub api_base_url: String,
    pub api_token_configured: bool,
    pub daily_analysis_limit: u32,

    /// Process information
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
    database_path: PathBuf,
    api_base_url: String,
    api_token_configured: bool,
    daily_analysis_limit: u32,
}

impl StatusTracker {
    pub fn new(config: &Config) -> Self {
        Self {
            start_time: Instant::now(),
            database_path: config.database_path.clone(),
            api_base_url: config.api_base_url.clone(),
            api_token_configured: config.api_token.is_some(),
            daily_analysis_limit: config.daily_analysis_limit,
        }
    }

    /// Get the current status
    pub fn get_status(&self) -> FoodLensStatus {
        let build_info = BuildInfo::current();

        let database_size_bytes = std::fs::metadata(&self.database_path)
            .ok()
            .map(|m| m.len());

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        FoodLensStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            api_base_url: self.api_base_url.clone(),
            api_token_configured: self.api_token_configured,
            daily_analysis_limit: self.daily_analysis_limit,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_reports_config() {
        let config = Config::from_lookup(|name| match name {
            "FOODLENS_DATABASE_PATH" => Some("/nonexistent/foodlens.db".to_string()),
            "FOODLENS_DAILY_ANALYSIS_LIMIT" => Some("4".to_string()),
            _ => None,
        })
        .unwrap();

        let status = StatusTracker::new(&config).get_status();
        assert_eq!(status.database_path, "/nonexistent/foodlens.db");
        assert_eq!(status.database_size_bytes, None);
        assert_eq!(status.daily_analysis_limit, 4);
        assert!(!status.api_token_configured);
        assert_eq!(status.process_id, std::process::id());
    }
}
