//! Runtime configuration
//!
//! Read once from `FOODLENS_*` environment variables at startup.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_DAILY_ANALYSIS_LIMIT: u32 = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be a non-negative integer, got '{value}'")]
    InvalidNumber { name: &'static str, value: String },

    #[error("{name} must not be empty")]
    Empty { name: &'static str },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: PathBuf,
    pub api_base_url: String,
    pub api_token: Option<String>,
    pub http_timeout: Duration,
    pub daily_analysis_limit: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_path = lookup("FOODLENS_DATABASE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(default_database_path);

        let api_base_url = match lookup("FOODLENS_API_BASE_URL") {
            Some(url) if url.trim().is_empty() => {
                return Err(ConfigError::Empty { name: "FOODLENS_API_BASE_URL" })
            }
            Some(url) => url.trim().trim_end_matches('/').to_string(),
            None => DEFAULT_API_BASE_URL.to_string(),
        };

        let api_token = lookup("FOODLENS_API_TOKEN").filter(|t| !t.trim().is_empty());

        let timeout_secs = parse_number(
            "FOODLENS_HTTP_TIMEOUT_SECS",
            lookup("FOODLENS_HTTP_TIMEOUT_SECS"),
            DEFAULT_HTTP_TIMEOUT_SECS,
        )?;

        let daily_analysis_limit = parse_number(
            "FOODLENS_DAILY_ANALYSIS_LIMIT",
            lookup("FOODLENS_DAILY_ANALYSIS_LIMIT"),
            DEFAULT_DAILY_ANALYSIS_LIMIT,
        )?;

        Ok(Self {
            database_path,
            api_base_url,
            api_token,
            http_timeout: Duration::from_secs(timeout_secs),
            daily_analysis_limit,
        })
    }
}

fn parse_number<T: std::str::FromStr>(
    name: &'static str,
    value: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        None => Ok(default),
        Some(v) => v
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber { name, value: v }),
    }
}

/// `data/foodlens.db` next to the project root when running from `target/`,
/// otherwise next to the executable
fn default_database_path() -> PathBuf {
    let mut path = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));

    // Go up from target/release or target/debug to project root
    if path.ends_with("release") || path.ends_with("debug") {
        if let Some(grandparent) = path.parent().and_then(|p| p.parent()) {
            path = grandparent.to_path_buf();
        }
    }

    path.push("data");
    path.push("foodlens.db");
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.api_token, None);
        assert_eq!(config.http_timeout, Duration::from_secs(5));
        assert_eq!(config.daily_analysis_limit, 10);
        assert!(config.database_path.ends_with("data/foodlens.db"));
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("FOODLENS_DATABASE_PATH", "/tmp/fl.db"),
            ("FOODLENS_API_BASE_URL", "https://food.example.com/"),
            ("FOODLENS_API_TOKEN", "secret"),
            ("FOODLENS_HTTP_TIMEOUT_SECS", "12"),
            ("FOODLENS_DAILY_ANALYSIS_LIMIT", " 3 "),
        ])
        .unwrap();
        assert_eq!(config.database_path, PathBuf::from("/tmp/fl.db"));
        assert_eq!(config.api_base_url, "https://food.example.com");
        assert_eq!(config.api_token.as_deref(), Some("secret"));
        assert_eq!(config.http_timeout, Duration::from_secs(12));
        assert_eq!(config.daily_analysis_limit, 3);
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            config_from(&[("FOODLENS_DAILY_ANALYSIS_LIMIT", "ten")]),
            Err(ConfigError::InvalidNumber { .. })
        ));
        assert!(matches!(
            config_from(&[("FOODLENS_API_BASE_URL", "  ")]),
            Err(ConfigError::Empty { .. })
        ));
    }

    #[test]
    fn test_blank_token_is_none() {
        let config = config_from(&[("FOODLENS_API_TOKEN", "")]).unwrap();
        assert_eq!(config.api_token, None);
    }
}
