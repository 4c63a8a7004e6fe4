//! Scalar nutrition value handling
//!
//! Parsing of untrusted upstream values and formatting for display.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

/// Sentinel used by upstream datasets for unknown values
pub const NOT_AVAILABLE: &str = "N/A";

static NON_NUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\d.\-]").expect("valid regex"));

static NUMERIC_LITERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-?(?:\d+(?:\.\d*)?|\.\d+)").expect("valid regex"));

/// Parse a raw nutrition value into a non-negative finite number
///
/// - missing, `null`, and `"N/A"` give 0
/// - strings are stripped to digits, `.` and `-`, then the first numeric
///   literal is read ("12.5g-ish" -> 12.5)
/// - numbers pass through
/// - anything else gives 0
///
/// Negative and non-finite results clamp to 0.
pub fn parse_value(raw: Option<&Value>) -> f64 {
    let parsed = match raw {
        None | Some(Value::Null) => 0.0,
        Some(Value::String(s)) => parse_str(s),
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(_) => 0.0,
    };
    clamp_non_negative(parsed)
}

/// Parse a string value using the same rules as [`parse_value`]
pub fn parse_str(s: &str) -> f64 {
    if s.trim() == NOT_AVAILABLE {
        return 0.0;
    }
    let cleaned = NON_NUMERIC.replace_all(s, "");
    let value = NUMERIC_LITERAL
        .find(&cleaned)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(0.0);
    clamp_non_negative(value)
}

fn clamp_non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Format a value for display
///
/// Whole numbers render without a decimal point, everything else with two
/// decimals. Missing and non-finite values render as "0".
pub fn format_for_display(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => {
            if v == 0.0 {
                "0".to_string()
            } else if v.fract() == 0.0 {
                format!("{}", v)
            } else {
                format!("{:.2}", v)
            }
        }
        _ => "0".to_string(),
    }
}

/// Protein as a percentage of calories, guarding against zero calories
pub fn compute_protein_density(protein_grams: f64, calories: f64) -> f64 {
    if calories > 0.0 && calories.is_finite() && protein_grams.is_finite() {
        (protein_grams / calories) * 100.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_missing_and_sentinel() {
        assert_eq!(parse_value(None), 0.0);
        assert_eq!(parse_value(Some(&Value::Null)), 0.0);
        assert_eq!(parse_value(Some(&json!("N/A"))), 0.0);
    }

    #[test]
    fn test_parse_noisy_strings() {
        assert_eq!(parse_value(Some(&json!("12.5g-ish"))), 12.5);
        assert_eq!(parse_value(Some(&json!("250 kcal"))), 250.0);
        assert_eq!(parse_value(Some(&json!("~3.2 g"))), 3.2);
        assert_eq!(parse_value(Some(&json!("abc"))), 0.0);
        assert_eq!(parse_value(Some(&json!(""))), 0.0);
        assert_eq!(parse_value(Some(&json!("-"))), 0.0);
    }

    #[test]
    fn test_parse_numbers() {
        assert_eq!(parse_value(Some(&json!(42))), 42.0);
        assert_eq!(parse_value(Some(&json!(0.75))), 0.75);
    }

    #[test]
    fn test_parse_clamps_negative() {
        assert_eq!(parse_value(Some(&json!(-5))), 0.0);
        assert_eq!(parse_value(Some(&json!("-3.5"))), 0.0);
    }

    #[test]
    fn test_parse_other_types() {
        assert_eq!(parse_value(Some(&json!(true))), 0.0);
        assert_eq!(parse_value(Some(&json!([1, 2]))), 0.0);
        assert_eq!(parse_value(Some(&json!({"value": 1}))), 0.0);
    }

    #[test]
    fn test_format_for_display() {
        assert_eq!(format_for_display(Some(100.0)), "100");
        assert_eq!(format_for_display(Some(12.345)), "12.35");
        assert_eq!(format_for_display(Some(0.5)), "0.50");
        assert_eq!(format_for_display(Some(0.0)), "0");
        assert_eq!(format_for_display(None), "0");
        assert_eq!(format_for_display(Some(f64::NAN)), "0");
    }

    #[test]
    fn test_protein_density() {
        assert_eq!(compute_protein_density(20.0, 0.0), 0.0);
        assert_eq!(compute_protein_density(25.0, 200.0), 12.5);
        assert_eq!(compute_protein_density(10.0, -5.0), 0.0);
    }
}
