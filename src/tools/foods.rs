//! Food MCP Tools
//!
//! Normalization, classification, search-backed analysis, and product
//! scoring.

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;

use crate::analysis::{analyze, analyze_record, FoodAnalysis, NutritionDisplay};
use crate::classify::{score_product as score, DataSource, HealthScore, Product};
use crate::models::{FoodRecord, Nutrition, RawFoodItem};
use crate::nutrition::{extract_gram_quantity, normalize, parse_value, RawNutritionRecord, ServingContext};
use crate::quota::{AnalysisQuota, QuotaStatus};
use crate::search::FoodSource;

/// Response for normalize_nutrition
#[derive(Debug, Serialize)]
pub struct NormalizeResponse {
    pub serving: ServingContext,
    pub nutrition: Nutrition,
    pub display: NutritionDisplay,
}

/// Response for analyze_food
#[derive(Debug, Serialize)]
pub struct AnalyzeFoodResponse {
    pub query: String,
    pub requested_grams: Option<u64>,
    pub results: Vec<FoodAnalysis>,
    pub total: usize,
    pub quota: QuotaStatus,
}

/// Normalize a raw payload, rescaling to explicit grams or grams found in `query`
pub fn normalize_nutrition(
    raw: &RawNutritionRecord,
    serving_size_g: Option<&Value>,
    requested_grams: Option<f64>,
    query: Option<&str>,
) -> NormalizeResponse {
    let requested = requested_grams.or_else(|| {
        query
            .and_then(extract_gram_quantity)
            .map(|g| g as f64)
    });
    let serving = ServingContext::new(parse_value(serving_size_g), requested);
    let nutrition = normalize(raw, &serving);

    NormalizeResponse {
        serving,
        display: NutritionDisplay::from(&nutrition),
        nutrition,
    }
}

/// Classify a food supplied directly by the caller
pub fn classify_food(raw: &RawFoodItem, requested_grams: Option<f64>, query: Option<&str>) -> FoodAnalysis {
    match (requested_grams, query) {
        (Some(grams), _) => analyze_record(&FoodRecord::from_raw(raw, Some(grams))),
        (None, Some(q)) => analyze(raw, q),
        (None, None) => analyze_record(&FoodRecord::from_raw(raw, None)),
    }
}

/// Search the backend and analyze every result, consuming one analysis
pub async fn analyze_food(
    source: &dyn FoodSource,
    quota: &AnalysisQuota,
    query: &str,
    limit: usize,
    today: NaiveDate,
) -> Result<AnalyzeFoodResponse, String> {
    let remaining = quota.remaining(today).map_err(|e| e.to_string())?;
    if remaining == 0 {
        return Err(format!(
            "Daily analysis limit of {} reached for {}",
            quota.limit(),
            today
        ));
    }

    let items = source.search(query).await.map_err(|e| e.to_string())?;
    let status = quota.try_consume(today).map_err(|e| e.to_string())?;

    let results: Vec<FoodAnalysis> = items
        .iter()
        .take(limit.max(1))
        .map(|item| analyze(item, query))
        .collect();

    tracing::info!(query, results = results.len(), remaining = status.remaining, "analyzed food");

    Ok(AnalyzeFoodResponse {
        query: query.to_string(),
        requested_grams: extract_gram_quantity(query),
        total: results.len(),
        results,
        quota: status,
    })
}

/// Score a scanned product, crediting a match in an Indian dataset
pub fn score_product(product: &Product, indian_match_source: Option<&str>) -> HealthScore {
    let indian_match = indian_match_source.map(DataSource::from_source);
    score(product, indian_match)
}
