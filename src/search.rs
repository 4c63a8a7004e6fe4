//! Food search client
//!
//! Talks to the backend `GET /api/food/search?q=` endpoint and turns its
//! loosely shaped responses into [`RawFoodItem`]s.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use thiserror::Error;

use crate::config::Config;
use crate::models::RawFoodItem;

const SEARCH_PATH: &str = "/api/food/search";

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Please enter a food name to search.")]
    EmptyQuery,

    #[error("No results found for \"{0}\"")]
    NotFound(String),

    #[error("Food database is temporarily unavailable. Please try again later.")]
    Unavailable,

    #[error("Failed to fetch food data (HTTP {status}): {message}")]
    Status { status: u16, message: String },

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Malformed search response: {0}")]
    Malformed(String),
}

/// Anything that can look foods up by name
#[async_trait]
pub trait FoodSource: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<RawFoodItem>, SearchError>;
}

/// [`FoodSource`] backed by the HTTP food backend
pub struct HttpFoodSource {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpFoodSource {
    pub fn new(config: &Config) -> Result<Self, SearchError> {
        let client = Client::builder()
            .timeout(config.http_timeout)
            .user_agent(concat!("foodlens/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_base_url.clone(),
            token: config.api_token.clone(),
        })
    }

    fn search_url(&self) -> String {
        format!("{}{}", self.base_url, SEARCH_PATH)
    }
}

#[async_trait]
impl FoodSource for HttpFoodSource {
    async fn search(&self, query: &str) -> Result<Vec<RawFoodItem>, SearchError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(SearchError::EmptyQuery);
        }

        let mut request = self.client.get(self.search_url()).query(&[("q", query)]);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        tracing::debug!(query, "searching food backend");
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        decode_search_body(status, &body, query)
    }
}

/// Turn a raw HTTP status and body into food items or a search error
///
/// A success status with an undecodable body is `Malformed`; error statuses
/// only use the body for the backend's `error` message.
pub fn decode_search_body(
    status: StatusCode,
    body: &str,
    query: &str,
) -> Result<Vec<RawFoodItem>, SearchError> {
    if !status.is_success() {
        tracing::warn!(query, status = status.as_u16(), "food search failed");
        let body: Value = serde_json::from_str(body).unwrap_or(Value::Null);
        return Err(status_error(status, &body, query));
    }

    let body: Value = serde_json::from_str(body).map_err(|e| {
        tracing::warn!(query, error = %e, "undecodable search response");
        SearchError::Malformed(e.to_string())
    })?;
    parse_search_response(&body, query)
}

/// Map a failed HTTP status to a user-facing error
pub fn status_error(status: StatusCode, body: &Value, query: &str) -> SearchError {
    let message = body
        .get("error")
        .and_then(Value::as_str)
        .map(str::to_string);

    match status {
        StatusCode::BAD_REQUEST => SearchError::EmptyQuery,
        StatusCode::NOT_FOUND => match message {
            Some(m) => SearchError::Status { status: 404, message: m },
            None => SearchError::NotFound(query.to_string()),
        },
        StatusCode::INTERNAL_SERVER_ERROR => SearchError::Unavailable,
        other => SearchError::Status {
            status: other.as_u16(),
            message: message.unwrap_or_else(|| "Failed to fetch food data. Please try again.".to_string()),
        },
    }
}

/// Extract food items from any of the response shapes the backend uses
///
/// Accepted, in order: `{"items": [..]}` (non-empty), a single item with a
/// `name`, `{"direct": {..}}`, `{"withSource": {..}}`.
pub fn parse_search_response(body: &Value, query: &str) -> Result<Vec<RawFoodItem>, SearchError> {
    let candidates: Vec<Value> = match body {
        Value::Object(map) => {
            if let Some(items) = map.get("items").and_then(Value::as_array).filter(|a| !a.is_empty()) {
                items.clone()
            } else if map.get("name").is_some_and(|n| !n.is_null()) {
                vec![body.clone()]
            } else if let Some(direct) = map.get("direct").filter(|v| v.is_object()) {
                vec![direct.clone()]
            } else if let Some(with_source) = map.get("withSource").filter(|v| v.is_object()) {
                vec![with_source.clone()]
            } else {
                Vec::new()
            }
        }
        _ => Vec::new(),
    };

    if candidates.is_empty() {
        return Err(SearchError::NotFound(query.to_string()));
    }

    let mut items = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        match serde_json::from_value::<RawFoodItem>(candidate) {
            Ok(item) => items.push(item),
            Err(e) => tracing::warn!(error = %e, "skipping malformed food item"),
        }
    }

    if items.is_empty() {
        return Err(SearchError::Malformed(format!("no usable items for \"{}\"", query)));
    }
    Ok(items)
}

/// The first item whose name starts with the query, else the first item
pub fn best_match<'a>(items: &'a [RawFoodItem], food_name: &str) -> Option<&'a RawFoodItem> {
    let wanted = food_name.trim().to_lowercase();
    items
        .iter()
        .find(|item| item.name.to_lowercase().starts_with(&wanted))
        .or_else(|| items.first())
}
