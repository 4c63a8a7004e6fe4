//! FoodLens MCP Server Implementation
//!
//! Implements the MCP server with all FoodLens tools.

use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::classify::{Product, ProductNutriments};
use crate::config::Config;
use crate::db::Database;
use crate::models::RawFoodItem;
use crate::nutrition::{MealUnit, RawNutritionRecord};
use crate::quota::AnalysisQuota;
use crate::search::FoodSource;
use crate::tools::foods;
use crate::tools::meals::{self, MealItemInput};
use crate::tools::status::StatusTracker;

/// FoodLens MCP Service
#[derive(Clone)]
pub struct FoodLensService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    database: Database,
    food_source: Arc<dyn FoodSource>,
    quota: Arc<AnalysisQuota>,
    tool_router: ToolRouter<FoodLensService>,
}

impl FoodLensService {
    pub fn new(
        config: &Config,
        database: Database,
        food_source: Arc<dyn FoodSource>,
        quota: AnalysisQuota,
    ) -> Self {
        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new(config))),
            database,
            food_source,
            quota: Arc::new(quota),
            tool_router: Self::tool_router(),
        }
    }
}

fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}

fn from_payload<T: serde::de::DeserializeOwned>(what: &str, payload: Value) -> Result<T, McpError> {
    serde_json::from_value(payload)
        .map_err(|e| McpError::invalid_params(format!("Invalid {}: {}", what, e), None))
}

// ============================================================================
// Food Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct NormalizeNutritionParams {
    /// Raw nutrition fields (calories, protein_g, carbohydrates_total_g, carbs_g,
    /// fat_total_g, fat_g, fiber_g, sugar_g, fat_saturated_g, sodium_mg,
    /// cholesterol_mg). Values may be numbers, strings like "12g", "N/A" or null.
    pub nutrition: Value,
    /// Serving the values refer to, in grams (default 100)
    pub serving_size_g: Option<Value>,
    /// Grams to rescale to
    pub requested_grams: Option<f64>,
    /// Free-text query; a gram amount like "150g" is used when requested_grams is absent
    pub query: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ClassifyFoodParams {
    /// Food item as returned by a food database: name, source, serving_size_g,
    /// serving_description, is_raw, is_cooked and raw nutrition fields
    pub food: Value,
    /// Grams to rescale to
    pub requested_grams: Option<f64>,
    /// Free-text query; a gram amount like "150g" is used when requested_grams is absent
    pub query: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AnalyzeFoodParams {
    /// What was eaten, e.g. "200g chicken biryani"
    pub query: String,
    /// Maximum number of results to analyze (default 10)
    #[serde(default = "default_analyze_limit")]
    pub limit: usize,
}

fn default_analyze_limit() -> usize { 10 }

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ScoreProductParams {
    /// Nutri-Score grade a-e, if printed on the product
    pub nutriscore_grade: Option<String>,
    pub sugars_100g: Option<f64>,
    pub salt_100g: Option<f64>,
    pub fat_100g: Option<f64>,
    pub fiber_100g: Option<f64>,
    pub proteins_100g: Option<f64>,
    /// Source of a matching food in an Indian dataset (IFCT or INDB), if any
    pub indian_match_source: Option<String>,
}

// ============================================================================
// Meal Log Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct MealItemParams {
    /// Food name; looked up when nutrition is not given
    pub name: String,
    /// Amount eaten, in `unit`
    pub quantity: f64,
    /// g, pcs, or any other unit (counted as one serving) (default g)
    #[serde(default = "default_unit")]
    pub unit: String,
    /// Raw nutrition per serving_size_g; same fields as normalize_nutrition
    pub nutrition: Option<Value>,
    /// Serving the nutrition refers to, in grams (default 100)
    pub serving_size_g: Option<Value>,
    /// Where the nutrition came from
    pub source: Option<String>,
}

fn default_unit() -> String { "g".to_string() }

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LogMealParams {
    /// Date in YYYY-MM-DD format (default today)
    pub date: Option<String>,
    /// breakfast, lunch, dinner or snack
    #[serde(default = "default_meal_type")]
    pub meal_type: String,
    pub notes: Option<String>,
    /// Foods eaten in this meal
    pub items: Vec<MealItemParams>,
}

fn default_meal_type() -> String { "unspecified".to_string() }

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetMealLogParams {
    /// Meal log ID
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListMealLogsParams {
    /// Start date inclusive (YYYY-MM-DD)
    pub start_date: Option<String>,
    /// End date inclusive (YYYY-MM-DD)
    pub end_date: Option<String>,
    #[serde(default = "default_list_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_list_limit() -> i64 { 50 }

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DeleteMealLogParams {
    /// Meal log ID to delete
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DeleteMealLogsParams {
    /// Meal log IDs to delete
    pub ids: Vec<i64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ClearMealLogsParams {
    /// Must be true to delete every meal
    #[serde(default)]
    pub force: bool,
}

impl MealItemParams {
    fn into_input(self) -> Result<MealItemInput, McpError> {
        let nutrition = match self.nutrition {
            Some(payload) => Some(from_payload::<RawNutritionRecord>("nutrition", payload)?),
            None => None,
        };
        Ok(MealItemInput {
            name: self.name,
            quantity: self.quantity,
            unit: MealUnit::from_str(&self.unit),
            nutrition,
            serving_size_g: self.serving_size_g,
            source: self.source,
        })
    }
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl FoodLensService {
    // --- Status ---

    #[tool(description = "Get the current status of the FoodLens service including build info, database status, food backend, and process information")]
    async fn foodlens_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        let status = tracker.get_status();
        let json = serde_json::to_string_pretty(&status)
            .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Get instructions for looking up foods and logging meals. Call this when starting a food logging session or when unsure how to use the tools.")]
    fn food_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::FOOD_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(FOOD_INSTRUCTIONS)]))
    }

    // --- Foods ---

    #[tool(description = "Normalize a raw nutrition payload into numeric values, optionally rescaled to a gram amount")]
    fn normalize_nutrition(&self, Parameters(p): Parameters<NormalizeNutritionParams>) -> Result<CallToolResult, McpError> {
        let raw: RawNutritionRecord = from_payload("nutrition", p.nutrition)?;
        let result = foods::normalize_nutrition(&raw, p.serving_size_g.as_ref(), p.requested_grams, p.query.as_deref());
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Classify a food item: category, health indicators, pros and cons, and display values")]
    fn classify_food(&self, Parameters(p): Parameters<ClassifyFoodParams>) -> Result<CallToolResult, McpError> {
        let raw: RawFoodItem = from_payload("food", p.food)?;
        let result = foods::classify_food(&raw, p.requested_grams, p.query.as_deref());
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Search the food database and analyze each result. A gram amount in the query (e.g. \"150g rice\") rescales the results. Uses one of the daily analyses.")]
    async fn analyze_food(&self, Parameters(p): Parameters<AnalyzeFoodParams>) -> Result<CallToolResult, McpError> {
        let result = foods::analyze_food(self.food_source.as_ref(), &self.quota, &p.query, p.limit, today())
            .await
            .map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Show how many food analyses remain today")]
    fn analysis_quota(&self) -> Result<CallToolResult, McpError> {
        let result = self.quota.status(today()).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Score a packaged product 0-100 from its Nutri-Score grade or per-100g nutriments")]
    fn score_product(&self, Parameters(p): Parameters<ScoreProductParams>) -> Result<CallToolResult, McpError> {
        let product = Product {
            nutriscore_grade: p.nutriscore_grade,
            nutriments: Some(ProductNutriments {
                sugars_100g: p.sugars_100g,
                salt_100g: p.salt_100g,
                fat_100g: p.fat_100g,
                fiber_100g: p.fiber_100g,
                proteins_100g: p.proteins_100g,
            }),
        };
        let result = foods::score_product(&product, p.indian_match_source.as_deref());
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    // --- Meal Logs ---

    #[tool(description = "Log a meal. Items without nutrition are looked up by name; items that cannot be found are reported as unresolved.")]
    async fn log_meal(&self, Parameters(p): Parameters<LogMealParams>) -> Result<CallToolResult, McpError> {
        let items = p
            .items
            .into_iter()
            .map(MealItemParams::into_input)
            .collect::<Result<Vec<_>, _>>()?;
        let date = p.date.unwrap_or_else(|| today().format("%Y-%m-%d").to_string());

        let result = meals::log_meal(&self.database, self.food_source.as_ref(), &date, &p.meal_type, p.notes, &items)
            .await
            .map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Get a logged meal with its items and totals")]
    fn get_meal_log(&self, Parameters(p): Parameters<GetMealLogParams>) -> Result<CallToolResult, McpError> {
        let result = meals::get_meal_log(&self.database, p.id).map_err(|e| McpError::internal_error(e, None))?;
        let json = match result {
            Some(meal) => serde_json::to_string_pretty(&meal),
            None => Ok(format!(r#"{{"error": "Meal log not found", "id": {}}}"#, p.id)),
        }.map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "List logged meals newest first, optionally within a date range, with pagination")]
    fn list_meal_logs(&self, Parameters(p): Parameters<ListMealLogsParams>) -> Result<CallToolResult, McpError> {
        let result = meals::list_meal_logs(&self.database, p.start_date.as_deref(), p.end_date.as_deref(), p.limit, p.offset)
            .map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Delete a logged meal and its items")]
    fn delete_meal_log(&self, Parameters(p): Parameters<DeleteMealLogParams>) -> Result<CallToolResult, McpError> {
        let deleted = meals::delete_meal_log(&self.database, p.id).map_err(|e| McpError::internal_error(e, None))?;
        let json = if deleted {
            format!(r#"{{"success": true, "deleted_id": {}}}"#, p.id)
        } else {
            format!(r#"{{"error": "Meal log not found", "id": {}}}"#, p.id)
        };
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Delete several logged meals in one call")]
    fn delete_meal_logs(&self, Parameters(p): Parameters<DeleteMealLogsParams>) -> Result<CallToolResult, McpError> {
        let result = meals::delete_meal_logs(&self.database, &p.ids).map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Delete every logged meal. Requires force=true.")]
    fn clear_meal_logs(&self, Parameters(p): Parameters<ClearMealLogsParams>) -> Result<CallToolResult, McpError> {
        let result = meals::clear_meal_logs(&self.database, p.force).map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }
}

#[tool_handler]
impl ServerHandler for FoodLensService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "foodlens".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("FoodLens".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "FoodLens - Food lookup, nutrition analysis, and meal logging. \
                 Call food_instructions first when logging food. \
                 Foods: analyze_food (search + analysis, uses daily quota), analysis_quota, \
                 normalize_nutrition, classify_food, score_product. \
                 Meals: log_meal, get_meal_log, list_meal_logs, delete_meal_log, delete_meal_logs, \
                 clear_meal_logs (requires force=true)."
                    .into(),
            ),
        }
    }
}
