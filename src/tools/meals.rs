//! Meal Log MCP Tools
//!
//! Logging meals and browsing or pruning meal history.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::db::Database;
use crate::models::{MealLog, MealLogCreate, MealLogItemCreate, MealType, Nutrition};
use crate::nutrition::{canonicalize, parse_value, sanitize_serving_size, MealUnit, RawNutritionRecord};
use crate::search::{best_match, FoodSource};

/// One food in a meal to log
#[derive(Debug, Clone, Deserialize)]
pub struct MealItemInput {
    pub name: String,
    pub quantity: f64,
    pub unit: MealUnit,
    /// Nutrition per `serving_size_g`; looked up by name when absent
    pub nutrition: Option<RawNutritionRecord>,
    pub serving_size_g: Option<Value>,
    pub source: Option<String>,
}

/// Response for log_meal
#[derive(Debug, Serialize)]
pub struct LogMealResponse {
    pub meal: MealLog,
    /// Foods that could not be found and were left out
    pub unresolved: Vec<String>,
}

/// Summary of a meal for list results
#[derive(Debug, Serialize)]
pub struct MealLogSummary {
    pub id: i64,
    pub date: String,
    pub meal_type: MealType,
    pub item_count: usize,
    pub foods: Vec<String>,
    pub totals: Nutrition,
}

impl From<&MealLog> for MealLogSummary {
    fn from(log: &MealLog) -> Self {
        Self {
            id: log.id,
            date: log.date.clone(),
            meal_type: log.meal_type,
            item_count: log.items.len(),
            foods: log.items.iter().map(|i| i.name.clone()).collect(),
            totals: log.totals.clone(),
        }
    }
}

/// Response for list_meal_logs
#[derive(Debug, Serialize)]
pub struct ListMealLogsResponse {
    pub meals: Vec<MealLogSummary>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

/// Response for deletions
#[derive(Debug, Serialize)]
pub struct DeleteMealLogsResponse {
    pub success: bool,
    pub deleted_count: usize,
}

async fn resolve_item(
    source: &dyn FoodSource,
    input: &MealItemInput,
) -> Result<MealLogItemCreate, String> {
    if let Some(raw) = &input.nutrition {
        return Ok(MealLogItemCreate {
            name: input.name.clone(),
            source: input.source.clone().unwrap_or_else(|| "User Provided".to_string()),
            quantity: input.quantity,
            unit: input.unit,
            base_serving_g: sanitize_serving_size(parse_value(input.serving_size_g.as_ref())),
            nutrition: canonicalize(raw),
        });
    }

    let items = source.search(&input.name).await.map_err(|e| e.to_string())?;
    let found = best_match(&items, &input.name)
        .ok_or_else(|| format!("No results found for \"{}\"", input.name))?;

    Ok(MealLogItemCreate {
        name: found.name.clone(),
        source: found.source.clone(),
        quantity: input.quantity,
        unit: input.unit,
        base_serving_g: sanitize_serving_size(parse_value(found.serving_size_g.as_ref())),
        nutrition: canonicalize(&found.nutrition),
    })
}

/// Log a meal, looking up foods that arrive without nutrition
pub async fn log_meal(
    db: &Database,
    source: &dyn FoodSource,
    date: &str,
    meal_type: &str,
    notes: Option<String>,
    items: &[MealItemInput],
) -> Result<LogMealResponse, String> {
    if items.is_empty() {
        return Err("Add at least one food item to log a meal".to_string());
    }
    if NaiveDate::parse_from_str(date, "%Y-%m-%d").is_err() {
        return Err(format!("Invalid date '{}': expected YYYY-MM-DD", date));
    }

    let mut resolved = Vec::with_capacity(items.len());
    let mut unresolved = Vec::new();
    for input in items {
        if input.name.trim().is_empty() {
            unresolved.push(input.name.clone());
            continue;
        }
        match resolve_item(source, input).await {
            Ok(item) => resolved.push(item),
            Err(e) => {
                tracing::warn!(food = %input.name, error = %e, "could not resolve meal item");
                unresolved.push(input.name.clone());
            }
        }
    }

    if resolved.is_empty() {
        return Err(format!("No nutrition found for: {}", unresolved.join(", ")));
    }

    let data = MealLogCreate {
        date: date.to_string(),
        meal_type: MealType::from_str(meal_type),
        notes,
        items: resolved,
    };

    let meal = db
        .with_conn(|conn| MealLog::create(conn, &data))
        .map_err(|e| format!("Failed to log meal: {}", e))?;
    tracing::info!(id = meal.id, date = %meal.date, calories = meal.totals.calories, "logged meal");

    Ok(LogMealResponse { meal, unresolved })
}

pub fn get_meal_log(db: &Database, id: i64) -> Result<Option<MealLog>, String> {
    db.with_conn(|conn| MealLog::get_by_id(conn, id))
        .map_err(|e| format!("Database error: {}", e))
}

pub fn list_meal_logs(
    db: &Database,
    start_date: Option<&str>,
    end_date: Option<&str>,
    limit: i64,
    offset: i64,
) -> Result<ListMealLogsResponse, String> {
    let limit = limit.clamp(1, 200);
    let offset = offset.max(0);

    db.with_conn(|conn| {
        let meals = MealLog::list(conn, start_date, end_date, limit, offset)?;
        let total = MealLog::count(conn, start_date, end_date)?;
        Ok(ListMealLogsResponse {
            meals: meals.iter().map(MealLogSummary::from).collect(),
            total,
            limit,
            offset,
        })
    })
    .map_err(|e| format!("Database error: {}", e))
}

pub fn delete_meal_log(db: &Database, id: i64) -> Result<bool, String> {
    db.with_conn(|conn| MealLog::delete(conn, id))
        .map_err(|e| format!("Failed to delete meal: {}", e))
}

pub fn delete_meal_logs(db: &Database, ids: &[i64]) -> Result<DeleteMealLogsResponse, String> {
    if ids.is_empty() {
        return Err("Provide at least one meal id".to_string());
    }
    let deleted_count = db
        .with_conn(|conn| MealLog::delete_many(conn, ids))
        .map_err(|e| format!("Failed to delete meals: {}", e))?;
    Ok(DeleteMealLogsResponse {
        success: deleted_count > 0,
        deleted_count,
    })
}

/// Delete every logged meal; refuses unless `force` is set
pub fn clear_meal_logs(db: &Database, force: bool) -> Result<DeleteMealLogsResponse, String> {
    if !force {
        return Err("Clearing the meal log deletes every meal. Pass force=true to confirm.".to_string());
    }
    let deleted_count = db
        .with_conn(MealLog::clear)
        .map_err(|e| format!("Failed to clear meals: {}", e))?;
    Ok(DeleteMealLogsResponse {
        success: true,
        deleted_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;
    use crate::models::RawFoodItem;
    use crate::search::SearchError;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct MenuSource;

    #[async_trait]
    impl FoodSource for MenuSource {
        async fn search(&self, query: &str) -> Result<Vec<RawFoodItem>, SearchError> {
            match query.to_lowercase().as_str() {
                "rice" => Ok(serde_json::from_value(json!([
                    {"name": "Fried Rice", "source": "INDB", "calories": 180},
                    {"name": "Rice, cooked", "source": "IFCT 2017", "serving_size_g": 100, "calories": 130, "carbs_g": 28}
                ]))
                .unwrap()),
                _ => Err(SearchError::NotFound(query.to_string())),
            }
        }
    }

    fn database() -> Database {
        let db = Database::in_memory().unwrap();
        db.with_conn(run_migrations).unwrap();
        db
    }

    fn item(name: &str, quantity: f64, unit: MealUnit, nutrition: Option<Value>) -> MealItemInput {
        MealItemInput {
            name: name.to_string(),
            quantity,
            unit,
            nutrition: nutrition.map(|n| serde_json::from_value(n).unwrap()),
            serving_size_g: None,
            source: None,
        }
    }

    #[tokio::test]
    async fn test_log_meal_with_lookup_and_direct_items() {
        let db = database();
        let items = vec![
            item("rice", 200.0, MealUnit::G, None),
            item("Curd", 100.0, MealUnit::G, Some(json!({"calories": "60", "protein_g": 3.1}))),
            item("Mystery Dish", 1.0, MealUnit::Pcs, None),
        ];

        let response = log_meal(&db, &MenuSource, "2026-10-19", "Lunch", None, &items)
            .await
            .unwrap();

        assert_eq!(response.unresolved, vec!["Mystery Dish"]);
        let meal = response.meal;
        assert_eq!(meal.meal_type, MealType::Lunch);
        assert_eq!(meal.items.len(), 2);
        assert_eq!(meal.items[0].name, "Rice, cooked");
        assert_eq!(meal.items[0].nutrition.calories, 260.0);
        assert_eq!(meal.items[1].source, "User Provided");
        assert_eq!(meal.totals.calories, 320.0);
        assert_eq!(meal.totals.carbs, 56.0);
    }

    #[tokio::test]
    async fn test_log_meal_nothing_resolved() {
        let db = database();
        let items = vec![item("Mystery Dish", 1.0, MealUnit::G, None)];
        let err = log_meal(&db, &MenuSource, "2026-10-19", "dinner", None, &items)
            .await
            .unwrap_err();
        assert!(err.contains("Mystery Dish"));
    }

    struct CountingSource(AtomicUsize);

    #[async_trait]
    impl FoodSource for CountingSource {
        async fn search(&self, query: &str) -> Result<Vec<RawFoodItem>, SearchError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            MenuSource.search(query).await
        }
    }

    #[tokio::test]
    async fn test_log_meal_bad_date_skips_lookups() {
        let db = database();
        let source = CountingSource(AtomicUsize::new(0));
        let items = vec![item("rice", 100.0, MealUnit::G, None), item("rice", 50.0, MealUnit::G, None)];

        let err = log_meal(&db, &source, "19/10/2026", "lunch", None, &items)
            .await
            .unwrap_err();
        assert!(err.contains("YYYY-MM-DD"));
        assert_eq!(source.0.load(Ordering::SeqCst), 0);
        assert_eq!(list_meal_logs(&db, None, None, 10, 0).unwrap().total, 0);
    }

    #[tokio::test]
    async fn test_history_roundtrip() {
        let db = database();
        let items = vec![item("Curd", 100.0, MealUnit::G, Some(json!({"calories": 60})))];
        let first = log_meal(&db, &MenuSource, "2026-10-18", "breakfast", None, &items)
            .await
            .unwrap()
            .meal;
        let second = log_meal(&db, &MenuSource, "2026-10-19", "snack", Some("post-run".into()), &items)
            .await
            .unwrap()
            .meal;

        let listed = list_meal_logs(&db, None, None, 50, 0).unwrap();
        assert_eq!(listed.total, 2);
        assert_eq!(listed.meals[0].id, second.id);
        assert_eq!(listed.meals[0].foods, vec!["Curd"]);

        assert_eq!(get_meal_log(&db, second.id).unwrap().unwrap().notes.as_deref(), Some("post-run"));
        assert!(delete_meal_log(&db, first.id).unwrap());
        assert!(get_meal_log(&db, first.id).unwrap().is_none());

        let bulk = delete_meal_logs(&db, &[second.id, 12345]).unwrap();
        assert_eq!(bulk.deleted_count, 1);
        assert!(delete_meal_logs(&db, &[]).is_err());

        assert!(clear_meal_logs(&db, false).is_err());
        assert_eq!(clear_meal_logs(&db, true).unwrap().deleted_count, 0);
    }
}
