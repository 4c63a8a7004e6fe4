//! Meal log model
//!
//! A logged meal with its foods, stored with scaled nutrition and cached
//! totals.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use super::Nutrition;
use crate::db::{DbError, DbResult};
use crate::nutrition::{meal_multiplier, MealUnit};

/// Meal type enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
    Unspecified,
}

impl MealType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
            MealType::Unspecified => "unspecified",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "breakfast" => MealType::Breakfast,
            "lunch" => MealType::Lunch,
            "dinner" => MealType::Dinner,
            "snack" => MealType::Snack,
            _ => MealType::Unspecified,
        }
    }
}

/// A food eaten as part of a meal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealLogItem {
    pub id: i64,
    pub name: String,
    pub source: String,
    pub quantity: f64,
    pub unit: MealUnit,
    /// Nutrition for the logged quantity
    pub nutrition: Nutrition,
}

/// A logged meal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealLog {
    pub id: i64,
    pub date: String,
    pub meal_type: MealType,
    pub notes: Option<String>,
    pub items: Vec<MealLogItem>,
    pub totals: Nutrition,
    pub created_at: String,
}

/// Data for one food in a new meal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealLogItemCreate {
    pub name: String,
    pub source: String,
    pub quantity: f64,
    pub unit: MealUnit,
    /// Serving the nutrition below refers to
    pub base_serving_g: f64,
    /// Nutrition per base serving
    pub nutrition: Nutrition,
}

impl MealLogItemCreate {
    /// Nutrition for the logged quantity
    pub fn scaled_nutrition(&self) -> Nutrition {
        let multiplier = meal_multiplier(self.quantity, self.unit, self.base_serving_g);
        self.nutrition.scale(multiplier).sanitized()
    }
}

/// Data for creating a meal log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealLogCreate {
    pub date: String,
    pub meal_type: MealType,
    pub notes: Option<String>,
    pub items: Vec<MealLogItemCreate>,
}

/// Sum of item nutrition, rounded to 2 decimals
pub fn meal_totals<'a>(items: impl IntoIterator<Item = &'a Nutrition>) -> Nutrition {
    items
        .into_iter()
        .cloned()
        .sum::<Nutrition>()
        .rounded()
}

fn nutrition_from_row(row: &Row, prefix: &str) -> rusqlite::Result<Nutrition> {
    let col = |name: &str| format!("{}{}", prefix, name);
    Ok(Nutrition {
        calories: row.get(col("calories").as_str())?,
        protein: row.get(col("protein").as_str())?,
        carbs: row.get(col("carbs").as_str())?,
        fat: row.get(col("fat").as_str())?,
        fiber: row.get(col("fiber").as_str())?,
        sugar: row.get(col("sugar").as_str())?,
        saturated_fat: row.get(col("saturated_fat").as_str())?,
        sodium: row.get(col("sodium").as_str())?,
        cholesterol: row.get(col("cholesterol").as_str())?,
    })
}

impl MealLogItem {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let unit: String = row.get("unit")?;
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            source: row.get("source")?,
            quantity: row.get("quantity")?,
            unit: MealUnit::from_str(&unit),
            nutrition: nutrition_from_row(row, "")?,
        })
    }

    fn list_for_meal(conn: &Connection, meal_log_id: i64) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM meal_log_items WHERE meal_log_id = ?1 ORDER BY position ASC",
        )?;
        let items = stmt
            .query_map([meal_log_id], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(items)
    }
}

impl MealLog {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let meal_type: String = row.get("meal_type")?;
        Ok(Self {
            id: row.get("id")?,
            date: row.get("date")?,
            meal_type: MealType::from_str(&meal_type),
            notes: row.get("notes")?,
            items: Vec::new(),
            totals: nutrition_from_row(row, "total_")?,
            created_at: row.get("created_at")?,
        })
    }

    fn with_items(mut self, conn: &Connection) -> DbResult<Self> {
        self.items = MealLogItem::list_for_meal(conn, self.id)?;
        Ok(self)
    }

    /// Store a meal and its items in one transaction
    pub fn create(conn: &Connection, data: &MealLogCreate) -> DbResult<Self> {
        if data.items.is_empty() {
            return Err(DbError::Invalid("a meal needs at least one food item".to_string()));
        }
        if chrono::NaiveDate::parse_from_str(&data.date, "%Y-%m-%d").is_err() {
            return Err(DbError::Invalid(format!("date must be YYYY-MM-DD, got '{}'", data.date)));
        }

        let scaled: Vec<Nutrition> = data.items.iter().map(|i| i.scaled_nutrition()).collect();
        let totals = meal_totals(&scaled);

        let tx = conn.unchecked_transaction()?;
        tx.execute(
            r#"
            INSERT INTO meal_logs (
                date, meal_type, notes,
                total_calories, total_protein, total_carbs, total_fat, total_fiber,
                total_sugar, total_saturated_fat, total_sodium, total_cholesterol
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            "#,
            params![
                data.date,
                data.meal_type.as_str(),
                data.notes,
                totals.calories,
                totals.protein,
                totals.carbs,
                totals.fat,
                totals.fiber,
                totals.sugar,
                totals.saturated_fat,
                totals.sodium,
                totals.cholesterol,
            ],
        )?;
        let id = tx.last_insert_rowid();

        for (position, (item, n)) in data.items.iter().zip(&scaled).enumerate() {
            tx.execute(
                r#"
                INSERT INTO meal_log_items (
                    meal_log_id, position, name, source, quantity, unit,
                    calories, protein, carbs, fat, fiber, sugar, saturated_fat, sodium, cholesterol
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)
                "#,
                params![
                    id,
                    position as i64,
                    item.name,
                    item.source,
                    item.quantity,
                    item.unit.as_str(),
                    n.calories,
                    n.protein,
                    n.carbs,
                    n.fat,
                    n.fiber,
                    n.sugar,
                    n.saturated_fat,
                    n.sodium,
                    n.cholesterol,
                ],
            )?;
        }
        tx.commit()?;

        Self::get_by_id(conn, id)?.ok_or_else(|| DbError::NotFound(format!("meal log {}", id)))
    }

    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM meal_logs WHERE id = ?1")?;
        match stmt.query_row([id], Self::from_row) {
            Ok(log) => Ok(Some(log.with_items(conn)?)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List meals newest first, optionally within an inclusive date range
    pub fn list(
        conn: &Connection,
        start_date: Option<&str>,
        end_date: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            r#"
            SELECT * FROM meal_logs
            WHERE (?1 IS NULL OR date >= ?1) AND (?2 IS NULL OR date <= ?2)
            ORDER BY date DESC, id DESC
            LIMIT ?3 OFFSET ?4
            "#,
        )?;
        let logs = stmt
            .query_map(params![start_date, end_date, limit, offset], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        logs.into_iter().map(|log| log.with_items(conn)).collect()
    }

    pub fn count(conn: &Connection, start_date: Option<&str>, end_date: Option<&str>) -> DbResult<i64> {
        let count = conn.query_row(
            "SELECT COUNT(*) FROM meal_logs WHERE (?1 IS NULL OR date >= ?1) AND (?2 IS NULL OR date <= ?2)",
            params![start_date, end_date],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Delete a meal; items go with it
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM meal_logs WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }

    /// Delete several meals, returning how many existed
    pub fn delete_many(conn: &Connection, ids: &[i64]) -> DbResult<usize> {
        let tx = conn.unchecked_transaction()?;
        let mut deleted = 0;
        {
            let mut stmt = tx.prepare("DELETE FROM meal_logs WHERE id = ?1")?;
            for id in ids {
                deleted += stmt.execute([id])?;
            }
        }
        tx.commit()?;
        Ok(deleted)
    }

    /// Delete every meal
    pub fn clear(conn: &Connection) -> DbResult<usize> {
        Ok(conn.execute("DELETE FROM meal_logs", [])?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    fn roti() -> MealLogItemCreate {
        MealLogItemCreate {
            name: "Roti".to_string(),
            source: "INDB".to_string(),
            quantity: 2.0,
            unit: MealUnit::Pcs,
            base_serving_g: 40.0,
            nutrition: Nutrition {
                calories: 120.0,
                protein: 3.1,
                carbs: 18.0,
                ..Nutrition::zero()
            },
        }
    }

    fn dal() -> MealLogItemCreate {
        MealLogItemCreate {
            name: "Dal".to_string(),
            source: "IFCT 2017".to_string(),
            quantity: 150.0,
            unit: MealUnit::G,
            base_serving_g: 100.0,
            nutrition: Nutrition {
                calories: 116.0,
                protein: 9.0,
                carbs: 20.1,
                fiber: 8.0,
                ..Nutrition::zero()
            },
        }
    }

    fn lunch(date: &str) -> MealLogCreate {
        MealLogCreate {
            date: date.to_string(),
            meal_type: MealType::Lunch,
            notes: None,
            items: vec![roti(), dal()],
        }
    }

    #[test]
    fn test_create_scales_items_and_totals() {
        let conn = setup();
        let log = MealLog::create(&conn, &lunch("2026-10-19")).unwrap();

        assert_eq!(log.items.len(), 2);
        assert_eq!(log.items[0].name, "Roti");
        // roti: 2 pcs * 40/100 = 0.8
        assert!((log.items[0].nutrition.calories - 96.0).abs() < 1e-9);
        // dal: 150/100 = 1.5
        assert!((log.items[1].nutrition.calories - 174.0).abs() < 1e-9);
        assert_eq!(log.totals.calories, 270.0);
        assert_eq!(log.totals.protein, 15.98);
        assert_eq!(log.meal_type, MealType::Lunch);
    }

    #[test]
    fn test_create_rejects_bad_input() {
        let conn = setup();
        let mut empty = lunch("2026-10-19");
        empty.items.clear();
        assert!(matches!(MealLog::create(&conn, &empty), Err(DbError::Invalid(_))));
        assert!(matches!(MealLog::create(&conn, &lunch("yesterday")), Err(DbError::Invalid(_))));
    }

    #[test]
    fn test_list_by_date_range() {
        let conn = setup();
        MealLog::create(&conn, &lunch("2026-10-17")).unwrap();
        MealLog::create(&conn, &lunch("2026-10-18")).unwrap();
        MealLog::create(&conn, &lunch("2026-10-19")).unwrap();

        let all = MealLog::list(&conn, None, None, 50, 0).unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].date, "2026-10-19");

        let some = MealLog::list(&conn, Some("2026-10-18"), None, 50, 0).unwrap();
        assert_eq!(some.len(), 2);
        assert_eq!(MealLog::count(&conn, None, Some("2026-10-17")).unwrap(), 1);

        let paged = MealLog::list(&conn, None, None, 1, 1).unwrap();
        assert_eq!(paged[0].date, "2026-10-18");
    }

    #[test]
    fn test_delete_cascades_items() {
        let conn = setup();
        let log = MealLog::create(&conn, &lunch("2026-10-19")).unwrap();

        assert!(MealLog::delete(&conn, log.id).unwrap());
        assert!(!MealLog::delete(&conn, log.id).unwrap());
        assert!(MealLog::get_by_id(&conn, log.id).unwrap().is_none());

        let items: i64 = conn
            .query_row("SELECT COUNT(*) FROM meal_log_items", [], |row| row.get(0))
            .unwrap();
        assert_eq!(items, 0);
    }

    #[test]
    fn test_delete_many_and_clear() {
        let conn = setup();
        let a = MealLog::create(&conn, &lunch("2026-10-17")).unwrap();
        let b = MealLog::create(&conn, &lunch("2026-10-18")).unwrap();
        MealLog::create(&conn, &lunch("2026-10-19")).unwrap();

        assert_eq!(MealLog::delete_many(&conn, &[a.id, b.id, 999]).unwrap(), 2);
        assert_eq!(MealLog::clear(&conn).unwrap(), 1);
        assert_eq!(MealLog::count(&conn, None, None).unwrap(), 0);
    }

    #[test]
    fn test_meal_type_from_str() {
        assert_eq!(MealType::from_str("Dinner"), MealType::Dinner);
        assert_eq!(MealType::from_str("brunch"), MealType::Unspecified);
    }
}
