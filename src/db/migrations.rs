//! Database migrations
//!
//! Schema creation and migration logic.

use rusqlite::Connection;

use super::connection::DbResult;

const SCHEMA_VERSION: i32 = 1;

/// Run all migrations to bring the database up to the current schema version
pub fn run_migrations(conn: &Connection) -> DbResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    let current_version = get_schema_version(conn)?;

    if current_version < 1 {
        migrate_v1(conn)?;
        conn.execute("INSERT INTO schema_migrations (version) VALUES (1)", [])?;
        tracing::info!(version = SCHEMA_VERSION, "applied schema migration");
    }

    Ok(())
}

/// Migration v1: meal log and analysis counters
fn migrate_v1(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r#"
        -- ============================================
        -- MEAL LOGS
        -- One logged meal (breakfast, lunch, ...) on a date
        -- ============================================
        CREATE TABLE meal_logs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            date TEXT NOT NULL,                  -- YYYY-MM-DD
            meal_type TEXT NOT NULL CHECK(meal_type IN ('breakfast', 'lunch', 'dinner', 'snack', 'unspecified')),
            notes TEXT,

            -- Cached totals, rounded to 2 decimals
            total_calories REAL NOT NULL DEFAULT 0,
            total_protein REAL NOT NULL DEFAULT 0,
            total_carbs REAL NOT NULL DEFAULT 0,
            total_fat REAL NOT NULL DEFAULT 0,
            total_fiber REAL NOT NULL DEFAULT 0,
            total_sugar REAL NOT NULL DEFAULT 0,
            total_saturated_fat REAL NOT NULL DEFAULT 0,
            total_sodium REAL NOT NULL DEFAULT 0,
            total_cholesterol REAL NOT NULL DEFAULT 0,

            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_meal_logs_date ON meal_logs(date);

        -- ============================================
        -- MEAL LOG ITEMS
        -- Foods eaten in a meal with their scaled nutrition
        -- ============================================
        CREATE TABLE meal_log_items (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            meal_log_id INTEGER NOT NULL REFERENCES meal_logs(id) ON DELETE CASCADE,
            position INTEGER NOT NULL,
            name TEXT NOT NULL,
            source TEXT NOT NULL,
            quantity REAL NOT NULL,
            unit TEXT NOT NULL,

            calories REAL NOT NULL DEFAULT 0,
            protein REAL NOT NULL DEFAULT 0,
            carbs REAL NOT NULL DEFAULT 0,
            fat REAL NOT NULL DEFAULT 0,
            fiber REAL NOT NULL DEFAULT 0,
            sugar REAL NOT NULL DEFAULT 0,
            saturated_fat REAL NOT NULL DEFAULT 0,
            sodium REAL NOT NULL DEFAULT 0,
            cholesterol REAL NOT NULL DEFAULT 0
        );

        CREATE INDEX idx_meal_log_items_meal ON meal_log_items(meal_log_id);

        -- ============================================
        -- ANALYSIS COUNTS
        -- Analyses performed per calendar day
        -- ============================================
        CREATE TABLE analysis_counts (
            date TEXT PRIMARY KEY,               -- YYYY-MM-DD
            count INTEGER NOT NULL DEFAULT 0
        );
        "#,
    )?;

    Ok(())
}

/// Get the current schema version
pub fn get_schema_version(conn: &Connection) -> DbResult<i32> {
    let version: i32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )?;
    Ok(version)
}
