//! Analysis count model
//!
//! Number of analyses performed on each calendar day.

use rusqlite::{params, Connection, OptionalExtension};

use crate::db::DbResult;

pub struct AnalysisCount;

impl AnalysisCount {
    /// Analyses recorded for `date` (0 when none)
    pub fn get(conn: &Connection, date: &str) -> DbResult<u32> {
        let count: Option<u32> = conn
            .query_row(
                "SELECT count FROM analysis_counts WHERE date = ?1",
                [date],
                |row| row.get(0),
            )
            .optional()?;
        Ok(count.unwrap_or(0))
    }

    /// Record one analysis for `date` only while the count is below `limit`
    ///
    /// Check and increment are a single statement, so concurrent callers
    /// cannot push the count past the limit. Returns the new count, or
    /// `None` when the limit was already reached.
    pub fn increment_if_below(conn: &Connection, date: &str, limit: u32) -> DbResult<Option<u32>> {
        let changed = conn.execute(
            r#"
            INSERT INTO analysis_counts (date, count) SELECT ?1, 1 WHERE ?2 > 0
            ON CONFLICT(date) DO UPDATE SET count = count + 1 WHERE count < ?2
            "#,
            params![date, limit],
        )?;
        if changed == 0 {
            return Ok(None);
        }
        Ok(Some(Self::get(conn, date)?))
    }

    /// Remove counts older than `date`
    pub fn prune_before(conn: &Connection, date: &str) -> DbResult<usize> {
        Ok(conn.execute("DELETE FROM analysis_counts WHERE date < ?1", [date])?)
    }
}
