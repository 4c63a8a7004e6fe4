//! Daily analysis quota
//!
//! Limits how many food analyses run per calendar day. The counter store is
//! injected so the quota works against SQLite in the server and in memory in
//! tests.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use crate::db::{Database, DbError};
use crate::models::AnalysisCount;

#[derive(Debug, Error)]
pub enum QuotaError {
    #[error("Daily analysis limit of {limit} reached for {date}")]
    Exhausted { date: NaiveDate, limit: u32 },

    #[error("Analysis counter unavailable: {0}")]
    Store(String),
}

impl From<DbError> for QuotaError {
    fn from(e: DbError) -> Self {
        QuotaError::Store(e.to_string())
    }
}

/// Storage for per-day analysis counts
pub trait AnalysisCounter: Send + Sync {
    fn count(&self, date: NaiveDate) -> Result<u32, QuotaError>;

    /// Atomically add one for `date` unless the count has reached `limit`.
    /// Returns the new count, or `None` at the limit.
    fn increment_if_below(&self, date: NaiveDate, limit: u32) -> Result<Option<u32>, QuotaError>;
}

fn day_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Counter backed by the `analysis_counts` table
pub struct SqliteAnalysisCounter {
    database: Database,
}

impl SqliteAnalysisCounter {
    pub fn new(database: Database) -> Self {
        Self { database }
    }
}

impl AnalysisCounter for SqliteAnalysisCounter {
    fn count(&self, date: NaiveDate) -> Result<u32, QuotaError> {
        Ok(self.database.with_conn(|conn| AnalysisCount::get(conn, &day_key(date)))?)
    }

    fn increment_if_below(&self, date: NaiveDate, limit: u32) -> Result<Option<u32>, QuotaError> {
        Ok(self
            .database
            .with_conn(|conn| AnalysisCount::increment_if_below(conn, &day_key(date), limit))?)
    }
}

/// Counter kept in process memory
#[derive(Default)]
pub struct InMemoryAnalysisCounter {
    counts: Mutex<HashMap<NaiveDate, u32>>,
}

impl AnalysisCounter for InMemoryAnalysisCounter {
    fn count(&self, date: NaiveDate) -> Result<u32, QuotaError> {
        let counts = self
            .counts
            .lock()
            .map_err(|e| QuotaError::Store(e.to_string()))?;
        Ok(counts.get(&date).copied().unwrap_or(0))
    }

    fn increment_if_below(&self, date: NaiveDate, limit: u32) -> Result<Option<u32>, QuotaError> {
        let mut counts = self
            .counts
            .lock()
            .map_err(|e| QuotaError::Store(e.to_string()))?;
        let count = counts.entry(date).or_insert(0);
        if *count >= limit {
            return Ok(None);
        }
        *count += 1;
        Ok(Some(*count))
    }
}

/// Quota state for a day
#[derive(Debug, Clone, Serialize)]
pub struct QuotaStatus {
    pub date: String,
    pub used: u32,
    pub limit: u32,
    pub remaining: u32,
}

/// Per-day analysis limit over an injected counter
pub struct AnalysisQuota {
    counter: Box<dyn AnalysisCounter>,
    limit: u32,
}

impl AnalysisQuota {
    pub fn new(counter: Box<dyn AnalysisCounter>, limit: u32) -> Self {
        Self { counter, limit }
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn status(&self, date: NaiveDate) -> Result<QuotaStatus, QuotaError> {
        let used = self.counter.count(date)?;
        Ok(QuotaStatus {
            date: day_key(date),
            used,
            limit: self.limit,
            remaining: self.limit.saturating_sub(used),
        })
    }

    pub fn remaining(&self, date: NaiveDate) -> Result<u32, QuotaError> {
        Ok(self.status(date)?.remaining)
    }

    /// Use one analysis for `date`, failing once the limit is reached
    pub fn try_consume(&self, date: NaiveDate) -> Result<QuotaStatus, QuotaError> {
        match self.counter.increment_if_below(date, self.limit)? {
            Some(used) => Ok(QuotaStatus {
                date: day_key(date),
                used,
                limit: self.limit,
                remaining: self.limit.saturating_sub(used),
            }),
            None => {
                tracing::warn!(%date, limit = self.limit, "daily analysis limit reached");
                Err(QuotaError::Exhausted { date, limit: self.limit })
            }
        }
    }
}
