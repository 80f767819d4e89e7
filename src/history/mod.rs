//! Download history and statistics store.
//!
//! One record is appended per top-level download attempt, success or failure,
//! and the bot's `/stats` and `/history` commands read aggregates back out.
//! Appends from concurrent user requests are serialized by the SQLite pool
//! (WAL mode plus busy timeout, see [`db::Database`]).

mod db;

pub use db::{Database, DbError};

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::platform::{DownloadResult, Platform};

/// Errors from the history store.
#[derive(Debug, Error)]
pub enum HistoryError {
    /// A query against the history database failed.
    #[error("history query failed: {0}")]
    Query(#[from] sqlx::Error),
}

/// A new history row, written once per download attempt.
#[derive(Debug, Clone)]
pub struct NewDownloadRecord {
    /// The URL the user submitted.
    pub url: String,
    /// Which platform handled it.
    pub platform: Platform,
    /// Whether the download completed.
    pub success: bool,
    /// Content title, when known.
    pub title: Option<String>,
    /// Downloaded file size in bytes, when known.
    pub file_size: Option<i64>,
    /// Failure message, for failed attempts.
    pub error: Option<String>,
}

/// A stored history row.
#[derive(Debug, Clone, FromRow)]
pub struct DownloadRecord {
    /// Unique identifier.
    pub id: i64,
    /// The URL the user submitted.
    pub url: String,
    /// Platform tag (see [`Platform::as_str`]).
    pub platform: String,
    /// Whether the download completed.
    pub success: bool,
    /// Content title, when known.
    pub title: Option<String>,
    /// Downloaded file size in bytes, when known.
    pub file_size: Option<i64>,
    /// Failure message, for failed attempts.
    pub error: Option<String>,
    /// When the attempt finished (stored as ISO-8601 text).
    pub timestamp: DateTime<Utc>,
}

/// Aggregate download statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadStats {
    /// Total attempts recorded.
    pub total: i64,
    /// Attempts that completed.
    pub successful: i64,
    /// Attempts that failed.
    pub failed: i64,
    /// Successful share of all attempts, in percent (0 when empty).
    pub success_rate: f64,
    /// Attempt counts per platform tag.
    pub by_platform: HashMap<String, i64>,
    /// Total bytes downloaded across all recorded attempts.
    pub total_size_bytes: i64,
}

/// Append-only history store over a [`Database`].
#[derive(Debug, Clone)]
pub struct HistoryStore {
    db: Database,
}

impl HistoryStore {
    /// Wraps an open database.
    #[must_use]
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Appends one attempt record, returning its row id.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError`] when the insert fails.
    #[instrument(skip(self, record), fields(platform = %record.platform, success = record.success))]
    pub async fn record(&self, record: &NewDownloadRecord) -> Result<i64, HistoryError> {
        let result = sqlx::query(
            "INSERT INTO downloads (url, platform, success, title, file_size, error, timestamp) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&record.url)
        .bind(record.platform.as_str())
        .bind(record.success)
        .bind(&record.title)
        .bind(record.file_size)
        .bind(&record.error)
        .bind(Utc::now())
        .execute(self.db.pool())
        .await?;

        let id = result.last_insert_rowid();
        debug!(id, "history record appended");
        Ok(id)
    }

    /// Appends a record derived from a [`DownloadResult`].
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError`] when the insert fails.
    pub async fn record_result(
        &self,
        url: &str,
        platform: Platform,
        result: &DownloadResult,
    ) -> Result<i64, HistoryError> {
        self.record(&NewDownloadRecord {
            url: url.to_string(),
            platform,
            success: result.success,
            title: result.title.clone(),
            file_size: result
                .file_size
                .map(|size| i64::try_from(size).unwrap_or(i64::MAX)),
            error: result.error.clone(),
        })
        .await
    }

    /// Returns the most recent records, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError`] when the query fails.
    #[instrument(skip(self))]
    pub async fn recent(&self, limit: i64) -> Result<Vec<DownloadRecord>, HistoryError> {
        let records = sqlx::query_as::<_, DownloadRecord>(
            "SELECT id, url, platform, success, title, file_size, error, timestamp \
             FROM downloads ORDER BY id DESC LIMIT ?",
        )
        .bind(limit)
        .fetch_all(self.db.pool())
        .await?;
        Ok(records)
    }

    /// Computes aggregate statistics across all recorded attempts.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError`] when a query fails.
    #[instrument(skip(self))]
    pub async fn stats(&self) -> Result<DownloadStats, HistoryError> {
        let (total, successful, total_size_bytes): (i64, i64, i64) = sqlx::query_as(
            "SELECT COUNT(*), COALESCE(SUM(success), 0), \
             COALESCE(SUM(COALESCE(file_size, 0)), 0) FROM downloads",
        )
        .fetch_one(self.db.pool())
        .await?;

        let by_platform: Vec<(String, i64)> = sqlx::query_as(
            "SELECT platform, COUNT(*) FROM downloads GROUP BY platform",
        )
        .fetch_all(self.db.pool())
        .await?;

        #[allow(clippy::cast_precision_loss)]
        let success_rate = if total > 0 {
            successful as f64 / total as f64 * 100.0
        } else {
            0.0
        };

        Ok(DownloadStats {
            total,
            successful,
            failed: total - successful,
            success_rate,
            by_platform: by_platform.into_iter().collect(),
            total_size_bytes,
        })
    }
}
