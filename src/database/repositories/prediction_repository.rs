// ABOUTME: SQLite implementation of the append-only prediction history
// ABOUTME: Provides latest-record lookups, counts, range scans, and per-day averages
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use super::PredictionRepository;
use crate::database::{
    format_timestamp, parse_date, parse_timestamp, parse_uuid, start_of_day, Database,
    DatabaseError,
};
use crate::logging::AppLogger;
use async_trait::async_trait;
use chrono::{DateTime, Days, NaiveDate, Utc};
use ecoscore_core::models::{DailyScore, PredictionRecord};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use std::time::Instant;
use uuid::Uuid;

const TABLE: &str = "predictions";

/// `SQLite` implementation of `PredictionRepository`
#[derive(Debug, Clone)]
pub struct PredictionRepositoryImpl {
    db: Database,
}

impl PredictionRepositoryImpl {
    /// Create a new `PredictionRepository` with the given database connection
    #[must_use]
    pub const fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PredictionRepository for PredictionRepositoryImpl {
    async fn append(&self, record: &PredictionRecord) -> Result<(), DatabaseError> {
        let started = Instant::now();
        let features = serde_json::to_string(&record.features).map_err(|e| {
            DatabaseError::InvalidData {
                table: TABLE,
                reason: format!("Unserializable feature set: {e}"),
            }
        })?;

        let result = sqlx::query(
            r"
            INSERT INTO predictions (id, user_id, features, score, confidence, model_version, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(record.id.to_string())
        .bind(record.user_id.to_string())
        .bind(features)
        .bind(record.score)
        .bind(record.confidence)
        .bind(&record.model_version)
        .bind(format_timestamp(record.created_at))
        .execute(self.db.pool())
        .await;

        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        AppLogger::log_database_operation("insert", TABLE, result.is_ok(), elapsed_ms);

        result
            .map(|_| ())
            .map_err(|e| DatabaseError::query(format!("Failed to append prediction: {e}")))
    }

    async fn latest(&self, user_id: Uuid) -> Result<Option<PredictionRecord>, DatabaseError> {
        let row = sqlx::query(
            r"
            SELECT * FROM predictions
            WHERE user_id = $1
            ORDER BY created_at DESC, rowid DESC
            LIMIT 1
            ",
        )
        .bind(user_id.to_string())
        .fetch_optional(self.db.pool())
        .await
        .map_err(|e| DatabaseError::query(format!("Failed to get latest prediction: {e}")))?;

        row.map(|r| row_to_prediction(&r)).transpose()
    }

    async fn latest_before(
        &self,
        user_id: Uuid,
        before: DateTime<Utc>,
    ) -> Result<Option<PredictionRecord>, DatabaseError> {
        let row = sqlx::query(
            r"
            SELECT * FROM predictions
            WHERE user_id = $1 AND created_at < $2
            ORDER BY created_at DESC, rowid DESC
            LIMIT 1
            ",
        )
        .bind(user_id.to_string())
        .bind(format_timestamp(before))
        .fetch_optional(self.db.pool())
        .await
        .map_err(|e| DatabaseError::query(format!("Failed to get previous prediction: {e}")))?;

        row.map(|r| row_to_prediction(&r)).transpose()
    }

    async fn count(&self, user_id: Uuid) -> Result<u64, DatabaseError> {
        let row = sqlx::query("SELECT COUNT(*) AS total FROM predictions WHERE user_id = $1")
            .bind(user_id.to_string())
            .fetch_one(self.db.pool())
            .await
            .map_err(|e| DatabaseError::query(format!("Failed to count predictions: {e}")))?;

        let total: i64 = row.try_get("total")?;
        Ok(u64::try_from(total).unwrap_or_default())
    }

    async fn list_between(
        &self,
        user_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<PredictionRecord>, DatabaseError> {
        let rows = sqlx::query(
            r"
            SELECT * FROM predictions
            WHERE user_id = $1 AND created_at >= $2 AND created_at < $3
            ORDER BY created_at ASC, rowid ASC
            ",
        )
        .bind(user_id.to_string())
        .bind(format_timestamp(from))
        .bind(format_timestamp(to))
        .fetch_all(self.db.pool())
        .await
        .map_err(|e| DatabaseError::query(format!("Failed to list predictions: {e}")))?;

        rows.iter().map(row_to_prediction).collect()
    }

    async fn daily_average_scores(
        &self,
        user_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<DailyScore>, DatabaseError> {
        let Some(end) = to.checked_add_days(Days::new(1)) else {
            return Ok(Vec::new());
        };

        let rows = sqlx::query(
            r"
            SELECT substr(created_at, 1, 10) AS day,
                   AVG(score) AS average_score,
                   COUNT(*) AS prediction_count
            FROM predictions
            WHERE user_id = $1 AND created_at >= $2 AND created_at < $3
            GROUP BY day
            ORDER BY day ASC
            ",
        )
        .bind(user_id.to_string())
        .bind(start_of_day(from))
        .bind(start_of_day(end))
        .fetch_all(self.db.pool())
        .await
        .map_err(|e| DatabaseError::query(format!("Failed to aggregate daily scores: {e}")))?;

        rows.iter()
            .map(|row| -> Result<DailyScore, DatabaseError> {
                let day: String = row.try_get("day")?;
                let prediction_count: i64 = row.try_get("prediction_count")?;
                Ok(DailyScore {
                    date: parse_date(TABLE, &day)?,
                    average_score: row.try_get("average_score")?,
                    prediction_count: u32::try_from(prediction_count).unwrap_or(u32::MAX),
                })
            })
            .collect()
    }
}

/// Convert a database row to a `PredictionRecord`
fn row_to_prediction(row: &SqliteRow) -> Result<PredictionRecord, DatabaseError> {
    let id: String = row.try_get("id")?;
    let user_id: String = row.try_get("user_id")?;
    let features: String = row.try_get("features")?;
    let created_at: String = row.try_get("created_at")?;

    Ok(PredictionRecord {
        id: parse_uuid(TABLE, &id)?,
        user_id: parse_uuid(TABLE, &user_id)?,
        features: serde_json::from_str(&features).map_err(|e| DatabaseError::InvalidData {
            table: TABLE,
            reason: format!("Invalid feature JSON: {e}"),
        })?,
        score: row.try_get("score")?,
        confidence: row.try_get("confidence")?,
        model_version: row.try_get("model_version")?,
        created_at: parse_timestamp(TABLE, &created_at)?,
    })
}
