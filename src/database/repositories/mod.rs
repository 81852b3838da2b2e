// ABOUTME: Repository traits for profiles, daily logs, and prediction history
// ABOUTME: Services depend on these traits; SQLite implementations live alongside
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! Repository pattern for eco score persistence.
//!
//! Entities reference each other by user id only; repositories resolve those
//! ids. Prediction history exposes no update or delete operation.

mod daily_log_repository;
mod prediction_repository;
mod profile_repository;

pub use daily_log_repository::DailyLogRepositoryImpl;
pub use prediction_repository::PredictionRepositoryImpl;
pub use profile_repository::ProfileRepositoryImpl;

use super::DatabaseError;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use ecoscore_core::models::{DailyLog, DailyScore, PredictionRecord, Profile};
use uuid::Uuid;

/// Lifestyle profile storage
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// The user's profile, if one was saved
    async fn get(&self, user_id: Uuid) -> Result<Option<Profile>, DatabaseError>;

    /// Insert or replace the user's profile, keeping the original creation time
    async fn upsert(&self, profile: &Profile) -> Result<Profile, DatabaseError>;
}

/// Day-scoped measurement storage
#[async_trait]
pub trait DailyLogRepository: Send + Sync {
    /// The user's log for one date
    async fn get(&self, user_id: Uuid, date: NaiveDate) -> Result<Option<DailyLog>, DatabaseError>;

    /// Insert or merge a log: present fields overwrite, absent fields are kept
    async fn upsert(&self, log: &DailyLog) -> Result<DailyLog, DatabaseError>;

    /// Logs with `from <= date <= to`, oldest first
    async fn list_range(
        &self,
        user_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<DailyLog>, DatabaseError>;
}

/// Append-only prediction history
#[async_trait]
pub trait PredictionRepository: Send + Sync {
    /// Append one record
    async fn append(&self, record: &PredictionRecord) -> Result<(), DatabaseError>;

    /// Most recent record for the user
    async fn latest(&self, user_id: Uuid) -> Result<Option<PredictionRecord>, DatabaseError>;

    /// Most recent record strictly before `before`
    async fn latest_before(
        &self,
        user_id: Uuid,
        before: DateTime<Utc>,
    ) -> Result<Option<PredictionRecord>, DatabaseError>;

    /// Lifetime number of records for the user
    async fn count(&self, user_id: Uuid) -> Result<u64, DatabaseError>;

    /// Records with `from <= created_at < to`, oldest first
    async fn list_between(
        &self,
        user_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<PredictionRecord>, DatabaseError>;

    /// Mean score per calendar day in `from..=to`, omitting days without predictions
    async fn daily_average_scores(
        &self,
        user_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<DailyScore>, DatabaseError>;
}
