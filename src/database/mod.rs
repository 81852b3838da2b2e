// ABOUTME: SQLite connection management and schema migrations for eco score data
// ABOUTME: Owns the pool and the profile, daily log, and prediction history tables
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! # Database Management
//!
//! One `SQLite` database holds three tables:
//!
//! - `profiles`: at most one row per user
//! - `daily_logs`: at most one row per `(user_id, log_date)`
//! - `predictions`: append-only history; rows are never updated or deleted
//!
//! Timestamps are stored as fixed-width RFC 3339 UTC strings with nanosecond
//! precision, so ordering by the text column is chronological.

/// Repository traits and their `SQLite` implementations
pub mod repositories;

pub use ecoscore_core::errors::DatabaseError;
pub use repositories::{
    DailyLogRepository, DailyLogRepositoryImpl, PredictionRepository, PredictionRepositoryImpl,
    ProfileRepository, ProfileRepositoryImpl,
};

use crate::config::DatabaseUrl;
use chrono::{DateTime, NaiveDate, NaiveTime, SecondsFormat, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use tokio::fs;
use tracing::{debug, info};
use uuid::Uuid;

/// Database manager for profiles, daily logs, and prediction history
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect and run migrations
    ///
    /// In-memory databases use a single long-lived connection so every query
    /// sees the same data.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection or a migration fails
    pub async fn new(url: &DatabaseUrl) -> Result<Self, DatabaseError> {
        let options = SqliteConnectOptions::from_str(&url.to_connection_string())
            .map_err(|e| DatabaseError::ConnectionError {
                context: format!("Invalid database URL {url}: {e}"),
            })?
            .create_if_missing(true);

        let pool_options = match url {
            DatabaseUrl::Memory => SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None),
            DatabaseUrl::SQLite { path } => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    fs::create_dir_all(parent).await.map_err(|e| {
                        DatabaseError::ConnectionError {
                            context: format!("Failed to create {}: {e}", parent.display()),
                        }
                    })?;
                }
                SqlitePoolOptions::new()
            }
        };

        let pool = pool_options.connect_with(options).await.map_err(|e| {
            DatabaseError::ConnectionError {
                context: format!("Failed to connect to {url}: {e}"),
            }
        })?;

        let db = Self { pool };
        db.migrate().await?;
        info!(database.url = %url, "Database ready");
        Ok(db)
    }

    /// In-memory database, mainly for tests
    ///
    /// # Errors
    ///
    /// Returns an error if the connection or a migration fails
    pub async fn in_memory() -> Result<Self, DatabaseError> {
        Self::new(&DatabaseUrl::Memory).await
    }

    /// Get a reference to the database pool
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create tables and indexes; safe to run repeatedly
    ///
    /// # Errors
    ///
    /// Returns an error if a statement fails
    pub async fn migrate(&self) -> Result<(), DatabaseError> {
        self.migrate_profiles().await?;
        self.migrate_daily_logs().await?;
        self.migrate_predictions().await?;
        debug!("Database migrations complete");
        Ok(())
    }

    async fn migrate_profiles(&self) -> Result<(), DatabaseError> {
        self.execute_migration(
            r"
            CREATE TABLE IF NOT EXISTS profiles (
                user_id TEXT PRIMARY KEY,
                household_size REAL,
                age_group TEXT,
                lifestyle_type TEXT,
                location_type TEXT,
                vehicle_type TEXT,
                fuel_type TEXT,
                diet_type TEXT,
                uses_solar_panels INTEGER,
                has_smart_thermostat INTEGER,
                renewable_energy_percent REAL,
                recycles INTEGER,
                composts INTEGER,
                waste_bag_size TEXT,
                social_activity TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            ",
        )
        .await
    }

    async fn migrate_daily_logs(&self) -> Result<(), DatabaseError> {
        self.execute_migration(
            r"
            CREATE TABLE IF NOT EXISTS daily_logs (
                user_id TEXT NOT NULL,
                log_date TEXT NOT NULL,
                car_km REAL,
                bus_km REAL,
                train_km REAL,
                bike_km REAL,
                walk_km REAL,
                flight_km REAL,
                electricity_kwh REAL,
                heating_kwh REAL,
                meat_meals REAL,
                vegetarian_meals REAL,
                vegan_meals REAL,
                screen_time_hours REAL,
                outdoor_hours REAL,
                waste_bags REAL,
                recycled INTEGER,
                updated_at TEXT NOT NULL,
                PRIMARY KEY (user_id, log_date)
            )
            ",
        )
        .await
    }

    async fn migrate_predictions(&self) -> Result<(), DatabaseError> {
        self.execute_migration(
            r"
            CREATE TABLE IF NOT EXISTS predictions (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                features TEXT NOT NULL,
                score REAL NOT NULL,
                confidence REAL,
                model_version TEXT NOT NULL,
                created_at TEXT NOT NULL
            )
            ",
        )
        .await?;

        self.execute_migration(
            "CREATE INDEX IF NOT EXISTS idx_predictions_user_created ON predictions(user_id, created_at)",
        )
        .await
    }

    async fn execute_migration(&self, statement: &str) -> Result<(), DatabaseError> {
        sqlx::query(statement)
            .execute(&self.pool)
            .await
            .map_err(|e| DatabaseError::MigrationError {
                context: e.to_string(),
            })?;
        Ok(())
    }
}

/// Fixed-width storage form of a timestamp
pub(crate) fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

/// Storage form of midnight UTC at the start of `date`
pub(crate) fn start_of_day(date: NaiveDate) -> String {
    format_timestamp(date.and_time(NaiveTime::MIN).and_utc())
}

/// Parse a stored timestamp
pub(crate) fn parse_timestamp(
    table: &'static str,
    raw: &str,
) -> Result<DateTime<Utc>, DatabaseError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .map_err(|e| DatabaseError::InvalidData {
            table,
            reason: format!("Invalid timestamp {raw}: {e}"),
        })
}

/// Parse a stored calendar date
pub(crate) fn parse_date(table: &'static str, raw: &str) -> Result<NaiveDate, DatabaseError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|e| DatabaseError::InvalidData {
        table,
        reason: format!("Invalid date {raw}: {e}"),
    })
}

/// Parse a stored user id
pub(crate) fn parse_uuid(table: &'static str, raw: &str) -> Result<Uuid, DatabaseError> {
    Uuid::parse_str(raw).map_err(|e| DatabaseError::InvalidData {
        table,
        reason: format!("Invalid id {raw}: {e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_timestamps_are_fixed_width() {
        let whole = Utc.with_ymd_and_hms(2025, 3, 14, 9, 0, 0).unwrap();
        let fractional = whole + Duration::nanoseconds(5);
        let a = format_timestamp(whole);
        let b = format_timestamp(fractional);
        assert_eq!(a.len(), b.len());
        assert!(a < b);
        assert_eq!(parse_timestamp("predictions", &b).unwrap(), fractional);
    }

    #[test]
    fn test_start_of_day_sorts_before_same_day_timestamps() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        let morning = Utc.with_ymd_and_hms(2025, 3, 14, 0, 0, 1).unwrap();
        assert!(start_of_day(date) < format_timestamp(morning));
        assert_eq!(&start_of_day(date)[..10], "2025-03-14");
    }

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let db = Database::in_memory().await.unwrap();
        db.migrate().await.unwrap();
        db.migrate().await.unwrap();
    }
}
