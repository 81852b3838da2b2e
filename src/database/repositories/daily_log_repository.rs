// ABOUTME: SQLite implementation of the daily log repository
// ABOUTME: Upserts merge field by field so partial updates never erase earlier data
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use super::DailyLogRepository;
use crate::database::{
    format_timestamp, parse_date, parse_timestamp, parse_uuid, Database, DatabaseError,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use ecoscore_core::models::DailyLog;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

const TABLE: &str = "daily_logs";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// `SQLite` implementation of `DailyLogRepository`
#[derive(Debug, Clone)]
pub struct DailyLogRepositoryImpl {
    db: Database,
}

impl DailyLogRepositoryImpl {
    /// Create a new `DailyLogRepository` with the given database connection
    #[must_use]
    pub const fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl DailyLogRepository for DailyLogRepositoryImpl {
    async fn get(&self, user_id: Uuid, date: NaiveDate) -> Result<Option<DailyLog>, DatabaseError> {
        let row = sqlx::query(
            r"
            SELECT * FROM daily_logs
            WHERE user_id = $1 AND log_date = $2
            ",
        )
        .bind(user_id.to_string())
        .bind(date.format(DATE_FORMAT).to_string())
        .fetch_optional(self.db.pool())
        .await
        .map_err(|e| DatabaseError::query(format!("Failed to get daily log: {e}")))?;

        row.map(|r| row_to_daily_log(&r)).transpose()
    }

    async fn upsert(&self, log: &DailyLog) -> Result<DailyLog, DatabaseError> {
        sqlx::query(
            r"
            INSERT INTO daily_logs (
                user_id, log_date, car_km, bus_km, train_km, bike_km, walk_km, flight_km,
                electricity_kwh, heating_kwh, meat_meals, vegetarian_meals, vegan_meals,
                screen_time_hours, outdoor_hours, waste_bags, recycled, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
            ON CONFLICT(user_id, log_date) DO UPDATE SET
                car_km = COALESCE(excluded.car_km, daily_logs.car_km),
                bus_km = COALESCE(excluded.bus_km, daily_logs.bus_km),
                train_km = COALESCE(excluded.train_km, daily_logs.train_km),
                bike_km = COALESCE(excluded.bike_km, daily_logs.bike_km),
                walk_km = COALESCE(excluded.walk_km, daily_logs.walk_km),
                flight_km = COALESCE(excluded.flight_km, daily_logs.flight_km),
                electricity_kwh = COALESCE(excluded.electricity_kwh, daily_logs.electricity_kwh),
                heating_kwh = COALESCE(excluded.heating_kwh, daily_logs.heating_kwh),
                meat_meals = COALESCE(excluded.meat_meals, daily_logs.meat_meals),
                vegetarian_meals = COALESCE(excluded.vegetarian_meals, daily_logs.vegetarian_meals),
                vegan_meals = COALESCE(excluded.vegan_meals, daily_logs.vegan_meals),
                screen_time_hours = COALESCE(excluded.screen_time_hours, daily_logs.screen_time_hours),
                outdoor_hours = COALESCE(excluded.outdoor_hours, daily_logs.outdoor_hours),
                waste_bags = COALESCE(excluded.waste_bags, daily_logs.waste_bags),
                recycled = COALESCE(excluded.recycled, daily_logs.recycled),
                updated_at = excluded.updated_at
            ",
        )
        .bind(log.user_id.to_string())
        .bind(log.date.format(DATE_FORMAT).to_string())
        .bind(log.car_km)
        .bind(log.bus_km)
        .bind(log.train_km)
        .bind(log.bike_km)
        .bind(log.walk_km)
        .bind(log.flight_km)
        .bind(log.electricity_kwh)
        .bind(log.heating_kwh)
        .bind(log.meat_meals)
        .bind(log.vegetarian_meals)
        .bind(log.vegan_meals)
        .bind(log.screen_time_hours)
        .bind(log.outdoor_hours)
        .bind(log.waste_bags)
        .bind(log.recycled)
        .bind(format_timestamp(log.updated_at))
        .execute(self.db.pool())
        .await
        .map_err(|e| DatabaseError::query(format!("Failed to upsert daily log: {e}")))?;

        self.get(log.user_id, log.date)
            .await?
            .ok_or_else(|| DatabaseError::query("Daily log missing after upsert"))
    }

    async fn list_range(
        &self,
        user_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<DailyLog>, DatabaseError> {
        let rows = sqlx::query(
            r"
            SELECT * FROM daily_logs
            WHERE user_id = $1 AND log_date >= $2 AND log_date <= $3
            ORDER BY log_date ASC
            ",
        )
        .bind(user_id.to_string())
        .bind(from.format(DATE_FORMAT).to_string())
        .bind(to.format(DATE_FORMAT).to_string())
        .fetch_all(self.db.pool())
        .await
        .map_err(|e| DatabaseError::query(format!("Failed to list daily logs: {e}")))?;

        rows.iter().map(row_to_daily_log).collect()
    }
}

/// Convert a database row to a `DailyLog`
fn row_to_daily_log(row: &SqliteRow) -> Result<DailyLog, DatabaseError> {
    let user_id: String = row.try_get("user_id")?;
    let log_date: String = row.try_get("log_date")?;
    let updated_at: String = row.try_get("updated_at")?;

    Ok(DailyLog {
        user_id: parse_uuid(TABLE, &user_id)?,
        date: parse_date(TABLE, &log_date)?,
        car_km: row.try_get("car_km")?,
        bus_km: row.try_get("bus_km")?,
        train_km: row.try_get("train_km")?,
        bike_km: row.try_get("bike_km")?,
        walk_km: row.try_get("walk_km")?,
        flight_km: row.try_get("flight_km")?,
        electricity_kwh: row.try_get("electricity_kwh")?,
        heating_kwh: row.try_get("heating_kwh")?,
        meat_meals: row.try_get("meat_meals")?,
        vegetarian_meals: row.try_get("vegetarian_meals")?,
        vegan_meals: row.try_get("vegan_meals")?,
        screen_time_hours: row.try_get("screen_time_hours")?,
        outdoor_hours: row.try_get("outdoor_hours")?,
        waste_bags: row.try_get("waste_bags")?,
        recycled: row.try_get("recycled")?,
        updated_at: parse_timestamp(TABLE, &updated_at)?,
    })
}
