// ABOUTME: SQLite implementation of the profile repository
// ABOUTME: One row per user; upsert replaces every field but the creation time
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use super::ProfileRepository;
use crate::database::{format_timestamp, parse_timestamp, parse_uuid, Database, DatabaseError};
use async_trait::async_trait;
use ecoscore_core::models::Profile;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

const TABLE: &str = "profiles";

/// `SQLite` implementation of `ProfileRepository`
#[derive(Debug, Clone)]
pub struct ProfileRepositoryImpl {
    db: Database,
}

impl ProfileRepositoryImpl {
    /// Create a new `ProfileRepository` with the given database connection
    #[must_use]
    pub const fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProfileRepository for ProfileRepositoryImpl {
    async fn get(&self, user_id: Uuid) -> Result<Option<Profile>, DatabaseError> {
        let row = sqlx::query(
            r"
            SELECT user_id, household_size, age_group, lifestyle_type, location_type,
                   vehicle_type, fuel_type, diet_type, uses_solar_panels,
                   has_smart_thermostat, renewable_energy_percent, recycles, composts,
                   waste_bag_size, social_activity, created_at, updated_at
            FROM profiles
            WHERE user_id = $1
            ",
        )
        .bind(user_id.to_string())
        .fetch_optional(self.db.pool())
        .await
        .map_err(|e| DatabaseError::query(format!("Failed to get profile: {e}")))?;

        row.map(|r| row_to_profile(&r)).transpose()
    }

    async fn upsert(&self, profile: &Profile) -> Result<Profile, DatabaseError> {
        sqlx::query(
            r"
            INSERT INTO profiles (
                user_id, household_size, age_group, lifestyle_type, location_type,
                vehicle_type, fuel_type, diet_type, uses_solar_panels,
                has_smart_thermostat, renewable_energy_percent, recycles, composts,
                waste_bag_size, social_activity, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            ON CONFLICT(user_id) DO UPDATE SET
                household_size = excluded.household_size,
                age_group = excluded.age_group,
                lifestyle_type = excluded.lifestyle_type,
                location_type = excluded.location_type,
                vehicle_type = excluded.vehicle_type,
                fuel_type = excluded.fuel_type,
                diet_type = excluded.diet_type,
                uses_solar_panels = excluded.uses_solar_panels,
                has_smart_thermostat = excluded.has_smart_thermostat,
                renewable_energy_percent = excluded.renewable_energy_percent,
                recycles = excluded.recycles,
                composts = excluded.composts,
                waste_bag_size = excluded.waste_bag_size,
                social_activity = excluded.social_activity,
                updated_at = excluded.updated_at
            ",
        )
        .bind(profile.user_id.to_string())
        .bind(profile.household_size)
        .bind(&profile.age_group)
        .bind(&profile.lifestyle_type)
        .bind(&profile.location_type)
        .bind(&profile.vehicle_type)
        .bind(&profile.fuel_type)
        .bind(&profile.diet_type)
        .bind(profile.uses_solar_panels)
        .bind(profile.has_smart_thermostat)
        .bind(profile.renewable_energy_percent)
        .bind(profile.recycles)
        .bind(profile.composts)
        .bind(&profile.waste_bag_size)
        .bind(&profile.social_activity)
        .bind(format_timestamp(profile.created_at))
        .bind(format_timestamp(profile.updated_at))
        .execute(self.db.pool())
        .await
        .map_err(|e| DatabaseError::query(format!("Failed to upsert profile: {e}")))?;

        self.get(profile.user_id)
            .await?
            .ok_or_else(|| DatabaseError::query("Profile missing after upsert"))
    }
}

/// Convert a database row to a `Profile`
fn row_to_profile(row: &SqliteRow) -> Result<Profile, DatabaseError> {
    let user_id: String = row.try_get("user_id")?;
    let created_at: String = row.try_get("created_at")?;
    let updated_at: String = row.try_get("updated_at")?;

    Ok(Profile {
        user_id: parse_uuid(TABLE, &user_id)?,
        household_size: row.try_get("household_size")?,
        age_group: row.try_get("age_group")?,
        lifestyle_type: row.try_get("lifestyle_type")?,
        location_type: row.try_get("location_type")?,
        vehicle_type: row.try_get("vehicle_type")?,
        fuel_type: row.try_get("fuel_type")?,
        diet_type: row.try_get("diet_type")?,
        uses_solar_panels: row.try_get("uses_solar_panels")?,
        has_smart_thermostat: row.try_get("has_smart_thermostat")?,
        renewable_energy_percent: row.try_get("renewable_energy_percent")?,
        recycles: row.try_get("recycles")?,
        composts: row.try_get("composts")?,
        waste_bag_size: row.try_get("waste_bag_size")?,
        social_activity: row.try_get("social_activity")?,
        created_at: parse_timestamp(TABLE, &created_at)?,
        updated_at: parse_timestamp(TABLE, &updated_at)?,
    })
}
