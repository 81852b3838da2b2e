// ABOUTME: Dashboard aggregation over prediction history and today's daily log
// ABOUTME: Builds the sparse score trend, today's summary, and lifetime counts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use crate::database::{
    DailyLogRepository, DailyLogRepositoryImpl, Database, PredictionRepository,
    PredictionRepositoryImpl, ProfileRepository, ProfileRepositoryImpl,
};
use crate::errors::AppResult;
use async_trait::async_trait;
use chrono::{Days, NaiveDate};
use ecoscore_core::constants::limits;
use ecoscore_core::models::DailyScore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Source of trip counts, owned by the travel-tracking collaborator
#[async_trait]
pub trait TripCounter: Send + Sync {
    /// Trips the user recorded on `date`
    async fn trips_on(&self, user_id: Uuid, date: NaiveDate) -> AppResult<u32>;
}

/// Trip counter for deployments without travel tracking; always zero
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTripTracking;

#[async_trait]
impl TripCounter for NoTripTracking {
    async fn trips_on(&self, _user_id: Uuid, _date: NaiveDate) -> AppResult<u32> {
        Ok(0)
    }
}

/// Today's activity summary
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TodaySummary {
    /// Sum of all travel distances logged today (km)
    pub total_distance: f64,
    /// Meals logged today across every meal category
    pub meals_logged: f64,
    /// Whether the user recycled today
    pub recycled: bool,
}

/// Dashboard query response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardOverview {
    /// Whether the user has saved a profile
    pub profile_complete: bool,
    /// Most recent score, if any prediction exists
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_score: Option<f64>,
    /// Summary of today's daily log
    pub today: TodaySummary,
    /// Average score per day over the trend window, oldest first; days
    /// without predictions are omitted
    pub trend: Vec<DailyScore>,
    /// Lifetime number of predictions
    pub prediction_count: u64,
    /// Trips recorded today
    pub trip_count: u32,
}

/// Read-only dashboard aggregation
#[derive(Clone)]
pub struct DashboardService {
    profiles: Arc<dyn ProfileRepository>,
    daily_logs: Arc<dyn DailyLogRepository>,
    predictions: Arc<dyn PredictionRepository>,
    trips: Arc<dyn TripCounter>,
    trend_days: u32,
}

impl DashboardService {
    /// Service backed by the `SQLite` repositories with a 7-day trend
    #[must_use]
    pub fn new(database: &Database, trips: Arc<dyn TripCounter>) -> Self {
        Self::with_repositories(
            Arc::new(ProfileRepositoryImpl::new(database.clone())),
            Arc::new(DailyLogRepositoryImpl::new(database.clone())),
            Arc::new(PredictionRepositoryImpl::new(database.clone())),
            trips,
        )
    }

    /// Service over explicit repository implementations
    #[must_use]
    pub fn with_repositories(
        profiles: Arc<dyn ProfileRepository>,
        daily_logs: Arc<dyn DailyLogRepository>,
        predictions: Arc<dyn PredictionRepository>,
        trips: Arc<dyn TripCounter>,
    ) -> Self {
        Self {
            profiles,
            daily_logs,
            predictions,
            trips,
            trend_days: limits::DEFAULT_TREND_DAYS,
        }
    }

    /// Override the trend window (days, today included; at least 1)
    #[must_use]
    pub fn with_trend_days(mut self, trend_days: u32) -> Self {
        self.trend_days = trend_days.max(1);
        self
    }

    /// Dashboard for `user_id` as of `today`
    ///
    /// # Errors
    ///
    /// Returns an error if a repository or the trip counter fails
    pub async fn dashboard(&self, user_id: Uuid, today: NaiveDate) -> AppResult<DashboardOverview> {
        let profile_complete = self.profiles.get(user_id).await?.is_some();

        let today_summary = self
            .daily_logs
            .get(user_id, today)
            .await?
            .map(|log| TodaySummary {
                total_distance: log.total_distance(),
                meals_logged: log.meals_logged(),
                recycled: log.recycled == Some(true),
            })
            .unwrap_or_default();

        let from = today
            .checked_sub_days(Days::new(u64::from(self.trend_days - 1)))
            .unwrap_or(NaiveDate::MIN);
        let trend = self
            .predictions
            .daily_average_scores(user_id, from, today)
            .await?;

        let latest_score = self
            .predictions
            .latest(user_id)
            .await?
            .map(|record| record.score);
        let prediction_count = self.predictions.count(user_id).await?;
        let trip_count = self.trips.trips_on(user_id, today).await?;

        debug!(
            user.id = %user_id,
            dashboard.trend_points = trend.len(),
            dashboard.prediction_count = prediction_count,
            "Dashboard assembled"
        );

        Ok(DashboardOverview {
            profile_complete,
            latest_score,
            today: today_summary,
            trend,
            prediction_count,
            trip_count,
        })
    }
}
