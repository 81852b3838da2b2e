// ABOUTME: Domain service layer orchestrating the scoring pipeline and dashboards
// ABOUTME: Transport-agnostic; the CLI and any future API surface call into these services
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! Domain service layer
//!
//! Services own no state beyond shared handles: the model store and the
//! repositories. They are cheap to clone.

/// Dashboard aggregation
pub mod dashboard;

/// Prediction pipeline orchestration and profile/log intake
pub mod prediction;

pub use dashboard::{DashboardOverview, DashboardService, NoTripTracking, TodaySummary, TripCounter};
pub use prediction::{PredictionResponse, PredictionService};

use crate::config::ServerConfig;
use crate::database::Database;
use ecoscore_intelligence::{ModelStore, RecommendationEngine};
use std::sync::Arc;

/// Both services wired to one database and model store
#[derive(Clone)]
pub struct Services {
    /// Prediction pipeline
    pub prediction: PredictionService,
    /// Dashboard reads
    pub dashboard: DashboardService,
}

impl Services {
    /// Wire services from configuration; trips are not tracked
    #[must_use]
    pub fn new(config: &ServerConfig, database: &Database, models: Arc<ModelStore>) -> Self {
        Self::with_trip_counter(config, database, models, Arc::new(NoTripTracking))
    }

    /// Wire services with a travel-tracking collaborator
    #[must_use]
    pub fn with_trip_counter(
        config: &ServerConfig,
        database: &Database,
        models: Arc<ModelStore>,
        trips: Arc<dyn TripCounter>,
    ) -> Self {
        let engine = RecommendationEngine::new(config.recommendations.clone());
        Self {
            prediction: PredictionService::new(models, database, engine),
            dashboard: DashboardService::new(database, trips).with_trend_days(config.trend_days),
        }
    }
}
