// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides an in-memory database, a small deterministic model, and wired services
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used,
    clippy::expect_used
)]
//! Shared test utilities for `ecoscore_server`
//!
//! The test model is small enough to score by hand:
//! `60 + (car_km <= 20 ? 5 : -20) + (diet_type == omnivore ? -10 : 10)`.

use anyhow::Result;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use ecoscore_core::models::Feature;
use ecoscore_intelligence::model::{Node, Tree};
use ecoscore_intelligence::{ModelArtifact, ModelStore, RecommendationEngine};
use ecoscore_server::database::Database;
use ecoscore_server::services::PredictionService;
use std::path::PathBuf;
use std::sync::{Arc, Once};

static INIT_LOGGER: Once = Once::new();

/// Version string of the test model
pub const TEST_MODEL_VERSION: &str = "test-model-1";

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        // TEST_LOG controls the level; tests are quiet by default
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            Ok("WARN" | "ERROR") | _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Standard test database setup
pub async fn create_test_database() -> Result<Database> {
    init_test_logging();
    Ok(Database::in_memory().await?)
}

/// Model column of a feature in the full catalog order
pub fn column(feature: Feature) -> i32 {
    let position = Feature::ALL
        .iter()
        .position(|candidate| *candidate == feature)
        .expect("feature in catalog");
    i32::try_from(position).expect("column fits in i32")
}

/// Two-stump artifact scored by car distance and diet
pub fn test_artifact() -> ModelArtifact {
    ModelArtifact::new(
        TEST_MODEL_VERSION,
        60.0,
        vec![
            Tree::new(
                vec![
                    Node::split(column(Feature::CarKm), 20.0, 1, 2),
                    Node::leaf(5.0),
                    Node::leaf(-20.0),
                ],
                1.0,
            ),
            Tree::new(
                vec![
                    Node::split(column(Feature::DietType), 0.5, 1, 2),
                    Node::leaf(-10.0),
                    Node::leaf(10.0),
                ],
                1.0,
            ),
        ],
    )
}

/// Store with the test model already published
pub fn loaded_store() -> Arc<ModelStore> {
    let store = Arc::new(ModelStore::new());
    store.publish(test_artifact()).expect("test artifact is valid");
    store
}

/// Prediction service over a fresh in-memory database
pub async fn create_prediction_service(
    models: Arc<ModelStore>,
) -> Result<(Database, PredictionService)> {
    let database = create_test_database().await?;
    let service = PredictionService::new(models, &database, RecommendationEngine::default());
    Ok((database, service))
}

/// The artifact shipped in `models/`
pub fn bundled_model_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("models/eco_score_model.json")
}

/// Calendar date shorthand
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

/// UTC timestamp shorthand
pub fn at(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, 0, 0)
        .single()
        .expect("valid timestamp")
}
