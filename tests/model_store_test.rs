// ABOUTME: Integration tests for loading model artifacts from disk into the model store
// ABOUTME: Covers the bundled artifact, background loading, and terminal load failures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::{bundled_model_path, create_prediction_service, init_test_logging, test_artifact};
use ecoscore_core::models::PredictionRequest;
use ecoscore_intelligence::{ModelError, ModelStatus, ModelStore};
use ecoscore_server::errors::ErrorCode;
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;
use uuid::Uuid;

#[tokio::test]
async fn test_bundled_artifact_loads_and_scores() {
    init_test_logging();
    let store = Arc::new(ModelStore::new());
    let model = store.load_from_path(bundled_model_path()).await.unwrap();

    assert_eq!(model.version(), "eco-gbt-2025.03");
    assert_eq!(model.tree_count(), 8);

    let info = store.info();
    assert!(info.loaded);
    assert_eq!(info.status, ModelStatus::Ready);
    assert_eq!(info.feature_count, 29);
    assert_eq!(info.feature_names.last().map(String::as_str), Some("total_distance"));
    assert_eq!(info.score_bands.len(), 5);

    let (_db, service) = create_prediction_service(store).await.unwrap();
    let response = service
        .predict(Uuid::new_v4(), &PredictionRequest::default())
        .await
        .unwrap();
    // 60 + 5 - 8 + 3 - 4 - 3 + 2 + 2 + 0.5
    assert!((response.score - 57.5).abs() < 1e-9);
    assert_eq!(response.category, "Fair");
}

#[tokio::test]
async fn test_artifact_written_to_disk_round_trips() {
    init_test_logging();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("model.json");
    fs::write(&path, serde_json::to_string(&test_artifact()).unwrap()).unwrap();

    let store = ModelStore::new();
    let model = store.load_from_path(&path).await.unwrap();
    assert_eq!(model.version(), common::TEST_MODEL_VERSION);
    assert_eq!(model.tree_count(), 2);
}

#[tokio::test]
async fn test_invalid_artifact_fails_terminally() {
    init_test_logging();
    let dir = TempDir::new().unwrap();
    let bad = dir.path().join("bad.json");
    fs::write(&bad, r#"{"format_version": 1, "model_version": "x""#).unwrap();
    let good = dir.path().join("good.json");
    fs::write(&good, serde_json::to_string(&test_artifact()).unwrap()).unwrap();

    let store = Arc::new(ModelStore::new());
    assert!(matches!(
        store.load_from_path(&bad).await,
        Err(ModelError::Parse(_))
    ));
    assert!(matches!(store.status(), ModelStatus::Failed(_)));

    // A later good artifact does not replace the failure
    assert!(matches!(
        store.load_from_path(&good).await,
        Err(ModelError::AlreadyPublished)
    ));
    assert!(!store.is_loaded());

    let (_db, service) = create_prediction_service(store).await.unwrap();
    let error = service
        .predict(Uuid::new_v4(), &PredictionRequest::default())
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::ServiceUnavailable);
    assert!(error.message.contains("failed to load"));
    assert!(error.message.contains("retry after restart"));
}

#[tokio::test]
async fn test_background_load_publishes() {
    init_test_logging();
    let store = Arc::new(ModelStore::new());
    assert_eq!(store.status(), ModelStatus::Loading);

    store.spawn_load(bundled_model_path()).await.unwrap();

    assert!(store.is_loaded());
    assert_eq!(store.current().unwrap().version(), "eco-gbt-2025.03");
}

#[tokio::test]
async fn test_model_status_serializes_with_reason() {
    let store = ModelStore::new();
    store
        .load_from_path("/nonexistent/eco_score_model.json")
        .await
        .unwrap_err();

    let json = serde_json::to_value(store.info()).unwrap();
    assert_eq!(json["loaded"], false);
    assert_eq!(json["status"]["state"], "failed");
    assert!(json["status"]["reason"]
        .as_str()
        .unwrap()
        .contains("eco_score_model.json"));
}
