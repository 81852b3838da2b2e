// ABOUTME: Publish-once slot holding the shared scoring model snapshot
// ABOUTME: Loads the artifact off the request path; readers never see a partial model
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! # Model Store
//!
//! The store starts empty (`Loading`). A single load builds and validates a
//! [`LoadedModel`] completely, then publishes it into a [`OnceLock`]. From that
//! point every reader gets the same `Arc` without locking. A failed load is
//! published the same way and is terminal until the process restarts.

use super::{LoadedModel, ModelArtifact, ModelError};
use crate::categorizer::{default_bands, ScoreBand};
use crate::errors::ModelUnavailable;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use tokio::fs;
use tokio::task::{self, JoinHandle};
use tracing::{error, info};

/// Lifecycle state of the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "reason", rename_all = "snake_case")]
pub enum ModelStatus {
    /// No model published yet
    Loading,
    /// Model published and serving
    Ready,
    /// Load failed; predictions are refused until restart
    Failed(String),
}

/// Model-info query response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Whether a model is serving
    pub loaded: bool,
    /// Version string of the loaded model
    pub version: Option<String>,
    /// Model family name
    pub model_type: Option<String>,
    /// Number of input columns (0 when not loaded)
    pub feature_count: usize,
    /// Feature columns in model order
    pub feature_names: Vec<String>,
    /// Vocabulary per categorical feature
    pub categorical_vocabularies: BTreeMap<String, Vec<String>>,
    /// Ordered score category table
    pub score_bands: Vec<ScoreBand>,
    /// Store lifecycle state
    pub status: ModelStatus,
}

/// Single-writer, many-reader holder for the scoring model
#[derive(Debug, Default)]
pub struct ModelStore {
    slot: OnceLock<Result<Arc<LoadedModel>, String>>,
}

impl ModelStore {
    /// Create an empty store
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slot: OnceLock::new(),
        }
    }

    /// Validate an artifact and publish it as the serving model.
    ///
    /// A validation failure is published as the store's terminal failure.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::AlreadyPublished`] if the store is no longer
    /// empty, or the validation error for a bad artifact
    pub fn publish(&self, artifact: ModelArtifact) -> Result<Arc<LoadedModel>, ModelError> {
        if self.slot.get().is_some() {
            return Err(ModelError::AlreadyPublished);
        }
        match LoadedModel::from_artifact(artifact) {
            Ok(model) => self.publish_model(model),
            Err(e) => {
                self.record_failure(&e);
                Err(e)
            }
        }
    }

    /// Publish an already-validated model
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::AlreadyPublished`] if the store is no longer empty
    pub fn publish_model(&self, model: LoadedModel) -> Result<Arc<LoadedModel>, ModelError> {
        let model = Arc::new(model);
        self.slot
            .set(Ok(Arc::clone(&model)))
            .map_err(|_| ModelError::AlreadyPublished)?;

        info!(
            model.version = %model.version(),
            model.feature_count = model.metadata().feature_count(),
            model.trees = model.tree_count(),
            "Scoring model published"
        );
        Ok(model)
    }

    /// Read, parse, validate, and publish the artifact at `path`.
    ///
    /// File I/O is async; parsing and validation run on the blocking pool
    /// so large artifacts never stall the runtime.
    ///
    /// # Errors
    ///
    /// Returns the read, parse, or validation error; the failure is also
    /// recorded in the store
    pub async fn load_from_path(
        &self,
        path: impl AsRef<Path>,
    ) -> Result<Arc<LoadedModel>, ModelError> {
        let path = path.as_ref().to_path_buf();
        if self.slot.get().is_some() {
            return Err(ModelError::AlreadyPublished);
        }

        let read = fs::read_to_string(&path).await;
        let built = match read {
            Ok(json) => task::spawn_blocking(move || {
                ModelArtifact::from_json(&json).and_then(LoadedModel::from_artifact)
            })
            .await
            .unwrap_or_else(|e| Err(ModelError::Task(e.to_string()))),
            Err(source) => Err(ModelError::Io { path, source }),
        };

        match built {
            Ok(model) => self.publish_model(model),
            Err(e) => {
                self.record_failure(&e);
                Err(e)
            }
        }
    }

    /// Start loading `path` in the background
    pub fn spawn_load(self: &Arc<Self>, path: PathBuf) -> JoinHandle<()> {
        let store = Arc::clone(self);
        tokio::spawn(async move {
            info!(model.path = %path.display(), "Loading scoring model");
            // Outcome is recorded in the store; callers observe it through status()
            let _ = store.load_from_path(&path).await;
        })
    }

    /// The serving model
    ///
    /// A failed load is never replaced in this process, so a retry after
    /// [`ModelStatus::Failed`] only succeeds once the service restarts with
    /// a valid artifact.
    ///
    /// # Errors
    ///
    /// Returns [`ModelUnavailable`] while loading or after a failed load
    pub fn current(&self) -> Result<Arc<LoadedModel>, ModelUnavailable> {
        match self.slot.get() {
            Some(Ok(model)) => Ok(Arc::clone(model)),
            Some(Err(reason)) => Err(ModelUnavailable::new(format!(
                "model failed to load: {reason}; retry after restart"
            ))),
            None => Err(ModelUnavailable::new("model is still loading")),
        }
    }

    /// Lifecycle state
    #[must_use]
    pub fn status(&self) -> ModelStatus {
        match self.slot.get() {
            Some(Ok(_)) => ModelStatus::Ready,
            Some(Err(reason)) => ModelStatus::Failed(reason.clone()),
            None => ModelStatus::Loading,
        }
    }

    /// Whether a model is serving
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        matches!(self.slot.get(), Some(Ok(_)))
    }

    /// Model-info query response
    #[must_use]
    pub fn info(&self) -> ModelInfo {
        let status = self.status();
        let Ok(model) = self.current() else {
            return ModelInfo {
                loaded: false,
                version: None,
                model_type: None,
                feature_count: 0,
                feature_names: Vec::new(),
                categorical_vocabularies: BTreeMap::new(),
                score_bands: default_bands(),
                status,
            };
        };

        let metadata = model.metadata();
        ModelInfo {
            loaded: true,
            version: Some(metadata.version.clone()),
            model_type: Some(metadata.model_type.clone()),
            feature_count: metadata.feature_count(),
            feature_names: metadata
                .feature_order
                .iter()
                .map(|feature| feature.name().to_owned())
                .collect(),
            categorical_vocabularies: metadata.vocabularies.to_name_map(),
            score_bands: metadata.bands.clone(),
            status,
        }
    }

    fn record_failure(&self, failure: &ModelError) {
        error!(error = %failure, "Scoring model failed to load");
        // A model published concurrently wins; the failure is then moot
        let _ = self.slot.set(Err(failure.to_string()));
    }
}
