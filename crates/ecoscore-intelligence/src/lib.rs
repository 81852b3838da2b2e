// ABOUTME: Eco score prediction pipeline: model store, feature resolution, scoring, recommendations
// ABOUTME: Computation-only crate; nothing here performs I/O except the one-time model load
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

#![deny(unsafe_code)]

//! # Eco Score Intelligence
//!
//! The scoring pipeline, leaves first:
//!
//! - **model**: artifact format, validation, and the publish-once [`ModelStore`]
//! - **features**: [`FeatureResolver`] and [`CategoricalEncoder`]
//! - **predictor**: [`ScorePredictor`], bounded to `[0, 100]`
//! - **categorizer**: [`ScoreCategorizer`] band lookup
//! - **`recommendation_engine`**: ranked rule-table suggestions
//!
//! A prediction reads one model snapshot for its whole lifetime, so every
//! stage sees the same vocabularies and trees.

/// Score band lookup
pub mod categorizer;
/// Pipeline configuration
pub mod config;
/// Validation and availability errors
pub mod errors;
/// Feature resolution and encoding
pub mod features;
/// Model artifact, inference, and store
pub mod model;
/// Bounded score prediction
pub mod predictor;
/// Rule-table recommendations
pub mod recommendation_engine;

pub use categorizer::{ScoreBand, ScoreCategorizer};
pub use config::{ConfigError, RecommendationEngineConfig};
pub use errors::{ModelUnavailable, ValidationError};
pub use features::{CategoricalEncoder, EncodedFeatures, FeatureResolver, ResolvedFeatureSet};
pub use model::{LoadedModel, ModelArtifact, ModelError, ModelInfo, ModelStatus, ModelStore};
pub use predictor::ScorePredictor;
pub use recommendation_engine::{Recommendation, RecommendationEngine};
