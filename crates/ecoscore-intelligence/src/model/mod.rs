// ABOUTME: Gradient-boosted eco score model: artifact format, validation, and inference
// ABOUTME: A LoadedModel is immutable once built and shared read-only across predictions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! # Score Model
//!
//! The model is consumed as a fixed JSON artifact: an ordered feature list,
//! the categorical vocabularies used to encode it, and a set of weighted
//! regression trees. Inference is `base_score + Σ weight * leaf`.
//!
//! [`LoadedModel::from_artifact`] performs every structural check up front,
//! so evaluation itself cannot fail.

/// Publish-once model slot
pub mod store;
/// Regression trees
pub mod tree;
/// Categorical vocabularies
pub mod vocabulary;

pub use store::{ModelInfo, ModelStatus, ModelStore};
pub use tree::{Node, Tree};
pub use vocabulary::{CategoricalVocabulary, Vocabularies};

use crate::categorizer::{default_bands, ScoreBand, ScoreCategorizer};
use crate::config::ConfigError;
use ecoscore_core::errors::AppError;
use ecoscore_core::models::Feature;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Artifact format version understood by this build
pub const FORMAT_VERSION: u32 = 1;

/// Model type reported when the artifact does not name one
pub const DEFAULT_MODEL_TYPE: &str = "gradient_boosted_trees";

/// Errors raised while loading or validating a model artifact
#[derive(Debug, Error)]
pub enum ModelError {
    /// Artifact could not be read
    #[error("Failed to read model artifact {path}: {source}")]
    Io {
        /// Artifact location
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: io::Error,
    },

    /// Artifact is not valid JSON for the expected schema
    #[error("Failed to parse model artifact: {0}")]
    Parse(#[from] serde_json::Error),

    /// Artifact written by an incompatible exporter
    #[error("Unsupported model format version {0} (expected {FORMAT_VERSION})")]
    UnsupportedFormat(u32),

    /// Feature list names something the pipeline cannot resolve
    #[error("Unknown feature '{0}' in model artifact")]
    UnknownFeature(String),

    /// Feature listed twice
    #[error("Duplicate feature '{0}' in model artifact")]
    DuplicateFeature(String),

    /// Categorical vocabulary is missing or malformed
    #[error("Invalid vocabulary for '{feature}': {reason}")]
    InvalidVocabulary {
        /// Feature the vocabulary belongs to
        feature: String,
        /// What is wrong with it
        reason: String,
    },

    /// Tree structure is unusable
    #[error("Invalid tree {index}: {reason}")]
    InvalidTree {
        /// Position in the artifact's tree list
        index: usize,
        /// First structural problem found
        reason: String,
    },

    /// A scalar parameter is NaN or infinite
    #[error("Model parameter '{0}' is not finite")]
    NonFinite(&'static str),

    /// Score band table does not tile the score domain
    #[error(transparent)]
    Bands(#[from] ConfigError),

    /// The store already holds a model or a load failure
    #[error("A model has already been published")]
    AlreadyPublished,

    /// Background load task did not complete
    #[error("Model load task failed: {0}")]
    Task(String),
}

impl From<ModelError> for AppError {
    fn from(error: ModelError) -> Self {
        Self::service_unavailable(error.to_string()).with_source(error)
    }
}

/// On-disk model artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    /// Artifact schema version
    pub format_version: u32,
    /// Version string of the trained model
    pub model_version: String,
    /// Model family name
    #[serde(default = "default_model_type")]
    pub model_type: String,
    /// Feature columns in model order
    pub feature_names: Vec<String>,
    /// Ordered vocabulary per categorical feature
    #[serde(default)]
    pub categorical_vocabularies: BTreeMap<String, Vec<String>>,
    /// Starting score before tree contributions
    pub base_score: f64,
    /// Weighted regression trees
    pub trees: Vec<Tree>,
    /// Category band table; the default table is used when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score_bands: Option<Vec<ScoreBand>>,
}

fn default_model_type() -> String {
    DEFAULT_MODEL_TYPE.to_owned()
}

impl ModelArtifact {
    /// Build an artifact over the full feature catalog with built-in vocabularies
    pub fn new(model_version: impl Into<String>, base_score: f64, trees: Vec<Tree>) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            model_version: model_version.into(),
            model_type: default_model_type(),
            feature_names: Feature::ALL
                .iter()
                .map(|feature| feature.name().to_owned())
                .collect(),
            categorical_vocabularies: Vocabularies::defaults().to_name_map(),
            base_score,
            trees,
            score_bands: None,
        }
    }

    /// Parse an artifact from JSON text
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Parse`] if the text does not match the schema
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Immutable description of a loaded model
#[derive(Debug, Clone, PartialEq)]
pub struct ModelMetadata {
    /// Version string of the trained model
    pub version: String,
    /// Model family name
    pub model_type: String,
    /// Feature columns in model order
    pub feature_order: Vec<Feature>,
    /// Vocabulary for every categorical feature
    pub vocabularies: Vocabularies,
    /// Ordered category band table
    pub bands: Vec<ScoreBand>,
}

impl ModelMetadata {
    /// Number of input columns the model expects
    #[must_use]
    pub fn feature_count(&self) -> usize {
        self.feature_order.len()
    }
}

/// Validated, ready-to-evaluate model
#[derive(Debug, Clone)]
pub struct LoadedModel {
    metadata: ModelMetadata,
    base_score: f64,
    trees: Vec<Tree>,
    categorizer: ScoreCategorizer,
}

impl LoadedModel {
    /// Validate an artifact and build the model from it
    ///
    /// # Errors
    ///
    /// Returns a [`ModelError`] describing the first problem found in the
    /// format version, feature list, vocabularies, trees, or band table
    pub fn from_artifact(artifact: ModelArtifact) -> Result<Self, ModelError> {
        if artifact.format_version != FORMAT_VERSION {
            return Err(ModelError::UnsupportedFormat(artifact.format_version));
        }
        if !artifact.base_score.is_finite() {
            return Err(ModelError::NonFinite("base_score"));
        }

        let feature_order = parse_feature_order(&artifact.feature_names)?;
        let vocabularies = parse_vocabularies(&artifact.categorical_vocabularies)?;

        let feature_count = feature_order.len();
        for (index, tree) in artifact.trees.iter().enumerate() {
            tree.validate(feature_count)
                .map_err(|reason| ModelError::InvalidTree { index, reason })?;
        }

        let bands = artifact.score_bands.unwrap_or_else(default_bands);
        let categorizer = ScoreCategorizer::new(bands.clone())?;

        Ok(Self {
            metadata: ModelMetadata {
                version: artifact.model_version,
                model_type: artifact.model_type,
                feature_order,
                vocabularies,
                bands,
            },
            base_score: artifact.base_score,
            trees: artifact.trees,
            categorizer,
        })
    }

    /// Model metadata
    #[must_use]
    pub const fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }

    /// Vocabularies used to validate and encode categorical input
    #[must_use]
    pub const fn vocabularies(&self) -> &Vocabularies {
        &self.metadata.vocabularies
    }

    /// Categorizer built from the model's band table
    #[must_use]
    pub const fn categorizer(&self) -> &ScoreCategorizer {
        &self.categorizer
    }

    /// Version string of the trained model
    #[must_use]
    pub fn version(&self) -> &str {
        &self.metadata.version
    }

    /// Number of trees in the ensemble
    #[must_use]
    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }

    /// Unbounded regressor output for an encoded feature vector
    #[must_use]
    pub fn raw_score(&self, features: &[f64]) -> f64 {
        self.base_score
            + self
                .trees
                .iter()
                .map(|tree| tree.evaluate(features))
                .sum::<f64>()
    }
}

fn parse_feature_order(names: &[String]) -> Result<Vec<Feature>, ModelError> {
    let mut seen = HashSet::with_capacity(names.len());
    names
        .iter()
        .map(|name| {
            let feature =
                Feature::from_name(name).ok_or_else(|| ModelError::UnknownFeature(name.clone()))?;
            if !seen.insert(feature) {
                return Err(ModelError::DuplicateFeature(name.clone()));
            }
            Ok(feature)
        })
        .collect()
}

// Categorical features the artifact omits keep their built-in vocabulary so
// request validation still has something to check against.
fn parse_vocabularies(raw: &BTreeMap<String, Vec<String>>) -> Result<Vocabularies, ModelError> {
    let mut vocabularies = Vocabularies::defaults();

    for (name, values) in raw {
        let invalid = |reason: &str| ModelError::InvalidVocabulary {
            feature: name.clone(),
            reason: reason.to_owned(),
        };

        let feature = Feature::from_name(name).ok_or_else(|| invalid("unknown feature"))?;
        if !feature.is_categorical() {
            return Err(invalid("feature is not categorical"));
        }
        if values.is_empty() {
            return Err(invalid("vocabulary is empty"));
        }
        let unique: HashSet<&String> = values.iter().collect();
        if unique.len() != values.len() {
            return Err(invalid("vocabulary has duplicate values"));
        }
        let default_member = feature
            .default_value()
            .and_then(|value| value.as_category().map(ToOwned::to_owned));
        if let Some(default) = default_member {
            if !values.contains(&default) {
                return Err(invalid(&format!(
                    "vocabulary must contain the default value '{default}'"
                )));
            }
        }

        vocabularies.insert(feature, CategoricalVocabulary::new(values.iter().cloned()));
    }

    Ok(vocabularies)
}
