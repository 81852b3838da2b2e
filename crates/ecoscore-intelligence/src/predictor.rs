// ABOUTME: Runs inference against the shared model snapshot and bounds the result
// ABOUTME: Evaluation is read-only, so concurrent predictions share one model without locks
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use crate::errors::ModelUnavailable;
use crate::features::EncodedFeatures;
use crate::model::{LoadedModel, ModelStore};
use ecoscore_core::constants::score::{MAX_SCORE, MIN_SCORE};
use std::sync::Arc;

/// Bound a raw regressor output to the score domain
#[must_use]
pub fn clamp_score(raw: f64) -> f64 {
    if raw.is_nan() {
        MIN_SCORE
    } else {
        raw.clamp(MIN_SCORE, MAX_SCORE)
    }
}

/// Score predictor over one published model
#[derive(Debug, Clone)]
pub struct ScorePredictor {
    model: Arc<LoadedModel>,
}

impl ScorePredictor {
    /// Wrap a loaded model
    #[must_use]
    pub const fn new(model: Arc<LoadedModel>) -> Self {
        Self { model }
    }

    /// Predictor over the store's serving model
    ///
    /// # Errors
    ///
    /// Returns [`ModelUnavailable`] if no model is serving; the caller should
    /// back off rather than retry immediately
    pub fn from_store(store: &ModelStore) -> Result<Self, ModelUnavailable> {
        store.current().map(Self::new)
    }

    /// Model this predictor evaluates
    #[must_use]
    pub fn model(&self) -> &LoadedModel {
        &self.model
    }

    /// Unbounded regressor output
    #[must_use]
    pub fn raw_score(&self, features: &EncodedFeatures) -> f64 {
        self.model.raw_score(features.as_slice())
    }

    /// Eco score in `[0, 100]`
    #[must_use]
    pub fn predict(&self, features: &EncodedFeatures) -> f64 {
        clamp_score(self.raw_score(features))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{CategoricalEncoder, FeatureResolver};
    use crate::model::{ModelArtifact, Node, Tree};
    use chrono::NaiveDate;
    use ecoscore_core::models::{Feature, PredictionRequest};

    fn flight_model(base: f64) -> Arc<LoadedModel> {
        let flight = i32::try_from(Feature::FlightKm as usize).unwrap();
        let tree = Tree::new(
            vec![
                Node::split(flight, 100.0, 1, 2),
                Node::leaf(30.0),
                Node::leaf(-200.0),
            ],
            1.0,
        );
        Arc::new(LoadedModel::from_artifact(ModelArtifact::new("t", base, vec![tree])).unwrap())
    }

    fn score(model: &Arc<LoadedModel>, json: &str) -> f64 {
        let request: PredictionRequest = serde_json::from_str(json).unwrap();
        let resolved = FeatureResolver::new(model.vocabularies())
            .resolve(
                &request,
                None,
                None,
                NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
            )
            .unwrap();
        let encoded = CategoricalEncoder::new(model.metadata())
            .encode(&resolved)
            .unwrap();
        ScorePredictor::new(Arc::clone(model)).predict(&encoded)
    }

    #[test]
    fn test_scores_are_clamped_to_domain() {
        let model = flight_model(90.0);
        assert!((score(&model, "{}") - 100.0).abs() < f64::EPSILON);
        assert!(score(&model, r#"{"flight_km": 2000}"#).abs() < f64::EPSILON);
    }

    #[test]
    fn test_in_range_score_passes_through() {
        let model = flight_model(40.0);
        assert!((score(&model, "{}") - 70.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_clamp_handles_nan() {
        assert!(clamp_score(f64::NAN).abs() < f64::EPSILON);
        assert!((clamp_score(55.5) - 55.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_unloaded_store_yields_unavailable() {
        assert!(ScorePredictor::from_store(&ModelStore::new()).is_err());
    }
}
