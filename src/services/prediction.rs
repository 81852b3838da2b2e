// ABOUTME: Prediction orchestration from raw request to recorded, explained eco score
// ABOUTME: Also validates and stores profiles and daily logs against the serving vocabulary
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! # Prediction Service
//!
//! One call runs the whole pipeline against a single model snapshot:
//! resolve, encode, predict, categorize, recommend, then append to history.
//! A failed history append fails the request; no score is returned that
//! was not recorded.

use crate::database::{
    DailyLogRepository, DailyLogRepositoryImpl, Database, PredictionRepository,
    PredictionRepositoryImpl, ProfileRepository, ProfileRepositoryImpl,
};
use crate::errors::{AppError, AppResult};
use crate::logging::AppLogger;
use chrono::{DateTime, NaiveDate, Utc};
use ecoscore_core::models::{DailyLog, PredictionRecord, PredictionRequest, Profile, Provenance};
use ecoscore_intelligence::model::Vocabularies;
use ecoscore_intelligence::{
    CategoricalEncoder, FeatureResolver, ModelInfo, ModelStore, Recommendation,
    RecommendationEngine, ScorePredictor,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::error;
use uuid::Uuid;

/// Outbound prediction response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    /// Id of the history record written for this prediction
    pub prediction_id: Uuid,
    /// Target date the features were resolved for
    pub date: NaiveDate,
    /// Eco score in `[0, 100]`
    pub score: f64,
    /// Band label for the score
    pub category: String,
    /// Ranked suggestions
    pub recommendations: Vec<Recommendation>,
    /// Source of every resolved feature
    pub provenance: BTreeMap<String, Provenance>,
    /// Score of the user's most recent earlier prediction
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_score: Option<f64>,
    /// Whether the user has saved a profile
    pub profile_complete: bool,
    /// Version of the model that produced the score
    pub model_version: String,
}

/// Prediction pipeline over shared repositories and the model store
#[derive(Clone)]
pub struct PredictionService {
    models: Arc<ModelStore>,
    profiles: Arc<dyn ProfileRepository>,
    daily_logs: Arc<dyn DailyLogRepository>,
    predictions: Arc<dyn PredictionRepository>,
    engine: Arc<RecommendationEngine>,
}

impl PredictionService {
    /// Service backed by the `SQLite` repositories
    #[must_use]
    pub fn new(models: Arc<ModelStore>, database: &Database, engine: RecommendationEngine) -> Self {
        Self::with_repositories(
            models,
            Arc::new(ProfileRepositoryImpl::new(database.clone())),
            Arc::new(DailyLogRepositoryImpl::new(database.clone())),
            Arc::new(PredictionRepositoryImpl::new(database.clone())),
            engine,
        )
    }

    /// Service over explicit repository implementations
    #[must_use]
    pub fn with_repositories(
        models: Arc<ModelStore>,
        profiles: Arc<dyn ProfileRepository>,
        daily_logs: Arc<dyn DailyLogRepository>,
        predictions: Arc<dyn PredictionRepository>,
        engine: RecommendationEngine,
    ) -> Self {
        Self {
            models,
            profiles,
            daily_logs,
            predictions,
            engine: Arc::new(engine),
        }
    }

    /// Model-info query
    #[must_use]
    pub fn model_info(&self) -> ModelInfo {
        self.models.info()
    }

    /// Predict now
    ///
    /// # Errors
    ///
    /// See [`Self::predict_at`]
    pub async fn predict(
        &self,
        user_id: Uuid,
        request: &PredictionRequest,
    ) -> AppResult<PredictionResponse> {
        self.predict_at(user_id, request, Utc::now()).await
    }

    /// Predict as of `now`; an omitted request date means `now`'s UTC date
    ///
    /// # Errors
    ///
    /// - `SERVICE_UNAVAILABLE` if no model is serving (retry later)
    /// - a validation code naming the field for bad input
    /// - `DATABASE_ERROR` if reading inputs or recording the prediction fails
    pub async fn predict_at(
        &self,
        user_id: Uuid,
        request: &PredictionRequest,
        now: DateTime<Utc>,
    ) -> AppResult<PredictionResponse> {
        let model = self.models.current().map_err(|e| {
            AppLogger::log_model_unavailable(user_id, &e.reason);
            AppError::from(e).with_user_id(user_id)
        })?;
        let date = FeatureResolver::target_date(request.date.as_deref(), now.date_naive())
            .map_err(|e| AppError::from(e).with_user_id(user_id))?;

        let profile = self.profiles.get(user_id).await?;
        let daily_log = self.daily_logs.get(user_id, date).await?;

        let resolved = FeatureResolver::new(model.vocabularies())
            .resolve(request, profile.as_ref(), daily_log.as_ref(), date)
            .map_err(|e| AppError::from(e).with_user_id(user_id))?;
        let encoded = CategoricalEncoder::new(model.metadata())
            .encode(&resolved)
            .map_err(|e| AppError::from(e).with_user_id(user_id))?;

        let score = ScorePredictor::new(Arc::clone(&model)).predict(&encoded);
        let category = model.categorizer().categorize(score).to_owned();
        let recommendations = self.engine.generate(&resolved);

        // Concurrent predictions for one user may both see the same prior record
        let previous_score = self
            .predictions
            .latest_before(user_id, now)
            .await?
            .map(|record| record.score);

        let record =
            PredictionRecord::new(user_id, resolved.to_json(), score, model.version(), now);
        self.predictions.append(&record).await.map_err(|e| {
            error!(user.id = %user_id, error = %e, "Failed to record prediction");
            AppError::from(e).with_user_id(user_id)
        })?;

        AppLogger::log_prediction(user_id, score, &category, model.version());

        Ok(PredictionResponse {
            prediction_id: record.id,
            date,
            score,
            category,
            recommendations,
            provenance: resolved.provenance_map(),
            previous_score,
            profile_complete: profile.is_some(),
            model_version: model.version().to_owned(),
        })
    }

    /// The user's stored profile
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails
    pub async fn profile(&self, user_id: Uuid) -> AppResult<Option<Profile>> {
        Ok(self.profiles.get(user_id).await?)
    }

    /// Validate and store the user's profile, replacing any earlier one
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the field, or a database error
    pub async fn save_profile(&self, user_id: Uuid, profile: Profile) -> AppResult<Profile> {
        let profile = Profile {
            user_id,
            updated_at: Utc::now(),
            ..profile
        };
        self.with_vocabularies(|vocabularies| {
            FeatureResolver::new(vocabularies).validate_profile(&profile)
        })
        .map_err(|e| AppError::from(e).with_user_id(user_id))?;

        Ok(self.profiles.upsert(&profile).await?)
    }

    /// Validate and merge measurements into the user's log for `log.date`
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the field, or a database error
    pub async fn record_daily_log(&self, user_id: Uuid, log: DailyLog) -> AppResult<DailyLog> {
        let log = DailyLog {
            user_id,
            updated_at: Utc::now(),
            ..log
        };
        self.with_vocabularies(|vocabularies| FeatureResolver::new(vocabularies).validate_log(&log))
            .map_err(|e| AppError::from(e).with_user_id(user_id))?;

        Ok(self.daily_logs.upsert(&log).await?)
    }

    /// Run `f` against the serving vocabularies, or the built-in ones while no
    /// model is loaded
    fn with_vocabularies<T>(&self, f: impl FnOnce(&Vocabularies) -> T) -> T {
        match self.models.current() {
            Ok(model) => f(model.vocabularies()),
            Err(_) => f(&Vocabularies::defaults()),
        }
    }
}
