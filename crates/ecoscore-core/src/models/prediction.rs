// ABOUTME: Immutable prediction record forming the append-only scoring audit trail
// ABOUTME: Stores serialized features, score, confidence, model version, and timestamp
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One past prediction.
///
/// Records are never mutated or deleted once written; trend and delta
/// computations read them as an audit trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    /// Unique identifier
    pub id: Uuid,
    /// User the prediction was made for
    pub user_id: Uuid,
    /// Serialized resolved feature set, provenance included
    pub features: serde_json::Value,
    /// Predicted eco score in `[0, 100]`
    pub score: f64,
    /// Model confidence, when the model reports one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    /// Version of the model that produced the score
    pub model_version: String,
    /// When the prediction was made
    pub created_at: DateTime<Utc>,
}

impl PredictionRecord {
    /// Create a record stamped with a fresh id
    #[must_use]
    pub fn new(
        user_id: Uuid,
        features: serde_json::Value,
        score: f64,
        model_version: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            features,
            score,
            confidence: None,
            model_version: model_version.into(),
            created_at,
        }
    }

    /// Calendar date (UTC) the prediction falls on
    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.created_at.date_naive()
    }
}

/// Average score for one calendar day that has at least one prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyScore {
    /// Calendar date (UTC)
    pub date: NaiveDate,
    /// Mean of that day's scores
    pub average_score: f64,
    /// Number of predictions averaged
    pub prediction_count: u32,
}
