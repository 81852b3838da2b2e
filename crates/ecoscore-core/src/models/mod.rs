// ABOUTME: Core data models for profiles, daily logs, requests, and prediction history
// ABOUTME: Entities own scalar fields plus foreign-key user ids, never parent references
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! Data models shared across the workspace.

/// Feature catalog, values, and provenance tags
pub mod feature;

/// Persistent per-user lifestyle profile
pub mod profile;

/// Day-scoped activity measurements
pub mod daily_log;

/// Inbound prediction request
pub mod request;

/// Append-only prediction history records
pub mod prediction;

pub use daily_log::DailyLog;
pub use feature::{Feature, FeatureClass, FeatureKind, FeatureValue, Provenance};
pub use prediction::{DailyScore, PredictionRecord};
pub use profile::Profile;
pub use request::PredictionRequest;
