// ABOUTME: Configuration for the scoring pipeline components
// ABOUTME: Recommendation thresholds and limits plus configuration errors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

/// Configuration error types
pub mod error;
/// Recommendation engine thresholds and limits
pub mod recommendation;

pub use error::ConfigError;
pub use recommendation::{
    RecommendationEngineConfig, RecommendationLimits, RecommendationThresholds,
};
