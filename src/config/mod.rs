// ABOUTME: Configuration management module for centralized server settings
// ABOUTME: Re-exports environment config and the scoring pipeline config types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! Configuration module for the eco score server
//!
//! - **Environment**: server configuration from environment variables
//! - **Recommendations**: thresholds and limits, defined next to the engine

/// Environment and server configuration
pub mod environment;

pub use environment::{DatabaseUrl, Environment, ServerConfig};
pub use ecoscore_intelligence::config::{
    ConfigError, RecommendationEngineConfig, RecommendationLimits, RecommendationThresholds,
};
