// ABOUTME: Main library entry point for the eco score prediction server
// ABOUTME: Wires configuration, logging, persistence, and services around the scoring pipeline
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

#![deny(unsafe_code)]

//! # Eco Score Server
//!
//! Estimates a normalized eco score for a user from profile defaults and
//! day-scoped activity, explains it with ranked recommendations, and keeps an
//! append-only prediction history for trend dashboards.
//!
//! ## Architecture
//!
//! - **`ecoscore-core`**: errors, constants, and data models
//! - **`ecoscore-intelligence`**: model store, feature resolution, scoring,
//!   categorization, and recommendations (no I/O)
//! - **this crate**: configuration, logging, `SQLite` persistence, and the
//!   prediction and dashboard services
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use ecoscore_server::config::ServerConfig;
//! use ecoscore_server::database::Database;
//! use ecoscore_server::errors::AppResult;
//! use ecoscore_server::services::Services;
//! use ecoscore_intelligence::ModelStore;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     let config = ServerConfig::from_env()?;
//!     let database = Database::new(&config.database_url).await?;
//!     let models = Arc::new(ModelStore::new());
//!     models.spawn_load(config.model_path.clone());
//!
//!     let services = Services::new(&config, &database, models);
//!     println!("{}", serde_json::to_string(&services.prediction.model_info())?);
//!     Ok(())
//! }
//! ```

/// Configuration management
pub mod config;

/// `SQLite` persistence for profiles, daily logs, and prediction history
pub mod database;

/// Unified error types
pub mod errors;

/// Structured logging setup
pub mod logging;

/// Prediction and dashboard services
pub mod services;
