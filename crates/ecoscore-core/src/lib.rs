// ABOUTME: Core types and constants for the eco score prediction platform
// ABOUTME: Foundation crate with error handling, the feature catalog, and data models
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

#![deny(unsafe_code)]

//! # Eco Score Core
//!
//! Foundation crate providing shared types and constants for the eco score
//! platform. This crate is designed to change infrequently, enabling
//! incremental compilation benefits in the workspace.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError`, `ErrorCode`, and domain-specific errors
//! - **constants**: Feature names, default vocabularies, hard defaults, and env keys
//! - **models**: Profile, daily log, prediction request and prediction record types

/// Unified error handling system with standard error codes
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Core data models (Profile, `DailyLog`, `PredictionRecord`, features)
pub mod models;
