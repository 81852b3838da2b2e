// ABOUTME: Error handling entry point for the server crate
// ABOUTME: Re-exports the unified AppError types and component errors from the workspace crates
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! # Unified Error Handling System
//!
//! The error types live in `ecoscore-core` so the computation crates can
//! convert into them; this module gathers them for the server and its
//! binaries.

pub use ecoscore_core::errors::{
    AppError, AppResult, DatabaseError, ErrorCode, ErrorContext, ErrorResponse,
    ErrorResponseDetails,
};
pub use ecoscore_intelligence::{ConfigError, ModelError, ModelUnavailable, ValidationError};
