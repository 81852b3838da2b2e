// ABOUTME: Pipeline error types for input validation and model availability
// ABOUTME: ValidationError names the offending field; ModelUnavailable is retryable
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use ecoscore_core::errors::{AppError, ErrorCode};
use thiserror::Error;

/// Input rejected before it can reach inference
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Categorical value outside the published vocabulary
    #[error("{field}: unknown value '{value}' (expected one of: {allowed})")]
    UnknownCategory {
        /// Offending field
        field: String,
        /// Value supplied
        value: String,
        /// Comma-separated vocabulary
        allowed: String,
    },

    /// Quantity below zero
    #[error("{field}: must be non-negative, got {value}")]
    NegativeQuantity {
        /// Offending field
        field: String,
        /// Value supplied
        value: f64,
    },

    /// Quantity above its inclusive upper bound
    #[error("{field}: must be at most {max}, got {value}")]
    OutOfRange {
        /// Offending field
        field: String,
        /// Value supplied
        value: f64,
        /// Inclusive upper bound
        max: f64,
    },

    /// NaN or infinite quantity
    #[error("{field}: must be a finite number")]
    NonFinite {
        /// Offending field
        field: String,
    },

    /// No value could be resolved for a model column
    #[error("{field}: no value resolved")]
    Missing {
        /// Offending field
        field: String,
    },

    /// Date not in `YYYY-MM-DD` form
    #[error("{field}: malformed date '{value}', expected YYYY-MM-DD")]
    MalformedDate {
        /// Offending field
        field: String,
        /// Value supplied
        value: String,
    },
}

impl ValidationError {
    /// Name of the field that failed validation
    #[must_use]
    pub fn field(&self) -> &str {
        match self {
            Self::UnknownCategory { field, .. }
            | Self::NegativeQuantity { field, .. }
            | Self::OutOfRange { field, .. }
            | Self::NonFinite { field }
            | Self::Missing { field }
            | Self::MalformedDate { field, .. } => field,
        }
    }

    const fn code(&self) -> ErrorCode {
        match self {
            Self::UnknownCategory { .. }
            | Self::NegativeQuantity { .. }
            | Self::NonFinite { .. }
            | Self::Missing { .. } => ErrorCode::InvalidInput,
            Self::OutOfRange { .. } => ErrorCode::ValueOutOfRange,
            Self::MalformedDate { .. } => ErrorCode::InvalidFormat,
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(error: ValidationError) -> Self {
        let field = error.field().to_owned();
        Self::new(error.code(), error.to_string()).with_field(field)
    }
}

/// No scoring model is available: still loading, or the load failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Scoring model unavailable: {reason}")]
pub struct ModelUnavailable {
    /// Why the model cannot be used
    pub reason: String,
}

impl ModelUnavailable {
    /// Create with a reason
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl From<ModelUnavailable> for AppError {
    fn from(error: ModelUnavailable) -> Self {
        Self::service_unavailable(error.to_string())
    }
}
