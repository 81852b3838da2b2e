// ABOUTME: Structured error types for database operations
// ABOUTME: Provides storage errors with context and conversion into AppError
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use super::{AppError, ErrorCode};
use thiserror::Error;

/// Errors raised by repository implementations
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Connecting to the database failed
    #[error("Database connection failed: {context}")]
    ConnectionError {
        /// What was being attempted
        context: String,
    },

    /// A query failed to execute
    #[error("Database query failed: {context}")]
    QueryError {
        /// What was being attempted
        context: String,
    },

    /// Schema migration failed
    #[error("Database migration failed: {context}")]
    MigrationError {
        /// What was being attempted
        context: String,
    },

    /// A stored row could not be decoded into a domain type
    #[error("Invalid stored data in {table}: {reason}")]
    InvalidData {
        /// Table the row came from
        table: &'static str,
        /// Why the row is invalid
        reason: String,
    },
}

impl DatabaseError {
    /// Shorthand for a query failure
    pub fn query(context: impl Into<String>) -> Self {
        Self::QueryError {
            context: context.into(),
        }
    }
}

#[cfg(feature = "database-errors")]
impl From<sqlx::Error> for DatabaseError {
    fn from(error: sqlx::Error) -> Self {
        Self::QueryError {
            context: error.to_string(),
        }
    }
}

impl From<DatabaseError> for AppError {
    fn from(error: DatabaseError) -> Self {
        Self::new(ErrorCode::DatabaseError, error.to_string()).with_source(error)
    }
}
