// ABOUTME: Environment-based server configuration for the eco score service
// ABOUTME: Parses database URL, model path, recommendation cap, and trend window from env vars
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! Environment-based configuration management.
//!
//! Every setting has a default, so an empty environment yields a working
//! development configuration backed by a local SQLite file.

use ecoscore_core::constants::{env_keys, limits};
use ecoscore_intelligence::{ConfigError, RecommendationEngineConfig};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::info;

/// Default database location
pub const DEFAULT_DATABASE_URL: &str = "sqlite:./data/ecoscore.db";
/// Default model artifact location
pub const DEFAULT_MODEL_PATH: &str = "./models/eco_score_model.json";

/// Deployment environment
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development
    #[default]
    Development,
    /// Production deployment
    Production,
    /// Automated tests
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// Type-safe database location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatabaseUrl {
    /// `SQLite` database file
    SQLite {
        /// File path
        path: PathBuf,
    },
    /// In-memory `SQLite` (tests and one-shot runs)
    Memory,
}

impl DatabaseUrl {
    /// Parse from a URL; anything without a `sqlite:` scheme is a file path
    #[must_use]
    pub fn parse_url(s: &str) -> Self {
        let path = s.strip_prefix("sqlite:").unwrap_or(s);
        if path == ":memory:" {
            Self::Memory
        } else {
            Self::SQLite {
                path: PathBuf::from(path),
            }
        }
    }

    /// Convert to a sqlx connection string
    #[must_use]
    pub fn to_connection_string(&self) -> String {
        match self {
            Self::SQLite { path } => format!("sqlite:{}", path.display()),
            Self::Memory => "sqlite::memory:".to_owned(),
        }
    }

    /// Check if this is an in-memory database
    #[must_use]
    pub const fn is_memory(&self) -> bool {
        matches!(self, Self::Memory)
    }
}

impl Default for DatabaseUrl {
    fn default() -> Self {
        Self::parse_url(DEFAULT_DATABASE_URL)
    }
}

impl fmt::Display for DatabaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_connection_string())
    }
}

/// Server configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// Deployment environment
    pub environment: Environment,
    /// Persistence location
    pub database_url: DatabaseUrl,
    /// Model artifact loaded at startup
    pub model_path: PathBuf,
    /// Recommendation thresholds and cap
    pub recommendations: RecommendationEngineConfig,
    /// Dashboard trend window in days, today included
    pub trend_days: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            environment: Environment::default(),
            database_url: DatabaseUrl::default(),
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            recommendations: RecommendationEngineConfig::default(),
            trend_days: limits::DEFAULT_TREND_DAYS,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable does not parse or is out of range
    pub fn from_env() -> Result<Self, ConfigError> {
        let max_recommendations: usize = parse_env(
            env_keys::MAX_RECOMMENDATIONS,
            limits::DEFAULT_MAX_RECOMMENDATIONS,
        )?;

        let config = Self {
            environment: Environment::from_str_or_default(&env_var_or(
                env_keys::ENVIRONMENT,
                "development",
            )),
            database_url: DatabaseUrl::parse_url(&env_var_or(
                env_keys::DATABASE_URL,
                DEFAULT_DATABASE_URL,
            )),
            model_path: PathBuf::from(env_var_or(env_keys::MODEL_PATH, DEFAULT_MODEL_PATH)),
            recommendations: RecommendationEngineConfig::with_max_recommendations(
                max_recommendations,
            ),
            trend_days: parse_env(env_keys::TREND_DAYS, limits::DEFAULT_TREND_DAYS)?,
        };

        config.validate()?;
        info!("Configuration loaded successfully");
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns an error if the recommendation config is invalid or the trend
    /// window is outside `1..=31` days
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.recommendations.validate()?;
        if !(1..=limits::MAX_TREND_DAYS).contains(&self.trend_days) {
            return Err(ConfigError::ValueOutOfRange(
                "trend_days must be between 1 and 31",
            ));
        }
        Ok(())
    }

    /// Summary of the configuration for logging
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Eco Score Server Configuration:\n\
             - Environment: {}\n\
             - Database: {}\n\
             - Model: {}\n\
             - Max Recommendations: {}\n\
             - Trend Days: {}",
            self.environment,
            if self.database_url.is_memory() {
                "SQLite (in-memory)"
            } else {
                "SQLite"
            },
            self.model_path.display(),
            self.recommendations.limits.max_recommendations,
            self.trend_days,
        )
    }
}

/// Get environment variable or default value
fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Parse an environment variable, falling back to `default` when unset
fn parse_env<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| ConfigError::Parse(format!("{key}={raw}: {e}"))),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_url_parsing() {
        assert_eq!(DatabaseUrl::parse_url("sqlite::memory:"), DatabaseUrl::Memory);
        assert_eq!(
            DatabaseUrl::parse_url("sqlite:./data/eco.db"),
            DatabaseUrl::SQLite {
                path: PathBuf::from("./data/eco.db")
            }
        );
        assert_eq!(
            DatabaseUrl::parse_url("/var/lib/eco.db").to_connection_string(),
            "sqlite:/var/lib/eco.db"
        );
        assert!(DatabaseUrl::Memory.is_memory());
    }

    #[test]
    fn test_environment_parsing() {
        assert_eq!(Environment::from_str_or_default("PROD"), Environment::Production);
        assert_eq!(Environment::from_str_or_default("test"), Environment::Testing);
        assert_eq!(Environment::from_str_or_default("??"), Environment::Development);
    }

    #[test]
    fn test_trend_window_validation() {
        let mut config = ServerConfig::default();
        assert!(config.validate().is_ok());
        config.trend_days = 0;
        assert!(config.validate().is_err());
        config.trend_days = 32;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_summary_mentions_model_path() {
        let summary = ServerConfig::default().summary();
        assert!(summary.contains("eco_score_model.json"));
        assert!(summary.contains("Trend Days: 7"));
    }
}
