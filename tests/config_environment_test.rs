// ABOUTME: Unit tests for loading server configuration from environment variables
// ABOUTME: Validates defaults, overrides, and rejection of malformed or out-of-range values
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use ecoscore_core::constants::env_keys;
use ecoscore_server::config::{ConfigError, DatabaseUrl, Environment, ServerConfig};
use serial_test::serial;
use std::env;
use std::path::PathBuf;

const KEYS: [&str; 5] = [
    env_keys::DATABASE_URL,
    env_keys::MODEL_PATH,
    env_keys::MAX_RECOMMENDATIONS,
    env_keys::TREND_DAYS,
    env_keys::ENVIRONMENT,
];

fn clear_env() {
    for key in KEYS {
        env::remove_var(key);
    }
}

#[test]
#[serial]
fn test_defaults_without_environment() {
    clear_env();
    let config = ServerConfig::from_env().unwrap();

    assert_eq!(config, ServerConfig::default());
    assert_eq!(config.environment, Environment::Development);
    assert_eq!(config.recommendations.limits.max_recommendations, 5);
    assert_eq!(config.trend_days, 7);
}

#[test]
#[serial]
fn test_environment_overrides() {
    clear_env();
    env::set_var(env_keys::DATABASE_URL, "sqlite::memory:");
    env::set_var(env_keys::MODEL_PATH, "/srv/models/eco.json");
    env::set_var(env_keys::MAX_RECOMMENDATIONS, "3");
    env::set_var(env_keys::TREND_DAYS, " 14 ");
    env::set_var(env_keys::ENVIRONMENT, "production");

    let config = ServerConfig::from_env().unwrap();
    clear_env();

    assert_eq!(config.database_url, DatabaseUrl::Memory);
    assert_eq!(config.model_path, PathBuf::from("/srv/models/eco.json"));
    assert_eq!(config.recommendations.limits.max_recommendations, 3);
    assert_eq!(config.trend_days, 14);
    assert!(config.environment.is_production());
    assert!(config.summary().contains("in-memory"));
}

#[test]
#[serial]
fn test_malformed_number_is_parse_error() {
    clear_env();
    env::set_var(env_keys::MAX_RECOMMENDATIONS, "lots");
    let result = ServerConfig::from_env();
    clear_env();

    match result {
        Err(ConfigError::Parse(message)) => {
            assert!(message.contains(env_keys::MAX_RECOMMENDATIONS));
        }
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
#[serial]
fn test_out_of_range_values_rejected() {
    clear_env();
    env::set_var(env_keys::TREND_DAYS, "90");
    assert!(matches!(
        ServerConfig::from_env(),
        Err(ConfigError::ValueOutOfRange(_))
    ));

    env::set_var(env_keys::TREND_DAYS, "7");
    env::set_var(env_keys::MAX_RECOMMENDATIONS, "0");
    assert!(matches!(
        ServerConfig::from_env(),
        Err(ConfigError::ValueOutOfRange(_))
    ));
    clear_env();
}
