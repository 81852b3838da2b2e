// ABOUTME: Subcommand implementations for the eco score CLI
// ABOUTME: Reads JSON input, calls the services, and renders JSON output
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use chrono::{NaiveDate, Utc};
use ecoscore_core::models::{DailyLog, PredictionRequest, Profile};
use ecoscore_server::errors::{AppError, AppResult};
use ecoscore_server::services::Services;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::{self, AsyncRead, AsyncReadExt};
use uuid::Uuid;

/// `model-info`
pub fn model_info(services: &Services) -> AppResult<String> {
    render(&services.prediction.model_info())
}

/// `predict`
pub async fn predict(services: &Services, user: Uuid, input: Option<PathBuf>) -> AppResult<String> {
    let request: PredictionRequest = match input {
        Some(path) => parse(read_input(&path).await?)?,
        None => PredictionRequest::default(),
    };
    render(&services.prediction.predict(user, &request).await?)
}

/// `profile`
pub async fn profile(services: &Services, user: Uuid, input: Option<PathBuf>) -> AppResult<String> {
    let Some(path) = input else {
        let stored = services
            .prediction
            .profile(user)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Profile for user {user}")))?;
        return render(&stored);
    };

    let mut value = read_input(&path).await?;
    set_default(&mut value, "user_id", json!(user));
    let profile: Profile = parse(value)?;
    render(&services.prediction.save_profile(user, profile).await?)
}

/// `log`
pub async fn log(services: &Services, user: Uuid, input: &Path) -> AppResult<String> {
    let mut value = read_input(input).await?;
    set_default(&mut value, "user_id", json!(user));
    set_default(&mut value, "date", json!(Utc::now().date_naive()));
    let log: DailyLog = parse(value)?;
    render(&services.prediction.record_daily_log(user, log).await?)
}

/// `dashboard`
pub async fn dashboard(services: &Services, user: Uuid, date: Option<&str>) -> AppResult<String> {
    let today = match date {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|e| {
            AppError::validation("date", format!("Invalid date '{raw}': {e}"))
        })?,
        None => Utc::now().date_naive(),
    };
    render(&services.dashboard.dashboard(user, today).await?)
}

async fn read_input(path: &Path) -> AppResult<Value> {
    if path.as_os_str() == "-" {
        return read_json(io::stdin(), path).await;
    }
    let raw = fs::read_to_string(path)
        .await
        .map_err(|e| AppError::invalid_input(format!("Failed to read {}: {e}", path.display())))?;
    parse_json(&raw, path)
}

async fn read_json(mut reader: impl AsyncRead + Unpin, path: &Path) -> AppResult<Value> {
    let mut raw = String::new();
    reader
        .read_to_string(&mut raw)
        .await
        .map_err(|e| AppError::invalid_input(format!("Failed to read {}: {e}", path.display())))?;
    parse_json(&raw, path)
}

fn parse_json(raw: &str, path: &Path) -> AppResult<Value> {
    serde_json::from_str(raw)
        .map_err(|e| AppError::invalid_input(format!("Invalid JSON in {}: {e}", path.display())))
}

fn set_default(value: &mut Value, key: &str, default: Value) {
    if let Value::Object(map) = value {
        map.entry(key).or_insert(default);
    }
}

fn parse<T: DeserializeOwned>(value: Value) -> AppResult<T> {
    serde_json::from_value(value).map_err(|e| AppError::invalid_input(e.to_string()))
}

fn render<T: Serialize>(value: &T) -> AppResult<String> {
    Ok(serde_json::to_string_pretty(value)?)
}
