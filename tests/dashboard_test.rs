// ABOUTME: Integration tests for dashboard aggregation over history and daily logs
// ABOUTME: Checks the sparse trend window, today's summary, counts, and trip counting
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use async_trait::async_trait;
use chrono::NaiveDate;
use common::{at, create_prediction_service, date, loaded_store};
use ecoscore_core::models::{DailyLog, PredictionRequest, Profile};
use ecoscore_server::errors::AppResult;
use ecoscore_server::services::{DashboardService, NoTripTracking, TodaySummary, TripCounter};
use std::sync::Arc;
use uuid::Uuid;

#[tokio::test]
async fn test_empty_dashboard() {
    let (db, _service) = create_prediction_service(loaded_store()).await.unwrap();
    let dashboard = DashboardService::new(&db, Arc::new(NoTripTracking));

    let overview = dashboard
        .dashboard(Uuid::new_v4(), date(2025, 3, 14))
        .await
        .unwrap();

    assert!(!overview.profile_complete);
    assert_eq!(overview.latest_score, None);
    assert_eq!(overview.today, TodaySummary::default());
    assert!(overview.trend.is_empty());
    assert_eq!(overview.prediction_count, 0);
    assert_eq!(overview.trip_count, 0);

    let json = serde_json::to_value(&overview).unwrap();
    assert!(json.get("latest_score").is_none());
}

#[tokio::test]
async fn test_dashboard_after_activity() {
    let (db, service) = create_prediction_service(loaded_store()).await.unwrap();
    let user = Uuid::new_v4();
    let today = date(2025, 3, 14);

    service.save_profile(user, Profile::new(user)).await.unwrap();
    let log = DailyLog {
        car_km: Some(8.0),
        bus_km: Some(3.5),
        walk_km: Some(1.5),
        meat_meals: Some(1.0),
        vegetarian_meals: Some(2.0),
        recycled: Some(true),
        ..DailyLog::new(user, today)
    };
    service.record_daily_log(user, log).await.unwrap();

    // Two days inside the 7-day window, one day before it
    let stale = PredictionRequest {
        date: Some("2025-03-01".into()),
        ..PredictionRequest::default()
    };
    service.predict_at(user, &stale, at(2025, 3, 1, 9)).await.unwrap();
    service
        .predict_at(user, &PredictionRequest::default(), at(2025, 3, 10, 9))
        .await
        .unwrap();
    let long_drive = PredictionRequest {
        car_km: Some(40.0),
        ..PredictionRequest::default()
    };
    service.predict_at(user, &long_drive, at(2025, 3, 10, 18)).await.unwrap();
    let latest = service
        .predict_at(user, &PredictionRequest::default(), at(2025, 3, 14, 8))
        .await
        .unwrap();

    let overview = DashboardService::new(&db, Arc::new(NoTripTracking))
        .dashboard(user, today)
        .await
        .unwrap();

    assert!(overview.profile_complete);
    assert_eq!(overview.latest_score, Some(latest.score));
    assert!((overview.today.total_distance - 13.0).abs() < f64::EPSILON);
    assert!((overview.today.meals_logged - 3.0).abs() < f64::EPSILON);
    assert!(overview.today.recycled);
    assert_eq!(overview.prediction_count, 4);

    let days: Vec<NaiveDate> = overview.trend.iter().map(|point| point.date).collect();
    assert_eq!(days, vec![date(2025, 3, 10), today]);
    // (55 + 30) / 2
    assert!((overview.trend[0].average_score - 42.5).abs() < f64::EPSILON);
    assert_eq!(overview.trend[0].prediction_count, 2);
}

#[tokio::test]
async fn test_trend_window_is_configurable() {
    let (db, service) = create_prediction_service(loaded_store()).await.unwrap();
    let user = Uuid::new_v4();

    service
        .predict_at(user, &PredictionRequest::default(), at(2025, 3, 13, 9))
        .await
        .unwrap();
    service
        .predict_at(user, &PredictionRequest::default(), at(2025, 3, 14, 9))
        .await
        .unwrap();

    let today_only = DashboardService::new(&db, Arc::new(NoTripTracking))
        .with_trend_days(1)
        .dashboard(user, date(2025, 3, 14))
        .await
        .unwrap();
    assert_eq!(today_only.trend.len(), 1);
    assert_eq!(today_only.prediction_count, 2);

    // Zero is raised to a one-day window
    let clamped = DashboardService::new(&db, Arc::new(NoTripTracking))
        .with_trend_days(0)
        .dashboard(user, date(2025, 3, 14))
        .await
        .unwrap();
    assert_eq!(clamped.trend, today_only.trend);
}

/// Trip counter reporting a fixed number of trips on one day
struct FixedTrips {
    day: NaiveDate,
    trips: u32,
}

#[async_trait]
impl TripCounter for FixedTrips {
    async fn trips_on(&self, _user_id: Uuid, date: NaiveDate) -> AppResult<u32> {
        Ok(if date == self.day { self.trips } else { 0 })
    }
}

#[tokio::test]
async fn test_trip_count_comes_from_collaborator() {
    let (db, _service) = create_prediction_service(loaded_store()).await.unwrap();
    let trips = Arc::new(FixedTrips {
        day: date(2025, 3, 14),
        trips: 3,
    });
    let dashboard = DashboardService::new(&db, trips);

    let today = dashboard
        .dashboard(Uuid::new_v4(), date(2025, 3, 14))
        .await
        .unwrap();
    let tomorrow = dashboard
        .dashboard(Uuid::new_v4(), date(2025, 3, 15))
        .await
        .unwrap();

    assert_eq!(today.trip_count, 3);
    assert_eq!(tomorrow.trip_count, 0);
}
