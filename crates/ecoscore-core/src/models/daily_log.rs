// ABOUTME: Day-scoped activity measurements keyed by user and calendar date
// ABOUTME: DailyLog holds travel, energy, meal, lifestyle, and waste figures for one day
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use super::feature::{Feature, FeatureClass, FeatureValue};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Measurements for one user on one calendar date.
///
/// At most one log exists per `(user_id, date)`. Logs are upserted as the
/// day's data arrives: fields present in an update overwrite the stored
/// value, absent fields keep it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyLog {
    /// Owning user
    pub user_id: Uuid,
    /// Calendar date (UTC)
    pub date: NaiveDate,
    /// Distance driven by car (km)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub car_km: Option<f64>,
    /// Distance by bus (km)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bus_km: Option<f64>,
    /// Distance by train (km)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub train_km: Option<f64>,
    /// Distance cycled (km)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bike_km: Option<f64>,
    /// Distance walked (km)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub walk_km: Option<f64>,
    /// Distance flown (km)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flight_km: Option<f64>,
    /// Electricity consumed (kWh)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub electricity_kwh: Option<f64>,
    /// Heating energy consumed (kWh)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heating_kwh: Option<f64>,
    /// Meals containing meat
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meat_meals: Option<f64>,
    /// Vegetarian meals
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vegetarian_meals: Option<f64>,
    /// Vegan meals
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vegan_meals: Option<f64>,
    /// Hours in front of screens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screen_time_hours: Option<f64>,
    /// Hours spent outdoors
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outdoor_hours: Option<f64>,
    /// Bags of general waste thrown out
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waste_bags: Option<f64>,
    /// Whether anything was recycled today
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recycled: Option<bool>,
    /// Last update timestamp
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl DailyLog {
    /// Create an empty log for a user and date
    #[must_use]
    pub fn new(user_id: Uuid, date: NaiveDate) -> Self {
        Self {
            user_id,
            date,
            car_km: None,
            bus_km: None,
            train_km: None,
            bike_km: None,
            walk_km: None,
            flight_km: None,
            electricity_kwh: None,
            heating_kwh: None,
            meat_meals: None,
            vegetarian_meals: None,
            vegan_meals: None,
            screen_time_hours: None,
            outdoor_hours: None,
            waste_bags: None,
            recycled: None,
            updated_at: Utc::now(),
        }
    }

    /// Raw stored measurement for a day-level feature
    #[must_use]
    pub const fn measurement(&self, feature: Feature) -> Option<f64> {
        match feature {
            Feature::CarKm => self.car_km,
            Feature::BusKm => self.bus_km,
            Feature::TrainKm => self.train_km,
            Feature::BikeKm => self.bike_km,
            Feature::WalkKm => self.walk_km,
            Feature::FlightKm => self.flight_km,
            Feature::ElectricityKwh => self.electricity_kwh,
            Feature::HeatingKwh => self.heating_kwh,
            Feature::MeatMeals => self.meat_meals,
            Feature::VegetarianMeals => self.vegetarian_meals,
            Feature::VeganMeals => self.vegan_meals,
            Feature::ScreenTimeHours => self.screen_time_hours,
            Feature::OutdoorHours => self.outdoor_hours,
            Feature::WasteBags => self.waste_bags,
            _ => None,
        }
    }

    /// Stored value for a day-level feature as a [`FeatureValue`]
    #[must_use]
    pub fn value_of(&self, feature: Feature) -> Option<FeatureValue> {
        if feature.class() != FeatureClass::DailyMeasurement {
            return None;
        }
        self.measurement(feature).map(FeatureValue::Number)
    }

    /// Sum of all travel-mode distances logged today
    #[must_use]
    pub fn total_distance(&self) -> f64 {
        Feature::TRAVEL_MODES
            .into_iter()
            .filter_map(|mode| self.measurement(mode))
            .sum()
    }

    /// Number of meals logged today across all meal categories
    #[must_use]
    pub fn meals_logged(&self) -> f64 {
        Feature::MEALS
            .into_iter()
            .filter_map(|meal| self.measurement(meal))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log() -> DailyLog {
        DailyLog::new(
            Uuid::new_v4(),
            NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
        )
    }

    #[test]
    fn test_totals_skip_missing_fields() {
        let log = DailyLog {
            car_km: Some(12.0),
            walk_km: Some(1.5),
            vegan_meals: Some(2.0),
            meat_meals: Some(1.0),
            ..log()
        };
        assert!((log.total_distance() - 13.5).abs() < f64::EPSILON);
        assert!((log.meals_logged() - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_log_never_supplies_profile_features() {
        let log = DailyLog {
            car_km: Some(1.0),
            ..log()
        };
        assert_eq!(log.value_of(Feature::DietType), None);
        assert_eq!(log.value_of(Feature::TotalDistance), None);
        assert_eq!(log.value_of(Feature::CarKm), Some(FeatureValue::Number(1.0)));
    }
}
