// ABOUTME: Recommendation engine configuration for eco score suggestions
// ABOUTME: Configures trigger thresholds and output limits for the rule table
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! Recommendation Engine Configuration
//!
//! Thresholds decide when a rule fires; limits cap how many suggestions a
//! single prediction returns.

use super::ConfigError;
use ecoscore_core::constants::limits;
use serde::{Deserialize, Serialize};

/// Recommendation Engine Configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationEngineConfig {
    /// Threshold values for triggering recommendations
    pub thresholds: RecommendationThresholds,
    /// Limits on recommendation generation
    pub limits: RecommendationLimits,
}

/// Thresholds for triggering recommendations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationThresholds {
    /// Daily car distance (km) above which heavy car use is flagged
    pub high_car_km: f64,
    /// Daily car distance (km) at or below which trips count as short
    pub short_trip_km: f64,
    /// Daily electricity use (kWh) above which usage is flagged
    pub high_electricity_kwh: f64,
    /// Daily heating use (kWh) above which a thermostat is suggested
    pub high_heating_kwh: f64,
    /// Renewable share (percent) below which a switch is suggested
    pub low_renewable_percent: f64,
    /// Meat meals per day at or above which a swap is suggested
    pub high_meat_meals: f64,
    /// Screen hours per day above which a break is suggested
    pub high_screen_time_hours: f64,
    /// Outdoor hours per day below which more time outside is suggested
    pub low_outdoor_hours: f64,
    /// Waste bags per day above which reduction is suggested
    pub high_waste_bags: f64,
}

/// Limits on recommendation generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationLimits {
    /// Maximum recommendations returned per prediction
    pub max_recommendations: usize,
}

impl Default for RecommendationThresholds {
    fn default() -> Self {
        Self {
            high_car_km: 30.0,
            short_trip_km: 5.0,
            high_electricity_kwh: 15.0,
            high_heating_kwh: 10.0,
            low_renewable_percent: 50.0,
            high_meat_meals: 2.0,
            high_screen_time_hours: 6.0,
            low_outdoor_hours: 1.0,
            high_waste_bags: 1.0,
        }
    }
}

impl Default for RecommendationLimits {
    fn default() -> Self {
        Self {
            max_recommendations: limits::DEFAULT_MAX_RECOMMENDATIONS,
        }
    }
}

impl RecommendationThresholds {
    /// Validate that every threshold is a usable non-negative number
    ///
    /// # Errors
    ///
    /// Returns an error if any threshold is negative or not finite, or the
    /// renewable threshold exceeds 100
    pub fn validate(&self) -> Result<(), ConfigError> {
        let values = [
            ("high_car_km", self.high_car_km),
            ("short_trip_km", self.short_trip_km),
            ("high_electricity_kwh", self.high_electricity_kwh),
            ("high_heating_kwh", self.high_heating_kwh),
            ("low_renewable_percent", self.low_renewable_percent),
            ("high_meat_meals", self.high_meat_meals),
            ("high_screen_time_hours", self.high_screen_time_hours),
            ("low_outdoor_hours", self.low_outdoor_hours),
            ("high_waste_bags", self.high_waste_bags),
        ];
        for (name, value) in values {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::ValueOutOfRange(name));
            }
        }
        if self.low_renewable_percent > limits::MAX_RENEWABLE_PERCENT {
            return Err(ConfigError::ValueOutOfRange("low_renewable_percent"));
        }
        if self.short_trip_km > self.high_car_km {
            return Err(ConfigError::ValueOutOfRange(
                "short_trip_km must not exceed high_car_km",
            ));
        }
        Ok(())
    }
}

impl RecommendationEngineConfig {
    /// Build a default configuration with a custom recommendation cap
    #[must_use]
    pub fn with_max_recommendations(max_recommendations: usize) -> Self {
        Self {
            limits: RecommendationLimits {
                max_recommendations,
            },
            ..Self::default()
        }
    }

    /// Validate thresholds and limits
    ///
    /// # Errors
    ///
    /// Returns an error if a threshold is invalid or the cap is zero
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.thresholds.validate()?;
        if self.limits.max_recommendations == 0 {
            return Err(ConfigError::ValueOutOfRange(
                "max_recommendations must be at least 1",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = RecommendationEngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.limits.max_recommendations, 5);
    }

    #[test]
    fn test_zero_cap_rejected() {
        let config = RecommendationEngineConfig::with_max_recommendations(0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValueOutOfRange(_))
        ));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: RecommendationEngineConfig =
            serde_json::from_str(r#"{"thresholds": {"high_car_km": 50}}"#).unwrap();
        assert!((config.thresholds.high_car_km - 50.0).abs() < f64::EPSILON);
        assert!((config.thresholds.short_trip_km - 5.0).abs() < f64::EPSILON);
        assert_eq!(config.limits.max_recommendations, 5);
    }

    #[test]
    fn test_negative_threshold_rejected() {
        let mut config = RecommendationEngineConfig::default();
        config.thresholds.low_outdoor_hours = -1.0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::ValueOutOfRange("low_outdoor_hours"))
        );
    }
}
