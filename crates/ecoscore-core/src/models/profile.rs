// ABOUTME: Persistent lifestyle profile holding per-user feature defaults
// ABOUTME: One profile per user; absence means an incomplete profile, not an error
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use super::feature::{Feature, FeatureClass, FeatureValue};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifestyle profile captured at onboarding and edited by the user.
///
/// Every field is optional: a field left unset falls back to the documented
/// hard default during feature resolution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Owning user
    pub user_id: Uuid,
    /// Number of people in the household
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub household_size: Option<f64>,
    /// Age band
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age_group: Option<String>,
    /// General activity level
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lifestyle_type: Option<String>,
    /// Urban, suburban, or rural
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_type: Option<String>,
    /// Primary vehicle
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_type: Option<String>,
    /// Primary vehicle fuel
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fuel_type: Option<String>,
    /// Diet
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diet_type: Option<String>,
    /// Household has solar panels
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uses_solar_panels: Option<bool>,
    /// Household has a smart thermostat
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_smart_thermostat: Option<bool>,
    /// Share of household energy from renewables (0-100)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub renewable_energy_percent: Option<f64>,
    /// Household separates recyclables
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recycles: Option<bool>,
    /// Household composts food waste
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub composts: Option<bool>,
    /// Waste bin size
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waste_bag_size: Option<String>,
    /// How often the user goes out socially
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub social_activity: Option<String>,
    /// Creation timestamp
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// Create an empty profile for a user
    #[must_use]
    pub fn new(user_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            created_at: now,
            updated_at: now,
            ..Self::default()
        }
    }

    /// Stored value for a profile-backed feature.
    ///
    /// Returns `None` for unset fields and for features the profile never
    /// supplies (day-level measurements and computed features).
    #[must_use]
    pub fn value_of(&self, feature: Feature) -> Option<FeatureValue> {
        if feature.class() != FeatureClass::ProfileBacked {
            return None;
        }
        match feature {
            Feature::HouseholdSize => self.household_size.map(FeatureValue::Number),
            Feature::AgeGroup => self.age_group.clone().map(FeatureValue::Category),
            Feature::LifestyleType => self.lifestyle_type.clone().map(FeatureValue::Category),
            Feature::LocationType => self.location_type.clone().map(FeatureValue::Category),
            Feature::VehicleType => self.vehicle_type.clone().map(FeatureValue::Category),
            Feature::FuelType => self.fuel_type.clone().map(FeatureValue::Category),
            Feature::DietType => self.diet_type.clone().map(FeatureValue::Category),
            Feature::UsesSolarPanels => self.uses_solar_panels.map(FeatureValue::Flag),
            Feature::HasSmartThermostat => self.has_smart_thermostat.map(FeatureValue::Flag),
            Feature::RenewableEnergyPercent => {
                self.renewable_energy_percent.map(FeatureValue::Number)
            }
            Feature::Recycles => self.recycles.map(FeatureValue::Flag),
            Feature::Composts => self.composts.map(FeatureValue::Flag),
            Feature::WasteBagSize => self.waste_bag_size.clone().map(FeatureValue::Category),
            Feature::SocialActivity => self.social_activity.clone().map(FeatureValue::Category),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_never_supplies_daily_measurements() {
        let profile = Profile {
            household_size: Some(3.0),
            ..Profile::new(Uuid::new_v4())
        };
        assert_eq!(
            profile.value_of(Feature::HouseholdSize),
            Some(FeatureValue::Number(3.0))
        );
        assert_eq!(profile.value_of(Feature::CarKm), None);
        assert_eq!(profile.value_of(Feature::TotalDistance), None);
    }

    #[test]
    fn test_partial_profile_deserializes() {
        let profile: Profile = serde_json::from_str(&format!(
            r#"{{"user_id":"{}","diet_type":"vegan"}}"#,
            Uuid::nil()
        ))
        .unwrap();
        assert_eq!(profile.diet_type.as_deref(), Some("vegan"));
        assert!(profile.household_size.is_none());
    }
}
