// ABOUTME: Feature catalog shared by the resolver, encoder, and recommendation rules
// ABOUTME: Feature, FeatureKind, FeatureClass, FeatureValue, and Provenance definitions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use crate::constants::{defaults, limits, vocabularies};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Value type of a feature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureKind {
    /// Non-negative quantity
    Number,
    /// Boolean flag, encoded as 0/1
    Flag,
    /// Free string validated against a published vocabulary
    Categorical,
}

/// Where a feature's value may come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureClass {
    /// Persistent default: request, then profile, then hard default
    ProfileBacked,
    /// Day-level measurement: request, then the day's log, then zero
    DailyMeasurement,
    /// Derived from other resolved features
    Computed,
}

/// Every feature the scoring model can consume, in canonical column order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    /// Number of people in the household
    HouseholdSize,
    /// Age band
    AgeGroup,
    /// General activity level
    LifestyleType,
    /// Urban, suburban, or rural
    LocationType,
    /// Primary vehicle
    VehicleType,
    /// Primary vehicle fuel
    FuelType,
    /// Diet
    DietType,
    /// Household has solar panels
    UsesSolarPanels,
    /// Household has a smart thermostat
    HasSmartThermostat,
    /// Share of household energy from renewables (0-100)
    RenewableEnergyPercent,
    /// Household separates recyclables
    Recycles,
    /// Household composts food waste
    Composts,
    /// Waste bin size
    WasteBagSize,
    /// How often the user goes out socially
    SocialActivity,
    /// Distance driven by car
    CarKm,
    /// Distance by bus
    BusKm,
    /// Distance by train
    TrainKm,
    /// Distance cycled
    BikeKm,
    /// Distance walked
    WalkKm,
    /// Distance flown
    FlightKm,
    /// Electricity consumed
    ElectricityKwh,
    /// Heating energy consumed
    HeatingKwh,
    /// Meals containing meat
    MeatMeals,
    /// Vegetarian meals
    VegetarianMeals,
    /// Vegan meals
    VeganMeals,
    /// Hours in front of screens
    ScreenTimeHours,
    /// Hours spent outdoors
    OutdoorHours,
    /// Bags of general waste thrown out
    WasteBags,
    /// Sum of all travel-mode distances
    TotalDistance,
}

impl Feature {
    /// All features in canonical column order
    pub const ALL: [Self; 29] = [
        Self::HouseholdSize,
        Self::AgeGroup,
        Self::LifestyleType,
        Self::LocationType,
        Self::VehicleType,
        Self::FuelType,
        Self::DietType,
        Self::UsesSolarPanels,
        Self::HasSmartThermostat,
        Self::RenewableEnergyPercent,
        Self::Recycles,
        Self::Composts,
        Self::WasteBagSize,
        Self::SocialActivity,
        Self::CarKm,
        Self::BusKm,
        Self::TrainKm,
        Self::BikeKm,
        Self::WalkKm,
        Self::FlightKm,
        Self::ElectricityKwh,
        Self::HeatingKwh,
        Self::MeatMeals,
        Self::VegetarianMeals,
        Self::VeganMeals,
        Self::ScreenTimeHours,
        Self::OutdoorHours,
        Self::WasteBags,
        Self::TotalDistance,
    ];

    /// Travel modes summed into `total_distance`
    pub const TRAVEL_MODES: [Self; 6] = [
        Self::CarKm,
        Self::BusKm,
        Self::TrainKm,
        Self::BikeKm,
        Self::WalkKm,
        Self::FlightKm,
    ];

    /// Meal counters summed into the dashboard's meals-logged figure
    pub const MEALS: [Self; 3] = [Self::MeatMeals, Self::VegetarianMeals, Self::VeganMeals];

    /// Stable snake-case name used in requests, model artifacts, and storage
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::HouseholdSize => "household_size",
            Self::AgeGroup => "age_group",
            Self::LifestyleType => "lifestyle_type",
            Self::LocationType => "location_type",
            Self::VehicleType => "vehicle_type",
            Self::FuelType => "fuel_type",
            Self::DietType => "diet_type",
            Self::UsesSolarPanels => "uses_solar_panels",
            Self::HasSmartThermostat => "has_smart_thermostat",
            Self::RenewableEnergyPercent => "renewable_energy_percent",
            Self::Recycles => "recycles",
            Self::Composts => "composts",
            Self::WasteBagSize => "waste_bag_size",
            Self::SocialActivity => "social_activity",
            Self::CarKm => "car_km",
            Self::BusKm => "bus_km",
            Self::TrainKm => "train_km",
            Self::BikeKm => "bike_km",
            Self::WalkKm => "walk_km",
            Self::FlightKm => "flight_km",
            Self::ElectricityKwh => "electricity_kwh",
            Self::HeatingKwh => "heating_kwh",
            Self::MeatMeals => "meat_meals",
            Self::VegetarianMeals => "vegetarian_meals",
            Self::VeganMeals => "vegan_meals",
            Self::ScreenTimeHours => "screen_time_hours",
            Self::OutdoorHours => "outdoor_hours",
            Self::WasteBags => "waste_bags",
            Self::TotalDistance => "total_distance",
        }
    }

    /// Look up a feature by its snake-case name
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|feature| feature.name() == name)
    }

    /// Value type of this feature
    #[must_use]
    pub const fn kind(self) -> FeatureKind {
        match self {
            Self::AgeGroup
            | Self::LifestyleType
            | Self::LocationType
            | Self::VehicleType
            | Self::FuelType
            | Self::DietType
            | Self::WasteBagSize
            | Self::SocialActivity => FeatureKind::Categorical,
            Self::UsesSolarPanels | Self::HasSmartThermostat | Self::Recycles | Self::Composts => {
                FeatureKind::Flag
            }
            _ => FeatureKind::Number,
        }
    }

    /// Resolution class of this feature
    #[must_use]
    pub const fn class(self) -> FeatureClass {
        match self {
            Self::HouseholdSize
            | Self::AgeGroup
            | Self::LifestyleType
            | Self::LocationType
            | Self::VehicleType
            | Self::FuelType
            | Self::DietType
            | Self::UsesSolarPanels
            | Self::HasSmartThermostat
            | Self::RenewableEnergyPercent
            | Self::Recycles
            | Self::Composts
            | Self::WasteBagSize
            | Self::SocialActivity => FeatureClass::ProfileBacked,
            Self::TotalDistance => FeatureClass::Computed,
            _ => FeatureClass::DailyMeasurement,
        }
    }

    /// Whether this feature is categorical
    #[must_use]
    pub const fn is_categorical(self) -> bool {
        matches!(self.kind(), FeatureKind::Categorical)
    }

    /// Inclusive upper bound for numeric features that have one
    #[must_use]
    pub const fn max_value(self) -> Option<f64> {
        match self {
            Self::RenewableEnergyPercent => Some(limits::MAX_RENEWABLE_PERCENT),
            _ => None,
        }
    }

    /// Documented hard default; `None` for computed features
    #[must_use]
    pub fn default_value(self) -> Option<FeatureValue> {
        let value = match self {
            Self::HouseholdSize => FeatureValue::Number(defaults::HOUSEHOLD_SIZE),
            Self::AgeGroup => FeatureValue::category(defaults::AGE_GROUP),
            Self::LifestyleType => FeatureValue::category(defaults::LIFESTYLE_TYPE),
            Self::LocationType => FeatureValue::category(defaults::LOCATION_TYPE),
            Self::VehicleType => FeatureValue::category(defaults::VEHICLE_TYPE),
            Self::FuelType => FeatureValue::category(defaults::FUEL_TYPE),
            Self::DietType => FeatureValue::category(defaults::DIET_TYPE),
            Self::WasteBagSize => FeatureValue::category(defaults::WASTE_BAG_SIZE),
            Self::SocialActivity => FeatureValue::category(defaults::SOCIAL_ACTIVITY),
            Self::UsesSolarPanels | Self::HasSmartThermostat | Self::Recycles | Self::Composts => {
                FeatureValue::Flag(false)
            }
            Self::RenewableEnergyPercent => {
                FeatureValue::Number(defaults::RENEWABLE_ENERGY_PERCENT)
            }
            Self::TotalDistance => return None,
            _ => FeatureValue::Number(defaults::DAILY_MEASUREMENT),
        };
        Some(value)
    }

    /// Built-in vocabulary for categorical features
    #[must_use]
    pub const fn default_vocabulary(self) -> Option<&'static [&'static str]> {
        match self {
            Self::AgeGroup => Some(vocabularies::AGE_GROUP),
            Self::LifestyleType => Some(vocabularies::LIFESTYLE_TYPE),
            Self::LocationType => Some(vocabularies::LOCATION_TYPE),
            Self::VehicleType => Some(vocabularies::VEHICLE_TYPE),
            Self::FuelType => Some(vocabularies::FUEL_TYPE),
            Self::DietType => Some(vocabularies::DIET_TYPE),
            Self::WasteBagSize => Some(vocabularies::WASTE_BAG_SIZE),
            Self::SocialActivity => Some(vocabularies::SOCIAL_ACTIVITY),
            _ => None,
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single resolved feature value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    /// Numeric quantity
    Number(f64),
    /// Boolean flag
    Flag(bool),
    /// Categorical string
    Category(String),
}

impl FeatureValue {
    /// Build a categorical value
    pub fn category(value: impl Into<String>) -> Self {
        Self::Category(value.into())
    }

    /// Numeric view; flags read as 0/1, categories have none
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Flag(flag) => Some(if *flag { 1.0 } else { 0.0 }),
            Self::Category(_) => None,
        }
    }

    /// Flag view
    #[must_use]
    pub const fn as_flag(&self) -> Option<bool> {
        match self {
            Self::Flag(flag) => Some(*flag),
            _ => None,
        }
    }

    /// Category view
    #[must_use]
    pub fn as_category(&self) -> Option<&str> {
        match self {
            Self::Category(value) => Some(value),
            _ => None,
        }
    }
}

/// Which source supplied a resolved feature value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Explicitly present in the prediction request
    Request,
    /// Taken from the user's stored profile
    Profile,
    /// Taken from the user's daily log for the target date
    DailyLog,
    /// Documented hard default
    Default,
    /// Derived from other resolved features
    Computed,
}

impl Provenance {
    /// Wire representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Request => "request",
            Self::Profile => "profile",
            Self::DailyLog => "daily_log",
            Self::Default => "default",
            Self::Computed => "computed",
        }
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for feature in Feature::ALL {
            assert_eq!(Feature::from_name(feature.name()), Some(feature));
        }
        assert_eq!(Feature::from_name("carbon_magic"), None);
    }

    #[test]
    fn test_every_categorical_feature_has_vocabulary_and_default_member() {
        for feature in Feature::ALL.into_iter().filter(|f| f.is_categorical()) {
            let vocab = feature.default_vocabulary().unwrap();
            let default = feature.default_value().unwrap();
            assert!(vocab.contains(&default.as_category().unwrap()), "{feature}");
        }
    }

    #[test]
    fn test_only_total_distance_is_computed() {
        let computed: Vec<Feature> = Feature::ALL
            .into_iter()
            .filter(|f| f.class() == FeatureClass::Computed)
            .collect();
        assert_eq!(computed, vec![Feature::TotalDistance]);
        assert!(Feature::TotalDistance.default_value().is_none());
    }

    #[test]
    fn test_feature_value_untagged_serde() {
        let values: Vec<FeatureValue> = serde_json::from_str(r#"[3.5, true, "vegan"]"#).unwrap();
        assert_eq!(
            values,
            vec![
                FeatureValue::Number(3.5),
                FeatureValue::Flag(true),
                FeatureValue::category("vegan"),
            ]
        );
    }
}
