// ABOUTME: Inbound prediction request carrying an optional subset of feature fields
// ABOUTME: Every field may be omitted; omitted values resolve from profile, daily log, or defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use super::feature::{Feature, FeatureValue};
use serde::{Deserialize, Serialize};

/// Partial feature input for one prediction.
///
/// Numeric fields are signed on the wire so that negative quantities reach
/// validation and are reported against their field name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictionRequest {
    /// Target date (`YYYY-MM-DD`); today when omitted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    /// Number of people in the household
    #[serde(skip_serializing_if = "Option::is_none")]
    pub household_size: Option<f64>,
    /// Age band
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age_group: Option<String>,
    /// General activity level
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lifestyle_type: Option<String>,
    /// Urban, suburban, or rural
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_type: Option<String>,
    /// Primary vehicle
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle_type: Option<String>,
    /// Primary vehicle fuel
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fuel_type: Option<String>,
    /// Diet
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diet_type: Option<String>,
    /// Household has solar panels
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uses_solar_panels: Option<bool>,
    /// Household has a smart thermostat
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_smart_thermostat: Option<bool>,
    /// Share of household energy from renewables (0-100)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub renewable_energy_percent: Option<f64>,
    /// Household separates recyclables
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recycles: Option<bool>,
    /// Household composts food waste
    #[serde(skip_serializing_if = "Option::is_none")]
    pub composts: Option<bool>,
    /// Waste bin size
    #[serde(skip_serializing_if = "Option::is_none")]
    pub waste_bag_size: Option<String>,
    /// How often the user goes out socially
    #[serde(skip_serializing_if = "Option::is_none")]
    pub social_activity: Option<String>,

    /// Distance driven by car (km)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub car_km: Option<f64>,
    /// Distance by bus (km)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bus_km: Option<f64>,
    /// Distance by train (km)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub train_km: Option<f64>,
    /// Distance cycled (km)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bike_km: Option<f64>,
    /// Distance walked (km)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub walk_km: Option<f64>,
    /// Distance flown (km)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flight_km: Option<f64>,
    /// Electricity consumed (kWh)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub electricity_kwh: Option<f64>,
    /// Heating energy consumed (kWh)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heating_kwh: Option<f64>,
    /// Meals containing meat
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meat_meals: Option<f64>,
    /// Vegetarian meals
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vegetarian_meals: Option<f64>,
    /// Vegan meals
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vegan_meals: Option<f64>,
    /// Hours in front of screens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screen_time_hours: Option<f64>,
    /// Hours spent outdoors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outdoor_hours: Option<f64>,
    /// Bags of general waste thrown out
    #[serde(skip_serializing_if = "Option::is_none")]
    pub waste_bags: Option<f64>,
}

impl PredictionRequest {
    /// Value explicitly supplied for a feature, if any.
    ///
    /// Computed features are never taken from the request.
    #[must_use]
    pub fn value_of(&self, feature: Feature) -> Option<FeatureValue> {
        let number = |value: Option<f64>| value.map(FeatureValue::Number);
        let category = |value: &Option<String>| value.clone().map(FeatureValue::Category);
        let flag = |value: Option<bool>| value.map(FeatureValue::Flag);

        match feature {
            Feature::HouseholdSize => number(self.household_size),
            Feature::AgeGroup => category(&self.age_group),
            Feature::LifestyleType => category(&self.lifestyle_type),
            Feature::LocationType => category(&self.location_type),
            Feature::VehicleType => category(&self.vehicle_type),
            Feature::FuelType => category(&self.fuel_type),
            Feature::DietType => category(&self.diet_type),
            Feature::UsesSolarPanels => flag(self.uses_solar_panels),
            Feature::HasSmartThermostat => flag(self.has_smart_thermostat),
            Feature::RenewableEnergyPercent => number(self.renewable_energy_percent),
            Feature::Recycles => flag(self.recycles),
            Feature::Composts => flag(self.composts),
            Feature::WasteBagSize => category(&self.waste_bag_size),
            Feature::SocialActivity => category(&self.social_activity),
            Feature::CarKm => number(self.car_km),
            Feature::BusKm => number(self.bus_km),
            Feature::TrainKm => number(self.train_km),
            Feature::BikeKm => number(self.bike_km),
            Feature::WalkKm => number(self.walk_km),
            Feature::FlightKm => number(self.flight_km),
            Feature::ElectricityKwh => number(self.electricity_kwh),
            Feature::HeatingKwh => number(self.heating_kwh),
            Feature::MeatMeals => number(self.meat_meals),
            Feature::VegetarianMeals => number(self.vegetarian_meals),
            Feature::VeganMeals => number(self.vegan_meals),
            Feature::ScreenTimeHours => number(self.screen_time_hours),
            Feature::OutdoorHours => number(self.outdoor_hours),
            Feature::WasteBags => number(self.waste_bags),
            Feature::TotalDistance => None,
        }
    }
}
