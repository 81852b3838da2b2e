// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Default vocabularies, hard feature defaults, score limits, and env keys
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! Constants module
//!
//! Constants are grouped by domain: the score domain, the default categorical
//! vocabularies, the hard defaults used when neither the request nor the
//! profile supplies a value, and the environment variable names read by the
//! server configuration.

/// Bounds of the eco score domain
pub mod score {
    /// Lowest possible score
    pub const MIN_SCORE: f64 = 0.0;
    /// Highest possible score
    pub const MAX_SCORE: f64 = 100.0;
}

/// Default categorical vocabularies, in ordinal encoding order.
///
/// A loaded model publishes its own vocabularies; these are used to build the
/// bundled model artifact and to validate profiles when no model is loaded.
pub mod vocabularies {
    /// Age bands
    pub const AGE_GROUP: &[&str] = &["18-24", "25-34", "35-44", "45-54", "55-64", "65+"];
    /// General activity level
    pub const LIFESTYLE_TYPE: &[&str] = &["sedentary", "moderate", "active"];
    /// Settlement type
    pub const LOCATION_TYPE: &[&str] = &["urban", "suburban", "rural"];
    /// Primary household vehicle
    pub const VEHICLE_TYPE: &[&str] = &[
        "none",
        "petrol_car",
        "diesel_car",
        "hybrid_car",
        "electric_car",
        "motorbike",
    ];
    /// Primary vehicle fuel
    pub const FUEL_TYPE: &[&str] = &["none", "petrol", "diesel", "electric", "hybrid", "lpg"];
    /// Diet
    pub const DIET_TYPE: &[&str] = &["omnivore", "vegetarian", "vegan", "pescatarian"];
    /// Household waste bin size
    pub const WASTE_BAG_SIZE: &[&str] = &["small", "medium", "large", "extra_large"];
    /// How often the user goes out socially
    pub const SOCIAL_ACTIVITY: &[&str] = &["never", "sometimes", "often", "very_often"];
}

/// Hard defaults for profile-backed features
pub mod defaults {
    /// Household size when unknown
    pub const HOUSEHOLD_SIZE: f64 = 2.0;
    /// Age group when unknown
    pub const AGE_GROUP: &str = "25-34";
    /// Lifestyle when unknown
    pub const LIFESTYLE_TYPE: &str = "moderate";
    /// Location when unknown
    pub const LOCATION_TYPE: &str = "suburban";
    /// Vehicle when unknown
    pub const VEHICLE_TYPE: &str = "petrol_car";
    /// Fuel when unknown
    pub const FUEL_TYPE: &str = "petrol";
    /// Diet when unknown
    pub const DIET_TYPE: &str = "omnivore";
    /// Waste bin size when unknown
    pub const WASTE_BAG_SIZE: &str = "medium";
    /// Social activity when unknown
    pub const SOCIAL_ACTIVITY: &str = "sometimes";
    /// Renewable share when unknown
    pub const RENEWABLE_ENERGY_PERCENT: f64 = 0.0;
    /// Day-level measurements default to zero
    pub const DAILY_MEASUREMENT: f64 = 0.0;
}

/// Dashboard and recommendation limits
pub mod limits {
    /// Default number of recommendations returned with a prediction
    pub const DEFAULT_MAX_RECOMMENDATIONS: usize = 5;
    /// Default trend window in days, today included
    pub const DEFAULT_TREND_DAYS: u32 = 7;
    /// Longest trend window accepted from configuration
    pub const MAX_TREND_DAYS: u32 = 31;
    /// Upper bound for the renewable energy share
    pub const MAX_RENEWABLE_PERCENT: f64 = 100.0;
}

/// Environment variable names
pub mod env_keys {
    /// Database connection URL
    pub const DATABASE_URL: &str = "ECOSCORE_DATABASE_URL";
    /// Path of the model artifact
    pub const MODEL_PATH: &str = "ECOSCORE_MODEL_PATH";
    /// Maximum recommendations per response
    pub const MAX_RECOMMENDATIONS: &str = "ECOSCORE_MAX_RECOMMENDATIONS";
    /// Trend window in days
    pub const TREND_DAYS: &str = "ECOSCORE_TREND_DAYS";
    /// Deployment environment
    pub const ENVIRONMENT: &str = "ENVIRONMENT";
}

/// Service identifiers used in structured logs
pub mod service_names {
    /// Server process name
    pub const ECOSCORE_SERVER: &str = "ecoscore-server";
}
