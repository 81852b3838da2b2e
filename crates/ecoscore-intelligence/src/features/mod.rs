// ABOUTME: Resolved feature set produced by the resolver and consumed by scoring
// ABOUTME: Each feature carries its value and the provenance of whichever source supplied it
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

/// Categorical encoding into the model's numeric vector
pub mod encoder;
/// Request, profile, and daily-log merge
pub mod resolver;

pub use encoder::{CategoricalEncoder, EncodedFeatures};
pub use resolver::FeatureResolver;

use ecoscore_core::models::{Feature, FeatureValue, Provenance};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A feature value together with its source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedFeature {
    /// Resolved value
    pub value: FeatureValue,
    /// Source that supplied it
    pub provenance: Provenance,
}

/// Fully populated, provenance-tagged feature set for one prediction
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedFeatureSet {
    features: BTreeMap<Feature, ResolvedFeature>,
}

impl ResolvedFeatureSet {
    /// Create an empty set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a feature's value and provenance
    pub fn insert(&mut self, feature: Feature, value: FeatureValue, provenance: Provenance) {
        self.features
            .insert(feature, ResolvedFeature { value, provenance });
    }

    /// Resolved entry for a feature
    #[must_use]
    pub fn get(&self, feature: Feature) -> Option<&ResolvedFeature> {
        self.features.get(&feature)
    }

    /// Resolved value for a feature
    #[must_use]
    pub fn value(&self, feature: Feature) -> Option<&FeatureValue> {
        self.get(feature).map(|resolved| &resolved.value)
    }

    /// Numeric view of a feature; absent or categorical features read as 0
    #[must_use]
    pub fn number(&self, feature: Feature) -> f64 {
        self.value(feature)
            .and_then(FeatureValue::as_number)
            .unwrap_or(0.0)
    }

    /// Flag view of a feature; absent or non-flag features read as false
    #[must_use]
    pub fn flag(&self, feature: Feature) -> bool {
        self.value(feature)
            .and_then(FeatureValue::as_flag)
            .unwrap_or(false)
    }

    /// Category view of a feature
    #[must_use]
    pub fn category(&self, feature: Feature) -> Option<&str> {
        self.value(feature).and_then(FeatureValue::as_category)
    }

    /// Provenance of a feature
    #[must_use]
    pub fn provenance(&self, feature: Feature) -> Option<Provenance> {
        self.get(feature).map(|resolved| resolved.provenance)
    }

    /// Feature name to provenance, for response transparency
    #[must_use]
    pub fn provenance_map(&self) -> BTreeMap<String, Provenance> {
        self.features
            .iter()
            .map(|(feature, resolved)| (feature.name().to_owned(), resolved.provenance))
            .collect()
    }

    /// Iterate in canonical feature order
    pub fn iter(&self) -> impl Iterator<Item = (Feature, &ResolvedFeature)> {
        self.features.iter().map(|(feature, resolved)| (*feature, resolved))
    }

    /// Number of resolved features
    #[must_use]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Whether nothing has been resolved
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Serialized form stored with each prediction record
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        let map: serde_json::Map<String, serde_json::Value> = self
            .features
            .iter()
            .map(|(feature, resolved)| {
                (
                    feature.name().to_owned(),
                    serde_json::json!({
                        "value": resolved.value,
                        "provenance": resolved.provenance,
                    }),
                )
            })
            .collect();
        serde_json::Value::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_views() {
        let mut set = ResolvedFeatureSet::new();
        set.insert(Feature::CarKm, FeatureValue::Number(12.5), Provenance::Request);
        set.insert(Feature::Recycles, FeatureValue::Flag(true), Provenance::Profile);
        set.insert(Feature::DietType, FeatureValue::category("vegan"), Provenance::Default);

        assert!((set.number(Feature::CarKm) - 12.5).abs() < f64::EPSILON);
        assert!((set.number(Feature::Recycles) - 1.0).abs() < f64::EPSILON);
        assert!(set.flag(Feature::Recycles));
        assert!(!set.flag(Feature::Composts));
        assert_eq!(set.category(Feature::DietType), Some("vegan"));
        assert!(set.number(Feature::DietType).abs() < f64::EPSILON);
    }

    #[test]
    fn test_json_carries_value_and_provenance() {
        let mut set = ResolvedFeatureSet::new();
        set.insert(Feature::CarKm, FeatureValue::Number(20.0), Provenance::Request);
        let json = set.to_json();
        assert_eq!(json["car_km"]["value"], 20.0);
        assert_eq!(json["car_km"]["provenance"], "request");
        assert_eq!(set.provenance_map()["car_km"], Provenance::Request);
    }
}
