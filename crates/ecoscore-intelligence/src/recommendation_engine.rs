// ABOUTME: Rule-table recommendation engine turning a resolved feature set into suggestions
// ABOUTME: Matches are ranked by weight, deduplicated by text, and capped
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! # Recommendation Engine
//!
//! Each rule is a `(predicate, text, weight)` tuple. Generation collects every
//! rule whose predicate holds, sorts by weight descending (ties keep table
//! order), drops repeated texts keeping the highest-weighted copy, and
//! truncates to the configured maximum. No I/O: the same feature set always
//! yields the same list.

use crate::config::{RecommendationEngineConfig, RecommendationThresholds};
use crate::features::ResolvedFeatureSet;
use ecoscore_core::models::Feature;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Predicate deciding whether a rule applies
pub type RulePredicate = fn(&ResolvedFeatureSet, &RecommendationThresholds) -> bool;

/// One row of the rule table
#[derive(Clone)]
pub struct RecommendationRule {
    /// Stable identifier
    pub id: &'static str,
    /// Text shown to the user
    pub text: &'static str,
    /// Priority; higher ranks first
    pub weight: u32,
    /// Applicability test
    pub predicate: RulePredicate,
}

impl fmt::Debug for RecommendationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecommendationRule")
            .field("id", &self.id)
            .field("weight", &self.weight)
            .finish_non_exhaustive()
    }
}

/// A generated suggestion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Identifier of the rule that produced it
    pub rule_id: String,
    /// Text shown to the user
    pub text: String,
    /// Priority weight
    pub weight: u32,
}

const SWAP_MEAT: &str = "Swap some meat-based meals for plant-based alternatives";

const COMBUSTION_VEHICLES: &[&str] = &["petrol_car", "diesel_car", "motorbike"];
const LARGE_BINS: &[&str] = &["large", "extra_large"];

/// Built-in rule table
#[must_use]
pub fn default_rules() -> Vec<RecommendationRule> {
    vec![
        RecommendationRule {
            id: "avoid_flights",
            text: "Replace a flight with rail travel or a video call where you can",
            weight: 100,
            predicate: |f, _| f.number(Feature::FlightKm) > 0.0,
        },
        RecommendationRule {
            id: "reduce_car_distance",
            text: "Combine errands or car-share to cut down on long car journeys",
            weight: 95,
            predicate: |f, t| f.number(Feature::CarKm) > t.high_car_km,
        },
        RecommendationRule {
            id: "active_short_trips",
            text: "Walk or cycle for short trips instead of driving",
            weight: 90,
            predicate: |f, t| {
                let car = f.number(Feature::CarKm);
                car > 0.0 && car <= t.short_trip_km
            },
        },
        RecommendationRule {
            id: "cleaner_vehicle",
            text: "Consider switching to an electric or hybrid vehicle",
            weight: 80,
            predicate: |f, _| {
                f.number(Feature::CarKm) > 0.0
                    && f
                        .category(Feature::VehicleType)
                        .is_some_and(|vehicle| COMBUSTION_VEHICLES.contains(&vehicle))
            },
        },
        RecommendationRule {
            id: "fewer_meat_meals",
            text: SWAP_MEAT,
            weight: 75,
            predicate: |f, t| f.number(Feature::MeatMeals) >= t.high_meat_meals,
        },
        RecommendationRule {
            id: "save_electricity",
            text: "Switch off standby devices and use efficient appliances to save electricity",
            weight: 70,
            predicate: |f, t| f.number(Feature::ElectricityKwh) > t.high_electricity_kwh,
        },
        RecommendationRule {
            id: "renewable_energy",
            text: "Move to a renewable energy tariff or install solar panels",
            weight: 65,
            predicate: |f, t| {
                !f.flag(Feature::UsesSolarPanels)
                    && f.number(Feature::RenewableEnergyPercent) < t.low_renewable_percent
            },
        },
        RecommendationRule {
            id: "plant_based_diet",
            text: SWAP_MEAT,
            weight: 60,
            predicate: |f, _| f.category(Feature::DietType) == Some("omnivore"),
        },
        RecommendationRule {
            id: "smart_thermostat",
            text: "Install a smart thermostat to cut wasted heating",
            weight: 55,
            predicate: |f, t| {
                !f.flag(Feature::HasSmartThermostat)
                    && f.number(Feature::HeatingKwh) > t.high_heating_kwh
            },
        },
        RecommendationRule {
            id: "start_recycling",
            text: "Start separating recyclables from general waste",
            weight: 50,
            predicate: |f, _| !f.flag(Feature::Recycles),
        },
        RecommendationRule {
            id: "reduce_waste",
            text: "Cut waste by buying loose produce and reusing containers",
            weight: 45,
            predicate: |f, t| {
                f.number(Feature::WasteBags) > t.high_waste_bags
                    || f
                        .category(Feature::WasteBagSize)
                        .is_some_and(|size| LARGE_BINS.contains(&size))
            },
        },
        RecommendationRule {
            id: "start_composting",
            text: "Compost food scraps to keep them out of landfill",
            weight: 40,
            predicate: |f, _| !f.flag(Feature::Composts),
        },
        RecommendationRule {
            id: "less_screen_time",
            text: "Cut back on screen time to save energy at home",
            weight: 30,
            predicate: |f, t| f.number(Feature::ScreenTimeHours) > t.high_screen_time_hours,
        },
        RecommendationRule {
            id: "time_outdoors",
            text: "Spend more time outdoors instead of running devices indoors",
            weight: 20,
            predicate: |f, t| f.number(Feature::OutdoorHours) < t.low_outdoor_hours,
        },
    ]
}

/// Deterministic rule-table recommendation engine
#[derive(Debug, Clone)]
pub struct RecommendationEngine {
    rules: Vec<RecommendationRule>,
    config: RecommendationEngineConfig,
}

impl Default for RecommendationEngine {
    fn default() -> Self {
        Self::new(RecommendationEngineConfig::default())
    }
}

impl RecommendationEngine {
    /// Engine over the built-in rule table
    #[must_use]
    pub fn new(config: RecommendationEngineConfig) -> Self {
        Self::with_rules(default_rules(), config)
    }

    /// Engine over a custom rule table
    #[must_use]
    pub const fn with_rules(
        rules: Vec<RecommendationRule>,
        config: RecommendationEngineConfig,
    ) -> Self {
        Self { rules, config }
    }

    /// Rule table in declaration order
    #[must_use]
    pub fn rules(&self) -> &[RecommendationRule] {
        &self.rules
    }

    /// Active configuration
    #[must_use]
    pub const fn config(&self) -> &RecommendationEngineConfig {
        &self.config
    }

    /// Ranked, deduplicated, capped recommendations for a feature set
    #[must_use]
    pub fn generate(&self, features: &ResolvedFeatureSet) -> Vec<Recommendation> {
        let thresholds = &self.config.thresholds;
        let mut matched: Vec<&RecommendationRule> = self
            .rules
            .iter()
            .filter(|rule| (rule.predicate)(features, thresholds))
            .collect();

        // sort_by is stable, so equal weights keep table order
        matched.sort_by(|a, b| b.weight.cmp(&a.weight));

        let mut seen = HashSet::new();
        matched
            .into_iter()
            .filter(|rule| seen.insert(rule.text))
            .take(self.config.limits.max_recommendations)
            .map(|rule| Recommendation {
                rule_id: rule.id.to_owned(),
                text: rule.text.to_owned(),
                weight: rule.weight,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FeatureResolver;
    use crate::model::Vocabularies;
    use chrono::NaiveDate;
    use ecoscore_core::models::PredictionRequest;

    fn resolve(json: &str) -> ResolvedFeatureSet {
        let vocabularies = Vocabularies::defaults();
        let request: PredictionRequest = serde_json::from_str(json).unwrap();
        FeatureResolver::new(&vocabularies)
            .resolve(
                &request,
                None,
                None,
                NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
            )
            .unwrap()
    }

    fn ids(recommendations: &[Recommendation]) -> Vec<&str> {
        recommendations.iter().map(|r| r.rule_id.as_str()).collect()
    }

    #[test]
    fn test_default_weights_are_distinct() {
        let rules = default_rules();
        let weights: HashSet<u32> = rules.iter().map(|rule| rule.weight).collect();
        assert_eq!(weights.len(), rules.len());
    }

    #[test]
    fn test_sorted_capped_and_unique() {
        let features = resolve(
            r#"{"flight_km": 300, "car_km": 45, "meat_meals": 3, "electricity_kwh": 20,
                "heating_kwh": 15, "screen_time_hours": 9}"#,
        );
        let engine = RecommendationEngine::default();
        let recommendations = engine.generate(&features);

        assert_eq!(recommendations.len(), 5);
        assert!(recommendations.windows(2).all(|w| w[0].weight > w[1].weight));
        let texts: HashSet<&str> = recommendations.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts.len(), recommendations.len());
        assert_eq!(
            ids(&recommendations),
            vec![
                "avoid_flights",
                "reduce_car_distance",
                "cleaner_vehicle",
                "fewer_meat_meals",
                "save_electricity"
            ]
        );
    }

    #[test]
    fn test_duplicate_text_keeps_highest_weight() {
        let features = resolve(r#"{"meat_meals": 2, "diet_type": "omnivore"}"#);
        let config = RecommendationEngineConfig::with_max_recommendations(20);
        let engine = RecommendationEngine::new(config);
        let recommendations = engine.generate(&features);
        let ids = ids(&recommendations);
        assert!(ids.contains(&"fewer_meat_meals"));
        assert!(!ids.contains(&"plant_based_diet"));
    }

    #[test]
    fn test_green_household_gets_few_suggestions() {
        let features = resolve(
            r#"{"diet_type": "vegan", "uses_solar_panels": true, "recycles": true,
                "composts": true, "waste_bag_size": "small", "outdoor_hours": 3,
                "bike_km": 10}"#,
        );
        let recommendations = RecommendationEngine::default().generate(&features);
        assert!(recommendations.is_empty(), "{recommendations:?}");
    }

    #[test]
    fn test_generation_is_deterministic() {
        let features = resolve(r#"{"car_km": 3}"#);
        let engine = RecommendationEngine::default();
        assert_eq!(engine.generate(&features), engine.generate(&features));
        assert_eq!(engine.generate(&features)[0].rule_id, "active_short_trips");
    }

    #[test]
    fn test_custom_rules_tie_break_on_table_order() {
        let rules = vec![
            RecommendationRule {
                id: "first",
                text: "first",
                weight: 10,
                predicate: |_, _| true,
            },
            RecommendationRule {
                id: "second",
                text: "second",
                weight: 10,
                predicate: |_, _| true,
            },
        ];
        let engine = RecommendationEngine::with_rules(rules, RecommendationEngineConfig::default());
        let generated = engine.generate(&ResolvedFeatureSet::new());
        assert_eq!(ids(&generated), vec!["first", "second"]);
    }
}
