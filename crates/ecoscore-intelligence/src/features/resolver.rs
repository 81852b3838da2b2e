// ABOUTME: Merges request input, stored profile, and the day's log into one feature set
// ABOUTME: Pure function over its inputs; validation failures name the offending field
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! # Feature Resolution
//!
//! Sources are consulted per feature class:
//!
//! - profile-backed: request, then profile, then the hard default
//! - daily measurement: request, then the day's log, then zero
//! - computed: `total_distance` is the sum of the resolved travel modes
//!
//! Every resolved value is validated whatever its source, so a stale profile
//! value that a newer model vocabulary no longer accepts is reported rather
//! than silently remapped.

use super::ResolvedFeatureSet;
use crate::errors::ValidationError;
use crate::model::Vocabularies;
use chrono::NaiveDate;
use ecoscore_core::models::{
    DailyLog, Feature, FeatureClass, FeatureValue, PredictionRequest, Profile, Provenance,
};

/// Field name reported for date validation failures
const DATE_FIELD: &str = "date";

/// Builds a [`ResolvedFeatureSet`] against a set of published vocabularies
#[derive(Debug, Clone, Copy)]
pub struct FeatureResolver<'a> {
    vocabularies: &'a Vocabularies,
}

impl<'a> FeatureResolver<'a> {
    /// Create a resolver validating categories against `vocabularies`
    #[must_use]
    pub const fn new(vocabularies: &'a Vocabularies) -> Self {
        Self { vocabularies }
    }

    /// Calendar date a request targets; `today` when omitted
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MalformedDate`] unless the date is `YYYY-MM-DD`
    pub fn target_date(raw: Option<&str>, today: NaiveDate) -> Result<NaiveDate, ValidationError> {
        raw.map_or(Ok(today), |value| {
            NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
                ValidationError::MalformedDate {
                    field: DATE_FIELD.to_owned(),
                    value: value.to_owned(),
                }
            })
        })
    }

    /// Resolve every catalog feature for one prediction.
    ///
    /// `log` should be the user's log for the target date; a log for any
    /// other date is ignored.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] in canonical feature order
    pub fn resolve(
        &self,
        request: &PredictionRequest,
        profile: Option<&Profile>,
        log: Option<&DailyLog>,
        date: NaiveDate,
    ) -> Result<ResolvedFeatureSet, ValidationError> {
        let log = log.filter(|log| log.date == date);
        let mut resolved = ResolvedFeatureSet::new();

        for feature in Feature::ALL {
            let (value, provenance) = match feature.class() {
                FeatureClass::ProfileBacked => request
                    .value_of(feature)
                    .map(|value| (value, Provenance::Request))
                    .or_else(|| {
                        profile
                            .and_then(|profile| profile.value_of(feature))
                            .map(|value| (value, Provenance::Profile))
                    })
                    .or_else(|| feature.default_value().map(|value| (value, Provenance::Default))),
                FeatureClass::DailyMeasurement => request
                    .value_of(feature)
                    .map(|value| (value, Provenance::Request))
                    .or_else(|| {
                        log.and_then(|log| log.value_of(feature))
                            .map(|value| (value, Provenance::DailyLog))
                    })
                    .or_else(|| feature.default_value().map(|value| (value, Provenance::Default))),
                // Derived once every travel mode is known
                FeatureClass::Computed => continue,
            }
            .ok_or_else(|| ValidationError::Missing {
                field: feature.name().to_owned(),
            })?;

            self.validate(feature, &value)?;
            resolved.insert(feature, value, provenance);
        }

        let total_distance = Feature::TRAVEL_MODES
            .into_iter()
            .map(|mode| resolved.number(mode))
            .sum();
        // Finite modes can still overflow once summed
        validate_quantity(Feature::TotalDistance, total_distance)?;
        resolved.insert(
            Feature::TotalDistance,
            FeatureValue::Number(total_distance),
            Provenance::Computed,
        );

        Ok(resolved)
    }

    /// Check one value against its feature's type, range, and vocabulary
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] naming the feature
    pub fn validate(&self, feature: Feature, value: &FeatureValue) -> Result<(), ValidationError> {
        match value {
            FeatureValue::Number(number) => validate_quantity(feature, *number),
            FeatureValue::Category(category) => {
                self.vocabularies.check(feature, category).map(|_| ())
            }
            FeatureValue::Flag(_) => Ok(()),
        }
    }

    /// Validate every field present in a profile
    ///
    /// # Errors
    ///
    /// Returns the first invalid field in canonical feature order
    pub fn validate_profile(&self, profile: &Profile) -> Result<(), ValidationError> {
        Feature::ALL.into_iter().try_for_each(|feature| {
            profile
                .value_of(feature)
                .map_or(Ok(()), |value| self.validate(feature, &value))
        })
    }

    /// Validate every measurement present in a daily log
    ///
    /// # Errors
    ///
    /// Returns the first invalid field in canonical feature order
    pub fn validate_log(&self, log: &DailyLog) -> Result<(), ValidationError> {
        Feature::ALL.into_iter().try_for_each(|feature| {
            log.value_of(feature)
                .map_or(Ok(()), |value| self.validate(feature, &value))
        })
    }
}

fn validate_quantity(feature: Feature, value: f64) -> Result<(), ValidationError> {
    let field = || feature.name().to_owned();
    if !value.is_finite() {
        return Err(ValidationError::NonFinite { field: field() });
    }
    if value < 0.0 {
        return Err(ValidationError::NegativeQuantity {
            field: field(),
            value,
        });
    }
    if let Some(max) = feature.max_value() {
        if value > max {
            return Err(ValidationError::OutOfRange {
                field: field(),
                value,
                max,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
    }

    fn request(json: &str) -> PredictionRequest {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_request_profile_default_precedence() {
        let vocabularies = Vocabularies::defaults();
        let resolver = FeatureResolver::new(&vocabularies);
        let profile = Profile {
            household_size: Some(3.0),
            diet_type: Some("omnivore".into()),
            ..Profile::new(Uuid::new_v4())
        };

        let resolved = resolver
            .resolve(
                &request(r#"{"car_km": 20, "diet_type": "vegan", "household_size": null}"#),
                Some(&profile),
                None,
                date(),
            )
            .unwrap();

        assert!((resolved.number(Feature::HouseholdSize) - 3.0).abs() < f64::EPSILON);
        assert_eq!(resolved.provenance(Feature::HouseholdSize), Some(Provenance::Profile));
        assert_eq!(resolved.category(Feature::DietType), Some("vegan"));
        assert_eq!(resolved.provenance(Feature::DietType), Some(Provenance::Request));
        assert!((resolved.number(Feature::CarKm) - 20.0).abs() < f64::EPSILON);
        assert_eq!(resolved.provenance(Feature::CarKm), Some(Provenance::Request));
        assert_eq!(resolved.category(Feature::AgeGroup), Some("25-34"));
        assert_eq!(resolved.provenance(Feature::AgeGroup), Some(Provenance::Default));
        assert_eq!(resolved.len(), Feature::ALL.len());
    }

    #[test]
    fn test_profile_never_fills_daily_measurements() {
        let vocabularies = Vocabularies::defaults();
        let resolver = FeatureResolver::new(&vocabularies);
        let user = Uuid::new_v4();
        let log = DailyLog {
            bus_km: Some(8.0),
            ..DailyLog::new(user, date())
        };

        let resolved = resolver
            .resolve(&request(r#"{"car_km": 2}"#), Some(&Profile::new(user)), Some(&log), date())
            .unwrap();

        assert_eq!(resolved.provenance(Feature::BusKm), Some(Provenance::DailyLog));
        assert_eq!(resolved.provenance(Feature::TrainKm), Some(Provenance::Default));
        assert!(resolved.number(Feature::TrainKm).abs() < f64::EPSILON);
        assert!((resolved.number(Feature::TotalDistance) - 10.0).abs() < f64::EPSILON);
        assert_eq!(
            resolved.provenance(Feature::TotalDistance),
            Some(Provenance::Computed)
        );
    }

    #[test]
    fn test_log_for_another_date_ignored() {
        let vocabularies = Vocabularies::defaults();
        let resolver = FeatureResolver::new(&vocabularies);
        let stale = DailyLog {
            car_km: Some(50.0),
            ..DailyLog::new(Uuid::new_v4(), date().pred_opt().unwrap())
        };
        let resolved = resolver
            .resolve(&PredictionRequest::default(), None, Some(&stale), date())
            .unwrap();
        assert_eq!(resolved.provenance(Feature::CarKm), Some(Provenance::Default));
    }

    #[test]
    fn test_unknown_category_rejected_not_coerced() {
        let vocabularies = Vocabularies::defaults();
        let resolver = FeatureResolver::new(&vocabularies);
        let error = resolver
            .resolve(
                &request(r#"{"diet_type": "carnivore-extreme"}"#),
                None,
                None,
                date(),
            )
            .unwrap_err();
        assert!(matches!(error, ValidationError::UnknownCategory { .. }));
        assert_eq!(error.field(), "diet_type");
    }

    #[test]
    fn test_quantity_validation() {
        let vocabularies = Vocabularies::defaults();
        let resolver = FeatureResolver::new(&vocabularies);

        let negative = resolver
            .resolve(&request(r#"{"bike_km": -3}"#), None, None, date())
            .unwrap_err();
        assert_eq!(negative.field(), "bike_km");

        let over = resolver
            .resolve(
                &request(r#"{"renewable_energy_percent": 120}"#),
                None,
                None,
                date(),
            )
            .unwrap_err();
        assert!(matches!(over, ValidationError::OutOfRange { .. }));
    }

    #[test]
    fn test_overflowing_total_distance_rejected() {
        let vocabularies = Vocabularies::defaults();
        let resolver = FeatureResolver::new(&vocabularies);
        let error = resolver
            .resolve(
                &request(r#"{"car_km": 1e308, "flight_km": 1e308}"#),
                None,
                None,
                date(),
            )
            .unwrap_err();
        assert!(matches!(error, ValidationError::NonFinite { .. }));
        assert_eq!(error.field(), "total_distance");
    }

    #[test]
    fn test_target_date() {
        let today = date();
        assert_eq!(FeatureResolver::target_date(None, today), Ok(today));
        assert_eq!(
            FeatureResolver::target_date(Some("2025-01-02"), today),
            Ok(NaiveDate::from_ymd_opt(2025, 1, 2).unwrap())
        );
        let error = FeatureResolver::target_date(Some("14/03/2025"), today).unwrap_err();
        assert_eq!(error.field(), "date");
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let vocabularies = Vocabularies::defaults();
        let resolver = FeatureResolver::new(&vocabularies);
        let input = request(r#"{"car_km": 7, "recycles": true}"#);
        let first = resolver.resolve(&input, None, None, date()).unwrap();
        let second = resolver.resolve(&input, None, None, date()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_stale_profile_value_reported() {
        let vocabularies = Vocabularies::defaults();
        let resolver = FeatureResolver::new(&vocabularies);
        let profile = Profile {
            vehicle_type: Some("hovercraft".into()),
            ..Profile::new(Uuid::new_v4())
        };
        assert_eq!(
            resolver.validate_profile(&profile).unwrap_err().field(),
            "vehicle_type"
        );
    }
}
