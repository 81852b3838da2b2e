// ABOUTME: Encodes a resolved feature set into the model's numeric input vector
// ABOUTME: Categories become vocabulary ordinals; unknown values are errors, never remapped
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use super::ResolvedFeatureSet;
use crate::errors::ValidationError;
use crate::model::ModelMetadata;
use ecoscore_core::models::{Feature, FeatureValue};

/// Model input vector in the model's column order
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedFeatures {
    values: Vec<f64>,
}

impl EncodedFeatures {
    /// Column values
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Number of columns
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the vector has no columns
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Maps resolved values onto the numeric representation a model expects
#[derive(Debug, Clone, Copy)]
pub struct CategoricalEncoder<'a> {
    metadata: &'a ModelMetadata,
}

impl<'a> CategoricalEncoder<'a> {
    /// Create an encoder for one loaded model
    #[must_use]
    pub const fn new(metadata: &'a ModelMetadata) -> Self {
        Self { metadata }
    }

    /// Encode a single value
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::UnknownCategory`] for a category outside
    /// the model vocabulary
    pub fn encode_value(
        &self,
        feature: Feature,
        value: &FeatureValue,
    ) -> Result<f64, ValidationError> {
        match value {
            FeatureValue::Number(number) => Ok(*number),
            FeatureValue::Flag(flag) => Ok(if *flag { 1.0 } else { 0.0 }),
            FeatureValue::Category(category) => {
                let index = self.metadata.vocabularies.check(feature, category)?;
                Ok(index as f64)
            }
        }
    }

    /// Encode a resolved set into the model's column order
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if a model column has no resolved value
    /// or holds a category the model does not know
    pub fn encode(
        &self,
        features: &ResolvedFeatureSet,
    ) -> Result<EncodedFeatures, ValidationError> {
        let values = self
            .metadata
            .feature_order
            .iter()
            .map(|&feature| {
                let value = features
                    .value(feature)
                    .ok_or_else(|| ValidationError::Missing {
                        field: feature.name().to_owned(),
                    })?;
                self.encode_value(feature, value)
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(EncodedFeatures { values })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FeatureResolver;
    use crate::model::{LoadedModel, ModelArtifact};
    use chrono::NaiveDate;
    use ecoscore_core::models::{PredictionRequest, Provenance};

    fn model() -> LoadedModel {
        LoadedModel::from_artifact(ModelArtifact::new("t", 50.0, Vec::new())).unwrap()
    }

    #[test]
    fn test_encodes_in_model_order() {
        let model = model();
        let request: PredictionRequest = serde_json::from_str(
            r#"{"diet_type": "vegan", "recycles": true, "car_km": 12, "bus_km": 3}"#,
        )
        .unwrap();
        let resolved = FeatureResolver::new(model.vocabularies())
            .resolve(
                &request,
                None,
                None,
                NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
            )
            .unwrap();

        let encoded = CategoricalEncoder::new(model.metadata())
            .encode(&resolved)
            .unwrap();
        let values = encoded.as_slice();
        assert_eq!(encoded.len(), 29);
        assert!((values[Feature::DietType as usize] - 2.0).abs() < f64::EPSILON);
        assert!((values[Feature::Recycles as usize] - 1.0).abs() < f64::EPSILON);
        assert!((values[Feature::CarKm as usize] - 12.0).abs() < f64::EPSILON);
        assert!((values[Feature::TotalDistance as usize] - 15.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_unknown_category_is_an_error() {
        let model = model();
        let encoder = CategoricalEncoder::new(model.metadata());
        let result = encoder.encode_value(Feature::FuelType, &FeatureValue::category("steam"));
        assert!(matches!(result, Err(ValidationError::UnknownCategory { .. })));
    }

    #[test]
    fn test_missing_column_is_an_error() {
        let model = model();
        let mut partial = ResolvedFeatureSet::new();
        partial.insert(
            Feature::HouseholdSize,
            FeatureValue::Number(2.0),
            Provenance::Default,
        );
        let error = CategoricalEncoder::new(model.metadata())
            .encode(&partial)
            .unwrap_err();
        assert_eq!(error.field(), "age_group");
    }
}
