// ABOUTME: Ordered categorical vocabularies published by the loaded model
// ABOUTME: Membership checks for validation and ordinal lookup for encoding
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use crate::errors::ValidationError;
use ecoscore_core::models::Feature;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Ordered list of the values a categorical feature may take.
///
/// A value's position is its model encoding, so order is significant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoricalVocabulary {
    values: Vec<String>,
}

impl CategoricalVocabulary {
    /// Build from an ordered list of values
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Ordinal position of `value`, if it is a member
    #[must_use]
    pub fn index_of(&self, value: &str) -> Option<usize> {
        self.values.iter().position(|member| member == value)
    }

    /// Whether `value` is a member
    #[must_use]
    pub fn contains(&self, value: &str) -> bool {
        self.index_of(value).is_some()
    }

    /// Members in encoding order
    #[must_use]
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Number of members
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the vocabulary has no members
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Vocabulary for every categorical feature
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Vocabularies {
    by_feature: BTreeMap<Feature, CategoricalVocabulary>,
}

impl Vocabularies {
    /// Built-in vocabularies for all categorical features
    #[must_use]
    pub fn defaults() -> Self {
        let by_feature = Feature::ALL
            .into_iter()
            .filter_map(|feature| {
                feature
                    .default_vocabulary()
                    .map(|values| (feature, CategoricalVocabulary::new(values.iter().copied())))
            })
            .collect();
        Self { by_feature }
    }

    /// Replace the vocabulary for one feature
    pub fn insert(&mut self, feature: Feature, vocabulary: CategoricalVocabulary) {
        self.by_feature.insert(feature, vocabulary);
    }

    /// Vocabulary for a feature
    #[must_use]
    pub fn get(&self, feature: Feature) -> Option<&CategoricalVocabulary> {
        self.by_feature.get(&feature)
    }

    /// Iterate in canonical feature order
    pub fn iter(&self) -> impl Iterator<Item = (Feature, &CategoricalVocabulary)> {
        self.by_feature.iter().map(|(feature, vocab)| (*feature, vocab))
    }

    /// Check a categorical value against its feature's vocabulary
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::UnknownCategory`] if the value is not a
    /// member, or the feature has no vocabulary at all
    pub fn check(&self, feature: Feature, value: &str) -> Result<usize, ValidationError> {
        let vocabulary = self.get(feature);
        vocabulary
            .and_then(|vocab| vocab.index_of(value))
            .ok_or_else(|| ValidationError::UnknownCategory {
                field: feature.name().to_owned(),
                value: value.to_owned(),
                allowed: vocabulary.map_or_else(String::new, |vocab| vocab.values().join(", ")),
            })
    }

    /// Plain map keyed by feature name, for serialization
    #[must_use]
    pub fn to_name_map(&self) -> BTreeMap<String, Vec<String>> {
        self.iter()
            .map(|(feature, vocab)| (feature.name().to_owned(), vocab.values().to_vec()))
            .collect()
    }
}
