// ABOUTME: Maps a continuous eco score onto a labeled category band
// ABOUTME: Band tables are verified at construction to tile the score domain exactly
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! Score categorization.
//!
//! Bands are half-open `[min, max)` except the last, which is closed at
//! [`MAX_SCORE`]. A boundary score therefore belongs to the upper band:
//! with the default table `20.0` is `Poor`, not `Critical`.

use crate::config::ConfigError;
use ecoscore_core::constants::score::{MAX_SCORE, MIN_SCORE};
use serde::{Deserialize, Serialize};

/// One labeled sub-range of the score domain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBand {
    /// Inclusive lower bound
    pub min: f64,
    /// Upper bound (exclusive, except for the final band)
    pub max: f64,
    /// Category label
    pub label: String,
}

impl ScoreBand {
    /// Create a band
    pub fn new(min: f64, max: f64, label: impl Into<String>) -> Self {
        Self {
            min,
            max,
            label: label.into(),
        }
    }
}

/// Default band table
#[must_use]
pub fn default_bands() -> Vec<ScoreBand> {
    vec![
        ScoreBand::new(0.0, 20.0, "Critical"),
        ScoreBand::new(20.0, 40.0, "Poor"),
        ScoreBand::new(40.0, 60.0, "Fair"),
        ScoreBand::new(60.0, 80.0, "Good"),
        ScoreBand::new(80.0, 100.0, "Excellent"),
    ]
}

/// Ordered band table known to tile `[0, 100]`
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreCategorizer {
    bands: Vec<ScoreBand>,
}

impl Default for ScoreCategorizer {
    fn default() -> Self {
        Self {
            bands: default_bands(),
        }
    }
}

impl ScoreCategorizer {
    /// Build a categorizer after checking the table has no gaps or overlaps
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBands`] if the table is empty, unordered,
    /// has a gap or overlap, or does not start at 0 and end at 100
    pub fn new(bands: Vec<ScoreBand>) -> Result<Self, ConfigError> {
        validate_bands(&bands)?;
        Ok(Self { bands })
    }

    /// Ordered band table
    #[must_use]
    pub fn bands(&self) -> &[ScoreBand] {
        &self.bands
    }

    /// Band containing `score`; out-of-domain scores are clamped first
    #[must_use]
    pub fn band_for(&self, score: f64) -> &ScoreBand {
        let score = if score.is_nan() {
            MIN_SCORE
        } else {
            score.clamp(MIN_SCORE, MAX_SCORE)
        };

        let last = self.bands.len() - 1;
        self.bands
            .iter()
            .enumerate()
            .find(|(i, band)| score >= band.min && (score < band.max || *i == last))
            .map_or(&self.bands[last], |(_, band)| band)
    }

    /// Label of the band containing `score`
    #[must_use]
    pub fn categorize(&self, score: f64) -> &str {
        &self.band_for(score).label
    }
}

fn validate_bands(bands: &[ScoreBand]) -> Result<(), ConfigError> {
    let (Some(first), Some(last)) = (bands.first(), bands.last()) else {
        return Err(ConfigError::InvalidBands("band table is empty".into()));
    };

    for band in bands {
        if !band.min.is_finite() || !band.max.is_finite() {
            return Err(ConfigError::InvalidBands(format!(
                "band '{}' has a non-finite bound",
                band.label
            )));
        }
        if band.min >= band.max {
            return Err(ConfigError::InvalidBands(format!(
                "band '{}' is empty: [{}, {}]",
                band.label, band.min, band.max
            )));
        }
        if band.label.trim().is_empty() {
            return Err(ConfigError::InvalidBands("band label is blank".into()));
        }
    }

    check_coverage(first, last, bands)
}

// Adjacent bounds are copied from the same table, so exact equality is the contract
#[allow(clippy::float_cmp)]
fn check_coverage(
    first: &ScoreBand,
    last: &ScoreBand,
    bands: &[ScoreBand],
) -> Result<(), ConfigError> {
    if first.min != MIN_SCORE {
        return Err(ConfigError::InvalidBands(format!(
            "first band starts at {}, expected {MIN_SCORE}",
            first.min
        )));
    }
    if last.max != MAX_SCORE {
        return Err(ConfigError::InvalidBands(format!(
            "last band ends at {}, expected {MAX_SCORE}",
            last.max
        )));
    }
    for pair in bands.windows(2) {
        if pair[0].max != pair[1].min {
            let kind = if pair[0].max < pair[1].min {
                "gap"
            } else {
                "overlap"
            };
            return Err(ConfigError::InvalidBands(format!(
                "{kind} between '{}' and '{}'",
                pair[0].label, pair[1].label
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_tiles_domain() {
        assert!(ScoreCategorizer::new(default_bands()).is_ok());
    }

    #[test]
    fn test_every_integer_score_maps_to_exactly_one_band() {
        let categorizer = ScoreCategorizer::default();
        for score in 0..=100 {
            let score = f64::from(score);
            let matching = categorizer
                .bands()
                .iter()
                .enumerate()
                .filter(|(i, band)| {
                    score >= band.min
                        && (score < band.max || *i == categorizer.bands().len() - 1)
                })
                .count();
            assert_eq!(matching, 1, "score {score}");
        }
    }

    #[test]
    fn test_boundaries_belong_to_upper_band() {
        let categorizer = ScoreCategorizer::default();
        assert_eq!(categorizer.categorize(0.0), "Critical");
        assert_eq!(categorizer.categorize(19.99), "Critical");
        assert_eq!(categorizer.categorize(20.0), "Poor");
        assert_eq!(categorizer.categorize(79.5), "Good");
        assert_eq!(categorizer.categorize(80.0), "Excellent");
        assert_eq!(categorizer.categorize(100.0), "Excellent");
    }

    #[test]
    fn test_out_of_domain_scores_are_clamped() {
        let categorizer = ScoreCategorizer::default();
        assert_eq!(categorizer.categorize(-5.0), "Critical");
        assert_eq!(categorizer.categorize(140.0), "Excellent");
    }

    #[test]
    fn test_gap_and_overlap_rejected() {
        let gap = vec![
            ScoreBand::new(0.0, 40.0, "Low"),
            ScoreBand::new(50.0, 100.0, "High"),
        ];
        assert!(matches!(
            ScoreCategorizer::new(gap),
            Err(ConfigError::InvalidBands(msg)) if msg.contains("gap")
        ));

        let overlap = vec![
            ScoreBand::new(0.0, 60.0, "Low"),
            ScoreBand::new(50.0, 100.0, "High"),
        ];
        assert!(matches!(
            ScoreCategorizer::new(overlap),
            Err(ConfigError::InvalidBands(msg)) if msg.contains("overlap")
        ));
    }

    #[test]
    fn test_partial_coverage_rejected() {
        assert!(ScoreCategorizer::new(vec![ScoreBand::new(0.0, 90.0, "Most")]).is_err());
        assert!(ScoreCategorizer::new(vec![ScoreBand::new(10.0, 100.0, "Most")]).is_err());
        assert!(ScoreCategorizer::new(Vec::new()).is_err());
    }
}
