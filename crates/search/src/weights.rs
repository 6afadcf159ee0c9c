//! Boost-to-weight calibration
//!
//! Applications declare arbitrary numeric boosts on search fields; ranking
//! only knows four weight letters. `BoostWeights` is computed once from
//! every distinct boost in the schema and maps any boost onto a letter.
//!
//! - At most four distinct boosts: each gets its own letter, highest
//!   boost on `A`.
//! - More: the `[min, max]` range is cut into four equal-width bins and
//!   each bin's lower bound becomes the threshold of one letter.
//!
//! The derived `WeightValues` give each letter `threshold / max_threshold`.

use ftindex_core::{Error, Result, Schema};
use ftindex_engine::{Weight, WeightValues, BUCKET_COUNT};
use tracing::info;

/// Calibrated mapping from boosts to weight letters
#[derive(Debug, Clone, PartialEq)]
pub struct BoostWeights {
    /// `(threshold, letter)`, thresholds descending
    thresholds: Vec<(f64, Weight)>,
    values: WeightValues,
}

impl BoostWeights {
    /// Calibrate from a set of boosts
    ///
    /// Duplicates are ignored.
    ///
    /// # Errors
    ///
    /// Configuration error if `boosts` is empty or holds a non-finite value.
    pub fn calibrate(boosts: &[f64]) -> Result<Self> {
        if let Some(bad) = boosts.iter().find(|b| !b.is_finite()) {
            return Err(Error::configuration(format!(
                "cannot calibrate weights with boost {}",
                bad
            )));
        }
        let mut distinct = boosts.to_vec();
        distinct.sort_by(|a, b| b.total_cmp(a));
        distinct.dedup_by(|a, b| a == b);

        let (max, min) = match (distinct.first(), distinct.last()) {
            (Some(&max), Some(&min)) => (max, min),
            _ => {
                return Err(Error::configuration(
                    "cannot calibrate weights without any search field boost",
                ))
            }
        };

        let thresholds: Vec<(f64, Weight)> = if distinct.len() <= BUCKET_COUNT {
            distinct.into_iter().zip(Weight::DESCENDING).collect()
        } else {
            let step = (max - min) / BUCKET_COUNT as f64;
            // ascending bins D, C, B, A, stored highest first
            (0..BUCKET_COUNT)
                .rev()
                .map(|i| (min + i as f64 * step, Weight::DESCENDING[BUCKET_COUNT - 1 - i]))
                .collect()
        };

        let values = weight_values(&thresholds);
        Ok(BoostWeights { thresholds, values })
    }

    /// Calibrate from every search-field boost declared in `schema`
    pub fn from_schema(schema: &Schema) -> Result<Self> {
        let weights = Self::calibrate(&schema.all_boosts())?;
        info!(
            target: "ftindex::index",
            buckets = weights.thresholds.len(),
            values = ?weights.values.as_array(),
            "Calibrated boost weights"
        );
        Ok(weights)
    }

    /// Letter for a field boost; an undeclared boost counts as 0
    ///
    /// Boosts below every threshold fall into the lowest used letter.
    pub fn weight_for_boost(&self, boost: Option<f64>) -> Weight {
        let boost = boost.unwrap_or(0.0);
        self.thresholds
            .iter()
            .find(|(threshold, _)| *threshold <= boost)
            .or_else(|| self.thresholds.last())
            .map(|(_, weight)| *weight)
            .unwrap_or(Weight::D)
    }

    /// `(threshold, letter)` pairs, thresholds descending
    pub fn thresholds(&self) -> &[(f64, Weight)] {
        &self.thresholds
    }

    /// Ranking multipliers, ordered `D, C, B, A`
    pub fn values(&self) -> WeightValues {
        self.values
    }
}

fn weight_values(thresholds: &[(f64, Weight)]) -> WeightValues {
    let max = thresholds.first().map(|(t, _)| *t).unwrap_or(0.0);
    let mut values = [None; BUCKET_COUNT];
    for (threshold, weight) in thresholds {
        let value = if max > 0.0 {
            (threshold / max).clamp(0.0, 1.0) as f32
        } else {
            1.0
        };
        values[weight.index()] = Some(value);
    }
    // letters no boost maps to take the lowest used value
    let lowest = thresholds
        .last()
        .and_then(|(_, w)| values[w.index()])
        .unwrap_or(1.0);
    WeightValues::new(values.map(|v| v.unwrap_or(lowest)))
}
