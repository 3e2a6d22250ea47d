// Envsense Detect - Whole-series z-score
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Z-score against the mean and deviation of the entire series.

use super::Evaluation;
use crate::stats::SampleStats;

/// Whole-series z-score detector.
#[derive(Debug, Clone, PartialEq)]
pub struct ZScoreDetector {
    threshold: f64,
}

impl ZScoreDetector {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Score every value; a constant or single-value series flags nothing.
    pub fn evaluate(&self, values: &[f64]) -> Vec<Evaluation> {
        let stats = SampleStats::from_slice(values);

        values
            .iter()
            .map(|&value| match stats.z_score(value) {
                Some(z) => Evaluation {
                    score: z,
                    is_flagged: z.abs() > self.threshold,
                    threshold: self.threshold,
                },
                None => Evaluation::degenerate(self.threshold),
            })
            .collect()
    }
}
