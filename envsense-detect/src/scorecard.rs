// Envsense Detect - Ground-truth scorecard
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Confusion matrix of consolidated verdicts against injected ground truth.

use crate::aggregate::ConsolidatedVerdict;
use envsense::TimeSeriesPoint;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Detection quality against known ground truth.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scorecard {
    pub true_positives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
    pub true_negatives: usize,
}

impl Scorecard {
    /// Score verdicts against `points[i].is_injected_anomaly`.
    ///
    /// Points with unknown ground truth are skipped. A point with no verdict
    /// counts as not flagged.
    pub fn from_verdicts(points: &[TimeSeriesPoint], verdicts: &[ConsolidatedVerdict]) -> Self {
        let flagged: HashSet<usize> = verdicts
            .iter()
            .filter(|v| v.is_flagged)
            .map(|v| v.index)
            .collect();

        let mut card = Self::default();
        for (index, point) in points.iter().enumerate() {
            let Some(actual) = point.is_injected_anomaly else {
                continue;
            };
            match (actual, flagged.contains(&index)) {
                (true, true) => card.true_positives += 1,
                (false, true) => card.false_positives += 1,
                (true, false) => card.false_negatives += 1,
                (false, false) => card.true_negatives += 1,
            }
        }
        card
    }

    /// Points with known ground truth.
    pub fn total(&self) -> usize {
        self.true_positives + self.false_positives + self.false_negatives + self.true_negatives
    }

    /// Share of injected points that were flagged.
    pub fn recall(&self) -> Option<f64> {
        ratio(self.true_positives, self.true_positives + self.false_negatives)
    }

    /// Share of flagged points that were injected.
    pub fn precision(&self) -> Option<f64> {
        ratio(self.true_positives, self.true_positives + self.false_positives)
    }

    /// Share of clean points that were flagged.
    pub fn false_positive_rate(&self) -> Option<f64> {
        ratio(self.false_positives, self.false_positives + self.true_negatives)
    }

    /// Add another scorecard's counts.
    pub fn merge(&mut self, other: &Scorecard) {
        self.true_positives += other.true_positives;
        self.false_positives += other.false_positives;
        self.false_negatives += other.false_negatives;
        self.true_negatives += other.true_negatives;
    }
}

fn ratio(num: usize, den: usize) -> Option<f64> {
    if den == 0 {
        None
    } else {
        Some(num as f64 / den as f64)
    }
}

impl fmt::Display for Scorecard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pct = |v: Option<f64>| match v {
            Some(v) => format!("{:.1}%", v * 100.0),
            None => "n/a".to_string(),
        };
        write!(
            f,
            "tp={} fp={} fn={} tn={} recall={} precision={} fpr={}",
            self.true_positives,
            self.false_positives,
            self.false_negatives,
            self.true_negatives,
            pct(self.recall()),
            pct(self.precision()),
            pct(self.false_positive_rate())
        )
    }
}
