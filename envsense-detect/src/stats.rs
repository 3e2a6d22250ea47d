// Envsense Detect - Descriptive statistics
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Descriptive statistics shared by the detection methods.

use serde::{Deserialize, Serialize};

/// Mean and sample standard deviation of a set of values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SampleStats {
    pub mean: f64,
    pub std: f64,
    pub count: usize,
}

impl SampleStats {
    /// Two-pass mean and (n - 1) standard deviation.
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = f64>,
        I::IntoIter: Clone,
    {
        let iter = values.into_iter();
        let (count, sum) = iter.clone().fold((0usize, 0.0), |(n, s), v| (n + 1, s + v));
        if count == 0 {
            return Self::default();
        }

        let mean = sum / count as f64;
        let std = if count > 1 {
            let ss: f64 = iter.map(|v| (v - mean).powi(2)).sum();
            (ss / (count - 1) as f64).sqrt()
        } else {
            0.0
        };

        Self { mean, std, count }
    }

    /// Compute over a slice.
    pub fn from_slice(values: &[f64]) -> Self {
        Self::from_values(values.iter().copied())
    }

    /// At least two samples and a positive, finite deviation.
    pub fn is_valid(&self) -> bool {
        self.count >= 2 && self.std > 0.0 && self.std.is_finite()
    }

    /// Signed z-score of `value`; `None` when the statistics are degenerate.
    pub fn z_score(&self, value: f64) -> Option<f64> {
        if self.is_valid() {
            Some((value - self.mean) / self.std)
        } else {
            None
        }
    }
}

/// Linear-interpolated quantile of already sorted values.
///
/// Position is `p * (n - 1)`; `p` is clamped to [0, 1].
pub fn quantile_sorted(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }

    let pos = p.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// First and third quartiles.
pub fn quartiles(values: &[f64]) -> Option<(f64, f64)> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    Some((quantile_sorted(&sorted, 0.25)?, quantile_sorted(&sorted, 0.75)?))
}
