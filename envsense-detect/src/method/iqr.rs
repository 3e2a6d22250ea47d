// Envsense Detect - Interquartile range fences
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Tukey fences: flag values outside `[Q1 - k*IQR, Q3 + k*IQR]`.
//!
//! The score is the signed distance beyond the violated fence in units of
//! IQR: negative below the lower fence, positive above the upper one, zero
//! inside.

use super::Evaluation;
use crate::stats::quartiles;

/// IQR fence detector.
#[derive(Debug, Clone, PartialEq)]
pub struct IqrDetector {
    multiplier: f64,
}

/// Quartiles and fences of one series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fences {
    pub q1: f64,
    pub q3: f64,
    pub lower: f64,
    pub upper: f64,
}

impl Fences {
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }
}

impl IqrDetector {
    pub fn new(multiplier: f64) -> Self {
        Self { multiplier }
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    /// Compute fences; `None` for an empty series.
    pub fn fences(&self, values: &[f64]) -> Option<Fences> {
        let (q1, q3) = quartiles(values)?;
        let iqr = q3 - q1;
        Some(Fences {
            q1,
            q3,
            lower: q1 - self.multiplier * iqr,
            upper: q3 + self.multiplier * iqr,
        })
    }

    /// Score every value; zero IQR flags nothing.
    pub fn evaluate(&self, values: &[f64]) -> Vec<Evaluation> {
        let fences = match self.fences(values) {
            Some(f) if f.iqr() > 0.0 => f,
            _ => return vec![Evaluation::degenerate(self.multiplier); values.len()],
        };
        let iqr = fences.iqr();

        values
            .iter()
            .map(|&value| {
                let score = if value < fences.lower {
                    (value - fences.lower) / iqr
                } else if value > fences.upper {
                    (value - fences.upper) / iqr
                } else {
                    0.0
                };
                Evaluation {
                    score,
                    is_flagged: value < fences.lower || value > fences.upper,
                    threshold: self.multiplier,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_fences() {
        let fences = IqrDetector::new(1.5).fences(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert_eq!(fences.q1, 2.0);
        assert_eq!(fences.q3, 4.0);
        assert_eq!(fences.lower, -1.0);
        assert_eq!(fences.upper, 7.0);
    }

    #[test]
    fn test_constant_series_flags_nothing() {
        let out = IqrDetector::new(1.5).evaluate(&[7.0; 40]);
        assert_eq!(out.len(), 40);
        assert!(out.iter().all(|e| !e.is_flagged));
    }

    #[test]
    fn test_mostly_constant_series_is_degenerate() {
        // Quartiles coincide, so even the odd value is left alone
        let mut values = vec![7.0; 40];
        values[3] = 100.0;
        let out = IqrDetector::new(1.5).evaluate(&values);
        assert!(out.iter().all(|e| !e.is_flagged));
    }

    #[test]
    fn test_scores_beyond_fences() {
        // q1 = 2, q3 = 4, iqr = 2, fences [-1, 7]
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 2.0, 3.0, 4.0, 3.0];
        let fences = IqrDetector::new(1.5).fences(&values).unwrap();
        assert_relative_eq!(fences.iqr(), 2.0);

        let mut with_outliers = values.to_vec();
        with_outliers.push(11.0);
        with_outliers.push(-5.0);
        let detector = IqrDetector::new(1.5);
        let f = detector.fences(&with_outliers).unwrap();
        let out = detector.evaluate(&with_outliers);

        let high = &out[9];
        assert!(high.is_flagged);
        assert_relative_eq!(high.score, (11.0 - f.upper) / f.iqr());
        let low = &out[10];
        assert!(low.is_flagged);
        assert!(low.score < 0.0);
        assert!(out[..9].iter().all(|e| !e.is_flagged && e.score == 0.0));
    }

    #[test]
    fn test_value_on_fence_not_flagged() {
        let detector = IqrDetector::new(1.5);
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 7.0];
        let f = detector.fences(&values).unwrap();
        let out = detector.evaluate(&values);
        for (v, e) in values.iter().zip(&out) {
            assert_eq!(e.is_flagged, *v < f.lower || *v > f.upper);
        }
    }
}
