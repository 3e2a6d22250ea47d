// Envsense Detect - Rolling z-score
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Z-score against a trailing window of preceding samples.
//!
//! Point `i` is scored against `[i - W, i)`; the point itself never enters its
//! own baseline. The first `W` points have no verdict.

use super::Evaluation;
use crate::stats::SampleStats;
use std::collections::VecDeque;

/// Incremental rolling z-score over a bounded window.
#[derive(Debug, Clone)]
pub struct RollingZScoreStream {
    window: usize,
    threshold: f64,
    history: VecDeque<f64>,
}

impl RollingZScoreStream {
    pub fn new(window: usize, threshold: f64) -> Self {
        Self {
            window,
            threshold,
            history: VecDeque::with_capacity(window + 1),
        }
    }

    /// Score `value` against the current window, then admit it.
    ///
    /// Returns `None` until `window` values have been pushed. Non-finite
    /// values are neither scored nor admitted.
    pub fn push(&mut self, value: f64) -> Option<Evaluation> {
        if !value.is_finite() {
            return None;
        }

        let evaluation = if self.is_warm() {
            let stats = SampleStats::from_values(self.history.iter().copied());
            Some(match stats.z_score(value) {
                Some(z) => Evaluation {
                    score: z,
                    is_flagged: z.abs() > self.threshold,
                    threshold: self.threshold,
                },
                None => Evaluation::degenerate(self.threshold),
            })
        } else {
            None
        };

        self.history.push_back(value);
        while self.history.len() > self.window {
            self.history.pop_front();
        }

        evaluation
    }

    /// Whether the next push will be scored.
    pub fn is_warm(&self) -> bool {
        self.window > 0 && self.history.len() == self.window
    }

    /// Values currently in the window.
    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Drop all history.
    pub fn reset(&mut self) {
        self.history.clear();
    }
}

/// Batch rolling z-score, built on [`RollingZScoreStream`].
#[derive(Debug, Clone, PartialEq)]
pub struct RollingZScoreDetector {
    window: usize,
    threshold: f64,
}

impl RollingZScoreDetector {
    pub fn new(window: usize, threshold: f64) -> Self {
        Self { window, threshold }
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Fresh stream with the same settings.
    pub fn stream(&self) -> RollingZScoreStream {
        RollingZScoreStream::new(self.window, self.threshold)
    }

    pub fn evaluate(&self, values: &[f64]) -> Vec<Option<Evaluation>> {
        let mut stream = self.stream();
        values.iter().map(|&v| stream.push(v)).collect()
    }
}
