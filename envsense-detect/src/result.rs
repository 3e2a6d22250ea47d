// Envsense Detect - Detection results
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Per-point, per-method detection output.

use crate::method::{DetectionMethod, Evaluation};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of one method on one point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    /// Position of the point in the evaluated series.
    pub index: usize,
    /// Point timestamp; absent when raw values were evaluated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    /// Method that produced this result.
    pub method: DetectionMethod,
    /// Signed method statistic.
    pub score: f64,
    /// Whether the method flagged the point.
    pub is_flagged: bool,
    /// Threshold the score was compared against.
    pub threshold_used: f64,
}

impl DetectionResult {
    pub fn from_evaluation(
        index: usize,
        timestamp: Option<DateTime<Utc>>,
        method: DetectionMethod,
        evaluation: Evaluation,
    ) -> Self {
        Self {
            index,
            timestamp,
            method,
            score: evaluation.score,
            is_flagged: evaluation.is_flagged,
            threshold_used: evaluation.threshold,
        }
    }
}
