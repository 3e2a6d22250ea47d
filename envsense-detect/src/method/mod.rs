// Envsense Detect - Detection methods
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! The closed set of statistical detection methods.
//!
//! Every method maps a value slice to one optional [`Evaluation`] per index.
//! `None` means the method has no verdict for that point (rolling cold start).

pub mod iqr;
pub mod rolling;
pub mod zscore;

pub use iqr::IqrDetector;
pub use rolling::{RollingZScoreDetector, RollingZScoreStream};
pub use zscore::ZScoreDetector;

use crate::config::DetectionConfig;
use envsense::{EnvsenseError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Detection method identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DetectionMethod {
    /// Whole-series z-score.
    #[serde(rename = "zscore")]
    ZScore,
    /// Interquartile range fences.
    #[serde(rename = "iqr")]
    Iqr,
    /// Z-score against a trailing window.
    #[serde(rename = "rolling_zscore")]
    RollingZScore,
}

impl DetectionMethod {
    /// Every method, in default reporting order.
    pub const ALL: [DetectionMethod; 3] = [
        DetectionMethod::ZScore,
        DetectionMethod::Iqr,
        DetectionMethod::RollingZScore,
    ];

    /// Wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            DetectionMethod::ZScore => "zscore",
            DetectionMethod::Iqr => "iqr",
            DetectionMethod::RollingZScore => "rolling_zscore",
        }
    }
}

impl fmt::Display for DetectionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DetectionMethod {
    type Err = EnvsenseError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "zscore" | "z_score" => Ok(DetectionMethod::ZScore),
            "iqr" => Ok(DetectionMethod::Iqr),
            "rolling_zscore" | "rolling_z_score" | "rolling" => Ok(DetectionMethod::RollingZScore),
            _ => Err(EnvsenseError::UnknownMethod(s.to_string())),
        }
    }
}

/// One method's verdict on one point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Method-specific signed statistic.
    pub score: f64,
    /// Whether the statistic crossed the threshold.
    pub is_flagged: bool,
    /// Threshold the score was compared against.
    pub threshold: f64,
}

impl Evaluation {
    /// Unflagged zero-score verdict for degenerate statistics.
    pub fn degenerate(threshold: f64) -> Self {
        Self {
            score: 0.0,
            is_flagged: false,
            threshold,
        }
    }
}

/// A configured detection method.
#[derive(Debug, Clone, PartialEq)]
pub enum MethodDetector {
    ZScore(ZScoreDetector),
    Iqr(IqrDetector),
    RollingZScore(RollingZScoreDetector),
}

impl MethodDetector {
    /// Build the detector for `method` from its section of `config`.
    pub fn from_config(method: DetectionMethod, config: &DetectionConfig) -> Self {
        match method {
            DetectionMethod::ZScore => {
                MethodDetector::ZScore(ZScoreDetector::new(config.zscore.threshold))
            }
            DetectionMethod::Iqr => MethodDetector::Iqr(IqrDetector::new(config.iqr.multiplier)),
            DetectionMethod::RollingZScore => MethodDetector::RollingZScore(
                RollingZScoreDetector::new(config.rolling.window, config.rolling.threshold),
            ),
        }
    }

    /// Method identifier.
    pub fn method(&self) -> DetectionMethod {
        match self {
            MethodDetector::ZScore(_) => DetectionMethod::ZScore,
            MethodDetector::Iqr(_) => DetectionMethod::Iqr,
            MethodDetector::RollingZScore(_) => DetectionMethod::RollingZScore,
        }
    }

    /// Evaluate every point of `values`.
    ///
    /// Non-finite values are left out of the statistics and get no result.
    pub fn evaluate(&self, values: &[f64]) -> Vec<Option<Evaluation>> {
        match self {
            MethodDetector::ZScore(d) => over_finite(values, |v| d.evaluate(v)),
            MethodDetector::Iqr(d) => over_finite(values, |v| d.evaluate(v)),
            MethodDetector::RollingZScore(d) => d.evaluate(values),
        }
    }
}

fn over_finite(
    values: &[f64],
    score: impl FnOnce(&[f64]) -> Vec<Evaluation>,
) -> Vec<Option<Evaluation>> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    let mut scored = score(&finite).into_iter();
    values
        .iter()
        .map(|v| if v.is_finite() { scored.next() } else { None })
        .collect()
}
