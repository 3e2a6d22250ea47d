// Envsense Detect - Statistical anomaly detection
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! # Envsense Detect
//!
//! Classical statistical anomaly detection for sensor time series:
//!
//! - **zscore**: deviation from the whole-series mean in sample standard deviations
//! - **iqr**: Tukey fences around the interquartile range
//! - **rolling_zscore**: deviation from a trailing window that excludes the
//!   current point
//!
//! Each method yields one [`DetectionResult`] per point it can judge. The
//! [`ResultAggregator`] folds them into one [`ConsolidatedVerdict`] per point
//! using a quorum, keeping the per-method breakdown.
//!
//! ## Usage
//!
//! ```rust
//! use envsense_detect::{AnomalyDetector, DetectionConfig, DetectionMethod, ResultAggregator};
//!
//! let mut values = vec![7.0; 99];
//! for (i, v) in values.iter_mut().enumerate() {
//!     *v += if i % 2 == 0 { 0.01 } else { -0.01 };
//! }
//! values.push(50.0);
//!
//! let config = DetectionConfig::new().with_methods([DetectionMethod::ZScore]);
//! let detector = AnomalyDetector::new(config).unwrap();
//! let results = detector.detect_values(&values);
//!
//! let verdicts = ResultAggregator::new(1).unwrap().aggregate(&results);
//! let flagged: Vec<usize> = verdicts.iter().filter(|v| v.is_flagged).map(|v| v.index).collect();
//! assert_eq!(flagged, vec![99]);
//! ```
//!
//! ## Streaming
//!
//! Only the rolling method can run without materialising the series; use
//! [`RollingZScoreStream`] to score points as they arrive.

pub mod aggregate;
pub mod config;
pub mod detector;
pub mod method;
pub mod result;
pub mod scorecard;
pub mod stats;

// Re-exports for convenience
pub use aggregate::{ConsolidatedVerdict, MethodFinding, ResultAggregator};
pub use config::{AggregationConfig, DetectionConfig, IqrConfig, RollingConfig, ZScoreConfig};
pub use detector::AnomalyDetector;
pub use method::{
    DetectionMethod, Evaluation, IqrDetector, MethodDetector, RollingZScoreDetector,
    RollingZScoreStream, ZScoreDetector,
};
pub use result::DetectionResult;
pub use scorecard::Scorecard;
