// Envsense Detect - Detection configuration
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Detection configuration.

use crate::method::DetectionMethod;
use envsense::ConfigError;
use serde::{Deserialize, Serialize};

/// Master configuration for anomaly detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Methods to run, in reporting order.
    pub methods: Vec<DetectionMethod>,

    /// Whole-series z-score settings.
    pub zscore: ZScoreConfig,

    /// Interquartile range settings.
    pub iqr: IqrConfig,

    /// Trailing-window z-score settings.
    pub rolling: RollingConfig,

    /// Consolidation settings.
    pub aggregation: AggregationConfig,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            methods: DetectionMethod::ALL.to_vec(),
            zscore: ZScoreConfig::default(),
            iqr: IqrConfig::default(),
            rolling: RollingConfig::default(),
            aggregation: AggregationConfig::default(),
        }
    }
}

impl DetectionConfig {
    /// Create a new detection config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the methods to run.
    pub fn with_methods(mut self, methods: impl IntoIterator<Item = DetectionMethod>) -> Self {
        self.methods = methods.into_iter().collect();
        self
    }

    /// Set whole-series z-score threshold.
    pub fn with_zscore_threshold(mut self, threshold: f64) -> Self {
        self.zscore.threshold = threshold;
        self
    }

    /// Set IQR fence multiplier.
    pub fn with_iqr_multiplier(mut self, multiplier: f64) -> Self {
        self.iqr.multiplier = multiplier;
        self
    }

    /// Set rolling window size and threshold.
    pub fn with_rolling(mut self, window: usize, threshold: f64) -> Self {
        self.rolling = RollingConfig { window, threshold };
        self
    }

    /// Set consolidation quorum.
    pub fn with_quorum(mut self, quorum: usize) -> Self {
        self.aggregation.quorum = quorum;
        self
    }

    /// Selected methods with duplicates removed, first occurrence kept.
    pub fn distinct_methods(&self) -> Vec<DetectionMethod> {
        let mut distinct = Vec::with_capacity(self.methods.len());
        for method in &self.methods {
            if !distinct.contains(method) {
                distinct.push(*method);
            }
        }
        distinct
    }

    /// Check the configuration before any result is produced.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let methods = self.distinct_methods();
        if methods.is_empty() {
            return Err(ConfigError::NoMethods);
        }

        for method in &methods {
            match method {
                DetectionMethod::ZScore => positive("zscore.threshold", self.zscore.threshold)?,
                DetectionMethod::Iqr => positive("iqr.multiplier", self.iqr.multiplier)?,
                DetectionMethod::RollingZScore => {
                    positive("rolling.threshold", self.rolling.threshold)?;
                    if self.rolling.window < 2 {
                        return Err(ConfigError::InvalidWindow(self.rolling.window));
                    }
                }
            }
        }

        self.aggregation.validate_for(methods.len())
    }
}

fn positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidThreshold { name, value })
    }
}

/// Whole-series z-score configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZScoreConfig {
    /// Flag when |z| exceeds this value.
    pub threshold: f64,
}

impl Default for ZScoreConfig {
    fn default() -> Self {
        Self { threshold: 3.0 }
    }
}

/// IQR fence configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IqrConfig {
    /// Fence distance `k` in units of IQR.
    pub multiplier: f64,
}

impl Default for IqrConfig {
    fn default() -> Self {
        Self { multiplier: 1.5 }
    }
}

/// Trailing-window z-score configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollingConfig {
    /// Number of preceding samples forming the baseline.
    pub window: usize,
    /// Flag when |z| against the window exceeds this value.
    pub threshold: f64,
}

impl Default for RollingConfig {
    fn default() -> Self {
        Self {
            window: 20,
            threshold: 3.0,
        }
    }
}

/// Consolidation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregationConfig {
    /// Methods that must flag a point for the consolidated verdict.
    pub quorum: usize,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self { quorum: 1 }
    }
}

impl AggregationConfig {
    /// Quorum must be reachable with `methods` methods.
    pub fn validate_for(&self, methods: usize) -> Result<(), ConfigError> {
        if self.quorum == 0 || self.quorum > methods {
            return Err(ConfigError::InvalidQuorum {
                quorum: self.quorum,
                methods,
            });
        }
        Ok(())
    }
}
