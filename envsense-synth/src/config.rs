// Envsense Synth - Generation configuration
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Generation configuration.

use crate::anomalies::AnomalyKind;
use chrono::{DateTime, Duration, TimeZone, Utc};
use envsense::ConfigError;
use serde::{Deserialize, Serialize};

/// Series generation and anomaly injection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Timestamp of the first sample.
    pub start_time: DateTime<Utc>,
    /// Interval between samples in milliseconds.
    pub sample_interval_ms: i64,
    /// Number of samples to generate.
    pub sample_count: usize,
    /// Per-point probability of injecting an anomaly.
    ///
    /// Anomalies are meant to stay a minority class (<= 0.05) for the
    /// detectors' statistics to hold. Not enforced.
    pub anomaly_probability: f64,
    /// (min, max) multiplier of the profile's noise sigma.
    pub anomaly_magnitude_range: (f64, f64),
    /// Kinds to choose from when a point is selected for injection.
    pub anomaly_kinds: Vec<AnomalyKind>,
    /// Random seed for reproducibility.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            start_time: Utc
                .timestamp_millis_opt(1_706_745_600_000) // 2024-02-01 00:00:00 UTC
                .single()
                .unwrap_or_default(),
            sample_interval_ms: 15 * 60_000, // 15 minutes
            sample_count: 96,                // 1 day
            anomaly_probability: 0.0,
            anomaly_magnitude_range: (8.0, 12.0),
            anomaly_kinds: AnomalyKind::ALL.to_vec(),
            seed: None,
        }
    }
}

impl GenerationConfig {
    /// Create a new generation config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set start timestamp.
    pub fn with_start_time(mut self, start: DateTime<Utc>) -> Self {
        self.start_time = start;
        self
    }

    /// Set sample interval.
    pub fn with_sample_interval_ms(mut self, interval_ms: i64) -> Self {
        self.sample_interval_ms = interval_ms;
        self
    }

    /// Set sample interval in seconds.
    ///
    /// Saturates on overflow; `validate()` then rejects the interval.
    pub fn with_sample_interval_secs(mut self, secs: i64) -> Self {
        self.sample_interval_ms = secs.saturating_mul(1000);
        self
    }

    /// Set number of samples.
    pub fn with_sample_count(mut self, n: usize) -> Self {
        self.sample_count = n;
        self
    }

    /// Set duration in days (calculates sample_count from interval).
    pub fn with_duration_days(mut self, days: f64) -> Self {
        if self.sample_interval_ms > 0 {
            let total_ms = days * 86_400_000.0;
            self.sample_count = (total_ms / self.sample_interval_ms as f64).ceil() as usize;
        }
        self
    }

    /// Set injection probability.
    pub fn with_anomaly_probability(mut self, probability: f64) -> Self {
        self.anomaly_probability = probability;
        self
    }

    /// Set injection magnitude range (multiples of noise sigma).
    pub fn with_magnitude_range(mut self, min: f64, max: f64) -> Self {
        self.anomaly_magnitude_range = (min, max);
        self
    }

    /// Set the anomaly kinds to draw from.
    pub fn with_anomaly_kinds(mut self, kinds: impl IntoIterator<Item = AnomalyKind>) -> Self {
        self.anomaly_kinds = kinds.into_iter().collect();
        self
    }

    /// Set random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Whether any point can be injected.
    pub fn injection_enabled(&self) -> bool {
        self.anomaly_probability > 0.0
    }

    /// Timestamp of sample `k`.
    ///
    /// Only defined for `k < sample_count` of a validated config.
    pub fn timestamp_at(&self, k: usize) -> DateTime<Utc> {
        self.start_time + Duration::milliseconds(self.sample_interval_ms * k as i64)
    }

    /// Timestamp of the final sample, `None` if it cannot be represented.
    fn last_timestamp(&self) -> Option<DateTime<Utc>> {
        let last = i64::try_from(self.sample_count.saturating_sub(1)).ok()?;
        let offset = Duration::try_milliseconds(self.sample_interval_ms.checked_mul(last)?)?;
        self.start_time.checked_add_signed(offset)
    }

    /// Check the configuration before any sample is produced.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_interval_ms <= 0 {
            return Err(ConfigError::NonPositiveInterval {
                interval_ms: self.sample_interval_ms,
            });
        }

        if self.last_timestamp().is_none() {
            return Err(ConfigError::TimestampOverflow {
                sample_count: self.sample_count,
                interval_ms: self.sample_interval_ms,
            });
        }

        if !(0.0..=1.0).contains(&self.anomaly_probability) {
            return Err(ConfigError::ProbabilityOutOfRange(self.anomaly_probability));
        }

        let (min, max) = self.anomaly_magnitude_range;
        if !(min.is_finite() && max.is_finite()) || min < 0.0 || min > max {
            return Err(ConfigError::InvalidMagnitudeRange { min, max });
        }

        if self.injection_enabled() && self.anomaly_kinds.is_empty() {
            return Err(ConfigError::EmptyAnomalyKinds);
        }

        Ok(())
    }
}
