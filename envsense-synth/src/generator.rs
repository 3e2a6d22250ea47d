// Envsense Synth - Series generator
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Lazy, seeded baseline series generation.
//!
//! A [`SeriesGenerator`] yields one [`BaselineSample`] per call to `next()`:
//!
//! ```text
//! value(k) = baseline
//!          + diurnal_amplitude * sin(2*PI * hour_of_day(k) / 24)
//!          + weekly_amplitude  * sin(2*PI * day_of_week(k) / 7)
//!          + drift(k)
//!          + noise(k)
//! ```
//!
//! Baseline samples are unclamped; clamping to the valid range is decided by
//! whoever emits the final point, since injected anomalies may leave the range.

use crate::anomalies::{AnomalyInjector, InjectionRecord};
use crate::config::GenerationConfig;
use crate::patterns::{gaussian, seasonal_value, DriftState};
use chrono::{DateTime, Utc};
use envsense::{ParameterProfile, Result, TimeSeriesPoint};
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::iter::FusedIterator;

/// One composed, unclamped sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaselineSample {
    /// Position in the series.
    pub index: usize,
    /// Sample timestamp.
    pub timestamp: DateTime<Utc>,
    /// Composed value before clamping or injection.
    pub value: f64,
}

/// A sequence of baseline samples whose drift can be shifted mid-stream.
pub trait BaselineSource: Iterator<Item = BaselineSample> {
    /// Sensor identifier attached to emitted points.
    fn sensor_id(&self) -> &str;

    /// Profile of the generated quantity.
    fn profile(&self) -> &ParameterProfile;

    /// Add a persistent offset to every subsequent drift term.
    fn apply_drift_shift(&mut self, offset: f64);
}

/// Seeded generator for a single sensor series.
///
/// The sequence is finite and not rewindable; rebuilding the generator with
/// the same seed reproduces it exactly.
#[derive(Debug, Clone)]
pub struct SeriesGenerator {
    sensor_id: String,
    profile: ParameterProfile,
    config: GenerationConfig,
    rng: StdRng,
    drift: DriftState,
    next_index: usize,
}

impl SeriesGenerator {
    /// Create a generator, validating profile and config first.
    pub fn new(
        sensor_id: impl Into<String>,
        profile: ParameterProfile,
        config: GenerationConfig,
    ) -> Result<Self> {
        profile.validate()?;
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let drift = DriftState::for_profile(&profile);
        let sensor_id = sensor_id.into();

        debug!(
            "series generator for {}/{}: {} samples every {}ms",
            sensor_id, profile.name, config.sample_count, config.sample_interval_ms
        );

        Ok(Self {
            sensor_id,
            profile,
            config,
            rng,
            drift,
            next_index: 0,
        })
    }

    /// Generation settings.
    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Current drift state.
    pub fn drift(&self) -> &DriftState {
        &self.drift
    }

    /// Samples not yet produced.
    pub fn remaining(&self) -> usize {
        self.config.sample_count.saturating_sub(self.next_index)
    }

    /// Wrap the generator with anomaly injection driven by its own config.
    ///
    /// The injector's random stream is seeded from this generator's stream,
    /// so a seeded generator stays fully reproducible.
    pub fn with_injection(mut self) -> Result<AnomalyInjector<Self>> {
        let injector_rng = StdRng::seed_from_u64(self.rng.gen());
        let config = self.config.clone();
        AnomalyInjector::new(self, &config, injector_rng)
    }

    /// Emit clamped points without injection.
    pub fn into_points(self) -> impl Iterator<Item = TimeSeriesPoint> {
        let sensor_id = self.sensor_id.clone();
        let profile = self.profile.clone();
        self.map(move |sample| {
            TimeSeriesPoint::new(
                sample.timestamp,
                sensor_id.clone(),
                profile.name,
                profile.clamp(sample.value),
            )
            .with_ground_truth(false)
        })
    }
}

impl Iterator for SeriesGenerator {
    type Item = BaselineSample;

    fn next(&mut self) -> Option<BaselineSample> {
        if self.next_index >= self.config.sample_count {
            return None;
        }

        let index = self.next_index;
        let timestamp = self.config.timestamp_at(index);
        let drift = self.drift.step(self.profile.drift_step_sigma, &mut self.rng);
        let noise = gaussian(self.profile.noise_sigma, &mut self.rng);
        let value = seasonal_value(&self.profile, &timestamp) + drift + noise;

        self.next_index += 1;
        Some(BaselineSample {
            index,
            timestamp,
            value,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for SeriesGenerator {}

impl FusedIterator for SeriesGenerator {}

impl BaselineSource for SeriesGenerator {
    fn sensor_id(&self) -> &str {
        &self.sensor_id
    }

    fn profile(&self) -> &ParameterProfile {
        &self.profile
    }

    fn apply_drift_shift(&mut self, offset: f64) {
        self.drift.apply_shift(offset);
    }
}

/// Build a generator with injection in one call.
pub fn synthesize(
    sensor_id: impl Into<String>,
    profile: ParameterProfile,
    config: GenerationConfig,
) -> Result<AnomalyInjector<SeriesGenerator>> {
    SeriesGenerator::new(sensor_id, profile, config)?.with_injection()
}

/// Generate a full series and its injection ledger.
pub fn generate_series(
    sensor_id: impl Into<String>,
    profile: ParameterProfile,
    config: GenerationConfig,
) -> Result<(Vec<TimeSeriesPoint>, Vec<InjectionRecord>)> {
    let mut injector = synthesize(sensor_id, profile, config)?;
    let points: Vec<TimeSeriesPoint> = injector.by_ref().collect();
    Ok((points, injector.into_records()))
}
