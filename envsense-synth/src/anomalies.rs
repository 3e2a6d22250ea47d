// Envsense Synth - Anomaly injection
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Ground-truth anomaly injection.
//!
//! An [`AnomalyInjector`] wraps a [`BaselineSource`] and decides, per point,
//! whether to perturb it. Every emitted point carries
//! `is_injected_anomaly = Some(true | false)`.

use crate::config::GenerationConfig;
use crate::generator::{BaselineSample, BaselineSource};
use chrono::{DateTime, Utc};
use envsense::{EnvsenseError, Result, TimeSeriesPoint};
use log::{debug, trace};
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Types of injected anomalies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnomalyKind {
    /// Value jumps up by the magnitude.
    Spike,
    /// Value falls by the magnitude.
    Drop,
    /// Value repeats the previous emitted value.
    StuckValue,
    /// Persistent offset applied from this point on.
    DriftShift,
}

impl AnomalyKind {
    /// Every kind, in declaration order.
    pub const ALL: [AnomalyKind; 4] = [
        AnomalyKind::Spike,
        AnomalyKind::Drop,
        AnomalyKind::StuckValue,
        AnomalyKind::DriftShift,
    ];

    /// Wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            AnomalyKind::Spike => "spike",
            AnomalyKind::Drop => "drop",
            AnomalyKind::StuckValue => "stuck-value",
            AnomalyKind::DriftShift => "drift-shift",
        }
    }
}

impl fmt::Display for AnomalyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnomalyKind {
    type Err = EnvsenseError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "spike" => Ok(AnomalyKind::Spike),
            "drop" => Ok(AnomalyKind::Drop),
            "stuck-value" | "stuck" => Ok(AnomalyKind::StuckValue),
            "drift-shift" | "drift" => Ok(AnomalyKind::DriftShift),
            _ => Err(EnvsenseError::UnknownAnomalyKind(s.to_string())),
        }
    }
}

/// Ledger entry for one injected point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InjectionRecord {
    /// Position in the series.
    pub index: usize,
    /// Timestamp of the injected point.
    pub timestamp: DateTime<Utc>,
    /// Kind actually applied.
    pub kind: AnomalyKind,
    /// Emitted value minus baseline value.
    pub offset: f64,
}

/// Iterator adapter applying anomaly injection to a baseline source.
#[derive(Debug)]
pub struct AnomalyInjector<S: BaselineSource> {
    source: S,
    probability: f64,
    magnitude_range: (f64, f64),
    kinds: Vec<AnomalyKind>,
    rng: StdRng,
    previous: Option<f64>,
    records: Vec<InjectionRecord>,
}

impl<S: BaselineSource> AnomalyInjector<S> {
    /// Wrap `source`, taking injection settings from `config`.
    pub fn new(source: S, config: &GenerationConfig, rng: StdRng) -> Result<Self> {
        config.validate()?;

        debug!(
            "anomaly injector for {}: p={} magnitude={:?} kinds={:?}",
            source.sensor_id(),
            config.anomaly_probability,
            config.anomaly_magnitude_range,
            config.anomaly_kinds
        );

        Ok(Self {
            source,
            probability: config.anomaly_probability,
            magnitude_range: config.anomaly_magnitude_range,
            kinds: config.anomaly_kinds.clone(),
            rng,
            previous: None,
            records: Vec::new(),
        })
    }

    /// Injections applied so far.
    pub fn records(&self) -> &[InjectionRecord] {
        &self.records
    }

    /// Consume the injector and return its ledger.
    pub fn into_records(self) -> Vec<InjectionRecord> {
        self.records
    }

    /// Underlying baseline source.
    pub fn source(&self) -> &S {
        &self.source
    }

    fn pick(&mut self) -> Option<(AnomalyKind, f64)> {
        if self.probability <= 0.0 || self.kinds.is_empty() {
            return None;
        }
        if !self.rng.gen_bool(self.probability) {
            return None;
        }

        let kind = self.kinds[self.rng.gen_range(0..self.kinds.len())];
        let (min, max) = self.magnitude_range;
        let factor = self.rng.gen_range(min..=max);
        Some((kind, self.source.profile().noise_sigma * factor))
    }

    fn inject(&mut self, sample: &BaselineSample, kind: AnomalyKind, magnitude: f64) -> (AnomalyKind, f64) {
        match kind {
            AnomalyKind::Spike => (kind, sample.value + magnitude),
            AnomalyKind::Drop => (kind, sample.value - magnitude),
            AnomalyKind::StuckValue => match self.previous {
                Some(previous) => (kind, previous),
                // Nothing to repeat at the first point
                None => (AnomalyKind::Spike, sample.value + magnitude),
            },
            AnomalyKind::DriftShift => {
                let offset = if self.rng.gen_bool(0.5) { magnitude } else { -magnitude };
                self.source.apply_drift_shift(offset);
                (kind, sample.value + offset)
            }
        }
    }
}

impl<S: BaselineSource> Iterator for AnomalyInjector<S> {
    type Item = TimeSeriesPoint;

    fn next(&mut self) -> Option<TimeSeriesPoint> {
        let sample = self.source.next()?;

        let (value, injected) = match self.pick() {
            Some((kind, magnitude)) => {
                let (applied, value) = self.inject(&sample, kind, magnitude);
                trace!(
                    "injected {} at index {} ({:.4} -> {:.4})",
                    applied,
                    sample.index,
                    sample.value,
                    value
                );
                self.records.push(InjectionRecord {
                    index: sample.index,
                    timestamp: sample.timestamp,
                    kind: applied,
                    offset: value - sample.value,
                });
                (value, true)
            }
            None => (self.source.profile().clamp(sample.value), false),
        };

        self.previous = Some(value);
        let profile = self.source.profile();
        Some(
            TimeSeriesPoint::new(
                sample.timestamp,
                self.source.sensor_id().to_string(),
                profile.name,
                value,
            )
            .with_ground_truth(injected),
        )
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.source.size_hint()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::SeriesGenerator;
    use envsense::{Parameter, ParameterProfile};

    fn profile() -> ParameterProfile {
        ParameterProfile::new(Parameter::Conductivity, 10.0, 2000.0, 500.0)
            .with_diurnal(10.0)
            .with_noise(20.0)
            .with_drift(0.5)
    }

    fn injector(config: GenerationConfig) -> AnomalyInjector<SeriesGenerator> {
        SeriesGenerator::new("cond-1", profile(), config)
            .unwrap()
            .with_injection()
            .unwrap()
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(AnomalyKind::StuckValue.to_string(), "stuck-value");
        assert_eq!("drift_shift".parse::<AnomalyKind>().unwrap(), AnomalyKind::DriftShift);
        assert_eq!("Spike".parse::<AnomalyKind>().unwrap(), AnomalyKind::Spike);
        assert!(matches!(
            "wobble".parse::<AnomalyKind>(),
            Err(EnvsenseError::UnknownAnomalyKind(_))
        ));
    }

    #[test]
    fn test_zero_probability_injects_nothing() {
        let config = GenerationConfig::new().with_sample_count(500).with_seed(1);
        let mut injector = injector(config);
        let points: Vec<_> = injector.by_ref().collect();

        assert_eq!(points.len(), 500);
        assert!(injector.records().is_empty());
        assert!(points.iter().all(|p| p.is_injected_anomaly == Some(false)));
    }

    #[test]
    fn test_certain_probability_injects_everything() {
        let config = GenerationConfig::new()
            .with_sample_count(50)
            .with_anomaly_probability(1.0)
            .with_seed(2);
        let mut injector = injector(config);
        let points: Vec<_> = injector.by_ref().collect();

        assert!(points.iter().all(|p| p.is_injected_anomaly == Some(true)));
        assert_eq!(injector.records().len(), 50);
    }

    #[test]
    fn test_injection_rate_near_probability() {
        let config = GenerationConfig::new()
            .with_sample_count(5000)
            .with_anomaly_probability(0.05)
            .with_seed(3);
        let points: Vec<_> = injector(config).collect();
        let injected = points
            .iter()
            .filter(|p| p.is_injected_anomaly == Some(true))
            .count();

        assert!((150..=350).contains(&injected), "injected {}", injected);
    }

    #[test]
    fn test_spike_and_drop_magnitudes() {
        for (kind, sign) in [(AnomalyKind::Spike, 1.0), (AnomalyKind::Drop, -1.0)] {
            let config = GenerationConfig::new()
                .with_sample_count(300)
                .with_anomaly_probability(0.05)
                .with_magnitude_range(4.0, 6.0)
                .with_anomaly_kinds([kind])
                .with_seed(4);
            let mut injector = injector(config);
            injector.by_ref().for_each(drop);

            assert!(!injector.records().is_empty());
            for record in injector.records() {
                assert_eq!(record.kind, kind);
                let scaled = sign * record.offset / 20.0;
                assert!((4.0..=6.0).contains(&scaled), "offset {}", record.offset);
            }
        }
    }

    #[test]
    fn test_stuck_value_repeats_previous() {
        let config = GenerationConfig::new()
            .with_sample_count(400)
            .with_anomaly_probability(0.05)
            .with_anomaly_kinds([AnomalyKind::StuckValue])
            .with_seed(5);
        let mut injector = injector(config);
        let points: Vec<_> = injector.by_ref().collect();

        for record in injector.records() {
            if record.index == 0 {
                assert_eq!(record.kind, AnomalyKind::Spike);
            } else {
                assert_eq!(record.kind, AnomalyKind::StuckValue);
                assert_eq!(points[record.index].value, points[record.index - 1].value);
            }
        }
    }

    #[test]
    fn test_stuck_value_at_first_point_falls_back_to_spike() {
        let config = GenerationConfig::new()
            .with_sample_count(1)
            .with_anomaly_probability(1.0)
            .with_anomaly_kinds([AnomalyKind::StuckValue])
            .with_seed(6);
        let mut injector = injector(config);
        let points: Vec<_> = injector.by_ref().collect();

        assert_eq!(points.len(), 1);
        assert_eq!(injector.records()[0].kind, AnomalyKind::Spike);
        assert!(injector.records()[0].offset > 0.0);
    }

    #[test]
    fn test_drift_shift_persists() {
        let config = GenerationConfig::new()
            .with_sample_count(200)
            .with_anomaly_probability(0.02)
            .with_anomaly_kinds([AnomalyKind::DriftShift])
            .with_seed(7);
        let mut injector = injector(config);
        injector.by_ref().for_each(drop);

        let total: f64 = injector.records().iter().map(|r| r.offset).sum();
        assert!(!injector.records().is_empty());
        assert!((injector.source().drift().shift - total).abs() < 1e-9);
    }

    #[test]
    fn test_non_injected_points_stay_in_range() {
        let config = GenerationConfig::new()
            .with_sample_count(2000)
            .with_anomaly_probability(0.05)
            .with_seed(8);
        let profile = profile();

        for point in injector(config) {
            if point.is_injected_anomaly == Some(false) {
                assert!(profile.contains(point.value));
            }
        }
    }

    #[test]
    fn test_same_seed_same_injections() {
        let config = GenerationConfig::new()
            .with_sample_count(1000)
            .with_anomaly_probability(0.03)
            .with_seed(99);

        let a: Vec<_> = injector(config.clone()).collect();
        let b: Vec<_> = injector(config).collect();
        assert_eq!(a, b);
    }
}
