// Envsense Synth - Synthetic sensor series
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! # Envsense Synth
//!
//! Seeded synthetic time series for environmental sensors, with
//! ground-truth anomaly injection.
//!
//! - **Baseline composition**: baseline level, diurnal and weekly sines,
//!   bounded random-walk drift, gaussian noise
//! - **Anomaly injection**: spike, drop, stuck value, drift shift
//! - **Deployment presets**: water treatment and soil field profiles
//!
//! ## Quick Start
//!
//! ```rust
//! use envsense::{Parameter, ParameterProfile};
//! use envsense_synth::{generate_series, AnomalyKind, GenerationConfig};
//!
//! let profile = ParameterProfile::new(Parameter::Temperature, -10.0, 50.0, 22.0)
//!     .with_diurnal(3.0)
//!     .with_noise(0.2);
//!
//! let config = GenerationConfig::new()
//!     .with_sample_interval_secs(60)
//!     .with_sample_count(1000)
//!     .with_anomaly_probability(0.02)
//!     .with_anomaly_kinds([AnomalyKind::Spike])
//!     .with_seed(42);
//!
//! let (points, injections) = generate_series("greenhouse-1", profile, config).unwrap();
//! assert_eq!(points.len(), 1000);
//! assert_eq!(
//!     points.iter().filter(|p| p.is_known_anomaly()).count(),
//!     injections.len()
//! );
//! ```
//!
//! ## Streaming
//!
//! [`SeriesGenerator`] and [`AnomalyInjector`] are lazy iterators; nothing is
//! buffered beyond the previous emitted value. Rebuild the generator with the
//! same seed to replay a series.

pub mod anomalies;
pub mod config;
pub mod dataset;
pub mod deployments;
pub mod generator;
pub mod patterns;

// Re-exports for convenience
pub use anomalies::{AnomalyInjector, AnomalyKind, InjectionRecord};
pub use config::GenerationConfig;
pub use dataset::{daily_summary, DailySummary, Dataset, DatasetBuilder, SensorSeries, SeriesStats};
pub use deployments::{create_profiles, profile_for, Deployment};
pub use generator::{generate_series, synthesize, BaselineSample, BaselineSource, SeriesGenerator};
pub use patterns::DriftState;
