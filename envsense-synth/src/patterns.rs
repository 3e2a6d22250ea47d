// Envsense Synth - Signal components
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Signal components composed into a baseline series.
//!
//! Seasonal terms are pure functions of the calendar timestamp. Drift is the
//! only sequential component and lives in an explicit [`DriftState`] owned by
//! one generator.

use chrono::{DateTime, Datelike, Timelike, Utc};
use envsense::ParameterProfile;
use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Fractional hour of day in [0, 24).
pub fn hour_of_day(timestamp: &DateTime<Utc>) -> f64 {
    timestamp.hour() as f64
        + timestamp.minute() as f64 / 60.0
        + timestamp.second() as f64 / 3600.0
        + timestamp.nanosecond() as f64 / 3.6e12
}

/// Fractional days since Monday 00:00 UTC, in [0, 7).
pub fn day_of_week(timestamp: &DateTime<Utc>) -> f64 {
    timestamp.weekday().num_days_from_monday() as f64 + hour_of_day(timestamp) / 24.0
}

/// 24-hour component: `amplitude * sin(2*PI*hour/24)`.
pub fn diurnal(amplitude: f64, timestamp: &DateTime<Utc>) -> f64 {
    amplitude * (2.0 * PI * hour_of_day(timestamp) / 24.0).sin()
}

/// 7-day component: `amplitude * sin(2*PI*day/7)`.
pub fn weekly(amplitude: f64, timestamp: &DateTime<Utc>) -> f64 {
    amplitude * (2.0 * PI * day_of_week(timestamp) / 7.0).sin()
}

/// Deterministic part of a sample: baseline plus both seasonal terms.
pub fn seasonal_value(profile: &ParameterProfile, timestamp: &DateTime<Utc>) -> f64 {
    profile.baseline
        + diurnal(profile.diurnal_amplitude, timestamp)
        + weekly(profile.weekly_amplitude, timestamp)
}

/// Draw from `Normal(0, sigma)`; zero sigma yields exactly 0.
pub fn gaussian(sigma: f64, rng: &mut (impl Rng + ?Sized)) -> f64 {
    if sigma <= 0.0 {
        return 0.0;
    }
    match Normal::new(0.0, sigma) {
        Ok(dist) => dist.sample(rng),
        Err(_) => 0.0,
    }
}

/// Carried drift state for one series.
///
/// `walk` is the bounded random walk; `shift` accumulates persistent offsets
/// applied by drift-shift anomalies and is left unbounded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriftState {
    /// Random walk component.
    pub walk: f64,
    /// Accumulated drift-shift offset.
    pub shift: f64,
    /// Lower bound of the walk.
    walk_min: f64,
    /// Upper bound of the walk.
    walk_max: f64,
}

impl DriftState {
    /// Create state bounded so `baseline + walk` stays inside the profile range.
    pub fn for_profile(profile: &ParameterProfile) -> Self {
        Self {
            walk: 0.0,
            shift: 0.0,
            walk_min: profile.min() - profile.baseline,
            walk_max: profile.max() - profile.baseline,
        }
    }

    /// Advance the walk by one `Normal(0, step_sigma)` increment.
    ///
    /// Returns the drift term for the current sample.
    pub fn step(&mut self, step_sigma: f64, rng: &mut (impl Rng + ?Sized)) -> f64 {
        self.walk = (self.walk + gaussian(step_sigma, rng)).clamp(self.walk_min, self.walk_max);
        self.current()
    }

    /// Add a persistent offset to this and every later drift term.
    pub fn apply_shift(&mut self, offset: f64) {
        self.shift += offset;
    }

    /// Current drift term.
    pub fn current(&self) -> f64 {
        self.walk + self.shift
    }
}
