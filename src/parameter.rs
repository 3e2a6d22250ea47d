//! Measured quantities and their physical profiles.
//!
//! A [`ParameterProfile`] holds the static bounds and behaviour knobs used to
//! synthesise one quantity. Profiles are built once from configuration and
//! treated as immutable afterwards.

use crate::error::{ConfigError, EnvsenseError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Measured environmental quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Parameter {
    Ph,
    Temperature,
    Conductivity,
    DissolvedOxygen,
    Turbidity,
    Moisture,
}

impl Parameter {
    /// All parameters, in canonical order.
    pub const ALL: [Parameter; 6] = [
        Parameter::Ph,
        Parameter::Temperature,
        Parameter::Conductivity,
        Parameter::DissolvedOxygen,
        Parameter::Turbidity,
        Parameter::Moisture,
    ];

    /// Canonical snake_case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Parameter::Ph => "ph",
            Parameter::Temperature => "temperature",
            Parameter::Conductivity => "conductivity",
            Parameter::DissolvedOxygen => "dissolved_oxygen",
            Parameter::Turbidity => "turbidity",
            Parameter::Moisture => "moisture",
        }
    }

    /// Get display name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Parameter::Ph => "pH",
            Parameter::Temperature => "Temperature",
            Parameter::Conductivity => "Conductivity",
            Parameter::DissolvedOxygen => "Dissolved Oxygen",
            Parameter::Turbidity => "Turbidity",
            Parameter::Moisture => "Moisture",
        }
    }

    /// Unit of measurement (empty for pH).
    pub fn unit(&self) -> &'static str {
        match self {
            Parameter::Ph => "",
            Parameter::Temperature => "°C",
            Parameter::Conductivity => "μS/cm",
            Parameter::DissolvedOxygen => "mg/L",
            Parameter::Turbidity => "NTU",
            Parameter::Moisture => "%",
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Parameter {
    type Err = EnvsenseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ph" => Ok(Parameter::Ph),
            "temperature" | "temp" => Ok(Parameter::Temperature),
            "conductivity" => Ok(Parameter::Conductivity),
            "dissolved_oxygen" | "do" => Ok(Parameter::DissolvedOxygen),
            "turbidity" => Ok(Parameter::Turbidity),
            "moisture" => Ok(Parameter::Moisture),
            other => Err(EnvsenseError::UnknownParameter(other.to_string())),
        }
    }
}

/// Physical bounds and behaviour knobs for one measured quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterProfile {
    /// Quantity this profile describes.
    pub name: Parameter,
    /// Physically plausible bounds (min, max).
    pub valid_range: (f64, f64),
    /// Nominal resting value.
    pub baseline: f64,
    /// Amplitude of the 24-hour component.
    pub diurnal_amplitude: f64,
    /// Amplitude of the 7-day component.
    pub weekly_amplitude: f64,
    /// Standard deviation of per-sample gaussian noise.
    pub noise_sigma: f64,
    /// Standard deviation of each random-walk drift increment.
    pub drift_step_sigma: f64,
}

impl ParameterProfile {
    /// Create a profile with no seasonality, noise or drift.
    pub fn new(name: Parameter, min: f64, max: f64, baseline: f64) -> Self {
        Self {
            name,
            valid_range: (min, max),
            baseline,
            diurnal_amplitude: 0.0,
            weekly_amplitude: 0.0,
            noise_sigma: 0.0,
            drift_step_sigma: 0.0,
        }
    }

    /// Set the diurnal amplitude.
    pub fn with_diurnal(mut self, amplitude: f64) -> Self {
        self.diurnal_amplitude = amplitude;
        self
    }

    /// Set the weekly amplitude.
    pub fn with_weekly(mut self, amplitude: f64) -> Self {
        self.weekly_amplitude = amplitude;
        self
    }

    /// Set the noise standard deviation.
    pub fn with_noise(mut self, sigma: f64) -> Self {
        self.noise_sigma = sigma;
        self
    }

    /// Set the drift step standard deviation.
    pub fn with_drift(mut self, step_sigma: f64) -> Self {
        self.drift_step_sigma = step_sigma;
        self
    }

    /// Lower physical bound.
    pub fn min(&self) -> f64 {
        self.valid_range.0
    }

    /// Upper physical bound.
    pub fn max(&self) -> f64 {
        self.valid_range.1
    }

    /// Unit of measurement.
    pub fn unit(&self) -> &'static str {
        self.name.unit()
    }

    /// Clamp a value into the valid range.
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.valid_range.0, self.valid_range.1)
    }

    /// Whether a value lies within the valid range (inclusive).
    pub fn contains(&self, value: f64) -> bool {
        value >= self.valid_range.0 && value <= self.valid_range.1
    }

    /// Check the profile invariants.
    ///
    /// `min < baseline < max` must hold and every amplitude and sigma must be
    /// finite and non-negative.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (min, max) = self.valid_range;
        let invalid = |reason: String| ConfigError::InvalidProfile {
            parameter: self.name.as_str().to_string(),
            reason,
        };

        if !(min.is_finite() && max.is_finite() && self.baseline.is_finite()) {
            return Err(invalid("range and baseline must be finite".to_string()));
        }
        if !(min < self.baseline && self.baseline < max) {
            return Err(invalid(format!(
                "baseline {} not strictly inside ({}, {})",
                self.baseline, min, max
            )));
        }

        let knobs = [
            ("diurnal_amplitude", self.diurnal_amplitude),
            ("weekly_amplitude", self.weekly_amplitude),
            ("noise_sigma", self.noise_sigma),
            ("drift_step_sigma", self.drift_step_sigma),
        ];
        for (field, value) in knobs {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid(format!("{} must be >= 0, got {}", field, value)));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameter_names_roundtrip() {
        for parameter in Parameter::ALL {
            assert_eq!(parameter.as_str().parse::<Parameter>().unwrap(), parameter);
        }
    }

    #[test]
    fn test_parameter_aliases() {
        assert_eq!("temp".parse::<Parameter>().unwrap(), Parameter::Temperature);
        assert_eq!(" PH ".parse::<Parameter>().unwrap(), Parameter::Ph);
        assert!(matches!(
            "salinity".parse::<Parameter>(),
            Err(EnvsenseError::UnknownParameter(_))
        ));
    }

    #[test]
    fn test_parameter_serde_name() {
        let json = serde_json::to_string(&Parameter::DissolvedOxygen).unwrap();
        assert_eq!(json, "\"dissolved_oxygen\"");
    }

    #[test]
    fn test_units() {
        assert_eq!(Parameter::Ph.unit(), "");
        assert_eq!(Parameter::Conductivity.unit(), "μS/cm");
        assert_eq!(Parameter::Turbidity.unit(), "NTU");
    }

    #[test]
    fn test_valid_profile() {
        let profile = ParameterProfile::new(Parameter::Ph, 0.0, 14.0, 7.0)
            .with_diurnal(0.2)
            .with_weekly(0.1)
            .with_noise(0.1)
            .with_drift(0.002);
        assert!(profile.validate().is_ok());
    }

    #[test]
    fn test_baseline_outside_range() {
        let profile = ParameterProfile::new(Parameter::Ph, 0.0, 14.0, 14.0);
        assert!(matches!(
            profile.validate(),
            Err(ConfigError::InvalidProfile { .. })
        ));
    }

    #[test]
    fn test_negative_sigma_rejected() {
        let profile = ParameterProfile::new(Parameter::Turbidity, 0.0, 20.0, 5.0).with_noise(-1.0);
        let err = profile.validate().unwrap_err();
        assert!(err.to_string().contains("noise_sigma"));
    }

    #[test]
    fn test_clamp_and_contains() {
        let profile = ParameterProfile::new(Parameter::Moisture, 20.0, 80.0, 50.0);
        assert_eq!(profile.clamp(95.0), 80.0);
        assert_eq!(profile.clamp(10.0), 20.0);
        assert!(profile.contains(20.0));
        assert!(!profile.contains(80.5));
    }
}
