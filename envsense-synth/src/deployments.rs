// Envsense Synth - Deployment presets
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Ready-made parameter profiles for known deployments.
//!
//! - Water treatment: open-channel probes at a treatment plant.
//! - Soil field: in-ground probes on an agricultural plot.

use envsense::{EnvsenseError, Parameter, ParameterProfile, Result};
use std::fmt;
use std::str::FromStr;

/// Deployment types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Deployment {
    /// Water treatment plant.
    WaterTreatment,
    /// Agricultural soil plot.
    SoilField,
}

impl Deployment {
    /// Every deployment.
    pub const ALL: [Deployment; 2] = [Deployment::WaterTreatment, Deployment::SoilField];

    /// Get deployment name as string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Deployment::WaterTreatment => "water_treatment",
            Deployment::SoilField => "soil_field",
        }
    }

    /// Get display name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Deployment::WaterTreatment => "Water Treatment",
            Deployment::SoilField => "Soil Field",
        }
    }

    /// Parameters monitored by this deployment.
    pub fn parameters(&self) -> Vec<Parameter> {
        create_profiles(*self).into_iter().map(|p| p.name).collect()
    }
}

impl fmt::Display for Deployment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Deployment {
    type Err = EnvsenseError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "water_treatment" | "water" => Ok(Deployment::WaterTreatment),
            "soil_field" | "soil" => Ok(Deployment::SoilField),
            _ => Err(EnvsenseError::UnknownDeployment(s.to_string())),
        }
    }
}

/// Create every profile for a deployment.
pub fn create_profiles(deployment: Deployment) -> Vec<ParameterProfile> {
    match deployment {
        Deployment::WaterTreatment => water_treatment_profiles(),
        Deployment::SoilField => soil_field_profiles(),
    }
}

/// Profile of one parameter in a deployment, if monitored there.
pub fn profile_for(deployment: Deployment, parameter: Parameter) -> Option<ParameterProfile> {
    create_profiles(deployment)
        .into_iter()
        .find(|p| p.name == parameter)
}

fn water_treatment_profiles() -> Vec<ParameterProfile> {
    vec![
        ParameterProfile::new(Parameter::Ph, 0.0, 14.0, 7.0)
            .with_diurnal(0.2)
            .with_weekly(0.1)
            .with_noise(0.1)
            .with_drift(0.002),
        ParameterProfile::new(Parameter::Temperature, 0.0, 40.0, 25.0)
            .with_diurnal(2.0)
            .with_noise(0.5)
            .with_drift(0.01),
        // μS/cm; follows water temperature at ~10 μS/cm per °C
        ParameterProfile::new(Parameter::Conductivity, 10.0, 2000.0, 500.0)
            .with_diurnal(20.0)
            .with_noise(20.0)
            .with_drift(0.5),
        ParameterProfile::new(Parameter::DissolvedOxygen, 0.1, 20.0, 8.0)
            .with_diurnal(0.5)
            .with_noise(0.3)
            .with_drift(0.005),
        ParameterProfile::new(Parameter::Turbidity, 0.1, 100.0, 5.0)
            .with_noise(1.0)
            .with_drift(0.02),
    ]
}

/// Soil probe ranges; `d` is the per-reading drift bound of the probe.
fn soil(parameter: Parameter, min: f64, max: f64, d: f64) -> ParameterProfile {
    let span = max - min;
    ParameterProfile::new(parameter, min, max, (min + max) / 2.0)
        .with_diurnal(span * 0.05)
        .with_noise(span * 0.01)
        .with_drift(d / 3f64.sqrt())
}

fn soil_field_profiles() -> Vec<ParameterProfile> {
    vec![
        soil(Parameter::Ph, 5.5, 7.5, 0.1),
        soil(Parameter::Temperature, 15.0, 30.0, 0.5),
        soil(Parameter::Moisture, 20.0, 80.0, 2.0),
        soil(Parameter::Conductivity, 100.0, 500.0, 10.0),
        soil(Parameter::DissolvedOxygen, 5.0, 9.0, 0.3),
        soil(Parameter::Turbidity, 0.0, 20.0, 1.0),
    ]
}
