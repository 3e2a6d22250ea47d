// Envsense Synth - Dataset structures
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Multi-sensor datasets built from independent generators.
//!
//! Each sensor gets its own generator and drift state; seeds are derived from
//! the base seed and the sensor's position so the whole dataset reproduces
//! from one number.

use crate::anomalies::InjectionRecord;
use crate::config::GenerationConfig;
use crate::deployments::{create_profiles, Deployment};
use crate::generator::generate_series;
use chrono::NaiveDate;
use envsense::{Parameter, ParameterProfile, Result, TimeSeriesPoint};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::{Read, Write};

/// One generated series with its injection ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorSeries {
    /// Sensor identifier.
    pub sensor_id: String,
    /// Measured quantity.
    pub parameter: Parameter,
    /// Emitted points, in time order.
    pub points: Vec<TimeSeriesPoint>,
    /// Injected anomalies.
    #[serde(default)]
    pub injections: Vec<InjectionRecord>,
}

impl SensorSeries {
    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Point values in order.
    pub fn values(&self) -> Vec<f64> {
        envsense::values(&self.points)
    }

    /// Summary statistics over all points.
    pub fn stats(&self) -> Option<SeriesStats> {
        SeriesStats::from_values(&self.values())
    }

    /// Per-calendar-day (UTC) summary.
    pub fn daily_summary(&self) -> Vec<DailySummary> {
        daily_summary(&self.points)
    }
}

/// Dataset metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasetMetadata {
    /// Dataset name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Deployment preset the profiles came from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deployment: Option<String>,
    /// Base generation seed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Sample interval in milliseconds.
    pub sample_interval_ms: i64,
}

/// A set of generated series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    /// One entry per sensor, in insertion order.
    pub series: Vec<SensorSeries>,
    /// Metadata.
    #[serde(default)]
    pub metadata: DatasetMetadata,
}

impl Dataset {
    /// Look up a series by sensor id.
    pub fn series(&self, sensor_id: &str) -> Option<&SensorSeries> {
        self.series.iter().find(|s| s.sensor_id == sensor_id)
    }

    /// Sensor ids in order.
    pub fn sensor_ids(&self) -> Vec<&str> {
        self.series.iter().map(|s| s.sensor_id.as_str()).collect()
    }

    /// Total number of points across all series.
    pub fn total_points(&self) -> usize {
        self.series.iter().map(SensorSeries::len).sum()
    }

    /// Total number of injected anomalies.
    pub fn total_injections(&self) -> usize {
        self.series.iter().map(|s| s.injections.len()).sum()
    }

    /// All points, series after series.
    pub fn points(&self) -> impl Iterator<Item = &TimeSeriesPoint> {
        self.series.iter().flat_map(|s| s.points.iter())
    }

    /// Write as JSON.
    pub fn to_json_writer<W: Write>(&self, writer: W) -> serde_json::Result<()> {
        serde_json::to_writer_pretty(writer, self)
    }

    /// Read from JSON.
    pub fn from_json_reader<R: Read>(reader: R) -> serde_json::Result<Self> {
        serde_json::from_reader(reader)
    }
}

/// Builder for multi-sensor datasets.
#[derive(Debug, Clone, Default)]
pub struct DatasetBuilder {
    config: GenerationConfig,
    sensors: Vec<(String, ParameterProfile)>,
    name: Option<String>,
    deployment: Option<Deployment>,
}

impl DatasetBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set generation config shared by every sensor.
    pub fn with_config(mut self, config: GenerationConfig) -> Self {
        self.config = config;
        self
    }

    /// Set dataset name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Add a sensor.
    pub fn add_sensor(mut self, sensor_id: impl Into<String>, profile: ParameterProfile) -> Self {
        self.sensors.push((sensor_id.into(), profile));
        self
    }

    /// Add every profile of a deployment, one sensor each, ids prefixed by `station`.
    pub fn add_deployment(mut self, station: &str, deployment: Deployment) -> Self {
        for profile in create_profiles(deployment) {
            let sensor_id = format!("{}_{}", station, profile.name);
            self.sensors.push((sensor_id, profile));
        }
        self.deployment = Some(deployment);
        self
    }

    /// Generate every series.
    pub fn build(self) -> Result<Dataset> {
        let mut series = Vec::with_capacity(self.sensors.len());

        for (i, (sensor_id, profile)) in self.sensors.into_iter().enumerate() {
            let mut config = self.config.clone();
            config.seed = self.config.seed.map(|s| s.wrapping_add(i as u64));

            let parameter = profile.name;
            let (points, injections) = generate_series(sensor_id.clone(), profile, config)?;
            series.push(SensorSeries {
                sensor_id,
                parameter,
                points,
                injections,
            });
        }

        let dataset = Dataset {
            series,
            metadata: DatasetMetadata {
                name: self.name,
                deployment: self.deployment.map(|d| d.as_str().to_string()),
                seed: self.config.seed,
                sample_interval_ms: self.config.sample_interval_ms,
            },
        };

        debug!(
            "dataset built: {} series, {} points, {} injections",
            dataset.series.len(),
            dataset.total_points(),
            dataset.total_injections()
        );

        Ok(dataset)
    }
}

/// Basic statistics for a series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesStats {
    pub count: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

impl SeriesStats {
    /// Compute over a slice; `None` when empty. `std_dev` is the sample deviation.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let count = values.len();
        let mean = values.iter().sum::<f64>() / count as f64;
        let std_dev = if count > 1 {
            let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
            (ss / (count - 1) as f64).sqrt()
        } else {
            0.0
        };
        let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

        Some(Self {
            count,
            mean,
            std_dev,
            min,
            max,
        })
    }
}

/// Min/max/mean of one series over one UTC day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub sensor_id: String,
    pub parameter: Parameter,
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

/// Summarise points per (date, sensor, parameter), sorted by that key.
pub fn daily_summary(points: &[TimeSeriesPoint]) -> Vec<DailySummary> {
    let mut groups: BTreeMap<(NaiveDate, &str, Parameter), Vec<f64>> = BTreeMap::new();
    for point in points {
        groups
            .entry((point.timestamp.date_naive(), point.sensor_id.as_str(), point.parameter))
            .or_default()
            .push(point.value);
    }

    groups
        .into_iter()
        .filter_map(|((date, sensor_id, parameter), values)| {
            SeriesStats::from_values(&values).map(|stats| DailySummary {
                date,
                sensor_id: sensor_id.to_string(),
                parameter,
                count: stats.count,
                min: stats.min,
                max: stats.max,
                mean: stats.mean,
            })
        })
        .collect()
}
