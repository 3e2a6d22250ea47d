// Envsense CLI - CSV input/output
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Long-format CSV, one measurement per row:
//!
//! ```text
//! timestamp,sensor_id,parameter,value,is_injected_anomaly
//! 2024-02-01T00:00:00Z,station-1_ph,ph,7.02,false
//! ```
//!
//! The ground-truth column may be left empty or omitted entirely.

use crate::error::{CliError, Result};
use chrono::{DateTime, Utc};
use envsense::{Parameter, TimeSeriesPoint};
use envsense_synth::DailySummary;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::{Read, Write};
use std::path::Path;

/// One CSV row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CsvRow {
    pub timestamp: DateTime<Utc>,
    pub sensor_id: String,
    pub parameter: String,
    pub value: f64,
    #[serde(default)]
    pub is_injected_anomaly: Option<bool>,
}

impl From<&TimeSeriesPoint> for CsvRow {
    fn from(point: &TimeSeriesPoint) -> Self {
        Self {
            timestamp: point.timestamp,
            sensor_id: point.sensor_id.clone(),
            parameter: point.parameter.as_str().to_string(),
            value: point.value,
            is_injected_anomaly: point.is_injected_anomaly,
        }
    }
}

impl CsvRow {
    /// Convert to a point. `row` is the 1-based data row, for error reporting.
    pub fn into_point(self, row: usize) -> Result<TimeSeriesPoint> {
        let parameter: Parameter = self.parameter.parse().map_err(|e| CliError::InvalidInput {
            row,
            reason: format!("{}", e),
        })?;

        if !self.value.is_finite() {
            return Err(CliError::InvalidInput {
                row,
                reason: format!("non-finite value {}", self.value),
            });
        }

        Ok(TimeSeriesPoint {
            timestamp: self.timestamp,
            sensor_id: self.sensor_id,
            parameter,
            value: self.value,
            is_injected_anomaly: self.is_injected_anomaly,
        })
    }
}

/// Write points as CSV rows, returning the number written.
pub fn write_points<'a, W, I>(writer: W, points: I) -> Result<usize>
where
    W: Write,
    I: IntoIterator<Item = &'a TimeSeriesPoint>,
{
    let mut csv_writer = csv::Writer::from_writer(writer);
    let mut count = 0;
    for point in points {
        csv_writer.serialize(CsvRow::from(point))?;
        count += 1;
    }
    csv_writer.flush()?;
    Ok(count)
}

/// Read every row, in file order.
pub fn read_points<R: Read>(reader: R) -> Result<Vec<TimeSeriesPoint>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut points = Vec::new();
    for (i, row) in csv_reader.deserialize::<CsvRow>().enumerate() {
        points.push(row?.into_point(i + 1)?);
    }
    Ok(points)
}

/// Read every row of a CSV file.
pub fn read_points_from_path(path: &Path) -> Result<Vec<TimeSeriesPoint>> {
    if !path.exists() {
        return Err(CliError::FileNotFound(path.to_path_buf()));
    }
    let file = std::fs::File::open(path)?;
    read_points(std::io::BufReader::new(file))
}

/// Split points into one series per (sensor, parameter).
///
/// Row order is kept within each series; series come out sorted by key.
pub fn group_series(points: Vec<TimeSeriesPoint>) -> Vec<((String, Parameter), Vec<TimeSeriesPoint>)> {
    let mut groups: BTreeMap<(String, Parameter), Vec<TimeSeriesPoint>> = BTreeMap::new();
    for point in points {
        groups
            .entry((point.sensor_id.clone(), point.parameter))
            .or_default()
            .push(point);
    }
    groups.into_iter().collect()
}

/// Write per-day summaries as CSV.
pub fn write_daily_summary<W: Write>(writer: W, summaries: &[DailySummary]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for summary in summaries {
        csv_writer.serialize(summary)?;
    }
    csv_writer.flush()?;
    Ok(())
}
