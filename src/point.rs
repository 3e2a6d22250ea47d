//! Time series points and series ordering checks.

use crate::error::{EnvsenseError, Result};
use crate::parameter::Parameter;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single timestamped measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    /// Measurement time.
    pub timestamp: DateTime<Utc>,
    /// Sensor identifier.
    pub sensor_id: String,
    /// Measured quantity.
    pub parameter: Parameter,
    /// Measured value.
    pub value: f64,
    /// Ground truth from the injector; `None` for externally supplied data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_injected_anomaly: Option<bool>,
}

impl TimeSeriesPoint {
    /// Create a point with unknown ground truth.
    pub fn new(
        timestamp: DateTime<Utc>,
        sensor_id: impl Into<String>,
        parameter: Parameter,
        value: f64,
    ) -> Self {
        Self {
            timestamp,
            sensor_id: sensor_id.into(),
            parameter,
            value,
            is_injected_anomaly: None,
        }
    }

    /// Attach ground truth.
    pub fn with_ground_truth(mut self, injected: bool) -> Self {
        self.is_injected_anomaly = Some(injected);
        self
    }

    /// Whether the point is a known injected anomaly.
    pub fn is_known_anomaly(&self) -> bool {
        self.is_injected_anomaly == Some(true)
    }
}

/// Verify that timestamps strictly increase across the series.
pub fn check_strictly_increasing(points: &[TimeSeriesPoint]) -> Result<()> {
    for (index, pair) in points.windows(2).enumerate() {
        if pair[1].timestamp <= pair[0].timestamp {
            return Err(EnvsenseError::NonIncreasingTimestamp { index: index + 1 });
        }
    }
    Ok(())
}

/// Extract the value column of a series.
pub fn values(points: &[TimeSeriesPoint]) -> Vec<f64> {
    points.iter().map(|p| p.value).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn series(offsets_secs: &[i64]) -> Vec<TimeSeriesPoint> {
        let start = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        offsets_secs
            .iter()
            .map(|&s| TimeSeriesPoint::new(start + Duration::seconds(s), "s1", Parameter::Ph, 7.0))
            .collect()
    }

    #[test]
    fn test_increasing_series_accepted() {
        assert!(check_strictly_increasing(&series(&[0, 60, 120])).is_ok());
        assert!(check_strictly_increasing(&[]).is_ok());
    }

    #[test]
    fn test_duplicate_timestamp_rejected() {
        let err = check_strictly_increasing(&series(&[0, 60, 60, 120])).unwrap_err();
        assert_eq!(err, EnvsenseError::NonIncreasingTimestamp { index: 2 });
    }

    #[test]
    fn test_ground_truth_flag() {
        let point = series(&[0]).remove(0);
        assert!(!point.is_known_anomaly());
        assert!(point.with_ground_truth(true).is_known_anomaly());
    }

    #[test]
    fn test_unknown_ground_truth_not_serialized() {
        let point = series(&[0]).remove(0);
        let json = serde_json::to_string(&point).unwrap();
        assert!(!json.contains("is_injected_anomaly"));

        let restored: TimeSeriesPoint = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.is_injected_anomaly, None);
    }

    #[test]
    fn test_values_column() {
        assert_eq!(values(&series(&[0, 1])), vec![7.0, 7.0]);
    }
}
