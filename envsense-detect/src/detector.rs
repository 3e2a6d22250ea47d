// Envsense Detect - Anomaly detector
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Multi-method anomaly detector.

use crate::aggregate::{ConsolidatedVerdict, ResultAggregator};
use crate::config::DetectionConfig;
use crate::method::{DetectionMethod, Evaluation, MethodDetector};
use crate::result::DetectionResult;
use chrono::{DateTime, Utc};
use envsense::{check_strictly_increasing, values, Result, TimeSeriesPoint};
use log::{debug, warn};

/// Runs every configured method over a series.
///
/// Holds no state between calls; one detector may score any number of
/// independent series, from any number of threads.
#[derive(Debug, Clone)]
pub struct AnomalyDetector {
    config: DetectionConfig,
    methods: Vec<MethodDetector>,
}

impl AnomalyDetector {
    /// Create a detector, validating the configuration.
    pub fn new(config: DetectionConfig) -> Result<Self> {
        config.validate()?;

        let methods: Vec<MethodDetector> = config
            .distinct_methods()
            .into_iter()
            .map(|m| MethodDetector::from_config(m, &config))
            .collect();

        debug!(
            "anomaly detector: methods={:?} quorum={}",
            methods.iter().map(MethodDetector::method).collect::<Vec<_>>(),
            config.aggregation.quorum
        );

        Ok(Self { config, methods })
    }

    /// Get configuration.
    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    /// Methods that will run, in reporting order.
    pub fn methods(&self) -> Vec<DetectionMethod> {
        self.methods.iter().map(MethodDetector::method).collect()
    }

    /// Score a time-ordered series.
    ///
    /// Fails if timestamps do not strictly increase. Results are ordered by
    /// point, then by method.
    pub fn detect(&self, points: &[TimeSeriesPoint]) -> Result<Vec<DetectionResult>> {
        check_strictly_increasing(points)?;
        let timestamps: Vec<Option<DateTime<Utc>>> =
            points.iter().map(|p| Some(p.timestamp)).collect();
        Ok(self.run(&values(points), &timestamps))
    }

    /// Score a series and consolidate with the configured quorum.
    pub fn analyze(&self, points: &[TimeSeriesPoint]) -> Result<Vec<ConsolidatedVerdict>> {
        let results = self.detect(points)?;
        let aggregator = ResultAggregator::from_config(&self.config)?;
        Ok(aggregator.aggregate(&results))
    }

    /// Score raw values with no timestamps.
    ///
    /// Non-finite values get no result from any method.
    pub fn detect_values(&self, values: &[f64]) -> Vec<DetectionResult> {
        self.run(values, &vec![None; values.len()])
    }

    fn run(&self, values: &[f64], timestamps: &[Option<DateTime<Utc>>]) -> Vec<DetectionResult> {
        let skipped = values.iter().filter(|v| !v.is_finite()).count();
        if skipped > 0 {
            warn!("{} non-finite values excluded from detection", skipped);
        }

        let per_method: Vec<(DetectionMethod, Vec<Option<Evaluation>>)> = self
            .methods
            .iter()
            .map(|m| (m.method(), m.evaluate(values)))
            .collect();

        for (method, evaluations) in &per_method {
            let flagged = evaluations
                .iter()
                .flatten()
                .filter(|e| e.is_flagged)
                .count();
            debug!("{}: {} of {} points flagged", method, flagged, values.len());
        }

        let mut results = Vec::with_capacity(values.len() * per_method.len());
        for (index, timestamp) in timestamps.iter().enumerate() {
            for (method, evaluations) in &per_method {
                if let Some(evaluation) = evaluations[index] {
                    results.push(DetectionResult::from_evaluation(
                        index, *timestamp, *method, evaluation,
                    ));
                }
            }
        }
        results
    }
}
