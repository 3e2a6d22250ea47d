// Envsense Detect - Result aggregation
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Quorum consolidation of per-method results.

use crate::config::DetectionConfig;
use crate::method::DetectionMethod;
use crate::result::DetectionResult;
use chrono::{DateTime, Utc};
use envsense::{ConfigError, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One method's contribution to a verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodFinding {
    pub method: DetectionMethod,
    pub score: f64,
    pub is_flagged: bool,
    pub threshold_used: f64,
}

/// Consolidated verdict for one point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsolidatedVerdict {
    /// Position of the point in the series.
    pub index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    /// `flagged_by_count >= quorum`.
    pub is_flagged: bool,
    /// Number of methods that flagged the point.
    pub flagged_by_count: usize,
    /// Every method that produced a result, flagged or not.
    pub findings: Vec<MethodFinding>,
}

impl ConsolidatedVerdict {
    /// Methods that flagged the point.
    pub fn fired_methods(&self) -> Vec<DetectionMethod> {
        self.findings
            .iter()
            .filter(|f| f.is_flagged)
            .map(|f| f.method)
            .collect()
    }

    /// Finding of one method, if it evaluated this point.
    pub fn finding(&self, method: DetectionMethod) -> Option<&MethodFinding> {
        self.findings.iter().find(|f| f.method == method)
    }

    /// Largest absolute score among the findings.
    pub fn max_abs_score(&self) -> f64 {
        self.findings
            .iter()
            .map(|f| f.score.abs())
            .fold(0.0, f64::max)
    }
}

/// Merges per-method results into one verdict per point.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultAggregator {
    quorum: usize,
}

impl Default for ResultAggregator {
    fn default() -> Self {
        Self { quorum: 1 }
    }
}

impl ResultAggregator {
    /// Create an aggregator; quorum must be at least 1.
    pub fn new(quorum: usize) -> Result<Self> {
        if quorum == 0 {
            return Err(ConfigError::InvalidQuorum { quorum, methods: 0 }.into());
        }
        Ok(Self { quorum })
    }

    /// Build from a detection config, checking the quorum against its methods.
    pub fn from_config(config: &DetectionConfig) -> Result<Self> {
        let quorum = config.aggregation.quorum;
        config
            .aggregation
            .validate_for(config.distinct_methods().len())?;
        Ok(Self { quorum })
    }

    pub fn quorum(&self) -> usize {
        self.quorum
    }

    /// Group results by point index and apply the quorum.
    ///
    /// Verdicts are sorted by index; points without any result are absent.
    pub fn aggregate(&self, results: &[DetectionResult]) -> Vec<ConsolidatedVerdict> {
        let mut by_index: BTreeMap<usize, ConsolidatedVerdict> = BTreeMap::new();

        for result in results {
            let verdict = by_index
                .entry(result.index)
                .or_insert_with(|| ConsolidatedVerdict {
                    index: result.index,
                    timestamp: result.timestamp,
                    is_flagged: false,
                    flagged_by_count: 0,
                    findings: Vec::new(),
                });

            if result.is_flagged {
                verdict.flagged_by_count += 1;
            }
            verdict.findings.push(MethodFinding {
                method: result.method,
                score: result.score,
                is_flagged: result.is_flagged,
                threshold_used: result.threshold_used,
            });
        }

        let max_methods = by_index.values().map(|v| v.findings.len()).max().unwrap_or(0);
        if max_methods > 0 && max_methods < self.quorum {
            warn!(
                "quorum {} can never be met: at most {} method(s) per point",
                self.quorum, max_methods
            );
        }

        by_index
            .into_values()
            .map(|mut verdict| {
                verdict.is_flagged = verdict.flagged_by_count >= self.quorum;
                verdict
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(index: usize, method: DetectionMethod, flagged: bool) -> DetectionResult {
        DetectionResult {
            index,
            timestamp: None,
            method,
            score: if flagged { 4.0 } else { 0.5 },
            is_flagged: flagged,
            threshold_used: 3.0,
        }
    }

    #[test]
    fn test_quorum_one() {
        let results = vec![
            result(0, DetectionMethod::ZScore, false),
            result(0, DetectionMethod::Iqr, true),
            result(1, DetectionMethod::ZScore, false),
            result(1, DetectionMethod::Iqr, false),
        ];
        let verdicts = ResultAggregator::new(1).unwrap().aggregate(&results);

        assert_eq!(verdicts.len(), 2);
        assert!(verdicts[0].is_flagged);
        assert_eq!(verdicts[0].fired_methods(), vec![DetectionMethod::Iqr]);
        assert!(!verdicts[1].is_flagged);
    }

    #[test]
    fn test_quorum_two() {
        let results = vec![
            result(0, DetectionMethod::ZScore, false),
            result(0, DetectionMethod::Iqr, true),
            result(1, DetectionMethod::ZScore, true),
            result(1, DetectionMethod::Iqr, true),
        ];
        let verdicts = ResultAggregator::new(2).unwrap().aggregate(&results);

        assert!(!verdicts[0].is_flagged);
        assert_eq!(verdicts[0].flagged_by_count, 1);
        assert!(verdicts[1].is_flagged);
    }

    #[test]
    fn test_breakdown_retained() {
        let results = vec![
            result(3, DetectionMethod::RollingZScore, true),
            result(3, DetectionMethod::ZScore, false),
        ];
        let verdicts = ResultAggregator::default().aggregate(&results);

        let verdict = &verdicts[0];
        assert_eq!(verdict.findings.len(), 2);
        assert_eq!(
            verdict.finding(DetectionMethod::RollingZScore).unwrap().score,
            4.0
        );
        assert!(verdict.finding(DetectionMethod::Iqr).is_none());
        assert_eq!(verdict.max_abs_score(), 4.0);
    }

    #[test]
    fn test_verdicts_sorted_by_index() {
        let results = vec![
            result(5, DetectionMethod::Iqr, false),
            result(1, DetectionMethod::Iqr, false),
            result(3, DetectionMethod::Iqr, false),
        ];
        let verdicts = ResultAggregator::default().aggregate(&results);
        let indices: Vec<usize> = verdicts.iter().map(|v| v.index).collect();
        assert_eq!(indices, vec![1, 3, 5]);
    }

    #[test]
    fn test_zero_quorum_rejected() {
        assert!(ResultAggregator::new(0).is_err());
    }

    #[test]
    fn test_from_config() {
        let config = DetectionConfig::new().with_quorum(2);
        assert_eq!(ResultAggregator::from_config(&config).unwrap().quorum(), 2);

        let config = DetectionConfig::new().with_quorum(4);
        assert!(ResultAggregator::from_config(&config).is_err());
    }
}
