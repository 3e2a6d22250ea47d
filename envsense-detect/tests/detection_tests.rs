// Envsense Detect - Integration Tests
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Integration tests for the detector, aggregator and scorecard.

use chrono::{Duration, TimeZone, Utc};
use envsense::{Parameter, TimeSeriesPoint};
use envsense_detect::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// ============================================================================
// Helper Functions
// ============================================================================

fn to_points(values: &[f64]) -> Vec<TimeSeriesPoint> {
    let start = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
    values
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            TimeSeriesPoint::new(start + Duration::minutes(i as i64), "probe-1", Parameter::Ph, v)
        })
        .collect()
}

/// 99 values of 7.0 +- 0.01 and one 50.0 at `outlier_at`.
fn single_outlier_series(outlier_at: usize) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(7);
    let mut values: Vec<f64> = (0..100).map(|_| 7.0 + rng.gen_range(-0.01..=0.01)).collect();
    values[outlier_at] = 50.0;
    values
}

fn flagged_indices(results: &[DetectionResult], method: DetectionMethod) -> Vec<usize> {
    results
        .iter()
        .filter(|r| r.method == method && r.is_flagged)
        .map(|r| r.index)
        .collect()
}

fn detector(methods: &[DetectionMethod]) -> AnomalyDetector {
    AnomalyDetector::new(DetectionConfig::new().with_methods(methods.iter().copied())).unwrap()
}

// ============================================================================
// Section 1: Degenerate Inputs
// ============================================================================

#[test]
fn test_constant_series_zscore_flags_nothing() {
    let results = detector(&[DetectionMethod::ZScore]).detect_values(&[7.0; 200]);
    assert_eq!(results.len(), 200);
    assert!(results.iter().all(|r| !r.is_flagged));
}

#[test]
fn test_constant_series_iqr_flags_nothing() {
    let results = detector(&[DetectionMethod::Iqr]).detect_values(&[7.0; 200]);
    assert_eq!(results.len(), 200);
    assert!(results.iter().all(|r| !r.is_flagged));
}

#[test]
fn test_constant_series_scores_are_finite() {
    let results = detector(&DetectionMethod::ALL).detect_values(&[3.3; 50]);
    assert!(results.iter().all(|r| r.score.is_finite()));
}

#[test]
fn test_single_point_series() {
    let results = detector(&DetectionMethod::ALL).detect(&to_points(&[1.0])).unwrap();
    // No rolling result: the window never fills
    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| !r.is_flagged));
}

// ============================================================================
// Section 2: Single Outlier
// ============================================================================

#[test]
fn test_zscore_flags_only_the_outlier() {
    for outlier_at in [0, 42, 99] {
        let values = single_outlier_series(outlier_at);
        let results = detector(&[DetectionMethod::ZScore]).detect_values(&values);
        assert_eq!(
            flagged_indices(&results, DetectionMethod::ZScore),
            vec![outlier_at]
        );
    }
}

#[test]
fn test_zscore_reports_threshold_and_sign() {
    let mut values = single_outlier_series(10);
    values[10] = -50.0;
    let results = detector(&[DetectionMethod::ZScore]).detect_values(&values);

    let outlier = &results[10];
    assert!(outlier.is_flagged);
    assert!(outlier.score < -3.0);
    assert_eq!(outlier.threshold_used, 3.0);
}

#[test]
fn test_iqr_flags_the_outlier() {
    let values = single_outlier_series(60);
    let results = detector(&[DetectionMethod::Iqr]).detect_values(&values);
    assert!(flagged_indices(&results, DetectionMethod::Iqr).contains(&60));
    assert!(results[60].score > 0.0);
}

#[test]
fn test_rolling_flags_the_outlier_after_warmup() {
    let values = single_outlier_series(50);
    let results = detector(&[DetectionMethod::RollingZScore]).detect_values(&values);
    let flagged = flagged_indices(&results, DetectionMethod::RollingZScore);
    assert_eq!(flagged.first(), Some(&50));
}

// ============================================================================
// Section 3: Rolling Cold Start
// ============================================================================

#[test]
fn test_rolling_never_flags_first_window() {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..20 {
        let values: Vec<f64> = (0..60).map(|_| rng.gen_range(-1000.0..1000.0)).collect();
        let results = detector(&[DetectionMethod::RollingZScore]).detect_values(&values);

        assert!(results.iter().all(|r| r.index >= 20));
        assert_eq!(results.len(), 40);
    }
}

#[test]
fn test_rolling_custom_window() {
    let config = DetectionConfig::new()
        .with_methods([DetectionMethod::RollingZScore])
        .with_rolling(5, 3.0);
    let results = AnomalyDetector::new(config).unwrap().detect_values(&[1.0; 12]);
    let indices: Vec<usize> = results.iter().map(|r| r.index).collect();
    assert_eq!(indices, (5..12).collect::<Vec<_>>());
}

#[test]
fn test_rolling_is_local() {
    // A level shift moves the global statistics but the rolling baseline adapts
    let mut values: Vec<f64> = (0..200)
        .map(|i| if i % 2 == 0 { 0.1 } else { -0.1 })
        .collect();
    for v in values.iter_mut().skip(100) {
        *v += 10.0;
    }

    let results = detector(&[DetectionMethod::RollingZScore]).detect_values(&values);
    let flagged = flagged_indices(&results, DetectionMethod::RollingZScore);
    assert!(flagged.contains(&100));
    assert!(flagged.iter().all(|&i| (100..120).contains(&i)));
}

// ============================================================================
// Section 4: Aggregation
// ============================================================================

#[test]
fn test_quorum_one_any_method() {
    let values = single_outlier_series(70);
    let results = detector(&DetectionMethod::ALL).detect_values(&values);
    let verdicts = ResultAggregator::new(1).unwrap().aggregate(&results);

    for verdict in &verdicts {
        assert_eq!(verdict.is_flagged, verdict.flagged_by_count >= 1);
    }
    assert!(verdicts[70].is_flagged);
}

#[test]
fn test_quorum_two_drops_single_method_flags() {
    let values = single_outlier_series(70);
    let results = detector(&DetectionMethod::ALL).detect_values(&values);
    let verdicts = ResultAggregator::new(2).unwrap().aggregate(&results);

    for verdict in &verdicts {
        if verdict.flagged_by_count == 1 {
            assert!(!verdict.is_flagged);
        }
    }
    assert!(verdicts[70].is_flagged);
}

#[test]
fn test_findings_keep_every_method() {
    let values = single_outlier_series(70);
    let results = detector(&DetectionMethod::ALL).detect_values(&values);
    let verdicts = ResultAggregator::default().aggregate(&results);

    assert_eq!(verdicts[5].findings.len(), 2);
    assert_eq!(verdicts[70].findings.len(), 3);
    assert_eq!(verdicts[70].fired_methods().len(), verdicts[70].flagged_by_count);
}

#[test]
fn test_verdict_json_shape() {
    let values = single_outlier_series(30);
    let detector = detector(&DetectionMethod::ALL);
    let verdicts = detector.analyze(&to_points(&values)).unwrap();

    let json = serde_json::to_value(&verdicts[30]).unwrap();
    assert_eq!(json["index"], 30);
    assert_eq!(json["is_flagged"], true);
    assert!(json["timestamp"].is_string());
    assert_eq!(json["findings"][0]["method"], "zscore");
}

// ============================================================================
// Section 5: Scorecard
// ============================================================================

#[test]
fn test_scorecard_against_labels() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut points = to_points(&(0..500).map(|_| rng.gen_range(6.9..7.1)).collect::<Vec<_>>());
    for p in points.iter_mut() {
        p.is_injected_anomaly = Some(false);
    }
    for &i in &[100, 250, 400] {
        points[i].value = 12.0;
        points[i].is_injected_anomaly = Some(true);
    }

    let verdicts = detector(&DetectionMethod::ALL).analyze(&points).unwrap();
    let card = Scorecard::from_verdicts(&points, &verdicts);

    assert_eq!(card.true_positives, 3);
    assert_eq!(card.false_negatives, 0);
    assert_eq!(card.recall(), Some(1.0));
    assert!(card.false_positive_rate().unwrap() <= 0.1);
}

#[test]
fn test_scorecard_skips_external_data() {
    let points = to_points(&single_outlier_series(5));
    let verdicts = detector(&DetectionMethod::ALL).analyze(&points).unwrap();
    let card = Scorecard::from_verdicts(&points, &verdicts);
    assert_eq!(card.total(), 0);
}
