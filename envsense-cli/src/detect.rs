// Envsense CLI - Detect command
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! `envsense detect`: score a CSV file and write verdicts as JSON.

use crate::csv_io;
use crate::error::{CliError, Result};
use crate::generate::{load_json, open_output};
use clap::Args;
use envsense::{EnvsenseError, Parameter, TimeSeriesPoint};
use envsense_detect::{AnomalyDetector, ConsolidatedVerdict, DetectionConfig, DetectionMethod, Scorecard};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

/// Arguments for `detect`.
#[derive(Args, Debug)]
pub struct DetectArgs {
    /// Long-format CSV input
    #[arg(short, long)]
    pub input: PathBuf,

    /// JSON output file (stdout when omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// JSON detection config; flags override its fields
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Methods to run, comma separated (zscore, iqr, rolling_zscore)
    #[arg(long, value_delimiter = ',')]
    pub methods: Vec<DetectionMethod>,

    /// Whole-series z-score threshold
    #[arg(long)]
    pub zscore_threshold: Option<f64>,

    /// IQR fence multiplier
    #[arg(long)]
    pub iqr_multiplier: Option<f64>,

    /// Rolling window length
    #[arg(long)]
    pub window: Option<usize>,

    /// Rolling z-score threshold
    #[arg(long)]
    pub rolling_threshold: Option<f64>,

    /// Methods that must agree before a point is flagged
    #[arg(long)]
    pub quorum: Option<usize>,

    /// Only write flagged verdicts
    #[arg(long)]
    pub flagged_only: bool,
}

/// Detection output for one (sensor, parameter) series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesReport {
    pub sensor_id: String,
    pub parameter: Parameter,
    pub points: usize,
    pub flagged: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scorecard: Option<Scorecard>,
    pub verdicts: Vec<ConsolidatedVerdict>,
}

/// Top-level JSON document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionReport {
    pub methods: Vec<DetectionMethod>,
    pub quorum: usize,
    pub series: Vec<SeriesReport>,
}

/// Resolve the detection config from the file and flags.
pub fn build_config(args: &DetectArgs) -> Result<DetectionConfig> {
    let mut config: DetectionConfig = match &args.config {
        Some(path) => load_json(path)?,
        None => DetectionConfig::default(),
    };

    if !args.methods.is_empty() {
        config = config.with_methods(args.methods.iter().copied());
    }
    if let Some(threshold) = args.zscore_threshold {
        config = config.with_zscore_threshold(threshold);
    }
    if let Some(multiplier) = args.iqr_multiplier {
        config = config.with_iqr_multiplier(multiplier);
    }
    if let Some(window) = args.window {
        config.rolling.window = window;
    }
    if let Some(threshold) = args.rolling_threshold {
        config.rolling.threshold = threshold;
    }
    if let Some(quorum) = args.quorum {
        config = config.with_quorum(quorum);
    }

    config.validate().map_err(EnvsenseError::from)?;
    Ok(config)
}

/// Score every series in `points`.
pub fn analyze(
    detector: &AnomalyDetector,
    points: Vec<TimeSeriesPoint>,
    flagged_only: bool,
) -> Result<DetectionReport> {
    if points.is_empty() {
        return Err(CliError::EmptyDataset);
    }

    let mut reports = Vec::new();
    let mut total = Scorecard::default();
    let mut labelled = false;

    for ((sensor_id, parameter), series) in csv_io::group_series(points) {
        let verdicts = detector
            .analyze(&series)
            .map_err(|source| CliError::Series {
                sensor_id: sensor_id.clone(),
                parameter: parameter.to_string(),
                source,
            })?;

        let flagged = verdicts.iter().filter(|v| v.is_flagged).count();
        info!("{} ({}): {} of {} points flagged", sensor_id, parameter, flagged, series.len());

        let scorecard = if series.iter().any(|p| p.is_injected_anomaly.is_some()) {
            let card = Scorecard::from_verdicts(&series, &verdicts);
            info!("{} ({}): {}", sensor_id, parameter, card);
            total.merge(&card);
            labelled = true;
            Some(card)
        } else {
            None
        };

        let verdicts = if flagged_only {
            verdicts.into_iter().filter(|v| v.is_flagged).collect()
        } else {
            verdicts
        };

        reports.push(SeriesReport {
            sensor_id,
            parameter,
            points: series.len(),
            flagged,
            scorecard,
            verdicts,
        });
    }

    if labelled {
        info!("Overall: {}", total);
    } else {
        info!("No ground truth in input, scorecard skipped");
    }

    Ok(DetectionReport {
        methods: detector.methods(),
        quorum: detector.config().aggregation.quorum,
        series: reports,
    })
}

/// Run the command.
pub fn run(args: &DetectArgs) -> Result<()> {
    let points = csv_io::read_points_from_path(&args.input)?;
    info!("Loaded {} rows from {}", points.len(), args.input.display());

    let detector = AnomalyDetector::new(build_config(args)?)?;
    let report = analyze(&detector, points, args.flagged_only)?;

    let mut output = open_output(args.output.as_deref())?;
    serde_json::to_writer_pretty(&mut output, &report)?;
    writeln!(output)?;
    output.flush()?;
    Ok(())
}
