// Envsense CLI - Generate command
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! `envsense generate`: synthesize labelled series.

use crate::csv_io;
use crate::error::{CliError, Result};
use chrono::{DateTime, Utc};
use clap::{ArgGroup, Args, ValueEnum};
use envsense::{EnvsenseError, Parameter, ParameterProfile};
use envsense_synth::{profile_for, AnomalyKind, Dataset, DatasetBuilder, Deployment, GenerationConfig};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// Output format for generated data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Long-format CSV, one row per point
    Csv,
    /// Full dataset with injection ledger
    Json,
}

/// Arguments for `generate`.
#[derive(Args, Debug)]
#[command(group(
    ArgGroup::new("source")
        .required(true)
        .multiple(true)
        .args(["deployment", "parameter"])
))]
pub struct GenerateArgs {
    /// Deployment preset (water_treatment, soil_field)
    #[arg(short, long)]
    pub deployment: Option<Deployment>,

    /// Single parameter to generate (ph, temperature, conductivity, ...)
    #[arg(short, long)]
    pub parameter: Option<Parameter>,

    /// Sensor id, or station prefix when generating a whole deployment
    #[arg(long, default_value = "station-1")]
    pub sensor_id: String,

    /// Number of samples per series
    #[arg(short = 'n', long)]
    pub samples: Option<usize>,

    /// Seconds between samples
    #[arg(long)]
    pub interval_secs: Option<i64>,

    /// First timestamp (RFC 3339)
    #[arg(long)]
    pub start: Option<DateTime<Utc>>,

    /// Per-point anomaly probability
    #[arg(long)]
    pub probability: Option<f64>,

    /// Anomaly kinds to inject, comma separated
    #[arg(long, value_delimiter = ',')]
    pub kinds: Vec<AnomalyKind>,

    /// Smallest anomaly magnitude, in noise sigmas
    #[arg(long)]
    pub magnitude_min: Option<f64>,

    /// Largest anomaly magnitude, in noise sigmas
    #[arg(long)]
    pub magnitude_max: Option<f64>,

    /// Random seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// JSON generation config; flags override its fields
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output file (stdout when omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
    pub format: OutputFormat,

    /// Also write per-day min/max/mean to this CSV file
    #[arg(long)]
    pub summary: Option<PathBuf>,
}

/// Load a JSON config file.
pub(crate) fn load_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Err(CliError::FileNotFound(path.to_path_buf()));
    }
    let file = File::open(path)?;
    Ok(serde_json::from_reader(io::BufReader::new(file))?)
}

/// Open the output file, or stdout.
pub(crate) fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    Ok(match path {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(io::stdout().lock()),
    })
}

/// Resolve the generation config from the file and flags.
pub fn build_config(args: &GenerateArgs) -> Result<GenerationConfig> {
    let mut config: GenerationConfig = match &args.config {
        Some(path) => load_json(path)?,
        None => GenerationConfig::default(),
    };

    if let Some(samples) = args.samples {
        config = config.with_sample_count(samples);
    }
    if let Some(secs) = args.interval_secs {
        config = config.with_sample_interval_secs(secs);
    }
    if let Some(start) = args.start {
        config = config.with_start_time(start);
    }
    if let Some(probability) = args.probability {
        config = config.with_anomaly_probability(probability);
    }
    if !args.kinds.is_empty() {
        config = config.with_anomaly_kinds(args.kinds.iter().copied());
    }
    if let Some(min) = args.magnitude_min {
        config.anomaly_magnitude_range.0 = min;
    }
    if let Some(max) = args.magnitude_max {
        config.anomaly_magnitude_range.1 = max;
    }
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }

    config.validate().map_err(EnvsenseError::from)?;
    Ok(config)
}

/// Profile for a single parameter: the chosen deployment, else the first
/// deployment that measures it.
fn resolve_profile(deployment: Option<Deployment>, parameter: Parameter) -> Result<ParameterProfile> {
    let candidates = match deployment {
        Some(d) => vec![d],
        None => Deployment::ALL.to_vec(),
    };
    candidates
        .into_iter()
        .find_map(|d| profile_for(d, parameter))
        .ok_or_else(|| EnvsenseError::UnknownParameter(parameter.to_string()).into())
}

/// Generate the dataset described by the arguments.
pub fn build_dataset(args: &GenerateArgs) -> Result<Dataset> {
    let config = build_config(args)?;
    let builder = DatasetBuilder::new().with_config(config);

    let builder = match (args.deployment, args.parameter) {
        (deployment, Some(parameter)) => {
            let profile = resolve_profile(deployment, parameter)?;
            builder
                .with_name(format!("{} {}", args.sensor_id, parameter.display_name()))
                .add_sensor(args.sensor_id.clone(), profile)
        }
        (Some(deployment), None) => builder
            .with_name(deployment.display_name())
            .add_deployment(&args.sensor_id, deployment),
        (None, None) => return Err(CliError::EmptyDataset),
    };

    Ok(builder.build()?)
}

/// Run the command.
pub fn run(args: &GenerateArgs) -> Result<()> {
    let dataset = build_dataset(args)?;

    for series in &dataset.series {
        info!(
            "{} ({}): {} points, {} injected anomalies",
            series.sensor_id,
            series.parameter,
            series.len(),
            series.injections.len()
        );
    }

    let mut output = open_output(args.output.as_deref())?;
    match args.format {
        OutputFormat::Csv => {
            csv_io::write_points(&mut output, dataset.points())?;
        }
        OutputFormat::Json => {
            dataset.to_json_writer(&mut output)?;
            writeln!(output)?;
        }
    }
    output.flush()?;

    if let Some(path) = &args.summary {
        let summaries: Vec<_> = dataset
            .series
            .iter()
            .flat_map(|s| s.daily_summary())
            .collect();
        csv_io::write_daily_summary(File::create(path)?, &summaries)?;
        info!("Daily summary: {} rows -> {}", summaries.len(), path.display());
    }

    info!(
        "Generated {} points across {} series: {}",
        dataset.total_points(),
        dataset.series.len(),
        dataset.sensor_ids().join(", ")
    );
    Ok(())
}
