// Envsense CLI - Error types
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! CLI error types.

use envsense::EnvsenseError;
use std::path::PathBuf;

/// Result type for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI errors.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Envsense(#[from] EnvsenseError),

    #[error("Series {sensor_id}/{parameter}: {source}")]
    Series {
        sensor_id: String,
        parameter: String,
        source: EnvsenseError,
    },

    #[error("Invalid input at row {row}: {reason}")]
    InvalidInput { row: usize, reason: String },

    #[error("Empty dataset")]
    EmptyDataset,
}
