//! Error types for Envsense
//!
//! This module defines the error types shared by the generator, the
//! detector and their configuration layers.

use thiserror::Error;

/// Result type alias for Envsense operations
pub type Result<T> = std::result::Result<T, EnvsenseError>;

/// Main error type for Envsense operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EnvsenseError {
    /// Configuration rejected before any sample or result was produced
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    /// Timestamps within one series must strictly increase
    #[error("Timestamp at index {index} does not increase over the previous point")]
    NonIncreasingTimestamp { index: usize },

    /// Parameter name not recognised
    #[error("Unknown parameter: {0}")]
    UnknownParameter(String),

    /// Anomaly kind name not recognised
    #[error("Unknown anomaly kind: {0}")]
    UnknownAnomalyKind(String),

    /// Detection method name not recognised
    #[error("Unknown detection method: {0}")]
    UnknownMethod(String),

    /// Deployment preset name not recognised
    #[error("Unknown deployment: {0}")]
    UnknownDeployment(String),
}

/// Configuration errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Sampling interval must be positive
    #[error("Sample interval must be positive, got {interval_ms}ms")]
    NonPositiveInterval { interval_ms: i64 },

    /// Probability outside [0, 1]
    #[error("Anomaly probability must be within [0, 1], got {0}")]
    ProbabilityOutOfRange(f64),

    /// Magnitude range reversed, negative or not finite
    #[error("Invalid anomaly magnitude range ({min}, {max})")]
    InvalidMagnitudeRange { min: f64, max: f64 },

    /// Last sample timestamp falls outside the representable range
    #[error("Timestamps overflow: {sample_count} samples every {interval_ms}ms")]
    TimestampOverflow { sample_count: usize, interval_ms: i64 },

    /// Injection enabled without any anomaly kind to choose from
    #[error("Anomaly injection enabled but no anomaly kinds configured")]
    EmptyAnomalyKinds,

    /// Parameter profile violates its invariants
    #[error("Invalid profile for {parameter}: {reason}")]
    InvalidProfile { parameter: String, reason: String },

    /// Threshold or multiplier must be positive and finite
    #[error("Invalid {name}: {value} (must be positive and finite)")]
    InvalidThreshold { name: &'static str, value: f64 },

    /// Rolling window too small to estimate a standard deviation
    #[error("Rolling window must hold at least 2 samples, got {0}")]
    InvalidWindow(usize),

    /// Quorum outside [1, method count]
    #[error("Quorum {quorum} invalid for {methods} detection method(s)")]
    InvalidQuorum { quorum: usize, methods: usize },

    /// No detection method selected
    #[error("At least one detection method must be selected")]
    NoMethods,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_converts() {
        let err: EnvsenseError = ConfigError::InvalidWindow(1).into();
        assert!(matches!(
            err,
            EnvsenseError::InvalidConfig(ConfigError::InvalidWindow(1))
        ));
    }

    #[test]
    fn test_error_messages() {
        let err = ConfigError::NonPositiveInterval { interval_ms: -5 };
        assert_eq!(
            err.to_string(),
            "Sample interval must be positive, got -5ms"
        );

        let err = EnvsenseError::NonIncreasingTimestamp { index: 3 };
        assert!(err.to_string().contains("index 3"));
    }
}
