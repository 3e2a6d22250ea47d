//! # Envsense
//!
//! Shared data model for environmental sensor monitoring: pH, temperature,
//! conductivity, dissolved oxygen, turbidity and moisture.
//!
//! ## Key Types
//!
//! - [`Parameter`]: the measured quantity, with display name and unit
//! - [`ParameterProfile`]: physical bounds and behaviour knobs used for synthesis
//! - [`TimeSeriesPoint`]: one timestamped measurement, optionally carrying
//!   ground truth about injected anomalies
//!
//! ## Quick Start
//!
//! ```rust
//! use envsense::{Parameter, ParameterProfile};
//!
//! let profile = ParameterProfile::new(Parameter::Temperature, -10.0, 50.0, 22.0)
//!     .with_diurnal(3.0)
//!     .with_noise(0.2);
//!
//! assert!(profile.validate().is_ok());
//! assert_eq!(profile.unit(), "°C");
//! ```
//!
//! ## Satellite Crates
//!
//! - `envsense-synth`: seeded series generator with anomaly injection
//! - `envsense-detect`: z-score, IQR and rolling z-score detection with
//!   quorum aggregation

pub mod error;
pub mod parameter;
pub mod point;

// Re-exports for convenient access
pub use error::{ConfigError, EnvsenseError, Result};
pub use parameter::{Parameter, ParameterProfile};
pub use point::{check_strictly_increasing, values, TimeSeriesPoint};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
