//! Run configuration, loaded from TOML.
//!
//! Every field has a default, so an empty file (or no file at all) gives
//! the standard settings:
//!
//! ```
//! use cutstock::Config;
//!
//! let config = Config::from_toml_str(r#"
//!     [column_generation]
//!     max_iterations = 500
//!
//!     [compact]
//!     time_limit = 60.0
//! "#).unwrap();
//!
//! assert_eq!(config.column_generation.tolerance, 1e-6);
//! assert_eq!(config.column_generation.max_iterations, Some(500));
//! assert_eq!(config.compact.time_limit, 60.0);
//! assert!(!config.compact.solve_ip);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub column_generation: ColumnGenerationConfig,
    pub compact: CompactConfig,
    pub solver: SolverConfig,
}

/// Settings of the column-generation loop.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColumnGenerationConfig {
    /// A pattern is added only if its reduced cost is below `-tolerance`.
    pub tolerance: f64,

    /// Stop after this many master solves even if improving columns remain.
    pub max_iterations: Option<usize>,
}

impl Default for ColumnGenerationConfig {
    fn default() -> Self {
        ColumnGenerationConfig {
            tolerance: 1e-6,
            max_iterations: None,
        }
    }
}

/// Settings of the compact baseline.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompactConfig {
    /// Wall-clock limit for each compact solve, in seconds.
    pub time_limit: f64,

    /// Also solve the integer model after the LP relaxation.
    pub solve_ip: bool,
}

impl Default for CompactConfig {
    fn default() -> Self {
        CompactConfig {
            time_limit: 300.0,
            solve_ip: false,
        }
    }
}

/// Settings passed through to SCIP.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolverConfig {
    /// SCIP `display/verblevel`: 0 is silent, 5 prints everything.
    pub verbosity: i32,
}

impl Config {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads and validates configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses and validates configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges that the TOML types alone cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let tolerance = self.column_generation.tolerance;
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "column_generation.tolerance must be a finite non-negative number, got {tolerance}"
            )));
        }
        if self.column_generation.max_iterations == Some(0) {
            return Err(ConfigError::Invalid(
                "column_generation.max_iterations must be at least 1".to_string(),
            ));
        }
        let time_limit = self.compact.time_limit;
        if time_limit.is_nan() || time_limit <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "compact.time_limit must be positive, got {time_limit}"
            )));
        }
        Ok(())
    }
}
