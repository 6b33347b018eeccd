use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;
use crate::oracle::OracleError;

/// Errors raised while loading an instance or solving it.
#[derive(Debug, Error)]
pub enum Error {
    /// The instance file could not be read.
    #[error("cannot open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The instance text does not follow the expected format.
    #[error("malformed instance: {0}")]
    Parse(String),

    /// The instance data is inconsistent.
    #[error("invalid instance: {0}")]
    InvalidInstance(String),

    /// An item is wider than the bar, so no pattern can ever contain it.
    #[error("item {item} (w={width}) does not fit in bar (W={capacity})")]
    ItemDoesNotFit {
        item: usize,
        width: u32,
        capacity: u32,
    },

    /// A pattern or dual vector does not have one entry per item type.
    #[error("{what} has {found} entries, expected one per item type ({expected})")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    /// The LP/MIP oracle failed.
    #[error(transparent)]
    Oracle(#[from] OracleError),

    /// The configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
