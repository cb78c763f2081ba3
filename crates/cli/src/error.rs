//! CLI error types.

use std::path::PathBuf;
use thiserror::Error;

use crate::config::ConfigError;

/// CLI errors.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// A history file could not be opened.
    #[error("cannot open history {path}: {source}")]
    HistoryNotFound {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The two histories are not equivalent.
    #[error("histories differ: {0}")]
    Mismatch(String),

    /// Configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A history could not be decoded or written.
    #[error(transparent)]
    Trace(#[from] trace::Error),

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
