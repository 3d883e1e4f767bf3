//! # Effects Error Types
//!
//! Effects cannot fail once running. Every error here is raised while
//! building a component or loading its configuration.

use std::path::PathBuf;

use folio_core::CoreError;
use thiserror::Error;

/// Errors that can occur while configuring effects.
#[derive(Error, Debug)]
pub enum EffectsError {
    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The configuration file is not valid TOML for this schema.
    #[error("failed to parse effects configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// The configuration file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File that failed to load.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Frame or pointer plumbing rejected a parameter.
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Result type for effects operations.
pub type EffectsResult<T> = Result<T, EffectsError>;
