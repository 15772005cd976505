//! Error types for the terminal core

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Terminal core error type
#[derive(Error, Debug)]
pub enum Error {
    /// `take_output` was called with nothing queued
    #[error("no terminal output queued, check output_available() before calling")]
    OutputQueueEmpty,

    /// SGR parameter outside the supported subset
    #[error("unsupported graphics command: {0}")]
    UnsupportedGraphicsCode(u32),

    /// Config file could not be read
    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Config file is not valid TOML for `TerminalConfig`
    #[error("invalid config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Snapshot (de)serialization failed
    #[error("snapshot serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for terminal core operations
pub type Result<T> = std::result::Result<T, Error>;
