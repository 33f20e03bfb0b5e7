use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the Claimsight dashboard.
#[derive(Error, Debug)]
pub enum ClaimsError {
    /// A batch file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A JSON document could not be parsed.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// A parsed document is not a valid classifier response; the batch is
    /// rejected before any aggregation runs.
    #[error("Malformed batch: {0}")]
    MalformedBatch(String),

    /// The expected batch drop directory does not exist.
    #[error("Data path not found: {0}")]
    DataPathNotFound(PathBuf),

    /// No batch files were found under the given directory.
    #[error("No batch files found in {0}")]
    NoBatchFiles(PathBuf),

    /// An error originating from the terminal / TUI layer.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the Claimsight crates.
pub type Result<T> = std::result::Result<T, ClaimsError>;
