//! Error types for merge-herald

use thiserror::Error;

/// All errors that can occur during a pipeline run
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid or missing configuration value
    #[error("configuration error: {0}")]
    Config(String),

    /// A git invocation failed or produced unusable output
    #[error("git error: {0}")]
    Git(String),

    /// The issue tracker rejected or failed a request
    #[error("tracker API error: {0}")]
    TrackerApi(String),

    /// A notification channel failed to deliver
    #[error("notification error: {0}")]
    Notify(String),

    /// CI host integration failed (missing inputs, unwritable output file)
    #[error("host error: {0}")]
    Host(String),

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;
