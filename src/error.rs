//! Error types for clearance-checkr.
//!
//! Only [`CheckError`] ever reaches `main`. [`TransportError`] stays inside the
//! lookup engine, where a failed batch degrades its identifiers to
//! "needs review" instead of aborting the run.

use std::path::PathBuf;

use thiserror::Error;

/// Failures that stop the run before or outside of classification.
#[derive(Error, Debug)]
pub enum CheckError {
    /// An input manifest does not exist.
    #[error("The file \"{}\" does not exist.", path.display())]
    NotFound { path: PathBuf },

    /// An input manifest or config file exists but cannot be read.
    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed configuration file.
    #[error("Invalid configuration in {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    /// The HTTP client could not be constructed.
    #[error("Failed to create HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// A failed request to the clearance service.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("clearance service returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed clearance response: {0}")]
    Decode(String),
}
