//! Error types for the bulkload library.
//!
//! All errors are represented by the [`BulkloadError`] enum. Recoverable
//! conditions (such as a malformed timestamp in a ticket row) never reach this
//! type; they are resolved where they occur.
//!
//! # Examples
//!
//! ```
//! use bulkload::error::{BulkloadError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(BulkloadError::invalid_argument("Invalid input"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for bulkload operations.
#[derive(Error, Debug)]
pub enum BulkloadError {
    /// I/O errors (opening the input file, reading stdin, ...)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Delimited-file reader errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Header row validation errors (empty or colliding field names)
    #[error("Header error: {0}")]
    Header(String),

    /// Field lookup errors (missing column, id index out of range)
    #[error("Field error: {0}")]
    Field(String),

    /// Search engine client errors (unexpected status codes, bad responses)
    #[error("Client error: {0}")]
    Client(String),

    /// HTTP transport errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),

    /// Generic anyhow error
    #[error("{0:#}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with BulkloadError.
pub type Result<T> = std::result::Result<T, BulkloadError>;

impl BulkloadError {
    /// Create a new header error.
    pub fn header<S: Into<String>>(msg: S) -> Self {
        BulkloadError::Header(msg.into())
    }

    /// Create a new field error.
    pub fn field<S: Into<String>>(msg: S) -> Self {
        BulkloadError::Field(msg.into())
    }

    /// Create a new client error.
    pub fn client<S: Into<String>>(msg: S) -> Self {
        BulkloadError::Client(msg.into())
    }

    /// Create a new invalid config error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        BulkloadError::Other(format!("Invalid configuration: {}", msg.into()))
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        BulkloadError::Other(format!("Invalid argument: {}", msg.into()))
    }
}
