//! Unified error types for the regio ecosystem
//!
//! This module provides a common error type [`RegioError`] that can represent
//! errors from any part of the system. Domain-specific error types (such as
//! the regionalization errors in regio-algo) convert to `RegioError` for
//! uniform handling at API boundaries.
//!
//! # Example
//!
//! ```ignore
//! use regio_core::{RegioError, RegioResult};
//!
//! fn run(path: &str) -> RegioResult<()> {
//!     let lattice = load_lattice(path)?;
//!     regionalize(&lattice)?;
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// Unified error type for all regio operations.
#[derive(Error, Debug)]
pub enum RegioError {
    /// I/O errors (file access, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Parsing/deserialization errors
    #[error("Parse error: {0}")]
    Parse(String),

    /// Data validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Algorithm errors (MST construction, pruning, index computation)
    #[error("Algorithm error: {0}")]
    Algorithm(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic errors (for wrapping external errors)
    #[error("{0}")]
    Other(String),
}

/// Convenience type alias for Results using RegioError.
pub type RegioResult<T> = Result<T, RegioError>;

// Conversion from anyhow::Error
impl From<anyhow::Error> for RegioError {
    fn from(err: anyhow::Error) -> Self {
        RegioError::Other(err.to_string())
    }
}

// Conversion from string-like types for convenience
impl From<String> for RegioError {
    fn from(s: String) -> Self {
        RegioError::Other(s)
    }
}

impl From<&str> for RegioError {
    fn from(s: &str) -> Self {
        RegioError::Other(s.to_string())
    }
}

// JSON parsing errors
impl From<serde_json::Error> for RegioError {
    fn from(err: serde_json::Error) -> Self {
        RegioError::Parse(err.to_string())
    }
}
