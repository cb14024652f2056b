//! Error types for Serapis operations.
//!
//! This module defines the main error type [`SerapisError`]. Errors stay
//! inside the pipeline: the [`Extractor`](crate::Extractor) boundary logs them
//! and reports "no record" instead of handing them to the caller.
//!
//! # Example
//!
//! ```rust
//! use serapis_core::{SerapisError, Result};
//!
//! fn require_term(term: &str) -> Result<&str> {
//!     if term.trim().is_empty() {
//!         return Err(SerapisError::ConfigError("term must not be blank".to_string()));
//!     }
//!     Ok(term)
//! }
//! # assert!(require_term("").is_err());
//! ```

use thiserror::Error;

use crate::extractors::ApiStage;

/// Main error type for fetching, conversion, and article API operations.
#[derive(Error, Debug)]
pub enum SerapisError {
    /// HTTP request errors from reqwest.
    ///
    /// Wraps connection failures, DNS errors, and bodies that cannot be
    /// decoded as text.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Request timeout.
    #[error("Request timed out after {timeout} seconds")]
    Timeout { timeout: u64 },

    /// Invalid URL provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The server answered with a client or server error status.
    #[error("HTTP status {status} for {url}")]
    HttpStatus { status: u16, url: String },

    /// The primary HTML to text converter failed.
    ///
    /// Recovered locally by the DOM fallback; only surfaces if both fail.
    #[error("HTML conversion failed: {0}")]
    ConversionError(String),

    /// The article API call failed or broke its response contract.
    #[error("Article API failed at {stage} stage: {reason}")]
    ArticleApi { stage: ApiStage, reason: String },

    /// A credential required by a backend is not configured.
    #[error("Missing credential: {0}")]
    MissingCredential(&'static str),

    /// Configuration file or value errors.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// File and stdin I/O errors.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Record serialization errors.
    #[error("Failed to serialize record: {0}")]
    SerializeError(#[from] serde_json::Error),
}

/// Result type alias for SerapisError.
pub type Result<T> = std::result::Result<T, SerapisError>;
