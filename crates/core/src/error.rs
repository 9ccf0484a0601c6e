//! Error types for clipmark operations.
//!
//! The engine itself raises only two kinds of error: [`CaptureError::Extraction`]
//! when not even `<body>` holds usable content, and [`CaptureError::IllegalState`]
//! when the converter is misused. Every other irregularity degrades to a
//! best-effort result. The remaining variants belong to the host helpers
//! (fetching, file I/O).
//!
//! # Example
//!
//! ```rust
//! use clipmark_core::{CaptureError, Result};
//!
//! fn require_text(html: &str) -> Result<&str> {
//!     if html.trim().is_empty() {
//!         return Err(CaptureError::Extraction("No suitable content found".to_string()));
//!     }
//!     Ok(html)
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for capture operations.
///
/// # Example
///
/// ```rust
/// use clipmark_core::{CaptureError, capture};
///
/// match capture("<html><body></body></html>") {
///     Ok(result) => println!("{}", result.document()),
///     Err(CaptureError::Extraction(reason)) => println!("nothing to capture: {}", reason),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
#[derive(Error, Debug)]
pub enum CaptureError {
    /// No content could be located, even after falling back to `<body>`.
    ///
    /// Non-recoverable for the current capture; callers should report the
    /// failure and abort.
    #[error("Extraction failed: {0}")]
    Extraction(String),

    /// The converter was used before initialization or with malformed options.
    ///
    /// This is a programming error and is never retried.
    #[error("Illegal state: {0}")]
    IllegalState(String),

    /// HTTP request errors from reqwest.
    #[cfg(feature = "fetch")]
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Request timeout.
    #[error("Request timed out after {timeout} seconds")]
    Timeout { timeout: u64 },

    /// Invalid URL provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Invalid CSS selector passed to an explicit selection API.
    #[error("Failed to parse HTML: {0}")]
    HtmlParseError(String),

    /// File not found.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// File read/write errors.
    #[error("I/O error: {0}")]
    WriteError(#[from] std::io::Error),
}

impl CaptureError {
    /// Raised when not even `<body>` yields content.
    pub(crate) fn no_content() -> Self {
        CaptureError::Extraction("No suitable content found".to_string())
    }
}

/// Result type alias for CaptureError.
pub type Result<T> = std::result::Result<T, CaptureError>;
