//! Error types for reader-mode operations.
//!
//! This module defines the main error type [`ReaderError`]. Most of the
//! library is infallible: the locator signals "nothing found"
//! with `None`, and settings/draft persistence log their failures instead of
//! returning them. The variants here cover input handling (patterns,
//! selectors, page loading) and store access.
//!
//! # Example
//!
//! ```rust
//! use readmode_core::{ContentPattern, ReaderError};
//!
//! match "[[broken".parse::<ContentPattern>() {
//!     Ok(_) => unreachable!(),
//!     Err(ReaderError::InvalidPattern(p)) => println!("bad pattern: {p}"),
//!     Err(e) => println!("Error: {e}"),
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for reader-mode operations.
#[derive(Error, Debug)]
pub enum ReaderError {
    /// HTTP request errors from reqwest.
    #[cfg(feature = "fetch")]
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Request timeout.
    ///
    /// Returned when an HTTP request exceeds the configured timeout duration.
    #[error("Request timed out after {timeout} seconds")]
    Timeout { timeout: u64 },

    /// Invalid URL provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// HTML parsing errors, usually an invalid CSS selector.
    #[error("Failed to parse HTML: {0}")]
    HtmlParseError(String),

    /// A content pattern outside the supported selector grammar.
    #[error("Invalid content pattern: {0}")]
    InvalidPattern(String),

    /// No element in the page qualified as main content.
    #[error("No readable content found")]
    NoContent,

    /// File not found.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// File read/write errors.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Settings or store payloads that could not be (de)serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Key-value store failures that are not plain I/O.
    #[error("Store error: {0}")]
    StoreError(String),
}

/// Result type alias for ReaderError.
pub type Result<T> = std::result::Result<T, ReaderError>;
