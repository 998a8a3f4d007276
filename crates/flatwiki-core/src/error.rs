//! Error types for Flatwiki core operations.
//!
//! Query operations report their domain conditions (store missing, page
//! missing, bad address) through [`crate::outcome::Outcome`] rather than
//! through this type. `FlatwikiError` covers everything else: configuration,
//! tool argument decoding, and callers that want `?` semantics on an outcome.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using FlatwikiError
pub type Result<T> = std::result::Result<T, FlatwikiError>;

/// Core error types for Flatwiki operations.
#[derive(Error, Debug)]
pub enum FlatwikiError {
    // === Store Errors ===
    /// The store root does not exist at query time
    #[error("wiki directory {} does not exist", root.display())]
    StoreUnavailable { root: PathBuf },

    /// A single page record could not be read
    #[error("error reading {}: {reason}", path.display())]
    RecordUnreadable { path: PathBuf, reason: String },

    /// No record matches the requested page name
    #[error("page '{name}' not found")]
    PageNotFound { name: String },

    /// A resource address is malformed
    #[error("invalid URI: {address}: {reason}")]
    InvalidAddress { address: String, reason: String },

    // === Tool Errors ===
    /// The requested tool is not in the catalogue
    #[error("unknown tool: {name}")]
    UnknownTool { name: String },

    /// Tool arguments did not match the tool's input schema
    #[error("invalid arguments for {tool}: {reason}")]
    InvalidArguments { tool: String, reason: String },

    // === Configuration Errors ===
    /// Configuration file parsing failed
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },

    // === I/O Errors ===
    /// Generic I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // === Serialization Errors ===
    /// Serialization/deserialization failed
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for FlatwikiError {
    fn from(err: serde_json::Error) -> Self {
        FlatwikiError::Serialization(err.to_string())
    }
}
