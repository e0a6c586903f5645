//! Error types for the graph engine.
//!
//! Extraction-level failures (unreadable fields) are absorbed into a warning
//! count and never surface here; only resolution failures become errors.

use thiserror::Error;

/// Errors returned by graph operations.
#[derive(Debug, Error)]
pub enum GraphError {
    /// The named entity id is not present in the snapshot.
    #[error("entity not found: {0}")]
    NotFound(String),

    /// A scope descriptor does not resolve against the snapshot.
    #[error("invalid scope: {0}")]
    InvalidScope(String),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, GraphError>;
