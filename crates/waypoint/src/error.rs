//! Error types for Waypoint operations.
//!
//! This module provides the main error type [`WaypointError`] which wraps
//! the error conditions that can occur while importing and exporting flow
//! graph documents. Layout itself never fails.

use std::io;

use thiserror::Error;

/// The main error type for Waypoint operations.
///
/// # Diagnostic Variants
///
/// The `Parse` variant keeps the document source next to the JSON error so
/// that callers can point at the offending line and column.
#[derive(Debug, Error)]
pub enum WaypointError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid flow graph document: {err}")]
    Parse { err: serde_json::Error, src: String },

    #[error("Graph error: {0}")]
    Graph(String),

    #[error("Export error: {0}")]
    Export(#[source] serde_json::Error),
}

impl WaypointError {
    /// Create a new `Parse` error with the associated document source.
    pub fn new_parse_error(err: serde_json::Error, src: impl Into<String>) -> Self {
        Self::Parse {
            err,
            src: src.into(),
        }
    }
}
