//! Error types for peerwire-sdp-core
//!
//! Parsing, writing and transforming SDP never fail. Errors only arise at
//! the edges: decoding a JSON document, reading a description type, or
//! validating a transform configuration.

use thiserror::Error;

/// Result type for fallible peerwire-sdp-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur at the library's boundaries
#[derive(Error, Debug)]
pub enum Error {
    /// JSON encoding or decoding of a document failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Unknown session description type
    #[error("Invalid SDP type: {0}")]
    InvalidSdpType(String),

    /// Transform configuration is inconsistent
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
