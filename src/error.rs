//! Error types for merkle_views

use thiserror::Error;

/// Result type alias for merkle_views operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading, rewriting or decoding trees and views
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Out of range: {0}")]
    OutOfRange(String),

    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    #[error("Cannot change the backing of a basic view: {0}")]
    ImmutableViolation(String),

    #[error("Scope {scope} is not sufficient for expected byte length {required}")]
    InsufficientScope { scope: usize, required: usize },

    #[error("Not applicable: {0}")]
    NotApplicable(String),

    #[error("Unexpected end of stream: requested {requested} bytes, {available} available")]
    UnexpectedEof { requested: usize, available: usize },

    #[error("Invalid type: {0}")]
    InvalidType(String),

    #[error("Config error: {0}")]
    Config(String),
}
