//! Trace error type
//!
//! Handlers never surface these to the page; they are logged by the emitter
//! or returned from host-facing entry points (scenario loading, replay).

use thiserror::Error;

/// Errors that can occur while capturing or delivering traces
#[derive(Error, Debug)]
pub enum TraceError {
    #[error("Transport closed: {0}")]
    TransportClosed(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Unknown event target: {0}")]
    UnknownTarget(String),

    #[error("Invalid scenario: {0}")]
    InvalidScenario(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type for trace operations
pub type TraceResult<T> = Result<T, TraceError>;
