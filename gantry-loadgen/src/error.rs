//! Load engine error types

use thiserror::Error;

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

/// Engine-internal failures.
///
/// Deliberately narrow: a single request that fails or times out is a
/// recorded sample, and unparseable external-tool output is "no result" —
/// neither is an `EngineError`.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The HTTP client could not be constructed
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// A request payload could not be serialized
    #[error("Payload serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Script generation or external process invocation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
