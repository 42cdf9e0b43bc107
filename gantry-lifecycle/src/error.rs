//! Lifecycle error types

use thiserror::Error;

/// Errors raised while managing services under test
#[derive(Error, Debug)]
pub enum LifecycleError {
    /// The compose binary could not be invoked
    #[error("Failed to invoke docker compose: {0}")]
    Io(#[from] std::io::Error),

    /// A compose subcommand exited with a failure status
    #[error("docker compose {operation} failed with status {status}: {stderr}")]
    CommandFailed {
        operation: String,
        status: i32,
        stderr: String,
    },

    /// The readiness probe client could not be constructed
    #[error("HTTP probe error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service never became healthy within the overall deadline
    #[error("Service {service} did not become ready within {timeout_secs}s")]
    ReadinessTimeout { service: String, timeout_secs: u64 },
}
