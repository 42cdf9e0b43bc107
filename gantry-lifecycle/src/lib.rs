//! # Gantry Lifecycle
//!
//! Brings services under test up and down, strictly one at a time, via
//! `docker compose`, and gates each measurement on an HTTP readiness probe.
//! Teardown operations are idempotent and best-effort; only `start` can
//! fail, and the controller treats that failure as "skip this service".

pub mod compose;
pub mod error;
pub mod probe;

pub use compose::{ComposeLifecycle, ServiceLifecycle};
pub use error::LifecycleError;
pub use probe::ReadinessProbe;
