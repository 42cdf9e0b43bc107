//! # Gantry Loadgen
//!
//! The two interchangeable load engines, behind one [`LoadEngine`] trait:
//!
//! - [`InProcessEngine`] dispatches a fixed number of requests with a
//!   bounded number in flight, timing each one individually.
//! - [`WrkEngine`] wraps the external `wrk` process for a fixed-duration,
//!   sustained-throughput measurement, generating the Lua request
//!   templates it needs and parsing its textual summary.
//!
//! Both produce the same [`gantry_core::RunResult`] row, or no result when
//! a measurement yields nothing usable. Per-request transport failures are
//! samples, not errors; they never abort a measurement.

pub mod engine;
pub mod error;
pub mod inprocess;
pub mod wrk;

pub use engine::LoadEngine;
pub use error::{EngineError, EngineResult};
pub use inprocess::InProcessEngine;
pub use wrk::WrkEngine;
