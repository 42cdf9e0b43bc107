//! # Gantry Core
//!
//! Domain types and pure computation for the Gantry benchmark harness:
//! the product corpus, the benchmark test-case suite, per-request samples,
//! metrics aggregation and the flat results table.
//!
//! Everything in this crate is side-effect free apart from corpus/report
//! file I/O; the moving parts (service lifecycle, seeding, load engines)
//! live in the sibling crates and consume these types.

pub mod corpus;
pub mod error;
pub mod metrics;
pub mod product;
pub mod report;
pub mod sample;
pub mod service;
pub mod testcase;

pub use corpus::load_corpus;
pub use error::{CoreError, CoreResult};
pub use metrics::{aggregate_samples, WrkSummary};
pub use product::ProductRecord;
pub use report::{write_results, RunResult};
pub use sample::RequestSample;
pub use service::ServiceDescriptor;
pub use testcase::{Method, PayloadStrategy, TestCase, TestPhase};
