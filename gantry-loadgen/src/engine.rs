//! The load engine seam

use async_trait::async_trait;

use gantry_core::{RunResult, ServiceDescriptor, TestCase};

use crate::error::EngineResult;

/// One measurement of a (service, test case) pair.
///
/// `Ok(None)` means the measurement produced nothing usable — every
/// request failed, or the external tool's output was empty or malformed.
/// The controller logs it and moves on; it is not an error.
#[async_trait]
pub trait LoadEngine: Send + Sync {
    async fn measure(
        &self,
        service: &ServiceDescriptor,
        case: &TestCase,
    ) -> EngineResult<Option<RunResult>>;
}
