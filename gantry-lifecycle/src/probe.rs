//! HTTP readiness probing

use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info};

use crate::error::LifecycleError;

/// Per-attempt request timeout; the overall deadline is configured
const PROBE_REQUEST_TIMEOUT: Duration = Duration::from_secs(1);

/// Path every service must answer on once it can serve traffic
const LIVENESS_PATH: &str = "/plain-text";

/// Polls a service's liveness path until it answers, bounded by an overall
/// deadline.
#[derive(Debug, Clone)]
pub struct ReadinessProbe {
    client: reqwest::Client,
    timeout: Duration,
    interval: Duration,
}

impl ReadinessProbe {
    pub fn new(timeout: Duration, interval: Duration) -> Result<Self, LifecycleError> {
        let client = reqwest::Client::builder()
            .timeout(PROBE_REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            timeout,
            interval,
        })
    }

    /// Block until the service answers its liveness path with a success
    /// status, or the overall deadline expires.
    pub async fn wait_ready(&self, service: &str, base_url: &str) -> Result<(), LifecycleError> {
        let probe_url = format!("{}{}", base_url.trim_end_matches('/'), LIVENESS_PATH);
        debug!("Waiting for {} at {}", service, probe_url);

        let deadline = Instant::now() + self.timeout;
        while Instant::now() < deadline {
            match self.client.get(&probe_url).send().await {
                Ok(response) if response.status().is_success() => {
                    info!("Service {} is ready", service);
                    return Ok(());
                }
                Ok(response) => {
                    debug!("Service {} not ready yet: {}", service, response.status())
                }
                Err(error) => debug!("Service {} not reachable yet: {}", service, error),
            }
            tokio::time::sleep(self.interval).await;
        }

        Err(LifecycleError::ReadinessTimeout {
            service: service.to_string(),
            timeout_secs: self.timeout.as_secs(),
        })
    }
}
