//! Docker compose lifecycle management

use async_trait::async_trait;
use std::process::Output;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, info, warn};

use gantry_config::ServicesConfig;
use gantry_core::ServiceDescriptor;

use crate::error::LifecycleError;
use crate::probe::ReadinessProbe;

/// Lifecycle operations for services under test.
///
/// Implementations must keep services strictly sequential: never two
/// services active at the same time, so resource contention cannot skew
/// the comparison.
#[async_trait]
pub trait ServiceLifecycle: Send + Sync {
    /// Idempotent, best-effort teardown of every managed service
    async fn stop_all(&self);

    /// Bring up one service, then block until it is observably ready.
    /// Returns an error instead of panicking when readiness never arrives;
    /// the caller skips the service.
    async fn start(&self, service: &ServiceDescriptor) -> Result<(), LifecycleError>;

    /// Stop and delete resources for one service, idempotent
    async fn stop_and_remove(&self, service: &ServiceDescriptor);
}

/// `docker compose` backed lifecycle manager
pub struct ComposeLifecycle {
    compose_file: String,
    probe: ReadinessProbe,
    settle_delay: Duration,
}

impl ComposeLifecycle {
    pub fn new(config: &ServicesConfig) -> Result<Self, LifecycleError> {
        let probe = ReadinessProbe::new(config.readiness_timeout, config.probe_interval)?;
        Ok(Self {
            compose_file: config.compose_file.clone(),
            probe,
            settle_delay: config.settle_delay,
        })
    }

    async fn run_compose(&self, tail: &[&str]) -> Result<Output, LifecycleError> {
        let args = compose_args(&self.compose_file, tail);
        debug!("Running docker {}", args.join(" "));
        let output = Command::new("docker").args(&args).output().await?;
        Ok(output)
    }

    /// Run a teardown subcommand, logging instead of failing: teardown is
    /// best-effort and must be idempotent.
    async fn run_teardown(&self, operation: &str, tail: &[&str]) {
        match self.run_compose(tail).await {
            Ok(output) if output.status.success() => {}
            Ok(output) => warn!(
                "docker compose {} exited with {}: {}",
                operation,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ),
            Err(error) => warn!("docker compose {} failed: {}", operation, error),
        }
    }
}

#[async_trait]
impl ServiceLifecycle for ComposeLifecycle {
    async fn stop_all(&self) {
        info!("Stopping all managed containers");
        self.run_teardown("down", &["down", "--remove-orphans"]).await;
    }

    async fn start(&self, service: &ServiceDescriptor) -> Result<(), LifecycleError> {
        info!("Starting {} container", service.service);
        let output = self.run_compose(&["up", "-d", &service.service]).await?;
        if !output.status.success() {
            return Err(LifecycleError::CommandFailed {
                operation: format!("up {}", service.service),
                status: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        match service.base_url.as_deref() {
            Some(base_url) => self.probe.wait_ready(&service.service, base_url).await,
            None => {
                // Nothing to probe; give the container a fixed settle window.
                debug!(
                    "No base URL for {}; settling for {}s",
                    service.service,
                    self.settle_delay.as_secs()
                );
                tokio::time::sleep(self.settle_delay).await;
                Ok(())
            }
        }
    }

    async fn stop_and_remove(&self, service: &ServiceDescriptor) {
        info!("Stopping and removing {} container", service.service);
        self.run_teardown("stop", &["stop", &service.service]).await;
        self.run_teardown("rm", &["rm", "-f", &service.service]).await;
    }
}

fn compose_args(compose_file: &str, tail: &[&str]) -> Vec<String> {
    let mut args = vec![
        "compose".to_string(),
        "-f".to_string(),
        compose_file.to_string(),
    ];
    args.extend(tail.iter().map(|s| s.to_string()));
    args
}
