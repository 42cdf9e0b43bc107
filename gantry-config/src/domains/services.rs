//! Managed services configuration

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

use crate::error::ConfigResult;
use crate::validation::{validate_required_string, validate_url, Validatable};

/// The services under test and how the harness brings them up and down
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServicesConfig {
    /// Compose file every lifecycle operation runs against
    #[serde(default = "default_compose_file")]
    pub compose_file: String,

    /// Compose service names, measured strictly in this order
    #[serde(default = "default_services")]
    pub services: Vec<String>,

    /// Framework display name → base URL. A service whose framework is
    /// absent here is skipped entirely.
    #[serde(default)]
    pub frameworks: HashMap<String, String>,

    /// Overall deadline for the readiness probe after starting a service
    #[serde(with = "super::utils::serde_duration", default = "default_readiness_timeout")]
    pub readiness_timeout: Duration,

    /// Delay between readiness probe attempts
    #[serde(with = "super::utils::serde_duration", default = "default_probe_interval")]
    pub probe_interval: Duration,

    /// Fallback settle delay when a service cannot be probed
    #[serde(with = "super::utils::serde_duration", default = "default_settle_delay")]
    pub settle_delay: Duration,

    /// Pause between tearing one service down and starting the next
    #[serde(with = "super::utils::serde_duration", default = "default_pause_between")]
    pub pause_between: Duration,
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            compose_file: default_compose_file(),
            services: default_services(),
            frameworks: HashMap::new(),
            readiness_timeout: default_readiness_timeout(),
            probe_interval: default_probe_interval(),
            settle_delay: default_settle_delay(),
            pause_between: default_pause_between(),
        }
    }
}

impl Validatable for ServicesConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_required_string(&self.compose_file, "compose_file", self.domain_name())?;
        if self.services.is_empty() {
            return Err(self.validation_error("services cannot be empty"));
        }
        for (framework, base_url) in &self.frameworks {
            validate_url(
                base_url,
                &format!("frameworks[{}]", framework),
                self.domain_name(),
            )?;
        }
        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "services"
    }
}

fn default_compose_file() -> String {
    "docker-compose.yml".to_string()
}

fn default_services() -> Vec<String> {
    ["flask", "django", "fastapi", "fastapi-sync", "express", "gin"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_readiness_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_probe_interval() -> Duration {
    Duration::from_secs(1)
}

fn default_settle_delay() -> Duration {
    Duration::from_secs(5)
}

fn default_pause_between() -> Duration {
    Duration::from_secs(2)
}
