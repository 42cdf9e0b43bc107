//! Load generation configuration

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{ConfigError, ConfigResult};
use crate::validation::{validate_positive, Validatable};

/// Which load engine conducts the measurements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum EngineKind {
    /// In-process asynchronous client with a bounded admission gate
    #[default]
    InProcess,
    /// External fixed-duration load generator (wrk)
    Wrk,
}

impl EngineKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EngineKind::InProcess => "in-process",
            EngineKind::Wrk => "wrk",
        }
    }
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EngineKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "in-process" | "inprocess" => Ok(EngineKind::InProcess),
            "wrk" => Ok(EngineKind::Wrk),
            _ => Err(ConfigError::EnvError(format!(
                "Invalid engine '{}'. Valid choices: in-process, wrk",
                s
            ))),
        }
    }
}

/// Configuration for the in-process load engine
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadConfig {
    /// Which engine to use
    pub engine: EngineKind,

    /// Upper bound on concurrently in-flight requests
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Number of logical requests dispatched per test case
    #[serde(default = "default_total_requests")]
    pub total_requests: usize,

    /// Per-request timeout; expiry records a failed sample
    #[serde(with = "super::utils::serde_duration", default = "default_request_timeout")]
    pub request_timeout: Duration,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            engine: EngineKind::default(),
            concurrency: default_concurrency(),
            total_requests: default_total_requests(),
            request_timeout: default_request_timeout(),
        }
    }
}

impl Validatable for LoadConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_positive(self.concurrency, "concurrency", self.domain_name())?;
        validate_positive(self.total_requests, "total_requests", self.domain_name())?;
        validate_positive(
            self.request_timeout.as_secs(),
            "request_timeout",
            self.domain_name(),
        )?;
        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "load"
    }
}

fn default_concurrency() -> usize {
    100
}

fn default_total_requests() -> usize {
    500
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(10)
}
