//! External load generator (wrk) configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ConfigResult;
use crate::validation::{validate_positive, validate_required_string, Validatable};

/// Configuration for the external-process load engine
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WrkConfig {
    /// Program invoked for each measurement
    #[serde(default = "default_program")]
    pub program: String,

    /// Duration of each measurement in seconds; the invocation blocks for
    /// this long and is not cancellable mid-flight
    #[serde(default = "default_duration_secs")]
    pub duration_secs: u64,

    /// Open connections held by the tool (its concurrency figure)
    #[serde(default = "default_connections")]
    pub connections: u32,

    /// Worker threads for the tool
    #[serde(default = "default_threads")]
    pub threads: u32,

    /// Directory the request-templating scripts are written into
    #[serde(default = "default_scripts_dir")]
    pub scripts_dir: PathBuf,
}

impl Default for WrkConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            duration_secs: default_duration_secs(),
            connections: default_connections(),
            threads: default_threads(),
            scripts_dir: default_scripts_dir(),
        }
    }
}

impl Validatable for WrkConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_required_string(&self.program, "program", self.domain_name())?;
        validate_positive(self.duration_secs, "duration_secs", self.domain_name())?;
        validate_positive(self.connections, "connections", self.domain_name())?;
        validate_positive(self.threads, "threads", self.domain_name())?;
        if self.scripts_dir.as_os_str().is_empty() {
            return Err(self.validation_error("scripts_dir cannot be empty"));
        }
        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "wrk"
    }
}

fn default_program() -> String {
    "wrk".to_string()
}

fn default_duration_secs() -> u64 {
    60
}

fn default_connections() -> u32 {
    50
}

fn default_threads() -> u32 {
    2
}

fn default_scripts_dir() -> PathBuf {
    PathBuf::from("lua_scripts")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrk_config_defaults() {
        let config = WrkConfig::default();
        assert_eq!(config.program, "wrk");
        assert_eq!(config.duration_secs, 60);
        assert_eq!(config.connections, 50);
        assert_eq!(config.threads, 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_wrk_config_validation() {
        let mut config = WrkConfig::default();
        config.duration_secs = 0;
        assert!(config.validate().is_err());

        config = WrkConfig::default();
        config.program = String::new();
        assert!(config.validate().is_err());
    }
}
