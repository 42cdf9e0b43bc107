//! Configuration loading and environment variable handling

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use crate::domains::GantryConfig;
use crate::error::{ConfigError, ConfigResult};

/// Configuration loader with environment variable support
pub struct ConfigLoader {
    /// Environment variable prefix
    prefix: String,
}

impl ConfigLoader {
    /// Create a new config loader with the default prefix
    pub fn new() -> Self {
        Self {
            prefix: "GANTRY".to_string(),
        }
    }

    /// Create a new config loader with a custom prefix
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Load configuration from a YAML file with environment overrides
    pub fn from_file(&self, path: impl AsRef<Path>) -> ConfigResult<GantryConfig> {
        let content = std::fs::read_to_string(path)?;
        let mut config: GantryConfig = serde_yaml::from_str(&content)?;

        self.apply_env_overrides(&mut config)?;
        config.validate_all()?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env(&self) -> ConfigResult<GantryConfig> {
        let mut config = GantryConfig::default();
        self.apply_env_overrides(&mut config)?;
        config.validate_all()?;
        Ok(config)
    }

    /// Load configuration with fallback chain
    pub fn load(&self, config_path: Option<impl AsRef<Path>>) -> ConfigResult<GantryConfig> {
        match config_path {
            Some(path) => self.from_file(path),
            None => self.from_env(),
        }
    }

    /// Apply environment variable overrides to configuration
    fn apply_env_overrides(&self, config: &mut GantryConfig) -> ConfigResult<()> {
        self.apply_load_overrides(&mut config.load)?;
        self.apply_wrk_overrides(&mut config.wrk)?;
        self.apply_database_overrides(&mut config.database)?;
        self.apply_services_overrides(&mut config.services)?;
        self.apply_output_overrides(&mut config.output)?;
        Ok(())
    }

    /// Apply load engine overrides
    fn apply_load_overrides(
        &self,
        config: &mut crate::domains::load::LoadConfig,
    ) -> ConfigResult<()> {
        if let Ok(engine) = self.get_env_var("ENGINE") {
            config.engine = engine.parse()?;
        }

        if let Ok(concurrency) = self.get_env_var("CONCURRENCY") {
            config.concurrency = concurrency
                .parse()
                .map_err(|e| ConfigError::EnvError(format!("Invalid CONCURRENCY: {}", e)))?;
        }

        if let Ok(total) = self.get_env_var("TOTAL_REQUESTS") {
            config.total_requests = total
                .parse()
                .map_err(|e| ConfigError::EnvError(format!("Invalid TOTAL_REQUESTS: {}", e)))?;
        }

        if let Ok(timeout) = self.get_env_var("REQUEST_TIMEOUT") {
            let seconds: u64 = timeout
                .parse()
                .map_err(|e| ConfigError::EnvError(format!("Invalid REQUEST_TIMEOUT: {}", e)))?;
            config.request_timeout = Duration::from_secs(seconds);
        }

        Ok(())
    }

    /// Apply external engine overrides
    fn apply_wrk_overrides(&self, config: &mut crate::domains::wrk::WrkConfig) -> ConfigResult<()> {
        if let Ok(program) = self.get_env_var("WRK_PROGRAM") {
            config.program = program;
        }

        if let Ok(duration) = self.get_env_var("DURATION_SECONDS") {
            config.duration_secs = duration
                .parse()
                .map_err(|e| ConfigError::EnvError(format!("Invalid DURATION_SECONDS: {}", e)))?;
        }

        if let Ok(connections) = self.get_env_var("CONNECTIONS") {
            config.connections = connections
                .parse()
                .map_err(|e| ConfigError::EnvError(format!("Invalid CONNECTIONS: {}", e)))?;
        }

        if let Ok(threads) = self.get_env_var("THREADS") {
            config.threads = threads
                .parse()
                .map_err(|e| ConfigError::EnvError(format!("Invalid THREADS: {}", e)))?;
        }

        if let Ok(dir) = self.get_env_var("SCRIPTS_DIR") {
            config.scripts_dir = dir.into();
        }

        Ok(())
    }

    /// Apply backing store overrides
    fn apply_database_overrides(
        &self,
        config: &mut crate::domains::database::DatabaseConfig,
    ) -> ConfigResult<()> {
        if let Ok(host) = self.get_env_var("POSTGRES_HOST") {
            config.host = host;
        }

        if let Ok(port) = self.get_env_var("POSTGRES_PORT") {
            config.port = port
                .parse()
                .map_err(|e| ConfigError::EnvError(format!("Invalid POSTGRES_PORT: {}", e)))?;
        }

        if let Ok(user) = self.get_env_var("POSTGRES_USER") {
            config.user = user;
        }

        if let Ok(password) = self.get_env_var("POSTGRES_PASSWORD") {
            config.password = password;
        }

        if let Ok(database) = self.get_env_var("POSTGRES_DB") {
            config.database = database;
        }

        Ok(())
    }

    /// Apply managed services overrides
    fn apply_services_overrides(
        &self,
        config: &mut crate::domains::services::ServicesConfig,
    ) -> ConfigResult<()> {
        if let Ok(frameworks_json) = self.get_env_var("FRAMEWORKS_JSON") {
            config.frameworks = serde_json::from_str::<HashMap<String, String>>(&frameworks_json)?;
        }

        if let Ok(compose_file) = self.get_env_var("COMPOSE_FILE") {
            config.compose_file = compose_file;
        }

        if let Ok(services) = self.get_env_var("SERVICES") {
            config.services = services
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        if let Ok(timeout) = self.get_env_var("READINESS_TIMEOUT") {
            let seconds: u64 = timeout
                .parse()
                .map_err(|e| ConfigError::EnvError(format!("Invalid READINESS_TIMEOUT: {}", e)))?;
            config.readiness_timeout = Duration::from_secs(seconds);
        }

        if let Ok(delay) = self.get_env_var("SETTLE_DELAY") {
            let seconds: u64 = delay
                .parse()
                .map_err(|e| ConfigError::EnvError(format!("Invalid SETTLE_DELAY: {}", e)))?;
            config.settle_delay = Duration::from_secs(seconds);
        }

        if let Ok(pause) = self.get_env_var("PAUSE_BETWEEN") {
            let seconds: u64 = pause
                .parse()
                .map_err(|e| ConfigError::EnvError(format!("Invalid PAUSE_BETWEEN: {}", e)))?;
            config.pause_between = Duration::from_secs(seconds);
        }

        Ok(())
    }

    /// Apply output overrides
    fn apply_output_overrides(
        &self,
        config: &mut crate::domains::output::OutputConfig,
    ) -> ConfigResult<()> {
        if let Ok(path) = self.get_env_var("OUTPUT_PATH") {
            config.path = path.into();
        }

        Ok(())
    }

    /// Get environment variable with prefix
    fn get_env_var(&self, name: &str) -> Result<String, std::env::VarError> {
        std::env::var(format!("{}_{}", self.prefix, name))
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::EngineKind;
    use std::io::Write;

    #[test]
    fn test_from_env_with_defaults() {
        let config = ConfigLoader::new().from_env().unwrap();
        assert_eq!(config.load.concurrency, 100);
        assert_eq!(config.load.total_requests, 500);
        assert!(config.services.frameworks.is_empty());
    }

    #[test]
    fn test_env_overrides() {
        temp_env::with_vars(
            [
                ("GANTRY_CONCURRENCY", Some("25")),
                ("GANTRY_TOTAL_REQUESTS", Some("1000")),
                ("GANTRY_ENGINE", Some("wrk")),
                (
                    "GANTRY_FRAMEWORKS_JSON",
                    Some(r#"{"Fastapi": "http://fastapi:8000"}"#),
                ),
                ("GANTRY_POSTGRES_HOST", Some("db")),
                ("GANTRY_SERVICES", Some("fastapi, gin")),
            ],
            || {
                let config = ConfigLoader::new().from_env().unwrap();
                assert_eq!(config.load.concurrency, 25);
                assert_eq!(config.load.total_requests, 1000);
                assert_eq!(config.load.engine, EngineKind::Wrk);
                assert_eq!(
                    config.services.frameworks.get("Fastapi").map(String::as_str),
                    Some("http://fastapi:8000")
                );
                assert_eq!(config.database.host, "db");
                assert_eq!(config.services.services, vec!["fastapi", "gin"]);
            },
        );
    }

    #[test]
    fn test_invalid_env_value_is_rejected() {
        temp_env::with_vars([("GANTRY_CONCURRENCY", Some("lots"))], || {
            assert!(matches!(
                ConfigLoader::new().from_env(),
                Err(ConfigError::EnvError(_))
            ));
        });
    }

    #[test]
    fn test_invalid_frameworks_json_is_rejected() {
        temp_env::with_vars([("GANTRY_FRAMEWORKS_JSON", Some("{not json"))], || {
            assert!(matches!(
                ConfigLoader::new().from_env(),
                Err(ConfigError::JsonError(_))
            ));
        });
    }

    #[test]
    fn test_from_file_with_env_override() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "load:\n  concurrency: 10\n  total_requests: 50\nwrk:\n  duration_secs: 15\n"
        )
        .unwrap();
        file.flush().unwrap();

        temp_env::with_vars([("GANTRY_CONCURRENCY", Some("77"))], || {
            let config = ConfigLoader::new().from_file(file.path()).unwrap();
            // Environment wins over the file layer
            assert_eq!(config.load.concurrency, 77);
            assert_eq!(config.load.total_requests, 50);
            assert_eq!(config.wrk.duration_secs, 15);
        });
    }

    #[test]
    fn test_custom_prefix() {
        temp_env::with_vars([("BENCH_CONCURRENCY", Some("3"))], || {
            let config = ConfigLoader::with_prefix("BENCH").from_env().unwrap();
            assert_eq!(config.load.concurrency, 3);
        });
    }
}
