//! Configuration domains

pub mod database;
pub mod load;
pub mod output;
pub mod services;
pub mod utils;
pub mod wrk;

pub use database::DatabaseConfig;
pub use load::{EngineKind, LoadConfig};
pub use output::OutputConfig;
pub use services::ServicesConfig;
pub use wrk::WrkConfig;

use serde::{Deserialize, Serialize};

use crate::error::ConfigResult;
use crate::validation::Validatable;

/// Root configuration for one benchmark run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GantryConfig {
    pub load: LoadConfig,
    pub wrk: WrkConfig,
    pub database: DatabaseConfig,
    pub services: ServicesConfig,
    pub output: OutputConfig,
}

impl GantryConfig {
    /// Validate all domains
    pub fn validate_all(&self) -> ConfigResult<()> {
        self.load.validate()?;
        self.wrk.validate()?;
        self.database.validate()?;
        self.services.validate()?;
        self.output.validate()?;
        Ok(())
    }
}
