//! # Gantry Configuration
//!
//! Domain-scoped configuration for the benchmark harness. Each domain is a
//! serde struct with field-level defaults; a [`ConfigLoader`] layers an
//! optional YAML file underneath `GANTRY_*` environment variable overrides
//! (environment wins), then validates every domain before the harness
//! starts.

pub mod domains;
pub mod error;
pub mod loader;
pub mod validation;

pub use domains::{
    DatabaseConfig, EngineKind, GantryConfig, LoadConfig, OutputConfig, ServicesConfig, WrkConfig,
};
pub use error::{ConfigError, ConfigResult};
pub use loader::ConfigLoader;
pub use validation::Validatable;
