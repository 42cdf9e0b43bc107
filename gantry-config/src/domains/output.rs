//! Results output configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ConfigResult;
use crate::validation::Validatable;

/// Where the flat results table is written
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Results file path; a `{timestamp}` token in the file name is
    /// replaced at write time
    #[serde(default = "default_path")]
    pub path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
        }
    }
}

impl Validatable for OutputConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.path.as_os_str().is_empty() {
            return Err(self.validation_error("path cannot be empty"));
        }
        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "output"
    }
}

fn default_path() -> PathBuf {
    PathBuf::from("results/benchmark_results.csv")
}
