//! Run results and the flat results table

use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::CoreResult;

/// One normalized measurement: a single (framework, test case) cell of the
/// benchmark matrix.
///
/// Rows produced by the external engine carry `None` in the fields its
/// summary output does not report (percentiles, success rate, error count);
/// those serialize as empty cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    pub framework: String,
    pub endpoint: String,
    pub method: String,
    pub test_type: String,
    pub concurrency: usize,
    pub total_requests: usize,
    pub avg_latency_ms: f64,
    pub p95_latency_ms: Option<f64>,
    pub p99_latency_ms: Option<f64>,
    pub throughput_rps: f64,
    pub success_rate_percent: Option<f64>,
    pub error_count: Option<usize>,
}

/// Write the accumulated result rows as one CSV table, creating parent
/// directories as needed.
///
/// A `{timestamp}` token in the file name is replaced with the current UTC
/// time, so repeated runs can keep distinct result files. Returns the
/// resolved path.
pub fn write_results(path: impl AsRef<Path>, results: &[RunResult]) -> CoreResult<PathBuf> {
    let resolved = resolve_path(path.as_ref());

    if let Some(parent) = resolved.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut writer = csv::Writer::from_path(&resolved)?;
    for result in results {
        writer.serialize(result)?;
    }
    writer.flush()?;

    info!("Wrote {} result rows to {}", results.len(), resolved.display());
    Ok(resolved)
}

fn resolve_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    if raw.contains("{timestamp}") {
        let stamp = Utc::now().format("%Y%m%d-%H%M%S").to_string();
        PathBuf::from(raw.replace("{timestamp}", &stamp))
    } else {
        path.to_path_buf()
    }
}
