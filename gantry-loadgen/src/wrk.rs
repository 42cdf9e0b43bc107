//! External-process load engine
//!
//! Wraps the `wrk` load generator: one blocking, fixed-duration child
//! process per measurement, with Lua request templates generated for the
//! mutating methods. Trades per-request visibility for a sustained
//! throughput figure uncontaminated by client-side bottlenecking.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info, warn};

use gantry_config::WrkConfig;
use gantry_core::{Method, RunResult, ServiceDescriptor, TestCase, WrkSummary};

use crate::engine::LoadEngine;
use crate::error::EngineResult;

/// Lua request template for a mutating method, or `None` when the method
/// needs no script. POST and PUT fix method, content type and body;
/// DELETE varies its target path per request.
fn lua_template(method: Method) -> Option<&'static str> {
    match method {
        Method::Post => Some(
            r#"wrk.method = "POST"
wrk.headers["Content-Type"] = "application/json"
wrk.body = '{"name":"Test Product","price":99.99,"stock":100, "description": "desc", "brand": "brand", "category": "cat", "currency": "USD", "ean": "123", "color": "red", "size": "M", "availability": "in-stock", "internal_id": "123"}'"#,
        ),
        Method::Put => Some(
            r#"wrk.method = "PUT"
wrk.headers["Content-Type"] = "application/json"
wrk.body = '{"name":"Updated Product"}'"#,
        ),
        Method::Delete => Some(
            r#"function request()
  local id = math.random(1, 10000)
  return wrk.format("DELETE", "/products/" .. id)
end"#,
        ),
        Method::Get => None,
    }
}

/// Parse the tool's textual summary.
///
/// Needs the `Requests/sec:` line and the thread-stats `Latency` row;
/// absence of either means the run produced nothing usable. Only the
/// first `Latency` row counts, so a trailing latency-distribution block
/// cannot clobber it.
pub fn parse_wrk_output(output: &str) -> Option<WrkSummary> {
    let mut requests_per_sec = None;
    let mut avg_latency_ms = None;

    for line in output.lines() {
        let trimmed = line.trim();
        if let Some(rest) = trimmed.strip_prefix("Requests/sec:") {
            requests_per_sec = rest.trim().parse::<f64>().ok();
        } else if trimmed.starts_with("Latency") && avg_latency_ms.is_none() {
            avg_latency_ms = trimmed.split_whitespace().nth(1).and_then(parse_latency_ms);
        }
    }

    Some(WrkSummary {
        requests_per_sec: requests_per_sec?,
        avg_latency_ms: avg_latency_ms?,
    })
}

/// Convert a unit-suffixed latency token ("4.25ms", "850.20us", "1.10s")
/// to milliseconds.
fn parse_latency_ms(token: &str) -> Option<f64> {
    let split = token.find(|c: char| c.is_ascii_alphabetic())?;
    let (value, unit) = token.split_at(split);
    let value: f64 = value.parse().ok()?;
    match unit {
        "us" => Some(value / 1000.0),
        "ms" => Some(value),
        "s" => Some(value * 1000.0),
        _ => None,
    }
}

/// Engine backed by the external `wrk` process
pub struct WrkEngine {
    config: WrkConfig,
}

impl WrkEngine {
    pub fn new(config: WrkConfig) -> Self {
        Self { config }
    }

    /// Render the script for one (method, framework) pair into the shared
    /// scripts directory, overwriting last run's file.
    async fn write_script(
        &self,
        method: Method,
        framework: &str,
        template: &str,
    ) -> EngineResult<PathBuf> {
        tokio::fs::create_dir_all(&self.config.scripts_dir).await?;
        let name = format!("{}_{}.lua", method.as_str().to_lowercase(), framework);
        let path = self.config.scripts_dir.join(name);
        tokio::fs::write(&path, template).await?;
        debug!("Wrote request template {}", path.display());
        Ok(path)
    }

    /// Run the tool against the target URL. Blocks for the configured
    /// duration; there is no mid-run cancellation.
    async fn run_wrk(&self, url: &str, script: Option<&Path>) -> EngineResult<String> {
        let mut command = Command::new(&self.config.program);
        command
            .arg("-d")
            .arg(format!("{}s", self.config.duration_secs))
            .arg("-c")
            .arg(self.config.connections.to_string())
            .arg("-t")
            .arg(self.config.threads.to_string());
        if let Some(script) = script {
            command.arg("-s").arg(script);
        }
        command.arg(url);

        info!(
            "Running {} against {} for {}s",
            self.config.program, url, self.config.duration_secs
        );
        let output = command.output().await?;
        if !output.status.success() {
            warn!(
                "{} exited with {}: {}",
                self.config.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn to_result(
        &self,
        service: &ServiceDescriptor,
        case: &TestCase,
        summary: &WrkSummary,
    ) -> RunResult {
        RunResult {
            framework: service.framework.clone(),
            endpoint: case.path_template.to_string(),
            method: case.method.as_str().to_string(),
            test_type: case.name.to_string(),
            concurrency: self.config.connections as usize,
            total_requests: summary.total_requests(self.config.duration_secs),
            avg_latency_ms: summary.avg_latency_ms,
            p95_latency_ms: None,
            p99_latency_ms: None,
            throughput_rps: summary.requests_per_sec,
            success_rate_percent: None,
            error_count: None,
        }
    }
}

#[async_trait]
impl LoadEngine for WrkEngine {
    async fn measure(
        &self,
        service: &ServiceDescriptor,
        case: &TestCase,
    ) -> EngineResult<Option<RunResult>> {
        let Some(base_url) = service.base_url.as_deref() else {
            return Ok(None);
        };
        let base_url = base_url.trim_end_matches('/');

        let script = match lua_template(case.method) {
            Some(template) => Some(
                self.write_script(case.method, &service.framework, template)
                    .await?,
            ),
            None => None,
        };

        // DELETE varies its path inside the script, so the tool is pointed
        // at the bare base URL. Other templated paths pin id 1, which the
        // seeder guarantees exists.
        let url = if case.method == Method::Delete {
            base_url.to_string()
        } else {
            let path = service.normalize_path(&case.path_template.replace("{id}", "1"));
            format!("{}{}", base_url, path)
        };

        let output = self.run_wrk(&url, script.as_deref()).await?;
        match parse_wrk_output(&output) {
            Some(summary) => Ok(Some(self.to_result(service, case, &summary))),
            None => {
                warn!(
                    "Unusable {} output for {} / {}",
                    self.config.program, service.framework, case.name
                );
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gantry_core::{PayloadStrategy, TestPhase};

    const SAMPLE_OUTPUT: &str = "\
Running 60s test @ http://localhost:8000/products
  2 threads and 50 connections
  Thread Stats   Avg      Stdev     Max   +/- Stdev
    Latency     4.25ms    1.10ms  35.60ms   72.10%
    Req/Sec     5.89k     0.91k    8.04k    68.12%
  703412 requests in 60.00s, 120.50MB read
Requests/sec:  11723.53
Transfer/sec:      2.01MB
";

    #[test]
    fn test_parse_full_output() {
        let summary = parse_wrk_output(SAMPLE_OUTPUT).unwrap();
        assert_eq!(summary.requests_per_sec, 11723.53);
        assert_eq!(summary.avg_latency_ms, 4.25);
    }

    #[test]
    fn test_parse_latency_units() {
        assert!((parse_latency_ms("850.20us").unwrap() - 0.8502).abs() < 1e-9);
        assert_eq!(parse_latency_ms("4.25ms"), Some(4.25));
        assert!((parse_latency_ms("1.10s").unwrap() - 1100.0).abs() < 1e-9);
        assert_eq!(parse_latency_ms("12h"), None);
        assert_eq!(parse_latency_ms("4.25"), None);
    }

    #[test]
    fn test_missing_requests_per_sec_is_no_result() {
        let output = "    Latency     4.25ms    1.10ms  35.60ms   72.10%\n";
        assert!(parse_wrk_output(output).is_none());
    }

    #[test]
    fn test_missing_latency_is_no_result() {
        let output = "Requests/sec:  11723.53\n";
        assert!(parse_wrk_output(output).is_none());
    }

    #[test]
    fn test_empty_output_is_no_result() {
        assert!(parse_wrk_output("").is_none());
    }

    #[test]
    fn test_latency_distribution_does_not_clobber_thread_stats() {
        let output = format!(
            "{}  Latency Distribution\n     50%    3.98ms\n     99%   12.10ms\n",
            SAMPLE_OUTPUT
        );
        let summary = parse_wrk_output(&output).unwrap();
        assert_eq!(summary.avg_latency_ms, 4.25);
    }

    #[test]
    fn test_templates_exist_exactly_for_mutating_methods() {
        assert!(lua_template(Method::Get).is_none());

        let post = lua_template(Method::Post).unwrap();
        assert!(post.contains(r#"wrk.method = "POST""#));
        assert!(post.contains("Content-Type"));
        assert!(post.contains("internal_id"));

        let put = lua_template(Method::Put).unwrap();
        assert!(put.contains(r#"wrk.method = "PUT""#));
        assert!(put.contains("Updated Product"));

        let delete = lua_template(Method::Delete).unwrap();
        assert!(delete.contains("math.random(1, 10000)"));
        assert!(delete.contains(r#"wrk.format("DELETE""#));
    }

    #[tokio::test]
    async fn test_script_written_per_method_and_framework() {
        let dir = tempfile::tempdir().unwrap();
        let config = WrkConfig {
            scripts_dir: dir.path().to_path_buf(),
            ..WrkConfig::default()
        };
        let engine = WrkEngine::new(config);

        let path = engine
            .write_script(Method::Delete, "Gin", lua_template(Method::Delete).unwrap())
            .await
            .unwrap();
        assert_eq!(path, dir.path().join("delete_Gin.lua"));

        let contents = tokio::fs::read_to_string(&path).await.unwrap();
        assert!(contents.contains("math.random"));

        // Overwritten on the next run, not appended
        engine
            .write_script(Method::Delete, "Gin", "-- replaced")
            .await
            .unwrap();
        let contents = tokio::fs::read_to_string(&path).await.unwrap();
        assert_eq!(contents, "-- replaced");
    }

    #[test]
    fn test_wrk_rows_leave_unreported_fields_empty() {
        let engine = WrkEngine::new(WrkConfig::default());
        let service = ServiceDescriptor {
            service: "gin".to_string(),
            framework: "Gin".to_string(),
            base_url: Some("http://gin:8080".to_string()),
            trailing_slash: false,
        };
        let case = TestCase {
            name: "PlainText",
            method: Method::Get,
            path_template: "/plain-text",
            payload: PayloadStrategy::None,
            phase: TestPhase::Stateless,
        };
        let summary = WrkSummary {
            requests_per_sec: 1000.0,
            avg_latency_ms: 3.5,
        };

        let result = engine.to_result(&service, &case, &summary);
        assert_eq!(result.total_requests, 60_000);
        assert_eq!(result.concurrency, 50);
        assert_eq!(result.throughput_rps, 1000.0);
        assert_eq!(result.p95_latency_ms, None);
        assert_eq!(result.p99_latency_ms, None);
        assert_eq!(result.success_rate_percent, None);
        assert_eq!(result.error_count, None);
    }
}
