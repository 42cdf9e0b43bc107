//! Sample aggregation and summary statistics

use crate::report::RunResult;
use crate::sample::RequestSample;
use crate::service::ServiceDescriptor;
use crate::testcase::TestCase;

/// Nearest-rank percentile: the k-th smallest element of `sorted` with
/// k = ceil(p/100 · n). No interpolation.
fn nearest_rank(sorted: &[f64], percentile: f64) -> f64 {
    debug_assert!(!sorted.is_empty());
    let n = sorted.len();
    let rank = ((percentile / 100.0) * n as f64).ceil() as usize;
    sorted[rank.clamp(1, n) - 1]
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Fold one measurement's samples into a result row.
///
/// Failed samples are excluded from the latency statistics but reflected in
/// `error_count` and the success rate, which are both computed against the
/// nominal `total_requests`. Throughput is completed-count divided by the
/// sum of individual latencies rather than the wall-clock span of the run;
/// this understates true concurrent throughput but is the harness's defined
/// methodology, kept so results stay comparable across runs.
///
/// Returns `None` when no request completed — there is no latency
/// distribution to summarize.
pub fn aggregate_samples(
    service: &ServiceDescriptor,
    case: &TestCase,
    concurrency: usize,
    total_requests: usize,
    samples: &[RequestSample],
) -> Option<RunResult> {
    let mut durations: Vec<f64> = samples.iter().filter_map(|s| s.duration_ms()).collect();
    if durations.is_empty() {
        return None;
    }
    durations.sort_by(|a, b| a.total_cmp(b));

    let completed = durations.len();
    let success_count = samples.iter().filter(|s| s.is_success()).count();
    let total_latency_ms: f64 = durations.iter().sum();

    Some(RunResult {
        framework: service.framework.clone(),
        endpoint: case.path_template.to_string(),
        method: case.method.as_str().to_string(),
        test_type: case.name.to_string(),
        concurrency,
        total_requests,
        avg_latency_ms: round2(total_latency_ms / completed as f64),
        p95_latency_ms: Some(round2(nearest_rank(&durations, 95.0))),
        p99_latency_ms: Some(round2(nearest_rank(&durations, 99.0))),
        throughput_rps: round2(1000.0 * completed as f64 / total_latency_ms),
        success_rate_percent: Some(round2(
            success_count as f64 / total_requests as f64 * 100.0,
        )),
        error_count: Some(total_requests - completed),
    })
}

/// Summary parsed from the external load generator's textual output.
///
/// The tool reports aggregate figures only; per-request percentiles are not
/// recoverable from it.
#[derive(Debug, Clone, PartialEq)]
pub struct WrkSummary {
    pub requests_per_sec: f64,
    pub avg_latency_ms: f64,
}

impl WrkSummary {
    /// Approximate request total for a fixed-duration run.
    pub fn total_requests(&self, duration_secs: u64) -> usize {
        (self.requests_per_sec * duration_secs as f64) as usize
    }
}
