//! Per-request samples

/// Outcome of one dispatched request.
///
/// `Failed` records a transport error or timeout; it is excluded from
/// latency statistics and surfaces only through `error_count`. A completed
/// sample keeps its status code even when the service answered with an
/// error status — those requests still measured real server work.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RequestSample {
    Completed { duration_ms: f64, status: u16 },
    Failed,
}

impl RequestSample {
    /// Whether the request completed with a 2xx status
    pub fn is_success(self) -> bool {
        matches!(self, RequestSample::Completed { status, .. } if (200..300).contains(&status))
    }

    /// The recorded latency, if the request completed
    pub fn duration_ms(self) -> Option<f64> {
        match self {
            RequestSample::Completed { duration_ms, .. } => Some(duration_ms),
            RequestSample::Failed => None,
        }
    }
}
