//! In-process load engine
//!
//! Models client-side concurrent load: exactly `total_requests` logical
//! requests per measurement, with at most `concurrency` in flight at any
//! instant. Admission is a counting semaphore, not batching, so a new
//! request starts the moment any in-flight one completes.

use std::sync::Arc;

use async_trait::async_trait;
use rand::Rng;
use serde_json::json;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::debug;

use gantry_config::LoadConfig;
use gantry_core::{
    aggregate_samples, Method, PayloadStrategy, ProductRecord, RequestSample, RunResult,
    ServiceDescriptor, TestCase,
};

use crate::engine::LoadEngine;
use crate::error::EngineResult;

/// One prepared request: URL and body are fixed before dispatch so the
/// admission gate only governs the network call itself.
struct RequestSpec {
    url: String,
    payload: Option<serde_json::Value>,
}

/// Concurrency-bounded asynchronous client engine
pub struct InProcessEngine {
    client: reqwest::Client,
    corpus: Arc<[ProductRecord]>,
    concurrency: usize,
    total_requests: usize,
}

impl InProcessEngine {
    /// Build the engine and its shared HTTP client. The per-request
    /// timeout set here is the bounded-time failure path: expiry records a
    /// failed sample instead of propagating.
    pub fn new(config: &LoadConfig, corpus: Arc<[ProductRecord]>) -> EngineResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            client,
            corpus,
            concurrency: config.concurrency,
            total_requests: config.total_requests,
        })
    }

    /// Prepare exactly `total_requests` request specs, drawing ids and
    /// payloads up front.
    fn request_specs(
        &self,
        base_url: &str,
        service: &ServiceDescriptor,
        case: &TestCase,
    ) -> EngineResult<Vec<RequestSpec>> {
        let base = base_url.trim_end_matches('/');
        let mut rng = rand::rng();

        (0..self.total_requests)
            .map(|_| -> EngineResult<RequestSpec> {
                let path = if case.has_id_placeholder() {
                    // Seeded ids run 1..=corpus_size; draw uniformly
                    let id = rng.random_range(1..=self.corpus.len());
                    case.path_template.replace("{id}", &id.to_string())
                } else {
                    case.path_template.to_string()
                };
                let url = format!("{}{}", base, service.normalize_path(&path));
                let payload = self.build_payload(&case.payload, &mut rng)?;
                Ok(RequestSpec { url, payload })
            })
            .collect()
    }

    fn build_payload(
        &self,
        strategy: &PayloadStrategy,
        rng: &mut impl Rng,
    ) -> EngineResult<Option<serde_json::Value>> {
        let payload = match strategy {
            PayloadStrategy::None => None,
            PayloadStrategy::Static(value) => Some(value.clone()),
            PayloadStrategy::FromCorpus => {
                let record = &self.corpus[rng.random_range(0..self.corpus.len())];
                Some(serde_json::to_value(record)?)
            }
            PayloadStrategy::SyntheticMutation => Some(json!({
                "name": format!("Updated {}", rng.random_range(1..=10_000)),
            })),
        };
        Ok(payload)
    }
}

#[async_trait]
impl LoadEngine for InProcessEngine {
    async fn measure(
        &self,
        service: &ServiceDescriptor,
        case: &TestCase,
    ) -> EngineResult<Option<RunResult>> {
        let Some(base_url) = service.base_url.as_deref() else {
            return Ok(None);
        };

        let specs = self.request_specs(base_url, service, case)?;
        let gate = Arc::new(Semaphore::new(self.concurrency));
        let mut tasks = JoinSet::new();

        for spec in specs {
            let client = self.client.clone();
            let gate = gate.clone();
            let method = case.method;
            tasks.spawn(async move {
                let _permit = match gate.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => return RequestSample::Failed,
                };
                dispatch(&client, method, &spec).await
            });
        }

        // Full join before aggregation; nothing reads the samples while
        // requests are still in flight.
        let mut samples = Vec::with_capacity(self.total_requests);
        while let Some(joined) = tasks.join_next().await {
            samples.push(joined.unwrap_or(RequestSample::Failed));
        }

        debug!(
            "Collected {} samples for {} / {}",
            samples.len(),
            service.framework,
            case.name
        );
        Ok(aggregate_samples(
            service,
            case,
            self.concurrency,
            self.total_requests,
            &samples,
        ))
    }
}

/// Perform one call, converting every transport fault into a sample.
async fn dispatch(client: &reqwest::Client, method: Method, spec: &RequestSpec) -> RequestSample {
    let mut request = match method {
        Method::Get => client.get(&spec.url),
        Method::Post => client.post(&spec.url),
        Method::Put => client.put(&spec.url),
        Method::Delete => client.delete(&spec.url),
    };
    if let Some(body) = &spec.payload {
        request = request.json(body);
    }

    let started = Instant::now();
    match request.send().await {
        Ok(response) => RequestSample::Completed {
            duration_ms: started.elapsed().as_secs_f64() * 1000.0,
            status: response.status().as_u16(),
        },
        Err(_) => RequestSample::Failed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::net::SocketAddr;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use axum::extract::State;
    use axum::http::StatusCode;
    use axum::routing::{get, post, put};
    use axum::Router;
    use gantry_core::TestPhase;
    use wiremock::matchers::{method as wm_method, path_regex};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Tracks current and peak in-flight requests.
    #[derive(Default)]
    struct Gauge {
        current: AtomicUsize,
        peak: AtomicUsize,
    }

    impl Gauge {
        fn enter(&self) {
            let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
        }

        fn leave(&self) {
            self.current.fetch_sub(1, Ordering::SeqCst);
        }
    }

    async fn counting_handler(State(gauge): State<Arc<Gauge>>) -> &'static str {
        gauge.enter();
        tokio::time::sleep(Duration::from_millis(20)).await;
        gauge.leave();
        "ok"
    }

    /// Serve a router on an ephemeral port.
    async fn serve(app: Router) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }

    fn corpus(size: usize) -> Arc<[ProductRecord]> {
        (0..size)
            .map(|i| ProductRecord {
                name: format!("Product {}", i),
                description: "desc".to_string(),
                brand: "brand".to_string(),
                category: "cat".to_string(),
                price: 9.99,
                currency: "USD".to_string(),
                stock: 10,
                ean: "123".to_string(),
                color: "red".to_string(),
                size: "M".to_string(),
                availability: "in-stock".to_string(),
                internal_id: format!("P-{}", i),
            })
            .collect()
    }

    fn engine(concurrency: usize, total: usize, timeout: Duration) -> InProcessEngine {
        let config = LoadConfig {
            concurrency,
            total_requests: total,
            request_timeout: timeout,
            ..LoadConfig::default()
        };
        InProcessEngine::new(&config, corpus(25)).unwrap()
    }

    fn service(base_url: &str) -> ServiceDescriptor {
        ServiceDescriptor {
            service: "fastapi".to_string(),
            framework: "Fastapi".to_string(),
            base_url: Some(base_url.to_string()),
            trailing_slash: false,
        }
    }

    fn list_case() -> TestCase {
        TestCase {
            name: "List Products",
            method: Method::Get,
            path_template: "/products",
            payload: PayloadStrategy::None,
            phase: TestPhase::Seeded,
        }
    }

    #[tokio::test]
    async fn test_in_flight_never_exceeds_concurrency_bound() {
        let gauge = Arc::new(Gauge::default());
        let app = Router::new()
            .route("/products", get(counting_handler))
            .with_state(gauge.clone());
        let addr = serve(app).await;

        let engine = engine(5, 40, Duration::from_secs(5));
        let result = engine
            .measure(&service(&format!("http://{}", addr)), &list_case())
            .await
            .unwrap()
            .unwrap();

        assert!(gauge.peak.load(Ordering::SeqCst) <= 5);
        assert_eq!(result.total_requests, 40);
        assert_eq!(result.error_count, Some(0));
        assert_eq!(result.success_rate_percent, Some(100.0));
    }

    #[tokio::test]
    async fn test_always_500_service_completes_every_sample() {
        async fn failing() -> StatusCode {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        let app = Router::new().route("/products", get(failing));
        let addr = serve(app).await;

        let engine = engine(2, 10, Duration::from_secs(5));
        let result = engine
            .measure(&service(&format!("http://{}", addr)), &list_case())
            .await
            .unwrap()
            .unwrap();

        // Server errors are completed samples: they measured real work.
        assert_eq!(result.error_count, Some(0));
        assert_eq!(result.success_rate_percent, Some(0.0));
        assert_eq!(result.total_requests, 10);
    }

    #[tokio::test]
    async fn test_timeouts_become_failed_samples_and_no_result() {
        let server = MockServer::start().await;
        Mock::given(wm_method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
            .mount(&server)
            .await;

        let engine = engine(4, 8, Duration::from_millis(100));
        let result = engine.measure(&service(&server.uri()), &list_case()).await;

        // Every request timed out: no completed samples, so no result —
        // and no error either.
        assert!(matches!(result, Ok(None)));
    }

    #[tokio::test]
    async fn test_unreachable_service_yields_no_result() {
        let engine = engine(2, 6, Duration::from_millis(200));
        let result = engine
            .measure(&service("http://127.0.0.1:1"), &list_case())
            .await;
        assert!(matches!(result, Ok(None)));
    }

    #[tokio::test]
    async fn test_unconfigured_service_yields_no_result() {
        let engine = engine(2, 6, Duration::from_secs(1));
        let mut svc = service("http://unused");
        svc.base_url = None;
        assert!(matches!(
            engine.measure(&svc, &list_case()).await,
            Ok(None)
        ));
    }

    #[tokio::test]
    async fn test_id_substitution_and_trailing_slash() {
        let server = MockServer::start().await;
        // Only ids in [1, corpus_size] with the Django trailing slash match.
        Mock::given(wm_method("GET"))
            .and(path_regex(r"^/products/([1-9]|1[0-9]|2[0-5])/$"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let engine = engine(3, 20, Duration::from_secs(5));
        let svc = ServiceDescriptor {
            service: "django".to_string(),
            framework: "Django".to_string(),
            base_url: Some(server.uri()),
            trailing_slash: true,
        };
        let case = TestCase {
            name: "Get Product",
            method: Method::Get,
            path_template: "/products/{id}",
            payload: PayloadStrategy::None,
            phase: TestPhase::Seeded,
        };

        let result = engine.measure(&svc, &case).await.unwrap().unwrap();
        // Every dispatched URL matched the mock, so none 404ed.
        assert_eq!(result.success_rate_percent, Some(100.0));
    }

    #[tokio::test]
    async fn test_corpus_payload_reaches_the_service() {
        async fn create(body: axum::Json<serde_json::Value>) -> StatusCode {
            let has_fields = body.get("name").is_some()
                && body.get("price").is_some()
                && body.get("internal_id").is_some();
            if has_fields {
                StatusCode::CREATED
            } else {
                StatusCode::BAD_REQUEST
            }
        }
        let app = Router::new().route("/products", post(create));
        let addr = serve(app).await;

        let engine = engine(2, 10, Duration::from_secs(5));
        let case = TestCase {
            name: "Create Product",
            method: Method::Post,
            path_template: "/products",
            payload: PayloadStrategy::FromCorpus,
            phase: TestPhase::Stateless,
        };

        let result = engine
            .measure(&service(&format!("http://{}", addr)), &case)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(result.success_rate_percent, Some(100.0));
    }

    #[tokio::test]
    async fn test_synthetic_mutation_payload() {
        async fn update(body: axum::Json<serde_json::Value>) -> StatusCode {
            let updated = body
                .get("name")
                .and_then(|n| n.as_str())
                .map(|n| n.starts_with("Updated "))
                .unwrap_or(false);
            if updated {
                StatusCode::OK
            } else {
                StatusCode::BAD_REQUEST
            }
        }
        let app = Router::new().route("/products/{id}", put(update));
        let addr = serve(app).await;

        let engine = engine(2, 10, Duration::from_secs(5));
        let case = TestCase {
            name: "Update Product",
            method: Method::Put,
            path_template: "/products/{id}",
            payload: PayloadStrategy::SyntheticMutation,
            phase: TestPhase::Seeded,
        };

        let result = engine
            .measure(&service(&format!("http://{}", addr)), &case)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(result.success_rate_percent, Some(100.0));
    }

    #[tokio::test]
    async fn test_not_found_responses_are_completed_samples() {
        let server = MockServer::start().await;
        Mock::given(wm_method("GET"))
            .and(path_regex(r"^/products/\d+$"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let engine = engine(3, 15, Duration::from_secs(5));
        let case = TestCase {
            name: "Get Product",
            method: Method::Get,
            path_template: "/products/{id}",
            payload: PayloadStrategy::None,
            phase: TestPhase::Seeded,
        };
        let result = engine
            .measure(&service(&server.uri()), &case)
            .await
            .unwrap()
            .unwrap();

        // 404s are completed samples, so nothing is an error yet nothing
        // is a success.
        assert_eq!(result.total_requests, 15);
        assert_eq!(result.error_count, Some(0));
        assert_eq!(result.success_rate_percent, Some(0.0));
        assert!(result.avg_latency_ms > 0.0);
    }

    #[test]
    fn test_specs_match_nominal_total() {
        let engine = engine(4, 33, Duration::from_secs(1));
        let frameworks: HashMap<String, String> = HashMap::new();
        let mut svc = ServiceDescriptor::resolve("gin", &frameworks);
        svc.base_url = Some("http://gin:8080".to_string());

        let specs = engine
            .request_specs("http://gin:8080", &svc, &list_case())
            .unwrap();
        assert_eq!(specs.len(), 33);
        assert!(specs.iter().all(|s| s.url == "http://gin:8080/products"));
    }
}
