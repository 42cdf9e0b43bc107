//! The run controller
//!
//! Sequences the full benchmark matrix: for each configured service,
//! start it, measure the stateless cases, seed the store, measure the
//! seeded cases, run the destructive delete case last, tear the service
//! down, and move on. Every failure along the way is a logged skip, never
//! an abort — the accumulated results always reach the final flush.

use tracing::{info, warn};

use gantry_core::{RunResult, ServiceDescriptor, TestCase, TestPhase};

use crate::context::RunContext;

/// Run the whole matrix and return the accumulated result rows, in
/// measurement order. The caller persists them exactly once.
pub async fn run(ctx: &RunContext) -> Vec<RunResult> {
    let suite = TestCase::suite();
    let mut results = Vec::new();

    // Clean slate: nothing from a previous run may still be serving.
    ctx.lifecycle.stop_all().await;

    let services = &ctx.config.services.services;
    for (index, name) in services.iter().enumerate() {
        let service = ServiceDescriptor::resolve(name, &ctx.config.services.frameworks);
        info!(
            "Benchmarking {} ({}/{})",
            service.service,
            index + 1,
            services.len()
        );

        measure_service(ctx, &service, &suite, &mut results).await;

        ctx.lifecycle.stop_and_remove(&service).await;
        if index + 1 < services.len() {
            tokio::time::sleep(ctx.config.services.pause_between).await;
        }
    }

    results
}

/// Measure every applicable test case for one service. Returns early on
/// any per-service skip; the caller still tears the service down.
async fn measure_service(
    ctx: &RunContext,
    service: &ServiceDescriptor,
    suite: &[TestCase],
    results: &mut Vec<RunResult>,
) {
    if let Err(error) = ctx.lifecycle.start(service).await {
        warn!("Skipping {}: {}", service.framework, error);
        return;
    }

    if service.base_url.is_none() {
        warn!("Skipping {}: no base URL configured", service.framework);
        return;
    }

    for case in phase(suite, TestPhase::Stateless) {
        run_case(ctx, service, case, results).await;
    }

    // Seeded and destructive cases read rows the seeder put there; without
    // a fresh seed they would measure 404s, not the framework.
    if let Err(error) = ctx.store.seed(&ctx.corpus).await {
        warn!(
            "Skipping data-dependent cases for {}: {}",
            service.framework, error
        );
        return;
    }

    for case in phase(suite, TestPhase::Seeded) {
        run_case(ctx, service, case, results).await;
    }

    // Delete last: the rows it removes must never be missed by the cases
    // above.
    for case in phase(suite, TestPhase::Destructive) {
        run_case(ctx, service, case, results).await;
    }
}

async fn run_case(
    ctx: &RunContext,
    service: &ServiceDescriptor,
    case: &TestCase,
    results: &mut Vec<RunResult>,
) {
    info!("Running {} for {}", case.name, service.framework);
    match ctx.engine.measure(service, case).await {
        Ok(Some(result)) => results.push(result),
        Ok(None) => warn!("No result for {} / {}", service.framework, case.name),
        Err(error) => warn!(
            "Measurement failed for {} / {}: {}",
            service.framework, case.name, error
        ),
    }
}

fn phase(suite: &[TestCase], phase: TestPhase) -> impl Iterator<Item = &TestCase> {
    suite.iter().filter(move |case| case.phase == phase)
}
