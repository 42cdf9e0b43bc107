//! Run context

use std::sync::Arc;

use gantry_config::GantryConfig;
use gantry_core::ProductRecord;
use gantry_lifecycle::ServiceLifecycle;
use gantry_loadgen::LoadEngine;
use gantry_storage::ProductStore;

/// Everything one benchmark run needs, wired once at startup and passed
/// explicitly to the controller. Collaborators sit behind their seam
/// traits so the controller never touches docker, Postgres or HTTP
/// directly.
pub struct RunContext {
    pub config: GantryConfig,
    pub corpus: Arc<[ProductRecord]>,
    pub lifecycle: Arc<dyn ServiceLifecycle>,
    pub store: Arc<dyn ProductStore>,
    pub engine: Arc<dyn LoadEngine>,
}
