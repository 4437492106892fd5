// Metrics hooks for the `matcher` crate.
//
// Callers install a global `MatchMetrics` implementation via [`set_match_metrics`],
// then every worker reports per-product latency and candidate counts, and the
// coordinator reports one summary per run. This keeps instrumentation
// decoupled from any specific metrics backend.
use std::sync::{Arc, RwLock};
use std::time::Duration;

use once_cell::sync::OnceCell;

use crate::types::ProductId;

/// Metrics observer for matching runs.
pub trait MatchMetrics: Send + Sync {
    /// Record one product scored against every listing.
    ///
    /// `scored` is the number of listings examined, `accepted` the number
    /// that survived the manufacturer filter, and `updated` the number whose
    /// best match moved to this product at the time of the update.
    fn record_product(
        &self,
        product: ProductId,
        latency: Duration,
        scored: usize,
        accepted: usize,
        updated: usize,
    );

    /// Record a finished run.
    fn record_run(&self, _threads: usize, _products: usize, _latency: Duration) {}
}

fn metrics_lock() -> &'static RwLock<Option<Arc<dyn MatchMetrics>>> {
    static METRICS: OnceCell<RwLock<Option<Arc<dyn MatchMetrics>>>> = OnceCell::new();
    METRICS.get_or_init(|| RwLock::new(None))
}

pub(crate) fn metrics_recorder() -> Option<Arc<dyn MatchMetrics>> {
    let guard = metrics_lock()
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    guard.clone()
}

/// Install or clear the global match metrics recorder.
pub fn set_match_metrics(recorder: Option<Arc<dyn MatchMetrics>>) {
    let mut guard = metrics_lock()
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *guard = recorder;
}
