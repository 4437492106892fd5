use std::thread;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::catalog::Catalog;
use crate::metrics::metrics_recorder;
use crate::scoring::score_listing;
use crate::types::{ListingId, MatchConfig, MatchError, ProductId, ResultEntry, ScoredListing};


/// Shared stack of products not yet handed to a worker.
pub struct WorkQueue {
    state: Mutex<QueueState>,
    total: usize,
    progress_interval: usize,
}

struct QueueState {
    pending: Vec<ProductId>,
    handed_out: usize,
}

impl WorkQueue {
    /// Products are popped from the back of `products`.
    pub fn new(products: Vec<ProductId>, progress_interval: usize) -> Self {
        let total = products.len();
        Self {
            state: Mutex::new(QueueState {
                pending: products,
                handed_out: 0,
            }),
            total,
            progress_interval,
        }
    }

    /// Take the next product, or `None` once the queue is drained.
    pub fn pop(&self) -> Option<ProductId> {
        let (product, ordinal) = {
            let mut state = self.state.lock();
            let product = state.pending.pop()?;
            let ordinal = state.handed_out;
            state.handed_out += 1;
            (product, ordinal)
        };

        if self.progress_interval > 0 && ordinal % self.progress_interval == 0 {
            info!(
                product = ordinal + 1,
                total = self.total,
                "matching_progress"
            );
        }
        Some(product)
    }

    pub fn remaining(&self) -> usize {
        self.state.lock().pending.len()
    }

    pub fn total(&self) -> usize {
        self.total
    }
}

/// Counters for one worker, or summed over a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchStats {
    pub products: usize,
    pub pairs_scored: usize,
    pub pairs_accepted: usize,
    pub best_updates: usize,
}

impl MatchStats {
    fn merge(&mut self, other: MatchStats) {
        self.products += other.products;
        self.pairs_scored += other.pairs_scored;
        self.pairs_accepted += other.pairs_accepted;
        self.best_updates += other.best_updates;
    }
}

/// Results of a full run, one entry per product in catalog order.
#[derive(Debug, Clone)]
pub struct MatchOutcome {
    pub results: Vec<ResultEntry>,
    pub stats: MatchStats,
    pub elapsed: Duration,
}

/// Matches every product against every listing with a fixed pool of OS
/// threads and records each listing's best product.
#[derive(Debug, Clone, Default)]
pub struct Matcher {
    config: MatchConfig,
}

impl Matcher {
    pub fn new(config: MatchConfig) -> Result<Self, MatchError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Match every product in the catalog and build the per-product results.
    pub fn run(&self, catalog: &mut Catalog, threads: usize) -> Result<MatchOutcome, MatchError> {
        let order: Vec<ProductId> = catalog.product_ids().collect();
        self.run_in_order(catalog, order, threads)
    }

    /// Like [`Matcher::run`], with the queue seeded from `order`. The last
    /// id in `order` is handed out first.
    pub fn run_in_order(
        &self,
        catalog: &mut Catalog,
        order: Vec<ProductId>,
        threads: usize,
    ) -> Result<MatchOutcome, MatchError> {
        if let Some(unknown) = order
            .iter()
            .copied()
            .find(|id| catalog.product(*id).is_none())
        {
            return Err(MatchError::UnknownProduct(unknown));
        }

        let start = Instant::now();
        catalog.reset_matches();

        let queue = WorkQueue::new(order, self.config.progress_interval);
        let stats = self.match_all(catalog, &queue, threads)?;
        let results = build_results(catalog);

        let elapsed = start.elapsed();
        info!(
            threads,
            products = stats.products,
            listings = catalog.listings().len(),
            pairs_accepted = stats.pairs_accepted,
            best_updates = stats.best_updates,
            elapsed_ms = elapsed.as_millis() as u64,
            "matching_complete"
        );
        if let Some(metrics) = metrics_recorder() {
            metrics.record_run(threads, stats.products, elapsed);
        }

        Ok(MatchOutcome {
            results,
            stats,
            elapsed,
        })
    }

    /// Drain `queue` with `threads` workers, updating best-match state in
    /// place. Returns once every worker has been joined.
    pub fn match_all(
        &self,
        catalog: &Catalog,
        queue: &WorkQueue,
        threads: usize,
    ) -> Result<MatchStats, MatchError> {
        if threads == 0 {
            warn!(
                pending = queue.remaining(),
                "no matching workers requested; nothing will be processed"
            );
            return Ok(MatchStats::default());
        }

        thread::scope(|scope| {
            let mut handles = Vec::with_capacity(threads);
            let mut spawn_error = None;

            for worker in 0..threads {
                let spawned = thread::Builder::new()
                    .name(format!("listmatch-worker-{worker}"))
                    .spawn_scoped(scope, move || self.worker_loop(worker, catalog, queue));
                match spawned {
                    Ok(handle) => handles.push((worker, handle)),
                    Err(err) => {
                        spawn_error = Some(MatchError::WorkerSpawn(err));
                        break;
                    }
                }
            }

            let mut stats = MatchStats::default();
            let mut panicked = None;
            for (worker, handle) in handles {
                match handle.join() {
                    Ok(worker_stats) => stats.merge(worker_stats),
                    Err(_) => {
                        warn!(worker, "matching worker panicked");
                        panicked.get_or_insert(MatchError::WorkerPanicked { worker });
                    }
                }
            }

            match spawn_error.or(panicked) {
                Some(err) => Err(err),
                None => Ok(stats),
            }
        })
    }

    fn worker_loop(&self, worker: usize, catalog: &Catalog, queue: &WorkQueue) -> MatchStats {
        let mut stats = MatchStats::default();
        while let Some(product) = queue.pop() {
            stats.merge(self.match_product(catalog, product));
        }
        debug!(
            worker,
            products = stats.products,
            best_updates = stats.best_updates,
            "worker_finished"
        );
        stats
    }

    /// Score one product against every listing, then offer each surviving
    /// weight to its listing.
    pub fn match_product(&self, catalog: &Catalog, product_id: ProductId) -> MatchStats {
        let Some(product) = catalog.product(product_id) else {
            return MatchStats::default();
        };
        let start = Instant::now();
        let interner = catalog.interner();

        let survivors: Vec<(ListingId, f32)> = catalog
            .listings()
            .iter()
            .enumerate()
            .filter_map(|(idx, listing)| {
                score_listing(product, listing, interner, &self.config)
                    .map(|weight| (ListingId(idx), weight))
            })
            .collect();

        let mut best_updates = 0;
        for &(listing_id, weight) in &survivors {
            if catalog.listings()[listing_id.0].offer(product_id, weight) {
                best_updates += 1;
            }
        }

        let latency = start.elapsed();
        debug!(
            product = product_id.0,
            accepted = survivors.len(),
            best_updates,
            latency_us = latency.as_micros() as u64,
            "product_matched"
        );
        if let Some(metrics) = metrics_recorder() {
            metrics.record_product(
                product_id,
                latency,
                catalog.listings().len(),
                survivors.len(),
                best_updates,
            );
        }

        MatchStats {
            products: 1,
            pairs_scored: catalog.listings().len(),
            pairs_accepted: survivors.len(),
            best_updates,
        }
    }
}

/// Turn per-listing best matches into per-product results.
///
/// Needs `&mut Catalog`, so it can only run once no worker holds the
/// catalog.
pub fn build_results(catalog: &mut Catalog) -> Vec<ResultEntry> {
    let Catalog {
        listings, products, ..
    } = catalog;

    for product in products.iter_mut() {
        product.matched_listings.clear();
    }

    for (idx, listing) in listings.iter_mut().enumerate() {
        let best = *listing.best.get_mut();
        if let Some(product) = best.product.and_then(|id| products.get_mut(id.0)) {
            product.matched_listings.push(ListingId(idx));
        }
    }

    products
        .iter()
        .enumerate()
        .map(|(idx, product)| {
            let mut scored: Vec<ScoredListing> = product
                .matched_listings
                .iter()
                .map(|&listing| ScoredListing {
                    listing,
                    weight: listings[listing.0].best_match().weight,
                })
                .collect();
            scored.sort_unstable_by(|a, b| b.weight.total_cmp(&a.weight));
            ResultEntry {
                product: ProductId(idx),
                listings: scored,
            }
        })
        .collect()
}
