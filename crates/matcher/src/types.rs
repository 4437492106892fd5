use std::fmt;
use std::io;

use canonical::NormalizedField;
use ingest::{RawListing, RawProduct};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stable index of a listing inside a [`Catalog`](crate::Catalog).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListingId(pub usize);

/// Stable index of a product inside a [`Catalog`](crate::Catalog).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProductId(pub usize);

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listing#{}", self.0)
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "product#{}", self.0)
    }
}

/// The product currently winning a listing, and its weight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BestMatch {
    pub product: Option<ProductId>,
    pub weight: f32,
}

impl BestMatch {
    /// Starting weight; lower than any score the pipeline can produce.
    pub const SENTINEL_WEIGHT: f32 = -99999.0;

    pub fn unmatched() -> Self {
        Self {
            product: None,
            weight: Self::SENTINEL_WEIGHT,
        }
    }

    /// Replaces the current best only on a strictly greater weight.
    pub fn offer(&mut self, product: ProductId, weight: f32) -> bool {
        if weight > self.weight {
            self.product = Some(product);
            self.weight = weight;
            true
        } else {
            false
        }
    }
}

impl Default for BestMatch {
    fn default() -> Self {
        Self::unmatched()
    }
}

/// A marketplace listing: raw fields, their normalized forms and the
/// lock-protected best-match state written by the worker pool.
#[derive(Debug)]
pub struct Listing {
    pub raw: RawListing,
    pub title: NormalizedField,
    pub manufacturer: NormalizedField,
    pub currency: NormalizedField,
    pub price: NormalizedField,
    pub(crate) best: Mutex<BestMatch>,
}

impl Listing {
    pub fn new(
        raw: RawListing,
        title: NormalizedField,
        manufacturer: NormalizedField,
        currency: NormalizedField,
        price: NormalizedField,
    ) -> Self {
        Self {
            raw,
            title,
            manufacturer,
            currency,
            price,
            best: Mutex::new(BestMatch::unmatched()),
        }
    }

    /// Snapshot of the best-match state.
    pub fn best_match(&self) -> BestMatch {
        *self.best.lock()
    }

    /// Offer `product` at `weight`; returns whether it became the new best.
    pub fn offer(&self, product: ProductId, weight: f32) -> bool {
        self.best.lock().offer(product, weight)
    }

    pub(crate) fn reset(&mut self) {
        *self.best.get_mut() = BestMatch::unmatched();
    }
}

/// A catalog product with its normalized fields.
///
/// `matched_listings` is filled only by the result builder, after every
/// matching worker has finished.
#[derive(Debug, Clone)]
pub struct Product {
    pub raw: RawProduct,
    pub name: NormalizedField,
    pub manufacturer: NormalizedField,
    pub family: NormalizedField,
    pub model: NormalizedField,
    pub announced_date: NormalizedField,
    pub(crate) matched_listings: Vec<ListingId>,
}

impl Product {
    pub fn new(
        raw: RawProduct,
        name: NormalizedField,
        manufacturer: NormalizedField,
        family: NormalizedField,
        model: NormalizedField,
        announced_date: NormalizedField,
    ) -> Self {
        Self {
            raw,
            name,
            manufacturer,
            family,
            model,
            announced_date,
            matched_listings: Vec::new(),
        }
    }

    /// Listings whose best match is this product, in listing order.
    pub fn matched_listings(&self) -> &[ListingId] {
        &self.matched_listings
    }
}

/// A listing paired with the weight it scored against a product.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoredListing {
    pub listing: ListingId,
    pub weight: f32,
}

/// Final per-product result, sorted by weight descending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultEntry {
    pub product: ProductId,
    pub listings: Vec<ScoredListing>,
}

impl ResultEntry {
    /// Listings at or above `threshold`, keeping the descending order.
    pub fn accepted(&self, threshold: f32) -> impl Iterator<Item = &ScoredListing> + '_ {
        self.listings
            .iter()
            .filter(move |scored| scored.weight >= threshold)
    }
}

/// Tuning knobs for the scoring pipeline and the worker pool.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchConfig {
    /// Weight of the manufacturer pass; also the hard filter stage.
    #[serde(default = "MatchConfig::default_manufacturer_weight")]
    pub manufacturer_weight: f32,
    /// Weight of the model pass (product model vs. listing title).
    #[serde(default = "MatchConfig::default_model_weight")]
    pub model_weight: f32,
    /// Weight of the family pass (product family vs. listing title).
    #[serde(default = "MatchConfig::default_family_weight")]
    pub family_weight: f32,
    /// Minimum weight for a listing to be reported for its product.
    #[serde(default = "MatchConfig::default_acceptance_threshold")]
    pub acceptance_threshold: f32,
    /// Log progress every this many products handed out. 0 disables it.
    #[serde(default = "MatchConfig::default_progress_interval")]
    pub progress_interval: usize,
}

impl MatchConfig {
    pub const DEFAULT_ACCEPTANCE_THRESHOLD: f32 = 0.695;

    pub(crate) fn default_manufacturer_weight() -> f32 {
        0.25
    }

    pub(crate) fn default_model_weight() -> f32 {
        0.55
    }

    pub(crate) fn default_family_weight() -> f32 {
        0.20
    }

    pub(crate) fn default_acceptance_threshold() -> f32 {
        Self::DEFAULT_ACCEPTANCE_THRESHOLD
    }

    pub(crate) fn default_progress_interval() -> usize {
        50
    }

    /// Validate the configuration before a run.
    pub fn validate(&self) -> Result<(), MatchError> {
        if !(self.manufacturer_weight.is_finite() && self.manufacturer_weight > 0.0) {
            return Err(MatchError::InvalidConfig(
                "manufacturer_weight must be a finite value > 0.0".into(),
            ));
        }
        if !(self.model_weight.is_finite() && self.model_weight >= 0.0) {
            return Err(MatchError::InvalidConfig(
                "model_weight must be a finite value >= 0.0".into(),
            ));
        }
        if !(self.family_weight.is_finite() && self.family_weight >= 0.0) {
            return Err(MatchError::InvalidConfig(
                "family_weight must be a finite value >= 0.0".into(),
            ));
        }
        if !self.acceptance_threshold.is_finite() {
            return Err(MatchError::InvalidConfig(
                "acceptance_threshold must be finite".into(),
            ));
        }
        Ok(())
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            manufacturer_weight: Self::default_manufacturer_weight(),
            model_weight: Self::default_model_weight(),
            family_weight: Self::default_family_weight(),
            acceptance_threshold: Self::default_acceptance_threshold(),
            progress_interval: Self::default_progress_interval(),
        }
    }
}

/// Errors produced by the matching layer.
#[derive(Debug, Error)]
pub enum MatchError {
    /// Invalid configuration.
    #[error("invalid match config: {0}")]
    InvalidConfig(String),
    /// A product id handed to the engine does not exist in the catalog.
    #[error("unknown product id {0}")]
    UnknownProduct(ProductId),
    /// The OS refused to start a worker thread.
    #[error("failed to spawn matching worker: {0}")]
    WorkerSpawn(#[source] io::Error),
    /// A worker thread panicked; its results are incomplete.
    #[error("matching worker {worker} panicked")]
    WorkerPanicked { worker: usize },
}
