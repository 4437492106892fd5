//! # Listing Matcher (`matcher`)
//!
//! ## Purpose
//!
//! `matcher` decides, for every marketplace listing, which catalog product
//! it most likely refers to. It works purely lexically: every field is
//! normalized into interned tokens by `canonical`, and each (product,
//! listing) pair is scored by a cascading three-pass pipeline.
//!
//! In a typical run you will:
//! - Read raw records with `ingest` and feed them to a [`CatalogBuilder`].
//! - Freeze it into a [`Catalog`] and hand it to [`Matcher::run`] with a
//!   worker count.
//! - Consume the [`ResultEntry`] list, filtering on
//!   [`MatchConfig::acceptance_threshold`].
//!
//! ## Core Types
//!
//! - [`Catalog`]: arena of [`Listing`]s and [`Product`]s addressed by
//!   [`ListingId`] / [`ProductId`], plus the frozen interner.
//! - [`Pass`]: the manufacturer, model and family scoring stages.
//! - [`ScoreBreakdown`]: per-pass contributions for one pair; see
//!   [`score_pair`].
//! - [`Matcher`]: the worker pool. Each listing keeps its best
//!   `(product, weight)` behind its own lock; a new score replaces it only
//!   when strictly greater.
//! - [`ResultEntry`]: a product's listings sorted by weight, descending.
//!
//! ## Example Usage
//!
//! ```
//! use canonical::NormalizeConfig;
//! use ingest::{RawListing, RawProduct};
//! use matcher::{CatalogBuilder, MatchConfig, Matcher};
//!
//! let mut builder = CatalogBuilder::new(NormalizeConfig::default());
//! builder.add_product(RawProduct {
//!     product_name: "Sony_DSC-P1".into(),
//!     manufacturer: "Sony".into(),
//!     model: "DSC-P1".into(),
//!     ..Default::default()
//! });
//! builder.add_listing(RawListing {
//!     title: "Sony DSC-P1 Camera".into(),
//!     manufacturer: "Sony".into(),
//!     ..Default::default()
//! });
//! let mut catalog = builder.build();
//!
//! let matcher = Matcher::new(MatchConfig::default()).expect("valid config");
//! let outcome = matcher.run(&mut catalog, 2).expect("match");
//!
//! let accepted: Vec<_> = outcome.results[0].accepted(0.695).collect();
//! assert_eq!(accepted.len(), 1);
//! ```
//!
//! ## Observability
//!
//! Progress and per-run summaries are logged through `tracing`. Install a
//! [`MatchMetrics`] implementation via [`set_match_metrics`] to record
//! per-product latency and candidate counts.

pub mod catalog;
pub mod engine;
pub mod metrics;
pub mod scoring;
pub mod types;

pub use crate::catalog::{Catalog, CatalogBuilder};
pub use crate::engine::{build_results, MatchOutcome, MatchStats, Matcher, WorkQueue};
pub use crate::metrics::{set_match_metrics, MatchMetrics};
pub use crate::scoring::{pass_score, score_listing, score_pair, MatchInfo, Pass, ScoreBreakdown};
pub use crate::types::{
    BestMatch, Listing, ListingId, MatchConfig, MatchError, Product, ProductId, ResultEntry,
    ScoredListing,
};
