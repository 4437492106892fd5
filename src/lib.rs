//! Workspace umbrella crate for listmatch.
//!
//! This crate stitches ingestion, normalization, matching and result output
//! together so callers can go from two line-delimited JSON files to a result
//! file with a single call.
//!
//! ```no_run
//! use listmatch::{run_files, ListmatchConfig};
//!
//! let cfg = ListmatchConfig::default();
//! let summary = run_files("listings.txt", "products.txt", "results.json", 4, &cfg)
//!     .expect("matching run");
//! println!("{} listings accepted", summary.accepted_listings);
//! ```

pub mod config;
pub mod output;

pub use canonical::{
    normalize, CanonicalError, Interner, InternerBuilder, NormalizeConfig, NormalizedField, Token,
    DEFAULT_STOP_WORDS,
};
pub use ingest::{
    read_listings_file, read_products_file, read_records, IngestError, RawListing, RawProduct,
    RecordKind,
};
pub use matcher::{
    score_pair, set_match_metrics, Catalog, CatalogBuilder, ListingId, MatchConfig, MatchError,
    MatchMetrics, MatchOutcome, MatchStats, Matcher, Pass, ProductId, ResultEntry, ScoreBreakdown,
    ScoredListing,
};

pub use crate::config::{ConfigLoadError, ListmatchConfig};
pub use crate::output::{write_results, write_results_file};

use std::error::Error;
use std::fmt;
use std::io;
use std::path::Path;
use std::time::{Duration, Instant};

use tracing::info;

/// Errors that can occur while running the matching pipeline.
#[derive(Debug)]
pub enum PipelineError {
    Ingest(IngestError),
    Canonical(CanonicalError),
    Match(MatchError),
    Output(io::Error),
    Encode(serde_json::Error),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Ingest(err) => write!(f, "ingest failure: {err}"),
            PipelineError::Canonical(err) => write!(f, "normalization config rejected: {err}"),
            PipelineError::Match(err) => write!(f, "matching failed: {err}"),
            PipelineError::Output(err) => write!(f, "failed to write results: {err}"),
            PipelineError::Encode(err) => write!(f, "failed to encode results: {err}"),
        }
    }
}

impl Error for PipelineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PipelineError::Ingest(err) => Some(err),
            PipelineError::Canonical(err) => Some(err),
            PipelineError::Match(err) => Some(err),
            PipelineError::Output(err) => Some(err),
            PipelineError::Encode(err) => Some(err),
        }
    }
}

impl From<IngestError> for PipelineError {
    fn from(value: IngestError) -> Self {
        PipelineError::Ingest(value)
    }
}

impl From<CanonicalError> for PipelineError {
    fn from(value: CanonicalError) -> Self {
        PipelineError::Canonical(value)
    }
}

impl From<MatchError> for PipelineError {
    fn from(value: MatchError) -> Self {
        PipelineError::Match(value)
    }
}

/// Counters reported at the end of a file-to-file run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    pub listings: usize,
    pub products: usize,
    pub matched_listings: usize,
    pub accepted_listings: usize,
    pub elapsed: Duration,
}

/// Normalize raw records into a frozen catalog.
pub fn build_catalog(
    listings: Vec<RawListing>,
    products: Vec<RawProduct>,
    cfg: &NormalizeConfig,
) -> Result<Catalog, PipelineError> {
    cfg.validate()?;

    let mut builder = CatalogBuilder::with_capacity(cfg.clone(), listings.len(), products.len());
    builder.extend_listings(listings);
    builder.extend_products(products);
    Ok(builder.build())
}

/// Build a catalog from raw records and match it with `threads` workers.
pub fn match_records(
    listings: Vec<RawListing>,
    products: Vec<RawProduct>,
    threads: usize,
    cfg: &ListmatchConfig,
) -> Result<(Catalog, MatchOutcome), PipelineError> {
    let matcher = Matcher::new(cfg.matcher.clone())?;
    let mut catalog = build_catalog(listings, products, &cfg.normalize)?;
    let outcome = matcher.run(&mut catalog, threads)?;
    Ok((catalog, outcome))
}

/// Read both input files, match, and write the accepted results to
/// `output_path`. Any failure aborts the run before output is written.
pub fn run_files(
    listings_path: impl AsRef<Path>,
    products_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    threads: usize,
    cfg: &ListmatchConfig,
) -> Result<RunSummary, PipelineError> {
    let start = Instant::now();

    let listings = read_listings_file(listings_path)?;
    let products = read_products_file(products_path)?;
    let listing_count = listings.len();
    let product_count = products.len();

    let (catalog, outcome) = match_records(listings, products, threads, cfg)?;
    let matched_listings = outcome.results.iter().map(|e| e.listings.len()).sum();

    let output_path = output_path.as_ref();
    let accepted_listings = write_results_file(
        output_path,
        &catalog,
        &outcome.results,
        cfg.matcher.acceptance_threshold,
    )?;

    let summary = RunSummary {
        listings: listing_count,
        products: product_count,
        matched_listings,
        accepted_listings,
        elapsed: start.elapsed(),
    };
    info!(
        listings = summary.listings,
        products = summary.products,
        matched_listings = summary.matched_listings,
        accepted_listings = summary.accepted_listings,
        output = %output_path.display(),
        elapsed_ms = summary.elapsed.as_millis() as u64,
        "run_complete"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_stop_words_rejected_before_matching() {
        let cfg = ListmatchConfig {
            normalize: NormalizeConfig {
                stop_words: vec!["".into()],
            },
            ..ListmatchConfig::default()
        };
        let err = match_records(vec![], vec![], 1, &cfg).unwrap_err();
        assert!(matches!(err, PipelineError::Canonical(_)));
        assert!(err.source().is_some());
    }

    #[test]
    fn invalid_match_config_rejected() {
        let mut cfg = ListmatchConfig::default();
        cfg.matcher.model_weight = f32::NAN;
        let err = match_records(vec![], vec![], 1, &cfg).unwrap_err();
        assert!(matches!(err, PipelineError::Match(MatchError::InvalidConfig(_))));
        assert!(err.to_string().starts_with("matching failed"));
    }

    #[test]
    fn empty_inputs_produce_empty_results() {
        let (catalog, outcome) =
            match_records(vec![], vec![], 2, &ListmatchConfig::default()).unwrap();
        assert!(catalog.products().is_empty());
        assert!(outcome.results.is_empty());
    }
}
