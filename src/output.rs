//! Line-delimited JSON result writer.
//!
//! One object per product, in catalog order:
//!
//! ```text
//! {"product_name":"Sony_DSC-P1","listings":[{"title":"...","manufacturer":"...","currency":"...","price":"..."}]}
//! ```
//!
//! Only listings whose weight reaches the acceptance threshold are written,
//! highest weight first. Products without accepted listings still get a line
//! with an empty `listings` array.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use matcher::{Catalog, ResultEntry};
use serde::Serialize;

use crate::PipelineError;

#[derive(Debug, Serialize)]
struct ListingLine<'a> {
    title: &'a str,
    manufacturer: &'a str,
    currency: &'a str,
    price: &'a str,
}

#[derive(Debug, Serialize)]
struct ProductLine<'a> {
    product_name: &'a str,
    listings: Vec<ListingLine<'a>>,
}

/// Write every result entry to `writer`. Returns the number of listings
/// written across all products.
pub fn write_results<W: Write>(
    mut writer: W,
    catalog: &Catalog,
    results: &[ResultEntry],
    threshold: f32,
) -> Result<usize, PipelineError> {
    let mut written = 0;

    for entry in results {
        let Some(product) = catalog.product(entry.product) else {
            continue;
        };

        let listings: Vec<ListingLine<'_>> = entry
            .accepted(threshold)
            .filter_map(|scored| catalog.listing(scored.listing))
            .map(|listing| ListingLine {
                title: &listing.raw.title,
                manufacturer: &listing.raw.manufacturer,
                currency: &listing.raw.currency,
                price: &listing.raw.price,
            })
            .collect();
        written += listings.len();

        let line = ProductLine {
            product_name: &product.raw.product_name,
            listings,
        };
        serde_json::to_writer(&mut writer, &line).map_err(PipelineError::Encode)?;
        writer.write_all(b"\n").map_err(PipelineError::Output)?;
    }

    writer.flush().map_err(PipelineError::Output)?;
    Ok(written)
}

/// Create (or truncate) `path` and write the results into it.
pub fn write_results_file(
    path: impl AsRef<Path>,
    catalog: &Catalog,
    results: &[ResultEntry],
    threshold: f32,
) -> Result<usize, PipelineError> {
    let file = File::create(path.as_ref()).map_err(PipelineError::Output)?;
    write_results(BufWriter::new(file), catalog, results, threshold)
}
