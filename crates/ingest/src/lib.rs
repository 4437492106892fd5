//! Listing Ingest Layer
//!
//! This is where records enter the matcher. We read line-delimited JSON
//! files (one object per line), turn every line into a [`RawListing`] or
//! [`RawProduct`], and hand the complete set back to the caller.
//!
//! ## What we do here
//!
//! - **Skip blank lines** - trailing newlines and empty separators are fine
//! - **Default missing fields** - absent keys become empty strings
//! - **Fail fast** - the first unparsable line aborts the read with its line
//!   number; there is no partial result
//! - **Log everything** - structured logs via tracing for each file read
//!
//! ## Main entry points
//!
//! [`read_listings_file`] and [`read_products_file`] for paths,
//! [`read_records`] for any [`BufRead`] source.
//!
//! ## Example
//!
//! ```
//! use ingest::{read_records, RawListing, RecordKind};
//!
//! let input = r#"{"title":"Sony DSC-P1 Camera","manufacturer":"Sony","currency":"USD","price":"199.99"}
//!
//! {"title":"Nikon D90","manufacturer":"Nikon","currency":"GBP","price":"549.00"}
//! "#;
//!
//! let listings: Vec<RawListing> = read_records(input.as_bytes(), RecordKind::Listing).unwrap();
//! assert_eq!(listings.len(), 2);
//! assert_eq!(listings[1].manufacturer, "Nikon");
//! ```
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Instant;

use serde::de::DeserializeOwned;
use tracing::{info, warn, Level};

mod error;
mod types;

pub use crate::error::IngestError;
pub use crate::types::{RawListing, RawProduct, RecordKind};

/// Read every record from a line-delimited JSON source.
pub fn read_records<T, R>(reader: R, kind: RecordKind) -> Result<Vec<T>, IngestError>
where
    T: DeserializeOwned,
    R: BufRead,
{
    let start = Instant::now();
    let span = tracing::span!(Level::DEBUG, "ingest.read_records", kind = %kind);
    let _guard = span.enter();

    match read_records_inner(reader, kind) {
        Ok(records) => {
            let elapsed_micros = start.elapsed().as_micros();
            info!(
                kind = %kind,
                records = records.len(),
                elapsed_micros,
                "ingest_success"
            );
            Ok(records)
        }
        Err(err) => {
            let elapsed_micros = start.elapsed().as_micros();
            warn!(kind = %kind, error = %err, elapsed_micros, "ingest_failure");
            Err(err)
        }
    }
}

fn read_records_inner<T, R>(reader: R, kind: RecordKind) -> Result<Vec<T>, IngestError>
where
    T: DeserializeOwned,
    R: BufRead,
{
    let mut records = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.map_err(|source| IngestError::Read {
            kind,
            line: line_no,
            source,
        })?;

        if line.trim().is_empty() {
            continue;
        }

        let record = serde_json::from_str(&line).map_err(|source| IngestError::Malformed {
            kind,
            line: line_no,
            source,
        })?;
        records.push(record);
    }

    Ok(records)
}

/// Open `path` and read it as line-delimited JSON records of `kind`.
pub fn read_file<T: DeserializeOwned>(
    path: impl AsRef<Path>,
    kind: RecordKind,
) -> Result<Vec<T>, IngestError> {
    let path = path.as_ref();
    let file = match File::open(path) {
        Ok(file) => file,
        Err(source) => {
            warn!(kind = %kind, path = %path.display(), error = %source, "ingest_failure");
            return Err(IngestError::Io {
                kind,
                path: path.to_path_buf(),
                source,
            });
        }
    };

    read_records(BufReader::new(file), kind)
}

/// Read a listings file.
pub fn read_listings_file(path: impl AsRef<Path>) -> Result<Vec<RawListing>, IngestError> {
    read_file(path, RecordKind::Listing)
}

/// Read a products file.
pub fn read_products_file(path: impl AsRef<Path>) -> Result<Vec<RawProduct>, IngestError> {
    read_file(path, RecordKind::Product)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    const LISTINGS: &str = r#"{"title":"Sony DSC-P1 Camera","manufacturer":"Sony","currency":"USD","price":"199.99"}
{"title":"Nikon D90","manufacturer":"Nikon","currency":"GBP","price":"549.00"}
"#;

    #[test]
    fn reads_all_listings() {
        let listings: Vec<RawListing> =
            read_records(LISTINGS.as_bytes(), RecordKind::Listing).expect("read listings");
        assert_eq!(listings.len(), 2);
        assert_eq!(listings[0].title, "Sony DSC-P1 Camera");
        assert_eq!(listings[0].price, "199.99");
        assert_eq!(listings[1].currency, "GBP");
    }

    #[test]
    fn blank_lines_are_skipped() {
        let input = "\n{\"title\":\"a\"}\n   \n\n{\"title\":\"b\"}";
        let listings: Vec<RawListing> =
            read_records(input.as_bytes(), RecordKind::Listing).expect("read listings");
        let titles: Vec<&str> = listings.iter().map(|l| l.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "b"]);
    }

    #[test]
    fn empty_input_yields_no_records() {
        let products: Vec<RawProduct> =
            read_records("".as_bytes(), RecordKind::Product).expect("read products");
        assert!(products.is_empty());
    }

    #[test]
    fn malformed_line_reports_line_number() {
        let input = "{\"product_name\":\"a\"}\n\n{\"product_name\": \n";
        let err = read_records::<RawProduct, _>(input.as_bytes(), RecordKind::Product)
            .expect_err("line 3 is malformed");
        assert!(matches!(
            err,
            IngestError::Malformed {
                kind: RecordKind::Product,
                line: 3,
                ..
            }
        ));
        assert_eq!(err.line(), Some(3));
        assert!(err.to_string().contains("product line 3"));
    }

    #[test]
    fn invalid_utf8_is_a_read_error() {
        let input: &[u8] = b"{\"title\":\"ok\"}\n\xff\xfe\n";
        let err = read_records::<RawListing, _>(input, RecordKind::Listing)
            .expect_err("line 2 is not utf-8");
        assert!(matches!(err, IngestError::Read { line: 2, .. }));
    }

    #[test]
    fn reads_from_file() {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(LISTINGS.as_bytes()).expect("write listings");

        let listings = read_listings_file(file.path()).expect("read listings file");
        assert_eq!(listings.len(), 2);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("does-not-exist.json");
        let err = read_products_file(&path).expect_err("file is missing");
        assert!(matches!(
            err,
            IngestError::Io {
                kind: RecordKind::Product,
                ..
            }
        ));
        assert_eq!(err.line(), None);
    }
}
