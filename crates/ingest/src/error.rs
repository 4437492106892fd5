//! Error types produced by the ingest crate.
//!
//! Every ingest failure is fatal for the run: the matcher needs the complete
//! product and listing sets up front, so a single bad line aborts the whole
//! batch and no partial output is written.
//!
//! | Error | Cause |
//! |-------|-------|
//! | [`Io`](IngestError::Io) | Input file could not be opened |
//! | [`Read`](IngestError::Read) | A line could not be read (I/O failure, invalid UTF-8) |
//! | [`Malformed`](IngestError::Malformed) | A non-blank line is not a valid record |
//!
//! ```rust
//! use ingest::{read_records, IngestError, RawListing, RecordKind};
//!
//! let input = "{\"title\": \"ok\"}\nnot json\n";
//! let err = read_records::<RawListing, _>(input.as_bytes(), RecordKind::Listing).unwrap_err();
//! match err {
//!     IngestError::Malformed { line, kind, .. } => {
//!         assert_eq!(line, 2);
//!         assert_eq!(kind, RecordKind::Listing);
//!     }
//!     other => panic!("unexpected error: {other}"),
//! }
//! ```

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::types::RecordKind;

/// Errors that can occur while reading listings or products.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum IngestError {
    /// The input file could not be opened.
    #[error("failed to open {kind} file {}: {source}", .path.display())]
    Io {
        kind: RecordKind,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Reading a line failed part way through the input.
    #[error("failed to read {kind} line {line}: {source}")]
    Read {
        kind: RecordKind,
        /// 1-based line number.
        line: usize,
        #[source]
        source: io::Error,
    },

    /// A non-blank line did not parse as a record.
    #[error("failed to parse {kind} line {line}: {source}")]
    Malformed {
        kind: RecordKind,
        /// 1-based line number.
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

impl IngestError {
    /// 1-based line number of the offending input line, when there is one.
    pub fn line(&self) -> Option<usize> {
        match self {
            IngestError::Io { .. } => None,
            IngestError::Read { line, .. } | IngestError::Malformed { line, .. } => Some(*line),
        }
    }

    pub fn kind(&self) -> RecordKind {
        match self {
            IngestError::Io { kind, .. }
            | IngestError::Read { kind, .. }
            | IngestError::Malformed { kind, .. } => *kind,
        }
    }
}
