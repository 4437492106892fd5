//! Listing canonical text layer.
//!
//! Turns raw product and listing fields into ordered sequences of interned
//! word tokens so the matcher can compare them with integer equality and
//! cheap length lookups.
//!
//! ## What we do
//!
//! - Whitespace tokenization
//! - Lowercasing and hyphen removal (`DSC-P1` and `dscp1` become the same word)
//! - Leading/trailing punctuation stripping
//! - Stop-word removal (company suffixes like `gmbh`, `inc`, `ltd`)
//! - String interning with a build phase and a frozen, read-only phase
//!
//! ## Two phases
//!
//! [`normalize`] needs a `&mut InternerBuilder`. Once every record has been
//! ingested, [`InternerBuilder::freeze`] turns the builder into an
//! [`Interner`], which resolves tokens but can never assign new ones. That
//! frozen table is what the concurrent matching phase shares, so "no new
//! strings after ingestion" is checked by the compiler.
//!
//! ```rust
//! use canonical::{normalize, InternerBuilder, NormalizeConfig};
//!
//! let mut builder = InternerBuilder::new();
//! let cfg = NormalizeConfig::default();
//! let field = normalize("Sony DSC-P1 (Silver)", &mut builder, &cfg);
//!
//! let interner = builder.freeze();
//! assert_eq!(interner.render(&field), vec!["sony", "dscp1", "silver"]);
//! ```

mod config;
mod error;
mod interner;
mod normalize;
mod token;

pub use crate::config::{NormalizeConfig, DEFAULT_STOP_WORDS};
pub use crate::error::CanonicalError;
pub use crate::interner::{Interner, InternerBuilder};
pub use crate::normalize::{normalize, normalize_word};
pub use crate::token::{NormalizedField, Token};
