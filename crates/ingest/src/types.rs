//! Raw record types read from the input files.
//!
//! Each input line is one JSON object. Every field is a string and every
//! field is optional: a missing key or a `null` value becomes `""`, the same
//! as a present but empty one. Unknown keys are ignored.
//!
//! ```text
//! listings.txt  {"title": "...", "manufacturer": "...", "currency": "...", "price": "..."}
//! products.txt  {"product_name": "...", "manufacturer": "...", "family": "...",
//!                "model": "...", "announced-date": "..."}
//! ```
//!
//! # Examples
//!
//! ```rust
//! use ingest::RawProduct;
//!
//! let product: RawProduct = serde_json::from_str(
//!     r#"{"product_name":"Sony_Cyber-shot_DSC-P1","manufacturer":"Sony","model":"DSC-P1"}"#,
//! ).unwrap();
//! assert_eq!(product.model, "DSC-P1");
//! assert_eq!(product.family, "");
//! ```

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Which kind of record a file holds. Used in errors and log fields.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Listing,
    Product,
}

impl RecordKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RecordKind::Listing => "listing",
            RecordKind::Product => "product",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// A marketplace listing exactly as it appeared in the input.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RawListing {
    #[serde(deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub manufacturer: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub currency: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub price: String,
}

/// A catalog product exactly as it appeared in the input.
///
/// Published data sets spell the date key `announced-date`; `announced_date`
/// is accepted too. When a line carries both, the hyphenated one wins.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "ProductLine")]
pub struct RawProduct {
    pub product_name: String,
    pub manufacturer: String,
    pub family: String,
    pub model: String,
    pub announced_date: String,
}

/// Wire shape of a product line, keeping both date spellings apart.
#[derive(Deserialize, Default)]
#[serde(default)]
struct ProductLine {
    product_name: Option<String>,
    manufacturer: Option<String>,
    family: Option<String>,
    model: Option<String>,
    #[serde(rename = "announced-date")]
    announced_date_hyphen: Option<String>,
    announced_date: Option<String>,
}

impl From<ProductLine> for RawProduct {
    fn from(line: ProductLine) -> Self {
        Self {
            product_name: line.product_name.unwrap_or_default(),
            manufacturer: line.manufacturer.unwrap_or_default(),
            family: line.family.unwrap_or_default(),
            model: line.model.unwrap_or_default(),
            announced_date: line
                .announced_date_hyphen
                .or(line.announced_date)
                .unwrap_or_default(),
        }
    }
}
