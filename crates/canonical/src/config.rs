//! Configuration for word normalization.
//!
//! [`NormalizeConfig`] carries the stop-word list applied by
//! [`normalize`](crate::normalize). The defaults are company-suffix noise
//! words that carry no meaning when comparing manufacturers and titles.
//!
//! # Examples
//!
//! ```rust
//! use canonical::NormalizeConfig;
//!
//! let config = NormalizeConfig::default();
//! assert!(config.is_stop_word("gmbh"));
//! assert!(!config.is_stop_word("sony"));
//! ```
//!
//! ## Custom stop-words
//!
//! ```rust
//! use canonical::NormalizeConfig;
//!
//! let config = NormalizeConfig {
//!     stop_words: vec!["corp".into(), "ag".into()],
//! };
//! assert!(config.validate().is_ok());
//! assert!(config.is_stop_word("ag"));
//! ```

use serde::{Deserialize, Serialize};

use crate::error::CanonicalError;

/// Words dropped by default after lowercasing and punctuation stripping.
pub const DEFAULT_STOP_WORDS: [&str; 9] = [
    "gmbh",
    "inc",
    "ltd",
    "uk",
    "corporation",
    "international",
    "llc",
    "co",
    "plc",
];

/// Configuration for the normalizer.
///
/// Cheap to clone and serde-friendly so it can be embedded in the YAML
/// configuration of the launcher.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NormalizeConfig {
    /// Exact words removed from every field. Compared after the word has been
    /// lowercased and stripped, so entries must themselves be lowercase.
    #[serde(default = "NormalizeConfig::default_stop_words")]
    pub stop_words: Vec<String>,
}

impl NormalizeConfig {
    pub fn default_stop_words() -> Vec<String> {
        DEFAULT_STOP_WORDS.iter().map(|w| w.to_string()).collect()
    }

    /// Rejects empty or non-lowercase stop-words, which could never match a
    /// normalized word.
    pub fn validate(&self) -> Result<(), CanonicalError> {
        for word in &self.stop_words {
            if word.trim().is_empty() {
                return Err(CanonicalError::InvalidConfig(
                    "stop_words must not contain empty entries".into(),
                ));
            }
            if word.to_lowercase() != *word {
                return Err(CanonicalError::InvalidConfig(format!(
                    "stop word {word:?} must be lowercase"
                )));
            }
        }
        Ok(())
    }

    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.iter().any(|w| w == word)
    }
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            stop_words: Self::default_stop_words(),
        }
    }
}
