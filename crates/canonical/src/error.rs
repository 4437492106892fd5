use thiserror::Error;

/// Errors raised when validating normalizer configuration.
///
/// Normalizing text itself never fails: malformed input degenerates to an
/// empty field.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CanonicalError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
