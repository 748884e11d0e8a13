//! Domain error model.

use thiserror::Error;

/// Domain-level error.
///
/// Business-rule violations are *not* errors in this system: they are recorded
/// on a [`crate::Notifier`]. What remains is malformed input that cannot even
/// be turned into a domain value.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }
}
