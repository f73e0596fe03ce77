//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// resolution, verification). Infrastructure concerns belong to the store layer
/// and are mapped into `Persistence` at the engine boundary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Bad input shape (e.g. missing product, zero box count).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A scanned code resolved to nothing.
    #[error("not found: {0}")]
    NotFound(String),

    /// A unit was found but is not in an actionable status.
    #[error("unavailable: {0}")]
    Unavailable(String),

    /// Check-out submitted before every box was verified.
    #[error("verification incomplete: {0}")]
    IncompleteVerification(String),

    /// The unit was already transitioned by an earlier submit.
    #[error("already processed: {0}")]
    AlreadyProcessed(String),

    /// The underlying store failed; in-memory session state is preserved.
    #[error("persistence failure: {0}")]
    Persistence(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    pub fn incomplete(msg: impl Into<String>) -> Self {
        Self::IncompleteVerification(msg.into())
    }

    pub fn already_processed(msg: impl Into<String>) -> Self {
        Self::AlreadyProcessed(msg.into())
    }

    pub fn persistence(msg: impl Into<String>) -> Self {
        Self::Persistence(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    /// Stable machine-readable error code for UI feedback.
    ///
    /// The `Display` impl carries the human message; this carries the kind, so
    /// callers can render targeted feedback without string matching.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::NotFound(_) => "not_found",
            Self::Unavailable(_) => "unavailable",
            Self::IncompleteVerification(_) => "incomplete_verification",
            Self::AlreadyProcessed(_) => "already_processed",
            Self::Persistence(_) => "persistence",
            Self::InvalidId(_) => "invalid_id",
        }
    }
}
