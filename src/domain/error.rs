//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent invalid input to the tree engine.
/// They are recovered by the session and surfaced as narration text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Please enter a key (integer).")]
    EmptyKey,

    #[error("'{0}' is not a valid integer.")]
    InvalidKey(String),
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
