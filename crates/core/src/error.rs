//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Every variant is terminal for the call that produced it: nothing is retried
/// internally, and callers report it upward unchanged. Authorization and
/// validation run before any stock or order write, so an `Err` means no entity
/// was touched.
///
/// Running into a cart stock limit is *not* an error; see the `CartUpdate`
/// outcome in `shelfwise-sales`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Malformed or missing input (customer fields, empty cart, blank names).
    #[error("validation failed: {0}")]
    Validation(String),

    /// The acting identity lacks the permission the operation requires.
    #[error("unauthorized: '{actor}' lacks permission '{permission}'")]
    Unauthorized { actor: String, permission: String },

    /// Unknown product, order, category or variant.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// A lifecycle rule refused the operation (e.g. leaving a terminal status).
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn unauthorized(actor: impl Into<String>, permission: impl Into<String>) -> Self {
        Self::Unauthorized {
            actor: actor.into(),
            permission: permission.into(),
        }
    }

    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
