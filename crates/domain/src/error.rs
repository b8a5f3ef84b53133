//! Unified error types for the domain layer
//!
//! Provides a common error type for domain operations, so engine code can
//! propagate failures with `?` instead of passing strings around.

use thiserror::Error;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Entity referenced by an unknown identifier
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Operation is not valid for the current state
    #[error("Invalid state: {0}")]
    InvalidState(String),
}

impl DomainError {
    /// Create a not found error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Create an invalid state error
    ///
    /// # Example
    /// ```ignore
    /// if player.character.is_none() {
    ///     return Err(DomainError::invalid_state("Player has no character"));
    /// }
    /// ```
    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
