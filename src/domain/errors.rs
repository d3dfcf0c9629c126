//! Domain errors for the crafter exploration engine.

use thiserror::Error;

/// Domain-level errors that can occur while exploring combinations.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invalid mode: {0}")]
    InvalidMode(String),

    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    #[error("Invalid element: {0}")]
    InvalidElement(String),

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Persistence failed: {0}")]
    PersistenceFailed(String),

    #[error("Round {round} was cancelled before completion")]
    Cancelled { round: usize },
}

pub type DomainResult<T> = Result<T, DomainError>;

impl DomainError {
    /// Stable snake_case identifier for machine-readable output.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidMode(_) => "invalid_mode",
            Self::InvalidOptions(_) => "invalid_options",
            Self::InvalidElement(_) => "invalid_element",
            Self::ElementNotFound(_) => "element_not_found",
            Self::DatabaseError(_) => "database_error",
            Self::SerializationError(_) => "serialization_error",
            Self::PersistenceFailed(_) => "persistence_failed",
            Self::Cancelled { .. } => "cancelled",
        }
    }
}

impl From<sqlx::Error> for DomainError {
    fn from(err: sqlx::Error) -> Self {
        DomainError::DatabaseError(err.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::SerializationError(err.to_string())
    }
}

impl From<std::io::Error> for DomainError {
    fn from(err: std::io::Error) -> Self {
        DomainError::PersistenceFailed(err.to_string())
    }
}
