use thiserror::Error;

/// Errors surfaced to callers of the store API.
///
/// Remote transport failures never appear here; the persistence gateway
/// absorbs them and falls back to the local mirror.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Constraint violation: {0}")]
    Constraint(String),

    #[error("Resource not found")]
    NotFound,

    #[error("Mirror storage error: {0}")]
    Mirror(#[from] anyhow::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;
