//! Storage-specific error types.
//!
//! These errors stay inside the storage layer and are converted to
//! `prospere_core::Error` before being returned to callers.

use prospere_core::errors::Error;
use std::sync::PoisonError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage lock poisoned: {0}")]
    LockPoisoned(String),

    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("Record not found: {0}")]
    NotFound(String),
}

impl<T> From<PoisonError<T>> for StorageError {
    fn from(err: PoisonError<T>) -> Self {
        StorageError::LockPoisoned(err.to_string())
    }
}

impl From<StorageError> for Error {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::LockPoisoned(e) => Error::Repository(e),
            StorageError::UniqueViolation(e) => Error::ConstraintViolation(e),
            StorageError::NotFound(e) => Error::NotFound(e),
        }
    }
}
