//! Errors for reading and writing constants files and column snapshots.
//!
//! [`StorageError`] wraps I/O and parse failures (as messages, so the type
//! stays `Clone`/`PartialEq` like the model errors) and forwards parameter and
//! column validation errors unchanged.
use std::path::PathBuf;

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*};

use crate::accretion::errors::{AccretionError, ParamError};

/// Result alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

#[derive(Debug, Clone, PartialEq)]
pub enum StorageError {
    /// File could not be opened, read, or written.
    Io { path: PathBuf, message: String },

    /// Constants file is not valid TOML or is missing keys.
    Toml { path: PathBuf, message: String },

    /// Snapshot is not valid JSON for a column.
    Json { path: PathBuf, message: String },

    /// Snapshot written by an incompatible version.
    UnsupportedFormat { found: u32, expected: u32 },

    /// Constants parsed but violate a bundle invariant.
    Param(ParamError),

    /// Stored layers do not form a valid column.
    Accretion(AccretionError),
}

impl std::error::Error for StorageError {}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::Io { path, message } => {
                write!(f, "I/O error on {}: {message}", path.display())
            }
            StorageError::Toml { path, message } => {
                write!(f, "Invalid constants file {}: {message}", path.display())
            }
            StorageError::Json { path, message } => {
                write!(f, "Invalid column snapshot {}: {message}", path.display())
            }
            StorageError::UnsupportedFormat { found, expected } => {
                write!(f, "Unsupported snapshot format version {found}; expected {expected}")
            }
            StorageError::Param(err) => write!(f, "Invalid parameters: {err}"),
            StorageError::Accretion(err) => write!(f, "Invalid column: {err}"),
        }
    }
}

impl From<ParamError> for StorageError {
    fn from(err: ParamError) -> Self {
        StorageError::Param(err)
    }
}

impl From<AccretionError> for StorageError {
    fn from(err: AccretionError) -> Self {
        match err {
            AccretionError::Param(inner) => StorageError::Param(inner),
            other => StorageError::Accretion(other),
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<StorageError> for PyErr {
    fn from(err: StorageError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
