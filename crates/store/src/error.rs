//! Storage error types

use std::path::PathBuf;

use thiserror::Error;

/// Storage error types
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O failed for {path}: {reason}")]
    Io { path: PathBuf, reason: String },

    #[error("File {path} already exists, enable force_override to overwrite it")]
    AlreadyExists { path: PathBuf },

    #[error("No data file found: {path}")]
    NotFound { path: PathBuf },

    #[error("serialization failed: {reason}")]
    Serialization { reason: String },

    #[error("deserialization failed: {reason}")]
    Deserialization { reason: String },

    #[error("compression failed: {reason}")]
    Compression { reason: String },

    #[error("decompression failed: {reason}")]
    Decompression { reason: String },

    #[error("version mismatch: expected v{expected}, found v{found}")]
    VersionMismatch { expected: u32, found: u32 },

    #[error("invalid graph data: {reason}")]
    InvalidData { reason: String },

    #[error("CSV export failed: {reason}")]
    Csv { reason: String },
}

impl StoreError {
    pub fn io(path: impl Into<PathBuf>, error: &std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            reason: error.to_string(),
        }
    }

    pub fn serialization(reason: impl Into<String>) -> Self {
        Self::Serialization {
            reason: reason.into(),
        }
    }

    pub fn deserialization(reason: impl Into<String>) -> Self {
        Self::Deserialization {
            reason: reason.into(),
        }
    }

    pub fn compression(reason: impl Into<String>) -> Self {
        Self::Compression {
            reason: reason.into(),
        }
    }

    pub fn decompression(reason: impl Into<String>) -> Self {
        Self::Decompression {
            reason: reason.into(),
        }
    }

    pub fn invalid_data(reason: impl Into<String>) -> Self {
        Self::InvalidData {
            reason: reason.into(),
        }
    }

    pub fn csv(reason: impl Into<String>) -> Self {
        Self::Csv {
            reason: reason.into(),
        }
    }
}

/// Result type for storage operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;
