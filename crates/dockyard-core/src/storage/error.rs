//! # Dockyard Storage System Errors
//!
//! Errors raised while reading, parsing, serializing and writing config
//! documents and settings files.
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageSystemError {
    #[error("I/O error during operation '{operation}' on path '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed XML{}: {message}", .path.as_ref().map(|p| format!(" in '{}'", p.display())).unwrap_or_default())]
    MalformedXml {
        path: Option<PathBuf>,
        message: String,
    },

    #[error("Invalid value '{value}' for <{element}>: {reason}")]
    InvalidValue {
        element: String,
        value: String,
        reason: String,
    },

    #[error("Serialization to '{format}' failed: {source}")]
    SerializationError {
        format: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    #[error("Deserialization from '{format}' failed: {source}")]
    DeserializationError {
        format: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },
}

// Helper for creating Io errors, ensuring path is always included.
impl StorageSystemError {
    pub fn io(source: std::io::Error, operation: impl Into<String>, path: PathBuf) -> Self {
        StorageSystemError::Io {
            source,
            operation: operation.into(),
            path,
        }
    }

    pub(crate) fn malformed(message: impl std::fmt::Display) -> Self {
        StorageSystemError::MalformedXml {
            path: None,
            message: message.to_string(),
        }
    }

    /// Attaches the originating file to a parse error.
    pub(crate) fn with_path(self, path: PathBuf) -> Self {
        match self {
            StorageSystemError::MalformedXml { message, .. } => StorageSystemError::MalformedXml {
                path: Some(path),
                message,
            },
            other => other,
        }
    }
}
