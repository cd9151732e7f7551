//! # Dockyard Kernel Errors
//!
//! Defines the crate-wide [`Error`] type. Each subsystem keeps its own typed
//! error ([`PluginSystemError`], [`StorageSystemError`], [`UiBridgeError`]) and
//! converts into [`Error`] through `#[from]`, so operations in the kernel can
//! propagate any of them with `?`.
//!
//! [`ErrorKind`] flattens the variants into the failure taxonomy callers match
//! on (not initialized, invalid argument, parse error and so on).
use std::result::Result as StdResult;

use thiserror::Error as ThisError;

use crate::plugin_system::error::PluginSystemError;
use crate::storage::error::StorageSystemError;
use crate::ui_bridge::error::UiBridgeError;

/// Error type for Dockyard operations
#[derive(Debug, ThisError)]
pub enum Error {
    /// An operation that needs the application object ran before `init_app`.
    #[error("Operation '{operation}' requires an initialized application")]
    NotInitialized { operation: &'static str },

    /// `init_app` was called twice without an intervening `stop`.
    #[error("Application is already initialized")]
    AlreadyInitialized,

    /// Empty path, empty filename or otherwise unusable argument.
    #[error("Invalid argument for '{operation}': {message}")]
    InvalidArgument {
        operation: &'static str,
        message: String,
    },

    /// `run_main_window` or `save_config` without a main window.
    #[error("Operation '{operation}' requires a main window")]
    NoMainWindow { operation: &'static str },

    /// Specific, typed plugin system error
    #[error("Plugin system error: {0}")]
    PluginSystem(#[from] PluginSystemError),

    /// Specific, typed storage system error
    #[error("Storage system error: {0}")]
    StorageSystem(#[from] StorageSystemError),

    /// Toolkit / window composition error
    #[error("UI Bridge system error: {0}")]
    UiBridge(#[from] UiBridgeError),
}

/// Failure taxonomy shared by every public operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotInitialized,
    AlreadyInitialized,
    InvalidArgument,
    ParseError,
    ResolutionFailure,
    LoadFailure,
    IoFailure,
    NoMainWindow,
    Toolkit,
}

impl Error {
    pub fn invalid_argument(operation: &'static str, message: impl Into<String>) -> Self {
        Error::InvalidArgument {
            operation,
            message: message.into(),
        }
    }

    /// Classifies this error into the shared taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::NotInitialized { .. } => ErrorKind::NotInitialized,
            Error::AlreadyInitialized => ErrorKind::AlreadyInitialized,
            Error::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            Error::NoMainWindow { .. } => ErrorKind::NoMainWindow,
            Error::PluginSystem(e) => match e {
                PluginSystemError::NotFound { .. } => ErrorKind::ResolutionFailure,
                _ => ErrorKind::LoadFailure,
            },
            Error::StorageSystem(e) => match e {
                StorageSystemError::Io { .. } => ErrorKind::IoFailure,
                _ => ErrorKind::ParseError,
            },
            Error::UiBridge(_) => ErrorKind::Toolkit,
        }
    }
}

/// Shorthand for Result with our Error type
pub type Result<T> = StdResult<T, Error>;
