//! # Dockyard UI Bridge Errors
//!
//! Failures reported by a [`Toolkit`](super::Toolkit) backend or by window
//! composition (unknown dock handles, unreadable layout state).
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UiBridgeError {
    #[error("Toolkit '{toolkit}' failed during '{operation}': {message}")]
    ToolkitFailure {
        toolkit: String,
        operation: String,
        message: String,
    },

    #[error("No dock with handle {0}")]
    UnknownDock(u64),

    #[error("Layout state could not be restored: {0}")]
    InvalidLayoutState(String),
}

impl UiBridgeError {
    pub fn toolkit(
        toolkit: impl Into<String>,
        operation: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        UiBridgeError::ToolkitFailure {
            toolkit: toolkit.into(),
            operation: operation.into(),
            message: message.into(),
        }
    }
}
