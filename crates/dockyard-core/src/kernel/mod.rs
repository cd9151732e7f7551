//! # Dockyard Kernel
//!
//! The `kernel` module drives the shell: it owns the application lifecycle and
//! dispatches to the different run modes.
//!
//! ## Key Responsibilities & Components:
//!
//! - **Orchestration**: [`ApplicationController`](bootstrap::ApplicationController)
//!   in the `bootstrap` submodule implements `init_app`/`stop`, config and
//!   plugin loading, window composition, dialog runs and persistence.
//! - **State**: [`ApplicationContext`](context::ApplicationContext) holds the
//!   toolkit object, main window, plugin registry, loader and settings.
//! - **Signals**: the `signal` submodule turns Ctrl-C into a
//!   [`ShutdownSignal`](signal::ShutdownSignal) the event loops poll.
//! - **Logging**: verbosity levels mapped onto `env_logger`, in `logging`.
//! - **Core Constants** and **Error Handling** ([`Error`](error::Error),
//!   [`ErrorKind`](error::ErrorKind) and a `Result` alias).
pub mod bootstrap;
pub mod constants;
pub mod context;
pub mod error;
pub mod logging;
pub mod signal;

pub use bootstrap::{ApplicationController, LoadReport};
pub use context::{ApplicationContext, LifecycleState};
pub use error::{Error, ErrorKind, Result};
pub use signal::ShutdownSignal;

// Test module declaration
#[cfg(test)]
mod tests;
