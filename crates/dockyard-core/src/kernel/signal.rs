//! Interrupt handling.
//!
//! The handler never tears anything down itself: it flips a
//! [`ShutdownSignal`] that the main-thread loops poll. A single watcher
//! thread per process awaits Ctrl-C on a current-thread tokio runtime and
//! forwards each interrupt to the most recently installed signal.
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;

use log::{error, info};

/// Shared "shutdown requested" flag.
#[derive(Debug, Clone, Default)]
pub struct ShutdownSignal {
    requested: Arc<AtomicBool>,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Asks the main loop to wind down. Safe to call from any thread.
    pub fn request(&self) {
        self.requested.store(true, Ordering::SeqCst);
    }

    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }

    pub fn reset(&self) {
        self.requested.store(false, Ordering::SeqCst);
    }
}

static WATCHER_RUNNING: Mutex<bool> = Mutex::new(false);
static TARGET: Mutex<Option<ShutdownSignal>> = Mutex::new(None);

/// Routes Ctrl-C to `signal`, starting the watcher thread if none is running.
///
/// A failed start is reported and retried by the next call.
pub fn install_interrupt_handler(signal: &ShutdownSignal) -> io::Result<()> {
    *TARGET.lock().unwrap_or_else(PoisonError::into_inner) = Some(signal.clone());

    let mut running = WATCHER_RUNNING.lock().unwrap_or_else(PoisonError::into_inner);
    ensure_watcher(&mut running, spawn_watcher)
}

/// Runs `spawn` unless a watcher is already running, and records whether one now is.
pub(crate) fn ensure_watcher<F>(running: &mut bool, spawn: F) -> io::Result<()>
where
    F: FnOnce() -> io::Result<()>,
{
    if *running {
        return Ok(());
    }
    spawn()?;
    *running = true;
    Ok(())
}

/// Stops forwarding interrupts. The watcher thread stays parked on its runtime.
pub fn clear_interrupt_target() {
    TARGET.lock().unwrap_or_else(PoisonError::into_inner).take();
}

fn spawn_watcher() -> io::Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    thread::Builder::new()
        .name("dockyard-signal".to_string())
        .spawn(move || {
            runtime.block_on(async {
                loop {
                    if let Err(e) = tokio::signal::ctrl_c().await {
                        error!("Failed to listen for interrupt signal: {}", e);
                        break;
                    }
                    let target = TARGET.lock().unwrap_or_else(PoisonError::into_inner).clone();
                    match target {
                        Some(signal) => {
                            info!("Interrupt received, requesting shutdown");
                            signal.request();
                        }
                        None => info!("Interrupt received with nothing running"),
                    }
                }
            });
        })?;
    Ok(())
}
