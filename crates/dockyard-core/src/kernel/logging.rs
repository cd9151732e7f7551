//! Console logging setup.
//!
//! Verbosity levels: 0 off, 1 error, 2 warn, 3 info, 4 debug. Values above
//! [`MAX_VERBOSITY`](constants::MAX_VERBOSITY) are clamped.
use log::LevelFilter;

use crate::kernel::constants;

pub fn level_filter(verbosity: u8) -> LevelFilter {
    match verbosity.min(constants::MAX_VERBOSITY) {
        0 => LevelFilter::Off,
        1 => LevelFilter::Error,
        2 => LevelFilter::Warn,
        3 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    }
}

/// Installs `env_logger` at `verbosity`.
///
/// A second call, or a logger installed elsewhere, is not an error: the level
/// is still applied.
pub fn init(verbosity: u8) {
    let filter = level_filter(verbosity);
    let result = env_logger::Builder::new()
        .filter_level(LevelFilter::Trace)
        .format_timestamp_millis()
        .try_init();
    if result.is_err() {
        log::debug!("Logger already installed; only adjusting the level");
    }
    log::set_max_level(filter);
}

/// Changes the active level. Takes effect for every subsequent log call.
pub fn set_verbosity(verbosity: u8) {
    if verbosity > constants::MAX_VERBOSITY {
        log::warn!(
            "Verbosity {} out of range, clamping to {}",
            verbosity,
            constants::MAX_VERBOSITY
        );
    }
    log::set_max_level(level_filter(verbosity));
}
