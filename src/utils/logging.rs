//! Logger bootstrap plus conditional logging macros gated by a module-level
//! `ENABLE_LOGS` flag.
//!
//! Usage:
//! ```ignore
//! // In your module, define the flag first:
//! const ENABLE_LOGS: bool = true;
//!
//! // Then use the macros (they're exported at the crate root):
//! use crate::{log_info, log_warn};
//!
//! log_info!("source {} produced {} segments", id, count);
//! ```

use std::sync::Once;

static INIT: Once = Once::new();

/// Initialize `env_logger` (reads RUST_LOG, defaults to info).
/// Safe to call more than once; only the first call installs the logger.
pub fn init_logging() {
    INIT.call_once(|| {
        let _ = env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .parse_default_env()
            .try_init();
    });
}

/// Conditional info logging.
/// The calling module must define `const ENABLE_LOGS: bool`.
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::info!($($arg)*);
        }
    };
}

/// Conditional debug logging, used for per-clip and per-instant detail.
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::debug!($($arg)*);
        }
    };
}

/// Conditional warn logging.
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::warn!($($arg)*);
        }
    };
}

/// Conditional error logging.
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::error!($($arg)*);
        }
    };
}
