// src/log.rs
//
// File logging for both frontends. Everything lands in `.store/debug.log`;
// the level comes from `LEAD_SEARCH_LOG` (EnvFilter syntax), default `info`.
//
// The short macros are what the rest of the crate calls:
//   logf! → info, logd! → debug, logw! → warn, loge! → error

use std::sync::OnceLock;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::consts::{LOG_ENV, LOG_FILE, STORE_DIR};

#[doc(hidden)]
pub use tracing as __tracing;

static INIT: OnceLock<()> = OnceLock::new();

/// Install the global subscriber. Safe to call more than once.
pub fn init() {
    INIT.get_or_init(|| {
        let _ = std::fs::create_dir_all(STORE_DIR);
        let appender = tracing_appender::rolling::never(STORE_DIR, LOG_FILE);
        let filter = EnvFilter::try_from_env(LOG_ENV)
            .unwrap_or_else(|_| EnvFilter::new("info"));

        // try_init: tests and the CLI may already have a subscriber
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(appender).with_ansi(false).with_target(false))
            .try_init();
    });
}

/// Info-level logging
#[macro_export]
macro_rules! logf {
    ($($arg:tt)*) => {
        $crate::log::__tracing::info!($($arg)*)
    };
}

/// Debug-level logging
#[macro_export]
macro_rules! logd {
    ($($arg:tt)*) => {
        $crate::log::__tracing::debug!($($arg)*)
    };
}

/// Warn-level logging
#[macro_export]
macro_rules! logw {
    ($($arg:tt)*) => {
        $crate::log::__tracing::warn!($($arg)*)
    };
}

/// Error-level logging
#[macro_export]
macro_rules! loge {
    ($($arg:tt)*) => {
        $crate::log::__tracing::error!($($arg)*)
    };
}
