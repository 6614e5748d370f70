//! Logger installation.
//!
//! Natively the `env_logger` backend is used; a non-empty `RUST_LOG` takes
//! precedence over the configured level. In the browser, records go to the
//! console.

use crate::config::LogLevel;

/// Install the platform logger at `level`.
///
/// Returns `false` if a logger was already installed. The maximum level is
/// updated either way unless `RUST_LOG` is in charge.
pub fn init(level: LogLevel) -> bool {
    let installed = install(level);
    if configured_level_applies(env_filter()) {
        set_level(level);
    }
    if installed {
        log::debug!("Logging initialized at {}", level.name());
    }
    installed
}

/// Change the maximum level of the installed logger.
pub fn set_level(level: LogLevel) {
    log::set_max_level(level.to_level_filter());
}

/// The configured level is ignored while a non-empty `RUST_LOG` is set.
fn configured_level_applies(env_filter: Option<String>) -> bool {
    env_filter.is_none_or(|filter| filter.trim().is_empty())
}

#[cfg(not(target_arch = "wasm32"))]
fn env_filter() -> Option<String> {
    std::env::var("RUST_LOG").ok()
}

#[cfg(target_arch = "wasm32")]
fn env_filter() -> Option<String> {
    None
}

#[cfg(not(target_arch = "wasm32"))]
fn install(level: LogLevel) -> bool {
    env_logger::Builder::new()
        .filter_level(level.to_level_filter())
        .parse_default_env()
        .try_init()
        .is_ok()
}

#[cfg(target_arch = "wasm32")]
fn install(level: LogLevel) -> bool {
    console_log::init_with_level(level.to_level()).is_ok()
}
