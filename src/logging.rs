//! Diagnostic logging setup.
//!
//! Log output goes to stderr through `env_logger`, filtered by the
//! `SWAGCHECK_LOG` environment variable (same syntax as `RUST_LOG`).

use env_logger::Env;

/// Environment variable holding the log filter
pub const LOG_ENV: &str = "SWAGCHECK_LOG";

/// Initialize the global logger. `verbose` lowers the default level to
/// `debug`; an explicit `SWAGCHECK_LOG` always wins. Calling this twice is
/// harmless.
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };

    let result = env_logger::Builder::from_env(Env::new().filter_or(LOG_ENV, default_level))
        .format_timestamp(None)
        .format_target(false)
        .try_init();

    if result.is_err() {
        log::debug!("Logger already initialized");
    }
}
