//! Logger setup for the command-line tool.
//!
//! The library only emits through the `log` facade; binaries decide where it goes.

use crate::config::EnvConfig;

#[must_use]
pub fn default_filter(config: &EnvConfig) -> &'static str {
    if config.debug {
        "debug"
    } else {
        "warn"
    }
}

/// Installs `env_logger` on stderr. `RUST_LOG` overrides the config-derived default.
/// Calling it again is a no-op.
pub fn init(config: &EnvConfig) {
    let env = env_logger::Env::default().default_filter_or(default_filter(config));
    let _ = env_logger::Builder::from_env(env)
        .target(env_logger::Target::Stderr)
        .format_timestamp_millis()
        .try_init();
}
