//! Environment configuration.
//!
//! Resolved once at startup and passed down explicitly; library code never reads the
//! environment on its own.

use std::env;
use std::path::PathBuf;

pub const DEFAULT_BASE_DIR: &str = "/tmp";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvConfig {
    /// Default root for session directories (`TMPDIR`, else `/tmp`).
    pub base_dir: PathBuf,
    pub debug: bool,
}

impl EnvConfig {
    pub fn from_env() -> Self {
        Self {
            base_dir: non_blank_var("TMPDIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_BASE_DIR)),
            debug: non_blank_var("SESSION_SYNC_DEBUG").as_deref() == Some("1"),
        }
    }

    #[must_use]
    pub fn session_dir(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from(DEFAULT_BASE_DIR),
            debug: false,
        }
    }
}

fn non_blank_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}
