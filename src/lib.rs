//! Synchronisation and naming primitives for a session directory shared by several
//! processes (a session driver, a session server and any number of readers).
//!
//! - [`lock`]: advisory whole-file locks used as mutex and barrier.
//! - [`platform`]: raw/standard line-discipline switching for terminal descriptors.
//! - [`paths`]: the fixed file and pipe names inside a session directory.
//!
//! The pieces share no state; they compose only through the filesystem.

pub mod config;
pub mod error;
pub mod lock;
pub mod logging;
pub mod paths;
pub mod platform;

pub use crate::config::{EnvConfig, DEFAULT_BASE_DIR};
pub use crate::error::{Result, SessionSyncError};
pub use crate::lock::{
    acquire, acquire_timeout, probe, release, wait_until_unlocked, wait_until_unlocked_timeout,
    FileLock,
};
pub use crate::paths::{
    reader_pipe_path, well_known_paths, SessionFile, SessionFiles, READER_PIPE_PREFIX,
};
#[cfg(unix)]
pub use crate::platform::{set_raw, set_standard, ModeProfile, TermFlag, TerminalModeGuard};
