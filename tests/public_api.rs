#![allow(unused_imports)]

use session_sync::{
    acquire, acquire_timeout, probe, reader_pipe_path, release, wait_until_unlocked,
    wait_until_unlocked_timeout, well_known_paths, EnvConfig, FileLock, Result, SessionFile,
    SessionFiles, SessionSyncError, DEFAULT_BASE_DIR, READER_PIPE_PREFIX,
};

#[cfg(unix)]
use session_sync::{set_raw, set_standard, ModeProfile, TermFlag, TerminalModeGuard};

#[test]
fn public_api_exports_compile() {}
