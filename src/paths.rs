//! Names of the files and pipes that make up one session directory.
//!
//! Everything here is pure path arithmetic; nothing touches the filesystem.

use std::path::{Path, PathBuf};

pub const READER_PIPE_PREFIX: &str = "outpipe-";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionFile {
    ShellPid,
    Status,
    Output,
    InPipe,
    CtrlPipe,
    LockServerRunning,
    LockClientStarting,
    ServerLog,
}

impl SessionFile {
    /// Every well-known file, in canonical order.
    pub const ALL: [SessionFile; 8] = [
        SessionFile::ShellPid,
        SessionFile::Status,
        SessionFile::Output,
        SessionFile::InPipe,
        SessionFile::CtrlPipe,
        SessionFile::LockServerRunning,
        SessionFile::LockClientStarting,
        SessionFile::ServerLog,
    ];

    #[must_use]
    pub fn file_name(self) -> &'static str {
        match self {
            Self::ShellPid => "shell-pid",
            Self::Status => "status",
            Self::Output => "output",
            Self::InPipe => "inpipe",
            Self::CtrlPipe => "ctrlpipe",
            Self::LockServerRunning => "lock-server-running",
            Self::LockClientStarting => "lock-client-starting",
            Self::ServerLog => "server-log",
        }
    }

    #[must_use]
    pub fn path_in(self, base_dir: &Path) -> PathBuf {
        base_dir.join(self.file_name())
    }
}

#[must_use]
pub fn well_known_paths(base_dir: impl AsRef<Path>) -> Vec<PathBuf> {
    let base_dir = base_dir.as_ref();
    SessionFile::ALL
        .iter()
        .map(|file| file.path_in(base_dir))
        .collect()
}

#[must_use]
pub fn reader_pipe_path(base_dir: impl AsRef<Path>, reader_id: &str) -> PathBuf {
    base_dir
        .as_ref()
        .join(format!("{READER_PIPE_PREFIX}{reader_id}"))
}

/// Named view over one session directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionFiles {
    base_dir: PathBuf,
}

impl SessionFiles {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    #[must_use]
    pub fn path(&self, file: SessionFile) -> PathBuf {
        file.path_in(&self.base_dir)
    }

    #[must_use]
    pub fn shell_pid(&self) -> PathBuf {
        self.path(SessionFile::ShellPid)
    }

    #[must_use]
    pub fn status(&self) -> PathBuf {
        self.path(SessionFile::Status)
    }

    #[must_use]
    pub fn output(&self) -> PathBuf {
        self.path(SessionFile::Output)
    }

    #[must_use]
    pub fn inpipe(&self) -> PathBuf {
        self.path(SessionFile::InPipe)
    }

    #[must_use]
    pub fn ctrlpipe(&self) -> PathBuf {
        self.path(SessionFile::CtrlPipe)
    }

    #[must_use]
    pub fn lock_server_running(&self) -> PathBuf {
        self.path(SessionFile::LockServerRunning)
    }

    #[must_use]
    pub fn lock_client_starting(&self) -> PathBuf {
        self.path(SessionFile::LockClientStarting)
    }

    #[must_use]
    pub fn server_log(&self) -> PathBuf {
        self.path(SessionFile::ServerLog)
    }

    #[must_use]
    pub fn all(&self) -> Vec<PathBuf> {
        well_known_paths(&self.base_dir)
    }

    #[must_use]
    pub fn reader_pipe(&self, reader_id: &str) -> PathBuf {
        reader_pipe_path(&self.base_dir, reader_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_known_paths_are_in_canonical_order() {
        let paths = well_known_paths("/tmp/sess1");
        let expected: Vec<PathBuf> = [
            "/tmp/sess1/shell-pid",
            "/tmp/sess1/status",
            "/tmp/sess1/output",
            "/tmp/sess1/inpipe",
            "/tmp/sess1/ctrlpipe",
            "/tmp/sess1/lock-server-running",
            "/tmp/sess1/lock-client-starting",
            "/tmp/sess1/server-log",
        ]
        .iter()
        .map(PathBuf::from)
        .collect();
        assert_eq!(paths, expected);
    }

    #[test]
    fn reader_pipe_uses_outpipe_prefix() {
        assert_eq!(
            reader_pipe_path("/tmp/sess1", "r7"),
            PathBuf::from("/tmp/sess1/outpipe-r7")
        );
        assert_eq!(
            reader_pipe_path("relative", ""),
            PathBuf::from("relative/outpipe-")
        );
    }

    #[test]
    fn derivation_is_pure() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let base = dir.path().join("not-yet-created");

        assert_eq!(well_known_paths(&base), well_known_paths(&base));
        assert_eq!(reader_pipe_path(&base, "a"), reader_pipe_path(&base, "a"));
        assert!(!base.exists());
    }

    #[test]
    fn named_view_matches_ordered_list() {
        let files = SessionFiles::new("/tmp/sess1");
        assert_eq!(
            files.all(),
            vec![
                files.shell_pid(),
                files.status(),
                files.output(),
                files.inpipe(),
                files.ctrlpipe(),
                files.lock_server_running(),
                files.lock_client_starting(),
                files.server_log(),
            ]
        );
        assert_eq!(files.reader_pipe("r7"), reader_pipe_path("/tmp/sess1", "r7"));
        assert_eq!(files.base_dir(), Path::new("/tmp/sess1"));
    }
}
