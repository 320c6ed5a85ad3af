use std::os::fd::RawFd;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

pub type Result<T, E = SessionSyncError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum SessionSyncError {
    #[error("I/O error while {operation} at {path}: {source}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("lock error while {operation} on {path}: {source}")]
    Lock {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("terminal error during {operation} on fd {fd}: {source}")]
    Terminal {
        operation: &'static str,
        fd: RawFd,
        #[source]
        source: std::io::Error,
    },

    #[error("timed out after {waited:?} waiting for lock on {path}")]
    Timeout { path: PathBuf, waited: Duration },
}

impl SessionSyncError {
    #[must_use]
    pub fn io(operation: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }

    #[must_use]
    pub fn lock(operation: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Lock {
            operation,
            path: path.into(),
            source,
        }
    }

    #[must_use]
    pub fn terminal(operation: &'static str, fd: RawFd, source: std::io::Error) -> Self {
        Self::Terminal {
            operation,
            fd,
            source,
        }
    }

    /// Kind of the underlying I/O failure. Timeouts report `TimedOut`.
    #[must_use]
    pub fn io_kind(&self) -> std::io::ErrorKind {
        match self {
            Self::Io { source, .. } | Self::Lock { source, .. } | Self::Terminal { source, .. } => {
                source.kind()
            }
            Self::Timeout { .. } => std::io::ErrorKind::TimedOut,
        }
    }
}

impl From<SessionSyncError> for std::io::Error {
    fn from(error: SessionSyncError) -> Self {
        std::io::Error::new(error.io_kind(), error)
    }
}

#[cfg(test)]
mod tests {
    use super::SessionSyncError;
    use std::io::ErrorKind;
    use std::time::Duration;

    #[test]
    fn io_kind_follows_source() {
        let error = SessionSyncError::io(
            "opening lock file",
            "/nope/lock",
            std::io::Error::from(ErrorKind::NotFound),
        );
        assert_eq!(error.io_kind(), ErrorKind::NotFound);
        assert_eq!(
            error.to_string(),
            "I/O error while opening lock file at /nope/lock: entity not found"
        );
    }

    #[test]
    fn timeout_converts_to_timed_out_io_error() {
        let error = SessionSyncError::Timeout {
            path: "/tmp/l".into(),
            waited: Duration::from_millis(20),
        };
        let io: std::io::Error = error.into();
        assert_eq!(io.kind(), ErrorKind::TimedOut);
        assert!(io.to_string().contains("/tmp/l"));
    }
}
