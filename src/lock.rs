//! Advisory whole-file locks shared between cooperating processes.
//!
//! Locks are `flock`-style: they belong to the open file description, so two handles
//! opened independently (even inside one process) contend, while threads sharing a
//! single [`FileLock`] do not exclude each other.

use std::fs::{File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use fs2::FileExt;

use crate::error::{Result, SessionSyncError};

const POLL_INITIAL: Duration = Duration::from_millis(1);
const POLL_MAX: Duration = Duration::from_millis(50);

/// An exclusively held lock file. Dropping it closes the handle, which also releases
/// the lock; [`FileLock::release`] does the same but reports unlock failures.
#[derive(Debug)]
pub struct FileLock {
    file: File,
    path: PathBuf,
}

impl FileLock {
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn release(self) -> Result<()> {
        log::debug!(
            "releasing lock {} (pid {}, thread {:?})",
            self.path.display(),
            std::process::id(),
            thread::current().id()
        );
        FileExt::unlock(&self.file)
            .map_err(|source| SessionSyncError::lock("unlocking", &self.path, source))?;
        drop(self.file);
        log::debug!("released lock {}", self.path.display());
        Ok(())
    }
}

/// Opens `path` (creating it if absent) and blocks until an exclusive lock is held.
///
/// There is no timeout: a holder that never releases blocks the caller until that
/// holder exits. Use [`acquire_timeout`] for a bounded wait.
pub fn acquire(path: impl AsRef<Path>) -> Result<FileLock> {
    let path = path.as_ref();
    let file = open_lock_file(path)?;
    log::debug!(
        "waiting for exclusive lock {} (pid {}, thread {:?})",
        path.display(),
        std::process::id(),
        thread::current().id()
    );
    FileExt::lock_exclusive(&file)
        .map_err(|source| SessionSyncError::lock("acquiring exclusive lock", path, source))?;
    log::debug!("lock obtained {}", path.display());
    Ok(FileLock {
        file,
        path: path.to_path_buf(),
    })
}

/// Like [`acquire`], but gives up with [`SessionSyncError::Timeout`] once `timeout`
/// has elapsed without obtaining the lock.
pub fn acquire_timeout(path: impl AsRef<Path>, timeout: Duration) -> Result<FileLock> {
    let path = path.as_ref();
    let file = open_lock_file(path)?;
    let started = Instant::now();
    let mut delay = POLL_INITIAL;

    loop {
        if try_lock(&file, path)? {
            log::debug!(
                "lock obtained {} after {:?}",
                path.display(),
                started.elapsed()
            );
            return Ok(FileLock {
                file,
                path: path.to_path_buf(),
            });
        }

        let waited = started.elapsed();
        if waited >= timeout {
            return Err(SessionSyncError::Timeout {
                path: path.to_path_buf(),
                waited,
            });
        }
        thread::sleep(delay.min(timeout - waited));
        delay = (delay * 2).min(POLL_MAX);
    }
}

/// Releases a lock obtained from [`acquire`].
pub fn release(lock: FileLock) -> Result<()> {
    lock.release()
}

/// Reports whether some other handle currently holds `path` exclusively.
///
/// Never blocks and never leaves a lock behind. A missing file counts as unlocked.
pub fn probe(path: impl AsRef<Path>) -> Result<bool> {
    let path = path.as_ref();
    let file = match OpenOptions::new().read(true).write(true).open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(false),
        Err(source) => return Err(SessionSyncError::io("opening lock file", path, source)),
    };

    if !try_lock(&file, path)? {
        return Ok(true);
    }
    FileExt::unlock(&file)
        .map_err(|source| SessionSyncError::lock("unlocking probe", path, source))?;
    Ok(false)
}

/// Barrier: blocks until nobody holds `path`, then returns without keeping the lock.
pub fn wait_until_unlocked(path: impl AsRef<Path>) -> Result<()> {
    acquire(path)?.release()
}

/// Bounded form of [`wait_until_unlocked`].
pub fn wait_until_unlocked_timeout(path: impl AsRef<Path>, timeout: Duration) -> Result<()> {
    acquire_timeout(path, timeout)?.release()
}

// O_CREAT without O_EXCL: racing creators both succeed on the same file.
fn open_lock_file(path: &Path) -> Result<File> {
    OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)
        .map_err(|source| SessionSyncError::io("opening lock file", path, source))
}

fn try_lock(file: &File, path: &Path) -> Result<bool> {
    match FileExt::try_lock_exclusive(file) {
        Ok(()) => Ok(true),
        Err(err) if is_contended(&err) => Ok(false),
        Err(source) => Err(SessionSyncError::lock(
            "trying exclusive lock",
            path,
            source,
        )),
    }
}

fn is_contended(err: &std::io::Error) -> bool {
    err.kind() == ErrorKind::WouldBlock
        || err.raw_os_error() == fs2::lock_contended_error().raw_os_error()
}
