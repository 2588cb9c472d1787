use crate::error::StoreError;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

/// Exclusive write lock on a record file.
///
/// Holding `<target>.lock` (created with `create_new`) excludes every other
/// writer of the same record. Contents written to the lock replace the
/// target on [`Lockfile::commit`] by rename; an uncommitted lock is removed
/// on drop and the target is left untouched.
pub struct Lockfile {
    target: PathBuf,
    lock_path: PathBuf,
    file: Option<fs::File>,
}

impl Lockfile {
    /// Acquire the lock or fail immediately with `LockConflict`.
    pub fn acquire(target: impl AsRef<Path>) -> Result<Self, StoreError> {
        let target = target.as_ref().to_path_buf();
        let lock_path = target.with_extension(
            target
                .extension()
                .map(|e| format!("{}.lock", e.to_string_lossy()))
                .unwrap_or_else(|| "lock".to_string()),
        );

        if let Some(parent) = lock_path.parent() {
            fs::create_dir_all(parent)?;
        }

        match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&lock_path)
        {
            Ok(file) => Ok(Self {
                target,
                lock_path,
                file: Some(file),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                Err(StoreError::LockConflict(lock_path.display().to_string()))
            }
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    /// Acquire, waiting out other writers for up to `attempts` tries.
    ///
    /// Record writers hold the lock for a single read-check-write, so
    /// contention clears quickly.
    pub fn acquire_with_retry(
        target: impl AsRef<Path>,
        attempts: u32,
        pause: Duration,
    ) -> Result<Self, StoreError> {
        let target = target.as_ref();
        let mut last = None;
        for _ in 0..attempts.max(1) {
            match Self::acquire(target) {
                Ok(lock) => return Ok(lock),
                Err(StoreError::LockConflict(path)) => {
                    last = Some(path);
                    thread::sleep(pause);
                }
                Err(e) => return Err(e),
            }
        }
        Err(StoreError::LockConflict(
            last.unwrap_or_else(|| target.display().to_string()),
        ))
    }

    pub fn write_all(&mut self, data: &[u8]) -> Result<(), StoreError> {
        if let Some(ref mut file) = self.file {
            file.write_all(data)?;
            file.flush()?;
            Ok(())
        } else {
            Err(StoreError::LockConflict(
                "lock file already committed or dropped".into(),
            ))
        }
    }

    /// Atomically replace the target with the lock's contents.
    pub fn commit(mut self) -> Result<(), StoreError> {
        self.file.take();
        fs::rename(&self.lock_path, &self.target)?;
        Ok(())
    }

    /// Release without writing anything.
    pub fn release(self) {}
}

impl Drop for Lockfile {
    fn drop(&mut self) {
        if self.file.is_some() {
            let _ = fs::remove_file(&self.lock_path);
        }
    }
}
