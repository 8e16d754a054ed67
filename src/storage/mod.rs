use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage not ready")]
    NotReady,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Append-only line storage.
///
/// Every append is a complete open-append-write-close cycle; no handle is
/// held between calls, so a reset loses at most the line being written.
pub trait Storage {
    fn is_ready(&self) -> bool;

    fn append_line(&self, name: &str, line: &str) -> Result<(), StorageError>;
}

/// Files under a base directory (typically the card's mount point).
pub struct DirectoryStorage {
    base: PathBuf,
}

impl DirectoryStorage {
    pub fn new(base: PathBuf) -> Self {
        DirectoryStorage { base }
    }

    /// Creates the base directory if it does not exist yet.
    pub fn create(base: PathBuf) -> Result<Self, StorageError> {
        fs::create_dir_all(&base)?;
        Ok(DirectoryStorage { base })
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.base.join(name)
    }
}

impl Storage for DirectoryStorage {
    fn is_ready(&self) -> bool {
        self.base.is_dir()
    }

    fn append_line(&self, name: &str, line: &str) -> Result<(), StorageError> {
        if !self.is_ready() {
            return Err(StorageError::NotReady);
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.path(name))?;
        writeln!(file, "{}", line)?;
        file.sync_data()?;
        Ok(())
    }
}
