//! Directory-backed share storage, one file per share.
//!
//! Frames are stored verbatim as `share_<index>.dat` with mode 0600 under
//! a directory created with mode 0700 (permission bits apply on unix; on
//! other platforms the files are created with default permissions). A
//! single in-process reader/writer lock serializes the filesystem
//! operations; nothing guards against other processes touching the
//! directory.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use super::{ShareStore, StorageError};

const FILE_PREFIX: &str = "share_";
const FILE_SUFFIX: &str = ".dat";

#[derive(Debug)]
pub struct DirectoryStore {
    dir: PathBuf,
    lock: RwLock<()>,
}

impl DirectoryStore {
    /// Opens (creating if needed) the share directory.
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self, StorageError> {
        let dir = dir.as_ref().to_path_buf();
        create_dir_restricted(&dir)?;
        Ok(Self {
            dir,
            lock: RwLock::new(()),
        })
    }

    fn share_path(&self, index: u8) -> PathBuf {
        self.dir.join(format!("{}{}{}", FILE_PREFIX, index, FILE_SUFFIX))
    }
}

#[cfg(unix)]
fn create_dir_restricted(dir: &Path) -> Result<(), StorageError> {
    use std::os::unix::fs::DirBuilderExt;
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true).mode(0o700);
    builder.create(dir)?;
    Ok(())
}

#[cfg(not(unix))]
fn create_dir_restricted(dir: &Path) -> Result<(), StorageError> {
    fs::create_dir_all(dir)?;
    Ok(())
}

#[cfg(unix)]
fn write_restricted(path: &Path, frame: &[u8]) -> std::io::Result<()> {
    use std::io::Write;
    use std::os::unix::fs::OpenOptionsExt;
    let mut file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    file.write_all(frame)
}

#[cfg(not(unix))]
fn write_restricted(path: &Path, frame: &[u8]) -> std::io::Result<()> {
    fs::write(path, frame)
}

impl ShareStore for DirectoryStore {
    fn set(&self, index: u8, frame: &[u8]) -> Result<(), StorageError> {
        let _guard = self.lock.write().expect("storage lock poisoned");
        write_restricted(&self.share_path(index), frame)?;
        Ok(())
    }

    fn get(&self, index: u8) -> Result<Vec<u8>, StorageError> {
        let _guard = self.lock.read().expect("storage lock poisoned");
        Ok(fs::read(self.share_path(index))?)
    }

    fn list(&self) -> Result<Vec<u8>, StorageError> {
        let _guard = self.lock.read().expect("storage lock poisoned");
        let mut indices = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            let Some(stem) = name
                .strip_prefix(FILE_PREFIX)
                .and_then(|rest| rest.strip_suffix(FILE_SUFFIX))
            else {
                continue;
            };
            // Keep names whose decimal tail is a byte; skip everything else.
            if let Ok(index) = stem.parse::<u8>() {
                indices.push(index);
            }
        }
        Ok(indices)
    }

    fn delete(&self, index: u8) -> Result<(), StorageError> {
        let _guard = self.lock.write().expect("storage lock poisoned");
        fs::remove_file(self.share_path(index))?;
        Ok(())
    }
}
