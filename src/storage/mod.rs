//! Share storage.
//!
//! Keyed persistence of framed shares, one frame per share index. Backends
//! implement the [`ShareStore`] capability set; stored bytes round-trip
//! exactly (the data path applies no transformation).
//!
//! # Backends
//! - `memory`: in-process map, values copied in and out.
//! - `directory`: one file per share under a 0700 directory.
//! - `multi`: routing composite mapping each index to an assigned backend.

pub mod directory;
pub mod memory;
pub mod multi;

use std::collections::HashMap;
use std::fmt;

pub use directory::DirectoryStore;
pub use memory::MemoryStore;
pub use multi::MultiStore;

/// Errors related to share storage operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// No share stored under the index.
    NotFound,
    /// No backend assigned for the index (composite only).
    NoBackend,
    /// Permission denied.
    PermissionDenied,
    /// IO error (generic).
    IoError,
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::NotFound => write!(f, "share not found"),
            StorageError::NoBackend => write!(f, "no storage backend assigned for share index"),
            StorageError::PermissionDenied => write!(f, "permission denied"),
            StorageError::IoError => write!(f, "storage I/O error"),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => StorageError::NotFound,
            std::io::ErrorKind::PermissionDenied => StorageError::PermissionDenied,
            _ => StorageError::IoError,
        }
    }
}

/// Capability set every share backend provides.
///
/// Implementations are internally synchronized: writers (`set`, `delete`,
/// `batch_set`) and readers (`get`, `list`) are linearizable with respect
/// to each other within one backend.
pub trait ShareStore: Send + Sync {
    /// Stores a frame under `index`, overwriting any previous one.
    fn set(&self, index: u8, frame: &[u8]) -> Result<(), StorageError>;

    /// Returns the frame stored under `index`.
    fn get(&self, index: u8) -> Result<Vec<u8>, StorageError>;

    /// Returns the stored share indices, in no particular order.
    fn list(&self) -> Result<Vec<u8>, StorageError>;

    /// Removes the frame stored under `index`.
    fn delete(&self, index: u8) -> Result<(), StorageError>;

    /// Stores every entry of `frames`.
    ///
    /// Semantically a sequence of [`ShareStore::set`] calls; atomicity
    /// across entries is NOT part of the contract, and a failure may leave
    /// earlier entries applied.
    fn batch_set(&self, frames: &HashMap<u8, Vec<u8>>) -> Result<(), StorageError> {
        for (&index, frame) in frames {
            self.set(index, frame)?;
        }
        Ok(())
    }
}
