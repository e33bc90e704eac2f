//! In-memory share storage.

use std::collections::HashMap;
use std::sync::RwLock;

use super::{ShareStore, StorageError};

/// Map-backed storage. Frames are copied on the way in and out so external
/// mutation cannot reach the stored bytes.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: RwLock<HashMap<u8, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ShareStore for MemoryStore {
    fn set(&self, index: u8, frame: &[u8]) -> Result<(), StorageError> {
        let mut data = self.data.write().expect("storage lock poisoned");
        data.insert(index, frame.to_vec());
        Ok(())
    }

    fn get(&self, index: u8) -> Result<Vec<u8>, StorageError> {
        let data = self.data.read().expect("storage lock poisoned");
        data.get(&index).cloned().ok_or(StorageError::NotFound)
    }

    fn list(&self) -> Result<Vec<u8>, StorageError> {
        let data = self.data.read().expect("storage lock poisoned");
        Ok(data.keys().copied().collect())
    }

    fn delete(&self, index: u8) -> Result<(), StorageError> {
        let mut data = self.data.write().expect("storage lock poisoned");
        data.remove(&index).map(|_| ()).ok_or(StorageError::NotFound)
    }
}
