//! Routing composite: a different backend per share index.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::{ShareStore, StorageError};

/// Dispatches each operation to the backend assigned for the index.
///
/// The lock here protects only the routing map; the assigned backends keep
/// their own synchronization. There is no cross-backend atomicity: a
/// `batch_set` spanning two backends can be observed partially applied.
#[derive(Default)]
pub struct MultiStore {
    backends: RwLock<HashMap<u8, Arc<dyn ShareStore>>>,
}

impl MultiStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns (or reassigns) the backend responsible for `index`.
    pub fn assign(&self, index: u8, backend: Arc<dyn ShareStore>) {
        let mut backends = self.backends.write().expect("routing lock poisoned");
        backends.insert(index, backend);
    }

    fn backend(&self, index: u8) -> Result<Arc<dyn ShareStore>, StorageError> {
        let backends = self.backends.read().expect("routing lock poisoned");
        backends.get(&index).cloned().ok_or(StorageError::NoBackend)
    }
}

impl ShareStore for MultiStore {
    fn set(&self, index: u8, frame: &[u8]) -> Result<(), StorageError> {
        self.backend(index)?.set(index, frame)
    }

    fn get(&self, index: u8) -> Result<Vec<u8>, StorageError> {
        self.backend(index)?.get(index)
    }

    /// Returns the assigned indices, whether or not the underlying backend
    /// currently holds a frame for them.
    fn list(&self) -> Result<Vec<u8>, StorageError> {
        let backends = self.backends.read().expect("routing lock poisoned");
        Ok(backends.keys().copied().collect())
    }

    fn delete(&self, index: u8) -> Result<(), StorageError> {
        self.backend(index)?.delete(index)
    }

    fn batch_set(&self, frames: &HashMap<u8, Vec<u8>>) -> Result<(), StorageError> {
        for (&index, frame) in frames {
            self.set(index, frame)?;
        }
        Ok(())
    }
}
