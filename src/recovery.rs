//! Composition helpers over sharing and storage.
//!
//! Batch persistence of a split's output, indexed retrieval, and the two
//! quorum entry points: multi-party authorization and break-glass
//! recovery. Both retrieve a named index set, require at least the
//! threshold, and combine the first `threshold` frames; they differ only in
//! intent, break-glass index sets being drawn from separately provisioned
//! custodians.

use std::collections::HashMap;
use std::fmt;

use crate::sss::{self, frame, ShamirError};
use crate::storage::{ShareStore, StorageError};

/// Errors from the storage-plus-sharing composition layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryError {
    Storage(StorageError),
    Shares(ShamirError),
}

impl fmt::Display for RecoveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecoveryError::Storage(e) => write!(f, "share storage: {}", e),
            RecoveryError::Shares(e) => write!(f, "share set: {}", e),
        }
    }
}

impl std::error::Error for RecoveryError {}

impl From<StorageError> for RecoveryError {
    fn from(e: StorageError) -> Self {
        RecoveryError::Storage(e)
    }
}

impl From<ShamirError> for RecoveryError {
    fn from(e: ShamirError) -> Self {
        RecoveryError::Shares(e)
    }
}

/// Persists a share set, keyed by each frame's own index byte.
pub fn store_shares(frames: &[Vec<u8>], storage: &dyn ShareStore) -> Result<(), RecoveryError> {
    let mut batch = HashMap::with_capacity(frames.len());
    for buf in frames {
        batch.insert(frame::share_index(buf)?, buf.clone());
    }
    storage.batch_set(&batch)?;
    Ok(())
}

/// Fetches the frames for `indices`, preserving the requested order.
pub fn retrieve_shares(
    indices: &[u8],
    storage: &dyn ShareStore,
) -> Result<Vec<Vec<u8>>, StorageError> {
    let mut frames = Vec::with_capacity(indices.len());
    for &index in indices {
        frames.push(storage.get(index)?);
    }
    Ok(frames)
}

/// Retrieves the named shares and combines a quorum of them.
///
/// Requires `indices` to name at least `threshold` stored shares; exactly
/// the first `threshold` retrieved frames feed the reconstruction.
pub fn multi_party_authorize(
    storage: &dyn ShareStore,
    indices: &[u8],
    threshold: u8,
) -> Result<Vec<u8>, RecoveryError> {
    let frames = retrieve_shares(indices, storage)?;
    if frames.len() < threshold as usize {
        return Err(ShamirError::InsufficientShares {
            required: threshold,
            provided: frames.len(),
        }
        .into());
    }
    Ok(sss::combine(&frames[..threshold as usize])?)
}

/// Emergency reconstruction from a separately provisioned recovery set.
///
/// Mechanically identical to [`multi_party_authorize`]; the distinct entry
/// point signals that `recovery_indices` belong to a break-glass custody
/// chain rather than the everyday quorum.
pub fn break_glass_recovery(
    storage: &dyn ShareStore,
    recovery_indices: &[u8],
    threshold: u8,
) -> Result<Vec<u8>, RecoveryError> {
    multi_party_authorize(storage, recovery_indices, threshold)
}
