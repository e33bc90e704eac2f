//! Threshold secret sharing with framed shares, pluggable storage, and
//! in-place rotation.
//!
//! A secret byte string is split into `n` shares over GF(2^8) such that any
//! `t` of them reconstruct it and any fewer reveal nothing. Each share
//! travels in a self-describing frame (magic, version, parameters, payload,
//! CRC-32) that also exists in hex, base64, and structured-JSON forms.
//! Shares persist through the [`storage::ShareStore`] capability set (an
//! in-memory map, a one-file-per-share directory, or a composite routing
//! each index to its own backend), and a [`rotator::Rotator`] periodically
//! replaces the stored set with a re-randomized one encoding the same
//! secret.
//!
//! ```
//! use shardkeep::{split, combine};
//!
//! let shares = split(b"Top Secret Message", 3, 5)?;
//! let recovered = combine(&shares[..3])?;
//! assert_eq!(recovered, b"Top Secret Message");
//! # Ok::<(), shardkeep::ShamirError>(())
//! ```
//!
//! The CRC is an integrity check against accidental corruption, not a MAC;
//! nothing here authenticates shares or proves dealer honesty.

#![forbid(unsafe_code)]

pub mod entropy;
pub mod gf256;
pub mod recovery;
pub mod rotator;
pub mod sss;
pub mod storage;

pub use entropy::{EntropyError, EntropySource, OsEntropy};
pub use recovery::{
    break_glass_recovery, multi_party_authorize, retrieve_shares, store_shares, RecoveryError,
};
pub use rotator::{Rotator, RotatorConfig, RotatorError, TickError};
pub use sss::{
    combine, frame, proactive_refresh, rotate, split, split_with_source, ShamirError,
    StructuredShare,
};
pub use storage::{DirectoryStore, MemoryStore, MultiStore, ShareStore, StorageError};
