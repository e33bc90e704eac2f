//! Byte-oriented randomness sources.
//!
//! Split consumes randomness through the [`EntropySource`] trait so tests
//! can inject deterministic bytes and assert exact polynomial evaluations.
//! The default source is the operating system CSPRNG.

use core::fmt;

use rand_core::{OsRng, RngCore};

/// Errors for entropy collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntropyError {
    /// The source yielded fewer bytes than requested.
    CollectionFailed,
}

impl fmt::Display for EntropyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntropyError::CollectionFailed => write!(f, "entropy collection failed"),
        }
    }
}

impl std::error::Error for EntropyError {}

/// A source of random bytes.
pub trait EntropySource {
    /// Fills `dest` with random bytes from the source.
    ///
    /// Must fill the whole buffer or fail; partial fills are not allowed.
    fn fill(&mut self, dest: &mut [u8]) -> Result<(), EntropyError>;
}

/// The operating system CSPRNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn fill(&mut self, dest: &mut [u8]) -> Result<(), EntropyError> {
        OsRng
            .try_fill_bytes(dest)
            .map_err(|_| EntropyError::CollectionFailed)
    }
}
