//! Threshold secret sharing over GF(2^8).
//!
//! Implements (t, n) Shamir sharing of byte strings, with each share carried
//! in a self-describing framed buffer (magic, version, parameters, payload,
//! CRC-32). Splitting evaluates a fresh degree-(t-1) polynomial per secret
//! byte; combining interpolates the constant term from any t valid shares.
//!
//! # Components
//! - `frame`: on-wire share container and its text encodings.
//! - `split`: secret -> n framed shares.
//! - `combine`: >= t framed shares -> secret.
//! - `refresh`: rotation kernels (re-share, proactive refresh).
//!
//! # Security
//! - Polynomial coefficients are wiped after every column.
//! - The CRC is an integrity check against accidental corruption, not a MAC.

pub mod combine;
pub mod frame;
pub mod refresh;
pub mod split;

use core::fmt;

pub use combine::combine;
pub use frame::{FrameHeader, StructuredShare};
pub use refresh::{proactive_refresh, rotate};
pub use split::{split, split_with_source};

/// Errors for share creation, validation, and reconstruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShamirError {
    /// Threshold below 2.
    InvalidThreshold,
    /// Total share count below the threshold.
    InvalidTotal,
    /// Frame length disagrees with the header, or the secret does not fit
    /// the 16-bit length field.
    MalformedLength,
    /// Share index 0 is reserved; it would leak the constant term.
    ZeroIndex,
    /// Two shares carry the same index.
    DuplicateIndex(u8),
    /// Frame does not start with the share magic.
    BadMagic,
    /// Frame version is not the supported one.
    VersionMismatch,
    /// CRC-32 over the frame does not match its trailer.
    CrcMismatch,
    /// Threshold, total, length, or index fields disagree across shares.
    InconsistentHeader,
    /// Fewer shares than the threshold requires.
    InsufficientShares { required: u8, provided: usize },
    /// The randomness source yielded fewer bytes than requested.
    RandomnessFailure,
    /// Inverse of zero requested; the field tables are corrupt.
    InverseOfZero,
    /// Text envelope (hex, base64, JSON) did not decode.
    InvalidEncoding,
}

impl fmt::Display for ShamirError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShamirError::InvalidThreshold => write!(f, "threshold must be between 2 and 255"),
            ShamirError::InvalidTotal => {
                write!(f, "total shares must be between threshold and 255")
            }
            ShamirError::MalformedLength => write!(f, "share length mismatch"),
            ShamirError::ZeroIndex => write!(f, "share index must be nonzero"),
            ShamirError::DuplicateIndex(x) => write!(f, "duplicate share index {}", x),
            ShamirError::BadMagic => write!(f, "bad magic header"),
            ShamirError::VersionMismatch => write!(f, "unsupported share version"),
            ShamirError::CrcMismatch => write!(f, "CRC32 mismatch"),
            ShamirError::InconsistentHeader => write!(f, "inconsistent header fields"),
            ShamirError::InsufficientShares { required, provided } => {
                write!(f, "need at least {} shares, got {}", required, provided)
            }
            ShamirError::RandomnessFailure => write!(f, "randomness source failed"),
            ShamirError::InverseOfZero => write!(f, "inverse of zero"),
            ShamirError::InvalidEncoding => write!(f, "share encoding did not decode"),
        }
    }
}

impl std::error::Error for ShamirError {}
