//! Splitting a secret into framed shares.
//!
//! Each secret byte gets its own random degree-(t-1) polynomial with the
//! byte as constant term; share i carries the evaluations at x = i for
//! every column.
//!
//! # Security
//! - Coefficients live in a reused `Zeroizing` buffer that is overwritten
//!   per column and wiped on drop.
//! - Randomness comes through an injectable [`EntropySource`] so exact
//!   evaluations can be asserted in tests; production callers get the OS
//!   CSPRNG.

use zeroize::Zeroizing;

use super::frame::{self, HEADER_LEN};
use super::ShamirError;
use crate::entropy::{EntropySource, OsEntropy};
use crate::gf256::GF256;

/// Splits `secret` into `total` framed shares, any `threshold` of which
/// reconstruct it. Randomness comes from the OS CSPRNG.
///
/// # Errors
/// * `InvalidThreshold` - `threshold < 2`.
/// * `InvalidTotal` - `total < threshold`.
/// * `MalformedLength` - secret longer than 65 535 bytes.
/// * `RandomnessFailure` - the OS source could not fill a request.
pub fn split(secret: &[u8], threshold: u8, total: u8) -> Result<Vec<Vec<u8>>, ShamirError> {
    split_with_source(secret, threshold, total, &mut OsEntropy)
}

/// [`split`] with a caller-supplied randomness source.
pub fn split_with_source<R: EntropySource + ?Sized>(
    secret: &[u8],
    threshold: u8,
    total: u8,
    entropy: &mut R,
) -> Result<Vec<Vec<u8>>, ShamirError> {
    if threshold < 2 {
        return Err(ShamirError::InvalidThreshold);
    }
    if total < threshold {
        return Err(ShamirError::InvalidTotal);
    }
    if secret.len() > u16::MAX as usize {
        return Err(ShamirError::MalformedLength);
    }
    let secret_len = secret.len();
    let t = threshold as usize;

    let mut frames: Vec<Vec<u8>> = (1..=total)
        .map(|index| {
            let mut buf = vec![0u8; frame::frame_len(secret_len)];
            frame::write_header(&mut buf, threshold, total, secret_len as u16, index);
            buf
        })
        .collect();

    // coeffs[0] is the secret byte, coeffs[1..t] fresh randomness per column.
    let mut coeffs = Zeroizing::new(vec![0u8; t]);
    for j in 0..secret_len {
        coeffs[0] = secret[j];
        entropy
            .fill(&mut coeffs[1..])
            .map_err(|_| ShamirError::RandomnessFailure)?;

        for buf in frames.iter_mut() {
            let x = GF256(buf[9]);
            let mut y = GF256(coeffs[0]);
            let mut px = GF256(1);
            for &c in &coeffs[1..] {
                px *= x;
                y += GF256(c) * px;
            }
            buf[HEADER_LEN + j] = y.0;
        }
    }

    for buf in frames.iter_mut() {
        frame::seal_crc(buf);
    }
    Ok(frames)
}
