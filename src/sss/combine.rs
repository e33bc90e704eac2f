//! Secret reconstruction from framed shares.
//!
//! Lagrange interpolation at x = 0 over GF(2^8) recovers the constant term
//! of each column's polynomial. Every provided frame is validated against
//! the first one before the quorum is cut to the first `t` shares in input
//! order.

use zeroize::Zeroizing;

use super::frame::{self, HEADER_LEN};
use super::ShamirError;
use crate::gf256::GF256;

/// Reconstructs the secret from at least `t` framed shares of one set.
///
/// All provided frames are parsed, CRC-checked, and cross-validated; then
/// exactly the first `t` (in input order) feed the interpolation and the
/// rest are ignored.
///
/// # Errors
/// * `InsufficientShares` - fewer than 2 frames, or fewer than the set's
///   threshold.
/// * `BadMagic`, `VersionMismatch`, `MalformedLength`, `CrcMismatch` -
///   structural failures of an individual frame.
/// * `InconsistentHeader` - threshold, total, or length differ across
///   frames.
/// * `ZeroIndex`, `DuplicateIndex` - invalid x-coordinates.
pub fn combine(frames: &[Vec<u8>]) -> Result<Vec<u8>, ShamirError> {
    if frames.len() < 2 {
        return Err(ShamirError::InsufficientShares {
            required: 2,
            provided: frames.len(),
        });
    }

    let header = frame::verify(&frames[0])?;
    let secret_len = header.secret_len as usize;
    let t = header.threshold as usize;

    let mut seen = [false; 256];
    for buf in frames {
        let h = frame::verify(buf)?;
        if h.threshold != header.threshold
            || h.total != header.total
            || h.secret_len != header.secret_len
        {
            return Err(ShamirError::InconsistentHeader);
        }
        if seen[h.index as usize] {
            return Err(ShamirError::DuplicateIndex(h.index));
        }
        seen[h.index as usize] = true;
    }

    if frames.len() < t {
        return Err(ShamirError::InsufficientShares {
            required: header.threshold,
            provided: frames.len(),
        });
    }
    // Stable truncation: the quorum is the first t frames as provided.
    let quorum = &frames[..t];
    let xs: Vec<GF256> = quorum.iter().map(|buf| GF256(buf[9])).collect();

    // Lagrange weights at x = 0. The classical basis
    // prod_{j!=i} x_j / (x_i ^ x_j) is computed as
    // P * inv(x_i) * inv(prod_{j!=i}(x_i ^ x_j)) with P = prod x_i shared
    // across all i.
    let mut prod_all = GF256(1);
    for &x in &xs {
        prod_all *= x;
    }
    let mut weights = Zeroizing::new(Vec::with_capacity(t));
    for i in 0..t {
        let mut denom = GF256(1);
        for j in 0..t {
            if i != j {
                denom *= xs[i] + xs[j];
            }
        }
        let xi_inv = xs[i].checked_inv().ok_or(ShamirError::InverseOfZero)?;
        let denom_inv = denom.checked_inv().ok_or(ShamirError::InverseOfZero)?;
        weights.push(prod_all * xi_inv * denom_inv);
    }

    let mut secret = Vec::with_capacity(secret_len);
    for j in 0..secret_len {
        let mut acc = GF256(0);
        for (buf, &w) in quorum.iter().zip(weights.iter()) {
            acc += GF256(buf[HEADER_LEN + j]) * w;
        }
        secret.push(acc.0);
    }
    Ok(secret)
}
