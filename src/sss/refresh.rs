//! Rotation kernels: re-sharing and proactive refresh.
//!
//! Both operations take a complete share set and produce a replacement set
//! encoding the same secret under fresh randomness.
//!
//! - [`rotate`] reconstructs the secret and splits it again. The polynomial
//!   changes entirely; the secret value does not. A caller that wants a new
//!   secret must supply one out-of-band and split that instead.
//! - [`proactive_refresh`] never materializes a long-lived plaintext on the
//!   write path: it adds a fresh sharing of the zero secret onto the old
//!   payloads, column by column. The sum of two polynomials with constant
//!   terms s and 0 has constant term s, so any t refreshed shares still
//!   yield s, while any sub-threshold mix of old and new shares carries no
//!   information.

use zeroize::Zeroizing;

use super::combine::combine;
use super::frame::{self, CRC_LEN, HEADER_LEN};
use super::split::split_with_source;
use super::ShamirError;
use crate::entropy::EntropySource;

/// Re-shares the set's secret under a fresh random polynomial.
///
/// Combines the old frames (the first `threshold` in input order after
/// validation), then splits the recovered secret into a brand-new
/// (threshold, total) set. The plaintext is wiped as soon as the split
/// returns.
pub fn rotate<R: EntropySource + ?Sized>(
    frames: &[Vec<u8>],
    threshold: u8,
    total: u8,
    entropy: &mut R,
) -> Result<Vec<Vec<u8>>, ShamirError> {
    let secret = Zeroizing::new(combine(frames)?);
    split_with_source(&secret, threshold, total, entropy)
}

/// Refreshes every share in place without reconstructing the secret into
/// the output path.
///
/// The old frames are validated, ordered by share index, and checked to
/// cover the full index set 1..=total; a sharing of the all-zero secret is
/// then added onto each payload and the CRCs resealed. Headers are carried
/// over from the old frames byte-for-byte.
///
/// # Errors
/// * Any [`combine`] validation failure (the old set is combined once as a
///   self-check; the plaintext is wiped immediately).
/// * `InsufficientShares` - the set does not contain exactly `total`
///   frames, so old and zero shares cannot be paired index-for-index.
/// * `InconsistentHeader` - the sorted indices are not 1..=total.
pub fn proactive_refresh<R: EntropySource + ?Sized>(
    frames: &[Vec<u8>],
    threshold: u8,
    total: u8,
    entropy: &mut R,
) -> Result<Vec<Vec<u8>>, ShamirError> {
    for buf in frames {
        frame::verify(buf)?;
    }
    let mut ordered: Vec<Vec<u8>> = frames.to_vec();
    ordered.sort_by_key(|buf| buf[9]);

    // Self-check that the set is combinable before rewriting it.
    let _secret = Zeroizing::new(combine(&ordered)?);

    if ordered.len() != total as usize {
        return Err(ShamirError::InsufficientShares {
            required: total,
            provided: ordered.len(),
        });
    }

    let secret_len = ordered[0].len() - HEADER_LEN - CRC_LEN;
    let zeros = vec![0u8; secret_len];
    let zero_frames = split_with_source(&zeros, threshold, total, entropy)?;

    let mut refreshed = Vec::with_capacity(total as usize);
    for (old, zero) in ordered.iter().zip(zero_frames.iter()) {
        // Pairing is positional; the sort above makes it index-aligned only
        // when the old set is exactly {1..=total}.
        if old[9] != zero[9] {
            return Err(ShamirError::InconsistentHeader);
        }
        let mut next = old.clone();
        for j in HEADER_LEN..HEADER_LEN + secret_len {
            next[j] ^= zero[j];
        }
        frame::seal_crc(&mut next);
        refreshed.push(next);
    }
    Ok(refreshed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entropy::testing::CountingEntropy;
    use crate::gf256::GF256;
    use crate::sss::split::split_with_source;

    fn sample_set(secret: &[u8], t: u8, n: u8, seed: u8) -> Vec<Vec<u8>> {
        let mut rng = CountingEntropy::new(seed);
        split_with_source(secret, t, n, &mut rng).unwrap()
    }

    #[test]
    fn test_rotate_preserves_secret_and_changes_payload() {
        let secret = b"launch";
        let old = sample_set(secret, 3, 5, 0x11);
        let mut rng = CountingEntropy::new(0x99);
        let new = rotate(&old, 3, 5, &mut rng).unwrap();

        assert_eq!(new.len(), 5);
        assert_eq!(combine(&new).unwrap(), secret);
        assert_eq!(combine(&new[1..4]).unwrap(), secret);
        // Fresh polynomial: payloads differ from the old set.
        assert_ne!(old[0][10..16], new[0][10..16]);
    }

    #[test]
    fn test_refresh_preserves_secret() {
        let secret = b"launch";
        let old = sample_set(secret, 3, 5, 0x11);
        let mut rng = CountingEntropy::new(0x99);
        let new = proactive_refresh(&old, 3, 5, &mut rng).unwrap();

        assert_eq!(new.len(), 5);
        for (o, n) in old.iter().zip(new.iter()) {
            // Same header, new payload, valid CRC.
            assert_eq!(o[..HEADER_LEN], n[..HEADER_LEN]);
            assert_ne!(o[HEADER_LEN..o.len() - CRC_LEN], n[HEADER_LEN..n.len() - CRC_LEN]);
            frame::verify(n).unwrap();
        }
        assert_eq!(combine(&new).unwrap(), secret);
        assert_eq!(combine(&new[2..5]).unwrap(), secret);
    }

    #[test]
    fn test_refresh_delta_is_zero_sharing() {
        // The XOR of old and refreshed payloads must itself be a valid
        // (t, n) sharing of the zero secret: interpolating the deltas at
        // x = 0 gives 0 in every column.
        let secret = [0x0Fu8, 0xF0, 0x3C];
        let old = sample_set(&secret, 3, 5, 0x21);
        let mut rng = CountingEntropy::new(0xC5);
        let new = proactive_refresh(&old, 3, 5, &mut rng).unwrap();

        let mut deltas = Vec::new();
        for (o, n) in old.iter().zip(new.iter()) {
            let mut d = o.clone();
            for j in HEADER_LEN..HEADER_LEN + secret.len() {
                d[j] ^= n[j];
            }
            frame::seal_crc(&mut d);
            deltas.push(d);
        }
        assert_eq!(combine(&deltas).unwrap(), vec![0u8; secret.len()]);
    }

    #[test]
    fn test_refresh_survives_repeated_ticks() {
        let secret = b"launch";
        let mut set = sample_set(secret, 3, 5, 0x42);
        let mut rng = CountingEntropy::new(0x77);
        for _ in 0..3 {
            set = proactive_refresh(&set, 3, 5, &mut rng).unwrap();
            assert_eq!(combine(&set).unwrap(), secret);
        }
    }

    #[test]
    fn test_refresh_accepts_unsorted_input() {
        let secret = b"order";
        let mut set = sample_set(secret, 2, 4, 0x42);
        set.reverse();
        let mut rng = CountingEntropy::new(0x77);
        let new = proactive_refresh(&set, 2, 4, &mut rng).unwrap();
        // Output is in ascending index order regardless of input order.
        let indices: Vec<u8> = new.iter().map(|f| f[9]).collect();
        assert_eq!(indices, vec![1, 2, 3, 4]);
        assert_eq!(combine(&new).unwrap(), secret);
    }

    #[test]
    fn test_refresh_requires_full_set() {
        let set = sample_set(b"partial", 2, 4, 0x42);
        let mut rng = CountingEntropy::new(0x77);
        assert_eq!(
            proactive_refresh(&set[..3], 2, 4, &mut rng),
            Err(ShamirError::InsufficientShares {
                required: 4,
                provided: 3
            })
        );
    }

    #[test]
    fn test_refresh_empty_secret() {
        let set = sample_set(b"", 2, 3, 0x42);
        let mut rng = CountingEntropy::new(0x77);
        let new = proactive_refresh(&set, 2, 3, &mut rng).unwrap();
        assert_eq!(combine(&new).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_zero_sharing_interpolates_to_zero_with_weights() {
        // Directly exercise the identity behind the refresh: Lagrange
        // weights applied to a zero-secret share set sum to 0 per column.
        let zeros = vec![0u8; 16];
        let set = sample_set(&zeros, 3, 5, 0x64);
        for window in [[0usize, 1, 2], [1, 2, 4], [0, 3, 4]] {
            let xs: Vec<GF256> = window.iter().map(|&i| GF256(set[i][9])).collect();
            let mut prod = GF256(1);
            for &x in &xs {
                prod *= x;
            }
            for col in 0..16 {
                let mut acc = GF256(0);
                for (k, &i) in window.iter().enumerate() {
                    let mut denom = GF256(1);
                    for (m, _) in window.iter().enumerate() {
                        if m != k {
                            denom *= xs[k] + xs[m];
                        }
                    }
                    let w = prod
                        * xs[k].checked_inv().unwrap()
                        * denom.checked_inv().unwrap();
                    acc += GF256(set[i][HEADER_LEN + col]) * w;
                }
                assert_eq!(acc, GF256(0));
            }
        }
    }
}
