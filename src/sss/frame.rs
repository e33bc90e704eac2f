//! Share frame container and transport encodings.
//!
//! Every share travels as one contiguous buffer:
//!
//! ```text
//! offset  size  field
//!      0     4  magic "SHAM"
//!      4     1  version (0x01)
//!      5     1  threshold t
//!      6     1  total shares n
//!      7     2  secret length L, big-endian
//!      9     1  share index x (1..=n)
//!     10     L  payload, one y-coordinate per secret byte
//!  10+L      4  CRC-32/IEEE over [0, 10+L), big-endian
//! ```
//!
//! Beyond the raw bytes, a frame can travel as lowercase hex, standard
//! base64, or a structured record carrying base64 of the index byte plus
//! payload (the CRC is recomputed on decode). Decoders never trust the
//! header's length field alone; it must agree with the wire length.

use serde::{Deserialize, Serialize};

use super::ShamirError;

/// Leading magic of every share frame.
pub const MAGIC: [u8; 4] = *b"SHAM";

/// The single supported frame version.
pub const VERSION: u8 = 1;

/// Bytes before the payload: magic(4) + ver(1) + t(1) + n(1) + len(2) + idx(1).
pub const HEADER_LEN: usize = 10;

/// Trailing CRC-32 width.
pub const CRC_LEN: usize = 4;

/// Parsed header fields of a share frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    pub threshold: u8,
    pub total: u8,
    pub secret_len: u16,
    pub index: u8,
}

/// Total frame length for a secret of `secret_len` bytes.
pub fn frame_len(secret_len: usize) -> usize {
    HEADER_LEN + secret_len + CRC_LEN
}

/// Writes the fixed header into `buf[..HEADER_LEN]`.
pub(crate) fn write_header(buf: &mut [u8], threshold: u8, total: u8, secret_len: u16, index: u8) {
    buf[0..4].copy_from_slice(&MAGIC);
    buf[4] = VERSION;
    buf[5] = threshold;
    buf[6] = total;
    buf[7..9].copy_from_slice(&secret_len.to_be_bytes());
    buf[9] = index;
}

/// Computes the CRC over everything but the trailer and writes it there.
pub(crate) fn seal_crc(buf: &mut [u8]) {
    let body = buf.len() - CRC_LEN;
    let crc = crc32fast::hash(&buf[..body]);
    buf[body..].copy_from_slice(&crc.to_be_bytes());
}

/// The share index a frame routes under (byte at offset 9).
pub fn share_index(frame: &[u8]) -> Result<u8, ShamirError> {
    if frame.len() < HEADER_LEN {
        return Err(ShamirError::MalformedLength);
    }
    Ok(frame[9])
}

/// Validates a frame and returns its parsed header.
///
/// Checks, in order: minimum length and magic, version, wire length against
/// the header's L, the CRC trailer, and a nonzero index.
///
/// # Errors
/// `BadMagic`, `VersionMismatch`, `MalformedLength`, `CrcMismatch`,
/// `ZeroIndex`.
pub fn verify(frame: &[u8]) -> Result<FrameHeader, ShamirError> {
    if frame.len() < HEADER_LEN {
        return Err(ShamirError::MalformedLength);
    }
    if frame[0..4] != MAGIC {
        return Err(ShamirError::BadMagic);
    }
    if frame[4] != VERSION {
        return Err(ShamirError::VersionMismatch);
    }
    let secret_len = u16::from_be_bytes([frame[7], frame[8]]);
    if frame.len() != frame_len(secret_len as usize) {
        return Err(ShamirError::MalformedLength);
    }
    let body = frame.len() - CRC_LEN;
    let expected = u32::from_be_bytes([
        frame[body],
        frame[body + 1],
        frame[body + 2],
        frame[body + 3],
    ]);
    if crc32fast::hash(&frame[..body]) != expected {
        return Err(ShamirError::CrcMismatch);
    }
    let index = frame[9];
    if index == 0 {
        return Err(ShamirError::ZeroIndex);
    }
    Ok(FrameHeader {
        threshold: frame[5],
        total: frame[6],
        secret_len,
        index,
    })
}

/// Encodes a frame as lowercase hex.
pub fn to_hex(frame: &[u8]) -> String {
    hex::encode(frame)
}

/// Decodes a hex share and validates the frame.
pub fn from_hex(s: &str) -> Result<Vec<u8>, ShamirError> {
    let frame = hex::decode(s).map_err(|_| ShamirError::InvalidEncoding)?;
    verify(&frame)?;
    Ok(frame)
}

/// Encodes a frame as standard base64.
pub fn to_base64(frame: &[u8]) -> String {
    base64::encode(frame)
}

/// Decodes a base64 share and validates the frame.
pub fn from_base64(s: &str) -> Result<Vec<u8>, ShamirError> {
    let frame = base64::decode(s).map_err(|_| ShamirError::InvalidEncoding)?;
    verify(&frame)?;
    Ok(frame)
}

/// Portable structured form of a share.
///
/// `data` is base64 of the frame bytes from the index byte through the end
/// of the payload; the CRC is omitted and recomputed on decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredShare {
    pub index: u8,
    pub threshold: u8,
    pub total_shares: u8,
    pub data: String,
}

/// Converts a validated frame into its structured form.
pub fn to_structured(frame: &[u8]) -> Result<StructuredShare, ShamirError> {
    let header = verify(frame)?;
    let body = &frame[9..frame.len() - CRC_LEN];
    Ok(StructuredShare {
        index: header.index,
        threshold: header.threshold,
        total_shares: header.total,
        data: base64::encode(body),
    })
}

/// Rebuilds a raw frame from its structured form.
///
/// The payload length is derived from the decoded body (body = index byte +
/// payload); the header's length field is re-emitted from it and the CRC
/// recomputed, so the result round-trips byte-for-byte with the frame that
/// produced the record.
pub fn from_structured(share: &StructuredShare) -> Result<Vec<u8>, ShamirError> {
    let body = base64::decode(&share.data).map_err(|_| ShamirError::InvalidEncoding)?;
    let secret_len = match body.len().checked_sub(1) {
        Some(l) if l <= u16::MAX as usize => l,
        _ => return Err(ShamirError::MalformedLength),
    };
    if body[0] != share.index {
        return Err(ShamirError::InconsistentHeader);
    }
    let mut frame = vec![0u8; frame_len(secret_len)];
    write_header(
        &mut frame,
        share.threshold,
        share.total_shares,
        secret_len as u16,
        share.index,
    );
    frame[HEADER_LEN..HEADER_LEN + secret_len].copy_from_slice(&body[1..]);
    seal_crc(&mut frame);
    Ok(frame)
}

/// Serializes a frame to the JSON form of [`StructuredShare`].
pub fn to_json(frame: &[u8]) -> Result<String, ShamirError> {
    let share = to_structured(frame)?;
    serde_json::to_string(&share).map_err(|_| ShamirError::InvalidEncoding)
}

/// Parses the JSON form back into a raw frame.
pub fn from_json(js: &str) -> Result<Vec<u8>, ShamirError> {
    let share: StructuredShare =
        serde_json::from_str(js).map_err(|_| ShamirError::InvalidEncoding)?;
    from_structured(&share)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_frame(threshold: u8, total: u8, index: u8, payload: &[u8]) -> Vec<u8> {
        let mut frame = vec![0u8; frame_len(payload.len())];
        write_header(&mut frame, threshold, total, payload.len() as u16, index);
        frame[HEADER_LEN..HEADER_LEN + payload.len()].copy_from_slice(payload);
        seal_crc(&mut frame);
        frame
    }

    #[test]
    fn test_verify_accepts_sealed_frame() {
        let frame = sample_frame(2, 3, 1, b"payload");
        let header = verify(&frame).unwrap();
        assert_eq!(
            header,
            FrameHeader {
                threshold: 2,
                total: 3,
                secret_len: 7,
                index: 1
            }
        );
    }

    #[test]
    fn test_verify_empty_payload() {
        let frame = sample_frame(2, 2, 2, b"");
        assert_eq!(frame.len(), HEADER_LEN + CRC_LEN);
        assert!(verify(&frame).is_ok());
    }

    #[test]
    fn test_verify_rejections() {
        let frame = sample_frame(3, 5, 4, b"abc");

        assert_eq!(verify(&frame[..6]), Err(ShamirError::MalformedLength));

        let mut bad = frame.clone();
        bad[0] = b'X';
        assert_eq!(verify(&bad), Err(ShamirError::BadMagic));

        let mut bad = frame.clone();
        bad[4] = 2;
        assert_eq!(verify(&bad), Err(ShamirError::VersionMismatch));

        // Header claims more payload than the wire carries.
        let mut bad = frame.clone();
        bad[8] = 0xFF;
        assert_eq!(verify(&bad), Err(ShamirError::MalformedLength));

        let mut bad = frame.clone();
        bad[9] = 0;
        seal_crc(&mut bad);
        assert_eq!(verify(&bad), Err(ShamirError::ZeroIndex));
    }

    #[test]
    fn test_any_flipped_bit_fails_crc() {
        let frame = sample_frame(2, 3, 1, b"hi");
        let body = frame.len() - CRC_LEN;
        for byte in 0..body {
            for bit in 0..8 {
                let mut bad = frame.clone();
                bad[byte] ^= 1 << bit;
                let got = verify(&bad);
                // Flips in the magic, version, length, or index fields may
                // trip an earlier structural check; everything else must be
                // caught by the CRC.
                assert!(got.is_err(), "flip at byte {} bit {}", byte, bit);
                if byte == 5 || byte == 6 || byte == 9 || (HEADER_LEN..body).contains(&byte) {
                    assert_eq!(got, Err(ShamirError::CrcMismatch));
                }
            }
        }
    }

    #[test]
    fn test_hex_roundtrip() {
        let frame = sample_frame(2, 3, 1, b"secret bytes");
        let text = to_hex(&frame);
        assert_eq!(text, text.to_lowercase());
        assert_eq!(from_hex(&text).unwrap(), frame);
        assert_eq!(from_hex("zz-not-hex"), Err(ShamirError::InvalidEncoding));
    }

    #[test]
    fn test_base64_roundtrip() {
        let frame = sample_frame(2, 3, 2, b"secret bytes");
        let text = to_base64(&frame);
        assert_eq!(from_base64(&text).unwrap(), frame);
        assert_eq!(from_base64("@@@@"), Err(ShamirError::InvalidEncoding));
    }

    #[test]
    fn test_text_decode_rejects_truncation() {
        let frame = sample_frame(2, 3, 2, b"secret bytes");
        // Valid encodings of a truncated frame: decode succeeds, length
        // check against the header must fail.
        let cut = &frame[..frame.len() - 1];
        assert_eq!(from_hex(&hex::encode(cut)), Err(ShamirError::MalformedLength));
        assert_eq!(
            from_base64(&base64::encode(cut)),
            Err(ShamirError::MalformedLength)
        );
    }

    #[test]
    fn test_structured_roundtrip() {
        let frame = sample_frame(3, 5, 4, &[0xDE, 0xAD, 0xBE, 0xEF]);
        let record = to_structured(&frame).unwrap();
        assert_eq!(record.index, 4);
        assert_eq!(record.threshold, 3);
        assert_eq!(record.total_shares, 5);
        // Body is index byte + payload, CRC omitted.
        assert_eq!(
            base64::decode(&record.data).unwrap(),
            [4, 0xDE, 0xAD, 0xBE, 0xEF]
        );
        assert_eq!(from_structured(&record).unwrap(), frame);
    }

    #[test]
    fn test_structured_roundtrip_empty_payload() {
        let frame = sample_frame(2, 2, 1, b"");
        let record = to_structured(&frame).unwrap();
        assert_eq!(from_structured(&record).unwrap(), frame);
    }

    #[test]
    fn test_structured_index_mismatch() {
        let frame = sample_frame(3, 5, 4, b"xy");
        let mut record = to_structured(&frame).unwrap();
        record.index = 5;
        assert_eq!(
            from_structured(&record),
            Err(ShamirError::InconsistentHeader)
        );
    }

    #[test]
    fn test_structured_empty_body() {
        let record = StructuredShare {
            index: 1,
            threshold: 2,
            total_shares: 3,
            data: String::new(),
        };
        assert_eq!(from_structured(&record), Err(ShamirError::MalformedLength));
    }

    #[test]
    fn test_json_roundtrip() {
        let frame = sample_frame(2, 4, 3, b"json share");
        let js = to_json(&frame).unwrap();
        assert!(js.contains("\"index\":3"));
        assert!(js.contains("\"total_shares\":4"));
        assert_eq!(from_json(&js).unwrap(), frame);
        assert_eq!(from_json("{not json"), Err(ShamirError::InvalidEncoding));
    }
}
