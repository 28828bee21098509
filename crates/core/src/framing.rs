//! Container serialization for encoded messages.
//!
//! An `EncodedMessage` is a pair of bit buffers; the payload rarely ends on
//! a byte boundary. A container frame stores both with their exact lengths
//! and a checksum so the pair can be written to disk or sent as one blob.
//!
//! # Frame Format
//!
//! ```text
//! +--------------------+
//! | Magic (4 bytes)    |  0x43 0x48 0x55 0x46 ("CHUF")
//! +--------------------+
//! | header_len (4)     |  u32 little-endian, header size in bytes
//! +--------------------+
//! | payload_bits (8)   |  u64 little-endian, exact payload bit count
//! +--------------------+
//! | crc32 (4)          |  u32 checksum
//! +--------------------+
//! | header             |  header_len bytes
//! | (variable)         |
//! +--------------------+
//! | payload            |  ceil(payload_bits / 8) bytes
//! | (variable)         |
//! +--------------------+
//! ```
//!
//! # CRC Coverage
//!
//! The CRC32 covers header_len, payload_bits, the header bytes and the
//! payload bytes.

use crate::bitio::BitBuffer;
use crate::codec::{decode, encode, EncodedMessage};
use crate::error::{Error, FramingError, Result};

/// Magic number for container frames: "CHUF" (canonical Huffman)
pub const MAGIC: [u8; 4] = [0x43, 0x48, 0x55, 0x46];

/// Size of the fixed frame prefix in bytes
pub const FRAME_HEADER_SIZE: usize = 20;

/// Serialize an encoded message into a container frame.
pub fn serialize_frame(encoded: &EncodedMessage) -> Vec<u8> {
    let header = encoded.header.as_bytes();
    let payload = encoded.payload.as_bytes();

    let header_len = header.len() as u32;
    let payload_bits = encoded.payload.len() as u64;
    let crc32 = compute_crc(header_len, payload_bits, header, payload);

    let mut frame = Vec::with_capacity(FRAME_HEADER_SIZE + header.len() + payload.len());
    frame.extend_from_slice(&MAGIC);
    frame.extend_from_slice(&header_len.to_le_bytes());
    frame.extend_from_slice(&payload_bits.to_le_bytes());
    frame.extend_from_slice(&crc32.to_le_bytes());
    frame.extend_from_slice(header);
    frame.extend_from_slice(payload);
    frame
}

/// Parse a container frame back into an encoded message.
///
/// Only the container is validated here; header and payload contents are
/// checked by `decode`.
///
/// # Errors
/// - `FramingError::FrameTooShort` if the buffer cannot hold the prefix
/// - `FramingError::InvalidMagic` if the magic number doesn't match
/// - `FramingError::LengthMismatch` if the declared sizes disagree with the buffer
/// - `Error::Crc` if CRC validation fails
pub fn parse_frame(bytes: &[u8]) -> Result<EncodedMessage> {
    if bytes.len() < FRAME_HEADER_SIZE {
        return Err(FramingError::FrameTooShort {
            required: FRAME_HEADER_SIZE,
            actual: bytes.len(),
        }
        .into());
    }

    let (prefix, body) = bytes.split_at(FRAME_HEADER_SIZE);
    let magic = [prefix[0], prefix[1], prefix[2], prefix[3]];
    if magic != MAGIC {
        return Err(FramingError::InvalidMagic {
            expected: MAGIC,
            actual: magic,
        }
        .into());
    }

    let header_len = u32::from_le_bytes([prefix[4], prefix[5], prefix[6], prefix[7]]);
    let mut bits_bytes = [0u8; 8];
    bits_bytes.copy_from_slice(&prefix[8..16]);
    let payload_bits = u64::from_le_bytes(bits_bytes);
    let crc32 = u32::from_le_bytes([prefix[16], prefix[17], prefix[18], prefix[19]]);

    let payload_bit_count =
        usize::try_from(payload_bits).map_err(|_| FramingError::LengthMismatch {
            expected: usize::MAX,
            actual: body.len(),
        })?;
    let payload_len = payload_bit_count / 8 + usize::from(payload_bit_count % 8 != 0);
    let expected = payload_len.saturating_add(header_len as usize);
    if expected != body.len() {
        return Err(FramingError::LengthMismatch {
            expected,
            actual: body.len(),
        }
        .into());
    }

    let (header, payload) = body.split_at(header_len as usize);
    let computed = compute_crc(header_len, payload_bits, header, payload);
    if computed != crc32 {
        return Err(Error::Crc {
            expected: crc32,
            actual: computed,
        });
    }

    let payload = BitBuffer::from_parts(payload.to_vec(), payload_bit_count).ok_or(
        FramingError::LengthMismatch {
            expected: payload_len,
            actual: payload.len(),
        },
    )?;

    Ok(EncodedMessage {
        header: BitBuffer::from_byte_slice(header),
        payload,
    })
}

/// Compute CRC32 over the protected fields.
fn compute_crc(header_len: u32, payload_bits: u64, header: &[u8], payload: &[u8]) -> u32 {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(&header_len.to_le_bytes());
    hasher.update(&payload_bits.to_le_bytes());
    hasher.update(header);
    hasher.update(payload);
    hasher.finalize()
}

/// Encode raw bytes and wrap the result in a container frame.
pub fn compress(raw_data: &[u8]) -> Result<Vec<u8>> {
    let encoded = encode(raw_data)?;
    Ok(serialize_frame(&encoded))
}

/// Parse a container frame and decode it.
pub fn decompress(frame: &[u8]) -> Result<Vec<u8>> {
    let encoded = parse_frame(frame)?;
    decode(&encoded)
}
