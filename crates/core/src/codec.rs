//! Public encode/decode entry points.
//!
//! `encode` runs the whole pipeline (alphabet, tree, codes, canonical form,
//! header, payload) and returns only the header and payload bits. Every
//! intermediate structure is owned by the call and dropped on return,
//! including on early error returns.

use log::debug;

use crate::alphabet::Alphabet;
use crate::bitio::BitBuffer;
use crate::codes::{canonicalize, generate_codes};
use crate::error::{CorruptionError, Result};
use crate::header::{decode_header, encode_header};
use crate::message::{decode_message, encode_message, DecodeTree};
use crate::tree::HuffmanTree;

/// Header and payload bits: everything needed to rebuild the message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodedMessage {
    /// Serialized canonical code (see `header`)
    pub header: BitBuffer,
    /// Concatenated symbol codes
    pub payload: BitBuffer,
}

impl EncodedMessage {
    /// True for the encoding of the empty message.
    pub fn is_empty(&self) -> bool {
        self.header.is_empty() && self.payload.is_empty()
    }

    /// Longest code length, read from the first header byte.
    pub fn max_code_length(&self) -> usize {
        self.header.as_bytes().first().map_or(0, |&l| l as usize)
    }

    /// Number of distinct symbols, derived from the header size.
    pub fn symbol_count(&self) -> usize {
        self.header
            .byte_len()
            .saturating_sub(self.max_code_length() + 1)
    }

    /// Total encoded size in bits.
    pub fn total_bits(&self) -> usize {
        self.header.len() + self.payload.len()
    }
}

/// Encode `message` into a canonical Huffman header and payload.
///
/// The empty message encodes to an empty header and payload.
///
/// # Errors
/// `Error::AllocationFailed` if any buffer cannot be reserved.
pub fn encode(message: &[u8]) -> Result<EncodedMessage> {
    let mut alphabet = Alphabet::new();
    alphabet.populate(message)?;
    if alphabet.is_empty() {
        debug!("empty message: empty header and payload");
        return Ok(EncodedMessage::default());
    }
    debug!(
        "alphabet: {} distinct symbols over {} bytes",
        alphabet.len(),
        message.len()
    );

    let tree = HuffmanTree::build(&alphabet)?;
    generate_codes(&tree, &mut alphabet);
    drop(tree);
    canonicalize(&mut alphabet)?;

    let header = encode_header(&alphabet)?;
    let payload = encode_message(message, &alphabet)?;
    debug!(
        "encoded {} bytes: max code length {}, header {} bytes, payload {} bits",
        message.len(),
        alphabet.max_code_length(),
        header.byte_len(),
        payload.len()
    );

    Ok(EncodedMessage { header, payload })
}

/// Rebuild the original bytes from an encoded message.
///
/// # Errors
/// - `Error::HeaderCorrupt` for a malformed header or a payload that does
///   not decode cleanly against it
/// - `Error::AllocationFailed` if the decode tree or output cannot grow
pub fn decode(encoded: &EncodedMessage) -> Result<Vec<u8>> {
    let alphabet = decode_header(&encoded.header)?;
    if alphabet.is_empty() {
        if !encoded.payload.is_empty() {
            return Err(CorruptionError::PayloadWithoutHeader(encoded.payload.len()).into());
        }
        return Ok(Vec::new());
    }

    let tree = DecodeTree::build(&alphabet)?;
    let decoded = decode_message(&encoded.payload, &tree)?;
    debug!(
        "decoded {} payload bits into {} bytes",
        encoded.payload.len(),
        decoded.len()
    );
    Ok(decoded)
}

/// Render a bit buffer as `'0'`/`'1'` characters for debugging.
pub fn display_bits(bits: &BitBuffer) -> String {
    bits.to_binary_string()
}
