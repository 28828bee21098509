//! Payload encoding and decoding.
//!
//! Encoding appends each byte's canonical code to the payload using a
//! 256-slot lookup table. Decoding walks a `DecodeTree`: a complete binary
//! tree flattened into an array with heap addressing (root 0, children of
//! `i` at `2i + 1` and `2i + 2`), where each code's final index holds its
//! alphabet entry.

use log::{debug, warn};

use crate::alphabet::Alphabet;
use crate::bitio::{BitBuffer, BitReader};
use crate::error::{CorruptionError, PreconditionError, Result};

/// Smallest capacity the decode output starts with.
const MIN_OUTPUT_CAPACITY: usize = 16;

/// Encode `bytes` with the codes in `alphabet`.
///
/// # Errors
/// - `PreconditionError::SymbolNotInAlphabet` for a byte with no code
/// - `Error::AllocationFailed` if the payload cannot be reserved
pub fn encode_message(bytes: &[u8], alphabet: &Alphabet) -> Result<BitBuffer> {
    let table = alphabet.index_table();
    let entries = alphabet.entries();

    let mut total_bits = 0usize;
    for &byte in bytes {
        let index = table[byte as usize].ok_or(PreconditionError::SymbolNotInAlphabet(byte))?;
        total_bits = total_bits.saturating_add(entries[index].code_len());
    }

    let mut payload = BitBuffer::try_with_capacity(total_bits)?;
    for &byte in bytes {
        let index = table[byte as usize].ok_or(PreconditionError::SymbolNotInAlphabet(byte))?;
        payload.extend_from(&entries[index].code);
    }
    Ok(payload)
}

/// Flattened decode tree borrowing the alphabet it was built from.
#[derive(Debug)]
pub struct DecodeTree<'a> {
    alphabet: &'a Alphabet,
    /// Alphabet entry index per slot; alphabets hold at most 256 entries
    slots: Vec<Option<u8>>,
}

impl<'a> DecodeTree<'a> {
    /// Lay out every code of `alphabet` in a `2^(L+1) - 1` slot array.
    ///
    /// # Errors
    /// - `CorruptionError::CodeLengthTooLong` if the array size overflows `usize`
    /// - `CorruptionError::OverSubscribed` if two codes land on one slot
    /// - `Error::AllocationFailed` if the array cannot be reserved
    pub fn build(alphabet: &'a Alphabet) -> Result<Self> {
        let depth = alphabet.max_code_length();
        let size = slot_count(depth).ok_or(CorruptionError::CodeLengthTooLong {
            length: depth,
            max: usize::BITS as usize - 2,
        })?;

        let mut slots: Vec<Option<u8>> = Vec::new();
        slots.try_reserve_exact(size)?;
        slots.resize(size, None);

        for (index, entry) in alphabet.iter().enumerate() {
            let slot = entry
                .code
                .iter()
                .fold(0usize, |idx, bit| 2 * idx + 1 + bit as usize);
            if slots[slot].is_some() {
                return Err(CorruptionError::OverSubscribed {
                    length: entry.code_len(),
                }
                .into());
            }
            slots[slot] = Some(index as u8);
        }

        debug!(
            "decode tree: {} symbols, depth {}, {} slots",
            alphabet.len(),
            depth,
            size
        );
        Ok(Self { alphabet, slots })
    }

    /// Number of slots, populated or not.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// A decode tree always has at least the root slot.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Symbol stored at `index`, if that slot ends a code.
    pub fn symbol_at(&self, index: usize) -> Option<u8> {
        let entry = (*self.slots.get(index)?)?;
        Some(self.alphabet.entries()[entry as usize].symbol)
    }

    /// True when `index` lies inside the array.
    pub fn contains(&self, index: usize) -> bool {
        index < self.slots.len()
    }
}

fn slot_count(depth: usize) -> Option<usize> {
    let shift = u32::try_from(depth + 1).ok()?;
    if shift >= usize::BITS {
        return None;
    }
    Some((1usize << shift) - 1)
}

/// Decode `payload` against `tree`.
///
/// # Errors
/// - `CorruptionError::InvalidCode` if the bits leave the tree before
///   reaching a symbol
/// - `CorruptionError::TruncatedCode` if the payload ends inside a code
/// - `Error::AllocationFailed` if the output cannot grow
pub fn decode_message(payload: &BitBuffer, tree: &DecodeTree<'_>) -> Result<Vec<u8>> {
    let mut output: Vec<u8> = Vec::new();
    output.try_reserve_exact(payload.byte_len().max(MIN_OUTPUT_CAPACITY))?;

    let mut reader = BitReader::new(payload);
    let mut index = 0usize;
    let mut code_start = 0usize;

    while let Some(bit) = reader.read_bit() {
        index = 2 * index + 1 + bit as usize;
        if !tree.contains(index) {
            warn!("payload bit {} leaves the decode tree", reader.position() - 1);
            return Err(CorruptionError::InvalidCode {
                position: code_start,
            }
            .into());
        }
        if let Some(symbol) = tree.symbol_at(index) {
            if output.len() == output.capacity() {
                output.try_reserve_exact(output.capacity())?;
            }
            output.push(symbol);
            index = 0;
            code_start = reader.position();
        }
    }

    if index != 0 {
        warn!("payload ends inside a code at bit {}", code_start);
        return Err(CorruptionError::TruncatedCode {
            position: code_start,
        }
        .into());
    }

    output.shrink_to_fit();
    Ok(output)
}
