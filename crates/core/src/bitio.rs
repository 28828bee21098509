//! Bit-level storage for codes, headers and payloads.
//!
//! `BitBuffer` is a growable sequence of bits packed MSB-first into bytes.
//! `BitReader` walks a buffer one bit at a time without consuming it.
//!
//! # Padding Rules
//! - The buffer always holds exactly `ceil(len / 8)` bytes
//! - Bits past `len` in the final byte are kept at zero
//!
//! # Example
//! ```
//! use chuff_core::bitio::{BitBuffer, BitReader};
//!
//! let mut bits = BitBuffer::new();
//! bits.push_bits(0b101, 3); // 1, 0, 1
//! bits.append_bit(true);
//! assert_eq!(bits.to_binary_string(), "1011");
//! assert_eq!(bits.as_bytes(), &[0b1011_0000]);
//!
//! let mut reader = BitReader::new(&bits);
//! assert_eq!(reader.read_bit(), Some(true));
//! assert_eq!(reader.read_bit(), Some(false));
//! ```

use std::collections::TryReserveError;
use std::fmt;

/// An ordered sequence of bits, MSB-first within each backing byte.
///
/// # Invariants
/// - `bytes.len() == ceil(len / 8)`
/// - unused low bits of the last byte are zero, so two buffers holding the
///   same bits compare equal
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct BitBuffer {
    /// Backing bytes
    bytes: Vec<u8>,
    /// Number of valid bits
    len: usize,
}

impl BitBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self {
            bytes: Vec::new(),
            len: 0,
        }
    }

    /// Create an empty buffer with room for `bits` bits, reporting allocation
    /// failure instead of aborting.
    pub fn try_with_capacity(bits: usize) -> Result<Self, TryReserveError> {
        let mut buf = Self::new();
        buf.try_reserve(bits)?;
        Ok(buf)
    }

    /// Wrap whole bytes; the bit length is `8 * bytes.len()`.
    pub fn from_byte_slice(bytes: &[u8]) -> Self {
        Self {
            bytes: bytes.to_vec(),
            len: bytes.len() * 8,
        }
    }

    /// Rebuild a buffer from its backing bytes and exact bit length.
    ///
    /// Returns `None` if `bytes` is not exactly `ceil(len / 8)` long.
    /// Padding bits past `len` are cleared.
    pub fn from_parts(mut bytes: Vec<u8>, len: usize) -> Option<Self> {
        if bytes.len() != byte_len_for(len) {
            return None;
        }
        let used = len % 8;
        if used != 0 {
            if let Some(last) = bytes.last_mut() {
                *last &= 0xFF << (8 - used);
            }
        }
        Some(Self { bytes, len })
    }

    /// Reserve room for `additional` more bits.
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), TryReserveError> {
        let needed = byte_len_for(self.len.saturating_add(additional));
        self.bytes
            .try_reserve(needed.saturating_sub(self.bytes.len()))
    }

    /// Append one bit at the current length.
    pub fn append_bit(&mut self, value: bool) {
        let offset = self.len % 8;
        if offset == 0 {
            self.bytes.push(0);
        }
        if value {
            let last = self.bytes.len() - 1;
            self.bytes[last] |= 1 << (7 - offset);
        }
        self.len += 1;
    }

    /// Append the lowest `count` bits of `value`, most significant first.
    ///
    /// `count` must be at most 128.
    pub fn push_bits(&mut self, value: u128, count: usize) {
        debug_assert!(count <= 128);
        for shift in (0..count).rev() {
            self.append_bit((value >> shift) & 1 == 1);
        }
    }

    /// Append every bit of `other`.
    pub fn extend_from(&mut self, other: &BitBuffer) {
        for bit in other.iter() {
            self.append_bit(bit);
        }
    }

    /// Read bit `pos`.
    ///
    /// # Panics
    /// Panics if `pos >= self.len()`.
    pub fn bit_at(&self, pos: usize) -> bool {
        assert!(pos < self.len, "bit {pos} out of range for length {}", self.len);
        (self.bytes[pos / 8] >> (7 - pos % 8)) & 1 == 1
    }

    /// Read bit `pos`, or `None` past the end.
    pub fn get(&self, pos: usize) -> Option<bool> {
        (pos < self.len).then(|| self.bit_at(pos))
    }

    /// Remove and return the last bit.
    pub fn remove_last_bit(&mut self) -> Option<bool> {
        if self.len == 0 {
            return None;
        }
        let pos = self.len - 1;
        let bit = self.bit_at(pos);
        self.bytes[pos / 8] &= !(1 << (7 - pos % 8));
        self.len = pos;
        if pos % 8 == 0 {
            self.bytes.pop();
        }
        Some(bit)
    }

    /// Interpret the bits as an unsigned integer, MSB first.
    ///
    /// Returns `None` for buffers longer than 128 bits.
    pub fn to_u128(&self) -> Option<u128> {
        if self.len > 128 {
            return None;
        }
        Some(self.iter().fold(0u128, |acc, bit| (acc << 1) | bit as u128))
    }

    /// Number of valid bits.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when no bits are stored.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of backing bytes (`ceil(len / 8)`).
    pub fn byte_len(&self) -> usize {
        self.bytes.len()
    }

    /// Backing bytes, zero-padded in the final byte.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Iterate over the bits in order.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len).map(move |pos| self.bit_at(pos))
    }

    /// Render as a string of `'0'` and `'1'` characters.
    pub fn to_binary_string(&self) -> String {
        self.iter().map(|bit| if bit { '1' } else { '0' }).collect()
    }
}

impl fmt::Display for BitBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_binary_string())
    }
}

impl FromIterator<bool> for BitBuffer {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        let mut buf = BitBuffer::new();
        for bit in iter {
            buf.append_bit(bit);
        }
        buf
    }
}

fn byte_len_for(bits: usize) -> usize {
    bits / 8 + usize::from(bits % 8 != 0)
}

/// Reads bits MSB-first from a `BitBuffer`.
///
/// Unlike a byte-slice reader this knows the exact bit count, so padding in
/// the last byte is never mistaken for data.
///
/// # Invariants
/// - `position` never exceeds `bits.len()`
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    /// Source bits
    bits: &'a BitBuffer,
    /// Index of the next bit to read
    position: usize,
}

impl<'a> BitReader<'a> {
    /// Create a new BitReader for the given buffer.
    pub fn new(bits: &'a BitBuffer) -> Self {
        Self { bits, position: 0 }
    }

    /// Read a single bit, or `None` at the end of the buffer.
    pub fn read_bit(&mut self) -> Option<bool> {
        let bit = self.bits.get(self.position)?;
        self.position += 1;
        Some(bit)
    }

    /// Return the number of bits remaining.
    pub fn bits_remaining(&self) -> usize {
        self.bits.len() - self.position
    }

    /// Return the current bit position.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Check if we're at the end of the buffer.
    pub fn is_empty(&self) -> bool {
        self.position >= self.bits.len()
    }
}
