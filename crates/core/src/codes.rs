//! Code generation and canonicalization.
//!
//! `generate_codes` walks the Huffman tree and records each leaf's path
//! (left = 0, right = 1) in its alphabet entry. `canonicalize` then keeps
//! only the lengths and reassigns codes as consecutive integers ordered by
//! (length, symbol), so a decoder can rebuild every code from lengths alone.

use log::trace;

use crate::alphabet::Alphabet;
use crate::bitio::BitBuffer;
use crate::error::{Error, Result};
use crate::tree::{HuffmanTree, Node, NodeId};

/// Longest code the canonical counter can represent.
pub const MAX_CODE_LENGTH: usize = 127;

/// Assign every alphabet entry the path to its leaf.
///
/// A tree made of a single leaf has an empty path; that symbol gets the
/// one-bit code `0` so the payload carries one bit per symbol.
pub fn generate_codes(tree: &HuffmanTree, alphabet: &mut Alphabet) {
    let mut path = BitBuffer::new();
    walk(tree, tree.root(), &mut path, alphabet);
}

fn walk(tree: &HuffmanTree, id: NodeId, path: &mut BitBuffer, alphabet: &mut Alphabet) {
    match *tree.node(id) {
        Node::Leaf { entry, .. } => {
            let code = &mut alphabet.entries_mut()[entry].code;
            *code = path.clone();
            if code.is_empty() {
                code.append_bit(false);
            }
        }
        Node::Internal { left, right, .. } => {
            path.append_bit(false);
            walk(tree, left, path, alphabet);
            path.remove_last_bit();

            path.append_bit(true);
            walk(tree, right, path, alphabet);
            path.remove_last_bit();
        }
    }
}

/// Sort by (code length, symbol) and replace each code with its canonical form.
///
/// # Errors
/// `Error::TreeConstructionFailed` if the lengths over-subscribe the code
/// space, which a Huffman tree never produces.
pub fn canonicalize(alphabet: &mut Alphabet) -> Result<()> {
    alphabet.sort_canonical();

    let mut counter = CanonicalCounter::new();
    for entry in alphabet.entries_mut() {
        let length = entry.code_len();
        let value = counter
            .next_code(length)
            .ok_or(Error::TreeConstructionFailed)?;

        let mut code = BitBuffer::new();
        code.push_bits(value, length);
        trace!("{:#04x} -> {}", entry.symbol, code);
        entry.code = code;
    }
    Ok(())
}

/// Forward-pass canonical code assignment.
///
/// Feed code lengths in non-decreasing order; each call returns the next
/// canonical code value for that length.
#[derive(Debug, Clone, Default)]
pub struct CanonicalCounter {
    next: u128,
    prev_len: usize,
    assigned: usize,
}

impl CanonicalCounter {
    /// Start at code 0 with no previous length.
    pub fn new() -> Self {
        Self::default()
    }

    /// Code value for the next symbol of length `length`.
    ///
    /// Returns `None` when `length` is 0, shorter than the previous length,
    /// longer than `MAX_CODE_LENGTH`, or when every code of this length is
    /// already taken.
    pub fn next_code(&mut self, length: usize) -> Option<u128> {
        if length == 0 || length < self.prev_len || length > MAX_CODE_LENGTH {
            return None;
        }
        if self.assigned > 0 {
            self.next = self.next.checked_shl((length - self.prev_len) as u32)?;
        }
        if self.next >> length != 0 {
            return None;
        }
        let code = self.next;
        self.next += 1;
        self.prev_len = length;
        self.assigned += 1;
        Some(code)
    }

    /// True when the codes handed out so far fill the whole code space of
    /// the last length, i.e. the code is complete.
    pub fn is_complete(&self) -> bool {
        self.assigned > 0 && self.next == 1u128 << self.prev_len
    }
}
