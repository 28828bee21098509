//! Symbol statistics for a single message.
//!
//! An `Alphabet` holds one `SymbolEntry` per distinct byte value seen in the
//! input. It is reordered in place twice during encoding: ascending by
//! frequency for tree construction, then ascending by (code length, symbol)
//! once canonical codes are assigned.

use crate::bitio::BitBuffer;
use crate::error::{PreconditionError, Result};

/// Number of distinct single-byte symbols.
pub const MAX_SYMBOLS: usize = 256;

/// One distinct byte value, its frequency, and (after code generation) its code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolEntry {
    /// The byte value
    pub symbol: u8,
    /// Number of occurrences in the input (0 for alphabets rebuilt from a header)
    pub freq: usize,
    /// Code bits; empty until codes are generated
    pub code: BitBuffer,
}

impl SymbolEntry {
    /// Create an entry with no code yet.
    pub fn new(symbol: u8, freq: usize) -> Self {
        Self {
            symbol,
            freq,
            code: BitBuffer::new(),
        }
    }

    /// Length of the assigned code in bits.
    pub fn code_len(&self) -> usize {
        self.code.len()
    }
}

/// Ordered collection of distinct symbols.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Alphabet {
    entries: Vec<SymbolEntry>,
}

impl Alphabet {
    /// Create an empty alphabet.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Build a fresh alphabet from `bytes`.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut alphabet = Self::new();
        alphabet.fill(&count_frequencies(bytes));
        alphabet
    }

    /// Populate this alphabet from `bytes`, sorted ascending by frequency.
    ///
    /// Ties keep byte-value order. Empty input leaves the alphabet empty.
    ///
    /// # Errors
    /// `PreconditionError::AlphabetNotEmpty` if the alphabet already holds symbols.
    pub fn populate(&mut self, bytes: &[u8]) -> Result<()> {
        if !self.entries.is_empty() {
            return Err(PreconditionError::AlphabetNotEmpty.into());
        }
        self.fill(&count_frequencies(bytes));
        Ok(())
    }

    fn fill(&mut self, frequencies: &[usize; MAX_SYMBOLS]) {
        self.entries = frequencies
            .iter()
            .enumerate()
            .filter(|(_, freq)| **freq > 0)
            .map(|(symbol, &freq)| SymbolEntry::new(symbol as u8, freq))
            .collect();
        self.sort_by_frequency();
    }

    /// Wrap entries produced elsewhere (the header decoder).
    pub(crate) fn from_entries(entries: Vec<SymbolEntry>) -> Self {
        Self { entries }
    }

    /// Stable sort ascending by frequency.
    pub fn sort_by_frequency(&mut self) {
        self.entries.sort_by_key(|entry| entry.freq);
    }

    /// Sort ascending by (code length, symbol value).
    pub fn sort_canonical(&mut self) {
        self.entries
            .sort_by_key(|entry| (entry.code_len(), entry.symbol));
    }

    /// True when entries are strictly ordered by (code length, symbol) and
    /// every entry has a code.
    pub fn is_canonical_order(&self) -> bool {
        self.entries.iter().all(|entry| !entry.code.is_empty())
            && self
                .entries
                .windows(2)
                .all(|w| (w[0].code_len(), w[0].symbol) < (w[1].code_len(), w[1].symbol))
    }

    /// Longest code length present (0 for an empty alphabet).
    pub fn max_code_length(&self) -> usize {
        self.entries
            .iter()
            .map(SymbolEntry::code_len)
            .max()
            .unwrap_or(0)
    }

    /// Direct byte -> entry index table.
    pub fn index_table(&self) -> [Option<usize>; MAX_SYMBOLS] {
        let mut table = [None; MAX_SYMBOLS];
        for (index, entry) in self.entries.iter().enumerate() {
            table[entry.symbol as usize] = Some(index);
        }
        table
    }

    /// Find the entry for a byte value.
    pub fn get(&self, symbol: u8) -> Option<&SymbolEntry> {
        self.entries.iter().find(|entry| entry.symbol == symbol)
    }

    /// Number of distinct symbols.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True for the alphabet of the empty message.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in their current order.
    pub fn entries(&self) -> &[SymbolEntry] {
        &self.entries
    }

    pub(crate) fn entries_mut(&mut self) -> &mut [SymbolEntry] {
        &mut self.entries
    }

    /// Iterate over entries in their current order.
    pub fn iter(&self) -> std::slice::Iter<'_, SymbolEntry> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a Alphabet {
    type Item = &'a SymbolEntry;
    type IntoIter = std::slice::Iter<'a, SymbolEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Count occurrences of every byte value in one pass.
pub fn count_frequencies(bytes: &[u8]) -> [usize; MAX_SYMBOLS] {
    let mut frequencies = [0usize; MAX_SYMBOLS];
    for &byte in bytes {
        frequencies[byte as usize] += 1;
    }
    frequencies
}
