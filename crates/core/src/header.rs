//! Header serialization.
//!
//! The header carries only code lengths and symbols; codes are rebuilt with
//! the same forward pass the encoder used.
//!
//! # Header Format
//!
//! ```text
//! +-----------------------+
//! | L (1 byte)            |  longest code length present
//! +-----------------------+
//! | count[1..=L] (L)      |  number of symbols with each code length
//! +-----------------------+
//! | symbols (N)           |  ordered by (length, value), N = sum of counts
//! +-----------------------+
//! ```
//!
//! Total size is `L + 1 + N` bytes. The empty message has an empty header.
//!
//! A count is one byte, so 256 symbols sharing one length is written as 0.
//! The decoder recognizes that case from `N = 256` with every count zero.

use log::warn;

use crate::alphabet::{Alphabet, SymbolEntry, MAX_SYMBOLS};
use crate::bitio::BitBuffer;
use crate::codes::{CanonicalCounter, MAX_CODE_LENGTH};
use crate::error::{CorruptionError, PreconditionError, Result};

/// Size in bytes of the header for `symbols` symbols with longest code `max_code_length`.
pub fn header_len(max_code_length: usize, symbols: usize) -> usize {
    if symbols == 0 {
        0
    } else {
        max_code_length + 1 + symbols
    }
}

/// Serialize a canonicalized alphabet.
///
/// # Errors
/// `PreconditionError::AlphabetNotCanonical` unless the alphabet is sorted by
/// (code length, symbol) with every code assigned.
pub fn encode_header(alphabet: &Alphabet) -> Result<BitBuffer> {
    if alphabet.is_empty() {
        return Ok(BitBuffer::new());
    }
    let max_len = alphabet.max_code_length();
    if !alphabet.is_canonical_order() || max_len > MAX_CODE_LENGTH {
        return Err(PreconditionError::AlphabetNotCanonical.into());
    }

    let size = header_len(max_len, alphabet.len());
    let mut bytes: Vec<u8> = Vec::new();
    bytes.try_reserve_exact(size)?;
    bytes.resize(size, 0);

    bytes[0] = max_len as u8;
    let symbols_start = max_len + 1;
    for (i, entry) in alphabet.iter().enumerate() {
        let slot = &mut bytes[entry.code_len()];
        *slot = slot.wrapping_add(1);
        bytes[symbols_start + i] = entry.symbol;
    }

    Ok(BitBuffer::from_byte_slice(&bytes))
}

/// Rebuild the canonical alphabet described by `header`.
///
/// Entries come back in (length, symbol) order with frequency 0.
///
/// # Errors
/// `Error::HeaderCorrupt` if the header is malformed: bad alignment, counts
/// that disagree with the symbol bytes, repeated or unsorted symbols, or
/// lengths that do not form a complete prefix code.
pub fn decode_header(header: &BitBuffer) -> Result<Alphabet> {
    parse(header).map_err(|err| {
        warn!("rejecting header of {} bits: {}", header.len(), err);
        err
    })
}

fn parse(header: &BitBuffer) -> Result<Alphabet> {
    if header.is_empty() {
        return Ok(Alphabet::new());
    }
    if header.len() % 8 != 0 {
        return Err(CorruptionError::HeaderNotByteAligned(header.len()).into());
    }

    let bytes = header.as_bytes();
    let max_len = bytes[0] as usize;
    if max_len == 0 {
        return Err(CorruptionError::ZeroMaxLength.into());
    }
    if max_len > MAX_CODE_LENGTH {
        return Err(CorruptionError::CodeLengthTooLong {
            length: max_len,
            max: MAX_CODE_LENGTH,
        }
        .into());
    }
    if bytes.len() < max_len + 2 {
        return Err(CorruptionError::HeaderTooShort {
            required: max_len + 2,
            actual: bytes.len(),
        }
        .into());
    }

    let mut counts: Vec<usize> = bytes[1..=max_len].iter().map(|&c| c as usize).collect();
    let symbols = &bytes[max_len + 1..];
    let declared: usize = counts.iter().sum();
    if declared != symbols.len() {
        if declared == 0 && symbols.len() == MAX_SYMBOLS {
            counts[max_len - 1] = MAX_SYMBOLS;
        } else {
            return Err(CorruptionError::CountMismatch {
                declared,
                actual: symbols.len(),
            }
            .into());
        }
    }
    if counts[max_len - 1] == 0 {
        return Err(CorruptionError::MaxLengthUnused(max_len).into());
    }

    let mut entries: Vec<SymbolEntry> = Vec::new();
    entries.try_reserve_exact(symbols.len())?;

    let mut seen = [false; MAX_SYMBOLS];
    let mut counter = CanonicalCounter::new();
    let mut next_symbol = symbols.iter();
    for (length, &count) in (1..=max_len).zip(counts.iter()) {
        let mut prev: Option<u8> = None;
        for _ in 0..count {
            // counts were checked against symbols.len() above
            let Some(&symbol) = next_symbol.next() else {
                return Err(CorruptionError::CountMismatch {
                    declared: symbols.len() + 1,
                    actual: symbols.len(),
                }
                .into());
            };
            if seen[symbol as usize] {
                return Err(CorruptionError::DuplicateSymbol(symbol).into());
            }
            if prev.is_some_and(|p| p > symbol) {
                return Err(CorruptionError::UnsortedSymbols { length }.into());
            }
            seen[symbol as usize] = true;
            prev = Some(symbol);

            let value = counter
                .next_code(length)
                .ok_or(CorruptionError::OverSubscribed { length })?;
            let mut entry = SymbolEntry::new(symbol, 0);
            entry.code.push_bits(value, length);
            entries.push(entry);
        }
    }

    let single_bit = entries.len() == 1 && max_len == 1;
    if !counter.is_complete() && !single_bit {
        return Err(CorruptionError::IncompleteCode.into());
    }

    Ok(Alphabet::from_entries(entries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codes::{canonicalize, generate_codes};
    use crate::error::Error;
    use crate::tree::HuffmanTree;

    fn canonical(data: &[u8]) -> Alphabet {
        let mut alphabet = Alphabet::from_bytes(data);
        let tree = HuffmanTree::build(&alphabet).unwrap();
        generate_codes(&tree, &mut alphabet);
        canonicalize(&mut alphabet).unwrap();
        alphabet
    }

    fn corrupt(bytes: &[u8]) -> CorruptionError {
        match decode_header(&BitBuffer::from_byte_slice(bytes)) {
            Err(Error::HeaderCorrupt(err)) => err,
            other => panic!("expected corrupt header, got {other:?}"),
        }
    }

    #[test]
    fn test_two_symbol_header() {
        let header = encode_header(&canonical(b"ab")).unwrap();
        assert_eq!(header.as_bytes(), &[1, 2, b'a', b'b']);
        assert_eq!(header.len(), 32);
    }

    #[test]
    fn test_single_symbol_header() {
        let header = encode_header(&canonical(b"aaaa")).unwrap();
        assert_eq!(header.as_bytes(), &[1, 1, b'a']);
    }

    #[test]
    fn test_abracadabra_header() {
        let header = encode_header(&canonical(b"abracadabra")).unwrap();
        assert_eq!(header.as_bytes(), &[3, 1, 0, 4, b'a', b'b', b'c', b'd', b'r']);
    }

    #[test]
    fn test_empty_alphabet_empty_header() {
        let header = encode_header(&Alphabet::new()).unwrap();
        assert!(header.is_empty());
        let alphabet = decode_header(&header).unwrap();
        assert!(alphabet.is_empty());
    }

    #[test]
    fn test_decode_matches_encoder_codes() {
        let data = b"aabbccddbbeaebdddfffdbffddabbbbbcdefaabbcccccaabbddfffdcecc";
        let original = canonical(data);
        let header = encode_header(&original).unwrap();
        let decoded = decode_header(&header).unwrap();

        assert_eq!(decoded.len(), original.len());
        for (a, b) in original.iter().zip(decoded.iter()) {
            assert_eq!(a.symbol, b.symbol);
            assert_eq!(a.code, b.code);
            assert_eq!(b.freq, 0);
        }
    }

    #[test]
    fn test_header_size() {
        let alphabet = canonical(b"hello, world");
        let header = encode_header(&alphabet).unwrap();
        assert_eq!(
            header.byte_len(),
            alphabet.max_code_length() + 1 + alphabet.len()
        );
    }

    #[test]
    fn test_all_symbols_same_length() {
        let data: Vec<u8> = (0..=255).collect();
        let alphabet = canonical(&data);
        assert_eq!(alphabet.max_code_length(), 8);

        let header = encode_header(&alphabet).unwrap();
        assert_eq!(header.byte_len(), 8 + 1 + 256);
        // count[8] = 256 wraps to 0
        assert!(header.as_bytes()[1..=8].iter().all(|&c| c == 0));

        let decoded = decode_header(&header).unwrap();
        assert_eq!(decoded.len(), 256);
        assert!(decoded.iter().all(|e| e.code_len() == 8));
    }

    #[test]
    fn test_requires_canonical_alphabet() {
        let alphabet = Alphabet::from_bytes(b"abc");
        let result = encode_header(&alphabet);
        assert!(matches!(
            result,
            Err(Error::PreconditionViolated(PreconditionError::AlphabetNotCanonical))
        ));
    }

    #[test]
    fn test_not_byte_aligned() {
        let header: BitBuffer = [true, false, true].into_iter().collect();
        assert!(matches!(
            decode_header(&header),
            Err(Error::HeaderCorrupt(CorruptionError::HeaderNotByteAligned(3)))
        ));
    }

    #[test]
    fn test_zero_max_length() {
        assert_eq!(corrupt(&[0, b'a']), CorruptionError::ZeroMaxLength);
    }

    #[test]
    fn test_length_too_long() {
        assert!(matches!(
            corrupt(&[200, 1, 2, 3]),
            CorruptionError::CodeLengthTooLong { length: 200, .. }
        ));
    }

    #[test]
    fn test_too_short() {
        assert!(matches!(
            corrupt(&[3, 1, 0]),
            CorruptionError::HeaderTooShort { .. }
        ));
    }

    #[test]
    fn test_count_mismatch() {
        assert_eq!(
            corrupt(&[1, 2, b'a', b'b', b'c']),
            CorruptionError::CountMismatch {
                declared: 2,
                actual: 3
            }
        );
        assert_eq!(
            corrupt(&[1, 3, b'a', b'b']),
            CorruptionError::CountMismatch {
                declared: 3,
                actual: 2
            }
        );
    }

    #[test]
    fn test_max_length_unused() {
        assert_eq!(corrupt(&[2, 1, 0, b'a']), CorruptionError::MaxLengthUnused(2));
    }

    #[test]
    fn test_duplicate_symbol() {
        assert_eq!(
            corrupt(&[2, 1, 2, b'a', b'a', b'b']),
            CorruptionError::DuplicateSymbol(b'a')
        );
    }

    #[test]
    fn test_unsorted_symbols() {
        assert_eq!(
            corrupt(&[1, 2, b'b', b'a']),
            CorruptionError::UnsortedSymbols { length: 1 }
        );
    }

    #[test]
    fn test_oversubscribed() {
        assert_eq!(
            corrupt(&[1, 3, b'a', b'b', b'c']),
            CorruptionError::OverSubscribed { length: 1 }
        );
    }

    #[test]
    fn test_incomplete_code() {
        // lengths 1 and 2 leave code 11 unused
        assert_eq!(
            corrupt(&[2, 1, 1, b'a', b'b']),
            CorruptionError::IncompleteCode
        );
        // a lone symbol must use the one-bit code
        assert_eq!(corrupt(&[2, 0, 1, b'a']), CorruptionError::IncompleteCode);
    }
}
