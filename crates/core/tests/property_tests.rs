use chuff_core::header::decode_header;
use chuff_core::{decode, encode, BitBuffer, EncodedMessage};
use proptest::prelude::*;

fn is_prefix(short: &BitBuffer, long: &BitBuffer) -> bool {
    short.len() <= long.len() && short.iter().zip(long.iter()).all(|(a, b)| a == b)
}

proptest! {
    #[test]
    fn test_roundtrip(input in prop::collection::vec(any::<u8>(), 0..2000)) {
        let encoded = encode(&input).unwrap();
        prop_assert_eq!(decode(&encoded).unwrap(), input);
    }

    #[test]
    fn test_roundtrip_small_alphabet(
        input in prop::collection::vec(0..4u8, 1..500),
    ) {
        let encoded = encode(&input).unwrap();
        prop_assert!(encoded.max_code_length() <= 3);
        prop_assert_eq!(decode(&encoded).unwrap(), input);
    }

    #[test]
    fn test_deterministic(input in prop::collection::vec(any::<u8>(), 0..500)) {
        prop_assert_eq!(encode(&input).unwrap(), encode(&input).unwrap());
    }

    #[test]
    fn test_header_size(input in prop::collection::vec(any::<u8>(), 1..1000)) {
        let mut seen = [false; 256];
        for &byte in &input {
            seen[byte as usize] = true;
        }
        let distinct = seen.iter().filter(|&&s| s).count();

        let encoded = encode(&input).unwrap();
        let max_len = encoded.max_code_length();
        prop_assert!(max_len >= 1);
        prop_assert_eq!(encoded.header.byte_len(), max_len + 1 + distinct);
        prop_assert_eq!(encoded.symbol_count(), distinct);
    }

    #[test]
    fn test_header_codes_canonical(input in prop::collection::vec(any::<u8>(), 1..1000)) {
        let encoded = encode(&input).unwrap();
        let alphabet = decode_header(&encoded.header).unwrap();
        let entries = alphabet.entries();

        // sorted by (length, symbol)
        for pair in entries.windows(2) {
            prop_assert!(
                (pair[0].code_len(), pair[0].symbol) < (pair[1].code_len(), pair[1].symbol)
            );
        }

        // prefix-free
        for (i, a) in entries.iter().enumerate() {
            for b in &entries[i + 1..] {
                prop_assert!(!is_prefix(&a.code, &b.code));
            }
        }

        // complete, except the one-symbol code "0"
        if entries.len() > 1 {
            let max_len = alphabet.max_code_length();
            let kraft: u128 = entries
                .iter()
                .map(|e| 1u128 << (max_len - e.code_len()))
                .sum();
            prop_assert_eq!(kraft, 1u128 << max_len);
        }
    }

    #[test]
    fn test_flipped_payload_bit_never_panics(
        input in prop::collection::vec(any::<u8>(), 1..300),
        flip in any::<prop::sample::Index>(),
    ) {
        let encoded = encode(&input).unwrap();
        let mut bits: Vec<bool> = encoded.payload.iter().collect();
        let pos = flip.index(bits.len());
        bits[pos] = !bits[pos];

        let tampered = EncodedMessage {
            header: encoded.header.clone(),
            payload: bits.into_iter().collect(),
        };
        match decode(&tampered) {
            Ok(output) => prop_assert_ne!(output, input),
            Err(err) => prop_assert!(err.is_corruption()),
        }
    }

    #[test]
    fn test_random_header_never_panics(
        header in prop::collection::vec(any::<u8>(), 0..64),
        payload in prop::collection::vec(any::<bool>(), 0..64),
    ) {
        let tampered = EncodedMessage {
            header: BitBuffer::from_byte_slice(&header),
            payload: payload.into_iter().collect(),
        };
        if let Err(err) = decode(&tampered) {
            prop_assert!(err.is_corruption());
        }
    }
}
