//! Integration tests for the full chuff pipeline.
//!
//! These tests verify end-to-end behavior: input -> encode -> frame ->
//! parse -> decode -> output, with verification that output matches input.

use chuff_core::{
    decode, display_bits, encode,
    error::{CorruptionError, Error},
    framing::{compress, decompress, parse_frame, serialize_frame},
    metrics::Metrics,
    BitBuffer, EncodedMessage,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Test a simple round-trip through the container format.
#[test]
fn test_full_pipeline() {
    let input_data = b"hello world! this is a test of the full pipeline with some repetition: aaaaaaaaaa bbbbbbbbbb cccccccccc";

    let encoded = encode(input_data).expect("encoding failed");
    let frame = serialize_frame(&encoded);
    let parsed = parse_frame(&frame).expect("frame parsing failed");
    let decoded = decode(&parsed).expect("decoding failed");

    assert_eq!(decoded, input_data, "output doesn't match input");
}

/// A six-symbol message with uneven frequencies.
#[test]
fn test_reference_message() {
    let message = b"aabbccddbbeaebdddfffdbffddabbbbbcdefaabbcccccaabbddfffdcecc";
    let encoded = encode(message).unwrap();

    println!("HEADER: {}", display_bits(&encoded.header));
    println!("MESSAGE: {}", display_bits(&encoded.payload));

    assert_eq!(encoded.symbol_count(), 6);
    assert_eq!(decode(&encoded).unwrap(), message);
}

/// The two-symbol scenario, checked bit by bit.
#[test]
fn test_two_symbols_exact_bits() {
    let encoded = encode(b"ab").unwrap();
    assert_eq!(
        display_bits(&encoded.header),
        "00000001000000100110000101100010"
    );
    assert_eq!(display_bits(&encoded.payload), "01");
    assert_eq!(decode(&encoded).unwrap(), b"ab");
}

/// Test with all symbols present (full 256-byte alphabet).
#[test]
fn test_all_symbols() {
    let input_data: Vec<u8> = (0..=255).collect();

    let encoded = encode(&input_data).expect("encode failed");
    // uniform frequencies give every symbol an 8-bit code
    assert_eq!(encoded.max_code_length(), 8);
    assert_eq!(encoded.symbol_count(), 256);
    assert_eq!(encoded.payload.len(), 256 * 8);

    let decoded = decompress(&serialize_frame(&encoded)).expect("decompress failed");
    assert_eq!(decoded, input_data);
}

/// Skewed frequencies over the whole byte range.
#[test]
fn test_skewed_all_symbols() {
    let mut input_data = Vec::new();
    for byte in 0..=255u8 {
        let repeats = 1 + (byte as usize % 17) * (byte as usize % 5);
        input_data.extend(std::iter::repeat(byte).take(repeats));
    }

    let frame = compress(&input_data).unwrap();
    assert_eq!(decompress(&frame).unwrap(), input_data);
}

/// Fibonacci frequencies produce the deepest possible tree for their size.
#[test]
fn test_deep_tree() {
    let mut input_data = Vec::new();
    let (mut a, mut b) = (1usize, 1usize);
    for symbol in 0..20u8 {
        input_data.extend(std::iter::repeat(b'A' + symbol).take(a));
        let next = a + b;
        a = b;
        b = next;
    }

    let encoded = encode(&input_data).unwrap();
    assert_eq!(encoded.max_code_length(), 19);
    assert_eq!(decode(&encoded).unwrap(), input_data);
}

/// Seeded random corpora of varying sizes and alphabets.
#[test]
fn test_random_corpora() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    for size in [1usize, 2, 7, 100, 1000, 10_000] {
        let alphabet_size: u16 = rng.gen_range(1..=256);
        let input_data: Vec<u8> = (0..size)
            .map(|_| rng.gen_range(0..alphabet_size) as u8)
            .collect();

        let encoded = encode(&input_data).unwrap();
        assert_eq!(decode(&encoded).unwrap(), input_data, "size {size}");
    }
}

/// Encoding the same data twice yields identical bits.
#[test]
fn test_deterministic_frames() {
    let input_data = b"The quick brown fox jumps over the lazy dog. ".repeat(100);
    assert_eq!(compress(&input_data).unwrap(), compress(&input_data).unwrap());
}

/// Empty input is a valid, distinguished encoding.
#[test]
fn test_empty_message() {
    let encoded = encode(b"").unwrap();
    assert_eq!(encoded, EncodedMessage::default());
    assert_eq!(decode(&encoded).unwrap(), Vec::<u8>::new());
    assert_eq!(decompress(&compress(b"").unwrap()).unwrap(), Vec::<u8>::new());
}

/// Header tampering is reported as corruption, not a panic.
#[test]
fn test_header_corruption_detection() {
    let encoded = encode(b"test data for header validation").unwrap();

    let mut header = encoded.header.as_bytes().to_vec();
    header[1] = header[1].wrapping_add(1);
    let tampered = EncodedMessage {
        header: BitBuffer::from_byte_slice(&header),
        payload: encoded.payload.clone(),
    };

    let result = decode(&tampered);
    assert!(matches!(result, Err(Error::HeaderCorrupt(_))));
}

/// A payload cut short ends inside a code.
#[test]
fn test_truncated_payload() {
    let encoded = encode(b"abracadabra").unwrap();
    let mut payload = encoded.payload.clone();
    // the last symbol is 'a' (1 bit); drop it and one bit of the 'r' before it
    payload.remove_last_bit();
    payload.remove_last_bit();

    let truncated = EncodedMessage {
        header: encoded.header.clone(),
        payload,
    };
    assert!(matches!(
        decode(&truncated),
        Err(Error::HeaderCorrupt(CorruptionError::TruncatedCode { .. }))
    ));
}

/// Test CRC detection of container corruption.
#[test]
fn test_crc_corruption_detection() {
    let input_data = b"test data for crc validation";

    let mut frame = compress(input_data).unwrap();
    let len = frame.len();
    frame[len - 1] ^= 0xFF;

    let result = decompress(&frame);
    assert!(matches!(result, Err(Error::Crc { .. })));
}

/// Metrics line up with the encoded message.
#[test]
fn test_metrics_from_run() {
    let input_data = b"abracadabra";
    let mut metrics = Metrics::new();

    let encoded = encode(input_data).unwrap();
    metrics.record_encoded(input_data.len(), &encoded);
    let decoded = decode(&encoded).unwrap();
    metrics.output_bytes = decoded.len() as u64;
    metrics.complete();

    assert!(metrics.sizes_match());
    assert_eq!(metrics.distinct_symbols, 5);
    assert!(metrics.export_text().contains("payload_bits=23"));
}
