//! Sample message generation.
//!
//! When no input file is specified, we generate a message whose byte
//! frequencies are skewed enough to make the code shape interesting:
//! short codes for common bytes, long codes for rare ones.
//!
//! # Design
//!
//! Generated data is built from sections of:
//! - Weighted text (letter frequencies roughly like English prose)
//! - Runs of a single byte
//! - Short repeating patterns
//! - Uniform random bytes (which push the alphabet toward 256 symbols)

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Largest section generated at once.
const SECTION_BYTES: usize = 4096;

/// Text alphabet, most frequent first.
const TEXT_SYMBOLS: &[u8] = b" etaoinshrdlcumwfgypbvkjxqz.,\n";

/// Generate a sample message with skewed byte frequencies.
///
/// # Arguments
/// - `seed`: random seed for determinism
/// - `size_bytes`: exact size of generated data
pub fn generate_sample_data(seed: u64, size_bytes: usize) -> Vec<u8> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut data = Vec::with_capacity(size_bytes);

    while data.len() < size_bytes {
        let section = (size_bytes - data.len()).min(rng.gen_range(64..=SECTION_BYTES));

        match rng.gen_range(0..10u8) {
            // 50% weighted text
            0..=4 => {
                for _ in 0..section {
                    data.push(weighted_text_byte(&mut rng));
                }
            }

            // 20% runs
            5..=6 => {
                let byte_value: u8 = rng.gen();
                data.extend(std::iter::repeat(byte_value).take(section));
            }

            // 20% repeating patterns
            7..=8 => {
                let pattern = generate_pattern(&mut rng);
                data.extend(pattern.iter().copied().cycle().take(section));
            }

            // 10% uniform random bytes
            _ => {
                data.extend((0..section).map(|_| rng.gen::<u8>()));
            }
        }
    }

    data
}

/// Pick a text byte with probability falling off by rank.
fn weighted_text_byte(rng: &mut ChaCha8Rng) -> u8 {
    // min of two uniform draws favors low ranks
    let a = rng.gen_range(0..TEXT_SYMBOLS.len());
    let b = rng.gen_range(0..TEXT_SYMBOLS.len());
    TEXT_SYMBOLS[a.min(b)]
}

/// Generate a small repeating pattern.
fn generate_pattern(rng: &mut ChaCha8Rng) -> Vec<u8> {
    let pattern_len = rng.gen_range(2..=16);
    (0..pattern_len).map(|_| rng.gen()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_sample_data() {
        let data = generate_sample_data(42, 1000);
        assert_eq!(data.len(), 1000);
    }

    #[test]
    fn test_determinism() {
        let data1 = generate_sample_data(12345, 5000);
        let data2 = generate_sample_data(12345, 5000);

        assert_eq!(data1, data2);
    }

    #[test]
    fn test_different_seeds() {
        let data1 = generate_sample_data(1, 1000);
        let data2 = generate_sample_data(2, 1000);

        assert_ne!(data1, data2);
    }

    #[test]
    fn test_various_sizes() {
        for size in [0, 1, 100, 1000, 10000, 100000] {
            let data = generate_sample_data(999, size);
            assert_eq!(data.len(), size);
        }
    }

    #[test]
    fn test_sample_round_trips() {
        let data = generate_sample_data(7, 20_000);
        let encoded = chuff_core::encode(&data).unwrap();
        assert_eq!(chuff_core::decode(&encoded).unwrap(), data);
    }
}
