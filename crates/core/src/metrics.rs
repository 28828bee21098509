//! Metrics collection and reporting for encode/decode runs.
//!
//! This module provides observable insights into codec behavior:
//! - Input/output sizes
//! - Code shape (distinct symbols, longest code)
//! - Compression ratio and bits per symbol
//! - Encode and decode timing
//!
//! # Thread Safety
//!
//! The `Metrics` struct is NOT thread-safe. The codec itself is
//! single-threaded, so metrics are updated explicitly by the caller.

use std::time::{Duration, Instant};

use crate::codec::EncodedMessage;

/// Counters and timings for one encode/decode run.
#[derive(Debug, Clone)]
pub struct Metrics {
    // === Timing ===
    /// When the run started
    pub start_time: Instant,

    /// When the run ended (set on completion)
    pub end_time: Option<Instant>,

    /// Time spent in `encode`
    pub encode_time: Duration,

    /// Time spent in `decode`
    pub decode_time: Duration,

    // === Sizes ===
    /// Bytes handed to the encoder
    pub input_bytes: u64,

    /// Bytes produced by the decoder
    pub output_bytes: u64,

    /// Serialized header size in bytes
    pub header_bytes: u64,

    /// Payload size in bits
    pub payload_bits: u64,

    /// Container frame size in bytes (0 if no frame was written)
    pub frame_bytes: u64,

    // === Code shape ===
    /// Distinct symbols in the alphabet
    pub distinct_symbols: u64,

    /// Longest canonical code length
    pub max_code_length: u64,
}

impl Metrics {
    /// Create new metrics with start time set to now.
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            end_time: None,
            encode_time: Duration::ZERO,
            decode_time: Duration::ZERO,
            input_bytes: 0,
            output_bytes: 0,
            header_bytes: 0,
            payload_bits: 0,
            frame_bytes: 0,
            distinct_symbols: 0,
            max_code_length: 0,
        }
    }

    /// Record the shape and size of an encoded message.
    pub fn record_encoded(&mut self, input_len: usize, encoded: &EncodedMessage) {
        self.input_bytes = input_len as u64;
        self.header_bytes = encoded.header.byte_len() as u64;
        self.payload_bits = encoded.payload.len() as u64;
        self.distinct_symbols = encoded.symbol_count() as u64;
        self.max_code_length = encoded.max_code_length() as u64;
    }

    /// Mark the run as complete.
    pub fn complete(&mut self) {
        self.end_time = Some(Instant::now());
    }

    /// Get total duration (or current elapsed if not complete).
    pub fn duration(&self) -> Duration {
        match self.end_time {
            Some(end) => end.duration_since(self.start_time),
            None => self.start_time.elapsed(),
        }
    }

    /// Encoded size (header + payload, rounded up to bytes).
    pub fn encoded_bytes(&self) -> u64 {
        self.header_bytes + self.payload_bits.div_ceil(8)
    }

    /// Compute compression ratio (encoded / raw).
    ///
    /// Returns 0.0 if no data was encoded.
    pub fn compression_ratio(&self) -> f64 {
        if self.input_bytes == 0 {
            0.0
        } else {
            self.encoded_bytes() as f64 / self.input_bytes as f64
        }
    }

    /// Mean payload bits per input symbol.
    pub fn bits_per_symbol(&self) -> f64 {
        if self.input_bytes == 0 {
            0.0
        } else {
            self.payload_bits as f64 / self.input_bytes as f64
        }
    }

    /// Compute encode throughput in bytes/second.
    pub fn throughput_bps(&self) -> f64 {
        let secs = self.encode_time.as_secs_f64();
        if secs == 0.0 {
            0.0
        } else {
            self.input_bytes as f64 / secs
        }
    }

    /// True when the decoder produced as many bytes as were encoded.
    pub fn sizes_match(&self) -> bool {
        self.input_bytes == self.output_bytes
    }

    /// Print a human-readable summary to stdout.
    pub fn print_summary(&self) {
        println!("\n=== Run Summary ===");
        println!("Duration: {} ms", self.duration().as_millis());
        println!();

        println!("Input:  {} bytes", self.input_bytes);
        println!("Output: {} bytes", self.output_bytes);
        if self.output_bytes == 0 && self.input_bytes > 0 {
            println!("Verification: skipped (not decoded)");
        } else if self.sizes_match() {
            println!("Verification: PASSED ✓");
        } else {
            println!("Verification: FAILED ✗ (size mismatch)");
        }
        println!();

        println!("=== Code ===");
        println!("Distinct symbols: {}", self.distinct_symbols);
        println!("Max code length: {} bits", self.max_code_length);
        println!("Bits per symbol: {:.3}", self.bits_per_symbol());
        println!();

        println!("=== Compression ===");
        println!("Header: {} bytes", self.header_bytes);
        println!("Payload: {} bits ({} bytes)", self.payload_bits, self.payload_bits.div_ceil(8));
        if self.frame_bytes > 0 {
            println!("Frame: {} bytes", self.frame_bytes);
        }
        println!("Ratio: {:.1}%", self.compression_ratio() * 100.0);
        println!();

        println!("=== Performance ===");
        println!("Encode: {} µs", self.encode_time.as_micros());
        println!("Decode: {} µs", self.decode_time.as_micros());
        println!("Throughput: {:.2} MB/s", self.throughput_bps() / 1_000_000.0);
        println!();
    }

    /// Export metrics as a simple text format (for parsing/testing).
    pub fn export_text(&self) -> String {
        format!(
            "duration_ms={}\n\
             input_bytes={}\n\
             output_bytes={}\n\
             header_bytes={}\n\
             payload_bits={}\n\
             frame_bytes={}\n\
             distinct_symbols={}\n\
             max_code_length={}\n\
             compression_ratio={:.4}\n\
             bits_per_symbol={:.4}\n",
            self.duration().as_millis(),
            self.input_bytes,
            self.output_bytes,
            self.header_bytes,
            self.payload_bits,
            self.frame_bytes,
            self.distinct_symbols,
            self.max_code_length,
            self.compression_ratio(),
            self.bits_per_symbol(),
        )
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
