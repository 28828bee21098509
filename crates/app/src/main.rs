//! chuff: canonical Huffman encoder/decoder.
//!
//! Runs one of three modes over a file or a generated sample:
//! - `roundtrip`: encode, write the container, decode it back and verify
//! - `compress`: encode and write the container
//! - `decompress`: read a container and write the decoded bytes

mod config;
mod input_gen;
mod logger;

use std::time::Instant;

use chuff_core::framing::{parse_frame, serialize_frame};
use chuff_core::metrics::Metrics;
use chuff_core::{decode, display_bits, encode, EncodedMessage, Result};
use log::{debug, info};

use config::{Config, Mode};

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = match Config::from_args(&args) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err}");
            eprintln!("run with --help for usage");
            std::process::exit(2);
        }
    };

    if let Err(err) = logger::init(config.log_level) {
        eprintln!("warning: {err}");
    }

    if config.print_config {
        config.print();
    }

    match run(&config) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}

/// Execute the configured mode. Returns false if round-trip verification failed.
fn run(config: &Config) -> Result<bool> {
    match config.mode {
        Mode::Roundtrip => roundtrip(config),
        Mode::Compress => compress(config).map(|_| true),
        Mode::Decompress => decompress(config).map(|_| true),
    }
}

fn load_input(config: &Config) -> Result<Vec<u8>> {
    match &config.input_file {
        Some(path) => {
            let data = std::fs::read(path)?;
            info!("read {} bytes from {}", data.len(), path.display());
            Ok(data)
        }
        None => {
            info!(
                "generating {} byte sample with seed {}",
                config.sample_bytes, config.seed
            );
            Ok(input_gen::generate_sample_data(config.seed, config.sample_bytes))
        }
    }
}

fn print_bits(encoded: &EncodedMessage) {
    println!("HEADER:  {}", display_bits(&encoded.header));
    println!("MESSAGE: {}", display_bits(&encoded.payload));
}

/// Encode the input, write the frame, and return both with timing recorded.
fn encode_to_file(config: &Config, metrics: &mut Metrics) -> Result<(Vec<u8>, Vec<u8>)> {
    let input = load_input(config)?;

    let started = Instant::now();
    let encoded = encode(&input)?;
    metrics.encode_time = started.elapsed();
    metrics.record_encoded(input.len(), &encoded);

    if config.show_bits {
        print_bits(&encoded);
    }

    let frame = serialize_frame(&encoded);
    std::fs::write(&config.output_file, &frame)?;
    metrics.frame_bytes = frame.len() as u64;
    debug!(
        "wrote {} byte frame to {}",
        frame.len(),
        config.output_file.display()
    );

    Ok((input, frame))
}

fn roundtrip(config: &Config) -> Result<bool> {
    let mut metrics = Metrics::new();
    let (input, frame) = encode_to_file(config, &mut metrics)?;

    let started = Instant::now();
    let output = decode(&parse_frame(&frame)?)?;
    metrics.decode_time = started.elapsed();
    metrics.output_bytes = output.len() as u64;
    metrics.complete();

    let verified = output == input;
    if config.print_metrics {
        metrics.print_summary();
    }
    if !verified {
        eprintln!("error: decoded output differs from input");
    }
    Ok(verified)
}

fn compress(config: &Config) -> Result<()> {
    let mut metrics = Metrics::new();
    encode_to_file(config, &mut metrics)?;
    metrics.complete();

    if config.print_metrics {
        metrics.print_summary();
    }
    Ok(())
}

fn decompress(config: &Config) -> Result<()> {
    let mut metrics = Metrics::new();
    let frame = load_input(config)?;
    let encoded = parse_frame(&frame)?;
    metrics.frame_bytes = frame.len() as u64;

    if config.show_bits {
        print_bits(&encoded);
    }

    let started = Instant::now();
    let output = decode(&encoded)?;
    metrics.decode_time = started.elapsed();
    metrics.record_encoded(output.len(), &encoded);
    metrics.output_bytes = output.len() as u64;
    metrics.complete();

    std::fs::write(&config.output_file, &output)?;
    debug!(
        "wrote {} decoded bytes to {}",
        output.len(),
        config.output_file.display()
    );

    if config.print_metrics {
        metrics.print_summary();
    }
    Ok(())
}
