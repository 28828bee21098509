//! Configuration for the chuff application.
//!
//! Handles parsing command-line arguments and generating sensible defaults
//! (including randomized defaults that are reproducible with a seed).
//!
//! # Philosophy
//!
//! The tool should work with ZERO arguments, using intelligent defaults.
//! All defaults are printed so runs are reproducible.

use log::LevelFilter;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::fmt;
use std::path::PathBuf;

/// What a run does with its input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Encode, frame, write, decode and verify
    Roundtrip,
    /// Encode and write a container frame
    Compress,
    /// Read a container frame and write the decoded bytes
    Decompress,
}

impl Mode {
    fn parse(s: &str) -> Result<Self, String> {
        match s {
            "roundtrip" => Ok(Mode::Roundtrip),
            "compress" => Ok(Mode::Compress),
            "decompress" => Ok(Mode::Decompress),
            other => Err(format!("invalid mode: {other}")),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Mode::Roundtrip => "roundtrip",
            Mode::Compress => "compress",
            Mode::Decompress => "decompress",
        };
        f.write_str(name)
    }
}

/// Complete configuration for a codec run.
#[derive(Debug, Clone)]
pub struct Config {
    // === Files ===
    /// Input file path (None = generate sample)
    pub input_file: Option<PathBuf>,

    /// Output file path
    pub output_file: PathBuf,

    // === Run ===
    /// What to do with the input
    pub mode: Mode,

    /// Seed for the generated sample
    pub seed: u64,

    /// Size of the generated sample in bytes
    pub sample_bytes: usize,

    // === Behavior ===
    /// Whether to print header and payload bit strings
    pub show_bits: bool,

    /// Whether to print detailed config
    pub print_config: bool,

    /// Whether to print detailed metrics summary
    pub print_metrics: bool,

    /// Log level for the stderr logger
    pub log_level: LevelFilter,
}

impl Config {
    /// Parse configuration from command-line arguments.
    ///
    /// If no arguments provided, generates randomized defaults using a time-based seed.
    /// If --seed is provided, uses that seed for all randomness (fully deterministic).
    pub fn from_args(args: &[String]) -> Result<Self, String> {
        let mut input_file: Option<PathBuf> = None;
        let mut output_file: Option<PathBuf> = None;
        let mut mode = Mode::Roundtrip;
        let mut seed: Option<u64> = None;
        let mut sample_bytes: Option<usize> = None;
        let mut show_bits = false;
        let mut print_config = false;
        let mut print_metrics = true;
        let mut log_level = LevelFilter::Warn;

        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                "--in" => {
                    i += 1;
                    if i >= args.len() {
                        return Err("--in requires a path".to_string());
                    }
                    input_file = Some(PathBuf::from(&args[i]));
                }
                "--out" => {
                    i += 1;
                    if i >= args.len() {
                        return Err("--out requires a path".to_string());
                    }
                    output_file = Some(PathBuf::from(&args[i]));
                }
                "--mode" => {
                    i += 1;
                    if i >= args.len() {
                        return Err("--mode requires a value".to_string());
                    }
                    mode = Mode::parse(&args[i])?;
                }
                "--seed" => {
                    i += 1;
                    if i >= args.len() {
                        return Err("--seed requires a number".to_string());
                    }
                    seed = Some(args[i].parse().map_err(|_| "invalid seed")?);
                }
                "--size" => {
                    i += 1;
                    if i >= args.len() {
                        return Err("--size requires a number".to_string());
                    }
                    sample_bytes = Some(args[i].parse().map_err(|_| "invalid size")?);
                }
                "--show-bits" => {
                    show_bits = true;
                }
                "--print-config" => {
                    print_config = true;
                }
                "--no-metrics" => {
                    print_metrics = false;
                }
                "--verbose" | "-v" => {
                    log_level = log_level.max(LevelFilter::Debug);
                }
                "--trace" => {
                    log_level = LevelFilter::Trace;
                }
                "--help" | "-h" => {
                    print_help();
                    std::process::exit(0);
                }
                _ => {
                    return Err(format!("unknown argument: {}", args[i]));
                }
            }
            i += 1;
        }

        if mode == Mode::Decompress && input_file.is_none() {
            return Err("--mode decompress requires --in".to_string());
        }

        // Determine seed (explicit or time-based)
        let seed = seed.unwrap_or_else(|| {
            use std::time::{SystemTime, UNIX_EPOCH};
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map_or(0, |t| t.as_millis() as u64)
        });

        // Generate defaults using seed
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let default_output = match mode {
            Mode::Decompress => "./decoded.bin",
            Mode::Roundtrip | Mode::Compress => "./out.chuf",
        };

        let config = Config {
            input_file,
            output_file: output_file.unwrap_or_else(|| PathBuf::from(default_output)),
            mode,
            seed,
            sample_bytes: sample_bytes.unwrap_or_else(|| rng.gen_range(1024..=262_144)),
            show_bits,
            print_config,
            print_metrics,
            log_level,
        };

        Ok(config)
    }

    /// Print the configuration in human-readable form.
    pub fn print(&self) {
        println!("=== Configuration ===");
        match &self.input_file {
            Some(path) => println!("Input file:  {}", path.display()),
            None => println!("Input file:  (generate sample)"),
        }
        println!("Output file: {}", self.output_file.display());
        println!("Mode: {}", self.mode);
        println!();
        if self.input_file.is_none() {
            println!("=== Sample ===");
            println!("Seed: {}", self.seed);
            println!("Size: {} bytes ({} KiB)", self.sample_bytes, self.sample_bytes / 1024);
            println!();
        }
        println!("Show bits: {}", self.show_bits);
        println!("Log level: {}", self.log_level);
        println!();
    }
}

fn print_help() {
    println!("chuff: canonical Huffman encoder/decoder");
    println!();
    println!("USAGE:");
    println!("    chuff [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    --in <PATH>             Input file (default: generate sample)");
    println!("    --out <PATH>            Output file (default: ./out.chuf, or ./decoded.bin)");
    println!("    --mode <MODE>           roundtrip | compress | decompress (default: roundtrip)");
    println!();
    println!("    --seed <N>              Random seed for the generated sample");
    println!("    --size <N>              Generated sample size in bytes (default: random 1 KiB-256 KiB)");
    println!();
    println!("    --show-bits             Print header and payload bits");
    println!("    --print-config          Print resolved configuration");
    println!("    --no-metrics            Don't print metrics summary");
    println!("    --verbose, -v           Log pipeline stages to stderr");
    println!("    --trace                 Also log every code assignment");
    println!("    --help, -h              Print this help");
    println!();
    println!("EXAMPLES:");
    println!("    chuff                                        # Round trip a random sample");
    println!("    chuff --seed 42 --size 64 --show-bits        # Small deterministic run");
    println!("    chuff --mode compress --in file.txt --out file.chuf");
    println!("    chuff --mode decompress --in file.chuf --out file.txt");
    println!();
}
