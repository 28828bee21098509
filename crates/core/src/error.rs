//! Error types for the chuff codec.
//!
//! All operations return structured errors rather than panicking.
//! Failures deep inside tree construction or decoding bubble up unchanged
//! to the `encode`/`decode` entry points.

use std::collections::TryReserveError;

use thiserror::Error;

/// Top-level error type for all operations in the codec.
///
/// Each variant corresponds to a specific failure domain:
/// - Allocation: a fallible reservation could not be satisfied
/// - Precondition: the caller misused a builder (e.g. reused an alphabet)
/// - Header corrupt: header or payload bits do not describe a valid message
/// - Tree construction: an internal invariant of the tree builder broke
/// - Framing / CRC / I/O: only raised by the container helpers
#[derive(Debug, Error)]
pub enum Error {
    /// A dynamic allocation during build, encode or decode failed
    #[error("allocation failed: {0}")]
    AllocationFailed(#[from] TryReserveError),

    /// A builder was used in a state it does not accept
    #[error("precondition violated: {0}")]
    PreconditionViolated(#[from] PreconditionError),

    /// Header or payload does not correspond to any valid canonical code set
    #[error("header corrupt: {0}")]
    HeaderCorrupt(#[from] CorruptionError),

    /// The tree builder produced no root, or ran out of code space
    #[error("huffman tree construction failed")]
    TreeConstructionFailed,

    /// Container frame error (e.g., invalid magic, length mismatch)
    #[error("framing error: {0}")]
    Framing(#[from] FramingError),

    /// CRC validation failed, indicating container corruption
    #[error("CRC mismatch: expected {expected:#010x}, got {actual:#010x}")]
    Crc { expected: u32, actual: u32 },

    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns true if this error reports corrupt input rather than a
    /// resource or programming failure.
    pub fn is_corruption(&self) -> bool {
        matches!(
            self,
            Error::HeaderCorrupt(_) | Error::Framing(_) | Error::Crc { .. }
        )
    }
}

/// Programming errors: a builder was handed state it must not see.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreconditionError {
    /// `Alphabet::populate` was called on an alphabet that already holds symbols
    #[error("alphabet is already populated")]
    AlphabetNotEmpty,

    /// Header encoding requires an alphabet sorted by (code length, symbol)
    #[error("alphabet is not in canonical order")]
    AlphabetNotCanonical,

    /// Message encoding met a byte that has no code in the alphabet
    #[error("symbol {0:#04x} is not in the alphabet")]
    SymbolNotInAlphabet(u8),
}

/// Ways a header or payload can fail validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CorruptionError {
    /// Header bit count is not a whole number of bytes
    #[error("header is {0} bits, not a whole number of bytes")]
    HeaderNotByteAligned(usize),

    /// Header is too short to hold the count table it declares
    #[error("header too short: need at least {required} bytes, got {actual}")]
    HeaderTooShort { required: usize, actual: usize },

    /// A non-empty header declared a maximum code length of zero
    #[error("maximum code length is zero")]
    ZeroMaxLength,

    /// Declared code length cannot be represented on this platform
    #[error("code length {length} exceeds maximum {max}")]
    CodeLengthTooLong { length: usize, max: usize },

    /// No symbol uses the declared maximum code length
    #[error("no symbol has the declared maximum code length {0}")]
    MaxLengthUnused(usize),

    /// Count table does not account for the symbol bytes present
    #[error("count table declares {declared} symbols, header holds {actual}")]
    CountMismatch { declared: usize, actual: usize },

    /// The same byte value appears twice in the symbol list
    #[error("symbol {0:#04x} appears more than once")]
    DuplicateSymbol(u8),

    /// Symbols of equal code length are not in ascending order
    #[error("symbols of length {length} are not in ascending order")]
    UnsortedSymbols { length: usize },

    /// More codes of a length were declared than the code space allows
    #[error("code space over-subscribed at length {length}")]
    OverSubscribed { length: usize },

    /// The declared lengths leave part of the code space unused
    #[error("code lengths do not form a complete prefix code")]
    IncompleteCode,

    /// Payload bits were supplied without any header
    #[error("payload of {0} bits has no header")]
    PayloadWithoutHeader(usize),

    /// Payload bits left the decode tree without reaching a symbol
    #[error("invalid code at bit position {position}")]
    InvalidCode { position: usize },

    /// Payload ended in the middle of a code
    #[error("payload ends inside a code starting at bit position {position}")]
    TruncatedCode { position: usize },
}

/// Container framing errors.
#[derive(Debug, Error)]
pub enum FramingError {
    /// Invalid magic number in header
    #[error("invalid magic number: expected {expected:?}, got {actual:?}")]
    InvalidMagic { expected: [u8; 4], actual: [u8; 4] },

    /// Frame is too short to contain a valid header
    #[error("frame too short: need at least {required} bytes, got {actual}")]
    FrameTooShort { required: usize, actual: usize },

    /// Frame size doesn't match the lengths in its header
    #[error("frame length mismatch: header says {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
}

/// Type alias for Result with our Error type
pub type Result<T> = std::result::Result<T, Error>;
