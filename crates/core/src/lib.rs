//! chuff-core: canonical Huffman coding for byte messages
//!
//! This library turns a byte sequence into a compact self-describing header
//! plus a bit-packed payload, and back again:
//! - Counts symbol frequencies and builds a Huffman tree
//! - Rewrites the tree's codes into canonical form
//! - Serializes only code lengths and symbols in the header
//! - Decodes through a flattened, heap-indexed decode tree
//!
//! # Architecture
//!
//! The system is designed around clear module boundaries:
//! - `bitio`: Growable bit buffer and bit reader
//! - `alphabet`: Distinct symbols and their frequencies
//! - `tree`: Priority queue and arena-backed Huffman tree
//! - `codes`: Tree walk and canonical code assignment
//! - `header`: Header serialization
//! - `message`: Payload encoding and the decode tree
//! - `codec`: `encode` / `decode` entry points
//! - `framing`: Container format for storing an encoded message
//! - `metrics`: Observable codec behavior
//!
//! # Design Principles
//!
//! - **No panics on bad input**: corrupt headers and payloads return errors
//! - **Deterministic**: identical input always yields identical bits
//! - **Fallible allocation**: large buffers are reserved with `try_reserve`
//!
//! # Example
//! ```
//! let encoded = chuff_core::encode(b"ab").unwrap();
//! assert_eq!(encoded.header.as_bytes(), &[1, 2, b'a', b'b']);
//! assert_eq!(chuff_core::display_bits(&encoded.payload), "01");
//! assert_eq!(chuff_core::decode(&encoded).unwrap(), b"ab");
//! ```

pub mod alphabet;
pub mod bitio;
pub mod codec;
pub mod codes;
pub mod error;
pub mod framing;
pub mod header;
pub mod message;
pub mod metrics;
pub mod tree;

// Re-export commonly used types
pub use bitio::BitBuffer;
pub use codec::{decode, display_bits, encode, EncodedMessage};
pub use error::{Error, Result};
