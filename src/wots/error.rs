use thiserror::Error;

use crate::crypto::hash::HashType;
use crate::crypto::random::RandomError;

/// Errors that can occur while building keys or decoding WOTS+ signatures
#[derive(Error, Debug)]
pub enum WotsError {
    #[error("Invalid chain element size {n}: must be at least 1 byte")]
    InvalidElementSize { n: usize },

    #[error("Invalid hashed message size {m}: must be between 1 and {max}")]
    InvalidMessageSize { m: usize, max: usize },

    #[error("{role} hash {hash} outputs {size} bytes, {required} required")]
    HashTooSmall {
        role: &'static str,
        hash: HashType,
        size: usize,
        required: usize,
    },

    #[error("Invalid {which} seed length: expected {expected}, got {actual}")]
    InvalidSeedLength {
        which: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Entropy source failed: {0}")]
    Entropy(#[from] RandomError),

    #[error("Short read for {which} seed: expected {expected} bytes, got {actual}")]
    ShortRead {
        which: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid signature length: expected {expected}, got {actual}")]
    InvalidSignatureLength { expected: usize, actual: usize },

    #[error("Output buffer must be empty with capacity {expected}, got len {len} and capacity {capacity}")]
    InvalidOutputBuffer {
        len: usize,
        capacity: usize,
        expected: usize,
    },

    #[error("Empty message or signature")]
    EmptyInput,

    #[error("Unknown parameter encoding {0}")]
    UnknownEncoding(u8),

    #[error("Consensus parameters are not allowed for transaction signatures")]
    ConsensusNotAllowed,
}
