//! Error type definitions

use crate::algorithm::AlgorithmId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PqcError {
    #[error("Unknown PQ algorithm tag: 0x{0:02x}")]
    UnknownAlgorithm(u8),

    #[error("Unknown PQ algorithm name: {0}")]
    UnknownAlgorithmName(String),

    #[error("PQ signature encoding too short: {len} bytes (need at least 2)")]
    TooShort { len: usize },

    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(AlgorithmId),

    #[error("Unsupported key format: {0}")]
    UnsupportedKeyFormat(String),

    #[error("Key algorithm mismatch: expected {expected}, got {actual}")]
    AlgorithmMismatch {
        expected: AlgorithmId,
        actual: AlgorithmId,
    },

    #[error("Invalid {algorithm} public key length: expected {expected} bytes, got {actual}")]
    InvalidKeyLength {
        algorithm: AlgorithmId,
        expected: usize,
        actual: usize,
    },

    #[error("Key generation failed: {0}")]
    KeyGenerationError(String),

    #[error("Signing failed: {0}")]
    SigningError(String),

    #[error("Encoding error: {0}")]
    EncodingError(String),
}

pub type Result<T> = std::result::Result<T, PqcError>;
