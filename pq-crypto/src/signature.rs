//! Type-tagged post-quantum signature value
//!
//! Wire format: `[1 byte algorithm tag][signature bytes]`.
//!
//! Decoding only checks that the tag resolves. Signature length is validated
//! later by [`SignatureEngine::verify`](crate::traits::SignatureEngine::verify),
//! so a truncated or padded signature still decodes and simply fails
//! verification.

use crate::algorithm::AlgorithmId;
use crate::error::{PqcError, Result};
use std::fmt;

/// Minimum encoded length: tag plus at least one signature byte
pub const MIN_ENCODED_LEN: usize = 2;

/// Post-quantum signature tagged with the algorithm that produced it
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PqSignature {
    algorithm: AlgorithmId,
    bytes: Vec<u8>,
}

impl PqSignature {
    pub fn new(algorithm: AlgorithmId, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            algorithm,
            bytes: bytes.into(),
        }
    }

    pub fn algorithm(&self) -> AlgorithmId {
        self.algorithm
    }

    /// Raw signature bytes (without the tag)
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Encode as `tag || signature`
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(1 + self.bytes.len());
        out.push(self.algorithm.tag());
        out.extend_from_slice(&self.bytes);
        out
    }

    /// Decode `tag || signature`
    ///
    /// # Errors
    /// - Returns `TooShort` if fewer than 2 bytes are given
    /// - Returns `UnknownAlgorithm` if the tag does not resolve
    pub fn decode(encoded: &[u8]) -> Result<Self> {
        if encoded.len() < MIN_ENCODED_LEN {
            return Err(PqcError::TooShort { len: encoded.len() });
        }

        let algorithm = AlgorithmId::from_tag(encoded[0])?;

        Ok(Self {
            algorithm,
            bytes: encoded[1..].to_vec(),
        })
    }

    /// Whether the payload length matches the algorithm's size policy
    pub fn has_expected_size(&self) -> bool {
        self.algorithm.signature_size().admits(self.bytes.len())
    }
}

impl fmt::Display for PqSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let preview = &self.bytes[..self.bytes.len().min(8)];
        write!(
            f,
            "{}:{}{} ({} bytes)",
            self.algorithm,
            hex::encode(preview),
            if self.bytes.len() > preview.len() { ".." } else { "" },
            self.bytes.len()
        )
    }
}
