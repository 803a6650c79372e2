//! Dilithium post-quantum digital signature engine
//!
//! # About Dilithium
//!
//! Dilithium (standardized as ML-DSA in NIST FIPS 204) is a lattice-based
//! signature scheme built on the Module-LWE and Module-SIS problems. One
//! engine serves all three parameter sets:
//!
//! | Algorithm | Backend | NIST Level | Public Key | Signature |
//! |-----------|---------|------------|------------|-----------|
//! | Dilithium2 | ML-DSA-44 | 2 | 1,312 bytes | 2,420 bytes |
//! | **Dilithium3** | **ML-DSA-65** | **3** | **1,952 bytes** | **3,309 bytes** |
//! | Dilithium5 | ML-DSA-87 | 5 | 2,592 bytes | 4,627 bytes |
//!
//! Signatures are fixed-length; `verify` rejects any other length before
//! touching the backend.
//!
//! # Public key encoding
//!
//! `seed (32 bytes) || expansion (remaining bytes)`, no length prefix. The
//! seed is the matrix seed `rho`, the expansion is the packed `t1` vector.
//! This is byte-for-byte the FIPS 204 public key encoding, so the backend
//! consumes canonical keys directly.

use crate::algorithm::{AlgorithmFamily, AlgorithmId, AlgorithmInfo};
use crate::error::{PqcError, Result};
use crate::keys::KeyMaterial;
use crate::signature::PqSignature;
use crate::traits::{check_signing_key, verify_detached, SignatureEngine};
use pqcrypto_mldsa::{mldsa44, mldsa65, mldsa87};
use pqcrypto_traits::sign::DetachedSignature;

/// Length of the seed component of a Dilithium public key
pub const SEED_BYTES: usize = 32;

/// Split a canonical Dilithium public key into `(seed, expansion)`
///
/// Returns `None` if the key is not longer than the seed.
pub fn split_public_key(public_key: &[u8]) -> Option<(&[u8; SEED_BYTES], &[u8])> {
    if public_key.len() <= SEED_BYTES {
        return None;
    }
    let (seed, expansion) = public_key.split_at(SEED_BYTES);
    let seed: &[u8; SEED_BYTES] = seed.try_into().ok()?;
    Some((seed, expansion))
}

/// Concatenate `seed || expansion` into a canonical Dilithium public key
pub fn join_public_key(seed: &[u8; SEED_BYTES], expansion: &[u8]) -> Vec<u8> {
    let mut public_key = Vec::with_capacity(SEED_BYTES + expansion.len());
    public_key.extend_from_slice(seed);
    public_key.extend_from_slice(expansion);
    public_key
}

/// Dilithium signature engine
///
/// # Example
///
/// ```rust
/// use pq_crypto::{AlgorithmId, DilithiumEngine, SignatureEngine};
///
/// let engine = DilithiumEngine::new(AlgorithmId::Dilithium3).unwrap();
/// let key = engine.generate_keypair().unwrap();
///
/// let message = b"0x05 transaction signing hash";
/// let signature = engine.sign(message, &key).unwrap();
///
/// assert!(engine.verify(message, &signature, &key.public_key()));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct DilithiumEngine {
    pub(crate) algorithm: AlgorithmId,
}

impl DilithiumEngine {
    /// Create engine for one Dilithium parameter set
    ///
    /// # Errors
    /// - Returns `UnsupportedAlgorithm` for non-Dilithium algorithms
    pub fn new(algorithm: AlgorithmId) -> Result<Self> {
        if algorithm.family() != AlgorithmFamily::Dilithium {
            return Err(PqcError::UnsupportedAlgorithm(algorithm));
        }

        tracing::info!("Initialized Dilithium engine with algorithm: {}", algorithm);
        Ok(Self { algorithm })
    }

    /// Return algorithm information
    pub fn algorithm_info(&self) -> AlgorithmInfo {
        self.algorithm.info()
    }
}

impl SignatureEngine for DilithiumEngine {
    fn algorithm(&self) -> AlgorithmId {
        self.algorithm
    }

    /// Generate new Dilithium keypair
    ///
    /// # Performance
    /// - Average time: well under 1 ms on current x86-64 hardware
    fn generate_keypair(&self) -> Result<KeyMaterial> {
        let key = match self.algorithm {
            AlgorithmId::Dilithium2 => {
                let (public, secret) = mldsa44::keypair();
                KeyMaterial::Dilithium2 { public, secret }
            }
            AlgorithmId::Dilithium3 => {
                let (public, secret) = mldsa65::keypair();
                KeyMaterial::Dilithium3 { public, secret }
            }
            AlgorithmId::Dilithium5 => {
                let (public, secret) = mldsa87::keypair();
                KeyMaterial::Dilithium5 { public, secret }
            }
            other => return Err(PqcError::UnsupportedAlgorithm(other)),
        };

        let public_key = key.public_key();
        let expansion_len = split_public_key(&public_key)
            .map(|(_, expansion)| expansion.len())
            .ok_or_else(|| {
                PqcError::KeyGenerationError(format!(
                    "Generated public key too short: {} bytes",
                    public_key.len()
                ))
            })?;

        tracing::info!(
            "Generated {} keypair: public={} bytes (seed={}, expansion={})",
            self.algorithm,
            public_key.len(),
            SEED_BYTES,
            expansion_len
        );

        Ok(key)
    }

    /// Sign message with Dilithium
    ///
    /// # Returns
    /// - Detached signature of exactly `signature_size()` bytes
    fn sign(&self, message: &[u8], key: &KeyMaterial) -> Result<PqSignature> {
        check_signing_key(self.algorithm, key)?;

        let signature = match key {
            KeyMaterial::Dilithium2 { secret, .. } => {
                mldsa44::detached_sign(message, secret).as_bytes().to_vec()
            }
            KeyMaterial::Dilithium3 { secret, .. } => {
                mldsa65::detached_sign(message, secret).as_bytes().to_vec()
            }
            KeyMaterial::Dilithium5 { secret, .. } => {
                mldsa87::detached_sign(message, secret).as_bytes().to_vec()
            }
            _ => {
                return Err(PqcError::SigningError(format!(
                    "{} engine cannot sign with {:?}",
                    self.algorithm, key
                )))
            }
        };

        tracing::debug!(
            "Generated {} signature: msg_len={} bytes, sig_len={} bytes",
            self.algorithm,
            message.len(),
            signature.len()
        );

        Ok(PqSignature::new(self.algorithm, signature))
    }

    fn verify_unchecked(
        &self,
        message: &[u8],
        signature: &[u8],
        public_key: &[u8],
    ) -> Result<bool> {
        match self.algorithm {
            AlgorithmId::Dilithium2 => verify_detached(
                message,
                signature,
                public_key,
                mldsa44::verify_detached_signature,
            ),
            AlgorithmId::Dilithium3 => verify_detached(
                message,
                signature,
                public_key,
                mldsa65::verify_detached_signature,
            ),
            AlgorithmId::Dilithium5 => verify_detached(
                message,
                signature,
                public_key,
                mldsa87::verify_detached_signature,
            ),
            other => Err(PqcError::UnsupportedAlgorithm(other)),
        }
    }
}
