//! Unified interface for post-quantum signature engines

use crate::algorithm::AlgorithmId;
use crate::error::{PqcError, Result};
use crate::keys::KeyMaterial;
use crate::signature::PqSignature;
use pqcrypto_traits::sign::{DetachedSignature, PublicKey, VerificationError};

/// Signature engine for one algorithm
///
/// Engines hold no per-call state and are shared between threads through
/// the [`CryptoFactory`](crate::factory::CryptoFactory).
pub trait SignatureEngine: Send + Sync {
    /// Algorithm served by this engine
    fn algorithm(&self) -> AlgorithmId;

    /// Canonical public key size (bytes)
    fn public_key_size(&self) -> usize {
        self.algorithm().public_key_size()
    }

    /// Generate a fresh keypair from the operating system CSPRNG
    fn generate_keypair(&self) -> Result<KeyMaterial>;

    /// Sign message, producing a detached signature tagged with this algorithm
    ///
    /// # Errors
    /// - Returns `AlgorithmMismatch` if `key` belongs to another algorithm
    /// - Returns `UnsupportedKeyFormat` if `key` has no private component
    fn sign(&self, message: &[u8], key: &KeyMaterial) -> Result<PqSignature>;

    /// Cryptographic check on raw parts whose shapes were already validated
    ///
    /// `Err` means the backend could not parse its inputs.
    fn verify_unchecked(&self, message: &[u8], signature: &[u8], public_key: &[u8])
        -> Result<bool>;

    /// Verify signature
    ///
    /// Never fails: a mismatched algorithm, a wrong public key or signature
    /// length, an unparseable key and a bad signature all yield `false`.
    fn verify(&self, message: &[u8], signature: &PqSignature, public_key: &[u8]) -> bool {
        let algorithm = self.algorithm();

        if signature.algorithm() != algorithm {
            tracing::debug!(
                "Algorithm type mismatch: expected {}, got {}",
                algorithm,
                signature.algorithm()
            );
            return false;
        }

        if public_key.len() != self.public_key_size() {
            tracing::debug!(
                "Public key size mismatch: expected {}, got {}",
                self.public_key_size(),
                public_key.len()
            );
            return false;
        }

        let expected = algorithm.signature_size();
        if !expected.admits(signature.len()) {
            tracing::debug!(
                "Signature size mismatch: expected {}, got {}",
                expected,
                signature.len()
            );
            return false;
        }

        match self.verify_unchecked(message, signature.as_bytes(), public_key) {
            Ok(is_valid) => {
                tracing::debug!(
                    "{} signature verification: valid={}, msg_len={} bytes",
                    algorithm,
                    is_valid,
                    message.len()
                );
                is_valid
            }
            Err(e) => {
                tracing::debug!("Error verifying {} signature: {}", algorithm, e);
                false
            }
        }
    }

    /// Verification-only key material from canonical public key bytes
    fn import_public_key(&self, public_key: &[u8]) -> Result<KeyMaterial> {
        KeyMaterial::from_public_key(self.algorithm(), public_key)
    }
}

/// Reject keys that belong to another algorithm or cannot sign
pub(crate) fn check_signing_key(algorithm: AlgorithmId, key: &KeyMaterial) -> Result<()> {
    if key.algorithm() != algorithm {
        return Err(PqcError::AlgorithmMismatch {
            expected: algorithm,
            actual: key.algorithm(),
        });
    }

    if !key.has_secret() {
        return Err(PqcError::UnsupportedKeyFormat(format!(
            "{} key material has no private component; raw public key bytes cannot sign",
            algorithm
        )));
    }

    Ok(())
}

/// Parse raw parts into backend objects and run a detached verification
pub(crate) fn verify_detached<P, S>(
    message: &[u8],
    signature: &[u8],
    public_key: &[u8],
    verify: fn(&S, &[u8], &P) -> std::result::Result<(), VerificationError>,
) -> Result<bool>
where
    P: PublicKey,
    S: DetachedSignature,
{
    let pk = P::from_bytes(public_key)
        .map_err(|e| PqcError::EncodingError(format!("Failed to parse public key: {:?}", e)))?;
    let sig = S::from_bytes(signature)
        .map_err(|e| PqcError::EncodingError(format!("Failed to parse signature: {:?}", e)))?;

    Ok(verify(&sig, message, &pk).is_ok())
}
