//! Falcon signature engine (Falcon-512 and Falcon-1024)
//!
//! Falcon signatures are compressed, so their length varies per signature
//! and is only bounded from above (690 / 1,330 bytes).
//!
//! The canonical public key is the bare `h` polynomial (896 / 1,792 bytes).
//! The backend prefixes it with a one-byte header, `0x00 + logn`.

use crate::algorithm::{AlgorithmFamily, AlgorithmId};
use crate::error::{PqcError, Result};
use crate::keys::KeyMaterial;
use crate::signature::PqSignature;
use crate::traits::{check_signing_key, verify_detached, SignatureEngine};
use pqcrypto_falcon::{falcon1024, falcon512};
use pqcrypto_traits::sign::DetachedSignature;

/// Backend public key header for Falcon-512 (logn = 9)
pub const FALCON512_KEY_HEADER: u8 = 0x09;

/// Backend public key header for Falcon-1024 (logn = 10)
pub const FALCON1024_KEY_HEADER: u8 = 0x0A;

/// Drop the backend header byte, leaving the `h` polynomial
pub(crate) fn strip_header(backend_key: &[u8]) -> Vec<u8> {
    backend_key.get(1..).unwrap_or_default().to_vec()
}

fn with_header(header: u8, h: &[u8]) -> Vec<u8> {
    let mut backend_key = Vec::with_capacity(1 + h.len());
    backend_key.push(header);
    backend_key.extend_from_slice(h);
    backend_key
}

#[derive(Debug, Clone, Copy)]
pub struct FalconEngine {
    pub(crate) algorithm: AlgorithmId,
}

impl FalconEngine {
    /// # Errors
    /// - Returns `UnsupportedAlgorithm` for non-Falcon algorithms
    pub fn new(algorithm: AlgorithmId) -> Result<Self> {
        if algorithm.family() != AlgorithmFamily::Falcon {
            return Err(PqcError::UnsupportedAlgorithm(algorithm));
        }

        tracing::info!("Initialized Falcon engine with algorithm: {}", algorithm);
        Ok(Self { algorithm })
    }

    fn key_header(&self) -> u8 {
        match self.algorithm {
            AlgorithmId::Falcon1024 => FALCON1024_KEY_HEADER,
            _ => FALCON512_KEY_HEADER,
        }
    }
}

impl SignatureEngine for FalconEngine {
    fn algorithm(&self) -> AlgorithmId {
        self.algorithm
    }

    fn generate_keypair(&self) -> Result<KeyMaterial> {
        let key = match self.algorithm {
            AlgorithmId::Falcon512 => {
                let (public, secret) = falcon512::keypair();
                KeyMaterial::Falcon512 { public, secret }
            }
            AlgorithmId::Falcon1024 => {
                let (public, secret) = falcon1024::keypair();
                KeyMaterial::Falcon1024 { public, secret }
            }
            other => return Err(PqcError::UnsupportedAlgorithm(other)),
        };

        tracing::info!(
            "Generated {} keypair: public={} bytes",
            self.algorithm,
            key.public_key().len()
        );

        Ok(key)
    }

    fn sign(&self, message: &[u8], key: &KeyMaterial) -> Result<PqSignature> {
        check_signing_key(self.algorithm, key)?;

        let signature = match key {
            KeyMaterial::Falcon512 { secret, .. } => {
                falcon512::detached_sign(message, secret).as_bytes().to_vec()
            }
            KeyMaterial::Falcon1024 { secret, .. } => {
                falcon1024::detached_sign(message, secret).as_bytes().to_vec()
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
        let backend_key = with_header(self.key_header(), public_key);

        match self.algorithm {
            AlgorithmId::Falcon512 => verify_detached(
                message,
                signature,
                &backend_key,
                falcon512::verify_detached_signature,
            ),
            AlgorithmId::Falcon1024 => verify_detached(
                message,
                signature,
                &backend_key,
                falcon1024::verify_detached_signature,
            ),
            other => Err(PqcError::UnsupportedAlgorithm(other)),
        }
    }
}
