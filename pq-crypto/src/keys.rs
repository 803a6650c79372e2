//! Engine-specific key material
//!
//! A [`KeyMaterial`] holds exactly what one engine needs to sign: the
//! backend's native public and secret key objects. Verification-only
//! material (`PublicOnly`) carries just the canonical public key bytes.
//!
//! # Secret key export
//!
//! Exporting the secret key as raw bytes is a per-family capability:
//!
//! | Family | Export | Import from raw bytes |
//! |--------|--------|-----------------------|
//! | Dilithium | yes (FIPS 204 encoding) | yes |
//! | Falcon | refused (`UnsupportedKeyFormat`) | refused |
//!
//! Falcon secret keys only exist as engine objects for the lifetime of the
//! process that generated them.

use crate::algorithm::AlgorithmId;
use crate::error::{PqcError, Result};
use crate::falcon;
use pqcrypto_falcon::{falcon1024, falcon512};
use pqcrypto_mldsa::{mldsa44, mldsa65, mldsa87};
use pqcrypto_traits::sign::{PublicKey, SecretKey};
use std::fmt;
use zeroize::Zeroizing;

#[derive(Clone)]
pub enum KeyMaterial {
    Dilithium2 {
        public: mldsa44::PublicKey,
        secret: mldsa44::SecretKey,
    },
    Dilithium3 {
        public: mldsa65::PublicKey,
        secret: mldsa65::SecretKey,
    },
    Dilithium5 {
        public: mldsa87::PublicKey,
        secret: mldsa87::SecretKey,
    },
    Falcon512 {
        public: falcon512::PublicKey,
        secret: falcon512::SecretKey,
    },
    Falcon1024 {
        public: falcon1024::PublicKey,
        secret: falcon1024::SecretKey,
    },
    /// Verification-only material (canonical public key bytes)
    PublicOnly {
        algorithm: AlgorithmId,
        public_key: Vec<u8>,
    },
}

impl KeyMaterial {
    /// Create verification-only key material from canonical public key bytes
    ///
    /// # Errors
    /// - Returns `InvalidKeyLength` if the length does not match the algorithm
    pub fn from_public_key(algorithm: AlgorithmId, public_key: &[u8]) -> Result<Self> {
        check_public_key_length(algorithm, public_key)?;

        Ok(KeyMaterial::PublicOnly {
            algorithm,
            public_key: public_key.to_vec(),
        })
    }

    /// Restore a signing key pair from raw bytes
    ///
    /// Only the Dilithium family supports this.
    ///
    /// # Errors
    /// - Returns `InvalidKeyLength` if the public key length is wrong
    /// - Returns `UnsupportedKeyFormat` for Falcon algorithms
    /// - Returns `EncodingError` if the secret key cannot be parsed
    pub fn from_raw_parts(
        algorithm: AlgorithmId,
        public_key: &[u8],
        secret_key: &[u8],
    ) -> Result<Self> {
        check_public_key_length(algorithm, public_key)?;

        let key = match algorithm {
            AlgorithmId::Dilithium2 => KeyMaterial::Dilithium2 {
                public: parse_public(public_key)?,
                secret: parse_secret(secret_key)?,
            },
            AlgorithmId::Dilithium3 => KeyMaterial::Dilithium3 {
                public: parse_public(public_key)?,
                secret: parse_secret(secret_key)?,
            },
            AlgorithmId::Dilithium5 => KeyMaterial::Dilithium5 {
                public: parse_public(public_key)?,
                secret: parse_secret(secret_key)?,
            },
            AlgorithmId::Falcon512 | AlgorithmId::Falcon1024 => {
                return Err(PqcError::UnsupportedKeyFormat(format!(
                    "{} private keys cannot be reconstructed from raw bytes; \
                     keep the generated KeyMaterial for signing",
                    algorithm
                )));
            }
        };

        Ok(key)
    }

    pub fn algorithm(&self) -> AlgorithmId {
        match self {
            KeyMaterial::Dilithium2 { .. } => AlgorithmId::Dilithium2,
            KeyMaterial::Dilithium3 { .. } => AlgorithmId::Dilithium3,
            KeyMaterial::Dilithium5 { .. } => AlgorithmId::Dilithium5,
            KeyMaterial::Falcon512 { .. } => AlgorithmId::Falcon512,
            KeyMaterial::Falcon1024 { .. } => AlgorithmId::Falcon1024,
            KeyMaterial::PublicOnly { algorithm, .. } => *algorithm,
        }
    }

    /// Canonical public key bytes
    ///
    /// Dilithium: `seed(32) || expansion`. Falcon: the `h` polynomial
    /// without the backend's header byte.
    pub fn public_key(&self) -> Vec<u8> {
        match self {
            KeyMaterial::Dilithium2 { public, .. } => public.as_bytes().to_vec(),
            KeyMaterial::Dilithium3 { public, .. } => public.as_bytes().to_vec(),
            KeyMaterial::Dilithium5 { public, .. } => public.as_bytes().to_vec(),
            KeyMaterial::Falcon512 { public, .. } => falcon::strip_header(public.as_bytes()),
            KeyMaterial::Falcon1024 { public, .. } => falcon::strip_header(public.as_bytes()),
            KeyMaterial::PublicOnly { public_key, .. } => public_key.clone(),
        }
    }

    /// Whether this material can be used for signing
    pub fn has_secret(&self) -> bool {
        !matches!(self, KeyMaterial::PublicOnly { .. })
    }

    /// Export the secret key as raw bytes
    ///
    /// # Security Warning
    /// The returned buffer is wiped on drop; do not copy it into logs.
    ///
    /// # Errors
    /// - Returns `UnsupportedKeyFormat` for Falcon keys and verification-only material
    pub fn export_secret_key(&self) -> Result<Zeroizing<Vec<u8>>> {
        match self {
            KeyMaterial::Dilithium2 { secret, .. } => Ok(Zeroizing::new(secret.as_bytes().to_vec())),
            KeyMaterial::Dilithium3 { secret, .. } => Ok(Zeroizing::new(secret.as_bytes().to_vec())),
            KeyMaterial::Dilithium5 { secret, .. } => Ok(Zeroizing::new(secret.as_bytes().to_vec())),
            KeyMaterial::Falcon512 { .. } | KeyMaterial::Falcon1024 { .. } => {
                Err(PqcError::UnsupportedKeyFormat(format!(
                    "{} private key export is not supported",
                    self.algorithm()
                )))
            }
            KeyMaterial::PublicOnly { algorithm, .. } => Err(PqcError::UnsupportedKeyFormat(
                format!("{} key material has no private component", algorithm),
            )),
        }
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let public_key = self.public_key();
        f.debug_struct("KeyMaterial")
            .field("algorithm", &self.algorithm())
            .field("public_key", &hex::encode(&public_key[..public_key.len().min(8)]))
            .field("secret", &if self.has_secret() { "<redacted>" } else { "<none>" })
            .finish()
    }
}

pub(crate) fn check_public_key_length(algorithm: AlgorithmId, public_key: &[u8]) -> Result<()> {
    let expected = algorithm.public_key_size();
    if public_key.len() != expected {
        return Err(PqcError::InvalidKeyLength {
            algorithm,
            expected,
            actual: public_key.len(),
        });
    }
    Ok(())
}

fn parse_public<P: PublicKey>(bytes: &[u8]) -> Result<P> {
    P::from_bytes(bytes)
        .map_err(|e| PqcError::EncodingError(format!("Failed to parse public key: {:?}", e)))
}

fn parse_secret<S: SecretKey>(bytes: &[u8]) -> Result<S> {
    S::from_bytes(bytes)
        .map_err(|e| PqcError::EncodingError(format!("Failed to parse secret key: {:?}", e)))
}
