//! PQ key persistence
//!
//! # File layout
//!
//! ```text
//! {base_path}/
//!   ├── pq_public.key  (tag || canonical public key)
//!   └── pq_secret.key  (tag || raw secret key, owner read/write only)
//! ```
//!
//! The leading tag byte is the algorithm's wire tag, so a keystore names the
//! algorithm it belongs to. Only algorithms whose secret keys can be exported
//! (the Dilithium family) can be persisted. Saving never overwrites an
//! existing key file.
//!
//! Secret keys are stored **unencrypted**. Keep the directory on an encrypted
//! filesystem.

use crate::error::{Result, SignerError};
use pq_crypto::{AlgorithmId, KeyMaterial};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use zeroize::Zeroizing;

pub const PUBLIC_KEY_FILE: &str = "pq_public.key";
pub const SECRET_KEY_FILE: &str = "pq_secret.key";

/// Signing key loaded from, or saved to, a keystore directory
pub struct Keystore {
    key: KeyMaterial,
    base_path: PathBuf,
}

impl Keystore {
    /// Persist a signing key pair
    ///
    /// Nothing is written when the key cannot be exported or when the
    /// directory already holds either key file.
    ///
    /// # Errors
    /// - Returns `Crypto(UnsupportedKeyFormat)` for Falcon keys and
    ///   verification-only material
    /// - Returns `Keystore` if a key file already exists or a file cannot be
    ///   written
    pub fn save(base_path: &Path, key: KeyMaterial) -> Result<Self> {
        let algorithm = key.algorithm();
        let secret_key = key.export_secret_key()?;

        let public_path = base_path.join(PUBLIC_KEY_FILE);
        let secret_path = base_path.join(SECRET_KEY_FILE);
        for path in [&public_path, &secret_path] {
            if path.exists() {
                return Err(SignerError::Keystore(format!(
                    "Refusing to overwrite existing key file {:?}",
                    path
                )));
            }
        }

        fs::create_dir_all(base_path).map_err(|e| {
            SignerError::Keystore(format!(
                "Failed to create keystore directory {:?}: {}",
                base_path, e
            ))
        })?;

        let secret_contents = Zeroizing::new(tagged(algorithm, &secret_key));
        write_new(&secret_path, &secret_contents, 0o600).map_err(|e| {
            SignerError::Keystore(format!("Failed to write secret key to {:?}: {}", secret_path, e))
        })?;

        if let Err(e) = write_new(&public_path, &tagged(algorithm, &key.public_key()), 0o644) {
            // Keep the directory free of half a key pair
            if let Err(remove_err) = fs::remove_file(&secret_path) {
                warn!("Failed to remove {:?}: {}", secret_path, remove_err);
            }
            return Err(SignerError::Keystore(format!(
                "Failed to write public key to {:?}: {}",
                public_path, e
            )));
        }

        #[cfg(not(unix))]
        {
            warn!("File permissions not set (non-Unix system). Protect {:?} manually", secret_path);
        }

        info!("{} keypair saved to {:?}", algorithm, base_path);

        Ok(Self {
            key,
            base_path: base_path.to_path_buf(),
        })
    }

    /// Read only the public half of a keystore
    ///
    /// # Errors
    /// - Returns `Keystore` if the public key file is missing or empty
    /// - Returns `Crypto` if the tag is unknown or the key has the wrong size
    pub fn load_public_key(base_path: &Path) -> Result<(AlgorithmId, Vec<u8>)> {
        let public_path = base_path.join(PUBLIC_KEY_FILE);
        let public_file = fs::read(&public_path).map_err(|e| {
            SignerError::Keystore(format!("Failed to read public key from {:?}: {}", public_path, e))
        })?;

        let (algorithm, public_key) = untagged(&public_file, &public_path)?;
        let key = KeyMaterial::from_public_key(algorithm, public_key)?;

        Ok((algorithm, key.public_key()))
    }

    /// Load a signing key pair saved by [`Keystore::save`]
    ///
    /// # Errors
    /// - Returns `Keystore` if a file is missing, empty or the two files name
    ///   different algorithms
    /// - Returns `Crypto` if the tag is unknown or the keys do not parse
    pub fn load(base_path: &Path) -> Result<Self> {
        let public_path = base_path.join(PUBLIC_KEY_FILE);
        let secret_path = base_path.join(SECRET_KEY_FILE);

        let public_file = fs::read(&public_path).map_err(|e| {
            SignerError::Keystore(format!("Failed to read public key from {:?}: {}", public_path, e))
        })?;
        let secret_file = Zeroizing::new(fs::read(&secret_path).map_err(|e| {
            SignerError::Keystore(format!("Failed to read secret key from {:?}: {}", secret_path, e))
        })?);

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;

            let mode = fs::metadata(&secret_path)?.permissions().mode() & 0o777;
            if mode & 0o077 != 0 {
                warn!(
                    "Secret key file has insecure permissions: {:o} (should be 0o600)",
                    mode
                );
                warn!("Run: chmod 600 {:?}", secret_path);
            }
        }

        let (public_algorithm, public_key) = untagged(&public_file, &public_path)?;
        let (secret_algorithm, secret_key) = untagged(&secret_file, &secret_path)?;

        if public_algorithm != secret_algorithm {
            return Err(SignerError::Keystore(format!(
                "Key files disagree on algorithm: public key is {}, secret key is {}",
                public_algorithm, secret_algorithm
            )));
        }

        let key = KeyMaterial::from_raw_parts(public_algorithm, public_key, secret_key)?;

        info!("{} keypair loaded from {:?}", public_algorithm, base_path);

        Ok(Self {
            key,
            base_path: base_path.to_path_buf(),
        })
    }

    pub fn key(&self) -> &KeyMaterial {
        &self.key
    }

    pub fn algorithm(&self) -> AlgorithmId {
        self.key.algorithm()
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

/// Create a key file that must not exist yet, with `mode` applied at creation
fn write_new(path: &Path, contents: &[u8], mode: u32) -> std::io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(mode);
    }
    #[cfg(not(unix))]
    let _ = mode;

    let mut file = options.open(path)?;
    file.write_all(contents)?;
    file.sync_all()
}

fn tagged(algorithm: AlgorithmId, bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(1 + bytes.len());
    out.push(algorithm.tag());
    out.extend_from_slice(bytes);
    out
}

fn untagged<'a>(contents: &'a [u8], path: &Path) -> Result<(AlgorithmId, &'a [u8])> {
    let (&tag, bytes) = contents
        .split_first()
        .ok_or_else(|| SignerError::Keystore(format!("Key file {:?} is empty", path)))?;

    Ok((AlgorithmId::from_tag(tag)?, bytes))
}
