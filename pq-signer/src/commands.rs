//! Signer commands
//!
//! Each command takes decoded inputs and returns a report that renders as
//! text or JSON. Argument parsing and I/O stay in `main`.

use crate::encoding::Encoding;
use crate::error::Result;
use crate::keystore::Keystore;
use hybrid_tx::{codec, PqSlotStatus};
use pq_crypto::{factory, AlgorithmId, KeyMaterial, PqSignature, PqcError};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

fn hex0x(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

// ─── algorithms ──────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct AlgorithmRow {
    pub name: &'static str,
    pub tag: u8,
    pub nist_level: u8,
    pub public_key_size: usize,
    pub signature_size: String,
    pub max_signature_size: usize,
    pub secret_export: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct AlgorithmsReport {
    pub algorithms: Vec<AlgorithmRow>,
}

impl fmt::Display for AlgorithmsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<12} {:>4} {:>5} {:>11} {:>15} {:>13}",
            "ALGORITHM", "TAG", "LEVEL", "PUBLIC KEY", "SIGNATURE", "SECRET EXPORT"
        )?;
        for (i, row) in self.algorithms.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(
                f,
                "{:<12} 0x{:02x} {:>5} {:>11} {:>15} {:>13}",
                row.name,
                row.tag,
                row.nist_level,
                format!("{} bytes", row.public_key_size),
                row.signature_size,
                if row.secret_export { "yes" } else { "no" }
            )?;
        }
        Ok(())
    }
}

pub fn list_algorithms() -> AlgorithmsReport {
    let algorithms = factory::supported_algorithms()
        .into_iter()
        .map(|algorithm| {
            let info = algorithm.info();
            AlgorithmRow {
                name: info.name,
                tag: info.tag,
                nist_level: info.nist_level,
                public_key_size: info.public_key_size,
                signature_size: info.signature_size.to_string(),
                max_signature_size: info.signature_size.max(),
                secret_export: algorithm.family().supports_secret_export(),
            }
        })
        .collect();

    AlgorithmsReport { algorithms }
}

// ─── keygen ──────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct KeygenReport {
    pub algorithm: AlgorithmId,
    pub public_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keystore: Option<PathBuf>,
}

impl fmt::Display for KeygenReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Algorithm:  {}", self.algorithm)?;
        write!(f, "Public key: {}", self.public_key)?;
        if let Some(secret_key) = &self.secret_key {
            write!(f, "\nSecret key: {}", secret_key)?;
        }
        if let Some(keystore) = &self.keystore {
            write!(f, "\nKeystore:   {}", keystore.display())?;
        }
        Ok(())
    }
}

/// Generate a key pair, optionally revealing the secret or saving a keystore
pub fn keygen(
    algorithm: AlgorithmId,
    reveal_secret: bool,
    output_dir: Option<&Path>,
    encoding: Encoding,
) -> Result<KeygenReport> {
    let engine = factory::get_instance(algorithm)?;
    let key = engine.generate_keypair()?;
    let public_key = encoding.encode(&key.public_key());

    let secret_key = if reveal_secret {
        let secret = key.export_secret_key()?;
        Some(encoding.encode(&secret))
    } else {
        None
    };

    let keystore = match output_dir {
        Some(dir) => Some(Keystore::save(dir, key)?.base_path().to_path_buf()),
        None => None,
    };

    Ok(KeygenReport {
        algorithm,
        public_key,
        secret_key,
        keystore,
    })
}

// ─── public-key ──────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct PublicKeyReport {
    pub algorithm: AlgorithmId,
    pub public_key: String,
    pub public_key_size: usize,
}

impl fmt::Display for PublicKeyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Algorithm:  {}", self.algorithm)?;
        writeln!(f, "Size:       {} bytes", self.public_key_size)?;
        write!(f, "Public key: {}", self.public_key)
    }
}

/// Print the canonical public key stored in a keystore
pub fn public_key(keystore: &Path, encoding: Encoding) -> Result<PublicKeyReport> {
    let (algorithm, public_key) = Keystore::load_public_key(keystore)?;

    Ok(PublicKeyReport {
        algorithm,
        public_key: encoding.encode(&public_key),
        public_key_size: public_key.len(),
    })
}

// ─── sign ────────────────────────────────────────────────────

/// Where the signing key comes from
#[derive(Debug, Clone)]
pub enum KeySource {
    Keystore(PathBuf),
    Raw {
        algorithm: AlgorithmId,
        public_key: Vec<u8>,
        secret_key: Vec<u8>,
    },
}

/// Resolve the signing key
///
/// With a keystore, `expected` (when given) must match the stored algorithm.
pub fn load_signing_key(source: KeySource, expected: Option<AlgorithmId>) -> Result<KeyMaterial> {
    match source {
        KeySource::Keystore(dir) => {
            let keystore = Keystore::load(&dir)?;
            if let Some(expected) = expected {
                if expected != keystore.algorithm() {
                    return Err(PqcError::AlgorithmMismatch {
                        expected,
                        actual: keystore.algorithm(),
                    }
                    .into());
                }
            }
            Ok(keystore.key().clone())
        }
        KeySource::Raw {
            algorithm,
            public_key,
            secret_key,
        } => {
            let secret_key = zeroize::Zeroizing::new(secret_key);
            Ok(KeyMaterial::from_raw_parts(algorithm, &public_key, &secret_key)?)
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SignReport {
    pub algorithm: AlgorithmId,
    /// Tagged signature (`tag || signature`)
    pub signature: String,
    pub signature_size: usize,
}

impl fmt::Display for SignReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Algorithm: {}", self.algorithm)?;
        writeln!(f, "Size:      {} bytes", self.signature_size)?;
        write!(f, "Signature: {}", self.signature)
    }
}

pub fn sign(key: &KeyMaterial, message: &[u8], encoding: Encoding) -> Result<SignReport> {
    let engine = factory::get_instance(key.algorithm())?;
    let signature = engine.sign(message, key)?;

    info!(
        "Signed {} byte message with {} ({} byte signature)",
        message.len(),
        signature.algorithm(),
        signature.len()
    );

    Ok(SignReport {
        algorithm: signature.algorithm(),
        signature: encoding.encode(&signature.encode()),
        signature_size: signature.len(),
    })
}

// ─── verify ──────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct VerifyReport {
    pub algorithm: AlgorithmId,
    pub valid: bool,
}

impl fmt::Display for VerifyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.valid {
            write!(f, "✓ Valid {} signature", self.algorithm)
        } else {
            write!(f, "✗ Invalid {} signature", self.algorithm)
        }
    }
}

/// Verify a tagged signature; the algorithm comes from the tag
///
/// # Errors
/// - Returns `Crypto` only if the signature bytes do not decode; a
///   signature that decodes but does not verify is reported as invalid
pub fn verify(public_key: &[u8], message: &[u8], encoded_signature: &[u8]) -> Result<VerifyReport> {
    let signature = PqSignature::decode(encoded_signature)?;
    let engine = factory::get_instance(signature.algorithm())?;
    let valid = engine.verify(message, &signature, public_key);

    debug!("Verification result for {}: {}", signature, valid);

    Ok(VerifyReport {
        algorithm: signature.algorithm(),
        valid,
    })
}

// ─── inspect-signature ───────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct SignatureReport {
    pub tag: u8,
    pub algorithm: AlgorithmId,
    pub payload_size: usize,
    pub expected_size: String,
    pub size_ok: bool,
}

impl fmt::Display for SignatureReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Tag:           0x{:02x}", self.tag)?;
        writeln!(f, "Algorithm:     {}", self.algorithm)?;
        writeln!(f, "Payload size:  {} bytes", self.payload_size)?;
        write!(
            f,
            "Expected size: {} ({})",
            self.expected_size,
            if self.size_ok { "ok" } else { "mismatch" }
        )
    }
}

pub fn inspect_signature(encoded_signature: &[u8]) -> Result<SignatureReport> {
    let signature = PqSignature::decode(encoded_signature)?;
    let algorithm = signature.algorithm();

    Ok(SignatureReport {
        tag: algorithm.tag(),
        algorithm,
        payload_size: signature.len(),
        expected_size: algorithm.signature_size().to_string(),
        size_ok: signature.has_expected_size(),
    })
}

// ─── inspect-tx ──────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct PqReport {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub algorithm: Option<AlgorithmId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature_size: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_key_size: Option<usize>,
    pub verification: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TxReport {
    pub hash: String,
    pub signing_hash: String,
    pub size: usize,
    pub chain_id: u64,
    pub nonce: u64,
    pub max_priority_fee_per_gas: String,
    pub max_fee_per_gas: String,
    pub gas_limit: u64,
    /// `None` for contract creation
    pub to: Option<String>,
    pub value: String,
    pub data: String,
    pub access_list_addresses: usize,
    pub access_list_storage_keys: usize,
    pub recovery_id: u8,
    pub r: String,
    pub s: String,
    pub pq: PqReport,
}

impl fmt::Display for TxReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Hash:                     {}", self.hash)?;
        writeln!(f, "Signing hash:             {}", self.signing_hash)?;
        writeln!(f, "Size:                     {} bytes", self.size)?;
        writeln!(f, "Chain ID:                 {}", self.chain_id)?;
        writeln!(f, "Nonce:                    {}", self.nonce)?;
        writeln!(f, "Max priority fee per gas: {}", self.max_priority_fee_per_gas)?;
        writeln!(f, "Max fee per gas:          {}", self.max_fee_per_gas)?;
        writeln!(f, "Gas limit:                {}", self.gas_limit)?;
        writeln!(
            f,
            "To:                       {}",
            self.to.as_deref().unwrap_or("(contract creation)")
        )?;
        writeln!(f, "Value:                    {}", self.value)?;
        writeln!(f, "Data:                     {}", self.data)?;
        writeln!(
            f,
            "Access list:              {} addresses, {} storage keys",
            self.access_list_addresses, self.access_list_storage_keys
        )?;
        writeln!(f, "Classical signature:      v={} r={} s={}", self.recovery_id, self.r, self.s)?;
        writeln!(f, "PQ slot:                  {}", self.pq.status)?;
        if let Some(algorithm) = self.pq.algorithm {
            writeln!(
                f,
                "PQ signature:             {} ({} bytes)",
                algorithm,
                self.pq.signature_size.unwrap_or_default()
            )?;
        }
        if let Some(size) = self.pq.public_key_size {
            writeln!(f, "PQ public key:            {} bytes", size)?;
        }
        write!(f, "PQ verification:          {}", self.pq.verification)
    }
}

/// Decode a hybrid transaction and check its PQ signature
pub fn inspect_tx(raw: &[u8], encoding: Encoding) -> Result<TxReport> {
    let decoded = codec::decode(raw)?;
    let tx = &decoded.transaction;
    let fields = tx.fields();
    let classical = tx.classical_signature();

    if let PqSlotStatus::Dropped { reason } = &decoded.pq_status {
        info!("PQ portion dropped, transaction treated as classical-only: {}", reason);
    }

    let pq = PqReport {
        status: decoded.pq_status.to_string(),
        algorithm: tx.pq_signature().map(|signature| signature.algorithm()),
        signature_size: tx.pq_signature().map(|signature| signature.len()),
        public_key_size: tx.pq_public_key().map(|public_key| public_key.len()),
        verification: tx.verify_pq().to_string(),
    };

    Ok(TxReport {
        hash: hex0x(decoded.hash.as_bytes()),
        signing_hash: hex0x(tx.signing_hash().as_bytes()),
        size: decoded.size,
        chain_id: fields.chain_id,
        nonce: fields.nonce,
        max_priority_fee_per_gas: fields.max_priority_fee_per_gas.to_string(),
        max_fee_per_gas: fields.max_fee_per_gas.to_string(),
        gas_limit: fields.gas_limit,
        to: fields.to.map(|address| hex0x(address.as_bytes())),
        value: fields.value.to_string(),
        data: encoding.encode(&fields.data),
        access_list_addresses: fields.access_list.len(),
        access_list_storage_keys: fields
            .access_list
            .iter()
            .map(|item| item.storage_keys.len())
            .sum(),
        recovery_id: classical.recovery_id,
        r: format!("{:#x}", classical.r),
        s: format!("{:#x}", classical.s),
        pq,
    })
}
