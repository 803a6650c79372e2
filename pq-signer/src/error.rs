//! Signer CLI error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SignerError {
    #[error("Configuration error: {0}")]
    Config(String),

    /// Byte argument that is not valid hex/base64
    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("Keystore error: {0}")]
    Keystore(String),

    #[error("PQC error: {0}")]
    Crypto(#[from] pq_crypto::PqcError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] hybrid_tx::TxError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SignerError>;
