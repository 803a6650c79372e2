//! Error type definitions

use pq_crypto::PqcError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TxError {
    #[error("Empty transaction input")]
    Empty,

    #[error("Invalid transaction type: expected 0x{expected:02x}, found 0x{found:02x}")]
    InvalidTransactionType { expected: u8, found: u8 },

    #[error("Invalid field count: expected {expected}, found {found}")]
    FieldCount { expected: usize, found: usize },

    #[error("{0} trailing bytes after transaction list")]
    TrailingBytes(usize),

    #[error("Invalid field '{field}': {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("RLP decoding failed: {0}")]
    Rlp(#[from] rlp::DecoderError),

    #[error("PQ crypto error: {0}")]
    Crypto(#[from] PqcError),
}

pub type Result<T> = std::result::Result<T, TxError>;
