//! Hybrid (classical + post-quantum) signed transactions
//!
//! A hybrid transaction is an EIP-1559 style typed transaction (type `0x05`)
//! whose list ends with two extra byte strings: a type-tagged PQ signature
//! and the signer's PQ public key. Both may be empty. The PQ signature covers
//! the same signing hash as the classical ECDSA signature.
//!
//! # Example
//!
//! ```rust
//! use hybrid_tx::{codec, ClassicalSignature, HybridTransaction, PqVerification, TransactionFields};
//! use pq_crypto::{factory, AlgorithmId};
//!
//! let engine = factory::get_instance(AlgorithmId::Dilithium2).unwrap();
//! let key = engine.generate_keypair().unwrap();
//!
//! let fields = TransactionFields { chain_id: 1, nonce: 0, gas_limit: 21_000, ..Default::default() };
//! let tx = HybridTransaction::sign_hybrid(fields, ClassicalSignature::default(), &key).unwrap();
//!
//! let decoded = codec::decode(&tx.encode()).unwrap();
//! assert_eq!(decoded.transaction, tx);
//! assert_eq!(decoded.transaction.verify_pq(), PqVerification::Valid);
//! ```

pub mod codec;
pub mod error;
pub mod transaction;

use primitive_types::H256;
use sha3::{Digest, Keccak256};

// Re-export commonly used types
pub use codec::{DecodedTransaction, PqSlotStatus};
pub use error::{Result, TxError};
pub use transaction::{
    AccessListItem, ClassicalSignature, HybridSignature, HybridTransaction, PqAttachment,
    PqVerification, TransactionFields,
};

/// EIP-2718 type byte of hybrid transactions
pub const TRANSACTION_TYPE: u8 = 0x05;

pub fn keccak256(bytes: &[u8]) -> H256 {
    H256::from_slice(&Keccak256::digest(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keccak256_empty() {
        assert_eq!(
            hex::encode(keccak256(&[]).as_bytes()),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }
}
