//! Hybrid transaction codec
//!
//! Envelope: `0x05 || rlp([...14 items])`
//!
//! | # | Field | # | Field |
//! |---|-------|---|-------|
//! | 0 | chain id | 7 | data |
//! | 1 | nonce | 8 | access list |
//! | 2 | max priority fee per gas | 9 | recovery id |
//! | 3 | max fee per gas | 10 | r |
//! | 4 | gas limit | 11 | s |
//! | 5 | to (20 bytes or empty) | 12 | PQ signature (`tag || sig`, or empty) |
//! | 6 | value | 13 | PQ public key (or empty) |
//!
//! Decoding runs in two stages. The classical stage fails hard on any
//! structural problem. The PQ stage never fails: a PQ slot that does not
//! decode is dropped and the transaction is accepted as classical-only.

use crate::error::{Result, TxError};
use crate::transaction::{
    byte_string, ClassicalSignature, HybridSignature, HybridTransaction, PqAttachment,
    TransactionFields,
};
use crate::{keccak256, TRANSACTION_TYPE};
use pq_crypto::PqSignature;
use primitive_types::H256;
use rlp::{DecoderError, Rlp, RlpStream};
use std::fmt;

/// Items in the transaction list
pub const FIELD_COUNT: usize = 14;

const PQ_SIGNATURE_INDEX: usize = 12;
const PQ_PUBLIC_KEY_INDEX: usize = 13;

/// What the decoder found in the PQ slots
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PqSlotStatus {
    /// Signature slot empty
    Empty,
    Attached,
    /// Signature present, key slot empty
    AttachedWithoutKey,
    /// Signature slot present but undecodable; transaction kept as classical-only
    Dropped { reason: String },
}

impl fmt::Display for PqSlotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PqSlotStatus::Empty => f.write_str("empty"),
            PqSlotStatus::Attached => f.write_str("attached"),
            PqSlotStatus::AttachedWithoutKey => f.write_str("attached without public key"),
            PqSlotStatus::Dropped { reason } => write!(f, "dropped ({})", reason),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedTransaction {
    pub transaction: HybridTransaction,
    /// keccak256 of the raw input, PQ portion included even when dropped
    pub hash: H256,
    /// Raw input length
    pub size: usize,
    pub pq_status: PqSlotStatus,
}

/// Encode a transaction as its typed envelope
pub fn encode(tx: &HybridTransaction) -> Vec<u8> {
    let mut stream = RlpStream::new_list(FIELD_COUNT);
    tx.fields().append_to(&mut stream);

    let classical = tx.classical_signature();
    stream.append(&classical.recovery_id);
    stream.append(&classical.r);
    stream.append(&classical.s);

    match tx.pq_attachment() {
        Some(pq) => {
            stream.append(&pq.signature.encode());
            match &pq.public_key {
                Some(public_key) => stream.append(public_key),
                None => stream.append_empty_data(),
            };
        }
        None => {
            stream.append_empty_data();
            stream.append_empty_data();
        }
    }

    let body = stream.out();
    let mut out = Vec::with_capacity(1 + body.len());
    out.push(TRANSACTION_TYPE);
    out.extend_from_slice(&body);
    out
}

/// Decode a typed envelope
///
/// # Errors
/// - Returns `Empty` for empty input
/// - Returns `InvalidTransactionType` if the first byte is not `0x05`
/// - Returns `TrailingBytes` if bytes follow the transaction list
/// - Returns `FieldCount` if the list does not hold exactly 14 items
/// - Returns `Rlp` / `InvalidField` for malformed classical fields or a PQ
///   slot that is not a byte string
pub fn decode(input: &[u8]) -> Result<DecodedTransaction> {
    let (&tx_type, body) = input.split_first().ok_or(TxError::Empty)?;
    if tx_type != TRANSACTION_TYPE {
        return Err(TxError::InvalidTransactionType {
            expected: TRANSACTION_TYPE,
            found: tx_type,
        });
    }

    let list = Rlp::new(body);
    let payload = list.payload_info()?;
    let list_len = payload.header_len + payload.value_len;
    if list_len > body.len() {
        return Err(DecoderError::RlpIsTooShort.into());
    }
    if list_len < body.len() {
        return Err(TxError::TrailingBytes(body.len() - list_len));
    }
    if !list.is_list() {
        return Err(DecoderError::RlpExpectedToBeList.into());
    }

    let found = list.item_count()?;
    if found != FIELD_COUNT {
        return Err(TxError::FieldCount {
            expected: FIELD_COUNT,
            found,
        });
    }

    let fields = TransactionFields::from_rlp(&list)?;
    let classical = ClassicalSignature {
        recovery_id: list.val_at(9)?,
        r: list.val_at(10)?,
        s: list.val_at(11)?,
    };
    let signature_slot = byte_string(&list.at(PQ_SIGNATURE_INDEX)?)?;
    let key_slot = byte_string(&list.at(PQ_PUBLIC_KEY_INDEX)?)?;

    let (pq, pq_status) = decode_pq_slots(signature_slot, key_slot);

    Ok(DecodedTransaction {
        transaction: HybridTransaction::from_parts(fields, HybridSignature { classical, pq }),
        hash: keccak256(input),
        size: input.len(),
        pq_status,
    })
}

fn decode_pq_slots(signature_slot: &[u8], key_slot: &[u8]) -> (Option<PqAttachment>, PqSlotStatus) {
    if signature_slot.is_empty() {
        if !key_slot.is_empty() {
            tracing::debug!(
                "Discarding {} byte PQ public key without a PQ signature",
                key_slot.len()
            );
        }
        return (None, PqSlotStatus::Empty);
    }

    let signature = match PqSignature::decode(signature_slot) {
        Ok(signature) => signature,
        Err(e) => {
            tracing::debug!(
                "Dropping undecodable PQ signature ({} bytes), accepting as classical-only: {}",
                signature_slot.len(),
                e
            );
            return (
                None,
                PqSlotStatus::Dropped {
                    reason: e.to_string(),
                },
            );
        }
    };

    let (public_key, status) = if key_slot.is_empty() {
        (None, PqSlotStatus::AttachedWithoutKey)
    } else {
        (Some(key_slot.to_vec()), PqSlotStatus::Attached)
    };

    (Some(PqAttachment { signature, public_key }), status)
}
