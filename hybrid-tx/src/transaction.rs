//! Hybrid transaction model
//!
//! A hybrid transaction always carries a classical (ECDSA) signature and may
//! additionally carry a post-quantum signature over the same signing hash.

use crate::error::{Result, TxError};
use crate::{codec, keccak256, TRANSACTION_TYPE};
use pq_crypto::{CryptoFactory, KeyMaterial, PqSignature};
use primitive_types::{H160, H256, U256};
use rlp::{Decodable, DecoderError, Encodable, Rlp, RlpStream};
use std::fmt;

/// Number of classical fields covered by the signing hash
pub const SIGNED_FIELD_COUNT: usize = 9;

/// Access list entry: an address and the storage slots it will touch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessListItem {
    pub address: H160,
    pub storage_keys: Vec<H256>,
}

impl Encodable for AccessListItem {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.begin_list(2);
        s.append(&self.address);
        s.begin_list(self.storage_keys.len());
        for key in &self.storage_keys {
            s.append(key);
        }
    }
}

impl Decodable for AccessListItem {
    fn decode(rlp: &Rlp) -> std::result::Result<Self, DecoderError> {
        if rlp.item_count()? != 2 {
            return Err(DecoderError::RlpIncorrectListLen);
        }

        Ok(Self {
            address: rlp.val_at(0)?,
            storage_keys: rlp.list_at(1)?,
        })
    }
}

/// Classical hybrid-transaction fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionFields {
    pub chain_id: u64,
    pub nonce: u64,
    pub max_priority_fee_per_gas: U256,
    pub max_fee_per_gas: U256,
    pub gas_limit: u64,
    /// `None` for contract creation
    pub to: Option<H160>,
    pub value: U256,
    pub data: Vec<u8>,
    pub access_list: Vec<AccessListItem>,
}

impl TransactionFields {
    /// Hash covered by both the classical and the PQ signature
    ///
    /// `keccak256(0x05 || rlp([chain_id, nonce, ..., access_list]))`
    pub fn signing_hash(&self) -> H256 {
        let mut stream = RlpStream::new_list(SIGNED_FIELD_COUNT);
        self.append_to(&mut stream);
        let body = stream.out();

        let mut preimage = Vec::with_capacity(1 + body.len());
        preimage.push(TRANSACTION_TYPE);
        preimage.extend_from_slice(&body);
        keccak256(&preimage)
    }

    /// Append the signed fields to an open list
    pub(crate) fn append_to(&self, stream: &mut RlpStream) {
        stream.append(&self.chain_id);
        stream.append(&self.nonce);
        stream.append(&self.max_priority_fee_per_gas);
        stream.append(&self.max_fee_per_gas);
        stream.append(&self.gas_limit);
        match &self.to {
            Some(address) => stream.append(address),
            None => stream.append_empty_data(),
        };
        stream.append(&self.value);
        stream.append(&self.data);
        stream.begin_list(self.access_list.len());
        for item in &self.access_list {
            stream.append(item);
        }
    }

    /// Read the signed fields from positions `0..9` of a transaction list
    pub(crate) fn from_rlp(list: &Rlp) -> Result<Self> {
        Ok(Self {
            chain_id: list.val_at(0)?,
            nonce: list.val_at(1)?,
            max_priority_fee_per_gas: list.val_at(2)?,
            max_fee_per_gas: list.val_at(3)?,
            gas_limit: list.val_at(4)?,
            to: decode_to(&list.at(5)?)?,
            value: list.val_at(6)?,
            data: list.val_at(7)?,
            access_list: list.list_at(8)?,
        })
    }
}

/// Payload of an item that must be a byte string
///
/// `Rlp::data` hands back a list's payload too, so lists are rejected first.
pub(crate) fn byte_string<'a>(item: &Rlp<'a>) -> Result<&'a [u8]> {
    if !item.is_data() {
        return Err(DecoderError::RlpExpectedToBeData.into());
    }
    Ok(item.data()?)
}

fn decode_to(item: &Rlp) -> Result<Option<H160>> {
    let bytes = byte_string(item)?;
    match bytes.len() {
        0 => Ok(None),
        20 => Ok(Some(H160::from_slice(bytes))),
        n => Err(TxError::InvalidField {
            field: "to",
            reason: format!("expected empty or 20 bytes, got {} bytes", n),
        }),
    }
}

/// Classical ECDSA signature (recovery id, r, s)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassicalSignature {
    pub recovery_id: u8,
    pub r: U256,
    pub s: U256,
}

impl ClassicalSignature {
    pub fn new(recovery_id: u8, r: U256, s: U256) -> Self {
        Self { recovery_id, r, s }
    }
}

/// PQ signature attached to a transaction, with the signer's public key
/// when the sender published it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PqAttachment {
    pub signature: PqSignature,
    pub public_key: Option<Vec<u8>>,
}

/// Mandatory classical signature plus an optional PQ attachment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HybridSignature {
    pub classical: ClassicalSignature,
    pub pq: Option<PqAttachment>,
}

impl HybridSignature {
    pub fn is_hybrid(&self) -> bool {
        self.pq.is_some()
    }
}

/// Outcome of checking the PQ portion of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PqVerification {
    /// No PQ signature attached
    Absent,
    /// PQ signature attached without a public key; only the classical
    /// signature can be trusted
    Unverifiable,
    /// No engine registered for the signature's algorithm
    Unsupported,
    Valid,
    Invalid,
}

impl PqVerification {
    pub fn is_valid(self) -> bool {
        self == PqVerification::Valid
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PqVerification::Absent => "absent",
            PqVerification::Unverifiable => "unverifiable",
            PqVerification::Unsupported => "unsupported",
            PqVerification::Valid => "valid",
            PqVerification::Invalid => "invalid",
        }
    }
}

impl fmt::Display for PqVerification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HybridTransaction {
    fields: TransactionFields,
    signature: HybridSignature,
}

impl HybridTransaction {
    /// Transaction carrying only the classical signature
    pub fn classical_only(fields: TransactionFields, classical: ClassicalSignature) -> Self {
        Self {
            fields,
            signature: HybridSignature {
                classical,
                pq: None,
            },
        }
    }

    pub fn with_pq(
        fields: TransactionFields,
        classical: ClassicalSignature,
        attachment: PqAttachment,
    ) -> Self {
        Self {
            fields,
            signature: HybridSignature {
                classical,
                pq: Some(attachment),
            },
        }
    }

    pub(crate) fn from_parts(fields: TransactionFields, signature: HybridSignature) -> Self {
        Self { fields, signature }
    }

    /// Sign the signing hash with `key` and attach the signature and the
    /// canonical public key
    ///
    /// # Errors
    /// - Returns `Crypto(UnsupportedAlgorithm)` if no engine serves the key
    /// - Returns `Crypto(UnsupportedKeyFormat)` if `key` cannot sign
    pub fn sign_hybrid(
        fields: TransactionFields,
        classical: ClassicalSignature,
        key: &KeyMaterial,
    ) -> Result<Self> {
        let engine = pq_crypto::factory::get_instance(key.algorithm())?;
        let signing_hash = fields.signing_hash();
        let signature = engine.sign(signing_hash.as_bytes(), key)?;

        tracing::debug!(
            "Attached {} signature to transaction: signing_hash=0x{}",
            signature.algorithm(),
            hex::encode(signing_hash.as_bytes())
        );

        Ok(Self::with_pq(
            fields,
            classical,
            PqAttachment {
                signature,
                public_key: Some(key.public_key()),
            },
        ))
    }

    pub fn fields(&self) -> &TransactionFields {
        &self.fields
    }

    pub fn signature(&self) -> &HybridSignature {
        &self.signature
    }

    pub fn classical_signature(&self) -> &ClassicalSignature {
        &self.signature.classical
    }

    pub fn pq_attachment(&self) -> Option<&PqAttachment> {
        self.signature.pq.as_ref()
    }

    pub fn pq_signature(&self) -> Option<&PqSignature> {
        self.pq_attachment().map(|pq| &pq.signature)
    }

    pub fn pq_public_key(&self) -> Option<&[u8]> {
        self.pq_attachment().and_then(|pq| pq.public_key.as_deref())
    }

    pub fn signing_hash(&self) -> H256 {
        self.fields.signing_hash()
    }

    /// Typed envelope `0x05 || rlp([...])`
    pub fn encode(&self) -> Vec<u8> {
        codec::encode(self)
    }

    /// keccak256 of the encoded envelope
    pub fn hash(&self) -> H256 {
        keccak256(&self.encode())
    }

    /// Check the PQ signature against the signing hash using the
    /// process-wide engines
    pub fn verify_pq(&self) -> PqVerification {
        self.verify_pq_with(CryptoFactory::global())
    }

    pub fn verify_pq_with(&self, factory: &CryptoFactory) -> PqVerification {
        let Some(pq) = self.pq_attachment() else {
            return PqVerification::Absent;
        };

        let Some(public_key) = pq.public_key.as_deref() else {
            return PqVerification::Unverifiable;
        };

        let engine = match factory.get_instance(pq.signature.algorithm()) {
            Ok(engine) => engine,
            Err(e) => {
                tracing::debug!("Cannot verify PQ signature: {}", e);
                return PqVerification::Unsupported;
            }
        };

        if engine.verify(self.signing_hash().as_bytes(), &pq.signature, public_key) {
            PqVerification::Valid
        } else {
            PqVerification::Invalid
        }
    }
}
