//! Post-quantum signature library
//!
//! Provides the NIST post-quantum signature schemes used by hybrid
//! transactions: Dilithium2/3/5 (ML-DSA) and Falcon-512/1024, behind one
//! [`SignatureEngine`] interface and a process-wide [`CryptoFactory`].
//!
//! # Quick Start
//!
//! ```rust
//! use pq_crypto::{factory, AlgorithmId, PqSignature};
//!
//! // Resolve the engine
//! let engine = factory::get_instance(AlgorithmId::Dilithium3).unwrap();
//!
//! // Generate keypair and sign
//! let key = engine.generate_keypair().unwrap();
//! let message = b"Hybrid transaction signing hash";
//! let signature = engine.sign(message, &key).unwrap();
//!
//! // Wire form: algorithm tag followed by the raw signature
//! let encoded = signature.encode();
//! let decoded = PqSignature::decode(&encoded).unwrap();
//!
//! // Verify signature
//! assert!(engine.verify(message, &decoded, &key.public_key()));
//! ```

pub mod algorithm;
pub mod dilithium;
pub mod error;
pub mod factory;
pub mod falcon;
pub mod keys;
pub mod signature;
pub mod traits;

// Re-export commonly used types
pub use algorithm::{AlgorithmFamily, AlgorithmId, AlgorithmInfo, SignatureSize};
pub use dilithium::DilithiumEngine;
pub use error::{PqcError, Result};
pub use factory::CryptoFactory;
pub use falcon::FalconEngine;
pub use keys::KeyMaterial;
pub use signature::PqSignature;
pub use traits::SignatureEngine;
