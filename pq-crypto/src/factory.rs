//! Crypto factory
//!
//! Resolves an [`AlgorithmId`] to the engine serving it. The process-wide
//! factory is built once, on first use, with one engine per algorithm and is
//! never mutated afterwards, so lookups take no lock.

use crate::algorithm::{AlgorithmFamily, AlgorithmId};
use crate::dilithium::DilithiumEngine;
use crate::error::{PqcError, Result};
use crate::falcon::FalconEngine;
use crate::traits::SignatureEngine;
use once_cell::sync::Lazy;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

static GLOBAL: Lazy<CryptoFactory> = Lazy::new(CryptoFactory::with_default_engines);

/// Registry of signature engines keyed by algorithm
#[derive(Clone)]
pub struct CryptoFactory {
    engines: BTreeMap<AlgorithmId, Arc<dyn SignatureEngine>>,
}

impl CryptoFactory {
    /// Factory with one engine for every known algorithm
    pub fn with_default_engines() -> Self {
        let mut engines: BTreeMap<AlgorithmId, Arc<dyn SignatureEngine>> = BTreeMap::new();

        for algorithm in AlgorithmId::ALL {
            let engine: Arc<dyn SignatureEngine> = match algorithm.family() {
                AlgorithmFamily::Dilithium => Arc::new(DilithiumEngine { algorithm }),
                AlgorithmFamily::Falcon => Arc::new(FalconEngine { algorithm }),
            };
            engines.insert(algorithm, engine);
        }

        tracing::info!("Crypto factory initialized with {} engines", engines.len());
        Self { engines }
    }

    /// Factory over an explicit engine set
    ///
    /// A later engine for the same algorithm replaces an earlier one.
    pub fn from_engines<I>(engines: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn SignatureEngine>>,
    {
        let engines = engines
            .into_iter()
            .map(|engine| (engine.algorithm(), engine))
            .collect();

        Self { engines }
    }

    /// Process-wide factory
    pub fn global() -> &'static CryptoFactory {
        &GLOBAL
    }

    /// Engine for `algorithm`
    ///
    /// Returns the same `Arc` on every call.
    ///
    /// # Errors
    /// - Returns `UnsupportedAlgorithm` if no engine is registered
    pub fn get_instance(&self, algorithm: AlgorithmId) -> Result<Arc<dyn SignatureEngine>> {
        self.engines
            .get(&algorithm)
            .cloned()
            .ok_or(PqcError::UnsupportedAlgorithm(algorithm))
    }

    pub fn is_supported(&self, algorithm: AlgorithmId) -> bool {
        self.engines.contains_key(&algorithm)
    }

    pub fn supported_algorithms(&self) -> BTreeSet<AlgorithmId> {
        self.engines.keys().copied().collect()
    }
}

impl std::fmt::Debug for CryptoFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CryptoFactory")
            .field("algorithms", &self.supported_algorithms())
            .finish()
    }
}

/// Engine for `algorithm` from the process-wide factory
pub fn get_instance(algorithm: AlgorithmId) -> Result<Arc<dyn SignatureEngine>> {
    CryptoFactory::global().get_instance(algorithm)
}

pub fn is_supported(algorithm: AlgorithmId) -> bool {
    CryptoFactory::global().is_supported(algorithm)
}

pub fn supported_algorithms() -> BTreeSet<AlgorithmId> {
    CryptoFactory::global().supported_algorithms()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::PqSignature;

    #[test]
    fn test_global_serves_every_algorithm() {
        for algorithm in AlgorithmId::ALL {
            assert!(is_supported(algorithm));
            assert_eq!(get_instance(algorithm).unwrap().algorithm(), algorithm);
        }
        assert_eq!(supported_algorithms().len(), AlgorithmId::ALL.len());
    }

    #[test]
    fn test_same_engine_on_every_call() {
        let first = get_instance(AlgorithmId::Dilithium3).unwrap();
        let second = get_instance(AlgorithmId::Dilithium3).unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        assert!(std::ptr::eq(CryptoFactory::global(), CryptoFactory::global()));
    }

    #[test]
    fn test_partial_factory() {
        let engine: Arc<dyn SignatureEngine> =
            Arc::new(FalconEngine::new(AlgorithmId::Falcon512).unwrap());
        let factory = CryptoFactory::from_engines([engine]);

        assert!(factory.is_supported(AlgorithmId::Falcon512));
        assert!(!factory.is_supported(AlgorithmId::Dilithium2));
        assert_eq!(
            factory.supported_algorithms().into_iter().collect::<Vec<_>>(),
            vec![AlgorithmId::Falcon512]
        );

        match factory.get_instance(AlgorithmId::Dilithium2) {
            Err(PqcError::UnsupportedAlgorithm(id)) => assert_eq!(id, AlgorithmId::Dilithium2),
            Err(e) => panic!("Expected UnsupportedAlgorithm, got {:?}", e),
            Ok(_) => panic!("Expected UnsupportedAlgorithm, got an engine"),
        }
    }

    #[test]
    fn test_concurrent_verification() {
        let engine = get_instance(AlgorithmId::Dilithium2).unwrap();
        let key = engine.generate_keypair().unwrap();
        let public_key = key.public_key();
        let message = b"shared across threads";
        let signature = engine.sign(message, &key).unwrap();
        let forged = PqSignature::new(AlgorithmId::Dilithium2, vec![0u8; 2420]);

        std::thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| {
                    let engine = get_instance(AlgorithmId::Dilithium2).unwrap();
                    for _ in 0..8 {
                        assert!(engine.verify(message, &signature, &public_key));
                        assert!(!engine.verify(message, &forged, &public_key));
                    }
                });
            }
        });
    }
}
