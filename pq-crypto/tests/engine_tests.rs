//! Signature engine integration tests

use pq_crypto::{factory, AlgorithmId, KeyMaterial, PqSignature, PqcError, SignatureEngine};
use rand::{Rng, RngCore};
use std::sync::Arc;

fn engine(algorithm: AlgorithmId) -> Arc<dyn SignatureEngine> {
    factory::get_instance(algorithm).unwrap()
}

#[test]
fn test_sign_verify_every_algorithm() {
    let message = br#"{"chain_id":1,"nonce":42,"to":"0x5f5c"}"#;

    for algorithm in AlgorithmId::ALL {
        let engine = engine(algorithm);
        let key = engine.generate_keypair().unwrap();
        let signature = engine.sign(message, &key).unwrap();

        assert_eq!(signature.algorithm(), algorithm);
        assert!(signature.has_expected_size(), "{} produced {} bytes", algorithm, signature.len());
        assert!(engine.verify(message, &signature, &key.public_key()), "{}", algorithm);

        // Verification-only material carries the same public key
        let verifier = engine.import_public_key(&key.public_key()).unwrap();
        assert!(!verifier.has_secret());
        assert!(engine.verify(message, &signature, &verifier.public_key()));
    }
}

#[test]
fn test_wire_round_trip_any_payload() {
    let mut rng = rand::thread_rng();

    for algorithm in AlgorithmId::ALL {
        // Includes lengths the algorithm would reject at verification
        for len in [1, 2, 17, algorithm.max_signature_size(), algorithm.max_signature_size() + 1] {
            let mut payload = vec![0u8; len];
            rng.fill_bytes(&mut payload);

            let signature = PqSignature::new(algorithm, payload);
            let encoded = signature.encode();
            assert_eq!(encoded.len(), len + 1);
            assert_eq!(encoded[0], algorithm.tag());
            assert_eq!(PqSignature::decode(&encoded).unwrap(), signature);
        }
    }
}

#[test]
fn test_decode_unknown_tag() {
    match PqSignature::decode(&[0xFF, 0x00]) {
        Err(PqcError::UnknownAlgorithm(tag)) => assert_eq!(tag, 0xFF),
        other => panic!("Expected UnknownAlgorithm, got {:?}", other),
    }
}

#[test]
fn test_public_key_size_gating() {
    let message = b"size gating";

    for algorithm in AlgorithmId::ALL {
        let engine = engine(algorithm);
        let key = engine.generate_keypair().unwrap();
        let signature = engine.sign(message, &key).unwrap();
        let public_key = key.public_key();

        let short = &public_key[..public_key.len() - 1];
        assert!(!engine.verify(message, &signature, short), "{} accepted short key", algorithm);

        let mut long = public_key.clone();
        long.push(0);
        assert!(!engine.verify(message, &signature, &long), "{} accepted long key", algorithm);

        assert!(!engine.verify(message, &signature, &[]));
    }

    // 1311 bytes for Dilithium-2
    let engine = engine(AlgorithmId::Dilithium2);
    let key = engine.generate_keypair().unwrap();
    let signature = engine.sign(message, &key).unwrap();
    assert!(!engine.verify(message, &signature, &[0u8; 1311]));
}

#[test]
fn test_signature_size_gating() {
    let message = b"signature size gating";

    for algorithm in [AlgorithmId::Dilithium2, AlgorithmId::Dilithium3, AlgorithmId::Dilithium5] {
        let engine = engine(algorithm);
        let key = engine.generate_keypair().unwrap();
        let signature = engine.sign(message, &key).unwrap();

        let mut padded = signature.as_bytes().to_vec();
        padded.push(0);
        let padded = PqSignature::new(algorithm, padded);
        assert!(!engine.verify(message, &padded, &key.public_key()));

        let truncated = PqSignature::new(algorithm, &signature.as_bytes()[..signature.len() - 1]);
        assert!(!engine.verify(message, &truncated, &key.public_key()));
    }

    let engine = engine(AlgorithmId::Falcon512);
    let key = engine.generate_keypair().unwrap();
    let oversized = PqSignature::new(AlgorithmId::Falcon512, vec![0x39; 691]);
    assert!(!engine.verify(message, &oversized, &key.public_key()));
}

#[test]
fn test_tamper_sensitivity() {
    let message = b"transfer 100 wei to 0x00000000000000000000000000000000000000aa".to_vec();
    let mut rng = rand::thread_rng();

    for algorithm in AlgorithmId::ALL {
        let engine = engine(algorithm);
        let key = engine.generate_keypair().unwrap();
        let public_key = key.public_key();
        let signature = engine.sign(&message, &key).unwrap();

        let message_positions = [0, message.len() / 2, message.len() - 1];
        for pos in message_positions {
            let mut tampered = message.clone();
            tampered[pos] ^= 0x01;
            assert!(
                !engine.verify(&tampered, &signature, &public_key),
                "{} accepted message tampered at {}",
                algorithm,
                pos
            );
        }

        let last = signature.len() - 1;
        let signature_positions = [0, signature.len() / 2, last, rng.gen_range(1..last)];
        for pos in signature_positions {
            let mut tampered = signature.as_bytes().to_vec();
            tampered[pos] ^= 0x01;
            let tampered = PqSignature::new(algorithm, tampered);
            assert!(
                !engine.verify(&message, &tampered, &public_key),
                "{} accepted signature tampered at {}",
                algorithm,
                pos
            );
        }
    }
}

#[test]
fn test_cross_key_rejection() {
    let message = b"cross key";

    for algorithm in AlgorithmId::ALL {
        let engine = engine(algorithm);
        let signer = engine.generate_keypair().unwrap();
        let other = engine.generate_keypair().unwrap();
        let signature = engine.sign(message, &signer).unwrap();

        assert!(!engine.verify(message, &signature, &other.public_key()));
    }
}

#[test]
fn test_cross_algorithm_rejection() {
    let message = b"cross algorithm";
    let dilithium = engine(AlgorithmId::Dilithium2);
    let falcon = engine(AlgorithmId::Falcon512);

    let dilithium_key = dilithium.generate_keypair().unwrap();
    let falcon_key = falcon.generate_keypair().unwrap();
    let dilithium_sig = dilithium.sign(message, &dilithium_key).unwrap();
    let falcon_sig = falcon.sign(message, &falcon_key).unwrap();

    // Tag mismatch
    assert!(!falcon.verify(message, &dilithium_sig, &falcon_key.public_key()));
    assert!(!dilithium.verify(message, &falcon_sig, &dilithium_key.public_key()));

    // Relabelled signature bytes
    let relabelled = PqSignature::new(AlgorithmId::Dilithium3, dilithium_sig.as_bytes());
    let dilithium3 = engine(AlgorithmId::Dilithium3);
    let key3 = dilithium3.generate_keypair().unwrap();
    assert!(!dilithium3.verify(message, &relabelled, &key3.public_key()));

    // Signing with another algorithm's key
    match falcon.sign(message, &dilithium_key) {
        Err(PqcError::AlgorithmMismatch { expected, actual }) => {
            assert_eq!(expected, AlgorithmId::Falcon512);
            assert_eq!(actual, AlgorithmId::Dilithium2);
        }
        other => panic!("Expected AlgorithmMismatch, got {:?}", other),
    }
}

#[test]
fn test_cross_algorithm_rejection_within_size_bounds() {
    let message = b"falcon-512 signature offered to falcon-1024";
    let falcon512 = engine(AlgorithmId::Falcon512);
    let falcon1024 = engine(AlgorithmId::Falcon1024);

    let key512 = falcon512.generate_keypair().unwrap();
    let key1024 = falcon1024.generate_keypair().unwrap();
    let signature = falcon512.sign(message, &key512).unwrap();

    // Short enough for the Falcon-1024 size gate
    assert!(AlgorithmId::Falcon1024.signature_size().admits(signature.len()));
    assert!(falcon512.verify(message, &signature, &key512.public_key()));

    assert!(!falcon1024.verify(message, &signature, &key1024.public_key()));

    let relabelled = PqSignature::new(AlgorithmId::Falcon1024, signature.as_bytes());
    assert!(relabelled.has_expected_size());
    assert!(!falcon1024.verify(message, &relabelled, &key1024.public_key()));
}

#[test]
fn test_dilithium_secret_persistence() {
    let engine = engine(AlgorithmId::Dilithium5);
    let key = engine.generate_keypair().unwrap();

    let public_key = key.public_key();
    let secret_key = key.export_secret_key().unwrap();
    let restored =
        KeyMaterial::from_raw_parts(AlgorithmId::Dilithium5, &public_key, &secret_key).unwrap();

    let message = b"signed after restore";
    let signature = engine.sign(message, &restored).unwrap();
    assert!(engine.verify(message, &signature, &public_key));
}

#[test]
fn test_public_only_material_cannot_sign() {
    for algorithm in AlgorithmId::ALL {
        let engine = engine(algorithm);
        let key = engine.generate_keypair().unwrap();
        let verifier = KeyMaterial::from_public_key(algorithm, &key.public_key()).unwrap();

        assert!(matches!(
            engine.sign(b"message", &verifier),
            Err(PqcError::UnsupportedKeyFormat(_))
        ));
    }
}
