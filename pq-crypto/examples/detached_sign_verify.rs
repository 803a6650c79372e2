//! Detached signing and verification with every registered algorithm

use pq_crypto::{factory, PqSignature};

fn main() {
    println!("=== Detached Signature/Verification ===\n");

    let message = b"Test message for detached signature";

    for algorithm in factory::supported_algorithms() {
        let engine = match factory::get_instance(algorithm) {
            Ok(engine) => engine,
            Err(e) => {
                println!("✗ {}: {}", algorithm, e);
                continue;
            }
        };

        // 1. Generate keys
        let key = match engine.generate_keypair() {
            Ok(key) => key,
            Err(e) => {
                println!("✗ {}: key generation failed: {}", algorithm, e);
                continue;
            }
        };
        let public_key = key.public_key();

        println!("{} (NIST level {})", algorithm, algorithm.nist_level());
        println!("  Public key length: {} bytes", public_key.len());

        // 2. Sign message
        let signature = match engine.sign(message, &key) {
            Ok(signature) => signature,
            Err(e) => {
                println!("✗ Signing failed: {}", e);
                continue;
            }
        };
        println!("  Signature length: {} bytes ({})", signature.len(), algorithm.signature_size());

        // 3. Verify with public key bytes only, through the wire form
        let encoded = signature.encode();
        match PqSignature::decode(&encoded) {
            Ok(decoded) if engine.verify(message, &decoded, &public_key) => {
                println!("  ✓ Verification successful (public-key-only)")
            }
            Ok(_) => println!("  ✗ Verification failed (public-key-only)"),
            Err(e) => println!("  ✗ Decode error: {}", e),
        }

        // 4. Wrong message
        if engine.verify(b"Wrong message", &signature, &public_key) {
            println!("  ✗ Critical error: wrong message was accepted!");
        } else {
            println!("  ✓ Correct: wrong message was rejected");
        }
        println!();
    }
}
