use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pq_crypto::{factory, AlgorithmId, PqSignature};

fn benchmark_sign(c: &mut Criterion) {
    let mut group = c.benchmark_group("sign");
    let message = [0x42u8; 32];

    for algorithm in AlgorithmId::ALL {
        let engine = factory::get_instance(algorithm).unwrap();
        let key = engine.generate_keypair().unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(algorithm), &message, |b, message| {
            b.iter(|| black_box(engine.sign(message, &key).unwrap()));
        });
    }

    group.finish();
}

fn benchmark_verify(c: &mut Criterion) {
    let mut group = c.benchmark_group("verify");
    let message = [0x42u8; 32];

    for algorithm in AlgorithmId::ALL {
        let engine = factory::get_instance(algorithm).unwrap();
        let key = engine.generate_keypair().unwrap();
        let public_key = key.public_key();
        let signature = engine.sign(&message, &key).unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(algorithm), &message, |b, message| {
            b.iter(|| black_box(engine.verify(message, &signature, &public_key)));
        });
    }

    group.finish();
}

fn benchmark_decode(c: &mut Criterion) {
    let engine = factory::get_instance(AlgorithmId::Dilithium3).unwrap();
    let key = engine.generate_keypair().unwrap();
    let encoded = engine.sign(b"decode", &key).unwrap().encode();

    c.bench_function("decode_dilithium3", |b| {
        b.iter(|| black_box(PqSignature::decode(&encoded).unwrap()));
    });
}

criterion_group!(benches, benchmark_sign, benchmark_verify, benchmark_decode);
criterion_main!(benches);
