//! Benchmarks for BCH and Goppa encoding and decoding.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use galois_ecc::bits::BitBuffer;
use galois_ecc::ecc::{random_goppa_polynomial, BchCode, BchParams, GoppaCode};
use galois_ecc::field::Gf2mField;
use rand::rngs::StdRng;
use rand::seq::index::sample;
use rand::{Rng, SeedableRng};

/// (m, t) pairs to benchmark
const BCH_PARAMS: &[(u32, usize)] = &[(4, 2), (6, 3), (8, 4), (10, 8)];

fn random_bits(rng: &mut StdRng, len: usize) -> BitBuffer {
    (0..len).map(|_| rng.gen_bool(0.5)).collect()
}

fn flip_random(rng: &mut StdRng, bits: &mut BitBuffer, count: usize) {
    for i in sample(rng, bits.len(), count) {
        let bit = !bits[i];
        bits.set(i, bit);
    }
}

fn bench_bch(c: &mut Criterion) {
    let mut group = c.benchmark_group("bch");
    let mut rng = StdRng::seed_from_u64(42);

    for &(m, t) in BCH_PARAMS {
        let code = BchCode::new(BchParams::new(m, t)).unwrap();
        let message = random_bits(&mut rng, code.k());
        let mut received = code.encode(&message).unwrap();
        flip_random(&mut rng, &mut received, t);
        let label = format!("{}", code);

        group.bench_with_input(BenchmarkId::new("encode", &label), &message, |b, message| {
            b.iter(|| black_box(code.encode(message).unwrap()));
        });
        group.bench_with_input(BenchmarkId::new("decode", &label), &received, |b, received| {
            b.iter(|| black_box(code.decode(received).unwrap()));
        });
    }

    group.finish();
}

fn bench_goppa(c: &mut Criterion) {
    let mut group = c.benchmark_group("goppa");
    let mut rng = StdRng::seed_from_u64(7);

    for &(m, t) in &[(6u32, 4usize), (8, 8)] {
        let field = Gf2mField::with_default_modulus(m).unwrap();
        let goppa = random_goppa_polynomial(&field, t, &mut rng).unwrap();
        let code = GoppaCode::with_full_support(&field, goppa).unwrap();
        let message = random_bits(&mut rng, code.k());
        let mut received = code.encode(&message).unwrap();
        flip_random(&mut rng, &mut received, t);
        let label = format!("{}", code);

        group.bench_with_input(BenchmarkId::new("encode", &label), &message, |b, message| {
            b.iter(|| black_box(code.encode(message).unwrap()));
        });
        group.bench_with_input(BenchmarkId::new("decode", &label), &received, |b, received| {
            b.iter(|| black_box(code.decode(received)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_bch, bench_goppa);
criterion_main!(benches);
