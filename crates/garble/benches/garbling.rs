//! Garbling and hash-only regeneration of ripple-carry adders.

#![allow(missing_docs, unused_crate_dependencies)]

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use seedgc_garble::{GarblingConfig, ripple_carry_adder};

fn bench_garble(c: &mut Criterion) {
    let config = GarblingConfig::default();
    let garbler = config.garbler();
    let seed = vec![0x24u8; config.seed_len()];

    let mut group = c.benchmark_group("garble/adder");
    for bits in [64u32, 1024, 16384] {
        let circuit = ripple_carry_adder(bits).expect("within adder bound");
        group.throughput(Throughput::Elements(circuit.num_gates() as u64));

        group.bench_with_input(BenchmarkId::new("garble", bits), &circuit, |b, circuit| {
            let mut prg = config.build_prg();
            let mut hash = config.build_hash();
            b.iter(|| {
                let out = garbler
                    .garble(black_box(circuit), &mut prg, &seed, &mut hash)
                    .expect("valid adder");
                black_box(out.digest);
            });
        });

        group.bench_with_input(BenchmarkId::new("hashed_tables", bits), &circuit, |b, circuit| {
            let mut prg = config.build_prg();
            let mut hash = config.build_hash();
            b.iter(|| {
                black_box(
                    garbler
                        .hashed_tables(black_box(circuit), &mut prg, &seed, &mut hash)
                        .expect("valid adder"),
                );
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_garble);
criterion_main!(benches);
