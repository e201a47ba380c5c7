//! Criterion benchmarks for the representation layer.
//!
//! Measures mutation throughput over the main carrier shapes and codec
//! round-trip cost, independent of any optimisation loop.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use evoparam::adaptors::{BitFlipAdaptor, DoubleGaussAdaptor};
use evoparam::carriers::{BitCollection, BoundedDouble, DoubleCollection};
use evoparam::codec::{Encodable, Encoding};
use evoparam::individual::Individual;

fn sphere_individual(dim: usize) -> Individual {
    let mut xs = DoubleCollection::from_values(vec![1.0; dim]);
    xs.add_adaptor(DoubleGaussAdaptor::with_parameters(0.1, 0.001, 1e-4, 1.0).unwrap())
        .unwrap();
    let mut ind = Individual::new();
    ind.push(xs);
    ind.set_objective(|ind: &Individual| {
        let xs: &DoubleCollection = ind.child_at(0).unwrap();
        xs.iter().map(|x| x * x).sum()
    });
    ind
}

fn mixed_individual() -> Individual {
    let mut ind = sphere_individual(50);
    let mut bits = BitCollection::from_values(vec![false; 64]);
    bits.add_adaptor(BitFlipAdaptor::with_probability(0.05).unwrap())
        .unwrap();
    ind.push(bits);
    let mut bounded = BoundedDouble::new(0.0, -5.0, 5.0).unwrap();
    bounded
        .add_adaptor(DoubleGaussAdaptor::with_sigma(0.5).unwrap())
        .unwrap();
    ind.push(bounded);
    ind
}

fn bench_mutation(c: &mut Criterion) {
    let mut group = c.benchmark_group("mutation");

    for dim in [10usize, 100, 1000] {
        let mut ind = sphere_individual(dim);
        group.bench_with_input(BenchmarkId::new("gauss_collection", dim), &dim, |b, _| {
            b.iter(|| {
                ind.mutate().unwrap();
                black_box(ind.is_dirty())
            })
        });
    }

    let mut bits = BitCollection::from_values(vec![false; 1000]);
    bits.add_adaptor(BitFlipAdaptor::with_probability(0.05).unwrap())
        .unwrap();
    group.bench_function("bitflip_collection_1000", |b| {
        b.iter(|| {
            bits.mutate();
            black_box(bits.len())
        })
    });

    group.finish();
}

fn bench_fitness_cache(c: &mut Criterion) {
    let mut group = c.benchmark_group("fitness");

    let mut ind = sphere_individual(100);
    group.bench_function("evaluate_dirty", |b| {
        b.iter(|| {
            ind.set_dirty();
            black_box(ind.fitness().unwrap())
        })
    });

    let mut clean = sphere_individual(100);
    clean.fitness().unwrap();
    group.bench_function("read_cached", |b| {
        b.iter(|| black_box(clean.fitness().unwrap()))
    });

    group.finish();
}

fn bench_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");
    group.sample_size(20);

    let ind = mixed_individual();
    for encoding in [Encoding::Text, Encoding::Xml, Encoding::Binary] {
        let encoded = ind.to_encoded(encoding).unwrap();
        group.bench_with_input(
            BenchmarkId::new("encode", format!("{encoding:?}")),
            &encoding,
            |b, &e| b.iter(|| black_box(ind.to_encoded(e).unwrap())),
        );
        group.bench_with_input(
            BenchmarkId::new("decode", format!("{encoding:?}")),
            &encoding,
            |b, &e| b.iter(|| black_box(Individual::from_encoded(&encoded, e).unwrap())),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_mutation, bench_fitness_cache, bench_codec);
criterion_main!(benches);
