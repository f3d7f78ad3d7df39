//! Rule tree compilation benchmarks.
//!
//! Run with:
//! ```bash
//! cargo bench --bench compile
//! ```

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use ruletree_rs::compiler::Compiler;
use ruletree_rs::rules::{LifeLike, Parity};
use ruletree_rs::transitions::TransitionTreeBuilder;
use ruletree_rs::types::{Neighborhood, State};

fn bench_life_like(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile/life");

    for (name, rule) in [
        ("B3/S23", LifeLike::conway()),
        ("B36/S23", LifeLike::new(Neighborhood::Moore, &[3, 6], &[2, 3])),
        ("B1/S1-vN", LifeLike::new(Neighborhood::VonNeumann, &[1], &[1])),
    ] {
        let num_vars = rule.num_vars();
        group.throughput(Throughput::Elements(1 << num_vars));
        group.bench_with_input(BenchmarkId::from_parameter(name), &rule, |b, rule| {
            let mut compiler = Compiler::new(2, num_vars).unwrap();
            b.iter(|| compiler.compile(rule).unwrap());
        });
    }

    group.finish();
}

fn bench_parity(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile/parity");

    for num_states in [2u32, 3, 4] {
        let parity = Parity::new(num_states, (0..5).collect());
        group.throughput(Throughput::Elements((num_states as u64).pow(9)));
        group.bench_with_input(BenchmarkId::from_parameter(num_states), &parity, |b, parity| {
            let mut compiler = Compiler::new(num_states, 9).unwrap();
            b.iter(|| compiler.compile(parity).unwrap());
        });
    }

    group.finish();
}

fn bench_transitions(c: &mut Criterion) {
    let mut group = c.benchmark_group("transitions/random");

    for count in [100, 1000] {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let num_states = 8u32;
        let transitions: Vec<(Vec<Vec<State>>, State)> = (0..count)
            .map(|_| {
                let inputs = (0..5)
                    .map(|_| {
                        let mut set: Vec<State> = (0..num_states).filter(|_| rng.random_bool(0.3)).collect();
                        if set.is_empty() {
                            set.push(rng.random_range(0..num_states));
                        }
                        set
                    })
                    .collect();
                (inputs, rng.random_range(0..num_states))
            })
            .collect();

        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &transitions, |b, transitions| {
            b.iter(|| {
                let mut builder = TransitionTreeBuilder::new(num_states, 4).unwrap();
                for (inputs, output) in transitions {
                    builder.add(inputs, *output).unwrap();
                }
                builder.build()
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_life_like, bench_parity, bench_transitions);
criterion_main!(benches);
