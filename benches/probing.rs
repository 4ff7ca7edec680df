#![allow(
    missing_docs,
    clippy::missing_docs_in_private_items,
    clippy::unwrap_used,
    clippy::arithmetic_side_effects
)]
use std::hint::black_box;

use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use probing::{ProbeMethod, ProbingHashTable};
use proptest::{
    prelude::{Strategy, any},
    strategy::ValueTree,
    test_runner::TestRunner,
};

const ITEMS_AMOUNT: usize = 1000;
const SAMPLE_SIZE: usize = 10;
const METHODS: [ProbeMethod; 2] = [ProbeMethod::Linear, ProbeMethod::Quadratic];

fn random_items() -> Vec<(String, String)> {
    let mut runner = TestRunner::default();
    proptest::collection::vec(any::<(String, String)>(), ITEMS_AMOUNT)
        .new_tree(&mut runner)
        .unwrap()
        .current()
}

fn filled(method: ProbeMethod, items: &[(String, String)]) -> ProbingHashTable<String, String> {
    let mut table = ProbingHashTable::new(method);
    for (key, value) in items {
        table.insert(key.clone(), value.clone());
    }
    table
}

fn operation_benches(c: &mut Criterion) {
    let items = random_items();

    let mut group = c.benchmark_group("Probing method comparison benchmark");
    group.sample_size(SAMPLE_SIZE);
    for method in METHODS {
        group.bench_function(format!("{method} insert"), |b| {
            b.iter_batched(
                || items.clone(),
                |items| {
                    let mut table = ProbingHashTable::new(method);
                    for (key, value) in items {
                        table.insert(key, value);
                    }
                    table
                },
                BatchSize::SmallInput,
            );
        });

        let table = filled(method, &items);
        group.bench_function(format!("{method} search"), |b| {
            b.iter(|| {
                for (key, _) in &items {
                    black_box(table.search(key));
                }
            });
        });

        group.bench_function(format!("{method} remove"), |b| {
            b.iter_batched(
                || table.clone(),
                |mut table| {
                    for (key, _) in &items {
                        black_box(table.remove(key));
                    }
                    table
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

// Measures the resize alone: the table is primed past its threshold, so the next insert
// doubles the slot array before placing the key.
fn resize_benches(c: &mut Criterion) {
    let items = random_items();

    let mut group = c.benchmark_group("Resize benchmark");
    group.sample_size(SAMPLE_SIZE);
    for method in METHODS {
        let mut primed = filled(method, &items);
        let mut pad = 0_usize;
        while primed.total_collisions() <= primed.collision_threshold() {
            primed.insert(format!("pad-{pad}"), String::new());
            pad += 1;
        }

        group.bench_function(format!("{method} resize"), |b| {
            b.iter_batched(
                || (primed.clone(), "resize-trigger".to_string()),
                |(mut table, key)| {
                    table.insert(key, String::new());
                    table
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, operation_benches, resize_benches);

criterion_main!(benches);
