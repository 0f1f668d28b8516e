//! # Sheet Benchmarks
//!
//! Performance benchmarks for the stowage-core sheet pipeline.
//!
//! Run with: `cargo bench -p stowage-core`

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use stowage_core::{
    ActorKind, Character, ConditionSet, Item, ItemKind, Sheet, Weight, aggregate, classify, sync,
};

/// A character carrying `size` items of mixed kinds.
fn loaded_character(size: usize) -> Character {
    let mut character = Character::new("bench", "Bench", ActorKind::Character).with_strength(5);
    for i in 0..size {
        let id = format!("i{}", i);
        let item = match i % 5 {
            0 => Item::weapon(id, "Pulse Rifle", "Rifle", Weight::from_units(1), 95, 1),
            1 => Item::armor(id, "M3 Armor", Weight::from_units(1)),
            2 => Item::gear(id, "Flare", Weight::from_hundredths(50), 3),
            3 => Item::talent(id, "Pack Mule"),
            _ => Item::new(id, "Scrounger", ItemKind::Specialty),
        };
        character.items.push(item.with_sort((size - i) as i64));
    }
    character
}

// =============================================================================
// BENCHMARKS
// =============================================================================

fn bench_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("classify");

    for size in [10, 100, 1000].iter() {
        let character = loaded_character(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| black_box(classify(&character.items).inventory.len()));
        });
    }

    group.finish();
}

fn bench_aggregate(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate");

    for size in [10, 100, 1000].iter() {
        let character = loaded_character(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| black_box(aggregate(&character.items).total));
        });
    }

    group.finish();
}

fn bench_prepare(c: &mut Criterion) {
    let mut group = c.benchmark_group("prepare_and_sync");
    let sheet = Sheet::default();

    for size in [10, 100, 1000].iter() {
        let character = loaded_character(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let view = sheet.prepare(&character);
                let mut conditions = ConditionSet::new();
                if let Some(enc) = view.encumbrance {
                    let _ = sync(&mut conditions, &enc);
                }
                black_box(view)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_classify, bench_aggregate, bench_prepare);
criterion_main!(benches);
