//! Lookup cost for cached and freshly created parallel objects

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use verse_core::prelude::*;
use verse_test_utils::assistant_verse;

fn bench_hit(c: &mut Criterion) {
    let verse = assistant_verse();
    let original = Obj::new(10_i64);
    original.bridge_to(&verse).unwrap();

    c.bench_function("lookup_hit", |b| {
        b.iter(|| black_box(original.bridge_to(&verse).unwrap()));
    });
}

fn bench_miss(c: &mut Criterion) {
    let verse = assistant_verse();

    c.bench_function("lookup_miss", |b| {
        b.iter(|| {
            let original = Obj::new(black_box(10_i64));
            black_box(original.bridge_to(&verse).unwrap())
        });
    });
}

criterion_group!(benches, bench_hit, bench_miss);
criterion_main!(benches);
