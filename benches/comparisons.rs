#[macro_use]
extern crate criterion;

use criterion::{black_box, Criterion};
use dynval::{
    algebra::{compare::compare, contains::contains, hash::hash},
    prelude::*,
};

fn packed(text: &str) -> Vec<u8> { pack(&parse(text).unwrap()).unwrap() }

fn wide_object(n: usize, last: i64) -> Vec<u8> {
    let mut pairs: Vec<(String, Dynamic)> = (0..n).map(|i| (format!("key{}", i), Dynamic::from(i as i64))).collect();
    pairs.push(("tail".to_string(), Dynamic::from(last)));
    pack(&Dynamic::object(pairs)).unwrap()
}

fn compare_objects(c: &mut Criterion) {
    c.bench_function("compare wide objects", |b| {
        let (x, y) = (wide_object(500, 1), wide_object(500, 2));
        b.iter(|| compare(black_box(&x), black_box(&y)))
    });
}

fn compare_numbers(c: &mut Criterion) {
    c.bench_function("compare integer with numeric", |b| {
        let (x, y) = (packed("12345"), packed(r#""12345.000"::numeric"#));
        b.iter(|| compare(black_box(&x), black_box(&y)))
    });
}

fn contains_member(c: &mut Criterion) {
    c.bench_function("contains one member", |b| {
        let (x, y) = (wide_object(500, 1), packed(r#"{"key250": 250}"#));
        b.iter(|| contains(black_box(&x), black_box(&y)))
    });
}

fn contains_elements(c: &mut Criterion) {
    c.bench_function("contains array elements", |b| {
        let text = format!("[{}]", (0..500).map(|i| i.to_string()).collect::<Vec<_>>().join(", "));
        let (x, y) = (packed(&text), packed("[499, 0, 250]"));
        b.iter(|| contains(black_box(&x), black_box(&y)))
    });
}

fn hash_object(c: &mut Criterion) {
    c.bench_function("hash wide object", |b| {
        let x = wide_object(500, 1);
        b.iter(|| hash(black_box(&x)))
    });
}

criterion_group!(benches, compare_objects, compare_numbers, contains_member, contains_elements, hash_object);

criterion_main!(benches);
