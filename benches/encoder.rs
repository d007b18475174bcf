#[macro_use]
extern crate criterion;

use criterion::{black_box, Criterion};
use dynval::{encoding::iter::DynIter, prelude::*};

fn document() -> Dynamic {
    let rows: Vec<Dynamic> = (0..200)
        .map(|i| {
            Dynamic::object(vec![
                ("id", Dynamic::from(i as i64)),
                ("name", Dynamic::from(format!("row number {}", i))),
                ("score", Dynamic::from(i as f64 / 7.0)),
                ("tags", Dynamic::from(vec!["a", "b", "c"])),
                ("active", Dynamic::from(i % 2 == 0)),
            ])
        })
        .collect();
    Dynamic::object(vec![("rows", Dynamic::Array(rows)), ("total", Dynamic::from(200i64))])
}

fn pack_document(c: &mut Criterion) {
    c.bench_function("pack document", |b| {
        let d = document();
        b.iter(|| pack(black_box(&d)))
    });
}

fn pack_i64(c: &mut Criterion) {
    c.bench_function("pack i64", |b| {
        let d = Dynamic::from(1_000_000i64);
        b.iter(|| pack(black_box(&d)))
    });
}

fn unpack_document(c: &mut Criterion) {
    c.bench_function("unpack document", |b| {
        let packed = pack(&document()).unwrap();
        b.iter(|| unpack(black_box(&packed)))
    });
}

fn iterate_document(c: &mut Criterion) {
    c.bench_function("iterate document", |b| {
        let packed = pack(&document()).unwrap();
        b.iter(|| DynIter::new(black_box(&packed)).unwrap().count())
    });
}

fn parse_document(c: &mut Criterion) {
    c.bench_function("parse document", |b| {
        let text = to_text(&pack(&document()).unwrap()).unwrap();
        b.iter(|| parse(black_box(&text)))
    });
}

fn print_document(c: &mut Criterion) {
    c.bench_function("print document", |b| {
        let packed = pack(&document()).unwrap();
        b.iter(|| to_text(black_box(&packed)))
    });
}

fn parse_document_json(c: &mut Criterion) {
    c.bench_function("parse document serde_json", |b| {
        let text = to_text(&pack(&document()).unwrap()).unwrap();
        b.iter(|| serde_json::from_str::<serde_json::Value>(black_box(&text)))
    });
}

criterion_group!(
    benches,
    pack_document,
    pack_i64,
    unpack_document,
    iterate_document,
    parse_document,
    print_document,
    parse_document_json,
);

criterion_main!(benches);
