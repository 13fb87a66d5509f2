use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde::{Deserialize, Serialize};
use sigil_format::{compose_all, from_str, parse_str, to_string, Parser, Tag};

#[derive(Serialize, Deserialize, Clone)]
struct User {
    id: u32,
    name: String,
    email: String,
    active: bool,
}

#[derive(Serialize, Deserialize, Clone)]
struct Document {
    title: String,
    body: String,
    authors: Vec<User>,
}

fn users(count: u32) -> Vec<User> {
    (0..count)
        .map(|i| User {
            id: i,
            name: format!("User{}", i),
            email: format!("user{}@example.com", i),
            active: i % 2 == 0,
        })
        .collect()
}

fn benchmark_parse_array(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_array");
    for size in [10u32, 100, 1000].iter() {
        let text = to_string(&users(*size)).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(size), &text, |b, text| {
            b.iter(|| parse_str(black_box(text)).unwrap())
        });
    }
    group.finish();
}

fn benchmark_serde_round_trip(c: &mut Criterion) {
    let document = Document {
        title: "Release notes".to_string(),
        body: (0..50)
            .map(|i| format!("line {} of the body", i))
            .collect::<Vec<_>>()
            .join("\n"),
        authors: users(5),
    };
    let text = to_string(&document).unwrap();

    c.bench_function("serialize_document", |b| {
        b.iter(|| to_string(black_box(&document)).unwrap())
    });
    c.bench_function("deserialize_document", |b| {
        b.iter(|| from_str::<Document>(black_box(&text)).unwrap())
    });
}

fn benchmark_references(c: &mut Criterion) {
    let mut text = String::from("{Shared payload \"x\"} @s\n");
    for _ in 0..1000 {
        text.push_str("[ #s #s ]\n");
    }
    let values = parse_str(&text).unwrap();

    let mut group = c.benchmark_group("references");
    group.bench_function("parse", |b| b.iter(|| parse_str(black_box(&text)).unwrap()));
    group.bench_function("compose", |b| {
        b.iter(|| compose_all(black_box(&values)).unwrap())
    });
    group.finish();
}

fn benchmark_tagged_search(c: &mut Criterion) {
    let mut text = String::new();
    for i in 0..1000 {
        text.push_str(&format!("={} \"{}\" ", i, i));
    }
    text.push_str("[ =0 ]");

    c.bench_function("skip_to_last_array", |b| {
        b.iter(|| {
            let mut parser = Parser::from_str(black_box(&text));
            parser.parse_next_tagged(&Tag::Array).unwrap()
        })
    });
}

criterion_group!(
    benches,
    benchmark_parse_array,
    benchmark_serde_round_trip,
    benchmark_references,
    benchmark_tagged_search
);
criterion_main!(benches);
