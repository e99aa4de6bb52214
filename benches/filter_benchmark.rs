//! Filter evaluation benchmarks.
//!
//! Benchmarks:
//! - Compile once, evaluate per row vs. one-shot evaluation per row
//! - Parallel row evaluation
//! - REGEX with a constant pattern

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ruzu_sparql::types::term::{self, XSD_INTEGER};
use ruzu_sparql::{Bindings, Expression, FilterEvaluator};

/// FILTER(?age > 30 && STRSTARTS(?name, "P"))
fn sample_filter() -> Expression {
    Expression::operation(
        "&&",
        vec![
            Expression::operation(
                ">",
                vec![
                    Expression::variable("?age"),
                    Expression::constant(term::typed_literal("30", XSD_INTEGER)),
                ],
            ),
            Expression::operation(
                "strstarts",
                vec![Expression::variable("?name"), Expression::constant("\"P\"")],
            ),
        ],
    )
}

fn sample_rows(n: usize) -> Vec<Bindings> {
    (0..n)
        .map(|i| {
            let mut row = Bindings::new();
            row.insert(
                "?age".into(),
                term::typed_literal(&(20 + i % 60).to_string(), XSD_INTEGER),
            );
            row.insert("?name".into(), format!("\"Person{i}\""));
            row
        })
        .collect()
}

fn bench_compile_once_vs_one_shot(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter_compile_reuse");
    let evaluator = FilterEvaluator::default();
    let expr = sample_filter();

    for size in [100, 1000, 10000].iter() {
        let rows = sample_rows(*size);
        group.throughput(Throughput::Elements(*size as u64));

        group.bench_with_input(BenchmarkId::new("compiled", size), &rows, |b, rows| {
            let compiled = evaluator.compile(&expr).unwrap();
            b.iter(|| {
                rows.iter()
                    .filter(|row| compiled.evaluate_ebv(row).unwrap())
                    .count()
            });
        });

        group.bench_with_input(BenchmarkId::new("one_shot", size), &rows, |b, rows| {
            b.iter(|| {
                rows.iter()
                    .filter(|row| {
                        let out = evaluator.evaluate(black_box(&expr), row).unwrap();
                        term::effective_boolean_value(&out)
                    })
                    .count()
            });
        });
    }
    group.finish();
}

fn bench_parallel_rows(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter_parallel");
    let compiled = FilterEvaluator::default().compile(&sample_filter()).unwrap();

    for size in [1000, 100_000].iter() {
        let rows = sample_rows(*size);
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::new("evaluate_all", size), &rows, |b, rows| {
            b.iter(|| compiled.evaluate_all(black_box(rows)).len());
        });
    }
    group.finish();
}

fn bench_regex(c: &mut Criterion) {
    let expr = Expression::operation(
        "regex",
        vec![Expression::variable("?name"), Expression::constant("\"^Person[0-9]*7$\"")],
    );
    let compiled = FilterEvaluator::default().compile(&expr).unwrap();
    let rows = sample_rows(1000);

    c.bench_function("filter_regex_1000", |b| {
        b.iter(|| {
            rows.iter()
                .filter(|row| compiled.evaluate_ebv(row).unwrap())
                .count()
        });
    });
}

criterion_group!(
    benches,
    bench_compile_once_vs_one_shot,
    bench_parallel_rows,
    bench_regex,
);
criterion_main!(benches);
