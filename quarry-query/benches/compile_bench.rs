//! Benchmarks for filter compilation.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use quarry_query::{DeepMerge, FieldClassification, FilterCompiler, FilterKey, parse_query_string};
use serde_json::json;
use std::hint::black_box;

const SIMPLE_QUERY: &str = "age__gt=25&name__icontains=jo";

const MIXED_QUERY: &str = "age__gte=18&age__lt=65&name__icontains=jo&tags__in=a,b,c\
&author__profile__city=Oslo&createdAt__lte=2024-06-01&id__or=1,2,3&deletedAt__isNull=true\
&orderBy__createdAt=desc&author%5Bposts%5D%5Bsome%5D%5Btitle%5D%5Bcontains%5D=rust";

fn compiler() -> FilterCompiler {
    FilterCompiler::new().with_classification(
        FieldClassification::builder()
            .numerics(["age", "id"])
            .dates(["createdAt"])
            .booleans(["published"])
            .build(),
    )
}

fn generate_query(keys: usize) -> String {
    (0..keys)
        .map(|i| format!("field{i}__nested{i}__gte={i}"))
        .collect::<Vec<_>>()
        .join("&")
}

fn bench_tokenize(c: &mut Criterion) {
    c.bench_function("tokenize_delimited_key", |b| {
        b.iter(|| black_box(FilterKey::parse(black_box("author__profile__city__icontains"))))
    });
    c.bench_function("tokenize_bracket_key", |b| {
        b.iter(|| black_box(FilterKey::parse(black_box("author[profile][city][icontains]"))))
    });
}

fn bench_compile_fixed(c: &mut Criterion) {
    let compiler = compiler();

    c.bench_function("compile_simple_query", |b| {
        b.iter(|| black_box(compiler.compile_query_string(black_box(SIMPLE_QUERY))))
    });
    c.bench_function("compile_mixed_query", |b| {
        b.iter(|| black_box(compiler.compile_query_string(black_box(MIXED_QUERY))))
    });

    let params = parse_query_string(MIXED_QUERY);
    c.bench_function("compile_decoded_params", |b| {
        b.iter(|| black_box(compiler.compile(black_box(&params))))
    });
}

fn bench_compile_scaling(c: &mut Criterion) {
    let compiler = compiler();
    let mut group = c.benchmark_group("compile_many_keys");

    for keys in [10, 100, 1000] {
        let query = generate_query(keys);
        group.throughput(Throughput::Elements(keys as u64));

        group.bench_with_input(BenchmarkId::from_parameter(keys), &query, |b, query| {
            b.iter(|| black_box(compiler.compile_query_string(query)))
        });
    }

    group.finish();
}

fn bench_json_merge(c: &mut Criterion) {
    let target = json!({"filter": {"age": {"gt": 1}, "tags": ["a"]}, "page": 1});
    let source = json!({"filter": {"age": {"lt": 9}, "tags": ["b"], "name": "x"}, "page": 2});

    c.bench_function("json_deep_merge", |b| {
        b.iter(|| black_box(target.clone().merge(source.clone())))
    });
}

criterion_group!(
    benches,
    bench_tokenize,
    bench_compile_fixed,
    bench_compile_scaling,
    bench_json_merge
);
criterion_main!(benches);
