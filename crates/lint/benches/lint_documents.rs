//! Benchmarks for linting YAML documents.
//!
//! Run with: cargo bench
//! Results are saved to target/criterion/

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use glob::glob;
use std::fs;
use yamlstyle_lint::{LintConfig, Linter};
use yamlstyle_scanner::tokenize;

/// Load the YAML files of the workspace (CI configs, fixtures).
fn load_documents() -> Vec<(String, String)> {
    let mut documents = Vec::new();

    let patterns = ["**/*.yaml", "**/*.yml", "../../**/*.yaml", "../../**/*.yml"];

    for pattern in patterns {
        for path in glob(pattern).expect("Failed to read glob pattern").flatten() {
            if path.components().any(|c| c.as_os_str() == "target") {
                continue;
            }
            if let Ok(content) = fs::read_to_string(&path) {
                let name = path.display().to_string();
                if !documents.iter().any(|(n, _)| n == &name) {
                    documents.push((name, content));
                }
            }
        }
    }

    documents.sort_by(|a, b| a.0.cmp(&b.0));
    documents
}

/// A synthetic document with nested mappings, sequences and block scalars.
fn generated_document(entries: usize) -> String {
    let mut source = String::from("---\nservices:\n");
    for i in 0..entries {
        source.push_str(&format!(
            "  - name: service-{i}\n    image: &img{i} registry/app:{i}\n    ports: [80, 443]\n    env:\n      - key: MODE\n        value: production\n    command: |\n      run --id {i}\n      --verbose\n    base: *img{i}\n"
        ));
    }
    source
}

fn bench_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan");
    for entries in [10, 100, 1000] {
        let source = generated_document(entries);
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(entries), &source, |b, source| {
            b.iter(|| tokenize(black_box(source)))
        });
    }
    group.finish();
}

fn bench_lint(c: &mut Criterion) {
    let linter = Linter::from_config(&LintConfig::default()).expect("default config is valid");
    let mut group = c.benchmark_group("lint");
    for entries in [10, 100, 1000] {
        let source = generated_document(entries);
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(entries), &source, |b, source| {
            b.iter(|| linter.lint(black_box(source)))
        });
    }
    group.finish();
}

fn bench_lint_workspace_files(c: &mut Criterion) {
    let documents = load_documents();
    if documents.is_empty() {
        eprintln!("No YAML files found, skipping file benchmarks");
        return;
    }
    let linter = Linter::from_config(&LintConfig::default()).expect("default config is valid");
    let total: usize = documents.iter().map(|(_, s)| s.len()).sum();

    let mut group = c.benchmark_group("lint_files");
    group.throughput(Throughput::Bytes(total as u64));
    group.bench_function("all", |b| {
        b.iter(|| {
            for (_, source) in &documents {
                black_box(linter.lint(black_box(source)));
            }
        })
    });
    group.finish();
}

criterion_group!(benches, bench_scan, bench_lint, bench_lint_workspace_files);
criterion_main!(benches);
