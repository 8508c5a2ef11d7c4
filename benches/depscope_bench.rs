// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Benchmark suite for graph construction, cycle detection and source scanning

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use depscope::cycles::detect_cycles;
use depscope::graph::DependencyGraph;
use depscope::scanner::scan_source;
use depscope::types::{LockEntry, LockedPackages};

/// Locked packages where each one requires the next few, closing one loop at the end
fn generate_lock(num_packages: usize) -> LockedPackages {
    let name = |i: usize| format!("vendor{}/pkg{}", i % 50, i);
    let production = (0..num_packages)
        .map(|i| {
            (1..=3)
                .map(|step| (i + step) % num_packages)
                .fold(LockEntry::new(&name(i), "1.0.0"), |e, j| e.requiring(&name(j)))
                .requiring("php")
        })
        .collect();

    LockedPackages {
        production,
        development: vec![],
    }
}

fn generate_source(num_imports: usize) -> String {
    let mut src = String::from("<?php\n\nnamespace Acme\\Bench\\Service;\n\n");
    for i in 0..num_imports {
        src.push_str(&format!("use Acme\\Bench\\Model\\Entity{i};\n"));
    }
    src.push_str("\n/** Service docs */\nabstract class Service implements Contract\n{\n");
    for i in 0..num_imports {
        src.push_str(&format!("    // step {i}\n    public function run{i}(): void {{}}\n"));
    }
    src.push_str("}\n");
    src
}

fn bench_graph_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("graph_build");

    for size in [100, 1_000, 10_000].iter() {
        let lock = generate_lock(*size);
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &lock, |b, lock| {
            b.iter(|| black_box(DependencyGraph::from_locked(lock)));
        });
    }

    group.finish();
}

fn bench_cycle_detection(c: &mut Criterion) {
    let mut group = c.benchmark_group("detect_cycles");

    for size in [100, 1_000, 10_000].iter() {
        let graph = DependencyGraph::from_locked(&generate_lock(*size));
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &graph, |b, graph| {
            b.iter(|| black_box(detect_cycles(graph)));
        });
    }

    group.finish();
}

fn bench_scan_source(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan_source");

    for size in [10, 100, 1_000].iter() {
        let src = generate_source(*size);
        group.throughput(Throughput::Bytes(src.len() as u64));
        group.bench_with_input(BenchmarkId::new("lenient", size), &src, |b, src| {
            b.iter(|| black_box(scan_source(src, false)));
        });
        group.bench_with_input(BenchmarkId::new("strip_comments", size), &src, |b, src| {
            b.iter(|| black_box(scan_source(src, true)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_graph_build, bench_cycle_detection, bench_scan_source);

criterion_main!(benches);
