// Traversal throughput on perfect binary trees of growing depth.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

use std::hint::black_box;

use arbor_graph::{CountingListener, Dag, EdgeData, GraphBuilder, GraphResult};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};

fn binary_tree(depth: u32) -> GraphResult<Dag> {
    let mut builder = GraphBuilder::new();
    let root = builder.add_node((0, 0, 0));
    let mut frontier = vec![root];
    for generation in 1..=depth {
        let mut next = Vec::with_capacity(frontier.len() * 2);
        for (index, parent) in frontier.iter().copied().enumerate() {
            for side in 0..2 {
                let y = i64::try_from(index * 2 + side).unwrap_or_default();
                let child = builder.add_node((i64::from(generation), y, 0));
                builder.connect_with(
                    parent,
                    child,
                    EdgeData {
                        generation,
                        ..EdgeData::default()
                    },
                )?;
                next.push(child);
            }
        }
        frontier = next;
    }
    builder.build(root)
}

fn bench_traversal(c: &mut Criterion) {
    let mut group = c.benchmark_group("traverse_from_root");
    for depth in [6_u32, 10, 14] {
        let Ok(dag) = binary_tree(depth) else {
            continue;
        };
        group.throughput(Throughput::Elements(dag.edge_count() as u64));

        group.bench_with_input(BenchmarkId::new("counting", depth), &dag, |b, dag| {
            b.iter(|| {
                let mut counter = CountingListener::new();
                dag.traverse_from_root(&mut counter);
                black_box(counter.total())
            });
        });

        group.bench_with_input(BenchmarkId::new("buckets_cold", depth), &dag, |b, dag| {
            b.iter(|| {
                let fresh = dag.clone();
                black_box(fresh.get_number_of_full_levels())
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_traversal);
criterion_main!(benches);
