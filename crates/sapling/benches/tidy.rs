use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use sapling::{NodeSize, Tree, default_separation, layout};
use std::hint::black_box;

/// Wide, shallow trees with fan-out between 1 and 6, roughly the shape of a mentorship lineage.
fn lineage_like(size: usize) -> Tree {
    let mut tree = Tree::new();
    let mut state: u64 = 0x9e37_79b9_7f4a_7c15;
    let mut frontier = vec![0usize];
    while tree.len() < size {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        let pick = (state >> 33) as usize;
        let parent = frontier[pick % frontier.len()];
        for _ in 0..(1 + pick % 6) {
            if tree.len() >= size {
                break;
            }
            frontier.push(tree.add_child(parent));
        }
    }
    tree
}

fn bench_tidy(c: &mut Criterion) {
    let size = NodeSize {
        width: 150.0,
        height: 76.0,
    };
    let mut group = c.benchmark_group("tidy_layout");
    for n in [100usize, 1_000, 10_000] {
        let tree = lineage_like(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &tree, |b, tree| {
            b.iter(|| layout(black_box(tree), size, |a, b| default_separation(tree, a, b)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_tidy);
criterion_main!(benches);
