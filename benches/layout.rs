use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use treeflow::config::{LayoutConfig, RenderConfig};
use treeflow::ir::{Edge, TreeSource};
use treeflow::layout::compute_layout;
use treeflow::render::render_svg;
use treeflow::session::{CollapsedSet, toggle_collapse};
use treeflow::theme::Theme;

/// Complete tree with `fanout` children per node, `levels` deep.
fn wide_tree(fanout: usize, levels: usize) -> TreeSource {
    let mut source = TreeSource::new();
    let mut frontier = vec!["N0".to_string()];
    let mut next_id = 1usize;
    for _ in 0..levels {
        let mut next = Vec::with_capacity(frontier.len() * fanout);
        for parent in &frontier {
            for _ in 0..fanout {
                let child = format!("N{next_id}");
                next_id += 1;
                source.push_edge(parent, &child);
                next.push(child);
            }
        }
        frontier = next;
    }
    source
}

/// Single chain `N0 > N1 > ... > N{len}`.
fn deep_chain(len: usize) -> TreeSource {
    TreeSource::from_edges(
        (0..len)
            .map(|i| Edge::new(format!("N{i}"), format!("N{}", i + 1)))
            .collect(),
    )
}

/// `trees` disjoint stars of `leaves` leaves each.
fn forest(trees: usize, leaves: usize) -> TreeSource {
    let mut source = TreeSource::new();
    for t in 0..trees {
        for l in 0..leaves {
            source.push_edge(&format!("T{t}"), &format!("T{t}_{l}"));
        }
    }
    source
}

fn bench_compute_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_layout");
    let config = LayoutConfig::default();
    let open = CollapsedSet::new();
    let inputs = [
        ("wide_4x5", wide_tree(4, 5)),
        ("wide_10x3", wide_tree(10, 3)),
        ("deep_1000", deep_chain(1000)),
        ("deep_5000", deep_chain(5000)),
        ("forest_200x10", forest(200, 10)),
    ];
    for (name, source) in &inputs {
        group.bench_with_input(BenchmarkId::from_parameter(name), source, |b, source| {
            b.iter(|| {
                let layout = compute_layout(black_box(source), &open, "n1", &config);
                black_box(layout.nodes.len());
            });
        });
    }
    group.finish();
}

fn bench_toggle_relayout(c: &mut Criterion) {
    let mut group = c.benchmark_group("toggle_relayout");
    let config = LayoutConfig::default();
    let source = wide_tree(4, 5);
    for id in ["N0", "N1", "N5"] {
        group.bench_with_input(BenchmarkId::from_parameter(id), &source, |b, source| {
            b.iter(|| {
                let collapsed = toggle_collapse(&CollapsedSet::new(), black_box(id));
                let layout = compute_layout(source, &collapsed, "", &config);
                black_box(layout.edges.len());
            });
        });
    }
    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let theme = Theme::classic();
    let render_cfg = RenderConfig::default();
    let layout = compute_layout(
        &wide_tree(4, 5),
        &CollapsedSet::new(),
        "",
        &LayoutConfig::default(),
    );
    c.bench_function("render_svg_wide_4x5", |b| {
        b.iter(|| {
            let svg = render_svg(black_box(&layout), &theme, &render_cfg);
            black_box(svg.len());
        });
    });
}

criterion_group!(
    benches,
    bench_compute_layout,
    bench_toggle_relayout,
    bench_render
);
criterion_main!(benches);
