mod geometry;
mod graph;
mod highlight;
pub(crate) mod types;
mod visibility;

pub use geometry::{Extent, GeometryPlanner, Plan};
pub use graph::Adjacency;
pub use highlight::{annotate_highlights, matches_search};
pub use types::*;
pub use visibility::{Hidden, hidden_nodes};

use crate::config::LayoutConfig;
use crate::ir::TreeSource;
use crate::session::CollapsedSet;

pub fn compute_layout(
    source: &TreeSource,
    collapsed: &CollapsedSet,
    search: &str,
    config: &LayoutConfig,
) -> TreeLayout {
    let adjacency = Adjacency::from_edges(&source.edges);
    let roots = adjacency.roots();
    let hidden = hidden_nodes(&adjacency, collapsed);
    let plan = GeometryPlanner::new(config).plan(&adjacency, &roots, &hidden, collapsed);

    let mut nodes = plan.nodes;
    for node in &mut nodes {
        node.label = source.label_for(&node.id).to_string();
    }
    annotate_highlights(&mut nodes, search);

    let hidden_count = hidden.len();
    let mut warnings: Vec<LayoutWarning> = Vec::new();
    for warning in hidden.warnings.into_iter().chain(plan.warnings) {
        if !warnings.contains(&warning) {
            warnings.push(warning);
        }
    }

    tracing::debug!(
        nodes = nodes.len(),
        edges = plan.edges.len(),
        roots = roots.len(),
        hidden = hidden_count,
        warnings = warnings.len(),
        "tree layout computed"
    );

    TreeLayout {
        direction: config.direction,
        nodes,
        edges: plan.edges,
        width: plan.width,
        height: plan.height,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Edge;
    use std::collections::{BTreeSet, HashMap};

    fn sample() -> TreeSource {
        TreeSource::from_edges(vec![
            Edge::new("A", "B"),
            Edge::new("A", "C"),
            Edge::new("A", "D"),
            Edge::new("B", "E"),
            Edge::new("B", "F"),
            Edge::new("D", "G"),
        ])
    }

    fn collapsed(ids: &[&str]) -> CollapsedSet {
        ids.iter().map(|id| id.to_string()).collect()
    }

    fn descendants(source: &TreeSource, id: &str) -> BTreeSet<String> {
        let adjacency = Adjacency::from_edges(&source.edges);
        let mut out = BTreeSet::new();
        let mut stack: Vec<&str> = adjacency.children(id).iter().map(String::as_str).collect();
        while let Some(next) = stack.pop() {
            if out.insert(next.to_string()) {
                stack.extend(adjacency.children(next).iter().map(String::as_str));
            }
        }
        out
    }

    #[test]
    fn layout_is_deterministic() {
        let config = LayoutConfig::default();
        let first = compute_layout(&sample(), &collapsed(&["D"]), "b", &config);
        let second = compute_layout(&sample(), &collapsed(&["D"]), "b", &config);
        assert_eq!(first.nodes, second.nodes);
        assert_eq!(first.edges, second.edges);
    }

    #[test]
    fn hidden_nodes_descend_from_a_collapsed_node() {
        let source = sample();
        let set = collapsed(&["B", "D"]);
        let layout = compute_layout(&source, &set, "", &LayoutConfig::default());
        let visible: BTreeSet<String> = layout.nodes.iter().map(|node| node.id.clone()).collect();
        let all: BTreeSet<String> = ["A", "B", "C", "D", "E", "F", "G"]
            .iter()
            .map(|id| id.to_string())
            .collect();
        let under_collapsed: BTreeSet<String> =
            set.iter().flat_map(|id| descendants(&source, id)).collect();
        let hidden: BTreeSet<String> = all.difference(&visible).cloned().collect();
        assert_eq!(hidden, under_collapsed);
    }

    #[test]
    fn edges_only_join_visible_nodes_from_expanded_sources() {
        let set = collapsed(&["B"]);
        let layout = compute_layout(&sample(), &set, "", &LayoutConfig::default());
        for edge in &layout.edges {
            assert!(layout.node(&edge.source).is_some(), "{} not visible", edge.source);
            assert!(layout.node(&edge.target).is_some(), "{} not visible", edge.target);
            assert!(!set.contains(&edge.source));
        }
    }

    #[test]
    fn sibling_subtrees_do_not_overlap() {
        let source = TreeSource::from_edges(vec![
            Edge::new("R", "A"),
            Edge::new("R", "B"),
            Edge::new("R", "C"),
            Edge::new("A", "A1"),
            Edge::new("A", "A2"),
            Edge::new("A2", "A21"),
            Edge::new("A2", "A22"),
            Edge::new("A2", "A23"),
            Edge::new("B", "B1"),
            Edge::new("C", "C1"),
            Edge::new("C", "C2"),
        ]);
        let layout = compute_layout(&source, &CollapsedSet::new(), "", &LayoutConfig::default());
        let by_id: HashMap<&str, &PositionedNode> =
            layout.nodes.iter().map(|node| (node.id.as_str(), node)).collect();
        let interval = |root: &str| {
            let mut ids = descendants(&source, root);
            ids.insert(root.to_string());
            ids.iter().fold((f32::MAX, f32::MIN), |(lo, hi), id| {
                let node = by_id[id.as_str()];
                (lo.min(node.y), hi.max(node.y + node.height))
            })
        };
        for siblings in [vec!["A", "B", "C"], vec!["A1", "A2"], vec!["A21", "A22", "A23"]] {
            for pair in siblings.windows(2) {
                let (_, upper_end) = interval(pair[0]);
                let (lower_start, _) = interval(pair[1]);
                assert!(
                    upper_end <= lower_start + 1e-3,
                    "{} overlaps {}",
                    pair[0],
                    pair[1]
                );
            }
        }
    }

    #[test]
    fn labels_flow_into_highlighting() {
        let mut source = sample();
        source.set_label("C", "Bob");
        let layout = compute_layout(&source, &CollapsedSet::new(), "b", &LayoutConfig::default());
        let flagged: Vec<&str> = layout.highlighted().map(|node| node.id.as_str()).collect();
        assert_eq!(flagged, ["B", "C"]);
        assert_eq!(layout.node("C").map(|node| node.label.as_str()), Some("Bob"));
    }

    #[test]
    fn cycle_warnings_are_reported_once() {
        let source = TreeSource::from_edges(vec![
            Edge::new("A", "B"),
            Edge::new("B", "C"),
            Edge::new("C", "B"),
        ]);
        let layout = compute_layout(&source, &collapsed(&["B"]), "", &LayoutConfig::default());
        assert_eq!(layout.nodes.len(), 2);
        assert_eq!(
            layout.warnings,
            [LayoutWarning::Cycle {
                from: "C".to_string(),
                to: "B".to_string(),
            }]
        );
    }

    #[test]
    fn empty_source_gives_empty_layout() {
        let layout = compute_layout(
            &TreeSource::new(),
            &CollapsedSet::new(),
            "a",
            &LayoutConfig::default(),
        );
        assert!(layout.is_empty());
        assert!(layout.edges.is_empty());
        assert!(layout.warnings.is_empty());
    }
}
