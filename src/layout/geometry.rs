//! Tree placement.
//!
//! The planner first walks the visible forest once from the roots to fix a
//! spanning tree (pre-order, depth per node, tree children per node). It then
//! sizes every subtree bottom-up and places nodes top-down, centering each
//! group of siblings on its parent along the spread axis.

use std::collections::{HashMap, HashSet};

use super::graph::Adjacency;
use super::types::{LayoutWarning, PositionedEdge, PositionedNode};
use super::visibility::Hidden;
use crate::config::LayoutConfig;
use crate::session::CollapsedSet;

/// Spread-axis demand of a visible subtree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    /// Number of leaf slots the subtree occupies.
    pub weight: usize,
    /// Length along the spread axis, including sibling gaps.
    pub span: f32,
}

#[derive(Debug, Clone, Default)]
pub struct Plan {
    pub nodes: Vec<PositionedNode>,
    pub edges: Vec<PositionedEdge>,
    pub warnings: Vec<LayoutWarning>,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Default)]
struct Forest<'a> {
    order: Vec<(&'a str, usize)>,
    tree_roots: Vec<&'a str>,
    tree_children: HashMap<&'a str, Vec<&'a str>>,
    placed: HashSet<&'a str>,
    warnings: Vec<LayoutWarning>,
}

enum Visit<'a> {
    Enter {
        node: &'a str,
        parent: Option<&'a str>,
        depth: usize,
    },
    Exit(&'a str),
}

#[derive(Debug, Clone, Copy)]
pub struct GeometryPlanner<'c> {
    config: &'c LayoutConfig,
}

impl<'c> GeometryPlanner<'c> {
    pub fn new(config: &'c LayoutConfig) -> Self {
        Self { config }
    }

    pub fn plan(
        &self,
        adjacency: &Adjacency,
        roots: &[String],
        hidden: &Hidden,
        collapsed: &CollapsedSet,
    ) -> Plan {
        let forest = build_forest(adjacency, roots, hidden, collapsed);
        let extents = self.measure(&forest);
        let centers = self.place(&forest, &extents);

        let horizontal = self.config.direction.is_horizontal();
        let (node_width, node_height) = (self.config.node_width, self.config.node_height);
        let mut nodes = Vec::with_capacity(forest.order.len());
        for &(id, depth) in &forest.order {
            let spread = centers.get(id).copied().unwrap_or(0.0);
            let along = depth as f32 * self.config.level_gap;
            let (x, y) = if horizontal {
                (along, spread - node_height / 2.0)
            } else {
                (spread - node_width / 2.0, along)
            };
            let has_children = adjacency.has_children(id);
            nodes.push(PositionedNode {
                id: id.to_string(),
                label: id.to_string(),
                x,
                y,
                width: node_width,
                height: node_height,
                depth,
                is_highlighted: false,
                is_collapsed: has_children && collapsed.contains(id),
                has_children,
            });
        }

        let edges = emit_edges(adjacency, &forest, collapsed, &nodes, horizontal);

        let mut width = 0.0f32;
        let mut height = 0.0f32;
        for node in &nodes {
            width = width.max(node.x + node.width);
            height = height.max(node.y + node.height);
        }

        Plan {
            nodes,
            edges,
            warnings: forest.warnings,
            width,
            height,
        }
    }

    /// Per-node spread demand, bottom-up over the spanning forest.
    pub fn extents(
        &self,
        adjacency: &Adjacency,
        roots: &[String],
        hidden: &Hidden,
        collapsed: &CollapsedSet,
    ) -> HashMap<String, Extent> {
        let forest = build_forest(adjacency, roots, hidden, collapsed);
        self.measure(&forest)
            .into_iter()
            .map(|(id, extent)| (id.to_string(), extent))
            .collect()
    }

    fn footprint(&self) -> f32 {
        if self.config.direction.is_horizontal() {
            self.config.node_height
        } else {
            self.config.node_width
        }
    }

    fn measure<'a>(&self, forest: &Forest<'a>) -> HashMap<&'a str, Extent> {
        let footprint = self.footprint();
        let mut extents: HashMap<&'a str, Extent> = HashMap::with_capacity(forest.order.len());
        // Reverse pre-order visits every child before its parent.
        for &(id, _) in forest.order.iter().rev() {
            let children = forest
                .tree_children
                .get(id)
                .map(Vec::as_slice)
                .unwrap_or(&[]);
            if children.is_empty() {
                extents.insert(
                    id,
                    Extent {
                        weight: 1,
                        span: footprint,
                    },
                );
                continue;
            }
            let mut weight = 0usize;
            let mut span = 0.0f32;
            for child in children {
                if let Some(extent) = extents.get(child) {
                    weight += extent.weight;
                    span += extent.span;
                }
            }
            span += self.config.node_gap * (children.len() as f32 - 1.0);
            extents.insert(
                id,
                Extent {
                    weight: weight.max(1),
                    span: span.max(footprint),
                },
            );
        }
        extents
    }

    fn place<'a>(
        &self,
        forest: &Forest<'a>,
        extents: &HashMap<&'a str, Extent>,
    ) -> HashMap<&'a str, f32> {
        let mut centers: HashMap<&'a str, f32> = HashMap::with_capacity(forest.order.len());
        let mut offset = 0.0f32;
        for &root in &forest.tree_roots {
            let span = extents.get(root).map(|e| e.span).unwrap_or(0.0);
            centers.insert(root, offset + span / 2.0);
            offset += span + self.config.tree_gap;
        }

        // Pre-order guarantees a parent is centered before its children.
        for &(id, _) in &forest.order {
            let Some(children) = forest.tree_children.get(id) else {
                continue;
            };
            if children.is_empty() {
                continue;
            }
            let center = centers.get(id).copied().unwrap_or(0.0);
            let mut total = 0.0f32;
            for child in children {
                total += extents.get(child).map(|e| e.span).unwrap_or(0.0);
            }
            total += self.config.node_gap * (children.len() as f32 - 1.0);
            let mut cursor = center - total / 2.0;
            for &child in children {
                let span = extents.get(child).map(|e| e.span).unwrap_or(0.0);
                centers.insert(child, cursor + span / 2.0);
                cursor += span + self.config.node_gap;
            }
        }
        centers
    }
}

fn build_forest<'a>(
    adjacency: &'a Adjacency,
    roots: &'a [String],
    hidden: &Hidden,
    collapsed: &CollapsedSet,
) -> Forest<'a> {
    let mut forest = Forest::default();
    for root in roots {
        if hidden.contains(root) || forest.placed.contains(root.as_str()) {
            continue;
        }
        walk_tree(adjacency, root, hidden, collapsed, &mut forest);
    }
    // Cycles with no entry point never show up as roots.
    let stragglers: Vec<&'a str> = adjacency
        .nodes()
        .filter(|id| !hidden.contains(id))
        .collect();
    for id in stragglers {
        if forest.placed.contains(id) {
            continue;
        }
        let warning = LayoutWarning::Unreachable { id: id.to_string() };
        tracing::warn!(%warning, "laying out unreachable component");
        forest.warnings.push(warning);
        walk_tree(adjacency, id, hidden, collapsed, &mut forest);
    }
    forest
}

fn walk_tree<'a>(
    adjacency: &'a Adjacency,
    root: &'a str,
    hidden: &Hidden,
    collapsed: &CollapsedSet,
    forest: &mut Forest<'a>,
) {
    forest.tree_roots.push(root);
    let mut on_path: HashSet<&'a str> = HashSet::new();
    let mut stack = vec![Visit::Enter {
        node: root,
        parent: None,
        depth: 0,
    }];
    while let Some(visit) = stack.pop() {
        match visit {
            Visit::Enter {
                node,
                parent,
                depth,
            } => {
                if on_path.contains(node) {
                    let warning = LayoutWarning::Cycle {
                        from: parent.unwrap_or(node).to_string(),
                        to: node.to_string(),
                    };
                    tracing::warn!(%warning, "placement descent truncated");
                    forest.warnings.push(warning);
                    continue;
                }
                if !forest.placed.insert(node) {
                    // Second parent of a shared node; first placement wins.
                    continue;
                }
                on_path.insert(node);
                forest.order.push((node, depth));
                forest.tree_children.entry(node).or_default();
                if let Some(parent) = parent {
                    forest.tree_children.entry(parent).or_default().push(node);
                }
                stack.push(Visit::Exit(node));
                if collapsed.contains(node) {
                    continue;
                }
                for child in adjacency.children(node).iter().rev() {
                    if hidden.contains(child) {
                        continue;
                    }
                    stack.push(Visit::Enter {
                        node: child.as_str(),
                        parent: Some(node),
                        depth: depth + 1,
                    });
                }
            }
            Visit::Exit(node) => {
                on_path.remove(node);
            }
        }
    }
}

fn emit_edges(
    adjacency: &Adjacency,
    forest: &Forest<'_>,
    collapsed: &CollapsedSet,
    nodes: &[PositionedNode],
    horizontal: bool,
) -> Vec<PositionedEdge> {
    let index: HashMap<&str, usize> = nodes
        .iter()
        .enumerate()
        .map(|(idx, node)| (node.id.as_str(), idx))
        .collect();
    let mut edges = Vec::new();
    for &(id, _) in &forest.order {
        if collapsed.contains(id) {
            continue;
        }
        let Some(&from_idx) = index.get(id) else {
            continue;
        };
        for child in adjacency.children(id) {
            let Some(&to_idx) = index.get(child.as_str()) else {
                continue;
            };
            let from = &nodes[from_idx];
            let to = &nodes[to_idx];
            edges.push(PositionedEdge {
                id: format!("{}-{}", from.id, to.id),
                source: from.id.clone(),
                target: to.id.clone(),
                points: vec![exit_anchor(from, horizontal), entry_anchor(to, horizontal)],
            });
        }
    }
    edges
}

fn exit_anchor(node: &PositionedNode, horizontal: bool) -> (f32, f32) {
    let (cx, cy) = node.center();
    if horizontal {
        (node.x + node.width, cy)
    } else {
        (cx, node.y + node.height)
    }
}

fn entry_anchor(node: &PositionedNode, horizontal: bool) -> (f32, f32) {
    let (cx, cy) = node.center();
    if horizontal { (node.x, cy) } else { (cx, node.y) }
}
