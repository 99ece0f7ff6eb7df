use serde::Serialize;
use thiserror::Error;

use crate::ir::Direction;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionedNode {
    pub id: String,
    pub label: String,
    /// Top-left corner of the node box.
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub depth: usize,
    pub is_highlighted: bool,
    pub is_collapsed: bool,
    pub has_children: bool,
}

impl PositionedNode {
    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionedEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub points: Vec<(f32, f32)>,
}

/// Non-fatal structural problems found while laying out the input.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LayoutWarning {
    #[error("cycle detected: edge {from} -> {to} leads back onto the current path; branch truncated")]
    Cycle { from: String, to: String },
    #[error("node {id} is not reachable from any root; laid out as a separate tree")]
    Unreachable { id: String },
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct TreeLayout {
    pub direction: Direction,
    pub nodes: Vec<PositionedNode>,
    pub edges: Vec<PositionedEdge>,
    pub width: f32,
    pub height: f32,
    pub warnings: Vec<LayoutWarning>,
}

impl TreeLayout {
    pub fn node(&self, id: &str) -> Option<&PositionedNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn edge(&self, source: &str, target: &str) -> Option<&PositionedEdge> {
        self.edges
            .iter()
            .find(|edge| edge.source == source && edge.target == target)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn highlighted(&self) -> impl Iterator<Item = &PositionedNode> {
        self.nodes.iter().filter(|node| node.is_highlighted)
    }
}
