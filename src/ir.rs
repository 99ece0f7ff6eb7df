use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Direction {
    TopDown,
    #[default]
    LeftRight,
}

impl Direction {
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_uppercase().as_str() {
            "TD" | "TB" => Some(Self::TopDown),
            "LR" => Some(Self::LeftRight),
            _ => None,
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::LeftRight)
    }
}

/// A directed parent -> child relation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub source: String,
    pub target: String,
}

impl Edge {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

/// Everything the layout engine reads about a tree: its edges in input order
/// plus optional display labels.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TreeSource {
    pub edges: Vec<Edge>,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
}

impl TreeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_edges(edges: Vec<Edge>) -> Self {
        Self {
            edges,
            labels: BTreeMap::new(),
        }
    }

    pub fn push_edge(&mut self, source: &str, target: &str) {
        self.edges.push(Edge::new(source, target));
    }

    pub fn set_label(&mut self, id: &str, label: &str) {
        self.labels.insert(id.to_string(), label.to_string());
    }

    /// Label for `id`, falling back to the identifier itself.
    pub fn label_for<'a>(&'a self, id: &'a str) -> &'a str {
        self.labels.get(id).map(String::as_str).unwrap_or(id)
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.edges
            .iter()
            .any(|edge| edge.source == id || edge.target == id)
    }
}
