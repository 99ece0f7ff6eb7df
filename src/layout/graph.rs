use std::collections::{HashMap, HashSet};

use crate::ir::Edge;

/// Child lists keyed by node id. Node order is first-encounter order over the
/// edge list and child order is edge input order; both drive sibling order in
/// the final layout.
#[derive(Debug, Clone, Default)]
pub struct Adjacency {
    order: Vec<String>,
    children: HashMap<String, Vec<String>>,
    incoming: HashMap<String, usize>,
}

impl Adjacency {
    pub fn from_edges(edges: &[Edge]) -> Self {
        let mut adjacency = Self::default();
        let mut seen: HashSet<(&str, &str)> = HashSet::new();
        for edge in edges {
            adjacency.ensure_node(&edge.source);
            adjacency.ensure_node(&edge.target);
            if !seen.insert((edge.source.as_str(), edge.target.as_str())) {
                continue;
            }
            if let Some(children) = adjacency.children.get_mut(&edge.source) {
                children.push(edge.target.clone());
            }
            *adjacency.incoming.entry(edge.target.clone()).or_insert(0) += 1;
        }
        adjacency
    }

    fn ensure_node(&mut self, id: &str) {
        if self.children.contains_key(id) {
            return;
        }
        self.order.push(id.to_string());
        self.children.insert(id.to_string(), Vec::new());
        self.incoming.insert(id.to_string(), 0);
    }

    /// Nodes without incoming edges, in first-encounter order. When every
    /// node has a parent (pure cycle) the first node seen stands in as root.
    pub fn roots(&self) -> Vec<String> {
        let roots: Vec<String> = self
            .order
            .iter()
            .filter(|id| self.incoming.get(id.as_str()).copied().unwrap_or(0) == 0)
            .cloned()
            .collect();
        if roots.is_empty() {
            return self.order.first().cloned().into_iter().collect();
        }
        roots
    }

    pub fn children(&self, id: &str) -> &[String] {
        self.children.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has_children(&self, id: &str) -> bool {
        !self.children(id).is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.children.contains_key(id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
