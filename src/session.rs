use std::collections::BTreeSet;

use crate::config::LayoutConfig;
use crate::ir::TreeSource;
use crate::layout::{Adjacency, TreeLayout, compute_layout};

/// Ids whose subtrees are folded away. Ordered so every snapshot iterates the
/// same way.
pub type CollapsedSet = BTreeSet<String>;

/// Returns `current` with `node_id` flipped.
pub fn toggle_collapse(current: &CollapsedSet, node_id: &str) -> CollapsedSet {
    let mut next = current.clone();
    if !next.remove(node_id) {
        next.insert(node_id.to_string());
    }
    next
}

/// Interactive state around the layout engine: the current tree, which nodes
/// are folded, and the active search query. Each call to [`TreeSession::layout`]
/// hands the engine an immutable snapshot of that state.
#[derive(Debug, Clone, Default)]
pub struct TreeSession {
    source: TreeSource,
    collapsed: CollapsedSet,
    search: String,
    config: LayoutConfig,
}

impl TreeSession {
    pub fn new(source: TreeSource, config: LayoutConfig) -> Self {
        Self {
            source,
            collapsed: CollapsedSet::new(),
            search: String::new(),
            config,
        }
    }

    pub fn source(&self) -> &TreeSource {
        &self.source
    }

    pub fn collapsed(&self) -> &CollapsedSet {
        &self.collapsed
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Flips the collapsed state of `node_id`. Leaves and unknown ids offer no
    /// toggle, so nothing changes and `false` is returned.
    pub fn toggle(&mut self, node_id: &str) -> bool {
        let adjacency = Adjacency::from_edges(&self.source.edges);
        if !adjacency.has_children(node_id) {
            tracing::debug!(node_id, "ignoring toggle on node without children");
            return false;
        }
        self.collapsed = toggle_collapse(&self.collapsed, node_id);
        true
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
    }

    pub fn expand_all(&mut self) {
        self.collapsed.clear();
    }

    /// Swaps in a new tree, keeping folds only for ids that still exist.
    pub fn replace_source(&mut self, source: TreeSource) {
        self.collapsed.retain(|id| source.contains_node(id));
        self.source = source;
    }

    pub fn layout(&self) -> TreeLayout {
        compute_layout(&self.source, &self.collapsed, &self.search, &self.config)
    }
}
