use super::types::PositionedNode;

/// Case-insensitive substring match against label or id. An empty query
/// matches nothing.
pub fn matches_search(id: &str, label: &str, search: &str) -> bool {
    if search.is_empty() {
        return false;
    }
    let needle = search.to_lowercase();
    label.to_lowercase().contains(&needle) || id.to_lowercase().contains(&needle)
}

pub fn annotate_highlights(nodes: &mut [PositionedNode], search: &str) {
    for node in nodes {
        node.is_highlighted = matches_search(&node.id, &node.label, search);
    }
}
