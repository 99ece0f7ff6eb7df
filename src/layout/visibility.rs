use std::collections::HashSet;

use super::graph::Adjacency;
use super::types::LayoutWarning;
use crate::session::CollapsedSet;

/// Strict descendants of every collapsed node.
#[derive(Debug, Clone, Default)]
pub struct Hidden {
    nodes: HashSet<String>,
    pub warnings: Vec<LayoutWarning>,
}

impl Hidden {
    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(String::as_str)
    }
}

enum Visit<'a> {
    Enter { node: &'a str, parent: &'a str },
    Exit(&'a str),
}

pub fn hidden_nodes(adjacency: &Adjacency, collapsed: &CollapsedSet) -> Hidden {
    let mut hidden = Hidden::default();
    for id in collapsed {
        if !adjacency.contains(id) {
            continue;
        }
        collect_descendants(adjacency, id, &mut hidden);
    }
    hidden
}

fn collect_descendants<'a>(adjacency: &'a Adjacency, collapsed: &'a str, hidden: &mut Hidden) {
    let mut on_path: HashSet<&str> = HashSet::from([collapsed]);
    let mut visited: HashSet<&str> = HashSet::new();
    let mut stack: Vec<Visit<'a>> = adjacency
        .children(collapsed)
        .iter()
        .rev()
        .map(|child| Visit::Enter {
            node: child.as_str(),
            parent: collapsed,
        })
        .collect();

    while let Some(visit) = stack.pop() {
        match visit {
            Visit::Enter { node, parent } => {
                if on_path.contains(node) {
                    let warning = LayoutWarning::Cycle {
                        from: parent.to_string(),
                        to: node.to_string(),
                    };
                    tracing::warn!(%warning, collapsed, "hidden-set traversal truncated");
                    hidden.warnings.push(warning);
                    continue;
                }
                if !visited.insert(node) {
                    continue;
                }
                hidden.nodes.insert(node.to_string());
                on_path.insert(node);
                stack.push(Visit::Exit(node));
                for child in adjacency.children(node).iter().rev() {
                    stack.push(Visit::Enter {
                        node: child.as_str(),
                        parent: node,
                    });
                }
            }
            Visit::Exit(node) => {
                on_path.remove(node);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Edge;

    fn adjacency(pairs: &[(&str, &str)]) -> Adjacency {
        let edges: Vec<Edge> = pairs.iter().map(|(s, t)| Edge::new(*s, *t)).collect();
        Adjacency::from_edges(&edges)
    }

    fn collapsed(ids: &[&str]) -> CollapsedSet {
        ids.iter().map(|id| id.to_string()).collect()
    }

    fn sorted(hidden: &Hidden) -> Vec<&str> {
        let mut ids: Vec<&str> = hidden.iter().collect();
        ids.sort_unstable();
        ids
    }

    #[test]
    fn nothing_hidden_without_collapsed_nodes() {
        let adjacency = adjacency(&[("A", "B"), ("B", "C")]);
        assert!(hidden_nodes(&adjacency, &CollapsedSet::new()).is_empty());
    }

    #[test]
    fn collapsed_node_hides_descendants_but_not_itself() {
        let adjacency = adjacency(&[("A", "B"), ("B", "C"), ("C", "D"), ("A", "E")]);
        let hidden = hidden_nodes(&adjacency, &collapsed(&["B"]));
        assert_eq!(sorted(&hidden), ["C", "D"]);
        assert!(!hidden.contains("B"));
        assert!(hidden.warnings.is_empty());
    }

    #[test]
    fn nested_collapsed_nodes_terminate() {
        let adjacency = adjacency(&[("A", "B"), ("B", "C"), ("C", "D")]);
        let hidden = hidden_nodes(&adjacency, &collapsed(&["A", "C"]));
        assert_eq!(sorted(&hidden), ["B", "C", "D"]);
    }

    #[test]
    fn unknown_collapsed_ids_are_ignored() {
        let adjacency = adjacency(&[("A", "B")]);
        assert!(hidden_nodes(&adjacency, &collapsed(&["missing"])).is_empty());
    }

    #[test]
    fn cycle_through_collapsed_node_is_truncated() {
        let adjacency = adjacency(&[("A", "B"), ("B", "C"), ("C", "A")]);
        let hidden = hidden_nodes(&adjacency, &collapsed(&["A"]));
        assert_eq!(sorted(&hidden), ["B", "C"]);
        assert_eq!(
            hidden.warnings,
            [LayoutWarning::Cycle {
                from: "C".to_string(),
                to: "A".to_string(),
            }]
        );
    }

    #[test]
    fn shared_descendant_is_not_a_cycle() {
        let adjacency = adjacency(&[("A", "B"), ("A", "C"), ("B", "D"), ("C", "D")]);
        let hidden = hidden_nodes(&adjacency, &collapsed(&["A"]));
        assert_eq!(sorted(&hidden), ["B", "C", "D"]);
        assert!(hidden.warnings.is_empty());
    }
}
