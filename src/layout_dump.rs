use crate::layout::TreeLayout;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Serializable snapshot of a layout. Nodes are keyed by id so a caller can
/// diff two snapshots and animate whatever moved.
#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub direction: String,
    pub width: f32,
    pub height: f32,
    pub nodes: BTreeMap<String, NodeDump>,
    pub edges: Vec<EdgeDump>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct NodeDump {
    pub label: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub depth: usize,
    pub highlighted: bool,
    pub collapsed: bool,
    pub has_children: bool,
}

#[derive(Debug, Serialize)]
pub struct EdgeDump {
    pub id: String,
    pub source: String,
    pub target: String,
    pub points: Vec<[f32; 2]>,
}

impl LayoutDump {
    pub fn from_layout(layout: &TreeLayout) -> Self {
        let nodes = layout
            .nodes
            .iter()
            .map(|node| {
                (
                    node.id.clone(),
                    NodeDump {
                        label: node.label.clone(),
                        x: node.x,
                        y: node.y,
                        width: node.width,
                        height: node.height,
                        depth: node.depth,
                        highlighted: node.is_highlighted,
                        collapsed: node.is_collapsed,
                        has_children: node.has_children,
                    },
                )
            })
            .collect();

        let edges = layout
            .edges
            .iter()
            .map(|edge| EdgeDump {
                id: edge.id.clone(),
                source: edge.source.clone(),
                target: edge.target.clone(),
                points: edge.points.iter().map(|(x, y)| [*x, *y]).collect(),
            })
            .collect();

        LayoutDump {
            direction: format!("{:?}", layout.direction),
            width: layout.width,
            height: layout.height,
            nodes,
            edges,
            warnings: layout.warnings.iter().map(ToString::to_string).collect(),
        }
    }

    /// Ids whose position differs between two snapshots, plus ids present in
    /// only one of them.
    pub fn moved_nodes<'a>(&'a self, previous: &'a LayoutDump) -> Vec<&'a str> {
        let mut moved: Vec<&str> = Vec::new();
        for (id, node) in &self.nodes {
            match previous.nodes.get(id) {
                Some(old) if old.x == node.x && old.y == node.y => {}
                _ => moved.push(id),
            }
        }
        for id in previous.nodes.keys() {
            if !self.nodes.contains_key(id) {
                moved.push(id);
            }
        }
        moved
    }
}

pub fn write_layout_dump(output: Option<&Path>, layout: &TreeLayout) -> anyhow::Result<()> {
    let dump = LayoutDump::from_layout(layout);
    match output {
        Some(path) => {
            let file = std::fs::File::create(path)?;
            let writer = BufWriter::new(file);
            serde_json::to_writer_pretty(writer, &dump)?;
        }
        None => {
            let stdout = io::stdout();
            let mut writer = BufWriter::new(stdout.lock());
            serde_json::to_writer_pretty(&mut writer, &dump)?;
            writeln!(writer)?;
        }
    }
    Ok(())
}
