use crate::config::RenderConfig;
use crate::layout::{PositionedEdge, PositionedNode, TreeLayout};
use crate::theme::Theme;
use anyhow::Result;
use std::path::Path;

const NODE_RADIUS: f32 = 5.0;
const NODE_PADDING: f32 = 10.0;
const INDICATOR_RADIUS: f32 = 8.0;
const INDICATOR_INSET: f32 = 5.0;
const CHAR_WIDTH_RATIO: f32 = 0.6;

pub fn render_svg(layout: &TreeLayout, theme: &Theme, render_cfg: &RenderConfig) -> String {
    let pad = render_cfg.padding;
    let width = (layout.width + pad * 2.0).max(1.0);
    let height = (layout.height + pad * 2.0).max(1.0);
    let horizontal = layout.direction.is_horizontal();
    let mut svg = String::new();

    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width:.2}\" height=\"{height:.2}\" viewBox=\"0 0 {width:.2} {height:.2}\">",
    ));
    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        render_cfg.background
    ));

    svg.push_str("<defs>");
    svg.push_str(&format!(
        "<marker id=\"arrow\" viewBox=\"0 0 10 10\" refX=\"10\" refY=\"5\" markerWidth=\"8\" markerHeight=\"8\" orient=\"auto-start-reverse\"><path d=\"M 0 0 L 10 5 L 0 10 z\" fill=\"{}\"/></marker>",
        theme.line_color
    ));
    svg.push_str(&format!(
        "<filter id=\"glow\" x=\"-20%\" y=\"-40%\" width=\"140%\" height=\"180%\"><feDropShadow dx=\"0\" dy=\"0\" stdDeviation=\"4\" flood-color=\"{}\"/></filter>",
        theme.highlight_glow
    ));
    svg.push_str("</defs>");

    svg.push_str(&format!("<g transform=\"translate({pad:.2} {pad:.2})\">"));
    for edge in &layout.edges {
        svg.push_str(&edge_svg(edge, theme, horizontal));
    }
    for node in &layout.nodes {
        svg.push_str(&node_svg(node, theme));
    }
    svg.push_str("</g>");

    svg.push_str("</svg>");
    svg
}

fn edge_svg(edge: &PositionedEdge, theme: &Theme, horizontal: bool) -> String {
    format!(
        "<path data-edge=\"{}\" d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"1.4\" marker-end=\"url(#arrow)\"/>",
        escape_xml(&edge.id),
        step_path(&edge.points, horizontal),
        theme.line_color
    )
}

fn node_svg(node: &PositionedNode, theme: &Theme) -> String {
    let (fill, text_color, weight) = if node.is_highlighted {
        (&theme.highlight_fill, &theme.highlight_text, "bold")
    } else {
        (&theme.node_fill, &theme.node_text, "normal")
    };
    let filter = if node.is_highlighted {
        " filter=\"url(#glow)\""
    } else {
        ""
    };
    let mut out = format!("<g data-node=\"{}\">", escape_xml(&node.id));
    out.push_str(&format!(
        "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"{NODE_RADIUS}\" ry=\"{NODE_RADIUS}\" fill=\"{fill}\" stroke=\"{}\" stroke-width=\"1\"{filter}/>",
        node.x, node.y, node.width, node.height, theme.node_border
    ));

    let (cx, cy) = node.center();
    let reserved = if node.has_children {
        (INDICATOR_RADIUS + INDICATOR_INSET) * 2.0
    } else {
        0.0
    };
    let text = fit_label(&node.label, node.width - NODE_PADDING * 2.0 - reserved, theme.font_size);
    out.push_str(&format!(
        "<text x=\"{cx:.2}\" y=\"{:.2}\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"{}\" font-weight=\"{weight}\" fill=\"{text_color}\">{}</text>",
        cy + theme.font_size * 0.35,
        escape_xml(&theme.font_family),
        theme.font_size,
        escape_xml(&text)
    ));

    if node.has_children {
        out.push_str(&indicator_svg(node, theme));
    }
    out.push_str("</g>");
    out
}

/// Expand/collapse affordance: `+` while folded, `-` while open.
fn indicator_svg(node: &PositionedNode, theme: &Theme) -> String {
    let cx = node.x + node.width - INDICATOR_INSET - INDICATOR_RADIUS;
    let cy = node.y + node.height / 2.0;
    let arm = INDICATOR_RADIUS * 0.5;
    let mut out = format!(
        "<circle cx=\"{cx:.2}\" cy=\"{cy:.2}\" r=\"{INDICATOR_RADIUS}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"1\"/>",
        theme.indicator_fill, theme.indicator_border
    );
    let mut d = format!(
        "M {:.2} {cy:.2} L {:.2} {cy:.2}",
        cx - arm,
        cx + arm
    );
    if node.is_collapsed {
        d.push_str(&format!(" M {cx:.2} {:.2} L {cx:.2} {:.2}", cy - arm, cy + arm));
    }
    out.push_str(&format!(
        "<path d=\"{d}\" stroke=\"{}\" stroke-width=\"1.5\" stroke-linecap=\"round\"/>",
        theme.indicator_glyph
    ));
    out
}

/// Orthogonal connector: leave along the depth axis, turn halfway, arrive
/// along the depth axis.
fn step_path(points: &[(f32, f32)], horizontal: bool) -> String {
    let (Some(&(x1, y1)), Some(&(x2, y2))) = (points.first(), points.last()) else {
        return String::new();
    };
    if horizontal {
        let mid = (x1 + x2) / 2.0;
        format!("M {x1:.2} {y1:.2} L {mid:.2} {y1:.2} L {mid:.2} {y2:.2} L {x2:.2} {y2:.2}")
    } else {
        let mid = (y1 + y2) / 2.0;
        format!("M {x1:.2} {y1:.2} L {x1:.2} {mid:.2} L {x2:.2} {mid:.2} L {x2:.2} {y2:.2}")
    }
}

/// Shortens `label` with an ellipsis so it fits `max_width` at `font_size`.
fn fit_label(label: &str, max_width: f32, font_size: f32) -> String {
    let char_width = (font_size * CHAR_WIDTH_RATIO).max(1.0);
    let max_chars = (max_width / char_width).floor().max(1.0) as usize;
    let count = label.chars().count();
    if count <= max_chars {
        return label.to_string();
    }
    let keep = max_chars.saturating_sub(1).max(1);
    let mut out: String = label.chars().take(keep).collect();
    out.push('…');
    out
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(
    svg: &str,
    output: &Path,
    render_cfg: &RenderConfig,
    theme: &Theme,
) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.font_family = primary_font(&theme.font_family);
    opt.default_size = usvg::Size::from_wh(render_cfg.width, render_cfg.height)
        .ok_or_else(|| anyhow::anyhow!("invalid render size"))?;

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

#[cfg(feature = "png")]
fn primary_font(families: &str) -> String {
    families
        .split(',')
        .next()
        .map(|family| family.trim().trim_matches('"').to_string())
        .unwrap_or_default()
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::ir::{Edge, TreeSource};
    use crate::layout::compute_layout;
    use crate::session::CollapsedSet;

    fn render(search: &str, collapsed: &[&str]) -> String {
        let mut source = TreeSource::from_edges(vec![
            Edge::new("A", "B"),
            Edge::new("A", "C"),
            Edge::new("B", "D"),
        ]);
        source.set_label("A", "R&D");
        let collapsed: CollapsedSet = collapsed.iter().map(|id| id.to_string()).collect();
        let layout = compute_layout(&source, &collapsed, search, &LayoutConfig::default());
        render_svg(&layout, &Theme::classic(), &RenderConfig::default())
    }

    #[test]
    fn render_svg_basic() {
        let svg = render("", &[]);
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains(">R&amp;D</text>"));
        assert_eq!(svg.matches("data-edge=").count(), 3);
        assert_eq!(svg.matches("data-node=").count(), 4);
    }

    #[test]
    fn highlighted_nodes_use_highlight_palette() {
        let theme = Theme::classic();
        let svg = render("c", &[]);
        assert!(svg.contains(&format!("fill=\"{}\"", theme.highlight_fill)));
        assert!(svg.contains("font-weight=\"bold\""));
        let plain = render("", &[]);
        assert!(!plain.contains("filter=\"url(#glow)\""));
    }

    #[test]
    fn indicators_only_on_nodes_with_children() {
        let svg = render("", &["B"]);
        assert_eq!(svg.matches("<circle").count(), 2);
    }

    #[test]
    fn step_path_turns_halfway() {
        assert_eq!(
            step_path(&[(0.0, 0.0), (10.0, 20.0)], true),
            "M 0.00 0.00 L 5.00 0.00 L 5.00 20.00 L 10.00 20.00"
        );
        assert!(step_path(&[], true).is_empty());
    }

    #[test]
    fn long_labels_are_shortened() {
        assert_eq!(fit_label("short", 100.0, 10.0), "short");
        let fitted = fit_label("a very long label indeed", 60.0, 10.0);
        assert_eq!(fitted.chars().count(), 10);
        assert!(fitted.ends_with('…'));
    }
}
