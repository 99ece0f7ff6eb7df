#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod parser;
pub mod render;
pub mod session;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutConfig, RenderConfig};
pub use ir::{Direction, Edge, TreeSource};
pub use layout::{
    LayoutWarning, PositionedEdge, PositionedNode, TreeLayout, compute_layout,
};
pub use parser::{ParseError, parse_tree};
pub use render::render_svg;
pub use session::{CollapsedSet, TreeSession, toggle_collapse};
pub use theme::Theme;

/// Everything needed to go from tree text to an SVG in one call.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
    pub collapsed: CollapsedSet,
    pub search: String,
}

impl RenderOptions {
    pub fn from_config(config: Config) -> Self {
        Self {
            theme: config.theme,
            layout: config.layout,
            render: config.render,
            ..Self::default()
        }
    }
}

pub fn layout_with_options(input: &str, options: &RenderOptions) -> anyhow::Result<TreeLayout> {
    let source = parse_tree(input)?;
    Ok(compute_layout(
        &source,
        &options.collapsed,
        &options.search,
        &options.layout,
    ))
}

pub fn render_with_options(input: &str, options: &RenderOptions) -> anyhow::Result<String> {
    let layout = layout_with_options(input, options)?;
    Ok(render_svg(&layout, &options.theme, &options.render))
}
