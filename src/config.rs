use crate::ir::Direction;
use crate::theme::Theme;
use anyhow::{Context, anyhow};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Spacing knobs for the tree planner. Fixed for the lifetime of a layout
/// call; build another value to lay out with different spacing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub direction: Direction,
    /// Distance between consecutive depth levels along the depth axis.
    pub level_gap: f32,
    /// Gap between neighbouring sibling subtrees along the spread axis.
    pub node_gap: f32,
    pub node_width: f32,
    pub node_height: f32,
    /// Gap between independent trees of a forest.
    pub tree_gap: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        let node_width = 150.0;
        Self {
            direction: Direction::LeftRight,
            level_gap: node_width + 100.0,
            node_gap: 20.0,
            node_width,
            node_height: 40.0,
            tree_gap: 100.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: f32,
    pub height: f32,
    pub padding: f32,
    pub background: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
            padding: 24.0,
            background: "#FFFFFF".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
}

impl Default for Config {
    fn default() -> Self {
        let theme = Theme::classic();
        let render = RenderConfig {
            background: theme.background.clone(),
            ..Default::default()
        };
        Self {
            theme,
            layout: LayoutConfig::default(),
            render,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    layout: Option<LayoutConfigFile>,
    render: Option<RenderConfigFile>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    font_size: Option<NumberOrString>,
    node_fill: Option<String>,
    node_border: Option<String>,
    node_text: Option<String>,
    highlight_fill: Option<String>,
    highlight_text: Option<String>,
    highlight_glow: Option<String>,
    line_color: Option<String>,
    indicator_fill: Option<String>,
    indicator_border: Option<String>,
    indicator_glyph: Option<String>,
    background: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct LayoutConfigFile {
    direction: Option<String>,
    level_gap: Option<f32>,
    node_gap: Option<f32>,
    node_width: Option<f32>,
    node_height: Option<f32>,
    tree_gap: Option<f32>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct RenderConfigFile {
    width: Option<f32>,
    height: Option<f32>,
    padding: Option<f32>,
    background: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f32),
    String(String),
}

impl NumberOrString {
    fn as_f32(&self) -> Option<f32> {
        match self {
            NumberOrString::Number(val) => Some(*val),
            NumberOrString::String(val) => val.trim().trim_end_matches("px").parse::<f32>().ok(),
        }
    }
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading config file {}", path.display()))?;
    let is_json5 = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("json5"))
        .unwrap_or(false);
    let parsed: ConfigFile = if is_json5 {
        json5::from_str(&contents)?
    } else {
        serde_json::from_str(&contents)?
    };
    apply_config_file(Config::default(), parsed)
}

/// Parses a JSON config document and merges it over the defaults.
pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let parsed: ConfigFile = serde_json::from_str(contents)?;
    apply_config_file(Config::default(), parsed)
}

fn apply_config_file(mut config: Config, parsed: ConfigFile) -> anyhow::Result<Config> {
    if let Some(theme_name) = parsed.theme.as_deref() {
        config.theme =
            Theme::from_name(theme_name).ok_or_else(|| anyhow!("unknown theme: {theme_name}"))?;
        config.render.background = config.theme.background.clone();
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.font_size.as_ref().and_then(NumberOrString::as_f32) {
            config.theme.font_size = v;
        }
        if let Some(v) = vars.node_fill {
            config.theme.node_fill = v;
        }
        if let Some(v) = vars.node_border {
            config.theme.node_border = v;
        }
        if let Some(v) = vars.node_text {
            config.theme.node_text = v;
        }
        if let Some(v) = vars.highlight_fill {
            config.theme.highlight_fill = v;
        }
        if let Some(v) = vars.highlight_text {
            config.theme.highlight_text = v;
        }
        if let Some(v) = vars.highlight_glow {
            config.theme.highlight_glow = v;
        }
        if let Some(v) = vars.line_color {
            config.theme.line_color = v;
        }
        if let Some(v) = vars.indicator_fill {
            config.theme.indicator_fill = v;
        }
        if let Some(v) = vars.indicator_border {
            config.theme.indicator_border = v;
        }
        if let Some(v) = vars.indicator_glyph {
            config.theme.indicator_glyph = v;
        }
        if let Some(v) = vars.background {
            config.render.background = v.clone();
            config.theme.background = v;
        }
    }

    if let Some(layout) = parsed.layout {
        if let Some(token) = layout.direction.as_deref() {
            config.layout.direction = Direction::from_token(token)
                .ok_or_else(|| anyhow!("unknown layout direction: {token}"))?;
        }
        if let Some(v) = layout.level_gap {
            config.layout.level_gap = v;
        }
        if let Some(v) = layout.node_gap {
            config.layout.node_gap = v;
        }
        if let Some(v) = layout.node_width {
            config.layout.node_width = v;
        }
        if let Some(v) = layout.node_height {
            config.layout.node_height = v;
        }
        if let Some(v) = layout.tree_gap {
            config.layout.tree_gap = v;
        }
    }

    if let Some(render) = parsed.render {
        if let Some(v) = render.width {
            config.render.width = v;
        }
        if let Some(v) = render.height {
            config.render.height = v;
        }
        if let Some(v) = render.padding {
            config.render.padding = v;
        }
        if let Some(v) = render.background {
            config.render.background = v;
        }
    }

    Ok(config)
}
