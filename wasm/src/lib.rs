use serde::Deserialize;
use treeflow::{
    CollapsedSet, Direction, RenderOptions, Theme, layout_with_options, render_with_options,
    toggle_collapse,
};
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TreeRenderOptions {
    theme: Option<String>,
    direction: Option<String>,
    collapsed: Option<Vec<String>>,
    search: Option<String>,
    node_width: Option<f32>,
    node_height: Option<f32>,
    level_gap: Option<f32>,
    node_gap: Option<f32>,
    font_family: Option<String>,
    font_size: Option<f32>,
}

fn parse_options(options_json: Option<String>) -> Result<TreeRenderOptions, JsValue> {
    match options_json {
        Some(raw) if !raw.trim().is_empty() => {
            serde_json::from_str(&raw).map_err(|error| JsValue::from_str(&error.to_string()))
        }
        _ => Ok(TreeRenderOptions::default()),
    }
}

fn build_render_options(options: TreeRenderOptions) -> Result<RenderOptions, String> {
    let mut render_options = RenderOptions::default();

    if let Some(name) = options.theme {
        render_options.theme =
            Theme::from_name(&name).ok_or_else(|| format!("unknown theme `{name}`"))?;
        render_options.render.background = render_options.theme.background.clone();
    }
    if let Some(token) = options.direction {
        render_options.layout.direction =
            Direction::from_token(&token).ok_or_else(|| format!("unknown direction `{token}`"))?;
    }
    if let Some(collapsed) = options.collapsed {
        render_options.collapsed = collapsed.into_iter().collect();
    }
    if let Some(search) = options.search {
        render_options.search = search;
    }
    if let Some(node_width) = options.node_width {
        render_options.layout.node_width = node_width;
    }
    if let Some(node_height) = options.node_height {
        render_options.layout.node_height = node_height;
    }
    if let Some(level_gap) = options.level_gap {
        render_options.layout.level_gap = level_gap;
    }
    if let Some(node_gap) = options.node_gap {
        render_options.layout.node_gap = node_gap;
    }
    if let Some(font_family) = options.font_family {
        render_options.theme.font_family = font_family;
    }
    if let Some(font_size) = options.font_size {
        render_options.theme.font_size = font_size;
    }

    Ok(render_options)
}

/// Positions for every visible node and edge, serialized as JSON.
#[wasm_bindgen]
pub fn compute_tree_layout(input: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let options = build_render_options(parse_options(options_json)?)
        .map_err(|error| JsValue::from_str(&error))?;
    let layout = layout_with_options(input, &options)
        .map_err(|error| JsValue::from_str(&error.to_string()))?;
    serde_json::to_string(&layout).map_err(|error| JsValue::from_str(&error.to_string()))
}

#[wasm_bindgen]
pub fn render_tree_svg(input: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let options = build_render_options(parse_options(options_json)?)
        .map_err(|error| JsValue::from_str(&error))?;
    render_with_options(input, &options).map_err(|error| JsValue::from_str(&error.to_string()))
}

/// Takes the collapsed ids as a JSON array and returns the toggled array.
#[wasm_bindgen]
pub fn toggle_collapsed(collapsed_json: &str, node_id: &str) -> Result<String, JsValue> {
    let current: CollapsedSet = if collapsed_json.trim().is_empty() {
        CollapsedSet::new()
    } else {
        serde_json::from_str(collapsed_json).map_err(|error| JsValue::from_str(&error.to_string()))?
    };
    let next = toggle_collapse(&current, node_id);
    serde_json::to_string(&next).map_err(|error| JsValue::from_str(&error.to_string()))
}
