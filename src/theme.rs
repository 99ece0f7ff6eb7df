use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f32,
    pub node_fill: String,
    pub node_border: String,
    pub node_text: String,
    pub highlight_fill: String,
    pub highlight_text: String,
    pub highlight_glow: String,
    pub line_color: String,
    pub indicator_fill: String,
    pub indicator_border: String,
    pub indicator_glyph: String,
    pub background: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self::classic()
    }
}

impl Theme {
    /// Light palette with pink search highlights.
    pub fn classic() -> Self {
        Self {
            font_family: "Roboto, Helvetica, Arial, sans-serif".to_string(),
            font_size: 14.0,
            node_fill: "#f8f8f8".to_string(),
            node_border: "#dddddd".to_string(),
            node_text: "#333333".to_string(),
            highlight_fill: "#ffe6f0".to_string(),
            highlight_text: "#ff0072".to_string(),
            highlight_glow: "rgba(255, 0, 114, 0.3)".to_string(),
            line_color: "#b1b1b7".to_string(),
            indicator_fill: "#f0f0f0".to_string(),
            indicator_border: "#dddddd".to_string(),
            indicator_glyph: "#555555".to_string(),
            background: "#FFFFFF".to_string(),
        }
    }

    pub fn modern() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 13.0,
            node_fill: "#F8FAFF".to_string(),
            node_border: "#C7D2E5".to_string(),
            node_text: "#1C2430".to_string(),
            highlight_fill: "#FFF4D6".to_string(),
            highlight_text: "#B45309".to_string(),
            highlight_glow: "rgba(245, 158, 11, 0.35)".to_string(),
            line_color: "#7A8AA6".to_string(),
            indicator_fill: "#EEF2F8".to_string(),
            indicator_border: "#C7D2E5".to_string(),
            indicator_glyph: "#1C2430".to_string(),
            background: "#FFFFFF".to_string(),
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "classic" | "default" => Some(Self::classic()),
            "modern" => Some(Self::modern()),
            _ => None,
        }
    }
}
