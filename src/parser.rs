use crate::ir::TreeSource;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use thiserror::Error;

static EDGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<src>[^\s\[\]>]+?)\s*(?:\[(?P<src_label>[^\]]*)\])?\s*-{0,2}>\s*(?P<dst>[^\s\[\]>]+)\s*(?:\[(?P<dst_label>[^\]]*)\])?$",
    )
    .unwrap()
});
static DECL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<id>[^\s\[\]>]+)\s*\[(?P<label>[^\]]*)\]$").unwrap());

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("line {line}: cannot read `{text}` as an edge (A > B) or a label (A[Label])")]
    InvalidToken { line: usize, text: String },
    #[error("line {line}: unclosed `[` in `{text}`")]
    UnclosedLabel { line: usize, text: String },
    #[error("invalid JSON tree input: {0}")]
    Json(#[from] serde_json::Error),
}

/// Node record as fed by the tree viewer: an id, its children, and an
/// optional label.
#[derive(Debug, Deserialize)]
struct NodeRecord {
    id: String,
    #[serde(default)]
    children: Vec<String>,
    label: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EdgeRecord {
    source: String,
    target: String,
    #[serde(default)]
    label: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JsonInput {
    Nodes(Vec<NodeRecord>),
    Edges(Vec<EdgeRecord>),
    Source(TreeSource),
}

/// Reads a tree from either the edge-list text form or one of the JSON forms.
pub fn parse_tree(input: &str) -> Result<TreeSource, ParseError> {
    let trimmed = input.trim_start();
    if trimmed.starts_with('[') || trimmed.starts_with('{') {
        return parse_json(trimmed);
    }
    parse_edge_list(input)
}

fn parse_json(input: &str) -> Result<TreeSource, ParseError> {
    let parsed: JsonInput = serde_json::from_str(input)?;
    let mut source = TreeSource::new();
    match parsed {
        JsonInput::Nodes(records) => {
            let mut referenced = std::collections::HashSet::new();
            for record in &records {
                referenced.extend(record.children.iter().map(String::as_str));
            }
            for record in &records {
                for child in &record.children {
                    source.push_edge(&record.id, child);
                }
                if let Some(label) = record.label.as_deref() {
                    source.set_label(&record.id, label);
                }
                if record.children.is_empty() && !referenced.contains(record.id.as_str()) {
                    tracing::warn!(id = %record.id, "isolated node has no edges and is dropped");
                }
            }
        }
        JsonInput::Edges(records) => {
            for record in records {
                source.push_edge(&record.source, &record.target);
                if let Some(label) = record.label.as_deref() {
                    source.set_label(&record.target, label);
                }
            }
        }
        JsonInput::Source(parsed) => source = parsed,
    }
    Ok(source)
}

fn parse_edge_list(input: &str) -> Result<TreeSource, ParseError> {
    let mut source = TreeSource::new();
    for (idx, raw_line) in input.lines().enumerate() {
        let line_no = idx + 1;
        let line = strip_comment(raw_line.trim());
        if line.is_empty() {
            continue;
        }
        for token in split_tokens(line, line_no)? {
            parse_token(token, line_no, &mut source)?;
        }
    }
    Ok(source)
}

fn strip_comment(line: &str) -> &str {
    if line.starts_with('#') || line.starts_with("%%") {
        return "";
    }
    line
}

/// Splits on commas that sit outside of `[...]` labels.
fn split_tokens(line: &str, line_no: usize) -> Result<Vec<&str>, ParseError> {
    let mut tokens = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    for (idx, ch) in line.char_indices() {
        match ch {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                tokens.push(line[start..idx].trim());
                start = idx + 1;
            }
            _ => {}
        }
    }
    if depth > 0 {
        return Err(ParseError::UnclosedLabel {
            line: line_no,
            text: line.to_string(),
        });
    }
    tokens.push(line[start..].trim());
    Ok(tokens.into_iter().filter(|t| !t.is_empty()).collect())
}

fn parse_token(token: &str, line_no: usize, source: &mut TreeSource) -> Result<(), ParseError> {
    if let Some(caps) = EDGE_RE.captures(token) {
        let src = &caps["src"];
        let dst = &caps["dst"];
        if let Some(label) = caps.name("src_label") {
            source.set_label(src, clean_label(label.as_str()));
        }
        if let Some(label) = caps.name("dst_label") {
            source.set_label(dst, clean_label(label.as_str()));
        }
        source.push_edge(src, dst);
        return Ok(());
    }
    if let Some(caps) = DECL_RE.captures(token) {
        source.set_label(&caps["id"], clean_label(&caps["label"]));
        return Ok(());
    }
    Err(ParseError::InvalidToken {
        line: line_no,
        text: token.to_string(),
    })
}

fn clean_label(raw: &str) -> &str {
    let trimmed = raw.trim();
    trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(trimmed)
}
