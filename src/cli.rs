use crate::config::load_config;
use crate::ir::Direction;
use crate::layout_dump::write_layout_dump;
use crate::parser::parse_tree;
use crate::render::{render_svg, write_output_svg};
use crate::session::TreeSession;
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "treeflow", version, about = "Lay out and render collapsible trees from edge lists")]
pub struct Args {
    /// Input file (edge list or JSON) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file. Defaults to stdout for SVG and JSON if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON file (layout spacing, theme variables, render size)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Node whose subtree starts collapsed (repeatable, or comma separated)
    #[arg(long = "collapse", value_delimiter = ',')]
    pub collapse: Vec<String>,

    /// Highlight nodes whose label or id contains this text
    #[arg(short = 's', long = "search")]
    pub search: Option<String>,

    /// Layout direction, overriding the config file
    #[arg(short = 'd', long = "direction", value_enum)]
    pub direction: Option<DirectionArg>,

    /// Width
    #[arg(short = 'w', long = "width")]
    pub width: Option<f32>,

    /// Height
    #[arg(short = 'H', long = "height")]
    pub height: Option<f32>,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Svg,
    Png,
    Json,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum DirectionArg {
    Lr,
    Td,
}

impl From<DirectionArg> for Direction {
    fn from(value: DirectionArg) -> Self {
        match value {
            DirectionArg::Lr => Direction::LeftRight,
            DirectionArg::Td => Direction::TopDown,
        }
    }
}

pub fn run() -> Result<()> {
    init_tracing()?;
    let args = Args::parse();
    let mut config = load_config(args.config.as_deref())?;
    if let Some(direction) = args.direction {
        config.layout.direction = direction.into();
    }
    if let Some(width) = args.width {
        config.render.width = width;
    }
    if let Some(height) = args.height {
        config.render.height = height;
    }

    let input = read_input(args.input.as_deref())?;
    let source = parse_tree(&input)?;
    if source.is_empty() {
        tracing::warn!("input contains no edges; output will be empty");
    }

    let mut session = TreeSession::new(source, config.layout.clone());
    for id in &args.collapse {
        if !session.toggle(id) {
            tracing::warn!(id = %id, "cannot collapse: node is unknown or has no children");
        }
    }
    if let Some(search) = args.search {
        session.set_search(search);
    }
    let layout = session.layout();

    match args.output_format {
        OutputFormat::Svg => {
            let svg = render_svg(&layout, &config.theme, &config.render);
            write_output_svg(&svg, args.output.as_deref())?;
        }
        OutputFormat::Png => {
            let output = ensure_output(&args.output, "png")?;
            let svg = render_svg(&layout, &config.theme, &config.render);
            write_png(&svg, &output, &config)?;
        }
        OutputFormat::Json => {
            write_layout_dump(args.output.as_deref(), &layout)?;
        }
    }

    Ok(())
}

#[cfg(feature = "png")]
fn write_png(svg: &str, output: &Path, config: &crate::config::Config) -> Result<()> {
    crate::render::write_output_png(svg, output, &config.render, &config.theme)
}

#[cfg(not(feature = "png"))]
fn write_png(_svg: &str, _output: &Path, _config: &crate::config::Config) -> Result<()> {
    Err(anyhow::anyhow!(
        "PNG output requires building with the `png` feature"
    ))
}

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|err| anyhow::anyhow!("failed to install log subscriber: {err}"))
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path
        && path != Path::new("-")
    {
        return Ok(std::fs::read_to_string(path)?);
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn ensure_output(output: &Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    Err(anyhow::anyhow!(
        "Output path required for {} output",
        ext
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapse_flag_accepts_lists_and_repeats() {
        let args = Args::try_parse_from([
            "treeflow",
            "--collapse",
            "B,D",
            "--collapse",
            "G",
            "-s",
            "g",
            "-d",
            "td",
        ])
        .unwrap();
        assert_eq!(args.collapse, ["B", "D", "G"]);
        assert_eq!(args.search.as_deref(), Some("g"));
        assert_eq!(
            args.direction.map(Direction::from),
            Some(Direction::TopDown)
        );
        assert!(matches!(args.output_format, OutputFormat::Svg));
    }

    #[test]
    fn png_requires_output_path() {
        assert!(ensure_output(&None, "png").is_err());
        let path = PathBuf::from("tree.png");
        assert_eq!(ensure_output(&Some(path.clone()), "png").unwrap(), path);
    }
}
