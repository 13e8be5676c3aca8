use clap::Parser;
use looksame::io::{looks_same_sources, save_rgb_image, SourceImage};
use looksame::{BoundingBox, Color, CompareOptions, CompareResult, LooksSameResult, Rect};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const SCHEMA_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "looksame CLI (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Print the JSON schema and exit.
    #[arg(long)]
    print_schema: bool,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Deserialize, Clone, Copy)]
struct BoundingBoxJson {
    left: usize,
    top: usize,
    right: usize,
    bottom: usize,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct OptionsJson {
    strict: bool,
    tolerance: Option<f64>,
    ignore_antialiasing: bool,
    antialiasing_tolerance: f64,
    ignore_caret: bool,
    pixel_ratio: f64,
    stop_on_first_fail: bool,
    should_cluster: bool,
    cluster_radius: usize,
    highlight_color: String,
    parallel: bool,
}

impl Default for OptionsJson {
    fn default() -> Self {
        let opts = CompareOptions::default();
        Self {
            strict: opts.strict,
            tolerance: opts.tolerance,
            ignore_antialiasing: opts.ignore_antialiasing,
            antialiasing_tolerance: opts.antialiasing_tolerance,
            ignore_caret: opts.ignore_caret,
            pixel_ratio: opts.pixel_ratio,
            stop_on_first_fail: opts.stop_on_first_fail,
            should_cluster: opts.should_cluster,
            cluster_radius: opts.cluster_radius,
            highlight_color: "#ff00ff".to_owned(),
            parallel: opts.parallel,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct Config {
    reference: String,
    current: String,
    reference_bbox: Option<BoundingBoxJson>,
    current_bbox: Option<BoundingBoxJson>,
    diff_path: Option<String>,
    output_path: Option<String>,
    options: OptionsJson,
}

#[derive(Debug, Serialize)]
struct RectRecord {
    left: usize,
    top: usize,
    right: usize,
    bottom: usize,
}

impl From<Rect> for RectRecord {
    fn from(value: Rect) -> Self {
        Self {
            left: value.left,
            top: value.top,
            right: value.right,
            bottom: value.bottom,
        }
    }
}

#[derive(Debug, Serialize)]
struct Output {
    equal: bool,
    reference_size: [usize; 2],
    diff_bounds: Option<RectRecord>,
    diff_clusters: Vec<RectRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    different_pixels: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    total_pixels: Option<usize>,
}

impl From<&CompareResult> for Output {
    fn from(value: &CompareResult) -> Self {
        Self {
            equal: value.equal,
            reference_size: [value.reference_size.0, value.reference_size.1],
            diff_bounds: value.diff_bounds.map(RectRecord::from),
            diff_clusters: value
                .diff_clusters
                .iter()
                .copied()
                .map(RectRecord::from)
                .collect(),
            different_pixels: value.diff_image.as_ref().map(|d| d.different_pixels),
            total_pixels: value.diff_image.as_ref().map(|d| d.total_pixels),
        }
    }
}

fn source(path: &str, bbox: Option<BoundingBoxJson>) -> LooksSameResult<SourceImage> {
    let image = SourceImage::from_path(path);
    match bbox {
        Some(b) => {
            let bbox = BoundingBox::new(b.left, b.top, b.right, b.bottom)?;
            Ok(image.with_bounding_box(bbox))
        }
        None => Ok(image),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("looksame=info".parse()?))
            .with_target(false)
            .init();
    }

    if cli.print_schema {
        println!("{SCHEMA_JSON}");
        return Ok(());
    }
    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config_text = fs::read_to_string(&cli.config)?;
    let config: Config = serde_json::from_str(&config_text)?;
    if config.reference.is_empty() || config.current.is_empty() {
        return Err("reference and current must be set in the config".into());
    }

    let o = &config.options;
    let opts = CompareOptions {
        strict: o.strict,
        tolerance: o.tolerance,
        ignore_antialiasing: o.ignore_antialiasing,
        antialiasing_tolerance: o.antialiasing_tolerance,
        ignore_caret: o.ignore_caret,
        pixel_ratio: o.pixel_ratio,
        stop_on_first_fail: o.stop_on_first_fail,
        should_cluster: o.should_cluster,
        cluster_radius: o.cluster_radius,
        create_diff_image: config.diff_path.is_some(),
        highlight_color: Color::parse(&o.highlight_color)?,
        parallel: o.parallel,
    };

    let reference = source(&config.reference, config.reference_bbox)?;
    let current = source(&config.current, config.current_bbox)?;
    let result = looks_same_sources(&reference, &current, &opts)?;
    tracing::info!(equal = result.equal, "comparison finished");

    if let (Some(path), Some(diff)) = (&config.diff_path, &result.diff_image) {
        save_rgb_image(&diff.image, path)?;
    }

    let json = serde_json::to_string_pretty(&Output::from(&result))?;
    match config.output_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}
