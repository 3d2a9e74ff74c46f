//! lamina: slice a binary STL file into one SVG per layer.
//!
//! # Logging
//!
//! Set the `RUST_LOG` environment variable to control log output:
//! - `RUST_LOG=lamina_mesh=info` - STL header and face count
//! - `RUST_LOG=lamina_slicer=debug` - Per-layer segment and contour counts
//! - `RUST_LOG=debug` - All debug output
//!
//! # Example
//!
//! ```bash
//! # Twenty layers along X, simplified, opened in a terminal viewer
//! lamina part.stl -s 20 -a 2 --simplify 170 -o slices --viewer tycat
//! ```

use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result};
use clap::Parser;
use lamina_math::SliceAxis;
use lamina_slicer::{slice, SliceResult, SliceStats};
use lamina_slicer_svg::write_layers;
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;

use config::{Config, Overrides};

/// lamina - slice a binary STL file into SVG cross-sections.
///
/// Layers are written bottom to top as `{prefix}_{index}.svg`.
#[derive(Parser, Debug)]
#[command(name = "lamina")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input binary STL file
    stl_file: PathBuf,

    /// Number of slices [default: 10]
    #[arg(short, long)]
    slices: Option<usize>,

    /// Slicing axis: 0 for Z, 1 for Y, 2 for X [default: 0]
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(0..=2))]
    axis: Option<u8>,

    /// Drop contour points whose angle exceeds DEG degrees (0 disables)
    #[arg(long, value_name = "DEG")]
    simplify: Option<f64>,

    /// Directory receiving the SVG files [default: .]
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output file name prefix [default: layer]
    #[arg(long)]
    prefix: Option<String>,

    /// Program to open each written file with
    #[arg(long, value_name = "CMD")]
    viewer: Option<String>,

    /// TOML configuration file; flags given here take precedence
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the run summary as JSON
    #[arg(long)]
    json: bool,

    /// Suppress all non-error output
    #[arg(long, short)]
    quiet: bool,

    /// Increase output verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            slices: self.slices,
            axis: self.axis,
            simplify: self.simplify,
            output_dir: self.output_dir.clone(),
            prefix: self.prefix.clone(),
            viewer: self.viewer.clone(),
        }
    }

    fn config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_toml_file(path)?,
            None => Config::default(),
        };
        config.apply(self.overrides())?;
        config.validate()?;
        Ok(config)
    }
}

#[derive(Serialize)]
struct LayerSummary {
    index: usize,
    height: f64,
    file: PathBuf,
    input_segments: usize,
    output_segments: usize,
    contours: usize,
    open_contours: usize,
    reduction: f64,
}

#[derive(Serialize)]
struct RunSummary {
    input: PathBuf,
    axis: SliceAxis,
    simplify_angle: Option<f64>,
    layers: Vec<LayerSummary>,
    stats: SliceStats,
}

/// Initialize the tracing subscriber based on verbosity level.
fn init_tracing(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    // RUST_LOG wins over -v flags
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        let level = match verbose {
            0 => "warn",
            1 => "lamina_cli=info,lamina_mesh=info,lamina_slicer=info",
            2 => "lamina_cli=debug,lamina_mesh=debug,lamina_slicer=debug,lamina_slicer_svg=debug",
            _ => "trace",
        };
        EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .with(filter)
        .init();
}

fn run(cli: &Cli) -> Result<RunSummary> {
    let config = cli.config()?;

    let mesh = lamina_mesh::read_stl(&cli.stl_file, config.axis)
        .with_context(|| format!("Failed to load mesh from {}", cli.stl_file.display()))?;

    let result = slice(&mesh, &config.slice)
        .with_context(|| format!("Failed to slice {}", cli.stl_file.display()))?;

    std::fs::create_dir_all(&config.output_dir).with_context(|| {
        format!(
            "Failed to create output directory {}",
            config.output_dir.display()
        )
    })?;
    let files = write_layers(
        &config.output_dir,
        &config.prefix,
        &result.layers,
        &result.viewport,
        &config.svg,
    )
    .with_context(|| format!("Failed to write layers to {}", config.output_dir.display()))?;
    info!(count = files.len(), dir = %config.output_dir.display(), "Wrote layers");

    if let Some(viewer) = &config.viewer {
        for file in &files {
            open_in_viewer(viewer, file);
        }
    }

    Ok(summarize(cli, &config, result, files))
}

/// Run the viewer on one file. Failures are reported and skipped.
fn open_in_viewer(viewer: &str, file: &Path) {
    let mut parts = viewer.split_whitespace();
    let Some(program) = parts.next() else {
        warn!("Empty viewer command");
        return;
    };

    match Command::new(program).args(parts).arg(file).status() {
        Ok(status) if status.success() => {}
        Ok(status) => warn!(viewer, file = %file.display(), %status, "Viewer failed"),
        Err(e) => warn!(viewer, file = %file.display(), error = %e, "Could not start viewer"),
    }
}

fn summarize(cli: &Cli, config: &Config, result: SliceResult, files: Vec<PathBuf>) -> RunSummary {
    let layers = result
        .layers
        .iter()
        .zip(files)
        .map(|(layer, file)| LayerSummary {
            index: layer.index,
            height: layer.height,
            file,
            input_segments: layer.stats.input_segments,
            output_segments: layer.stats.output_segments,
            contours: layer.stats.contours,
            open_contours: layer.stats.open_contours(),
            reduction: layer.stats.reduction(),
        })
        .collect();

    RunSummary {
        input: cli.stl_file.clone(),
        axis: config.axis,
        simplify_angle: config.slice.simplify_angle,
        layers,
        stats: result.stats,
    }
}

fn print_text(summary: &RunSummary) {
    println!(
        "{}: {} triangles, {} layers along {:?}",
        summary.input.display(),
        summary.stats.triangle_count,
        summary.stats.layer_count,
        summary.axis
    );
    for layer in &summary.layers {
        print!(
            "  {} z={:.4} segments={} contours={}",
            layer.file.display(),
            layer.height,
            layer.output_segments,
            layer.contours
        );
        if layer.open_contours > 0 {
            print!(" open={}", layer.open_contours);
        }
        if summary.simplify_angle.is_some() {
            print!(" reduced={}%", (100.0 * layer.reduction) as i64);
        }
        println!();
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.quiet);

    match run(&cli) {
        Ok(summary) => {
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else if !cli.quiet {
                print_text(&summary);
            }
            Ok(())
        }
        Err(e) => {
            if !cli.quiet {
                eprintln!("Error: {}", e);
                for cause in e.chain().skip(1) {
                    eprintln!("  Caused by: {}", cause);
                }
            }
            std::process::exit(1);
        }
    }
}
