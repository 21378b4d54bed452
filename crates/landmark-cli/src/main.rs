//! landmark-mesh: Command-line interface for landmark capture tessellation.
//!
//! Reconstructs a triangle index buffer from a landmark model's connection
//! list and the first frame of a capture, for scripting and batch export.
//!
//! # Logging
//!
//! Set the `RUST_LOG` environment variable to control log output:
//! - `RUST_LOG=landmark_mesh=info` - Stage summaries
//! - `RUST_LOG=landmark_mesh=debug` - Graph statistics and per-face reports
//! - `RUST_LOG=landmark_mesh::timing=info` - Stage timing
//! - `RUST_LOG=debug` - All debug output
//!
//! # Example
//!
//! ```bash
//! # Face capture to an index buffer and a viewable OBJ
//! landmark-mesh tessellate --topology face.json --capture capture.json -o tris.json --obj face.obj
//!
//! # Built-in pose skeleton, seeded from the left shoulder
//! RUST_LOG=landmark_mesh=debug landmark-mesh inspect --topology pose --seed 11
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use miette::Diagnostic;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod commands;
mod output;

use commands::{inspect, tessellate, validate};

/// landmark-mesh - Recover mesh triangles from landmark connection lists.
#[derive(Parser)]
#[command(name = "landmark-mesh")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format for results
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,

    /// Suppress all non-error output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Increase output verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(long, short, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output for scripting
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the triangle list for a capture
    Tessellate {
        /// Topology file (.json/.toml), or `pose` for the built-in pose skeleton
        #[arg(long, short)]
        topology: String,

        /// Capture file with landmark frames
        #[arg(long, short)]
        capture: PathBuf,

        /// Output triangle list (JSON)
        #[arg(short, long)]
        output: PathBuf,

        /// Also write the first frame as an OBJ mesh
        #[arg(long)]
        obj: Option<PathBuf>,

        /// Tessellation parameters (.toml/.json)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Skip centering on the capture bounds
        #[arg(long)]
        no_center: bool,

        /// Landmarks per subject in the capture (defaults to the topology vertex count)
        #[arg(long)]
        stride: Option<usize>,

        /// Write one offset triangle list per subject in the capture
        #[arg(long)]
        instances: bool,
    },

    /// Show graph statistics for a topology
    Inspect {
        /// Topology file (.json/.toml), or `pose` for the built-in pose skeleton
        #[arg(long, short)]
        topology: String,

        /// Vertex the fan walk starts from
        #[arg(long, default_value = "0")]
        seed: u32,
    },

    /// Check a triangle list against a capture's first frame, across every
    /// subject its indices reach
    Validate {
        /// Topology file (.json/.toml), or `pose` for the built-in pose skeleton
        #[arg(long, short)]
        topology: String,

        /// Capture file with landmark frames
        #[arg(long, short)]
        capture: PathBuf,

        /// Triangle list written by `tessellate`
        #[arg(long)]
        triangles: PathBuf,

        /// Tessellation parameters (.toml/.json)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Skip centering on the capture bounds
        #[arg(long)]
        no_center: bool,

        /// Landmarks per subject in the capture (defaults to the topology vertex count)
        #[arg(long)]
        stride: Option<usize>,
    },
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
            1 => "landmark_mesh=info",
            2 => "landmark_mesh=debug",
            _ => "trace",
        };
        EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    #[cfg(debug_assertions)]
    miette::set_panic_hook();

    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let result = match &cli.command {
        Commands::Tessellate {
            topology,
            capture,
            output,
            obj,
            config,
            no_center,
            stride,
            instances,
        } => tessellate::run(
            &tessellate::TessellateArgs {
                topology,
                capture,
                output,
                obj: obj.as_deref(),
                config: config.as_deref(),
                no_center: *no_center,
                stride: *stride,
                instances: *instances,
            },
            &cli,
        ),
        Commands::Inspect { topology, seed } => inspect::run(topology, *seed, &cli),
        Commands::Validate {
            topology,
            capture,
            triangles,
            config,
            no_center,
            stride,
        } => validate::run(
            &validate::ValidateArgs {
                topology,
                capture,
                triangles,
                config: config.as_deref(),
                no_center: *no_center,
                stride: *stride,
            },
            &cli,
        ),
    };

    if let Err(e) = &result {
        if !cli.quiet {
            if let Some(mesh_err) = e.downcast_ref::<landmark_mesh::MeshError>() {
                eprintln!("{}: {}", "Error".red().bold(), mesh_err);
                eprintln!("  {}: {}", "Code".cyan(), mesh_err.code());
                if let Some(help) = mesh_err.help() {
                    eprintln!("  {}: {}", "Suggestion".green(), help);
                }
            } else {
                eprintln!("{}: {}", "Error".red().bold(), e);
                for cause in e.chain().skip(1) {
                    eprintln!("  {}: {}", "Caused by".yellow(), cause);
                }
            }
        }
        std::process::exit(1);
    }

    Ok(())
}
