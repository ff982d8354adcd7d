//! mesh-dist: Command-line interface for mesh-to-mesh distance.
//!
//! This tool measures the minimum distance between two triangle meshes and
//! demonstrates the cached, non-blocking query layer of mesh-distance.
//!
//! # Logging
//!
//! Set the `RUST_LOG` environment variable to control log output:
//! - `RUST_LOG=mesh_distance=info` - Basic operation logging
//! - `RUST_LOG=mesh_distance::cache=debug` - Cache hits, misses and launches
//! - `RUST_LOG=mesh_distance::timing=debug` - Performance timing
//! - `RUST_LOG=mesh_distance::progress=trace` - Per-row progress
//!
//! # Example
//!
//! ```bash
//! # Distance between two parts, the second moved 10 units along X
//! mesh-dist distance a.stl b.stl --offset-b 10,0,0
//!
//! # Watch the cache recompute while the second part moves
//! RUST_LOG=mesh_distance::cache=debug mesh-dist track a.stl b.stl --step 0.5,0,0
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod commands;
mod output;

use commands::{Placement, distance, info, parse_vec3, track};

/// mesh-dist - Minimum distance between triangle meshes.
///
/// Load two meshes, place them in a shared world and measure how close
/// they come.
#[derive(Parser)]
#[command(name = "mesh-dist")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
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

    /// JSON parameter file (metric, worker_threads); flags override it
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output for scripting
    Json,
}

/// Triangle distance approximation.
#[derive(Clone, Copy, ValueEnum)]
pub enum MetricArg {
    /// Corners against opposite edges
    Vertex,
    /// Edge midpoints against opposite edges
    EdgeMidpoint,
}

impl From<MetricArg> for mesh_distance::DistanceMetric {
    fn from(arg: MetricArg) -> Self {
        match arg {
            MetricArg::Vertex => mesh_distance::DistanceMetric::Vertex,
            MetricArg::EdgeMidpoint => mesh_distance::DistanceMetric::EdgeMidpoint,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Measure the minimum distance between two meshes
    Distance {
        /// First mesh file
        mesh_a: PathBuf,

        /// Second mesh file
        mesh_b: PathBuf,

        /// Triangle distance approximation
        #[arg(long)]
        metric: Option<MetricArg>,

        /// Translation of the first mesh (x,y,z)
        #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true)]
        offset_a: Option<[f64; 3]>,

        /// Translation of the second mesh (x,y,z)
        #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true)]
        offset_b: Option<[f64; 3]>,

        /// Rotation of the first mesh in degrees (rx,ry,rz)
        #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true)]
        rotate_a: Option<[f64; 3]>,

        /// Rotation of the second mesh in degrees (rx,ry,rz)
        #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true)]
        rotate_b: Option<[f64; 3]>,

        /// Per-axis scale of the first mesh (sx,sy,sz)
        #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true)]
        scale_a: Option<[f64; 3]>,

        /// Per-axis scale of the second mesh (sx,sy,sz)
        #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true)]
        scale_b: Option<[f64; 3]>,

        /// Show a progress line while computing
        #[arg(long)]
        progress: bool,
    },

    /// Show triangle counts and a time estimate for a mesh pair
    Info {
        /// First mesh file
        mesh_a: PathBuf,

        /// Second mesh file
        mesh_b: PathBuf,

        /// Triangle distance approximation
        #[arg(long)]
        metric: Option<MetricArg>,
    },

    /// Poll the distance cache while the second mesh moves
    Track {
        /// First mesh file
        mesh_a: PathBuf,

        /// Second mesh file
        mesh_b: PathBuf,

        /// Triangle distance approximation
        #[arg(long)]
        metric: Option<MetricArg>,

        /// Movement of the second mesh per step (x,y,z)
        #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true, default_value = "0.1,0,0")]
        step: [f64; 3],

        /// Move the second mesh every N ticks
        #[arg(long, default_value = "10")]
        move_every: u32,

        /// Number of polling ticks
        #[arg(long, default_value = "100")]
        ticks: u32,

        /// Milliseconds between ticks
        #[arg(long, default_value = "16")]
        tick_ms: u64,
    },
}

/// Initialize the tracing subscriber based on verbosity level.
fn init_tracing(verbose: u8, quiet: bool) {
    // If quiet, don't initialize any tracing
    if quiet {
        return;
    }

    // Check RUST_LOG first, then fall back to -v flags
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        let level = match verbose {
            0 => "warn",
            1 => "mesh_distance=info",
            2 => "mesh_distance=debug",
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
    // Install miette's panic hook for better error display
    #[cfg(debug_assertions)]
    miette::set_panic_hook();

    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.quiet);

    let result = match &cli.command {
        Commands::Distance {
            mesh_a,
            mesh_b,
            metric,
            offset_a,
            offset_b,
            rotate_a,
            rotate_b,
            scale_a,
            scale_b,
            progress,
        } => distance::run(
            mesh_a,
            mesh_b,
            *metric,
            &Placement::new(*offset_a, *rotate_a, *scale_a),
            &Placement::new(*offset_b, *rotate_b, *scale_b),
            *progress,
            &cli,
        ),
        Commands::Info {
            mesh_a,
            mesh_b,
            metric,
        } => info::run(mesh_a, mesh_b, *metric, &cli),
        Commands::Track {
            mesh_a,
            mesh_b,
            metric,
            step,
            move_every,
            ticks,
            tick_ms,
        } => track::run(
            mesh_a,
            mesh_b,
            *metric,
            &track::TrackOptions {
                step: *step,
                move_every: *move_every,
                ticks: *ticks,
                tick_ms: *tick_ms,
            },
            &cli,
        ),
    };

    if let Err(e) = &result {
        if !cli.quiet {
            if let Some(mesh_err) = e.downcast_ref::<mesh_distance::MeshError>() {
                eprintln!("{}: {}", "Error".red().bold(), mesh_err);
                eprintln!("  {}: {}", "Code".cyan(), mesh_err.code());
                eprintln!(
                    "  {}: {}",
                    "Suggestion".green(),
                    mesh_err.recovery_suggestion()
                );
                if let Some(location) = mesh_err.location() {
                    eprintln!("  {}: {}", "Location".yellow(), location);
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
