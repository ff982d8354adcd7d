//! mesh-dist info command - triangle counts and a time estimate.

use std::path::Path;

use anyhow::Result;
use colored::Colorize;
use mesh_distance::{Mesh, estimate_distance_time};
use serde::Serialize;

use super::{load, resolve_params};
use crate::{Cli, MetricArg, OutputFormat, output};

#[derive(Serialize)]
struct MeshSummary {
    path: String,
    vertices: usize,
    faces: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    dimensions: Option<[f64; 3]>,
}

impl MeshSummary {
    fn new(path: &Path, mesh: &Mesh) -> Self {
        Self {
            path: path.display().to_string(),
            vertices: mesh.vertex_count(),
            faces: mesh.face_count(),
            dimensions: mesh.bounds().map(|(min, max)| {
                let dims = max - min;
                [dims.x, dims.y, dims.z]
            }),
        }
    }
}

#[derive(Serialize)]
struct PairInfo {
    mesh_a: MeshSummary,
    mesh_b: MeshSummary,
    metric: &'static str,
    pair_count: u64,
    point_segment_queries: u64,
    progress_reports: u64,
    estimated_seconds: f64,
    complexity: String,
}

pub fn run(path_a: &Path, path_b: &Path, metric: Option<MetricArg>, cli: &Cli) -> Result<()> {
    let params = resolve_params(cli, metric)?;
    let mesh_a = load(path_a)?;
    let mesh_b = load(path_b)?;

    let estimate = estimate_distance_time(mesh_a.face_count(), mesh_b.face_count(), params.metric);

    let info = PairInfo {
        mesh_a: MeshSummary::new(path_a, &mesh_a),
        mesh_b: MeshSummary::new(path_b, &mesh_b),
        metric: params.metric.as_str(),
        pair_count: estimate.pair_count,
        point_segment_queries: estimate.point_segment_queries,
        progress_reports: estimate.progress_reports,
        estimated_seconds: estimate.estimated_seconds,
        complexity: estimate.complexity,
    };

    match cli.format {
        OutputFormat::Json => {
            output::print(&info, cli.format, cli.quiet);
        }
        OutputFormat::Text => {
            if !cli.quiet {
                println!("{}", "Mesh Pair Information".bold().underline());
                for (label, summary) in [("Mesh A", &info.mesh_a), ("Mesh B", &info.mesh_b)] {
                    println!("  {}: {}", label.cyan(), summary.path);
                    println!("    {}: {}", "Vertices".cyan(), summary.vertices);
                    println!("    {}: {}", "Faces".cyan(), summary.faces);
                    if let Some([x, y, z]) = summary.dimensions {
                        println!("    {}: {:.2} x {:.2} x {:.2}", "Dimensions".cyan(), x, y, z);
                    }
                }
                println!("  {}: {}", "Metric".cyan(), info.metric);
                println!("  {}: {}", "Triangle pairs".cyan(), info.pair_count);
                println!(
                    "  {}: {}",
                    "Point-segment queries".cyan(),
                    info.point_segment_queries
                );
                println!(
                    "  {}: {:.3} s ({})",
                    "Estimated time".cyan(),
                    info.estimated_seconds,
                    info.complexity
                );
            }
        }
    }

    Ok(())
}
