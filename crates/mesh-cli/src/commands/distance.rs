//! mesh-dist distance command - measure the minimum distance between two meshes.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use colored::Colorize;
use mesh_distance::{DistanceCache, ProgressCallback, SceneMesh};
use serde::Serialize;

use super::{Placement, load, resolve_params};
use crate::{Cli, MetricArg, OutputFormat, output};

#[derive(Serialize)]
struct DistanceOutput {
    mesh_a: String,
    mesh_b: String,
    metric: &'static str,
    measured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    distance: Option<f64>,
    lap_ms: f64,
    triangles_a: usize,
    triangles_b: usize,
}

pub fn run(
    path_a: &Path,
    path_b: &Path,
    metric: Option<MetricArg>,
    placement_a: &Placement,
    placement_b: &Placement,
    show_progress: bool,
    cli: &Cli,
) -> Result<()> {
    let params = resolve_params(cli, metric)?;
    let metric_name = params.metric.as_str();

    let mesh_a = SceneMesh::with_transform(load(path_a)?, placement_a.to_transform());
    let mesh_b = SceneMesh::with_transform(load(path_b)?, placement_b.to_transform());

    output::info(
        &format!(
            "Measuring {} x {} triangles ({} metric)...",
            mesh_a.mesh().face_count(),
            mesh_b.mesh().face_count(),
            metric_name
        ),
        cli.format,
        cli.quiet,
    );

    let draw_progress = show_progress && !cli.quiet && matches!(cli.format, OutputFormat::Text);
    let progress: Option<ProgressCallback> = draw_progress.then(|| {
        let callback: ProgressCallback = Arc::new(|fraction: f64| {
            eprint!("\r  {} {:>5.1}%", "Progress".cyan(), fraction * 100.0);
            let _ = std::io::stderr().flush();
        });
        callback
    });

    let cache = DistanceCache::with_params(params)?;
    let handle = cache
        .start_computation(&mesh_a, &mesh_b, progress)
        .context("A computation for this mesh pair is already running")?;
    let result = handle.wait()?;

    if draw_progress {
        eprintln!();
    }

    let report = DistanceOutput {
        mesh_a: path_a.display().to_string(),
        mesh_b: path_b.display().to_string(),
        metric: metric_name,
        measured: result.is_measured(),
        distance: result.measured_distance(),
        lap_ms: result.lap_ms(),
        triangles_a: result.triangles_a,
        triangles_b: result.triangles_b,
    };

    match cli.format {
        OutputFormat::Json => {
            output::print(&report, cli.format, cli.quiet);
        }
        OutputFormat::Text => {
            if !cli.quiet {
                println!("{}", "Mesh Distance".bold().underline());
                println!("  {}: {}", "Mesh A".cyan(), report.mesh_a);
                println!("  {}: {}", "Mesh B".cyan(), report.mesh_b);
                println!("  {}: {}", "Metric".cyan(), report.metric);
                println!(
                    "  {}: {} x {}",
                    "Triangles".cyan(),
                    report.triangles_a,
                    report.triangles_b
                );
                println!("  {}: {:.2} ms", "Lap".cyan(), report.lap_ms);
            }
            match report.distance {
                Some(d) => output::success(&format!("Distance: {:.6}", d), cli.format, cli.quiet),
                None => output::warning(
                    "No triangles to compare; distance is unmeasured",
                    cli.format,
                    cli.quiet,
                ),
            }
        }
    }

    Ok(())
}
