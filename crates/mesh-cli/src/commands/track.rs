//! mesh-dist track command - poll the distance cache like a frame loop.
//!
//! Each tick asks the cache for the current distance. A miss launches a
//! background computation; while it runs the tick reports progress. Every
//! `move_every` ticks the second mesh steps along `step`, which makes the
//! cached value stale and triggers the next launch.

use std::path::Path;
use std::sync::mpsc::Receiver;
use std::thread;
use std::time::Duration;

use anyhow::Result;
use colored::Colorize;
use mesh_distance::{
    CacheLookup, DistanceCache, MeshSource, ProgressCallback, SceneMesh, progress_channel,
};
use nalgebra::Vector3;
use serde::Serialize;

use super::{load, resolve_params};
use crate::{Cli, MetricArg, OutputFormat, output};

pub struct TrackOptions {
    pub step: [f64; 3],
    pub move_every: u32,
    pub ticks: u32,
    pub tick_ms: u64,
}

#[derive(Serialize)]
struct TickSample {
    tick: u32,
    state: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    distance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    progress: Option<f64>,
    offset_b: [f64; 3],
}

#[derive(Serialize)]
struct TrackSummary {
    metric: &'static str,
    ticks: u32,
    launches: u32,
    hits: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_distance: Option<f64>,
    samples: Vec<TickSample>,
}

pub fn run(
    path_a: &Path,
    path_b: &Path,
    metric: Option<MetricArg>,
    options: &TrackOptions,
    cli: &Cli,
) -> Result<()> {
    let params = resolve_params(cli, metric)?;
    let metric_name = params.metric.as_str();

    let mesh_a = SceneMesh::new(load(path_a)?);
    let mesh_b = SceneMesh::new(load(path_b)?);
    let cache = DistanceCache::with_params(params)?;
    let (callback, progress_rx) = progress_channel();

    let [sx, sy, sz] = options.step;
    let step = Vector3::new(sx, sy, sz);
    let move_every = options.move_every.max(1);

    output::info(
        &format!(
            "Tracking {} ticks of {} ms ({} metric)...",
            options.ticks, options.tick_ms, metric_name
        ),
        cli.format,
        cli.quiet,
    );

    let mut summary = TrackSummary {
        metric: metric_name,
        ticks: options.ticks,
        launches: 0,
        hits: 0,
        last_distance: None,
        samples: Vec::with_capacity(options.ticks as usize),
    };
    let mut last_progress = None;

    for tick in 0..options.ticks {
        let lookup = cache.try_get_cached(&mesh_a, &mesh_b);
        let (state, distance) = match lookup {
            CacheLookup::Hit(d) => {
                summary.hits += 1;
                summary.last_distance = Some(d);
                ("ready", Some(d))
            }
            CacheLookup::InFlight => ("computing", None),
            CacheLookup::Miss => {
                if launch(&cache, &mesh_a, &mesh_b, &callback, &progress_rx) {
                    summary.launches += 1;
                }
                last_progress = None;
                ("launched", None)
            }
        };

        if let Some(p) = progress_rx.try_iter().last() {
            last_progress = Some(p);
        }

        let position = mesh_b.transform().position;
        let sample = TickSample {
            tick,
            state,
            distance,
            progress: if lookup.in_flight() { last_progress } else { None },
            offset_b: [position.x, position.y, position.z],
        };

        if !cli.quiet && matches!(cli.format, OutputFormat::Text) {
            print_tick(&sample);
        }
        summary.samples.push(sample);

        if (tick + 1) % move_every == 0 {
            mesh_b.translate(step);
        }
        thread::sleep(Duration::from_millis(options.tick_ms));
    }

    match cli.format {
        OutputFormat::Json => {
            output::print(&summary, cli.format, cli.quiet);
        }
        OutputFormat::Text => {
            output::success(
                &format!(
                    "{} ticks, {} launches, {} hits",
                    summary.ticks, summary.launches, summary.hits
                ),
                cli.format,
                cli.quiet,
            );
            if let Some(d) = summary.last_distance {
                output::success(&format!("Last distance: {:.6}", d), cli.format, cli.quiet);
            }
        }
    }

    Ok(())
}

/// Discard progress left over from earlier runs, then launch a new one.
///
/// The handle is not needed: the cache is updated either way.
fn launch(
    cache: &DistanceCache,
    mesh_a: &SceneMesh,
    mesh_b: &SceneMesh,
    callback: &ProgressCallback,
    progress_rx: &Receiver<f64>,
) -> bool {
    progress_rx.try_iter().for_each(drop);
    cache
        .start_computation(mesh_a, mesh_b, Some(callback.clone()))
        .is_some()
}

fn print_tick(sample: &TickSample) {
    let [x, y, z] = sample.offset_b;
    let status = match (sample.state, sample.distance, sample.progress) {
        ("ready", Some(d), _) => format!("{} {:.6}", "ready".green(), d),
        ("computing", _, Some(p)) => format!("{} {:>5.1}%", "computing".yellow(), p * 100.0),
        ("computing", _, None) => "computing".yellow().to_string(),
        (state, _, _) => state.cyan().to_string(),
    };
    println!(
        "  tick {:>4}  b at ({:.2}, {:.2}, {:.2})  {}",
        sample.tick, x, y, z, status
    );
}
