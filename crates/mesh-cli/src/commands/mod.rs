//! Subcommand implementations and the helpers they share.

use std::path::Path;

use anyhow::{Context, Result};
use mesh_distance::{DistanceParams, Mesh, Transform};
use nalgebra::Vector3;

use crate::{Cli, MetricArg};

pub mod distance;
pub mod info;
pub mod track;

/// Parse `x,y,z` into three floats.
pub fn parse_vec3(s: &str) -> Result<[f64; 3], String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        return Err(format!("expected x,y,z but got {:?}", s));
    }

    let mut out = [0.0; 3];
    for (slot, part) in out.iter_mut().zip(&parts) {
        *slot = part
            .parse::<f64>()
            .map_err(|e| format!("invalid component {:?}: {}", part, e))?;
        if !slot.is_finite() {
            return Err(format!("component {:?} is not finite", part));
        }
    }
    Ok(out)
}

/// Where a mesh is placed in the world, as given on the command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct Placement {
    pub offset: Option<[f64; 3]>,
    /// Degrees.
    pub rotate: Option<[f64; 3]>,
    pub scale: Option<[f64; 3]>,
}

impl Placement {
    pub fn new(offset: Option<[f64; 3]>, rotate: Option<[f64; 3]>, scale: Option<[f64; 3]>) -> Self {
        Self {
            offset,
            rotate,
            scale,
        }
    }

    pub fn to_transform(&self) -> Transform {
        let mut transform = Transform::identity();
        if let Some([x, y, z]) = self.offset {
            transform = transform.translated(Vector3::new(x, y, z));
        }
        if let Some([rx, ry, rz]) = self.rotate {
            transform = transform.with_euler_angles(rx.to_radians(), ry.to_radians(), rz.to_radians());
        }
        if let Some([sx, sy, sz]) = self.scale {
            transform = transform.with_scale(Vector3::new(sx, sy, sz));
        }
        transform
    }
}

/// Resolve parameters from `--config` and the per-command metric flag.
pub fn resolve_params(cli: &Cli, metric: Option<MetricArg>) -> Result<DistanceParams> {
    let mut params = match &cli.config {
        Some(path) => DistanceParams::load(path)
            .with_context(|| format!("Failed to load parameters from {:?}", path))?,
        None => DistanceParams::default(),
    };
    if let Some(metric) = metric {
        params.metric = metric.into();
    }
    Ok(params)
}

pub fn load(path: &Path) -> Result<Mesh> {
    Mesh::load(path).with_context(|| format!("Failed to load mesh from {:?}", path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    #[test]
    fn test_parse_vec3() {
        assert_eq!(parse_vec3("1,2,3").unwrap(), [1.0, 2.0, 3.0]);
        assert_eq!(parse_vec3(" -1.5, 0 ,2e1").unwrap(), [-1.5, 0.0, 20.0]);
        assert!(parse_vec3("1,2").is_err());
        assert!(parse_vec3("1,2,x").is_err());
        assert!(parse_vec3("1,2,inf").is_err());
    }

    #[test]
    fn test_placement_transform() {
        let placement = Placement::new(Some([10.0, 0.0, 0.0]), Some([0.0, 0.0, 90.0]), None);
        let p = placement.to_transform().apply(&Point3::new(1.0, 0.0, 0.0));
        assert!((p.x - 10.0).abs() < 1e-12);
        assert!((p.y - 1.0).abs() < 1e-12);

        assert_eq!(Placement::default().to_transform(), Transform::identity());
    }
}
