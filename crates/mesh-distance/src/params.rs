//! Parameters for distance computations.
//!
//! With the `config` feature, [`DistanceParams`] can be read from and written
//! to JSON:
//!
//! ```json
//! { "metric": "edge_midpoint", "worker_threads": 2 }
//! ```
//!
//! Both fields are optional and fall back to [`DistanceParams::default`].

use crate::error::{MeshError, MeshResult};
use crate::geometry::DistanceMetric;

/// Parameters shared by the synchronous and cached entry points.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "config",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct DistanceParams {
    /// Which triangle features are sampled.
    pub metric: DistanceMetric,
    /// Size of a dedicated worker pool for cached computations.
    /// `None` uses rayon's global pool.
    pub worker_threads: Option<usize>,
}

impl DistanceParams {
    /// Corner-against-edge sampling on the global pool.
    pub fn vertex() -> Self {
        Self::with_metric(DistanceMetric::Vertex)
    }

    /// Midpoint-against-edge sampling on the global pool.
    pub fn edge_midpoint() -> Self {
        Self::with_metric(DistanceMetric::EdgeMidpoint)
    }

    /// Params with the given metric and defaults otherwise.
    pub fn with_metric(metric: DistanceMetric) -> Self {
        Self {
            metric,
            ..Default::default()
        }
    }

    /// Use a dedicated pool of `threads` workers.
    #[must_use]
    pub fn worker_threads(mut self, threads: usize) -> Self {
        self.worker_threads = Some(threads);
        self
    }

    /// Check value ranges.
    ///
    /// # Errors
    /// Returns [`MeshError::InvalidParams`] for a zero-sized worker pool.
    pub fn validate(&self) -> MeshResult<()> {
        if self.worker_threads == Some(0) {
            return Err(MeshError::invalid_params(
                "worker_threads must be at least 1",
            ));
        }
        Ok(())
    }

    /// Parse params from a JSON string.
    #[cfg(feature = "config")]
    pub fn from_json(json_str: &str) -> MeshResult<Self> {
        let params: Self = serde_json::from_str(json_str).map_err(|e| MeshError::ConfigParse {
            details: e.to_string(),
        })?;
        params.validate()?;
        Ok(params)
    }

    /// Serialize params to pretty-printed JSON.
    #[cfg(feature = "config")]
    pub fn to_json(&self) -> MeshResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| MeshError::ConfigParse {
            details: e.to_string(),
        })
    }

    /// Load params from a JSON file.
    #[cfg(feature = "config")]
    pub fn load(path: &std::path::Path) -> MeshResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| MeshError::io_read(path, e))?;
        tracing::debug!(target: "mesh_distance::io", path = %path.display(), "Loaded parameters");
        Self::from_json(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        assert_eq!(DistanceParams::default().metric, DistanceMetric::Vertex);
        assert_eq!(DistanceParams::vertex(), DistanceParams::default());
        assert_eq!(
            DistanceParams::edge_midpoint().metric,
            DistanceMetric::EdgeMidpoint
        );
        assert_eq!(
            DistanceParams::vertex().worker_threads(3).worker_threads,
            Some(3)
        );
    }

    #[test]
    fn test_validate() {
        assert!(DistanceParams::default().validate().is_ok());
        assert!(DistanceParams::default().worker_threads(1).validate().is_ok());

        let err = DistanceParams::default()
            .worker_threads(0)
            .validate()
            .unwrap_err();
        assert!(matches!(err, MeshError::InvalidParams { .. }));
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_json_round_trip() {
        let params = DistanceParams::edge_midpoint().worker_threads(2);
        let json = params.to_json().unwrap();
        assert!(json.contains("edge_midpoint"));
        assert_eq!(DistanceParams::from_json(&json).unwrap(), params);
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_json_defaults_and_errors() {
        assert_eq!(
            DistanceParams::from_json("{}").unwrap(),
            DistanceParams::default()
        );
        assert!(matches!(
            DistanceParams::from_json(r#"{"metric": "nearest"}"#),
            Err(MeshError::ConfigParse { .. })
        ));
        assert!(matches!(
            DistanceParams::from_json(r#"{"worker_threads": 0}"#),
            Err(MeshError::InvalidParams { .. })
        ));
    }
}
