//! World transforms and the snapshots the cache compares against.
//!
//! A [`Transform`] is position, rotation and non-uniform scale. Equality is
//! exact component-wise equality with no tolerance: a change at the level of
//! floating-point noise still counts as a different transform, which is what
//! makes a cached distance stale.

use nalgebra::{Point3, UnitQuaternion, Vector3};

/// Position, rotation and non-uniform scale of a mesh in world space.
///
/// Points are mapped local → world by scaling, then rotating, then
/// translating.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
pub struct Transform {
    /// World-space translation.
    pub position: Vector3<f64>,
    /// World-space orientation.
    pub rotation: UnitQuaternion<f64>,
    /// Per-axis scale applied in local space.
    pub scale: Vector3<f64>,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    /// The identity transform.
    pub fn identity() -> Self {
        Self {
            position: Vector3::zeros(),
            rotation: UnitQuaternion::identity(),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }

    /// A pure translation.
    pub fn from_position(position: Vector3<f64>) -> Self {
        Self {
            position,
            ..Self::identity()
        }
    }

    /// Replace the rotation.
    #[must_use]
    pub fn with_rotation(mut self, rotation: UnitQuaternion<f64>) -> Self {
        self.rotation = rotation;
        self
    }

    /// Replace the rotation using Euler angles in radians.
    #[must_use]
    pub fn with_euler_angles(self, roll: f64, pitch: f64, yaw: f64) -> Self {
        self.with_rotation(UnitQuaternion::from_euler_angles(roll, pitch, yaw))
    }

    /// Replace the scale.
    #[must_use]
    pub fn with_scale(mut self, scale: Vector3<f64>) -> Self {
        self.scale = scale;
        self
    }

    /// Move by `offset`.
    #[must_use]
    pub fn translated(mut self, offset: Vector3<f64>) -> Self {
        self.position += offset;
        self
    }

    /// Map a local-space point into world space.
    #[inline]
    pub fn apply(&self, point: &Point3<f64>) -> Point3<f64> {
        let scaled = point.coords.component_mul(&self.scale);
        Point3::from(self.rotation * scaled + self.position)
    }
}
