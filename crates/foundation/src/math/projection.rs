//! Orthographic projection of the unit sphere.
//!
//! Pipeline: `GeoPoint` -> unit vector -> `rotate_y(yaw)` -> `rotate_x(pitch)`
//! -> screen disc. Every function here is pure; NaN inputs produce NaN outputs
//! (and `front == false`) rather than panics.

use super::{GeoPoint, Vec2, Vec3};

/// Spherical to Cartesian with `phi = 90 - lat`, `theta = lon + 180`.
///
/// With no rotation, longitude -90 faces the viewer (+z).
pub fn to_unit_vector(p: GeoPoint) -> Vec3 {
    let phi = (90.0 - p.lat_deg).to_radians();
    let theta = (p.lon_deg + 180.0).to_radians();
    let (sin_phi, cos_phi) = phi.sin_cos();
    let (sin_theta, cos_theta) = theta.sin_cos();
    Vec3::new(sin_phi * cos_theta, cos_phi, sin_phi * sin_theta)
}

/// Rotation about the vertical screen axis.
pub fn rotate_y(v: Vec3, angle: f64) -> Vec3 {
    let (s, c) = angle.sin_cos();
    Vec3::new(c * v.x + s * v.z, v.y, -s * v.x + c * v.z)
}

/// Rotation about the horizontal screen axis.
pub fn rotate_x(v: Vec3, angle: f64) -> Vec3 {
    let (s, c) = angle.sin_cos();
    Vec3::new(v.x, c * v.y - s * v.z, s * v.y + c * v.z)
}

/// `rotate_x(rotate_y(v, yaw), pitch)`.
pub fn rotate(v: Vec3, yaw: f64, pitch: f64) -> Vec3 {
    rotate_x(rotate_y(v, yaw), pitch)
}

/// The circle the sphere occupies on screen.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ScreenDisc {
    pub center: Vec2,
    pub radius: f64,
}

impl ScreenDisc {
    pub fn new(center: Vec2, radius: f64) -> Self {
        Self { center, radius }
    }

    /// `true` when `point` lies within the disc, with `slack` scaling the
    /// squared radius (1.0 = exact circle).
    pub fn contains(&self, point: Vec2, slack: f64) -> bool {
        point.distance_squared(self.center) <= self.radius * self.radius * slack
    }

    /// Same center, radius scaled by `factor`.
    pub fn scaled(&self, factor: f64) -> Self {
        Self::new(self.center, self.radius * factor)
    }
}

/// A rotated vector placed on screen.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Projection {
    pub position: Vec2,
    /// Camera-space depth; positive on the visible hemisphere.
    pub depth: f64,
    pub front: bool,
}

/// Orthographic projection; screen y grows downward.
pub fn project(v: Vec3, disc: ScreenDisc) -> Projection {
    Projection {
        position: Vec2::new(
            disc.center.x + disc.radius * v.x,
            disc.center.y - disc.radius * v.y,
        ),
        depth: v.z,
        front: v.z > 0.0,
    }
}

/// Full pipeline for a single geographic point.
pub fn project_geo(p: GeoPoint, yaw: f64, pitch: f64, disc: ScreenDisc) -> Projection {
    project(rotate(to_unit_vector(p), yaw, pitch), disc)
}
