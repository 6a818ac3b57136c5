//! Plane and line helpers shared by barrier construction and the
//! (external) barrier renderer.

use crate::simulation::states::NVec3;

/// An oriented plane {x : n . x = shift} with unit normal `n`.
///
/// The positive side (n . x > shift) is the allowed side when the plane
/// backs a half-space barrier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub normal: NVec3, // unit normal
    pub shift: f64,
}

impl Plane {
    /// Build a plane from an arbitrary (non-zero) normal, normalising it
    /// and scaling the shift accordingly.
    pub fn new(normal: NVec3, shift: f64) -> Self {
        let len = normal.norm();
        Self {
            normal: normal / len,
            shift: shift / len,
        }
    }

    /// Plane through `point` with the given (non-zero) normal.
    pub fn through(point: NVec3, normal: NVec3) -> Self {
        let n = normal.normalize();
        Self {
            normal: n,
            shift: n.dot(&point),
        }
    }

    /// Signed distance from `point`; positive on the allowed side.
    pub fn signed_distance(&self, point: &NVec3) -> f64 {
        self.normal.dot(point) - self.shift
    }

    /// Closest point on the plane.
    pub fn project_point(&self, point: &NVec3) -> NVec3 {
        point - self.signed_distance(point) * self.normal
    }

    /// Intersection of the line `origin + t * dir` with the plane.
    /// `None` if the line is parallel to the plane.
    pub fn intersect_line(&self, origin: &NVec3, dir: &NVec3) -> Option<NVec3> {
        let denom = self.normal.dot(dir);
        if denom.abs() < 1.0e-12 {
            return None;
        }
        let t = (self.shift - self.normal.dot(origin)) / denom;
        Some(origin + t * dir)
    }

    /// Intersection line of two planes as (point, direction).
    /// `None` if the planes are parallel.
    pub fn intersect_plane(&self, other: &Plane) -> Option<(NVec3, NVec3)> {
        let dir = self.normal.cross(&other.normal);
        let det = dir.norm_squared();
        if det < 1.0e-12 {
            return None;
        }
        // Point on both planes, closest to the origin
        let point = (self.shift * other.normal - other.shift * self.normal).cross(&dir) / det;
        Some((point, dir / det.sqrt()))
    }
}
