//! Half-space barriers (wall, ground) and body projection.
//!
//! A barrier keeps bodies on the side {x : n . x >= shift}. After position
//! integration, penetrating bodies are moved back onto the surface and the
//! velocity component into the barrier is zeroed; the tangential component
//! is preserved (no sliding friction on barriers).

use crate::simulation::geometry::Plane;
use crate::simulation::states::{Body, NVec3};

/// A closed half-space constraint. Fixed once registered with the world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Barrier {
    plane: Plane,
}

impl Barrier {
    /// Barrier from an arbitrary (non-zero) normal; the normal is
    /// normalised and the shift rescaled to match.
    pub fn new(normal: NVec3, shift: f64) -> Self {
        Self {
            plane: Plane::new(normal, shift),
        }
    }

    pub fn normal(&self) -> NVec3 {
        self.plane.normal
    }

    pub fn shift(&self) -> f64 {
        self.plane.shift
    }

    /// Boundary plane, for renderers that trace the barrier.
    pub fn plane(&self) -> Plane {
        self.plane
    }

    /// Project a penetrating body back to the surface and cancel its
    /// inward velocity component.
    pub fn project(&self, body: &mut Body) {
        let depth = self.plane.signed_distance(&body.x);
        if depth < 0.0 {
            body.x -= depth * self.plane.normal;
            let inward = self.plane.normal.dot(&body.v);
            if inward < 0.0 {
                body.v -= inward * self.plane.normal;
            }
        }
    }
}
