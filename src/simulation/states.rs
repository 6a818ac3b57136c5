//! Core state types for the rope-fall simulation.
//!
//! Defines the building blocks shared by every other module:
//! - `NVec3` — the `nalgebra` vector alias all positions/velocities/forces use
//! - `Body` — a point mass with accumulated force and a rolling force average
//! - `ForceAverage` — time-weighted window over force magnitudes
//! - `World` — the arena owning all bodies and barriers plus the clock
//!
//! Bodies are addressed by index into `World::bodies`; structural changes
//! (rope re-meshing) retire bodies in place instead of removing them, so
//! indices held elsewhere stay valid for the life of the simulation.

use std::collections::VecDeque;

use nalgebra::Vector3;

use crate::simulation::barrier::Barrier;

pub type NVec3 = Vector3<f64>;

/// Default length of the rolling force-average window, in seconds.
pub const FORCE_AVG_WINDOW: f64 = 0.05;

/// Role tag consumed by downstream renderers and by snapshot generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Anchor, // belayer / fixed anchor at the low end of the rope
    Quickdraw, // deflection point the rope threads through
    Climber, // the faller at the high end
    RopeJoint, // intermediate joint between two rope segments
    Generic,
}

/// Time-weighted rolling window over force magnitudes.
///
/// Entries are keyed by their step width and trimmed from the front once
/// the window holds more than `window` seconds. Tracks both the running
/// maximum of the window average and the raw peak magnitude.
#[derive(Debug, Clone)]
pub struct ForceAverage {
    window: f64, // window length in seconds
    entries: VecDeque<(f64, f64)>, // (step width, magnitude)
    weighted_sum: f64, // sum of magnitude * width over the window
    total_width: f64, // sum of widths over the window
    max_average: f64, // running maximum of average()
    peak: f64, // running maximum of raw magnitudes
}

impl ForceAverage {
    pub fn new(window: f64) -> Self {
        Self {
            window,
            entries: VecDeque::new(),
            weighted_sum: 0.0,
            total_width: 0.0,
            max_average: 0.0,
            peak: 0.0,
        }
    }

    /// Record one step's magnitude, weighted by the step width `dt`,
    /// and evict entries that have fallen out of the window.
    pub fn record(&mut self, dt: f64, magnitude: f64) {
        self.entries.push_back((dt, magnitude));
        self.weighted_sum += magnitude * dt;
        self.total_width += dt;

        while self.total_width > self.window && self.entries.len() > 1 {
            let (w, m) = self.entries.pop_front().expect("non-empty deque");
            self.weighted_sum -= m * w;
            self.total_width -= w;
        }

        let avg = self.average();
        if avg > self.max_average {
            self.max_average = avg;
        }
        if magnitude > self.peak {
            self.peak = magnitude;
        }
    }

    /// Most recently recorded magnitude.
    pub fn last(&self) -> f64 {
        self.entries.back().map_or(0.0, |&(_, m)| m)
    }

    /// Time-averaged magnitude over the current window.
    pub fn average(&self) -> f64 {
        if self.total_width > 0.0 {
            self.weighted_sum / self.total_width
        } else {
            0.0
        }
    }

    pub fn window(&self) -> f64 {
        self.window
    }

    /// Running maximum of the window average.
    pub fn max_average(&self) -> f64 {
        self.max_average
    }

    /// Running maximum of the raw per-step magnitudes.
    pub fn peak(&self) -> f64 {
        self.peak
    }
}

#[derive(Debug, Clone)]
pub struct Body {
    pub id: u64, // unique identity, allocated by the world
    pub name: String,
    pub kind: BodyKind,
    pub x: NVec3, // position
    pub v: NVec3, // velocity
    pub f: NVec3, // accumulated force for the current step
    pub m: f64, // mass; 0 encodes a fixed body
    pub damping: f64, // velocity damping factor per second, in (0, 1]
    pub mu: f64, // friction coefficient, used only as a deflection point
    pub active: bool, // retired bodies stay in the arena but are skipped
    force_avg: ForceAverage,
    max_speed: f64, // running maximum of |v|
}

impl Body {
    pub fn new(name: impl Into<String>, kind: BodyKind, x: NVec3, m: f64) -> Self {
        Self {
            id: 0,
            name: name.into(),
            kind,
            x,
            v: NVec3::zeros(),
            f: NVec3::zeros(),
            m,
            damping: 1.0,
            mu: 0.0,
            active: true,
            force_avg: ForceAverage::new(FORCE_AVG_WINDOW),
            max_speed: 0.0,
        }
    }

    /// An immovable body (mass 0).
    pub fn fixed(name: impl Into<String>, kind: BodyKind, x: NVec3) -> Self {
        Self::new(name, kind, x, 0.0)
    }

    /// An intermediate rope joint; mass is assigned by the re-meshing logic.
    pub fn joint(x: NVec3, v: NVec3) -> Self {
        let mut body = Self::new("joint", BodyKind::RopeJoint, x, 0.0);
        body.v = v;
        body
    }

    pub fn with_velocity(mut self, v: NVec3) -> Self {
        self.v = v;
        self
    }

    pub fn with_friction(mut self, mu: f64) -> Self {
        self.mu = mu;
        self
    }

    pub fn is_movable(&self) -> bool {
        self.m > 0.0
    }

    pub fn apply_force(&mut self, force: NVec3) {
        self.f += force;
    }

    pub fn clear_force(&mut self) {
        self.f = NVec3::zeros();
    }

    /// Instantaneous force magnitude.
    pub fn force(&self) -> f64 {
        self.f.norm()
    }

    /// Time-averaged force magnitude over the rolling window.
    pub fn avg_force(&self) -> f64 {
        self.force_avg.average()
    }

    pub fn avg_window(&self) -> f64 {
        self.force_avg.window()
    }

    /// Running maximum of the averaged force.
    pub fn max_avg_force(&self) -> f64 {
        self.force_avg.max_average()
    }

    pub fn max_speed(&self) -> f64 {
        self.max_speed
    }

    /// Feed the force window and the speed maximum after a step of `dt`.
    pub fn record_step(&mut self, dt: f64) {
        let magnitude = self.force();
        self.force_avg.record(dt, magnitude);
        let speed = self.v.norm();
        if speed > self.max_speed {
            self.max_speed = speed;
        }
    }

    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.m * self.v.norm_squared()
    }

    /// Gravitational potential energy relative to the world origin.
    pub fn potential_energy(&self, gravity: &NVec3) -> f64 {
        -self.m * gravity.dot(&self.x)
    }
}

/// The arena owning all bodies and barriers, plus global constants.
///
/// Constructed once per simulation; every per-step operation reads and
/// writes through it. The identity counter lives here so body ids stay
/// unique across re-meshing.
#[derive(Debug, Clone)]
pub struct World {
    pub bodies: Vec<Body>,
    pub barriers: Vec<Barrier>,
    pub gravity: NVec3, // m/s^2
    pub t: f64, // simulation time in seconds
    next_id: u64,
}

impl World {
    pub fn new(gravity: NVec3) -> Self {
        Self {
            bodies: Vec::new(),
            barriers: Vec::new(),
            gravity,
            t: 0.0,
            next_id: 0,
        }
    }

    /// Register a body, assign its identity, and return its arena index.
    pub fn add_body(&mut self, mut body: Body) -> usize {
        body.id = self.allocate_id();
        self.bodies.push(body);
        self.bodies.len() - 1
    }

    /// Draw the next identity from the process-wide monotonic counter.
    pub fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Barriers are applied in insertion order.
    pub fn add_barrier(&mut self, barrier: Barrier) {
        self.barriers.push(barrier);
    }

    pub fn clear_forces(&mut self) {
        for body in self.bodies.iter_mut().filter(|b| b.active) {
            body.clear_force();
        }
    }

    /// F += m * g on every active movable body.
    pub fn apply_gravity(&mut self) {
        let g = self.gravity;
        for body in self.bodies.iter_mut().filter(|b| b.active && b.is_movable()) {
            let weight = body.m * g;
            body.apply_force(weight);
        }
    }

    /// Project every active movable body back to the allowed side of each
    /// barrier, in insertion order.
    pub fn project_barriers(&mut self) {
        for barrier in &self.barriers {
            for body in self.bodies.iter_mut().filter(|b| b.active && b.is_movable()) {
                barrier.project(body);
            }
        }
    }

    pub fn kinetic_energy(&self) -> f64 {
        self.bodies
            .iter()
            .filter(|b| b.active)
            .map(|b| b.kinetic_energy())
            .sum()
    }

    pub fn potential_energy(&self) -> f64 {
        self.bodies
            .iter()
            .filter(|b| b.active)
            .map(|b| b.potential_energy(&self.gravity))
            .sum()
    }
}
