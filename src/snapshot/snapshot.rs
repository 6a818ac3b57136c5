//! Immutable per-frame records consumed by downstream rendering and
//! persistence.
//!
//! A snapshot is a JSON-compatible value tree: one record per visible
//! body plus one record for the rope polyline, each carrying forces,
//! energies and drawing hints. Colours round-trip through their CSS
//! textual form ("rgb(r,g,b)" / "rgba(r,g,b,a)").

use std::fmt;
use std::str::FromStr;

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::simulation::rope::Rope;
use crate::simulation::states::{Body, BodyKind, NVec3, World};

/// An RGB colour with optional alpha, serialised as CSS text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: Option<f64>,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: None }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a: Some(a) }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.a {
            Some(a) => write!(f, "rgba({},{},{},{})", self.r, self.g, self.b, a),
            None => write!(f, "rgb({},{},{})", self.r, self.g, self.b),
        }
    }
}

impl FromStr for Color {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (body, has_alpha) = if let Some(rest) = s.strip_prefix("rgba(") {
            (rest, true)
        } else if let Some(rest) = s.strip_prefix("rgb(") {
            (rest, false)
        } else {
            return Err(format!("not a colour: {s:?}"));
        };
        let body = body
            .strip_suffix(')')
            .ok_or_else(|| format!("unterminated colour: {s:?}"))?;
        let parts: Vec<&str> = body.split(',').map(str::trim).collect();
        let expected = if has_alpha { 4 } else { 3 };
        if parts.len() != expected {
            return Err(format!("expected {expected} components: {s:?}"));
        }
        let channel = |p: &str| p.parse::<u8>().map_err(|e| format!("bad channel {p:?}: {e}"));
        Ok(Self {
            r: channel(parts[0])?,
            g: channel(parts[1])?,
            b: channel(parts[2])?,
            a: if has_alpha {
                Some(
                    parts[3]
                        .parse::<f64>()
                        .map_err(|e| format!("bad alpha {:?}: {e}", parts[3]))?,
                )
            } else {
                None
            },
        })
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(D::Error::custom)
    }
}

/// Visible state of one record: a point mass or the rope polyline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Shape {
    PointMass {
        position: [f64; 3],
        color: Color,
        radius: f64,
    },
    Rope {
        points: Vec<[f64; 3]>,
        color: Color,
        thickness: f64,
    },
}

/// Per-body state within one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BodyRecord {
    pub id: u64,
    pub name: String,
    pub force: f64, // instantaneous force magnitude
    pub avg_force: f64, // window-averaged force magnitude
    pub avg_window: f64, // window length in seconds
    pub kinetic_energy: f64,
    pub potential_energy: f64,
    pub elastic_energy: f64,
    pub total_energy: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_force: Option<f64>, // running maximum of the averaged force
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_speed: Option<f64>, // running maximum of the speed
    pub shape: Shape,
}

/// One frame of the simulation, immutable once captured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Snapshot {
    pub time: f64,
    pub version: u32, // configuration version, carried through unchanged
    pub bodies: Vec<BodyRecord>,
}

fn vec_to_array(v: &NVec3) -> [f64; 3] {
    [v.x, v.y, v.z]
}

/// Default drawing hints per body role.
fn point_hints(kind: BodyKind) -> (Color, f64) {
    match kind {
        BodyKind::Anchor => (Color::rgb(96, 96, 96), 0.2),
        BodyKind::Quickdraw => (Color::rgb(192, 192, 192), 0.1),
        BodyKind::Climber => (Color::rgb(204, 51, 51), 0.25),
        BodyKind::RopeJoint | BodyKind::Generic => (Color::rgb(128, 128, 128), 0.05),
    }
}

const ROPE_COLOR: Color = Color::rgb(51, 102, 204);
const ROPE_THICKNESS: f64 = 0.04;

impl BodyRecord {
    /// Record for a visible point mass.
    pub fn point_mass(body: &Body, world: &World) -> Self {
        let (color, radius) = point_hints(body.kind);
        let kinetic = body.kinetic_energy();
        let potential = body.potential_energy(&world.gravity);
        Self {
            id: body.id,
            name: body.name.clone(),
            force: body.force(),
            avg_force: body.avg_force(),
            avg_window: body.avg_window(),
            kinetic_energy: kinetic,
            potential_energy: potential,
            elastic_energy: 0.0,
            total_energy: kinetic + potential,
            max_force: Some(body.max_avg_force()),
            max_speed: Some(body.max_speed()),
            shape: Shape::PointMass {
                position: vec_to_array(&body.x),
                color,
                radius,
            },
        }
    }

    /// Record for the rope: its polyline plus the energies of its interior
    /// joints and segments. Force fields report the peak sub-edge tension.
    pub fn rope(rope: &Rope, world: &World) -> Self {
        let kinetic = rope.kinetic_energy(world);
        let potential = rope.potential_energy(world);
        let elastic = rope.elastic_energy(world);
        let window = rope.tension_window();
        Self {
            id: rope.id,
            name: "rope".to_owned(),
            force: window.last(),
            avg_force: window.average(),
            avg_window: window.window(),
            kinetic_energy: kinetic,
            potential_energy: potential,
            elastic_energy: elastic,
            total_energy: kinetic + potential + elastic,
            max_force: Some(window.max_average()),
            max_speed: None,
            shape: Shape::Rope {
                points: rope.positions(world).iter().map(vec_to_array).collect(),
                color: ROPE_COLOR,
                thickness: ROPE_THICKNESS,
            },
        }
    }
}

impl Snapshot {
    /// Capture the current world state: one record per visible body
    /// (joints are traced by the rope polyline instead) plus the rope.
    pub fn capture(world: &World, rope: &Rope, version: u32) -> Self {
        let mut bodies: Vec<BodyRecord> = world
            .bodies
            .iter()
            .filter(|b| b.active && b.kind != BodyKind::RopeJoint)
            .map(|b| BodyRecord::point_mass(b, world))
            .collect();
        bodies.push(BodyRecord::rope(rope, world));
        Self {
            time: world.t,
            version,
            bodies,
        }
    }
}
