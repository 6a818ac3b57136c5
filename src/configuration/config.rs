//! Configuration types for loading fall scenarios from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! scenario. A scenario consists of:
//!
//! - [`WallConfig`]       – wall angle and the optional ground barrier
//! - [`ClimberConfig`]    – the faller's start position and mass
//! - [`BelayerConfig`]    – the low end of the rope
//! - [`DrawConfig`]       – one entry per deflection point, in rope order
//! - [`RopeConfig`]       – rope material and meshing parameters
//! - [`SimulationConfig`] – step size, duration, snapshot rate, jitter seed
//! - [`ScenarioConfig`]   – top-level wrapper used to load a scenario
//!
//! # YAML format
//! An example scenario YAML matching these types:
//!
//! ```yaml
//! version: 1
//! wall:
//!   angle: 5.0              # overhanging degrees
//!   ground-present: true
//!   ground-level: 0.0
//! climber:
//!   height: 6.0
//!   sideways: 0.0
//!   weight: 70.0
//! belayer:
//!   fixed: true
//! draws:
//!   - height: 5.0
//!     wall-distance: 0.1
//! rope:
//!   segments: 70
//!   elasticity: 0.079       # (1/N) * 1e-3
//!   weight: 0.062           # kg/m
//!   bend-damping: 0.02
//!   stretch-damping: 0.1
//!   friction: 0.125
//!   slack: 0.1
//! simulation:
//!   step-size: 0.01         # milliseconds
//!   duration: 2.0
//!   frame-rate: 40.0
//!   jitter-seed: 42
//! ```
//!
//! Every recognised option carries a [min, max] range. Out-of-range values
//! are clamped, not rejected; each clamp is surfaced through the log sink.
//! Missing values take the documented defaults. [`ScenarioConfig::normalize`]
//! resolves the tree into the concrete [`ScenarioOptions`] the scenario
//! builder consumes.

use serde::Deserialize;

/// Wall plane and the optional ground barrier.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", default)]
pub struct WallConfig {
    pub angle: Option<f64>, // overhanging degrees
    pub ground_present: Option<bool>,
    pub ground_level: Option<f64>, // metres
}

/// Initial state of the climber body.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", default)]
pub struct ClimberConfig {
    pub height: Option<f64>, // metres above the belayer
    pub sideways: Option<f64>, // metres along the wall
    pub weight: Option<f64>, // kg
    pub wall_distance: Option<f64>, // metres out from the wall surface
}

/// The low end of the rope: fixed anchor or a belayer with mass.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", default)]
pub struct BelayerConfig {
    pub fixed: Option<bool>,
    pub fixed_anchor: Option<bool>, // alias; either flag pins the anchor
    pub weight: Option<f64>, // kg, used when not fixed
    pub wall_distance: Option<f64>,
}

/// Placement of one deflection point, in rope order from the belayer.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", default)]
pub struct DrawConfig {
    pub height: Option<f64>,
    pub sideways: Option<f64>,
    pub wall_distance: Option<f64>,
}

/// Rope material and meshing parameters.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", default)]
pub struct RopeConfig {
    pub segments: Option<usize>, // initial segment count
    pub elasticity: Option<f64>, // (1/N) * 1e-3; stored scaled to 1/N
    pub weight: Option<f64>, // linear density in kg/m
    pub bend_damping: Option<f64>, // transverse damping
    pub stretch_damping: Option<f64>, // longitudinal damping
    pub friction: Option<f64>, // capstan coefficient of the draws
    pub slack: Option<f64>, // unstretched length beyond the polyline
}

/// Numerical parameters of the advance loop.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", default)]
pub struct SimulationConfig {
    pub step_size: Option<f64>, // milliseconds; stored as seconds
    pub duration: Option<f64>, // seconds
    pub frame_rate: Option<f64>, // snapshots per second
    pub jitter_seed: Option<u64>, // seed of the construction jitter
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", default)]
pub struct ScenarioConfig {
    pub version: Option<u32>, // carried through to snapshots unchanged
    pub wall: WallConfig,
    pub climber: ClimberConfig,
    pub belayer: BelayerConfig,
    pub draws: Vec<DrawConfig>,
    pub draw_count: Option<usize>, // pads `draws` when longer than the list
    pub last_draw_height: Option<f64>, // height the padded draws climb to
    pub rope: RopeConfig,
    pub simulation: SimulationConfig,
}

/// A fully resolved deflection-point placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawPlacement {
    pub height: f64,
    pub sideways: f64,
    pub wall_distance: f64,
}

/// Concrete option values after defaulting and clamping.
#[derive(Debug, Clone)]
pub struct ScenarioOptions {
    pub version: u32,
    pub wall_angle: f64, // degrees
    pub ground_present: bool,
    pub ground_level: f64,
    pub climber_height: f64,
    pub climber_sideways: f64,
    pub climber_weight: f64,
    pub climber_wall_distance: f64,
    pub belayer_fixed: bool,
    pub belayer_weight: f64,
    pub belayer_wall_distance: f64,
    pub draws: Vec<DrawPlacement>,
    pub rope_segments: usize,
    pub elasticity: f64, // 1/N after scaling
    pub rope_weight: f64,
    pub bend_damping: f64,
    pub stretch_damping: f64,
    pub friction: f64,
    pub slack: f64,
    pub max_step: f64, // seconds
    pub duration: f64,
    pub frame_rate: f64,
    pub jitter_seed: u64,
}

/// Clamp `value` into [min, max]; surface the adjustment as a warning.
fn clamp_option(name: &str, value: f64, min: f64, max: f64) -> f64 {
    if value < min || value > max {
        log::warn!("option {name} = {value} outside [{min}, {max}]; clamping");
        value.clamp(min, max)
    } else {
        value
    }
}

impl ScenarioConfig {
    /// Resolve defaults, clamp every option into its range, and pad the
    /// draw list up to `draw-count`.
    pub fn normalize(&self) -> ScenarioOptions {
        let climber_height =
            clamp_option("climber-height", self.climber.height.unwrap_or(6.0), 0.1, 100.0);

        let mut draws: Vec<DrawPlacement> = Vec::new();
        let count = clamp_option(
            "draw-count",
            self.draw_count.unwrap_or(self.draws.len()) as f64,
            0.0,
            20.0,
        ) as usize;
        for cfg in self.draws.iter().take(count) {
            draws.push(DrawPlacement {
                height: clamp_option("draw-height", cfg.height.unwrap_or(0.0), 0.0, 100.0),
                sideways: clamp_option("draw-sideways", cfg.sideways.unwrap_or(0.0), -10.0, 10.0),
                wall_distance: clamp_option(
                    "draw-wall-distance",
                    cfg.wall_distance.unwrap_or(0.1),
                    0.0,
                    2.0,
                ),
            });
        }
        // Pad missing draws evenly from the last known height up to
        // last-draw-height (the highest deflection point).
        let missing = count - draws.len();
        if missing > 0 {
            let top = clamp_option(
                "last-draw-height",
                self.last_draw_height.unwrap_or(climber_height - 1.0),
                0.0,
                climber_height,
            );
            let base = draws.last().map_or(0.0, |d| d.height);
            for j in 1..=missing {
                draws.push(DrawPlacement {
                    height: base + (top - base) * j as f64 / missing as f64,
                    sideways: 0.0,
                    wall_distance: 0.1,
                });
            }
        }

        let belayer_fixed = self.belayer.fixed.unwrap_or(true)
            || self.belayer.fixed_anchor.unwrap_or(false);

        ScenarioOptions {
            version: self.version.unwrap_or(1),
            wall_angle: clamp_option("wall-angle", self.wall.angle.unwrap_or(0.0), 0.0, 60.0),
            ground_present: self.wall.ground_present.unwrap_or(false),
            ground_level: clamp_option(
                "ground-level",
                self.wall.ground_level.unwrap_or(0.0),
                -10.0,
                10.0,
            ),
            climber_height,
            climber_sideways: clamp_option(
                "climber-sideways",
                self.climber.sideways.unwrap_or(0.0),
                -10.0,
                10.0,
            ),
            climber_weight: clamp_option(
                "climber-weight",
                self.climber.weight.unwrap_or(70.0),
                10.0,
                200.0,
            ),
            climber_wall_distance: clamp_option(
                "climber-wall-distance",
                self.climber.wall_distance.unwrap_or(0.3),
                0.0,
                2.0,
            ),
            belayer_fixed,
            belayer_weight: clamp_option(
                "belayer-weight",
                self.belayer.weight.unwrap_or(80.0),
                30.0,
                150.0,
            ),
            belayer_wall_distance: clamp_option(
                "belayer-wall-distance",
                self.belayer.wall_distance.unwrap_or(0.5),
                0.0,
                2.0,
            ),
            draws,
            rope_segments: clamp_option(
                "rope-segments",
                self.rope.segments.unwrap_or(70) as f64,
                1.0,
                500.0,
            ) as usize,
            elasticity: clamp_option(
                "elasticity-constant",
                self.rope.elasticity.unwrap_or(0.079),
                0.001,
                10.0,
            ) * 1.0e-3,
            rope_weight: clamp_option("rope-weight", self.rope.weight.unwrap_or(0.062), 0.0, 1.0),
            bend_damping: clamp_option(
                "rope-bend-damping",
                self.rope.bend_damping.unwrap_or(0.02),
                0.0,
                10.0,
            ),
            stretch_damping: clamp_option(
                "rope-stretch-damping",
                self.rope.stretch_damping.unwrap_or(0.1),
                0.0,
                10.0,
            ),
            friction: clamp_option(
                "friction-coefficient",
                self.rope.friction.unwrap_or(0.125),
                0.0,
                2.0,
            ),
            slack: clamp_option("slack", self.rope.slack.unwrap_or(0.1), -5.0, 20.0),
            max_step: clamp_option(
                "physics-step-size",
                self.simulation.step_size.unwrap_or(0.01),
                0.001,
                10.0,
            ) / 1000.0,
            duration: clamp_option(
                "simulation-duration",
                self.simulation.duration.unwrap_or(2.0),
                0.1,
                600.0,
            ),
            frame_rate: clamp_option(
                "frame-rate",
                self.simulation.frame_rate.unwrap_or(40.0),
                1.0,
                1000.0,
            ),
            jitter_seed: self.simulation.jitter_seed.unwrap_or(0),
        }
    }
}
