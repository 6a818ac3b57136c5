//! Build a fully-initialized simulation from configuration
//!
//! Takes a `ScenarioConfig` (YAML-facing) and produces the runtime bundle
//! consumed by the engine:
//! - world state (bodies at t = 0, wall and optional ground barriers)
//! - the segmented rope threaded through the configured draws
//! - numerical parameters (`Parameters`)
//!
//! Construction seeds the belayer, draws and climber along the wall plane,
//! applies a small seeded jitter to break perfect symmetry, cuts the
//! polyline into segments of equal stretched length, and finishes with one
//! re-meshing pass to absorb sub-pieces already below the merge bound.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::configuration::config::{ScenarioConfig, ScenarioOptions};
use crate::error::SimError;
use crate::simulation::barrier::Barrier;
use crate::simulation::params::Parameters;
use crate::simulation::rope::{Rope, RopeSegment};
use crate::simulation::states::{Body, BodyKind, NVec3, World};

/// Symmetric uniform jitter applied to every seeded coordinate, in metres.
const JITTER: f64 = 0.01;

/// A fully-initialized runtime bundle: world, rope and parameters.
pub struct Scenario {
    pub world: World,
    pub rope: Rope,
    pub parameters: Parameters,
}

impl Scenario {
    pub fn build(cfg: &ScenarioConfig) -> Result<Self, SimError> {
        Self::from_options(&cfg.normalize())
    }

    pub fn from_options(opts: &ScenarioOptions) -> Result<Self, SimError> {
        let parameters = Parameters {
            max_step: opts.max_step,
            duration: opts.duration,
            frame_rate: opts.frame_rate,
            jitter_seed: opts.jitter_seed,
            version: opts.version,
            ..Parameters::default()
        };
        let mut world = World::new(parameters.gravity);
        let mut rng = SmallRng::seed_from_u64(opts.jitter_seed);
        let mut jitter = |p: NVec3| {
            NVec3::new(
                p.x + rng.gen_range(-JITTER..=JITTER),
                p.y + rng.gen_range(-JITTER..=JITTER),
                p.z + rng.gen_range(-JITTER..=JITTER),
            )
        };

        // x = sideways, y = up, z = out of the wall; the wall surface leans
        // over the route by the overhang angle
        let angle = opts.wall_angle.to_radians();
        let lean = angle.tan();
        let place =
            |height: f64, sideways: f64, distance: f64| NVec3::new(sideways, height, height * lean + distance);

        let belayer_pos = jitter(place(0.0, 0.0, opts.belayer_wall_distance));
        let climber_pos = jitter(place(
            opts.climber_height,
            opts.climber_sideways,
            opts.climber_wall_distance,
        ));
        let draw_pos: Vec<NVec3> = opts
            .draws
            .iter()
            .map(|d| jitter(place(d.height, d.sideways, d.wall_distance)))
            .collect();

        let belayer_mass = if opts.belayer_fixed { 0.0 } else { opts.belayer_weight };
        let belayer = world.add_body(Body::new(
            "belayer",
            BodyKind::Anchor,
            belayer_pos,
            belayer_mass,
        ));
        let climber = world.add_body(Body::new(
            "climber",
            BodyKind::Climber,
            climber_pos,
            opts.climber_weight,
        ));
        let draw_bodies: Vec<usize> = draw_pos
            .iter()
            .enumerate()
            .map(|(i, &p)| {
                world.add_body(
                    Body::fixed(format!("draw {i}"), BodyKind::Quickdraw, p)
                        .with_friction(opts.friction),
                )
            })
            .collect();

        // The rope's path at t = 0: belayer -> draws -> climber
        let mut verts = vec![(belayer, belayer_pos)];
        for (i, &p) in draw_pos.iter().enumerate() {
            verts.push((draw_bodies[i], p));
        }
        verts.push((climber, climber_pos));

        let mut arc = vec![0.0];
        for w in verts.windows(2) {
            arc.push(arc.last().expect("non-empty arc") + (w[1].1 - w[0].1).norm());
        }
        let stretched_total = *arc.last().expect("non-empty arc");
        let mut rest_total = stretched_total + opts.slack;
        if rest_total <= 0.0 {
            log::warn!(
                "slack {} leaves no rope for a {:.2} m path; limiting pre-tension",
                opts.slack,
                stretched_total
            );
            rest_total = 0.1 * stretched_total;
        }
        let stretch_factor = stretched_total / rest_total;

        let n = opts.rope_segments;
        let seg_stretch = stretched_total / n as f64;
        let seg_mass = rest_total * opts.rope_weight / n as f64;

        // Position at arc length s along the initial path
        let point_at = |s: f64| -> NVec3 {
            for (j, w) in verts.windows(2).enumerate() {
                if s <= arc[j + 1] || j == verts.len() - 2 {
                    let span = arc[j + 1] - arc[j];
                    let frac = if span > 0.0 { (s - arc[j]) / span } else { 0.0 };
                    return w[0].1 + frac * (w[1].1 - w[0].1);
                }
            }
            verts.last().expect("non-empty verts").1
        };

        // Cut the path into n segments of equal stretched length; draws
        // falling inside a span become that segment's deflection points,
        // and the rest-length partition mirrors the stretched fractions.
        let mut joints = vec![belayer];
        let mut segments = Vec::with_capacity(n);
        let mut vert_cursor = 1;
        for i in 0..n {
            let s0 = i as f64 * seg_stretch;
            let s1 = if i + 1 == n {
                stretched_total
            } else {
                (i + 1) as f64 * seg_stretch
            };

            let mut deflections = Vec::new();
            let mut cuts = vec![s0];
            while vert_cursor < verts.len() - 1 && arc[vert_cursor] < s1 {
                deflections.push(verts[vert_cursor].0);
                cuts.push(arc[vert_cursor]);
                vert_cursor += 1;
            }
            cuts.push(s1);

            let partitions: Vec<f64> = cuts
                .windows(2)
                .map(|c| (c[1] - c[0]) / stretch_factor)
                .collect();
            let rest_len = partitions.iter().sum();
            let slide_speeds = vec![0.0; deflections.len()];

            let end = if i + 1 == n {
                climber
            } else {
                world.add_body(Body::joint(point_at(s1), NVec3::zeros()))
            };
            joints.push(end);
            segments.push(RopeSegment {
                mass: seg_mass,
                rest_len,
                deflections,
                partitions,
                slide_speeds,
            });
        }

        let rope_id = world.allocate_id();
        let default_len = rest_total / n as f64;
        let mut rope = Rope::new(
            rope_id,
            segments,
            joints,
            opts.elasticity,
            default_len,
            opts.bend_damping,
            opts.stretch_damping,
        );
        rope.rebalance_joint_masses(&mut world);

        world.add_barrier(Barrier::new(NVec3::new(0.0, -angle.sin(), angle.cos()), 0.0));
        if opts.ground_present {
            world.add_barrier(Barrier::new(NVec3::new(0.0, 1.0, 0.0), opts.ground_level));
        }

        // Absorb sub-pieces the initial cut left below the merge bound
        rope.remesh(&mut world)?;

        Ok(Self {
            world,
            rope,
            parameters,
        })
    }
}
