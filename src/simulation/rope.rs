//! The segmented elastic rope: spring/damping forces, capstan sliding at
//! deflection points, and post-step re-meshing.
//!
//! A rope is an ordered list of segments S0..Sk-1 bridged by joint bodies
//! B0..Bk, with B0 the belayer end and Bk the climber end. Segments do not
//! store their endpoints; `joints[i]` / `joints[i + 1]` provide them, so
//! merging and splitting never fixes up endpoint back-references. All body
//! references are indices into the world's body arena.
//!
//! Per step the rope runs three passes, in order:
//! 1. `apply_forces`   — sub-edge tensions plus transverse/longitudinal damping
//! 2. `update_sliding` — capstan friction and rest-length transport at each
//!    threaded deflection point
//! 3. `remesh`         — merge boundary pieces below the minimum length,
//!    split boundary pieces above the maximum length

use crate::error::SimError;
use crate::simulation::states::{Body, ForceAverage, NVec3, World, FORCE_AVG_WINDOW};

/// Allowed drift between a segment's stored rest length and the sum of its
/// rest-length partition.
const PARTITION_EPS: f64 = 1.0e-10;

/// One spring-damper span between two joint bodies.
///
/// `partitions` holds the rest lengths of the sub-pieces separated by the
/// threaded deflection points (always `deflections.len() + 1` entries,
/// summing to `rest_len`); `slide_speeds` holds the signed rope speed
/// through each deflection point, positive from the belayer side toward
/// the climber side.
#[derive(Debug, Clone)]
pub struct RopeSegment {
    pub mass: f64, // kg, distributed to the neighbouring joints
    pub rest_len: f64, // unstretched length in metres
    pub deflections: Vec<usize>, // body indices of threaded deflection points
    pub partitions: Vec<f64>, // rest length of each sub-piece
    pub slide_speeds: Vec<f64>, // signed sliding speed at each deflection
}

impl RopeSegment {
    /// A segment threading no deflection points.
    pub fn plain(mass: f64, rest_len: f64) -> Self {
        Self {
            mass,
            rest_len,
            deflections: Vec::new(),
            partitions: vec![rest_len],
            slide_speeds: Vec::new(),
        }
    }
}

/// The ordered chain of segments and joint bodies.
#[derive(Debug, Clone)]
pub struct Rope {
    pub id: u64, // identity under which the rope appears in snapshots
    pub segments: Vec<RopeSegment>,
    pub joints: Vec<usize>, // body indices; joints[i]/joints[i+1] bridge segments[i]
    pub elasticity: f64, // 1/N; tension = strain / elasticity
    pub default_len: f64, // rest length of a freshly split segment
    pub min_len: f64, // merge bound, 0.01 * default_len
    pub max_len: f64, // split bound, 1.1 * default_len
    pub bend_damping: f64, // transverse damping coefficient
    pub stretch_damping: f64, // longitudinal damping coefficient
    tension_avg: ForceAverage, // rolling window over the peak sub-edge tension
}

impl Rope {
    pub fn new(
        id: u64,
        segments: Vec<RopeSegment>,
        joints: Vec<usize>,
        elasticity: f64,
        default_len: f64,
        bend_damping: f64,
        stretch_damping: f64,
    ) -> Self {
        debug_assert_eq!(joints.len(), segments.len() + 1);
        Self {
            id,
            segments,
            joints,
            elasticity,
            default_len,
            min_len: 0.01 * default_len,
            max_len: 1.1 * default_len,
            bend_damping,
            stretch_damping,
            tension_avg: ForceAverage::new(FORCE_AVG_WINDOW),
        }
    }

    // =====================================================================
    // Derived quantities
    // =====================================================================

    /// Sum of segment rest lengths; conserved by sliding and re-meshing.
    pub fn total_rest_len(&self) -> f64 {
        self.segments.iter().map(|s| s.rest_len).sum()
    }

    /// Sum of segment masses; conserved by re-meshing.
    pub fn total_mass(&self) -> f64 {
        self.segments.iter().map(|s| s.mass).sum()
    }

    /// Stretched length of segment `i` along its threaded polyline.
    pub fn segment_len(&self, world: &World, i: usize) -> f64 {
        let pts = self.polyline(world, i);
        pts.windows(2).map(|w| (w[1] - w[0]).norm()).sum()
    }

    /// Segment-level tension (stretched length against total rest length).
    pub fn segment_tension(&self, world: &World, i: usize) -> f64 {
        let seg = &self.segments[i];
        (self.segment_len(world, i) - seg.rest_len) / (seg.rest_len * self.elasticity)
    }

    /// Elastic energy stored in segment `i`.
    pub fn segment_elastic_energy(&self, world: &World, i: usize) -> f64 {
        let seg = &self.segments[i];
        let stretch = self.segment_len(world, i) - seg.rest_len;
        0.5 * stretch * stretch / (seg.rest_len * self.elasticity)
    }

    pub fn elastic_energy(&self, world: &World) -> f64 {
        (0..self.segments.len())
            .map(|i| self.segment_elastic_energy(world, i))
            .sum()
    }

    /// Kinetic energy of the interior joint bodies.
    pub fn kinetic_energy(&self, world: &World) -> f64 {
        self.interior_joints()
            .map(|idx| world.bodies[idx].kinetic_energy())
            .sum()
    }

    /// Gravitational potential energy of the interior joint bodies.
    pub fn potential_energy(&self, world: &World) -> f64 {
        self.interior_joints()
            .map(|idx| world.bodies[idx].potential_energy(&world.gravity))
            .sum()
    }

    /// The full belayer -> deflections -> climber polyline.
    pub fn positions(&self, world: &World) -> Vec<NVec3> {
        let mut pts = vec![world.bodies[self.joints[0]].x];
        for (i, seg) in self.segments.iter().enumerate() {
            for &d in &seg.deflections {
                pts.push(world.bodies[d].x);
            }
            pts.push(world.bodies[self.joints[i + 1]].x);
        }
        pts
    }

    pub fn tension_window(&self) -> &ForceAverage {
        &self.tension_avg
    }

    /// Feed the rope's tension window with this step's peak tension.
    pub fn record_tension(&mut self, dt: f64, peak: f64) {
        self.tension_avg.record(dt, peak);
    }

    fn interior_joints(&self) -> impl Iterator<Item = usize> + '_ {
        self.joints[1..self.joints.len() - 1].iter().copied()
    }

    fn polyline(&self, world: &World, i: usize) -> Vec<NVec3> {
        let seg = &self.segments[i];
        let mut pts = Vec::with_capacity(seg.deflections.len() + 2);
        pts.push(world.bodies[self.joints[i]].x);
        for &d in &seg.deflections {
            pts.push(world.bodies[d].x);
        }
        pts.push(world.bodies[self.joints[i + 1]].x);
        pts
    }

    /// Unit vectors and tensions of the sub-edges of segment `i`, walking
    /// the polyline from the belayer side toward the climber side.
    fn edge_tensions(
        &self,
        pts: &[NVec3],
        seg: &RopeSegment,
        index: usize,
    ) -> Result<(Vec<NVec3>, Vec<f64>), SimError> {
        let mut units = Vec::with_capacity(pts.len() - 1);
        let mut tensions = Vec::with_capacity(pts.len() - 1);
        for (j, pair) in pts.windows(2).enumerate() {
            let edge = pair[1] - pair[0];
            let len = edge.norm();
            if len == 0.0 {
                return Err(SimError::DegenerateEdge {
                    segment: index,
                    deflections: seg.deflections.len(),
                });
            }
            let rest = seg.partitions[j];
            if rest == 0.0 {
                return Err(SimError::ZeroRestLength {
                    segment: index,
                    deflections: seg.deflections.len(),
                });
            }
            if rest < 0.5 * self.min_len {
                log::warn!(
                    "segment {}: rest partition {} is small ({:.6} m)",
                    index,
                    j,
                    rest
                );
            }
            units.push(edge / len);
            tensions.push((len - rest) / (rest * self.elasticity));
        }
        Ok((units, tensions))
    }

    // =====================================================================
    // Pass 1: spring and damping forces
    // =====================================================================

    /// Accumulate spring and damping forces onto the endpoint bodies of
    /// every segment. Returns the peak positive sub-edge tension of the
    /// step, which feeds the rope's force window.
    ///
    /// Negative tension (compression) pushes the endpoints outward; the
    /// capstan pass treats it as slack.
    pub fn apply_forces(&self, world: &mut World) -> Result<f64, SimError> {
        let mut peak: f64 = 0.0;

        for i in 0..self.segments.len() {
            let seg = &self.segments[i];

            let sum: f64 = seg.partitions.iter().sum();
            if (sum - seg.rest_len).abs() > PARTITION_EPS {
                return Err(SimError::PartitionDrift {
                    segment: i,
                    deflections: seg.deflections.len(),
                    expected: seg.rest_len,
                    actual: sum,
                });
            }

            let pts = self.polyline(world, i);
            let (units, tensions) = self.edge_tensions(&pts, seg, i)?;
            for t in &tensions {
                // compression does not count as tension
                peak = peak.max(*t);
            }

            let a = self.joints[i];
            let b = self.joints[i + 1];
            let last = units.len() - 1;
            let u_a = units[0]; // unit vector from A toward its neighbour
            let u_b = units[last]; // unit vector from the last point toward B

            // Spring: tension of the outer sub-edges pulls the endpoints in
            world.bodies[a].apply_force(tensions[0] * u_a);
            world.bodies[b].apply_force(-tensions[last] * u_b);

            let va = world.bodies[a].v;
            let vb = world.bodies[b].v;

            // Transverse damping: shorter segments resist shear harder
            if world.bodies[a].is_movable() && world.bodies[b].is_movable() {
                let va_perp = va - va.dot(&u_a) * u_a;
                let vb_perp = vb - vb.dot(&u_b) * u_b;
                let shear = -(self.bend_damping / seg.rest_len) * (va_perp + vb_perp);
                world.bodies[a].apply_force(shear);
                world.bodies[b].apply_force(shear);
            }

            // Longitudinal damping against the stretched-length rate
            let rate = va.dot(&-u_a) + vb.dot(&u_b);
            let pull = (self.stretch_damping / seg.rest_len) * rate;
            world.bodies[a].apply_force(pull * u_a);
            world.bodies[b].apply_force(-pull * u_b);
        }

        Ok(peak)
    }

    // =====================================================================
    // Pass 2: capstan sliding at deflection points
    // =====================================================================

    /// Advance the signed sliding speed at every threaded deflection point
    /// and transport rest length between the adjacent partition entries.
    ///
    /// The friction capacity follows the capstan law min(tl, tr) *
    /// (e^(mu*theta) - 1); it opposes the current motion, and at rest it
    /// holds the rope stuck while |tr - tl| stays within the capacity.
    /// Dissipates energy whenever slippage and opposing friction coexist.
    pub fn update_sliding(&mut self, world: &World, dt: f64) -> Result<(), SimError> {
        for i in 0..self.segments.len() {
            if self.segments[i].deflections.is_empty() || self.segments[i].mass <= 0.0 {
                continue;
            }
            let pts = self.polyline(world, i);
            let (units, tensions) = self.edge_tensions(&pts, &self.segments[i], i)?;
            let seg = &mut self.segments[i];

            for k in 0..seg.deflections.len() {
                let tau_l = tensions[k];
                let tau_r = tensions[k + 1];
                let delta = tau_r - tau_l; // positive pulls rope toward B

                let mu = world.bodies[seg.deflections[k]].mu;
                // clamp the cosine so floating-point drift cannot escape acos
                let cos_bend = units[k].dot(&units[k + 1]).clamp(-1.0, 1.0);
                let theta = cos_bend.acos();
                let capacity = if tau_l > 0.0 && tau_r > 0.0 {
                    tau_l.min(tau_r) * ((mu * theta).exp() - 1.0)
                } else {
                    0.0 // slack rope generates no capstan friction
                };

                let speed = seg.slide_speeds[k];
                let effective = if speed > 0.0 {
                    delta - capacity
                } else if speed < 0.0 {
                    delta + capacity
                } else if delta.abs() <= capacity {
                    0.0 // stuck
                } else {
                    delta - delta.signum() * capacity
                };

                let accel = effective / seg.mass;
                let mut next = speed + accel * dt;
                // a crossing through zero that static friction would hold
                // snaps to rest instead of chattering around the sign flip
                if next.abs() + 1.0e-12 < (accel * dt).abs() && delta.abs() <= capacity {
                    next = 0.0;
                }
                seg.slide_speeds[k] = next;

                let carried = next * dt;
                seg.partitions[k] -= carried;
                seg.partitions[k + 1] += carried;
            }
        }
        Ok(())
    }

    // =====================================================================
    // Pass 3: re-meshing
    // =====================================================================

    /// Merge boundary pieces that fell below the minimum length, then split
    /// boundary pieces that outgrew the maximum length. Total rope mass and
    /// total rest length are conserved; interior joint masses are
    /// re-balanced afterwards.
    pub fn remesh(&mut self, world: &mut World) -> Result<(), SimError> {
        self.merge_pass(world);
        self.split_pass(world)?;
        self.rebalance_joint_masses(world);
        Ok(())
    }

    fn merge_pass(&mut self, world: &mut World) {
        let mut i = 0;
        while i < self.segments.len() {
            // piece between A and the first threaded point
            if self.segments[i].partitions[0] < self.min_len {
                if i > 0 {
                    self.merge_segments(world, i - 1);
                    i -= 1;
                    continue;
                } else if !self.segments[i].deflections.is_empty() {
                    // the rope end slips out of its first deflection point
                    let seg = &mut self.segments[i];
                    let absorbed = seg.partitions.remove(0);
                    seg.partitions[0] += absorbed;
                    seg.deflections.remove(0);
                    seg.slide_speeds.remove(0);
                    continue;
                } else {
                    log::warn!(
                        "first rope segment below the merge bound with nothing to merge into"
                    );
                }
            }

            // piece between the last threaded point and B
            let last = self.segments[i].partitions.len() - 1;
            if self.segments[i].partitions[last] < self.min_len {
                if i + 1 < self.segments.len() {
                    self.merge_segments(world, i);
                    continue;
                } else if !self.segments[i].deflections.is_empty() {
                    let seg = &mut self.segments[i];
                    let absorbed = seg.partitions.pop().expect("non-empty partitions");
                    *seg.partitions.last_mut().expect("non-empty partitions") += absorbed;
                    seg.deflections.pop();
                    seg.slide_speeds.pop();
                    continue;
                } else if last > 0 {
                    log::warn!(
                        "last rope segment below the merge bound with nothing to merge into"
                    );
                }
            }

            i += 1;
        }
    }

    /// Merge segments `j` and `j + 1` into one segment at index `j`,
    /// retiring the joint body between them. The partition entries on
    /// either side of the retired joint become a single entry.
    fn merge_segments(&mut self, world: &mut World, j: usize) {
        let right = self.segments.remove(j + 1);
        let joint = self.joints.remove(j + 1);
        world.bodies[joint].active = false;

        let left = &mut self.segments[j];
        left.mass += right.mass;
        left.rest_len += right.rest_len;

        let mut right_parts = right.partitions;
        *left.partitions.last_mut().expect("non-empty partitions") += right_parts.remove(0);
        left.partitions.extend(right_parts);
        left.deflections.extend(right.deflections);
        left.slide_speeds.extend(right.slide_speeds);
    }

    fn split_pass(&mut self, world: &mut World) -> Result<(), SimError> {
        let mut i = 0;
        while i < self.segments.len() {
            let seg = &self.segments[i];
            let n = seg.partitions.len();

            // an oversize piece between two deflections cannot be split
            for j in 1..n.saturating_sub(1) {
                if seg.partitions[j] > self.max_len {
                    return Err(SimError::UnsupportedSplit {
                        segment: i,
                        deflections: seg.deflections.len(),
                    });
                }
            }

            if !seg.deflections.is_empty() && seg.partitions[0] > self.max_len {
                self.split_front(world, i);
                continue; // the remainder may still be over the bound
            }

            let seg = &self.segments[i];
            let last = seg.partitions.len() - 1;
            if !seg.deflections.is_empty() && seg.partitions[last] > self.max_len {
                self.split_back(world, i);
                continue;
            }

            i += 1;
        }
        Ok(())
    }

    /// Split a fresh default-length segment off the belayer side of
    /// segment `i`, in front of its first deflection point. The new joint
    /// inherits the endpoint's velocity; mass moves by rest-length ratio.
    fn split_front(&mut self, world: &mut World, i: usize) {
        let a_idx = self.joints[i];
        let seg = &self.segments[i];
        let frac = self.default_len / seg.partitions[0];
        let a_pos = world.bodies[a_idx].x;
        let a_vel = world.bodies[a_idx].v;
        let d_pos = world.bodies[seg.deflections[0]].x;
        let joint_pos = a_pos + frac * (d_pos - a_pos);
        let piece_mass = seg.mass * self.default_len / seg.rest_len;

        let seg = &mut self.segments[i];
        seg.mass -= piece_mass;
        seg.rest_len -= self.default_len;
        seg.partitions[0] -= self.default_len;

        let joint = world.add_body(Body::joint(joint_pos, a_vel));
        self.joints.insert(i + 1, joint);
        self.segments
            .insert(i, RopeSegment::plain(piece_mass, self.default_len));
    }

    /// Mirror of `split_front` on the climber side, behind the last
    /// deflection point of segment `i`.
    fn split_back(&mut self, world: &mut World, i: usize) {
        let b_idx = self.joints[i + 1];
        let seg = &self.segments[i];
        let last = seg.partitions.len() - 1;
        let frac = self.default_len / seg.partitions[last];
        let b_pos = world.bodies[b_idx].x;
        let b_vel = world.bodies[b_idx].v;
        let d_pos = world.bodies[*seg.deflections.last().expect("deflections checked")].x;
        let joint_pos = b_pos + frac * (d_pos - b_pos);
        let piece_mass = seg.mass * self.default_len / seg.rest_len;

        let seg = &mut self.segments[i];
        seg.mass -= piece_mass;
        seg.rest_len -= self.default_len;
        let last = seg.partitions.len() - 1;
        seg.partitions[last] -= self.default_len;

        let joint = world.add_body(Body::joint(joint_pos, b_vel));
        self.joints.insert(i + 1, joint);
        self.segments
            .insert(i + 1, RopeSegment::plain(piece_mass, self.default_len));
    }

    /// Interior joint mass is half the mass of each neighbouring segment;
    /// a segment at either rope end donates its full mass inward because
    /// the outermost joints (belayer, climber) never receive rope mass.
    pub fn rebalance_joint_masses(&self, world: &mut World) {
        let k = self.segments.len();
        for idx in 1..self.joints.len().saturating_sub(1) {
            let wl = if idx - 1 == 0 { 1.0 } else { 0.5 };
            let wr = if idx == k - 1 { 1.0 } else { 0.5 };
            world.bodies[self.joints[idx]].m =
                wl * self.segments[idx - 1].mass + wr * self.segments[idx].mass;
        }
    }
}
