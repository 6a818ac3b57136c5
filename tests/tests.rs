use ropefall::{
    euler_step, Barrier, Body, BodyKind, Color, ForceAverage, NVec3, Plane, Rope, RopeSegment,
    ScenarioConfig, SimError, World,
};

/// Gravity used by the component tests.
pub fn test_world() -> World {
    World::new(NVec3::new(0.0, -9.81, 0.0))
}

/// Two fixed endpoint bodies `span` metres apart along z.
pub fn fixed_pair(world: &mut World, span: f64) -> (usize, usize) {
    let a = world.add_body(Body::fixed("a", BodyKind::Anchor, NVec3::zeros()));
    let b = world.add_body(Body::fixed(
        "b",
        BodyKind::Climber,
        NVec3::new(0.0, 0.0, span),
    ));
    (a, b)
}

/// A one-segment rope without deflection points.
pub fn plain_rope(a: usize, b: usize, rest_len: f64, elasticity: f64) -> Rope {
    Rope::new(
        1000,
        vec![RopeSegment::plain(0.5, rest_len)],
        vec![a, b],
        elasticity,
        rest_len,
        0.02,
        0.1,
    )
}

/// A right-angle bend: fixed A, a deflection point at the origin, fixed B,
/// both arms one metre long. `partitions` sets the rest lengths.
pub fn bent_rope(world: &mut World, mu: f64, partitions: [f64; 2]) -> Rope {
    let a = world.add_body(Body::fixed("a", BodyKind::Anchor, NVec3::new(-1.0, 0.0, 0.0)));
    let d = world.add_body(
        Body::fixed("d", BodyKind::Quickdraw, NVec3::zeros()).with_friction(mu),
    );
    let b = world.add_body(Body::fixed(
        "b",
        BodyKind::Climber,
        NVec3::new(0.0, -1.0, 0.0),
    ));
    Rope::new(
        1000,
        vec![RopeSegment {
            mass: 0.1,
            rest_len: partitions[0] + partitions[1],
            deflections: vec![d],
            partitions: partitions.to_vec(),
            slide_speeds: vec![0.0],
        }],
        vec![a, b],
        0.001,
        1.0,
        0.02,
        0.1,
    )
}

// ==================================================================================
// Geometry tests
// ==================================================================================

#[test]
fn plane_distance_and_projection() {
    let plane = Plane::new(NVec3::new(0.0, 1.0, 0.0), 2.0);
    let p = NVec3::new(1.0, 5.0, -3.0);

    assert!((plane.signed_distance(&p) - 3.0).abs() < 1e-12);

    let proj = plane.project_point(&p);
    assert!((proj - NVec3::new(1.0, 2.0, -3.0)).norm() < 1e-12);
}

#[test]
fn plane_normalises_input() {
    let plane = Plane::new(NVec3::new(0.0, 0.0, 2.0), 4.0);
    assert!((plane.normal - NVec3::new(0.0, 0.0, 1.0)).norm() < 1e-12);
    assert!((plane.shift - 2.0).abs() < 1e-12);
}

#[test]
fn plane_line_intersection() {
    let plane = Plane::new(NVec3::new(0.0, 1.0, 0.0), 2.0);

    let hit = plane
        .intersect_line(&NVec3::zeros(), &NVec3::new(0.0, 1.0, 0.0))
        .expect("line crosses plane");
    assert!((hit - NVec3::new(0.0, 2.0, 0.0)).norm() < 1e-12);

    assert!(plane
        .intersect_line(&NVec3::zeros(), &NVec3::new(1.0, 0.0, 0.0))
        .is_none());
}

#[test]
fn plane_plane_intersection() {
    let p1 = Plane::new(NVec3::new(1.0, 0.0, 0.0), 2.0);
    let p2 = Plane::new(NVec3::new(0.0, 1.0, 0.0), 3.0);

    let (point, dir) = p1.intersect_plane(&p2).expect("planes cross");
    assert!(p1.signed_distance(&point).abs() < 1e-12);
    assert!(p2.signed_distance(&point).abs() < 1e-12);
    assert!(dir.dot(&p1.normal).abs() < 1e-12);
    assert!(dir.dot(&p2.normal).abs() < 1e-12);
    assert!((dir.norm() - 1.0).abs() < 1e-12);

    assert!(p1.intersect_plane(&p1).is_none());
}

// ==================================================================================
// Barrier tests
// ==================================================================================

#[test]
fn barrier_projects_position_and_velocity() {
    let barrier = Barrier::new(NVec3::new(0.0, 1.0, 0.0), 0.0);
    let mut body = Body::new("b", BodyKind::Climber, NVec3::new(0.0, -0.5, 0.0), 1.0)
        .with_velocity(NVec3::new(1.0, -2.0, 0.0));

    barrier.project(&mut body);

    // back on the surface, inward velocity zeroed, tangential kept
    assert!((body.x - NVec3::zeros()).norm() < 1e-12);
    assert!((body.v - NVec3::new(1.0, 0.0, 0.0)).norm() < 1e-12);
}

#[test]
fn barrier_leaves_allowed_side_alone() {
    let barrier = Barrier::new(NVec3::new(0.0, 1.0, 0.0), 0.0);
    let mut body = Body::new("b", BodyKind::Climber, NVec3::new(0.0, 0.5, 0.0), 1.0)
        .with_velocity(NVec3::new(0.0, -2.0, 0.0));

    barrier.project(&mut body);

    assert_eq!(body.x, NVec3::new(0.0, 0.5, 0.0));
    assert_eq!(body.v, NVec3::new(0.0, -2.0, 0.0));
}

#[test]
fn barrier_keeps_outward_velocity() {
    let barrier = Barrier::new(NVec3::new(0.0, 1.0, 0.0), 0.0);
    let mut body = Body::new("b", BodyKind::Climber, NVec3::new(0.0, -0.1, 0.0), 1.0)
        .with_velocity(NVec3::new(0.0, 3.0, 0.0));

    barrier.project(&mut body);

    assert!((body.x.y).abs() < 1e-12);
    assert_eq!(body.v, NVec3::new(0.0, 3.0, 0.0));
}

// ==================================================================================
// Force-average window tests
// ==================================================================================

#[test]
fn force_average_evicts_old_entries() {
    let mut avg = ForceAverage::new(0.05);
    avg.record(0.02, 10.0);
    avg.record(0.02, 20.0);
    avg.record(0.02, 30.0);

    // the first entry fell out of the 50 ms window
    assert!((avg.average() - 25.0).abs() < 1e-12);
    assert!((avg.last() - 30.0).abs() < 1e-12);
    assert!((avg.peak() - 30.0).abs() < 1e-12);
    assert!((avg.max_average() - 25.0).abs() < 1e-12);
}

#[test]
fn force_average_empty_reads_zero() {
    let avg = ForceAverage::new(0.05);
    assert_eq!(avg.average(), 0.0);
    assert_eq!(avg.last(), 0.0);
}

// ==================================================================================
// Body and integrator tests
// ==================================================================================

#[test]
fn euler_step_advances_movable_bodies() {
    let mut world = World::new(NVec3::zeros());
    let idx = world.add_body(Body::new("b", BodyKind::Generic, NVec3::zeros(), 2.0));
    world.bodies[idx].apply_force(NVec3::new(0.0, 0.0, 4.0));

    euler_step(&mut world, 0.5);

    assert!((world.bodies[idx].v - NVec3::new(0.0, 0.0, 1.0)).norm() < 1e-12);
    assert!((world.bodies[idx].x - NVec3::new(0.0, 0.0, 0.5)).norm() < 1e-12);
    assert!((world.t - 0.5).abs() < 1e-12);
}

#[test]
fn damping_scales_with_step_width() {
    let mut world = World::new(NVec3::zeros());
    let idx = world.add_body(Body::new("b", BodyKind::Generic, NVec3::zeros(), 2.0));
    world.bodies[idx].damping = 0.25;
    world.bodies[idx].apply_force(NVec3::new(0.0, 0.0, 4.0));

    euler_step(&mut world, 0.5);

    // damping^0.5 = 0.5 applied after the velocity update
    assert!((world.bodies[idx].v - NVec3::new(0.0, 0.0, 0.5)).norm() < 1e-12);
}

#[test]
fn fixed_bodies_never_move() {
    let mut world = test_world();
    let idx = world.add_body(Body::fixed("anchor", BodyKind::Anchor, NVec3::new(1.0, 2.0, 3.0)));
    world.bodies[idx].apply_force(NVec3::new(0.0, -500.0, 0.0));

    for _ in 0..10 {
        euler_step(&mut world, 0.01);
    }

    assert_eq!(world.bodies[idx].x, NVec3::new(1.0, 2.0, 3.0));
    assert_eq!(world.bodies[idx].v, NVec3::zeros());
}

#[test]
fn gravity_skips_fixed_and_inactive_bodies() {
    let mut world = test_world();
    let fixed = world.add_body(Body::fixed("f", BodyKind::Anchor, NVec3::zeros()));
    let moving = world.add_body(Body::new("m", BodyKind::Generic, NVec3::zeros(), 2.0));
    let retired = world.add_body(Body::new("r", BodyKind::Generic, NVec3::zeros(), 2.0));
    world.bodies[retired].active = false;

    world.apply_gravity();

    assert_eq!(world.bodies[fixed].f, NVec3::zeros());
    assert!((world.bodies[moving].f - NVec3::new(0.0, -19.62, 0.0)).norm() < 1e-12);
    assert_eq!(world.bodies[retired].f, NVec3::zeros());
}

#[test]
fn body_energies() {
    let gravity = NVec3::new(0.0, -9.81, 0.0);
    let body = Body::new("b", BodyKind::Climber, NVec3::new(0.0, 2.0, 0.0), 70.0)
        .with_velocity(NVec3::new(0.0, 3.0, 0.0));

    assert!((body.kinetic_energy() - 0.5 * 70.0 * 9.0).abs() < 1e-9);
    assert!((body.potential_energy(&gravity) - 70.0 * 9.81 * 2.0).abs() < 1e-9);
}

// ==================================================================================
// Rope force tests
// ==================================================================================

#[test]
fn stretched_segment_pulls_endpoints_together() {
    let mut world = test_world();
    let (a, b) = fixed_pair(&mut world, 2.0);
    let rope = plain_rope(a, b, 1.0, 0.001);

    let peak = rope.apply_forces(&mut world).expect("forces");

    // tension (2 - 1) / (1 * 0.001) = 1000 N along the segment
    assert!((peak - 1000.0).abs() < 1e-9);
    assert!((world.bodies[a].f - NVec3::new(0.0, 0.0, 1000.0)).norm() < 1e-9);
    assert!((world.bodies[b].f - NVec3::new(0.0, 0.0, -1000.0)).norm() < 1e-9);
}

#[test]
fn compressed_segment_pushes_endpoints_apart() {
    let mut world = test_world();
    let (a, b) = fixed_pair(&mut world, 0.5);
    let rope = plain_rope(a, b, 1.0, 0.001);

    rope.apply_forces(&mut world).expect("forces");

    assert!(world.bodies[a].f.z < 0.0, "A pushed away from B");
    assert!(world.bodies[b].f.z > 0.0, "B pushed away from A");
}

#[test]
fn longitudinal_damping_opposes_lengthening() {
    let mut world = test_world();
    let a = world.add_body(
        Body::new("a", BodyKind::Generic, NVec3::zeros(), 1.0)
            .with_velocity(NVec3::new(0.0, 0.0, -1.0)),
    );
    let b = world.add_body(Body::new(
        "b",
        BodyKind::Generic,
        NVec3::new(0.0, 0.0, 1.0),
        1.0,
    ));
    // rest length matches the span so the spring itself is silent
    let rope = plain_rope(a, b, 1.0, 0.001);

    rope.apply_forces(&mut world).expect("forces");

    // A moves away from B; damping drags it back toward B
    assert!(world.bodies[a].f.z > 0.0);
}

#[test]
fn segment_derived_quantities() {
    let mut world = test_world();
    let (a, b) = fixed_pair(&mut world, 2.0);
    let rope = plain_rope(a, b, 1.0, 0.001);

    assert!((rope.segment_len(&world, 0) - 2.0).abs() < 1e-12);
    assert!((rope.segment_tension(&world, 0) - 1000.0).abs() < 1e-9);
    assert!((rope.segment_elastic_energy(&world, 0) - 500.0).abs() < 1e-9);
}

#[test]
fn collocated_points_are_fatal() {
    let mut world = test_world();
    let (a, b) = fixed_pair(&mut world, 0.0);
    let rope = plain_rope(a, b, 1.0, 0.001);

    match rope.apply_forces(&mut world) {
        Err(SimError::DegenerateEdge { segment: 0, deflections: 0 }) => {}
        other => panic!("expected degenerate edge, got {other:?}"),
    }
}

#[test]
fn partition_drift_is_fatal() {
    let mut world = test_world();
    let (a, b) = fixed_pair(&mut world, 2.0);
    let mut rope = plain_rope(a, b, 1.0, 0.001);
    rope.segments[0].partitions = vec![0.9]; // no longer sums to rest_len

    match rope.apply_forces(&mut world) {
        Err(SimError::PartitionDrift { segment: 0, .. }) => {}
        other => panic!("expected partition drift, got {other:?}"),
    }
}

// ==================================================================================
// Capstan sliding tests
// ==================================================================================

#[test]
fn capstan_holds_small_imbalance() {
    let mut world = test_world();
    let mut rope = bent_rope(&mut world, 0.5, [0.9, 0.89]);

    for _ in 0..100 {
        rope.update_sliding(&world, 1e-3).expect("sliding");
    }

    // |tension difference| stays below the friction capacity: stuck
    assert_eq!(rope.segments[0].slide_speeds[0], 0.0);
    assert_eq!(rope.segments[0].partitions, vec![0.9, 0.89]);
}

#[test]
fn capstan_slips_under_large_imbalance() {
    let mut world = test_world();
    let mut rope = bent_rope(&mut world, 0.5, [0.9, 0.5]);
    let rest_before = rope.total_rest_len();

    rope.update_sliding(&world, 1e-3).expect("sliding");

    let seg = &rope.segments[0];
    assert!(seg.slide_speeds[0] > 0.0, "rope slides toward the tight side");
    assert!(seg.partitions[0] < 0.9, "rest length leaves the slack side");
    assert!(seg.partitions[1] > 0.5, "rest length reaches the tight side");
    assert!((rope.total_rest_len() - rest_before).abs() < 1e-12);
}

#[test]
fn slack_side_disables_friction() {
    let mut world = test_world();
    // climber side taut, belayer side slack: capacity must vanish
    let mut rope = bent_rope(&mut world, 5.0, [1.1, 0.5]);

    rope.update_sliding(&world, 1e-3).expect("sliding");

    // even a huge mu cannot hold the rope when one side is slack
    assert!(rope.segments[0].slide_speeds[0] > 0.0);
}

// ==================================================================================
// Re-meshing tests
// ==================================================================================

#[test]
fn merge_absorbs_short_segment() {
    let mut world = test_world();
    let a = world.add_body(Body::fixed("a", BodyKind::Anchor, NVec3::zeros()));
    let j = world.add_body(Body::joint(NVec3::new(0.0, 0.0, 1.0), NVec3::zeros()));
    let b = world.add_body(Body::fixed("b", BodyKind::Climber, NVec3::new(0.0, 0.0, 1.01)));
    let mut rope = Rope::new(
        1000,
        vec![
            RopeSegment::plain(1.0, 1.0),
            RopeSegment::plain(1.0, 0.005), // below the merge bound of 0.01
        ],
        vec![a, j, b],
        0.001,
        1.0,
        0.02,
        0.1,
    );

    rope.remesh(&mut world).expect("remesh");

    assert_eq!(rope.segments.len(), 1);
    assert_eq!(rope.joints, vec![a, b]);
    assert!(!world.bodies[j].active, "shared joint retired");
    assert!((rope.total_rest_len() - 1.005).abs() < 1e-12);
    assert!((rope.total_mass() - 2.0).abs() < 1e-12);
    assert_eq!(rope.segments[0].partitions.len(), 1);
}

#[test]
fn merge_rebalances_joint_masses() {
    let mut world = test_world();
    let a = world.add_body(Body::fixed("a", BodyKind::Anchor, NVec3::zeros()));
    let j1 = world.add_body(Body::joint(NVec3::new(0.0, 0.0, 1.0), NVec3::zeros()));
    let j2 = world.add_body(Body::joint(NVec3::new(0.0, 0.0, 2.0), NVec3::zeros()));
    let b = world.add_body(Body::fixed("b", BodyKind::Climber, NVec3::new(0.0, 0.0, 2.01)));
    let mut rope = Rope::new(
        1000,
        vec![
            RopeSegment::plain(1.0, 1.0),
            RopeSegment::plain(1.0, 1.0),
            RopeSegment::plain(1.0, 0.005),
        ],
        vec![a, j1, j2, b],
        0.001,
        1.0,
        0.02,
        0.1,
    );

    rope.remesh(&mut world).expect("remesh");

    // two segments remain; the single interior joint carries the full
    // mass of both end segments (the rope ends donate no mass outward)
    assert_eq!(rope.segments.len(), 2);
    assert!(!world.bodies[j2].active);
    assert!((world.bodies[j1].m - 3.0).abs() < 1e-12);
}

#[test]
fn rope_end_slips_out_of_deflection() {
    let mut world = test_world();
    let a = world.add_body(Body::fixed("a", BodyKind::Anchor, NVec3::zeros()));
    let d = world.add_body(Body::fixed("d", BodyKind::Quickdraw, NVec3::new(0.0, 0.0, 0.01)));
    let b = world.add_body(Body::fixed("b", BodyKind::Climber, NVec3::new(0.0, 0.0, 1.0)));
    let mut rope = Rope::new(
        1000,
        vec![RopeSegment {
            mass: 1.0,
            rest_len: 1.005,
            deflections: vec![d],
            partitions: vec![0.005, 1.0],
            slide_speeds: vec![0.3],
        }],
        vec![a, b],
        0.001,
        1.0,
        0.02,
        0.1,
    );

    rope.remesh(&mut world).expect("remesh");

    let seg = &rope.segments[0];
    assert!(seg.deflections.is_empty());
    assert!(seg.slide_speeds.is_empty());
    assert_eq!(seg.partitions, vec![1.005]);
    assert!((rope.total_rest_len() - 1.005).abs() < 1e-12);
}

#[test]
fn split_carves_default_length_segment() {
    let mut world = test_world();
    let a = world.add_body(
        Body::new("a", BodyKind::Anchor, NVec3::zeros(), 5.0)
            .with_velocity(NVec3::new(0.5, 0.0, 0.0)),
    );
    let d = world.add_body(Body::fixed("d", BodyKind::Quickdraw, NVec3::new(0.0, 0.0, 1.5)));
    let b = world.add_body(Body::fixed("b", BodyKind::Climber, NVec3::new(0.0, 0.0, 2.0)));
    let mut rope = Rope::new(
        1000,
        vec![RopeSegment {
            mass: 1.0,
            rest_len: 2.0,
            deflections: vec![d],
            partitions: vec![1.5, 0.5], // 1.5 > split bound 1.1
            slide_speeds: vec![0.0],
        }],
        vec![a, b],
        0.001,
        1.0,
        0.02,
        0.1,
    );

    rope.remesh(&mut world).expect("remesh");

    assert_eq!(rope.segments.len(), 2);
    assert_eq!(rope.joints.len(), 3);

    // the new segment gets the default rest length and a third of the mass
    assert!((rope.segments[0].rest_len - 1.0).abs() < 1e-12);
    assert!((rope.segments[0].mass - 0.5).abs() < 1e-12);
    assert!((rope.segments[1].rest_len - 1.0).abs() < 1e-12);
    assert_eq!(rope.segments[1].partitions, vec![0.5, 0.5]);

    // conservation and the new joint's state
    assert!((rope.total_rest_len() - 2.0).abs() < 1e-12);
    assert!((rope.total_mass() - 1.0).abs() < 1e-12);
    let joint = &world.bodies[rope.joints[1]];
    assert_eq!(joint.kind, BodyKind::RopeJoint);
    assert!((joint.v - NVec3::new(0.5, 0.0, 0.0)).norm() < 1e-12, "joint inherits A's velocity");
    // placed at default_len / partition[0] of the way toward the deflection
    assert!((joint.x - NVec3::new(0.0, 0.0, 1.0)).norm() < 1e-12);
}

#[test]
fn interior_oversize_partition_is_fatal() {
    let mut world = test_world();
    let a = world.add_body(Body::fixed("a", BodyKind::Anchor, NVec3::zeros()));
    let d1 = world.add_body(Body::fixed("d1", BodyKind::Quickdraw, NVec3::new(0.0, 0.0, 0.5)));
    let d2 = world.add_body(Body::fixed("d2", BodyKind::Quickdraw, NVec3::new(0.0, 0.0, 2.5)));
    let b = world.add_body(Body::fixed("b", BodyKind::Climber, NVec3::new(0.0, 0.0, 3.0)));
    let mut rope = Rope::new(
        1000,
        vec![RopeSegment {
            mass: 1.0,
            rest_len: 3.0,
            deflections: vec![d1, d2],
            partitions: vec![0.5, 2.0, 0.5],
            slide_speeds: vec![0.0, 0.0],
        }],
        vec![a, b],
        0.001,
        1.0,
        0.02,
        0.1,
    );

    match rope.remesh(&mut world) {
        Err(SimError::UnsupportedSplit { segment: 0, deflections: 2 }) => {}
        other => panic!("expected unsupported split, got {other:?}"),
    }
}

// ==================================================================================
// Colour round-trip tests
// ==================================================================================

#[test]
fn color_text_round_trip() {
    let opaque = Color::rgb(12, 0, 255);
    let parsed: Color = opaque.to_string().parse().expect("rgb parses");
    assert_eq!(parsed, opaque);

    let translucent = Color::rgba(1, 2, 3, 0.5);
    assert_eq!(translucent.to_string(), "rgba(1,2,3,0.5)");
    let parsed: Color = translucent.to_string().parse().expect("rgba parses");
    assert_eq!(parsed, translucent);
}

#[test]
fn color_rejects_malformed_text() {
    assert!("blue".parse::<Color>().is_err());
    assert!("rgb(1,2)".parse::<Color>().is_err());
    assert!("rgb(1,2,3".parse::<Color>().is_err());
    assert!("rgba(1,2,3)".parse::<Color>().is_err());
}

#[test]
fn color_json_round_trip() {
    let color = Color::rgba(10, 20, 30, 0.25);
    let json = serde_json::to_string(&color).expect("serialise");
    assert_eq!(json, "\"rgba(10,20,30,0.25)\"");
    let back: Color = serde_json::from_str(&json).expect("deserialise");
    assert_eq!(back, color);
}

// ==================================================================================
// Configuration tests
// ==================================================================================

#[test]
fn config_defaults() {
    let opts = ScenarioConfig::default().normalize();

    assert_eq!(opts.version, 1);
    assert!((opts.climber_weight - 70.0).abs() < 1e-12);
    assert!((opts.climber_wall_distance - 0.3).abs() < 1e-12);
    assert!((opts.belayer_wall_distance - 0.5).abs() < 1e-12);
    assert!((opts.slack - 0.1).abs() < 1e-12);
    assert!((opts.elasticity - 0.079e-3).abs() < 1e-15);
    assert!((opts.max_step - 1.0e-5).abs() < 1e-15, "0.01 ms stored as seconds");
    assert!((opts.frame_rate - 40.0).abs() < 1e-12);
    assert!(opts.belayer_fixed);
    assert!(opts.draws.is_empty());
}

#[test]
fn config_clamps_out_of_range_values() {
    let mut cfg = ScenarioConfig::default();
    cfg.climber.weight = Some(1000.0);
    cfg.rope.friction = Some(-3.0);
    cfg.simulation.duration = Some(1.0e9);

    let opts = cfg.normalize();

    assert!((opts.climber_weight - 200.0).abs() < 1e-12);
    assert_eq!(opts.friction, 0.0);
    assert!((opts.duration - 600.0).abs() < 1e-12);
}

#[test]
fn config_pads_missing_draws() {
    let mut cfg = ScenarioConfig::default();
    cfg.climber.height = Some(8.0);
    cfg.draw_count = Some(3);
    cfg.last_draw_height = Some(6.0);

    let opts = cfg.normalize();

    assert_eq!(opts.draws.len(), 3);
    let heights: Vec<f64> = opts.draws.iter().map(|d| d.height).collect();
    assert!((heights[0] - 2.0).abs() < 1e-12);
    assert!((heights[1] - 4.0).abs() < 1e-12);
    assert!((heights[2] - 6.0).abs() < 1e-12);
    assert!(opts.draws.iter().all(|d| (d.wall_distance - 0.1).abs() < 1e-12));
}

#[test]
fn config_yaml_round_trip() {
    let yaml = r#"
version: 2
wall:
  angle: 10.0
  ground-present: true
climber:
  height: 7.0
  weight: 65.0
draws:
  - height: 5.0
    wall-distance: 0.15
rope:
  segments: 40
  slack: 0.3
simulation:
  step-size: 0.05
  jitter-seed: 9
"#;
    let cfg: ScenarioConfig = serde_yaml::from_str(yaml).expect("parse yaml");
    let opts = cfg.normalize();

    assert_eq!(opts.version, 2);
    assert!((opts.wall_angle - 10.0).abs() < 1e-12);
    assert!(opts.ground_present);
    assert!((opts.climber_height - 7.0).abs() < 1e-12);
    assert_eq!(opts.rope_segments, 40);
    assert!((opts.slack - 0.3).abs() < 1e-12);
    assert!((opts.max_step - 5.0e-5).abs() < 1e-15);
    assert_eq!(opts.jitter_seed, 9);
    assert_eq!(opts.draws.len(), 1);
    assert!((opts.draws[0].wall_distance - 0.15).abs() < 1e-12);
}
