use std::time::Instant;

use crate::configuration::config::ScenarioConfig;
use crate::simulation::engine::Engine;
use crate::simulation::scenario::Scenario;

/// Build a vertical-fall scenario with `segments` rope segments.
fn fall_scenario(segments: usize) -> Scenario {
    let mut cfg = ScenarioConfig::default();
    cfg.climber.height = Some(6.0);
    cfg.rope.segments = Some(segments);
    cfg.simulation.jitter_seed = Some(42);
    Scenario::build(&cfg).expect("valid benchmark scenario")
}

pub fn bench_rope_forces() {
    // Different segment counts to test
    let ns = [35, 70, 140, 280, 560];

    for n in ns {
        let Scenario {
            mut world, rope, ..
        } = fall_scenario(n);

        // Warm up
        world.clear_forces();
        rope.apply_forces(&mut world).expect("forces");

        let reps = 1000;
        let t0 = Instant::now();
        for _ in 0..reps {
            world.clear_forces();
            world.apply_gravity();
            rope.apply_forces(&mut world).expect("forces");
        }
        let per_pass = t0.elapsed().as_secs_f64() / reps as f64;

        println!("N = {n:4}, force pass = {per_pass:10.8} s");
    }
}

pub fn bench_step() {
    let ns = [35, 70, 140];
    let steps = 10_000;

    for n in ns {
        let mut engine = Engine::new(fall_scenario(n));
        engine.parameters.max_step = 1.0e-5;
        engine.parameters.duration = steps as f64 * engine.parameters.max_step;

        let t0 = Instant::now();
        engine.run().expect("benchmark run");
        let elapsed = t0.elapsed().as_secs_f64();

        println!(
            "N = {n:4}, {steps} steps = {elapsed:8.4} s ({:.2} Msteps/s)",
            steps as f64 / elapsed / 1.0e6
        );
    }
}
