//! The advance loop: step the bodies, re-mesh the rope, and materialise
//! snapshots at the configured frame rate while staying interruptible.
//!
//! Step ordering is load-bearing. Each iteration integrates with the
//! forces computed at the end of the previous one, then rebuilds a clean
//! force state (gravity + rope) so that a snapshot taken at this instant
//! reflects the just-computed geometry and the next iteration starts from
//! a clean accumulation:
//!
//!   integrate -> barriers -> capstan sliding -> re-mesh -> clear forces
//!   -> gravity -> rope forces -> (snapshot?)
//!
//! The loop owns no threads; it cooperatively yields every ~500 ms of
//! wall-clock time and observes an interrupt flag at its suspension
//! points (yield boundary and snapshot emission). An interrupt is not an
//! error: the snapshots captured so far are the result.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crate::error::EngineError;
use crate::simulation::integrator::euler_step;
use crate::simulation::params::Parameters;
use crate::simulation::rope::Rope;
use crate::simulation::scenario::Scenario;
use crate::simulation::states::World;
use crate::snapshot::snapshot::Snapshot;

/// Wall-clock budget between cooperative yields.
const YIELD_BUDGET: Duration = Duration::from_millis(500);

/// Drives a scenario forward in time and collects snapshots.
///
/// `run` is resumable: it advances from the current simulation time to
/// the configured duration, so extending `parameters.duration` and
/// calling `run` again continues the same simulation.
pub struct Engine {
    pub world: World,
    pub rope: Rope,
    pub parameters: Parameters,
    pub snapshots: Vec<Snapshot>,
    pub simulated: f64, // final simulated duration of the last run
    interrupt: Arc<AtomicBool>,
    last_snapshot: f64, // simulation time of the last emitted snapshot
}

impl Engine {
    pub fn new(scenario: Scenario) -> Self {
        Self {
            world: scenario.world,
            rope: scenario.rope,
            parameters: scenario.parameters,
            snapshots: Vec::new(),
            simulated: 0.0,
            interrupt: Arc::new(AtomicBool::new(false)),
            last_snapshot: 0.0,
        }
    }

    /// Handle through which the owner can request a clean termination at
    /// the next suspension point.
    pub fn interrupt_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.interrupt)
    }

    fn interrupted(&self) -> bool {
        self.interrupt.load(Ordering::Relaxed)
    }

    /// Kinetic + gravitational + elastic energy of the whole system.
    pub fn total_energy(&self) -> f64 {
        self.world.kinetic_energy()
            + self.world.potential_energy()
            + self.rope.elastic_energy(&self.world)
    }

    /// Rebuild the force state for the current geometry: clear, gravity,
    /// rope forces. Feeds the rope's tension window.
    fn refresh_forces(&mut self) -> Result<(), EngineError> {
        let t = self.world.t;
        self.world.clear_forces();
        self.world.apply_gravity();
        let peak = self
            .rope
            .apply_forces(&mut self.world)
            .map_err(|kind| EngineError { time: t, kind })?;
        self.rope.record_tension(self.parameters.max_step, peak);
        Ok(())
    }

    fn capture(&mut self) {
        self.snapshots
            .push(Snapshot::capture(&self.world, &self.rope, self.parameters.version));
        self.last_snapshot = self.world.t;
    }

    /// Advance from the current simulation time to `parameters.duration`,
    /// emitting snapshots every 1/frame-rate of simulated time.
    ///
    /// Returns normally on completion or interrupt; numerical violations
    /// abort with the simulation time attached. Snapshots captured before
    /// a failure remain available.
    pub fn run(&mut self) -> Result<(), EngineError> {
        let dt = self.parameters.max_step;
        let frame_gap = 1.0 / self.parameters.frame_rate;

        if self.snapshots.is_empty() {
            self.refresh_forces()?;
            self.capture();
        }

        let steps = ((self.parameters.duration - self.world.t) / dt).ceil().max(0.0) as u64;
        let mut last_yield = Instant::now();

        for _ in 0..steps {
            euler_step(&mut self.world, dt);
            self.world.project_barriers();

            let t = self.world.t;
            self.rope
                .update_sliding(&self.world, dt)
                .map_err(|kind| EngineError { time: t, kind })?;
            self.rope
                .remesh(&mut self.world)
                .map_err(|kind| EngineError { time: t, kind })?;

            self.refresh_forces()?;

            if self.world.t - self.last_snapshot >= frame_gap {
                if self.interrupted() {
                    break;
                }
                self.capture();
            }

            if last_yield.elapsed() >= YIELD_BUDGET {
                if self.interrupted() {
                    break;
                }
                thread::yield_now();
                last_yield = Instant::now();
            }
        }

        self.simulated = self.world.t;
        Ok(())
    }
}
