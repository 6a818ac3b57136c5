//! Numerical and physical parameters for a simulation run
//!
//! `Parameters` holds runtime settings:
//! - maximum integration step and target duration,
//! - snapshot cadence in frames per second,
//! - the gravity vector,
//! - the construction jitter seed and the configuration version tag

use crate::simulation::states::NVec3;

#[derive(Debug, Clone)]
pub struct Parameters {
    pub max_step: f64, // maximum integration step in seconds
    pub duration: f64, // target simulated duration in seconds
    pub frame_rate: f64, // snapshots per simulated second
    pub gravity: NVec3, // m/s^2
    pub jitter_seed: u64, // seed for the construction jitter
    pub version: u32, // configuration version, carried into snapshots
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            max_step: 1.0e-5,
            duration: 2.0,
            frame_rate: 40.0,
            gravity: NVec3::new(0.0, -9.81, 0.0),
            jitter_seed: 0,
            version: 1,
        }
    }
}
