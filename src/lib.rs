pub mod simulation;
pub mod configuration;
pub mod snapshot;
pub mod benchmark;
pub mod error;

pub use simulation::states::{Body, BodyKind, ForceAverage, NVec3, World};
pub use simulation::barrier::Barrier;
pub use simulation::geometry::Plane;
pub use simulation::rope::{Rope, RopeSegment};
pub use simulation::integrator::euler_step;
pub use simulation::params::Parameters;
pub use simulation::engine::Engine;
pub use simulation::scenario::Scenario;

pub use configuration::config::{
    BelayerConfig, ClimberConfig, DrawConfig, DrawPlacement, RopeConfig, ScenarioConfig,
    ScenarioOptions, SimulationConfig, WallConfig,
};

pub use snapshot::snapshot::{BodyRecord, Color, Shape, Snapshot};

pub use error::{EngineError, SimError};

pub use benchmark::benchmark::{bench_rope_forces, bench_step};
