pub mod states;
pub mod params;
pub mod geometry;
pub mod barrier;
pub mod rope;
pub mod integrator;
pub mod engine;
pub mod scenario;
