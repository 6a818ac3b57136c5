//! Fixed-step time integration for the body arena
//!
//! Semi-implicit Euler: the velocity update runs first and the position
//! update uses the new velocity, which keeps the stiff rope springs
//! energy-bounded at the step sizes the engine uses. The per-second
//! damping factor is raised to the step width so its strength is
//! independent of the step size.

use crate::simulation::states::World;

/// Advance every active movable body by one step of `dt` seconds and feed
/// the per-body force/speed windows. Fixed bodies record their force
/// reading but never move. Advances `world.t` in-place.
pub fn euler_step(world: &mut World, dt: f64) {
    for body in world.bodies.iter_mut().filter(|b| b.active) {
        if body.is_movable() {
            let accel = body.f / body.m;
            body.v = (body.v + accel * dt) * body.damping.powf(dt);
            body.x += body.v * dt;
        }
        body.record_step(dt);
    }
    world.t += dt;
}
