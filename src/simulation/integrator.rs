//! Fixed-step time integration
//!
//! Every sketch advances its entities through [`Step`]: one call is one
//! logical tick. The gravity sketches step with semi-implicit Euler driven by
//! an [`AccelSet`], either from a pre-step snapshot ([`euler_integrator`]) or
//! body by body in place ([`sequential_integrator`]). The oscillator is
//! evaluated analytically and the landscape ball integrates its own gradient
//! descent.

use super::forces::{AccelSet, PointMass};
use super::states::{Body, NVec2, System};

/// Advance an entity by one tick given a sketch-specific context
pub trait Step<C: ?Sized> {
    fn step(&mut self, ctx: &C);
}

/// Acceleration to apply to a body over a step of length `dt`
#[derive(Debug, Clone, Copy)]
pub struct Kick {
    pub accel: NVec2,
    pub dt: f64,
}

impl Step<Kick> for Body {
    /// Semi-implicit Euler: velocity first, then position with the new velocity
    fn step(&mut self, ctx: &Kick) {
        self.v += ctx.dt * ctx.accel;
        self.x += ctx.dt * self.v;
    }
}

/// Displacement and velocity of a harmonic oscillator at absolute time `t`
///
/// `x = A cos(wt + phi)`, `v = -wA sin(wt + phi)`
pub fn oscillator_state(amplitude: f64, omega: f64, phase: f64, t: f64) -> (f64, f64) {
    let (s, c) = (omega * t + phase).sin_cos();
    (amplitude * c, -omega * amplitude * s)
}

/// Advance every body in `sys` by one semi-implicit Euler step
///
/// All accelerations are evaluated from the pre-step positions before any
/// body moves, then each body is kicked by `dt`.
pub fn euler_integrator(sys: &mut System, forces: &AccelSet, dt: f64) {
    let n = sys.bodies.len();
    let masses = point_masses(sys);

    let mut accels = vec![NVec2::zeros(); n];
    forces.accumulate_accels(&masses, &mut accels);

    for (c, a) in sys.bodies.values_mut().zip(accels.iter()) {
        c.body.step(&Kick { accel: *a, dt });
    }

    sys.t += dt;
}

/// Advance every body in `sys` by one semi-implicit Euler step, in order
///
/// Body `k` is kicked with the acceleration from the live set just before it
/// moves, so it sees bodies `0..k` at their already-updated positions.
pub fn sequential_integrator(sys: &mut System, forces: &AccelSet, dt: f64) {
    let mut masses = point_masses(sys);
    let mut accels = vec![NVec2::zeros(); masses.len()];

    for (k, c) in sys.bodies.values_mut().enumerate() {
        forces.accumulate_accels(&masses, &mut accels);
        c.body.step(&Kick { accel: accels[k], dt });
        masses[k].x = c.body.x;
    }

    sys.t += dt;
}

fn point_masses(sys: &System) -> Vec<PointMass> {
    sys.bodies
        .values()
        .map(|c| PointMass { x: c.body.x, m: c.body.m })
        .collect()
}
