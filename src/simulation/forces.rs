//! Force / acceleration contributors for the gravity sketches
//!
//! Both the orbital and three-body sketches use a clamped inverse-square law:
//! the squared separation is constrained to `[min_d2, max_d2]` before
//! dividing, which bounds the force at close approach and keeps far bodies
//! from drifting off under a vanishing pull.

use super::states::NVec2;

/// Position and mass of one body as seen by the force terms
#[derive(Debug, Clone, Copy)]
pub struct PointMass {
    pub x: NVec2,
    pub m: f64,
}

/// Collection of acceleration terms
/// Each term implements [`Acceleration`] and their contributions are summed
/// into a single acceleration vector per body
#[derive(Default)]
pub struct AccelSet {
    terms: Vec<Box<dyn Acceleration + Send + Sync>>,
}

impl AccelSet {
    /// Create an empty acceleration set
    pub fn new() -> Self {
        Self { terms: Vec::new() }
    }

    /// Add an acceleration term
    pub fn with<T>(mut self, term: T) -> Self
    where
        T: Acceleration + Send + Sync + 'static,
    {
        self.terms.push(Box::new(term));
        self
    }

    /// Compute total accelerations for all bodies
    /// - `out[i]` will be set to the sum of contributions from all terms
    pub fn accumulate_accels(&self, bodies: &[PointMass], out: &mut [NVec2]) {
        for a in out.iter_mut() {
            *a = NVec2::zeros();
        }
        for term in &self.terms {
            term.acceleration(bodies, out);
        }
    }
}

/// Acceleration source; implementations add their contribution into `out[i]`
pub trait Acceleration {
    fn acceleration(&self, bodies: &[PointMass], out: &mut [NVec2]);
}

/// Acceleration of magnitude `g * m_other / clamp(d2)` along `r` (pointing at
/// the attractor). Zero when `r` has no direction.
pub fn clamped_pull(r: NVec2, g: f64, m_other: f64, min_d2: f64, max_d2: f64) -> NVec2 {
    let r2 = r.norm_squared();
    if r2 == 0.0 {
        return NVec2::zeros();
    }
    let d2 = r2.clamp(min_d2, max_d2);
    (g * m_other / d2) * (r / r2.sqrt())
}

/// Mutual gravity between every pair of bodies
pub struct ClampedGravity {
    pub g: f64,
    pub min_d2: f64,
    pub max_d2: f64,
}

impl Acceleration for ClampedGravity {
    fn acceleration(&self, bodies: &[PointMass], out: &mut [NVec2]) {
        let n = bodies.len();
        for i in 0..n {
            let bi = bodies[i];
            for j in (i + 1)..n {
                let bj = bodies[j];
                // r points from i to j: i is pulled along +r, j along -r
                let r = bj.x - bi.x;
                out[i] += clamped_pull(r, self.g, bj.m, self.min_d2, self.max_d2);
                out[j] += clamped_pull(-r, self.g, bi.m, self.min_d2, self.max_d2);
            }
        }
    }
}

/// Pull toward an immovable mass (the orbital sketch's sun)
pub struct FixedAttractor {
    pub g: f64,
    pub x: NVec2,
    pub m: f64,
    pub min_d2: f64,
    pub max_d2: f64,
}

impl Acceleration for FixedAttractor {
    fn acceleration(&self, bodies: &[PointMass], out: &mut [NVec2]) {
        for (b, a) in bodies.iter().zip(out.iter_mut()) {
            *a += clamped_pull(self.x - b.x, self.g, self.m, self.min_d2, self.max_d2);
        }
    }
}
