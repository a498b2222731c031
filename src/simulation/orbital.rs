//! Bodies orbiting a fixed sun
//!
//! New bodies are launched tangentially at the circular-orbit speed for their
//! distance, optionally jittered in speed and direction to produce ellipses.
//! The phase plot shows distance from the sun against speed on fixed axes.

use std::f64::consts::FRAC_PI_2;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::error::SimError;
use crate::visualization::snapshot::{points, AxesSnapshot, EntitySnapshot, Marker, SketchSnapshot};

use super::engine::{Sketch, SketchKind};
use super::forces::{AccelSet, FixedAttractor};
use super::integrator::euler_integrator;
use super::mapper::{AxisRange, PhaseSpaceMapper, PlotArea};
use super::params::{Canvas, OrbitalParams};
use super::states::{rotate, Body, Celestial, EntityId, Hsb, NVec2, System};
use super::trajectory::PhaseSample;

/// One tick per frame
const DT: f64 = 1.0;

pub struct OrbitalSketch {
    params: OrbitalParams,
    canvas: Canvas,
    sun: Body,
    system: System,
    forces: AccelSet,
    mapper: PhaseSpaceMapper,
    rng: StdRng,
}

impl OrbitalSketch {
    /// Sun sits at the centre of the simulation panel
    pub fn new(params: OrbitalParams, canvas: Canvas, seed: u64) -> Result<Self, SimError> {
        let sun_at = NVec2::new(canvas.width / 4.0, canvas.height / 2.0);
        Self::with_sun(params, canvas, sun_at, seed)
    }

    pub fn with_sun(params: OrbitalParams, canvas: Canvas, sun_at: NVec2, seed: u64) -> Result<Self, SimError> {
        params.validate()?;
        canvas.validate()?;
        let sun = Body::new(sun_at, NVec2::zeros(), params.sun_mass, params.sun_size, Hsb::sun())?;

        let forces = AccelSet::new().with(FixedAttractor {
            g: params.g,
            x: sun.x,
            m: sun.m,
            min_d2: params.min_d2,
            max_d2: params.max_d2,
        });

        let max_distance = params.max_distance.unwrap_or(canvas.panel_width());
        let mapper = PhaseSpaceMapper::fixed(
            AxisRange::new(0.0, max_distance),
            AxisRange::new(0.0, params.max_velocity),
            PlotArea::inset(canvas.panel_width(), canvas.height, params.plot_margin),
        );

        Ok(Self {
            params,
            canvas,
            sun,
            system: System::default(),
            forces,
            mapper,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    /// Speed of a circular orbit at distance `r` from the sun
    pub fn circular_speed(&self, r: f64) -> f64 {
        (self.params.g * self.sun.m / r).sqrt()
    }

    /// Launch a body at `position` using the configured orbit mode
    pub fn add_body(&mut self, position: NVec2) -> Result<EntityId, SimError> {
        self.add_body_with(position, self.params.circular)
    }

    /// Launch a body tangentially to the sun. Circular mode uses the exact
    /// circular speed; otherwise speed and heading are jittered.
    pub fn add_body_with(&mut self, position: NVec2, circular: bool) -> Result<EntityId, SimError> {
        let r = position - self.sun.x;
        let distance = r.norm();
        if !distance.is_finite() {
            return Err(SimError::NonFiniteState);
        }
        if distance == 0.0 {
            return Err(SimError::CoincidentWithAttractor);
        }

        let mut speed = self.circular_speed(distance);
        let mut tangent = rotate(r, FRAC_PI_2).normalize();
        if !circular {
            let [lo, hi] = self.params.speed_jitter;
            speed *= self.rng.random_range(lo..=hi);
            let jitter = self.params.angle_jitter;
            if jitter > 0.0 {
                tangent = rotate(tangent, self.rng.random_range(-jitter..=jitter));
            }
        }

        let color = Hsb::random(&mut self.rng);
        self.add_body_raw(position, tangent * speed, color)
    }

    /// Add a body with an explicit initial velocity
    pub fn add_body_raw(&mut self, position: NVec2, velocity: NVec2, color: Hsb) -> Result<EntityId, SimError> {
        let body = Body::new(position, velocity, self.params.body_mass, self.params.body_size, color)?;
        let id = self.system.bodies.add(Celestial::new(body, self.params.trail_capacity));
        debug!(%id, x = position.x, y = position.y, vx = velocity.x, vy = velocity.y, "orbiting body added");
        Ok(id)
    }

    pub fn sun(&self) -> &Body {
        &self.sun
    }

    pub fn get(&self, id: EntityId) -> Option<&Celestial> {
        self.system.bodies.get(id)
    }

    pub fn bodies(&self) -> impl Iterator<Item = (EntityId, &Celestial)> + '_ {
        self.system.bodies.iter()
    }

    /// Distance from the sun
    pub fn radius_of(&self, body: &Body) -> f64 {
        (body.x - self.sun.x).norm()
    }

    pub fn mapper(&self) -> &PhaseSpaceMapper {
        &self.mapper
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }
}

impl Sketch for OrbitalSketch {
    fn kind(&self) -> SketchKind {
        SketchKind::Orbital
    }

    fn tick(&mut self) {
        euler_integrator(&mut self.system, &self.forces, DT);
        let sun = self.sun.x;
        for c in self.system.bodies.values_mut() {
            let r = (c.body.x - sun).norm();
            c.trail.record(c.body.x, PhaseSample::new(r, c.body.v.norm()));
        }
    }

    fn clear(&mut self) -> Vec<EntityId> {
        let ids = self.system.bodies.clear();
        debug!(count = ids.len(), "orbiting bodies cleared");
        ids
    }

    fn entity_count(&self) -> usize {
        self.system.bodies.len()
    }

    fn elapsed(&self) -> f64 {
        self.system.t
    }

    fn snapshot(&self) -> SketchSnapshot {
        let entities = self
            .system
            .bodies
            .iter()
            .map(|(id, c)| EntitySnapshot {
                id,
                position: [c.body.x.x, c.body.x.y],
                size: c.body.size,
                color: c.body.color,
                marker: Marker::Dot,
                trail: points(&c.trail.primary),
                phase: self.mapper.map_all(c.trail.phase.iter()),
            })
            .collect();
        let attractor = EntitySnapshot {
            id: EntityId(u64::MAX),
            position: [self.sun.x.x, self.sun.x.y],
            size: self.sun.size,
            color: self.sun.color,
            marker: Marker::Dot,
            trail: Vec::new(),
            phase: Vec::new(),
        };
        SketchSnapshot {
            kind: SketchKind::Orbital,
            elapsed: self.system.t,
            attractor: Some(attractor),
            entities,
            runs: Vec::new(),
            axes: AxesSnapshot::from_mapper(&self.mapper),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sketch() -> OrbitalSketch {
        OrbitalSketch::with_sun(OrbitalParams::default(), Canvas::default(), NVec2::zeros(), 11).unwrap()
    }

    #[test]
    fn circular_speed_matches_formula() {
        let s = sketch();
        assert!((s.circular_speed(100.0) - 60.0_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn launch_is_tangential() {
        let mut s = sketch();
        let id = s.add_body(NVec2::new(100.0, 0.0)).unwrap();
        let b = &s.get(id).unwrap().body;
        assert!(b.v.dot(&b.x).abs() < 1e-9);
        assert!((b.v.norm() - 60.0_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn one_step_keeps_radius_within_one_percent() {
        let mut s = sketch();
        let id = s.add_body(NVec2::new(100.0, 0.0)).unwrap();
        s.tick();
        let r = s.radius_of(&s.get(id).unwrap().body);
        assert!((r - 100.0).abs() < 1.0, "radius drifted to {r}");
    }

    #[test]
    fn jittered_launch_stays_in_bounds() {
        let mut s = sketch();
        let v_c = s.circular_speed(150.0);
        for _ in 0..50 {
            let id = s.add_body_with(NVec2::new(0.0, 150.0), false).unwrap();
            let v = s.get(id).unwrap().body.v.norm();
            assert!(v >= 0.5 * v_c - 1e-9 && v <= 1.5 * v_c + 1e-9);
        }
    }

    #[test]
    fn body_on_the_sun_is_rejected() {
        let mut s = sketch();
        assert!(matches!(s.add_body(NVec2::zeros()), Err(SimError::CoincidentWithAttractor)));
        assert!(matches!(
            s.add_body(NVec2::new(f64::INFINITY, 0.0)),
            Err(SimError::NonFiniteState)
        ));
    }

    #[test]
    fn sun_never_moves() {
        let mut s = sketch();
        s.add_body(NVec2::new(50.0, 0.0)).unwrap();
        s.run(100);
        assert_eq!(s.sun().x, NVec2::zeros());
    }

    #[test]
    fn clear_releases_all_bodies() {
        let mut s = sketch();
        let a = s.add_body(NVec2::new(50.0, 0.0)).unwrap();
        let b = s.add_body(NVec2::new(0.0, 80.0)).unwrap();
        assert_eq!(s.clear(), vec![a, b]);
        assert_eq!(s.entity_count(), 0);
        // ticking an empty sketch is harmless and the clock still runs
        let t0 = s.elapsed();
        s.tick();
        assert!((s.elapsed() - t0 - DT).abs() < 1e-12);
    }

    #[test]
    fn trails_are_capped() {
        let mut s = sketch();
        let id = s.add_body(NVec2::new(100.0, 0.0)).unwrap();
        s.run(250);
        let c = s.get(id).unwrap();
        assert_eq!(c.trail.primary.len(), 200);
        assert_eq!(c.trail.phase.len(), 200);
    }
}
