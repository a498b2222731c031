//! Harmonic oscillators moving along a line through the panel centre
//!
//! State is evaluated from absolute elapsed time rather than integrated, so
//! the phase-space curve is the exact ellipse. The sketch keeps its own
//! fixed-tick clock; [`OscillatorSketch::advance_to`] lets a caller drive it
//! from an external clock instead.
//!
//! The core never touches UI controls. Creation, edits and removal are
//! reported as [`ControlEvent`]s which the renderer drains and applies to its
//! own widgets, keyed by [`EntityId`].

use std::f64::consts::TAU;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::SimError;
use crate::visualization::snapshot::{points, AxesSnapshot, EntitySnapshot, Marker, SketchSnapshot};

use super::engine::{Sketch, SketchKind};
use super::integrator::{oscillator_state, Step};
use super::mapper::{AxisRange, PhaseSpaceMapper, PlotArea};
use super::params::{Canvas, OscillatorParams};
use super::states::{EntityId, Hsb, NVec2};
use super::store::StateStore;
use super::trajectory::{PhaseSample, Trail};

/// Editable oscillator parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OscillatorParam {
    Amplitude,
    Frequency,
    Angle,
}

impl OscillatorParam {
    pub fn name(&self) -> &'static str {
        match self {
            OscillatorParam::Amplitude => "amplitude",
            OscillatorParam::Frequency => "frequency",
            OscillatorParam::Angle => "angle",
        }
    }
}

/// Notification for the UI side
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ControlEvent {
    Created {
        id: EntityId,
        amplitude: f64,
        frequency: f64,
        angle: f64,
    },
    ParameterChanged {
        id: EntityId,
        param: OscillatorParam,
        value: f64,
    },
    Removed {
        id: EntityId,
    },
}

/// Construction input; any field left unset is drawn at random
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OscillatorSpec {
    pub amplitude: Option<f64>,
    pub frequency: Option<f64>, // Hz
    pub angle: Option<f64>, // direction of the line of motion
    pub phase: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct Oscillator {
    amplitude: f64,
    frequency: f64,
    omega: f64,
    angle: f64,
    direction: NVec2,
    phase: f64,
    color: Hsb,
    displacement: f64,
    velocity: f64,
    trail: Trail,
}

impl Oscillator {
    fn new(amplitude: f64, frequency: f64, angle: f64, phase: f64, color: Hsb, capacity: usize) -> Self {
        Self {
            amplitude,
            frequency,
            omega: TAU * frequency,
            angle,
            direction: NVec2::new(angle.cos(), angle.sin()),
            phase,
            color,
            displacement: 0.0,
            velocity: 0.0,
            trail: Trail::new(capacity),
        }
    }

    pub fn amplitude(&self) -> f64 {
        self.amplitude
    }

    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    pub fn angular_frequency(&self) -> f64 {
        self.omega
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn phase(&self) -> f64 {
        self.phase
    }

    pub fn displacement(&self) -> f64 {
        self.displacement
    }

    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    /// Position relative to the panel centre
    pub fn position(&self) -> NVec2 {
        self.direction * self.displacement
    }

    pub fn trail(&self) -> &Trail {
        &self.trail
    }

    fn apply(&mut self, param: OscillatorParam, value: f64) {
        match param {
            OscillatorParam::Amplitude => self.amplitude = value,
            OscillatorParam::Frequency => {
                self.frequency = value;
                self.omega = TAU * value;
            }
            OscillatorParam::Angle => {
                self.angle = value;
                self.direction = NVec2::new(value.cos(), value.sin());
            }
        }
        // old samples belong to a different ellipse
        self.trail.reset();
    }
}

impl Step<f64> for Oscillator {
    /// Evaluate at absolute time `t` seconds
    fn step(&mut self, t: &f64) {
        let (x, v) = oscillator_state(self.amplitude, self.omega, self.phase, *t);
        self.displacement = x;
        self.velocity = v;
        self.trail.record(self.position(), PhaseSample::new(x, v));
    }
}

pub struct OscillatorSketch {
    params: OscillatorParams,
    canvas: Canvas,
    oscillators: StateStore<Oscillator>,
    clock: f64,
    events: Vec<ControlEvent>,
    mapper: PhaseSpaceMapper,
    rng: StdRng,
}

impl OscillatorSketch {
    pub fn new(params: OscillatorParams, canvas: Canvas, seed: u64) -> Result<Self, SimError> {
        params.validate()?;
        canvas.validate()?;
        // fixed bounds from the slider limits, so every ellipse shares one scale
        let mapper = PhaseSpaceMapper::fixed(
            AxisRange::symmetric(params.max_displacement()),
            AxisRange::symmetric(params.max_velocity()),
            PlotArea::inset(canvas.panel_width(), canvas.height, params.plot_margin),
        );
        Ok(Self {
            params,
            canvas,
            oscillators: StateStore::new(),
            clock: 0.0,
            events: Vec::new(),
            mapper,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    pub fn params(&self) -> &OscillatorParams {
        &self.params
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    fn limits(&self, param: OscillatorParam) -> [f64; 2] {
        match param {
            OscillatorParam::Amplitude => self.params.amplitude_limits,
            OscillatorParam::Frequency => self.params.frequency_limits,
            OscillatorParam::Angle => OscillatorParams::ANGLE_LIMITS,
        }
    }

    fn check(&self, param: OscillatorParam, value: f64) -> Result<f64, SimError> {
        let [min, max] = self.limits(param);
        if value.is_finite() && (min..=max).contains(&value) {
            Ok(value)
        } else {
            Err(SimError::ParameterOutOfRange { name: param.name(), value, min, max })
        }
    }

    /// Add an oscillator; unset fields are randomized, set fields must lie
    /// within the edit limits
    pub fn add(&mut self, spec: OscillatorSpec) -> Result<EntityId, SimError> {
        let amplitude = match spec.amplitude {
            Some(a) => self.check(OscillatorParam::Amplitude, a)?,
            None => self.random_amplitude(),
        };
        let frequency = match spec.frequency {
            Some(f) => self.check(OscillatorParam::Frequency, f)?,
            None => self.random_frequency(),
        };
        let angle = match spec.angle {
            Some(a) => self.check(OscillatorParam::Angle, a)?,
            None => self.rng.random_range(0.0..TAU),
        };
        let phase = match spec.phase {
            Some(p) if p.is_finite() => p,
            Some(_) => return Err(SimError::NonFiniteState),
            None => self.rng.random_range(0.0..TAU),
        };
        Ok(self.insert(amplitude, frequency, angle, phase))
    }

    pub fn add_random(&mut self) -> EntityId {
        let amplitude = self.random_amplitude();
        let frequency = self.random_frequency();
        let angle = self.rng.random_range(0.0..TAU);
        let phase = self.rng.random_range(0.0..TAU);
        self.insert(amplitude, frequency, angle, phase)
    }

    fn random_amplitude(&mut self) -> f64 {
        let [lo, hi] = self.params.spawn_amplitude;
        self.rng.random_range(lo..=hi)
    }

    fn random_frequency(&mut self) -> f64 {
        let [lo, hi] = self.params.frequency_limits;
        self.rng.random_range(lo..=hi)
    }

    fn insert(&mut self, amplitude: f64, frequency: f64, angle: f64, phase: f64) -> EntityId {
        let color = Hsb::random(&mut self.rng);
        let osc = Oscillator::new(amplitude, frequency, angle, phase, color, self.params.trail_capacity);
        let id = self.oscillators.add(osc);
        debug!(%id, amplitude, frequency, angle, "oscillator added");
        self.events.push(ControlEvent::Created { id, amplitude, frequency, angle });
        id
    }

    pub fn remove(&mut self, id: EntityId) -> Result<(), SimError> {
        self.oscillators.remove(id).ok_or(SimError::UnknownEntity(id))?;
        debug!(%id, "oscillator removed");
        self.events.push(ControlEvent::Removed { id });
        Ok(())
    }

    /// Live-edit one parameter. Resets that oscillator's trail; the phase
    /// offset and the clock are untouched.
    pub fn set_parameter(&mut self, id: EntityId, param: OscillatorParam, value: f64) -> Result<(), SimError> {
        let value = self.check(param, value)?;
        let osc = self.oscillators.get_mut(id).ok_or(SimError::UnknownEntity(id))?;
        osc.apply(param, value);
        debug!(%id, param = param.name(), value, "oscillator parameter changed");
        self.events.push(ControlEvent::ParameterChanged { id, param, value });
        Ok(())
    }

    /// Evaluate every oscillator at absolute time `t` seconds
    pub fn advance_to(&mut self, t: f64) {
        self.clock = t;
        for osc in self.oscillators.values_mut() {
            osc.step(&t);
        }
    }

    /// Pending notifications for the UI, oldest first
    pub fn drain_events(&mut self) -> Vec<ControlEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn get(&self, id: EntityId) -> Option<&Oscillator> {
        self.oscillators.get(id)
    }

    pub fn oscillators(&self) -> impl Iterator<Item = (EntityId, &Oscillator)> + '_ {
        self.oscillators.iter()
    }

    pub fn mapper(&self) -> &PhaseSpaceMapper {
        &self.mapper
    }
}

impl Sketch for OscillatorSketch {
    fn kind(&self) -> SketchKind {
        SketchKind::Oscillator
    }

    fn tick(&mut self) {
        let t = self.clock + self.params.dt;
        self.advance_to(t);
    }

    fn clear(&mut self) -> Vec<EntityId> {
        let ids = self.oscillators.clear();
        self.events.extend(ids.iter().map(|&id| ControlEvent::Removed { id }));
        debug!(count = ids.len(), "oscillators cleared");
        ids
    }

    fn entity_count(&self) -> usize {
        self.oscillators.len()
    }

    fn elapsed(&self) -> f64 {
        self.clock
    }

    fn snapshot(&self) -> SketchSnapshot {
        let entities = self
            .oscillators
            .iter()
            .map(|(id, o)| {
                let p = o.position();
                EntitySnapshot {
                    id,
                    position: [p.x, p.y],
                    size: 10.0,
                    color: o.color,
                    marker: Marker::Dot,
                    trail: points(&o.trail.primary),
                    phase: self.mapper.map_all(o.trail.phase.iter()),
                }
            })
            .collect();
        SketchSnapshot {
            kind: SketchKind::Oscillator,
            elapsed: self.clock,
            attractor: None,
            entities,
            runs: Vec::new(),
            axes: AxesSnapshot::from_mapper(&self.mapper),
        }
    }
}
