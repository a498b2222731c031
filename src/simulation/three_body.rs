//! Three-body gravitational chaos
//!
//! Each run starts three bodies at random and records, after every
//! integrator step, the mean pairwise separation and mean speed. Starting a
//! new run archives the previous run's statistics so earlier trajectories
//! stay on the phase plot next to the live one.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace};

use crate::error::SimError;
use crate::visualization::snapshot::{points, AxesSnapshot, EntitySnapshot, Marker, RunSnapshot, SketchSnapshot};

use super::engine::{Sketch, SketchKind};
use super::forces::{AccelSet, ClampedGravity};
use super::integrator::{euler_integrator, sequential_integrator};
use super::mapper::{AxisRange, PhaseSpaceMapper, PlotArea};
use super::params::{Canvas, ThreeBodyParams, UpdateOrder};
use super::states::{Body, Celestial, EntityId, Hsb, NVec2, System};
use super::trajectory::{PhaseSample, TrajectoryBuffer};

/// Distance between every unordered pair, `n(n-1)/2` values
pub fn pairwise_separations(positions: &[NVec2]) -> Vec<f64> {
    let n = positions.len();
    let mut out = Vec::with_capacity(n * n.saturating_sub(1) / 2);
    for i in 0..n {
        for j in (i + 1)..n {
            out.push((positions[j] - positions[i]).norm());
        }
    }
    out
}

/// Mean pairwise separation; zero with fewer than two bodies
pub fn mean_separation(positions: &[NVec2]) -> f64 {
    let seps = pairwise_separations(positions);
    if seps.is_empty() {
        return 0.0;
    }
    seps.iter().sum::<f64>() / seps.len() as f64
}

/// Mean distance from body `i` to every other body; zero when it is alone
pub fn mean_distance_to_others(positions: &[NVec2], i: usize) -> f64 {
    if positions.len() < 2 {
        return 0.0;
    }
    let total: f64 = positions
        .iter()
        .enumerate()
        .filter(|&(j, _)| j != i)
        .map(|(_, p)| (p - positions[i]).norm())
        .sum();
    total / (positions.len() - 1) as f64
}

/// Mean speed; zero with no bodies
pub fn mean_speed(velocities: &[NVec2]) -> f64 {
    if velocities.is_empty() {
        return 0.0;
    }
    velocities.iter().map(|v| v.norm()).sum::<f64>() / velocities.len() as f64
}

/// Statistics of one run: x = mean separation, y = mean speed
#[derive(Debug, Clone)]
pub struct Run {
    pub color: Hsb,
    pub samples: TrajectoryBuffer<PhaseSample>,
}

impl Run {
    fn new(color: Hsb, capacity: usize) -> Self {
        Self {
            color,
            samples: TrajectoryBuffer::new(capacity),
        }
    }
}

pub struct ThreeBodySketch {
    params: ThreeBodyParams,
    canvas: Canvas,
    system: System,
    forces: AccelSet,
    current: Option<Run>,
    history: Vec<Run>,
    mapper: PhaseSpaceMapper,
    rng: StdRng,
}

impl ThreeBodySketch {
    /// Empty sketch; call [`start_new`](Self::start_new) to seed a run
    pub fn new(params: ThreeBodyParams, canvas: Canvas, seed: u64) -> Result<Self, SimError> {
        params.validate()?;
        canvas.validate()?;
        let forces = AccelSet::new().with(ClampedGravity {
            g: params.g,
            min_d2: params.min_d2,
            max_d2: params.max_d2,
        });
        let max_separation = params.max_separation.unwrap_or(canvas.panel_width());
        let mapper = PhaseSpaceMapper::fixed(
            AxisRange::new(0.0, max_separation),
            AxisRange::new(0.0, params.max_velocity),
            PlotArea::inset(canvas.panel_width(), canvas.height, params.plot_margin),
        );
        Ok(Self {
            params,
            canvas,
            system: System::default(),
            forces,
            current: None,
            history: Vec::new(),
            mapper,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    /// Archive the live run, drop its bodies and open an empty run
    fn begin_run(&mut self) {
        if let Some(run) = self.current.take() {
            debug!(samples = run.samples.len(), archived = self.history.len() + 1, "run archived");
            self.history.push(run);
        }
        self.current = Some(Run::new(Hsb::random(&mut self.rng), self.params.max_data_points));
        self.system.bodies.clear();
        self.system.t = 0.0;
    }

    /// Archive the current run (if any) and start a fresh random one
    pub fn start_new(&mut self) -> Vec<EntityId> {
        self.begin_run();

        let p = &self.params;
        let (w, h, margin) = (self.canvas.panel_width(), self.canvas.height, p.spawn_margin);
        // degenerate canvases collapse the spawn box to its centre
        let span = |extent: f64| {
            if extent - margin > margin {
                margin..=(extent - margin)
            } else {
                extent / 2.0..=extent / 2.0
            }
        };
        let (x_range, y_range) = (span(w), span(h));
        let s = p.max_initial_speed.abs();
        let [m_lo, m_hi] = p.mass_range;

        let mut ids = Vec::with_capacity(p.body_count);
        for _ in 0..p.body_count {
            let x = NVec2::new(
                self.rng.random_range(x_range.clone()),
                self.rng.random_range(y_range.clone()),
            );
            let v = if s > 0.0 {
                NVec2::new(self.rng.random_range(-s..=s), self.rng.random_range(-s..=s))
            } else {
                NVec2::zeros()
            };
            let m = self.rng.random_range(m_lo..=m_hi);
            let color = Hsb::random(&mut self.rng);
            // mass range is validated positive, so construction cannot fail
            let body = Body { x, v, m, size: m, color };
            ids.push(self.system.bodies.add(Celestial::new(body, p.trail_capacity)));
        }
        debug!(bodies = ids.len(), "three-body run started");
        ids
    }

    /// Archive the current run and start one from explicit bodies
    pub fn start_with(&mut self, bodies: Vec<Body>) -> Result<Vec<EntityId>, SimError> {
        let bodies = bodies
            .into_iter()
            .map(|b| Body::new(b.x, b.v, b.m, b.size, b.color))
            .collect::<Result<Vec<_>, _>>()?;
        self.begin_run();
        let ids = bodies
            .into_iter()
            .map(|b| self.system.bodies.add(Celestial::new(b, self.params.trail_capacity)))
            .collect::<Vec<_>>();
        debug!(bodies = ids.len(), "three-body run started from explicit bodies");
        Ok(ids)
    }

    /// Add a body to the live set; statistics are only recorded while the
    /// live set holds exactly `body_count` bodies
    pub fn add_body(&mut self, body: Body) -> Result<EntityId, SimError> {
        let body = Body::new(body.x, body.v, body.m, body.size, body.color)?;
        let id = self.system.bodies.add(Celestial::new(body, self.params.trail_capacity));
        debug!(%id, "three-body body added");
        Ok(id)
    }

    pub fn set_time_step(&mut self, time_step: f64) -> Result<(), SimError> {
        if !(time_step.is_finite() && time_step > 0.0) {
            return Err(SimError::ParameterOutOfRange {
                name: "time_step",
                value: time_step,
                min: f64::MIN_POSITIVE,
                max: f64::MAX,
            });
        }
        self.params.time_step = time_step;
        Ok(())
    }

    pub fn set_substeps(&mut self, substeps: u32) -> Result<(), SimError> {
        if substeps == 0 {
            return Err(SimError::ParameterOutOfRange {
                name: "substeps",
                value: 0.0,
                min: 1.0,
                max: u32::MAX as f64,
            });
        }
        self.params.substeps = substeps;
        Ok(())
    }

    pub fn set_update_order(&mut self, order: UpdateOrder) {
        self.params.update_order = order;
    }

    pub fn params(&self) -> &ThreeBodyParams {
        &self.params
    }

    pub fn bodies(&self) -> impl Iterator<Item = (EntityId, &Celestial)> + '_ {
        self.system.bodies.iter()
    }

    pub fn current_run(&self) -> Option<&Run> {
        self.current.as_ref()
    }

    /// Completed runs, oldest first
    pub fn history(&self) -> &[Run] {
        &self.history
    }

    pub fn mapper(&self) -> &PhaseSpaceMapper {
        &self.mapper
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    fn positions(&self) -> Vec<NVec2> {
        self.system.bodies.values().map(|c| c.body.x).collect()
    }

    fn velocities(&self) -> Vec<NVec2> {
        self.system.bodies.values().map(|c| c.body.v).collect()
    }

    /// Integrate once with the current time step and record statistics
    fn substep(&mut self) {
        let dt = self.params.time_step;
        match self.params.update_order {
            UpdateOrder::Sequential => sequential_integrator(&mut self.system, &self.forces, dt),
            UpdateOrder::Simultaneous => euler_integrator(&mut self.system, &self.forces, dt),
        }

        // per body: mean distance to the others against own speed
        let positions = self.positions();
        for (i, c) in self.system.bodies.values_mut().enumerate() {
            let sample = PhaseSample::new(mean_distance_to_others(&positions, i), c.body.v.norm());
            c.trail.record(c.body.x, sample);
        }

        if self.system.bodies.len() == self.params.body_count {
            let sample = PhaseSample::new(
                mean_separation(&positions),
                mean_speed(&self.velocities()),
            );
            if let Some(run) = self.current.as_mut() {
                run.samples.push(sample);
            }
        }
    }
}

impl Sketch for ThreeBodySketch {
    fn kind(&self) -> SketchKind {
        SketchKind::ThreeBody
    }

    /// Runs `substeps` integrator steps, each of length `time_step`
    fn tick(&mut self) {
        for _ in 0..self.params.substeps {
            self.substep();
        }
        trace!(t = self.system.t, "three-body frame");
    }

    fn clear(&mut self) -> Vec<EntityId> {
        let ids = self.system.bodies.clear();
        debug!(count = ids.len(), "three-body bodies cleared");
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
        let runs = self
            .history
            .iter()
            .map(|r| (r, false))
            .chain(self.current.iter().map(|r| (r, true)))
            .map(|(r, active)| RunSnapshot {
                color: r.color,
                active,
                phase: self.mapper.map_all(r.samples.iter()),
            })
            .collect();
        SketchSnapshot {
            kind: SketchKind::ThreeBody,
            elapsed: self.system.t,
            attractor: None,
            entities,
            runs,
            axes: AxesSnapshot::from_mapper(&self.mapper),
        }
    }
}
