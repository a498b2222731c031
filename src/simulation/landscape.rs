//! Gradient descent on a toroidal height field
//!
//! Balls dropped on the field accelerate down the local slope until their
//! speed falls below the critical velocity, at which point they are stuck for
//! good. The phase plot shows radial distance from the drop point against
//! speed; its distance axis grows with the furthest excursion seen so far.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::error::SimError;
use crate::visualization::snapshot::{points, AxesSnapshot, EntitySnapshot, Marker, SketchSnapshot};

use super::engine::{Sketch, SketchKind};
use super::integrator::Step;
use super::mapper::{AxisRange, Domain, GrowingRange, PhaseSpaceMapper, PlotArea};
use super::params::{Canvas, LandscapeParams};
use super::states::{is_finite_vec, EntityId, Hsb, NVec2};
use super::store::StateStore;
use super::torus::Torus;
use super::trajectory::{PhaseSample, Trail};

/// Circular bump or dip placed on the field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spot {
    pub center: NVec2,
    pub radius: f64,
}

/// Discrete height values on a `width x height` torus, stored row-major
#[derive(Debug, Clone)]
pub struct HeightField {
    torus: Torus,
    heights: Vec<f64>,
}

impl HeightField {
    pub fn from_fn<F>(width: usize, height: usize, mut f: F) -> Result<Self, SimError>
    where
        F: FnMut(usize, usize) -> f64,
    {
        if width == 0 || height == 0 {
            return Err(SimError::EmptyField { width, height });
        }
        let mut heights = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                heights.push(f(x, y));
            }
        }
        Ok(Self {
            torus: Torus::new(width, height),
            heights,
        })
    }

    pub fn flat(width: usize, height: usize, value: f64) -> Result<Self, SimError> {
        Self::from_fn(width, height, |_, _| value)
    }

    /// Base plane with high spots and low spots carved into it
    ///
    /// A cell inside a high spot rises to `high_value` at the centre, falling
    /// off as `(d/r)^exponent` toward the base. Low spots mirror this downwards
    /// and take precedence where they overlap a high spot.
    pub fn with_spots(
        width: usize,
        height: usize,
        params: &LandscapeParams,
        high: &[Spot],
        low: &[Spot],
    ) -> Result<Self, SimError> {
        let torus = Torus::new(width, height);
        let base = params.base_height;
        let profile = |spot: &Spot, cell: NVec2| -> Option<f64> {
            let d = torus.distance(cell, spot.center);
            (d <= spot.radius).then(|| (d / spot.radius).powf(params.exponent))
        };

        Self::from_fn(width, height, |x, y| {
            let cell = NVec2::new(x as f64, y as f64);
            let mut h = base;
            if let Some(k) = high.iter().find_map(|s| profile(s, cell)) {
                h = params.high_value - k * (params.high_value - base);
            }
            if let Some(k) = low.iter().find_map(|s| profile(s, cell)) {
                h = params.low_value + k * (base - params.low_value);
            }
            h
        })
    }

    /// Random terrain using the spot counts and radii from `params`
    pub fn generate<R: Rng>(
        width: usize,
        height: usize,
        params: &LandscapeParams,
        rng: &mut R,
    ) -> Result<Self, SimError> {
        if width == 0 || height == 0 {
            return Err(SimError::EmptyField { width, height });
        }
        let [r_lo, r_hi] = params.spot_radius;
        let spot = |rng: &mut R| Spot {
            center: NVec2::new(
                rng.random_range(0..width) as f64,
                rng.random_range(0..height) as f64,
            ),
            radius: rng.random_range(r_lo..=r_hi),
        };
        let high: Vec<Spot> = (0..params.high_spots).map(|_| spot(&mut *rng)).collect();
        let low: Vec<Spot> = (0..params.low_spots).map(|_| spot(&mut *rng)).collect();
        Self::with_spots(width, height, params, &high, &low)
    }

    pub fn torus(&self) -> Torus {
        self.torus
    }

    pub fn width(&self) -> usize {
        self.torus.width
    }

    pub fn height(&self) -> usize {
        self.torus.height
    }

    pub fn at(&self, (x, y): (usize, usize)) -> f64 {
        self.heights[y * self.torus.width + x]
    }

    /// Height of the cell containing `p`, wrapping out-of-range positions
    pub fn height_at(&self, p: NVec2) -> f64 {
        self.at(self.torus.cell(p))
    }

    /// Central-difference slope at the cell containing `p`
    pub fn gradient(&self, p: NVec2) -> NVec2 {
        let c = self.torus.cell(p);
        let h_l = self.at(self.torus.offset(c, -1, 0));
        let h_r = self.at(self.torus.offset(c, 1, 0));
        let h_u = self.at(self.torus.offset(c, 0, -1));
        let h_d = self.at(self.torus.offset(c, 0, 1));
        NVec2::new((h_r - h_l) / 2.0, (h_d - h_u) / 2.0)
    }

    /// Row-major heights, for rendering the terrain image
    pub fn heights(&self) -> &[f64] {
        &self.heights
    }
}

/// Field plus stopping threshold: everything a ball needs to take a step
pub struct Slope<'a> {
    pub field: &'a HeightField,
    pub critical_velocity: f64,
}

#[derive(Debug, Clone)]
pub struct Ball {
    position: NVec2,
    start: NVec2,
    velocity: NVec2,
    size: f64,
    color: Hsb,
    radial_distance: f64,
    stuck: bool,
    trail: Trail,
}

impl Ball {
    pub fn new(position: NVec2, size: f64, color: Hsb, capacity: usize) -> Self {
        Self {
            position,
            start: position,
            velocity: NVec2::zeros(),
            size,
            color,
            radial_distance: 0.0,
            stuck: false,
            trail: Trail::new(capacity),
        }
    }

    pub fn position(&self) -> NVec2 {
        self.position
    }

    pub fn start(&self) -> NVec2 {
        self.start
    }

    pub fn velocity(&self) -> NVec2 {
        self.velocity
    }

    pub fn speed(&self) -> f64 {
        self.velocity.norm()
    }

    pub fn radial_distance(&self) -> f64 {
        self.radial_distance
    }

    pub fn is_stuck(&self) -> bool {
        self.stuck
    }

    pub fn trail(&self) -> &Trail {
        &self.trail
    }
}

impl<'a> Step<Slope<'a>> for Ball {
    fn step(&mut self, ctx: &Slope<'a>) {
        if self.stuck {
            return;
        }
        let torus = ctx.field.torus();

        self.velocity -= ctx.field.gradient(self.position);
        self.position = torus.wrap(self.position + self.velocity);
        self.radial_distance = torus.distance(self.position, self.start);

        if self.velocity.norm() < ctx.critical_velocity {
            self.stuck = true;
        }

        self.trail.record(
            self.position,
            PhaseSample::new(self.radial_distance, self.velocity.norm()),
        );
    }
}

pub struct LandscapeSketch {
    params: LandscapeParams,
    canvas: Canvas,
    field: HeightField,
    balls: StateStore<Ball>,
    mapper: PhaseSpaceMapper,
    ticks: f64,
    rng: StdRng,
}

impl LandscapeSketch {
    /// Build the sketch and generate its first terrain
    pub fn new(params: LandscapeParams, canvas: Canvas, seed: u64) -> Result<Self, SimError> {
        params.validate()?;
        canvas.validate()?;
        let mut rng = StdRng::seed_from_u64(seed);
        let field = HeightField::generate(
            canvas.panel_width().floor() as usize,
            canvas.height.floor() as usize,
            &params,
            &mut rng,
        )?;
        Ok(Self::with_field(params, canvas, field, rng))
    }

    /// Use a prepared field instead of a random one
    pub fn with_field(params: LandscapeParams, canvas: Canvas, field: HeightField, rng: StdRng) -> Self {
        let mapper = PhaseSpaceMapper::new(
            Domain::Growing(GrowingRange::new(1.0)),
            Domain::Fixed(AxisRange::new(0.0, params.max_velocity)),
            PlotArea::inset(canvas.panel_width(), canvas.height, params.plot_margin),
        );
        Self {
            params,
            canvas,
            field,
            balls: StateStore::new(),
            mapper,
            ticks: 0.0,
            rng,
        }
    }

    /// Generate a fresh terrain, dropping every ball and the distance scale
    pub fn create_landscape(&mut self) -> Result<(), SimError> {
        self.field = HeightField::generate(self.field.width(), self.field.height(), &self.params, &mut self.rng)?;
        let dropped = self.balls.clear();
        self.mapper.reset();
        debug!(dropped = dropped.len(), "landscape regenerated");
        Ok(())
    }

    /// Drop a ball at rest; the position is wrapped onto the field
    pub fn add_ball(&mut self, position: NVec2) -> Result<EntityId, SimError> {
        if !is_finite_vec(&position) {
            return Err(SimError::NonFiniteState);
        }
        let position = self.field.torus().wrap(position);
        let color = Hsb::random(&mut self.rng);
        let id = self
            .balls
            .add(Ball::new(position, self.params.ball_size, color, self.params.trail_capacity));
        debug!(%id, x = position.x, y = position.y, "ball added");
        Ok(id)
    }

    pub fn field(&self) -> &HeightField {
        &self.field
    }

    pub fn get(&self, id: EntityId) -> Option<&Ball> {
        self.balls.get(id)
    }

    pub fn balls(&self) -> impl Iterator<Item = (EntityId, &Ball)> + '_ {
        self.balls.iter()
    }

    /// Current upper bound of the radial distance axis
    pub fn max_radial_distance(&self) -> f64 {
        self.mapper.x_domain.range().max
    }

    pub fn mapper(&self) -> &PhaseSpaceMapper {
        &self.mapper
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }
}

impl Sketch for LandscapeSketch {
    fn kind(&self) -> SketchKind {
        SketchKind::Landscape
    }

    fn tick(&mut self) {
        let slope = Slope {
            field: &self.field,
            critical_velocity: self.params.critical_velocity,
        };
        for ball in self.balls.values_mut() {
            if ball.stuck {
                continue;
            }
            ball.step(&slope);
            if let Some(sample) = ball.trail.phase.latest() {
                self.mapper.observe(*sample);
            }
        }
        self.ticks += 1.0;
    }

    fn clear(&mut self) -> Vec<EntityId> {
        let ids = self.balls.clear();
        debug!(count = ids.len(), "balls cleared");
        ids
    }

    fn entity_count(&self) -> usize {
        self.balls.len()
    }

    fn elapsed(&self) -> f64 {
        self.ticks
    }

    fn snapshot(&self) -> SketchSnapshot {
        let entities = self
            .balls
            .iter()
            .map(|(id, b)| EntitySnapshot {
                id,
                position: [b.position.x, b.position.y],
                size: b.size,
                color: b.color,
                marker: if b.stuck { Marker::Cross } else { Marker::Dot },
                trail: points(&b.trail.primary),
                phase: self.mapper.map_all(b.trail.phase.iter()),
            })
            .collect();
        SketchSnapshot {
            kind: SketchKind::Landscape,
            elapsed: self.ticks,
            attractor: None,
            entities,
            runs: Vec::new(),
            axes: AxesSnapshot::from_mapper(&self.mapper),
        }
    }
}
