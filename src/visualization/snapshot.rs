//! Render-facing snapshots
//!
//! What the drawing side receives after each frame: entity positions and
//! trails in simulation-panel coordinates, phase trails already mapped into
//! phase-panel pixels, and the axis layout. Everything is `Serialize` so the
//! CLI can dump a frame as YAML.

use serde::Serialize;

use crate::simulation::engine::SketchKind;
use crate::simulation::mapper::{AxisRange, AxisTick, PhaseSpaceMapper, PlotArea, PlotPoint};
use crate::simulation::states::{EntityId, Hsb, NVec2};
use crate::simulation::trajectory::TrajectoryBuffer;

/// Tick count used for axis labels
pub const AXIS_TICKS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Marker {
    Dot,
    /// Entity has stopped for good
    Cross,
}

#[derive(Debug, Clone, Serialize)]
pub struct EntitySnapshot {
    pub id: EntityId,
    pub position: [f64; 2],
    pub size: f64,
    pub color: Hsb,
    pub marker: Marker,
    pub trail: Vec<[f64; 2]>,
    pub phase: Vec<PlotPoint>,
}

impl EntitySnapshot {
    /// Current point on the phase plot, drawn as the larger dot
    pub fn phase_head(&self) -> Option<PlotPoint> {
        self.phase.last().copied()
    }
}

/// Statistics trail of one three-body run
#[derive(Debug, Clone, Serialize)]
pub struct RunSnapshot {
    pub color: Hsb,
    pub active: bool,
    pub phase: Vec<PlotPoint>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AxesSnapshot {
    pub x: AxisRange,
    pub y: AxisRange,
    pub area: PlotArea,
    pub x_ticks: Vec<AxisTick>,
    pub y_ticks: Vec<AxisTick>,
}

impl AxesSnapshot {
    pub fn from_mapper(mapper: &PhaseSpaceMapper) -> Self {
        Self {
            x: mapper.x_domain.range(),
            y: mapper.y_domain.range(),
            area: mapper.area,
            x_ticks: mapper.x_ticks(AXIS_TICKS),
            y_ticks: mapper.y_ticks(AXIS_TICKS),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SketchSnapshot {
    pub kind: SketchKind,
    pub elapsed: f64,
    /// Fixed attractor (orbital sun), if the sketch has one
    pub attractor: Option<EntitySnapshot>,
    pub entities: Vec<EntitySnapshot>,
    pub runs: Vec<RunSnapshot>,
    pub axes: AxesSnapshot,
}

pub(crate) fn points(buf: &TrajectoryBuffer<NVec2>) -> Vec<[f64; 2]> {
    buf.iter().map(|p| [p.x, p.y]).collect()
}
