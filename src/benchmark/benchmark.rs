use std::time::{Duration, Instant};

use tracing::info;

use crate::error::SimError;
use crate::simulation::engine::{Sketch, SketchKind};
use crate::simulation::params::{Canvas, ThreeBodyParams};
use crate::simulation::scenario::Scenario;
use crate::simulation::three_body::ThreeBodySketch;

/// Wall-clock timing of a batch of frames
#[derive(Debug, Clone)]
pub struct BenchReport {
    pub kind: SketchKind,
    pub frames: u64,
    pub entities: usize,
    pub total: Duration,
}

impl BenchReport {
    /// Mean frame time in milliseconds
    pub fn per_frame_ms(&self) -> f64 {
        if self.frames == 0 {
            return 0.0;
        }
        self.total.as_secs_f64() * 1000.0 / self.frames as f64
    }
}

/// Time `frames` frames of a built scenario
pub fn bench_frames(scenario: &mut Scenario, frames: u64) -> BenchReport {
    // Warm-up
    scenario.frame();

    let t0 = Instant::now();
    for _ in 0..frames {
        scenario.frame();
    }
    let report = BenchReport {
        kind: scenario.sketch.as_dyn().kind(),
        frames,
        entities: scenario.sketch.as_dyn().entity_count(),
        total: t0.elapsed(),
    };
    info!(kind = %report.kind, frames, ms_per_frame = report.per_frame_ms(), "bench done");
    report
}

/// Frame cost of the three-body sketch for each sub-step count
/// Print as `substeps,ms` rows to graph
pub fn bench_three_body_substeps(
    params: &ThreeBodyParams,
    canvas: Canvas,
    seed: u64,
    substeps: &[u32],
    frames: u64,
) -> Result<Vec<(u32, BenchReport)>, SimError> {
    let mut out = Vec::with_capacity(substeps.len());
    for &n in substeps {
        let mut sketch = ThreeBodySketch::new(params.clone(), canvas, seed)?;
        sketch.set_substeps(n)?;
        sketch.start_new();

        let t0 = Instant::now();
        sketch.run(frames);
        let report = BenchReport {
            kind: SketchKind::ThreeBody,
            frames,
            entities: sketch.entity_count(),
            total: t0.elapsed(),
        };
        info!(substeps = n, ms_per_frame = report.per_frame_ms(), "three-body substep bench");
        out.push((n, report));
    }
    Ok(out)
}
