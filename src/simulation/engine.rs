//! Frame driver shared by all sketches
//!
//! [`Sketch`] is the surface the renderer talks to: one `tick` per rendered
//! frame, `clear` on user request, `snapshot` to draw. [`Engine`] holds the
//! run settings and the frame counter.

use serde::{Deserialize, Serialize};

use super::states::EntityId;
use crate::visualization::snapshot::SketchSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SketchKind {
    Oscillator,
    Landscape,
    Orbital,
    ThreeBody,
}

impl std::fmt::Display for SketchKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SketchKind::Oscillator => "oscillator",
            SketchKind::Landscape => "landscape",
            SketchKind::Orbital => "orbital",
            SketchKind::ThreeBody => "three_body",
        };
        f.write_str(name)
    }
}

pub trait Sketch {
    fn kind(&self) -> SketchKind;

    /// Advance by one rendered frame (which may be several integrator steps)
    fn tick(&mut self);

    /// Discard every entity, returning the released ids
    fn clear(&mut self) -> Vec<EntityId>;

    fn entity_count(&self) -> usize;

    /// Elapsed simulated time (seconds for the oscillator, ticks otherwise)
    fn elapsed(&self) -> f64;

    fn snapshot(&self) -> SketchSnapshot;

    fn run(&mut self, frames: u64) {
        for _ in 0..frames {
            self.tick();
        }
    }
}

#[derive(Debug, Clone)]
pub struct Engine {
    pub frames: u64, // frames to run headless
    pub seed: u64, // rng seed for random construction
    pub frame: u64, // frames completed
}

impl Engine {
    pub fn new(frames: u64, seed: u64) -> Self {
        Self { frames, seed, frame: 0 }
    }
}
