//! Configuration types for loading sketch scenarios from YAML.
//!
//! A scenario consists of:
//!
//! - [`EngineConfig`]  – frames to run headless and the rng seed
//! - [`Canvas`]        – drawing surface; the left half is the simulation panel
//! - [`SketchConfig`]  – which sketch to build, tagged by `kind`, with its
//!   parameters and initial entities
//! - [`ScenarioConfig`] – top-level wrapper used to load a scenario from YAML
//!
//! # YAML format
//! An example orbital scenario:
//!
//! ```yaml
//! engine:
//!   frames: 1000            # frames to run headless
//!   seed: 7                 # deterministic seed for random construction
//!
//! canvas:
//!   width: 800.0
//!   height: 600.0
//!
//! sketch:
//!   kind: orbital           # oscillator | landscape | orbital | three_body
//!   params:
//!     g: 6.0
//!     circular: true
//!   bodies:
//!     - x: [ 300.0, 300.0 ]
//!     - x: [ 200.0, 150.0 ]
//!       circular: false
//! ```
//!
//! Every `params` block is optional and defaults field by field. The engine
//! maps this configuration into a runtime [`Scenario`](crate::simulation::scenario::Scenario).

use serde::Deserialize;

use crate::simulation::oscillator::OscillatorSpec;
use crate::simulation::params::{Canvas, LandscapeParams, OrbitalParams, OscillatorParams, ThreeBodyParams};

/// Headless run settings
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct EngineConfig {
    pub frames: u64, // frames to run before the snapshot is taken
    pub seed: u64,   // deterministic seed to make runs reproducible
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { frames: 600, seed: 0 }
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct OscillatorConfig {
    #[serde(default)]
    pub params: OscillatorParams,
    #[serde(default)]
    pub oscillators: Vec<OscillatorSpec>, // explicit oscillators, unset fields drawn at random
    #[serde(default)]
    pub random: usize, // extra fully random oscillators
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct LandscapeConfig {
    #[serde(default)]
    pub params: LandscapeParams,
    #[serde(default)]
    pub balls: Vec<[f64; 2]>, // drop positions in field cells
}

/// A body launched around the sun
#[derive(Deserialize, Debug, Clone)]
pub struct OrbitConfig {
    pub x: [f64; 2],            // launch position
    pub circular: Option<bool>, // overrides `params.circular` for this body
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct OrbitalConfig {
    #[serde(default)]
    pub params: OrbitalParams,
    #[serde(default)]
    pub bodies: Vec<OrbitConfig>,
}

/// Configuration for a single body's initial state
#[derive(Deserialize, Debug, Clone)]
pub struct BodyConfig {
    pub x: [f64; 2], // initial position
    #[serde(default)]
    pub v: [f64; 2], // initial velocity per tick
    pub m: f64,      // mass, also the drawing size unless `size` is given
    pub size: Option<f64>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct ThreeBodyConfig {
    #[serde(default)]
    pub params: ThreeBodyParams,
    pub restart_every: Option<u64>, // start a new run every n frames
    #[serde(default)]
    pub bodies: Vec<BodyConfig>, // explicit first run; random when empty
}

#[derive(Deserialize, Debug, Clone)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SketchConfig {
    Oscillator(OscillatorConfig),
    Landscape(LandscapeConfig),
    Orbital(OrbitalConfig),
    ThreeBody(ThreeBodyConfig),
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug, Clone)]
pub struct ScenarioConfig {
    #[serde(default)]
    pub engine: EngineConfig, // frames and seed
    #[serde(default)]
    pub canvas: Canvas, // drawing surface
    pub sketch: SketchConfig, // sketch kind, parameters and initial entities
}

impl ScenarioConfig {
    pub fn from_yaml_str(s: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::params::UpdateOrder;

    #[test]
    fn minimal_file_uses_defaults() {
        let cfg = ScenarioConfig::from_yaml_str("sketch:\n  kind: landscape\n").unwrap();
        assert_eq!(cfg.engine.frames, 600);
        assert_eq!(cfg.canvas, Canvas::default());
        match cfg.sketch {
            SketchConfig::Landscape(l) => {
                assert_eq!(l.params, LandscapeParams::default());
                assert!(l.balls.is_empty());
            }
            other => panic!("wrong sketch: {other:?}"),
        }
    }

    #[test]
    fn partial_params_keep_other_defaults() {
        let yaml = "
engine:
  seed: 9
sketch:
  kind: three_body
  restart_every: 300
  params:
    substeps: 4
    update_order: simultaneous
  bodies:
    - { x: [100.0, 100.0], m: 10.0 }
";
        let cfg = ScenarioConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(cfg.engine.seed, 9);
        let SketchConfig::ThreeBody(tb) = cfg.sketch else {
            panic!("expected three_body");
        };
        assert_eq!(tb.params.substeps, 4);
        assert_eq!(tb.params.update_order, UpdateOrder::Simultaneous);
        assert_eq!(tb.params.g, 1.0);
        assert_eq!(tb.restart_every, Some(300));
        assert_eq!(tb.bodies[0].v, [0.0, 0.0]);
    }

    #[test]
    fn unknown_kind_is_an_error() {
        assert!(ScenarioConfig::from_yaml_str("sketch:\n  kind: pendulum\n").is_err());
    }
}
