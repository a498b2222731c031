//! Build fully-initialized sketch scenarios from configuration
//!
//! Takes a `ScenarioConfig` (YAML-facing) and produces a runtime bundle
//! containing:
//! - engine settings and frame counter (`Engine`)
//! - the canvas the sketch lays itself out on
//! - the sketch itself with its initial entities (`AnySketch`)

use tracing::{info, trace};

use crate::configuration::config::{ScenarioConfig, SketchConfig};
use crate::error::SimError;
use crate::visualization::snapshot::SketchSnapshot;

use super::engine::{Engine, Sketch};
use super::landscape::LandscapeSketch;
use super::orbital::OrbitalSketch;
use super::oscillator::OscillatorSketch;
use super::params::Canvas;
use super::states::{Body, Hsb, NVec2};
use super::three_body::ThreeBodySketch;

/// One of the four sketches, chosen by the scenario's `kind`
pub enum AnySketch {
    Oscillator(OscillatorSketch),
    Landscape(LandscapeSketch),
    Orbital(OrbitalSketch),
    ThreeBody(ThreeBodySketch),
}

impl AnySketch {
    pub fn as_dyn(&self) -> &dyn Sketch {
        match self {
            AnySketch::Oscillator(s) => s,
            AnySketch::Landscape(s) => s,
            AnySketch::Orbital(s) => s,
            AnySketch::ThreeBody(s) => s,
        }
    }

    pub fn as_dyn_mut(&mut self) -> &mut dyn Sketch {
        match self {
            AnySketch::Oscillator(s) => s,
            AnySketch::Landscape(s) => s,
            AnySketch::Orbital(s) => s,
            AnySketch::ThreeBody(s) => s,
        }
    }
}

/// Runtime bundle constructed from a [`ScenarioConfig`]
pub struct Scenario {
    pub engine: Engine,
    pub canvas: Canvas,
    pub sketch: AnySketch,
    restart_every: Option<u64>, // three-body only
}

impl Scenario {
    pub fn build_scenario(cfg: ScenarioConfig) -> Result<Self, SimError> {
        let engine = Engine::new(cfg.engine.frames, cfg.engine.seed);
        let canvas = cfg.canvas;
        let mut restart_every = None;

        let sketch = match cfg.sketch {
            SketchConfig::Oscillator(c) => {
                let mut s = OscillatorSketch::new(c.params, canvas, engine.seed)?;
                for spec in c.oscillators {
                    s.add(spec)?;
                }
                for _ in 0..c.random {
                    s.add_random();
                }
                AnySketch::Oscillator(s)
            }
            SketchConfig::Landscape(c) => {
                let mut s = LandscapeSketch::new(c.params, canvas, engine.seed)?;
                for [x, y] in c.balls {
                    s.add_ball(NVec2::new(x, y))?;
                }
                AnySketch::Landscape(s)
            }
            SketchConfig::Orbital(c) => {
                let mut s = OrbitalSketch::new(c.params, canvas, engine.seed)?;
                for b in c.bodies {
                    let at = NVec2::new(b.x[0], b.x[1]);
                    match b.circular {
                        Some(circular) => s.add_body_with(at, circular)?,
                        None => s.add_body(at)?,
                    };
                }
                AnySketch::Orbital(s)
            }
            SketchConfig::ThreeBody(c) => {
                let mut s = ThreeBodySketch::new(c.params, canvas, engine.seed)?;
                if c.bodies.is_empty() {
                    s.start_new();
                } else {
                    // Bodies: map `BodyConfig` -> runtime `Body` using nalgebra vectors
                    let bodies = c
                        .bodies
                        .iter()
                        .enumerate()
                        .map(|(i, bc)| {
                            let color = Hsb { h: (i as f64 * 120.0) % 360.0, s: 85.0, b: 60.0 };
                            Body::new(
                                NVec2::new(bc.x[0], bc.x[1]),
                                NVec2::new(bc.v[0], bc.v[1]),
                                bc.m,
                                bc.size.unwrap_or(bc.m),
                                color,
                            )
                        })
                        .collect::<Result<Vec<_>, _>>()?;
                    s.start_with(bodies)?;
                }
                restart_every = c.restart_every.filter(|&n| n > 0);
                AnySketch::ThreeBody(s)
            }
        };

        let scenario = Self { engine, canvas, sketch, restart_every };
        info!(
            kind = %scenario.sketch.as_dyn().kind(),
            entities = scenario.sketch.as_dyn().entity_count(),
            frames = scenario.engine.frames,
            seed = scenario.engine.seed,
            "scenario built"
        );
        Ok(scenario)
    }

    /// Advance one rendered frame
    pub fn frame(&mut self) {
        if let (AnySketch::ThreeBody(s), Some(n)) = (&mut self.sketch, self.restart_every) {
            if self.engine.frame > 0 && self.engine.frame % n == 0 {
                s.start_new();
            }
        }
        self.sketch.as_dyn_mut().tick();
        self.engine.frame += 1;
        trace!(frame = self.engine.frame, "frame done");
    }

    /// Run the configured number of frames
    pub fn run(&mut self) {
        for _ in 0..self.engine.frames {
            self.frame();
        }
        let sketch = self.sketch.as_dyn();
        info!(
            kind = %sketch.kind(),
            frames = self.engine.frame,
            elapsed = sketch.elapsed(),
            entities = sketch.entity_count(),
            "run complete"
        );
    }

    pub fn snapshot(&self) -> SketchSnapshot {
        self.sketch.as_dyn().snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configuration::config::{EngineConfig, OrbitConfig, OrbitalConfig, ThreeBodyConfig};
    use crate::simulation::engine::SketchKind;

    fn cfg(sketch: SketchConfig) -> ScenarioConfig {
        ScenarioConfig {
            engine: EngineConfig { frames: 10, seed: 3 },
            canvas: Canvas::default(),
            sketch,
        }
    }

    #[test]
    fn orbital_bodies_come_from_config() {
        let sketch = SketchConfig::Orbital(OrbitalConfig {
            bodies: vec![
                OrbitConfig { x: [300.0, 300.0], circular: None },
                OrbitConfig { x: [200.0, 100.0], circular: Some(false) },
            ],
            ..Default::default()
        });
        let mut sc = Scenario::build_scenario(cfg(sketch)).unwrap();
        assert_eq!(sc.sketch.as_dyn().entity_count(), 2);
        sc.run();
        assert_eq!(sc.engine.frame, 10);
        assert_eq!(sc.snapshot().kind, SketchKind::Orbital);
    }

    #[test]
    fn body_on_the_sun_fails_the_build() {
        // sun sits at (200, 300) on the default canvas
        let sketch = SketchConfig::Orbital(OrbitalConfig {
            bodies: vec![OrbitConfig { x: [200.0, 300.0], circular: None }],
            ..Default::default()
        });
        assert!(matches!(
            Scenario::build_scenario(cfg(sketch)),
            Err(SimError::CoincidentWithAttractor)
        ));
    }

    #[test]
    fn three_body_restarts_on_schedule() {
        let sketch = SketchConfig::ThreeBody(ThreeBodyConfig {
            restart_every: Some(4),
            ..Default::default()
        });
        let mut sc = Scenario::build_scenario(cfg(sketch)).unwrap();
        sc.run();
        // restarts before frames 4 and 8
        let AnySketch::ThreeBody(s) = &sc.sketch else {
            panic!("expected three-body sketch");
        };
        assert_eq!(s.history().len(), 2);
        assert_eq!(s.current_run().map(|r| r.samples.len()), Some(2));
        assert_eq!(sc.snapshot().runs.len(), 3);
    }
}
