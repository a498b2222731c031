pub mod error;
pub mod simulation;
pub mod configuration;
pub mod visualization;
pub mod benchmark;

pub use error::SimError;

pub use simulation::states::{Body, Celestial, System, NVec2, EntityId, Hsb};
pub use simulation::store::StateStore;
pub use simulation::trajectory::{TrajectoryBuffer, PhaseSample, Trail};
pub use simulation::mapper::{map_range, AxisRange, Domain, GrowingRange, PhaseSpaceMapper, PlotArea, PlotPoint};
pub use simulation::forces::{Acceleration, AccelSet, ClampedGravity, FixedAttractor};
pub use simulation::integrator::{euler_integrator, oscillator_state, sequential_integrator, Step};
pub use simulation::engine::{Engine, Sketch, SketchKind};
pub use simulation::oscillator::{ControlEvent, Oscillator, OscillatorParam, OscillatorSketch, OscillatorSpec};
pub use simulation::landscape::{Ball, HeightField, LandscapeSketch};
pub use simulation::orbital::OrbitalSketch;
pub use simulation::three_body::{mean_distance_to_others, mean_separation, mean_speed, pairwise_separations, ThreeBodySketch};
pub use simulation::scenario::{AnySketch, Scenario};

pub use configuration::config::{EngineConfig, BodyConfig, OrbitConfig, SketchConfig, ScenarioConfig};

pub use visualization::snapshot::SketchSnapshot;

pub use benchmark::benchmark::{bench_frames, bench_three_body_substeps, BenchReport};
