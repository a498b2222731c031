use phasesim::simulation::params::{Canvas, OrbitalParams, OscillatorParams, ThreeBodyParams};
use phasesim::simulation::landscape::HeightField;
use phasesim::{
    AnySketch, Body, ClampedGravity, AccelSet, EntityId, Hsb, NVec2, OrbitalSketch, OscillatorParam,
    OscillatorSketch, OscillatorSpec, Scenario, ScenarioConfig, SimError, Sketch, SketchKind, System, Celestial,
    ThreeBodySketch, TrajectoryBuffer, euler_integrator,
};

/// Build a simple 2-body System separated along the x-axis
pub fn two_body_system(dist: f64, m1: f64, m2: f64) -> System {
    let mut sys = System::default();
    for (x, m) in [(-dist / 2.0, m1), (dist / 2.0, m2)] {
        let body = Body::new(NVec2::new(x, 0.0), NVec2::zeros(), m, m, Hsb::sun()).unwrap();
        sys.bodies.add(Celestial::new(body, 16));
    }
    sys
}

/// Three-body gravity with the default clamp
pub fn gravity_set(p: &ThreeBodyParams) -> AccelSet {
    AccelSet::new().with(ClampedGravity {
        g: p.g,
        min_d2: p.min_d2,
        max_d2: p.max_d2,
    })
}

/// Orbital sketch with the sun at the origin
pub fn orbital_at_origin() -> OrbitalSketch {
    OrbitalSketch::with_sun(OrbitalParams::default(), Canvas::default(), NVec2::zeros(), 42).unwrap()
}

/// Oscillator sketch holding a single fully specified oscillator
pub fn single_oscillator(amplitude: f64, frequency: f64) -> (OscillatorSketch, EntityId) {
    let mut s = OscillatorSketch::new(OscillatorParams::default(), Canvas::default(), 42).unwrap();
    let id = s
        .add(OscillatorSpec {
            amplitude: Some(amplitude),
            frequency: Some(frequency),
            angle: Some(0.0),
            phase: Some(0.0),
        })
        .unwrap();
    (s, id)
}

// ==================================================================================
// Trajectory tests
// ==================================================================================

#[test]
fn buffer_keeps_the_newest_samples() {
    let mut buf = TrajectoryBuffer::new(500);
    for i in 0..600 {
        buf.push(i);
    }
    assert_eq!(buf.len(), 500);
    assert_eq!(buf.iter().next(), Some(&100));
    assert_eq!(buf.latest(), Some(&599));
}

// ==================================================================================
// Oscillator tests
// ==================================================================================

#[test]
fn oscillator_follows_the_analytic_solution() {
    let (mut s, id) = single_oscillator(100.0, 0.5);
    s.advance_to(1.0);
    let o = s.get(id).unwrap();
    // half a period: x = -A, v = 0
    assert!((o.displacement() + 100.0).abs() < 1e-9);
    assert!(o.velocity().abs() < 1e-9);
    assert!((o.position() - NVec2::new(-100.0, 0.0)).norm() < 1e-9);
}

#[test]
fn oscillator_edit_emits_event_and_resets_path() {
    let (mut s, id) = single_oscillator(100.0, 0.5);
    s.run(30);
    assert_eq!(s.get(id).unwrap().trail().phase.len(), 30);
    s.drain_events();

    s.set_parameter(id, OscillatorParam::Frequency, 0.25).unwrap();
    assert!(s.get(id).unwrap().trail().phase.is_empty());
    assert_eq!(s.drain_events().len(), 1);
    assert!(s.set_parameter(id, OscillatorParam::Amplitude, 500.0).is_err());
}

// ==================================================================================
// Gravity tests
// ==================================================================================

#[test]
fn gravity_newton_third_law() {
    let sys = two_body_system(30.0, 2.0, 3.0);
    let forces = gravity_set(&ThreeBodyParams::default());

    let masses: Vec<_> = sys
        .bodies
        .values()
        .map(|c| phasesim::simulation::forces::PointMass { x: c.body.x, m: c.body.m })
        .collect();
    let mut acc = vec![NVec2::zeros(); 2];
    forces.accumulate_accels(&masses, &mut acc);

    let net = acc[0] * masses[0].m + acc[1] * masses[1].m;
    assert!(net.norm() < 1e-12, "Net momentum not zero: {:?}", net);
    assert!(acc[0].x > 0.0, "Acceleration is not toward second body");
}

#[test]
fn close_pass_stays_finite() {
    let mut sys = two_body_system(1e-9, 10.0, 10.0);
    let forces = gravity_set(&ThreeBodyParams::default());
    for _ in 0..100 {
        euler_integrator(&mut sys, &forces, 1.0);
    }
    for c in sys.bodies.values() {
        assert!(c.body.x.x.is_finite() && c.body.v.norm() < 100.0);
    }
}

// ==================================================================================
// Orbital tests
// ==================================================================================

#[test]
fn near_circular_orbit_holds_its_radius() {
    let mut s = orbital_at_origin();
    let id = s.add_body(NVec2::new(100.0, 0.0)).unwrap();
    for _ in 0..1000 {
        s.tick();
        let r = s.radius_of(&s.get(id).unwrap().body);
        assert!((r - 100.0).abs() < 8.0, "radius left the band: {r}");
    }
}

#[test]
fn orbital_phase_points_stay_on_the_plot() {
    let mut s = orbital_at_origin();
    s.add_body(NVec2::new(120.0, 0.0)).unwrap();
    s.run(50);
    let snap = s.snapshot();
    let area = snap.axes.area;
    for p in &snap.entities[0].phase {
        assert!(p.x >= area.left && p.x <= area.right);
        assert!(p.y >= area.top && p.y <= area.bottom);
    }
    assert!(snap.attractor.is_some());
}

// ==================================================================================
// Landscape tests
// ==================================================================================

#[test]
fn rolling_in_a_bowl_stays_on_the_torus() {
    let field = HeightField::from_fn(64, 64, |x, y| {
        let (dx, dy) = (x as f64 - 32.0, y as f64 - 32.0);
        0.01 * (dx * dx + dy * dy)
    })
    .unwrap();
    let torus = field.torus();
    let mut pos = NVec2::new(20.0, 40.0);
    let mut vel = NVec2::zeros();
    for _ in 0..200 {
        vel -= field.gradient(pos);
        pos = torus.wrap(pos + vel);
        assert!(pos.x >= 0.0 && pos.x < 64.0 && pos.y >= 0.0 && pos.y < 64.0);
    }
}

// ==================================================================================
// Three-body tests
// ==================================================================================

#[test]
fn three_body_runs_are_archived() {
    let mut s = ThreeBodySketch::new(ThreeBodyParams::default(), Canvas::default(), 8).unwrap();
    s.start_new();
    s.run(20);
    s.start_new();
    s.run(5);
    assert_eq!(s.history().len(), 1);
    assert_eq!(s.history()[0].samples.len(), 20);
    assert_eq!(s.current_run().unwrap().samples.len(), 5);
    assert!(s.current_run().unwrap().samples.iter().all(|p| p.x >= 0.0 && p.y >= 0.0));
}

// ==================================================================================
// Scenario tests
// ==================================================================================

#[test]
fn yaml_scenario_builds_and_runs() {
    let yaml = "
engine:
  frames: 120
  seed: 4
sketch:
  kind: oscillator
  random: 2
  oscillators:
    - { amplitude: 100.0, frequency: 0.5 }
";
    let cfg: ScenarioConfig = serde_yaml::from_str(yaml).unwrap();
    let mut sc = Scenario::build_scenario(cfg).unwrap();
    sc.run();
    let snap = sc.snapshot();
    assert_eq!(snap.kind, SketchKind::Oscillator);
    assert_eq!(snap.entities.len(), 3);
    assert!((snap.elapsed - 2.0).abs() < 1e-9);

    let AnySketch::Oscillator(s) = &mut sc.sketch else {
        panic!("expected oscillator sketch");
    };
    assert_eq!(s.drain_events().len(), 3);
}

#[test]
fn yaml_landscape_wraps_dropped_balls() {
    let yaml = "
canvas: { width: 200.0, height: 100.0 }
sketch:
  kind: landscape
  balls: [[150.0, 40.0], [10.0, -5.0]]
";
    let cfg: ScenarioConfig = serde_yaml::from_str(yaml).unwrap();
    let mut sc = Scenario::build_scenario(cfg).unwrap();
    sc.run();
    let snap = sc.snapshot();
    for e in &snap.entities {
        assert!(e.position[0] >= 0.0 && e.position[0] < 100.0);
        assert!(e.position[1] >= 0.0 && e.position[1] < 100.0);
    }
}

#[test]
fn bad_config_values_are_rejected() {
    let yaml = "
sketch:
  kind: three_body
  params: { body_count: 1 }
";
    let cfg: ScenarioConfig = serde_yaml::from_str(yaml).unwrap();
    assert!(Scenario::build_scenario(cfg).is_err());
}

#[test]
fn unbounded_random_ranges_are_rejected() {
    let three_body = "
sketch:
  kind: three_body
  params: { max_initial_speed: .inf }
";
    let orbital = "
sketch:
  kind: orbital
  params: { circular: false, angle_jitter: .inf }
  bodies:
    - x: [300.0, 300.0]
";
    for yaml in [three_body, orbital] {
        let cfg: ScenarioConfig = serde_yaml::from_str(yaml).unwrap();
        assert!(matches!(Scenario::build_scenario(cfg), Err(SimError::InvalidConfig(_))));
    }
}
