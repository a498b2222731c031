use proptest::prelude::*;

use phasesim::{map_range, oscillator_state, AxisRange, PhaseSample, PhaseSpaceMapper, PlotArea, TrajectoryBuffer};

proptest! {
    #[test]
    fn buffer_never_exceeds_capacity(cap in 1usize..64, pushes in 0usize..256) {
        let mut buf = TrajectoryBuffer::new(cap);
        for i in 0..pushes {
            buf.push(i);
        }
        prop_assert_eq!(buf.len(), pushes.min(cap));
        // oldest retained sample is the first one not evicted
        if pushes > 0 {
            prop_assert_eq!(buf.iter().next().copied(), Some(pushes.saturating_sub(cap)));
        }
    }

    #[test]
    fn oscillator_stays_on_its_ellipse(
        amplitude in 10.0f64..200.0,
        frequency in 0.1f64..1.0,
        phase in 0.0f64..std::f64::consts::TAU,
        t in 0.0f64..1000.0,
    ) {
        let omega = std::f64::consts::TAU * frequency;
        let (x, v) = oscillator_state(amplitude, omega, phase, t);
        let level = (x / amplitude).powi(2) + (v / (omega * amplitude)).powi(2);
        prop_assert!((level - 1.0).abs() < 1e-9, "ellipse level {}", level);
    }

    #[test]
    fn map_range_is_affine(
        d_min in -1e3f64..1e3,
        span in 1e-3f64..1e3,
        r_min in -1e3f64..1e3,
        r_max in -1e3f64..1e3,
        a in -1e3f64..1e3,
        b in -1e3f64..1e3,
    ) {
        let d_max = d_min + span;
        let f = |v: f64| map_range(v, d_min, d_max, r_min, r_max);
        prop_assert!((f(d_min) - r_min).abs() < 1e-6);
        prop_assert!((f(d_max) - r_max).abs() < 1e-6);
        // midpoints map to midpoints
        let mid = f((a + b) / 2.0);
        let tol = 1e-9 * (1.0 + f(a).abs() + f(b).abs());
        prop_assert!((mid - (f(a) + f(b)) / 2.0).abs() < tol.max(1e-6));
    }

    #[test]
    fn in_domain_samples_land_in_the_plot(x in -200.0f64..200.0, y in -50.0f64..50.0) {
        let area = PlotArea::inset(400.0, 600.0, 40.0);
        let mapper = PhaseSpaceMapper::fixed(AxisRange::symmetric(200.0), AxisRange::symmetric(50.0), area);
        let p = mapper.map(PhaseSample::new(x, y));
        prop_assert!(p.x >= area.left - 1e-9 && p.x <= area.right + 1e-9);
        prop_assert!(p.y >= area.top - 1e-9 && p.y <= area.bottom + 1e-9);
    }
}
