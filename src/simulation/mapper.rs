//! Phase-space projection
//!
//! Maps raw physical quantities onto plot coordinates inside the phase panel.
//! The mapping is linear and unclamped: values outside the domain land
//! outside the plot area and the renderer decides what to do with them.

use serde::{Deserialize, Serialize};

use super::trajectory::PhaseSample;

/// Spans narrower than this are treated as degenerate
const MIN_SPAN: f64 = 1e-12;

/// Linear map of `value` from `[d_min, d_max]` onto `[r_min, r_max]`
///
/// A zero-width or non-finite domain maps everything to the range midpoint.
pub fn map_range(value: f64, d_min: f64, d_max: f64, r_min: f64, r_max: f64) -> f64 {
    let span = d_max - d_min;
    if !span.is_finite() || span.abs() < MIN_SPAN {
        return 0.5 * (r_min + r_max);
    }
    r_min + (value - d_min) / span * (r_max - r_min)
}

/// Closed interval on one axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
}

impl AxisRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Symmetric range `[-extent, extent]`
    pub fn symmetric(extent: f64) -> Self {
        Self { min: -extent, max: extent }
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// `count + 1` evenly spaced values from min to max inclusive
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        if count == 0 {
            return vec![self.min];
        }
        (0..=count)
            .map(|i| map_range(i as f64, 0.0, count as f64, self.min, self.max))
            .collect()
    }
}

/// Domain that only ever widens to the largest value observed
///
/// Used for the landscape's radial distance axis. The floor keeps the
/// initial span non-zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrowingRange {
    floor: f64,
    max: f64,
}

impl GrowingRange {
    pub fn new(floor: f64) -> Self {
        Self { floor, max: floor }
    }

    pub fn observe(&mut self, value: f64) {
        if value.is_finite() && value > self.max {
            self.max = value;
        }
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn reset(&mut self) {
        self.max = self.floor;
    }

    pub fn range(&self) -> AxisRange {
        AxisRange::new(0.0, self.max)
    }
}

/// Where an axis gets its bounds from
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Domain {
    /// Derived once from configured limits or calibrated constants
    Fixed(AxisRange),
    /// Recomputed from the largest value seen so far
    Growing(GrowingRange),
}

impl Domain {
    pub fn range(&self) -> AxisRange {
        match self {
            Domain::Fixed(r) => *r,
            Domain::Growing(g) => g.range(),
        }
    }

    pub fn observe(&mut self, value: f64) {
        if let Domain::Growing(g) = self {
            g.observe(value);
        }
    }

    pub fn reset(&mut self) {
        if let Domain::Growing(g) = self {
            g.reset();
        }
    }
}

/// Plot rectangle in phase-panel pixels. `bottom` > `top` since screen y
/// grows downwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlotArea {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl PlotArea {
    /// Panel of `width` x `height` with the same margin on every side
    pub fn inset(width: f64, height: f64, margin: f64) -> Self {
        Self {
            left: margin,
            right: width - margin,
            top: margin,
            bottom: height - margin,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlotPoint {
    pub x: f64,
    pub y: f64,
}

/// Tick value with its pixel position along the axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AxisTick {
    pub value: f64,
    pub position: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseSpaceMapper {
    pub x_domain: Domain,
    pub y_domain: Domain,
    pub area: PlotArea,
}

impl PhaseSpaceMapper {
    pub fn new(x_domain: Domain, y_domain: Domain, area: PlotArea) -> Self {
        Self { x_domain, y_domain, area }
    }

    pub fn fixed(x: AxisRange, y: AxisRange, area: PlotArea) -> Self {
        Self::new(Domain::Fixed(x), Domain::Fixed(y), area)
    }

    /// Widen any growing domains to include `sample`
    pub fn observe(&mut self, sample: PhaseSample) {
        self.x_domain.observe(sample.x);
        self.y_domain.observe(sample.y);
    }

    pub fn reset(&mut self) {
        self.x_domain.reset();
        self.y_domain.reset();
    }

    pub fn map(&self, sample: PhaseSample) -> PlotPoint {
        let xr = self.x_domain.range();
        let yr = self.y_domain.range();
        PlotPoint {
            x: map_range(sample.x, xr.min, xr.max, self.area.left, self.area.right),
            // domain minimum sits on the bottom edge
            y: map_range(sample.y, yr.min, yr.max, self.area.bottom, self.area.top),
        }
    }

    pub fn map_all<'a, I>(&self, samples: I) -> Vec<PlotPoint>
    where
        I: IntoIterator<Item = &'a PhaseSample>,
    {
        samples.into_iter().map(|s| self.map(*s)).collect()
    }

    pub fn x_ticks(&self, count: usize) -> Vec<AxisTick> {
        let r = self.x_domain.range();
        r.ticks(count)
            .into_iter()
            .map(|value| AxisTick {
                value,
                position: map_range(value, r.min, r.max, self.area.left, self.area.right),
            })
            .collect()
    }

    pub fn y_ticks(&self, count: usize) -> Vec<AxisTick> {
        let r = self.y_domain.range();
        r.ticks(count)
            .into_iter()
            .map(|value| AxisTick {
                value,
                position: map_range(value, r.min, r.max, self.area.bottom, self.area.top),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_endpoints_and_midpoint() {
        assert_eq!(map_range(0.0, 0.0, 10.0, 50.0, 350.0), 50.0);
        assert_eq!(map_range(10.0, 0.0, 10.0, 50.0, 350.0), 350.0);
        assert_eq!(map_range(5.0, 0.0, 10.0, 50.0, 350.0), 200.0);
    }

    #[test]
    fn does_not_clamp() {
        assert_eq!(map_range(20.0, 0.0, 10.0, 0.0, 100.0), 200.0);
        assert_eq!(map_range(-10.0, 0.0, 10.0, 0.0, 100.0), -100.0);
    }

    #[test]
    fn zero_span_maps_to_midpoint() {
        assert_eq!(map_range(3.0, 1.0, 1.0, 0.0, 100.0), 50.0);
        assert_eq!(map_range(3.0, 0.0, f64::INFINITY, 0.0, 100.0), 50.0);
    }

    #[test]
    fn growing_range_never_shrinks() {
        let mut g = GrowingRange::new(1.0);
        g.observe(5.0);
        g.observe(2.0);
        g.observe(f64::NAN);
        assert_eq!(g.max(), 5.0);
        g.reset();
        assert_eq!(g.max(), 1.0);
    }

    #[test]
    fn y_axis_is_inverted() {
        let m = PhaseSpaceMapper::fixed(
            AxisRange::new(0.0, 100.0),
            AxisRange::new(0.0, 10.0),
            PlotArea::inset(400.0, 600.0, 50.0),
        );
        let lo = m.map(PhaseSample::new(0.0, 0.0));
        let hi = m.map(PhaseSample::new(100.0, 10.0));
        assert_eq!((lo.x, lo.y), (50.0, 550.0));
        assert_eq!((hi.x, hi.y), (350.0, 50.0));
    }

    #[test]
    fn ticks_cover_range() {
        let m = PhaseSpaceMapper::fixed(
            AxisRange::new(0.0, 400.0),
            AxisRange::new(0.0, 10.0),
            PlotArea::inset(400.0, 600.0, 50.0),
        );
        let ticks = m.x_ticks(5);
        assert_eq!(ticks.len(), 6);
        assert_eq!(ticks[0].position, 50.0);
        assert_eq!(ticks[5].value, 400.0);
        assert_eq!(ticks[5].position, 350.0);
    }
}
