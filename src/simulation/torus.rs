//! Toroidal wraparound arithmetic for the landscape height field
//!
//! Everything that indexes the field or measures distance across it goes
//! through [`Torus`] so the modulo and sign handling lives in one place.

use super::states::NVec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Torus {
    pub width: usize,
    pub height: usize,
}

impl Torus {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Wrap a possibly negative integer index into `0..n`
    pub fn wrap_index(i: i64, n: usize) -> usize {
        i.rem_euclid(n as i64) as usize
    }

    /// Wrap a coordinate into `[0, n)`
    pub fn wrap_coord(x: f64, n: usize) -> f64 {
        let n = n as f64;
        let w = x.rem_euclid(n);
        // rem_euclid of a tiny negative value can round up to n
        if w >= n {
            0.0
        } else {
            w
        }
    }

    /// Cell containing a continuous position, after wrapping
    pub fn cell(&self, p: NVec2) -> (usize, usize) {
        (
            Self::wrap_index(p.x.floor() as i64, self.width),
            Self::wrap_index(p.y.floor() as i64, self.height),
        )
    }

    /// Neighbouring cell offset by `(dx, dy)`, wrapping at the edges
    pub fn offset(&self, (x, y): (usize, usize), dx: i64, dy: i64) -> (usize, usize) {
        (
            Self::wrap_index(x as i64 + dx, self.width),
            Self::wrap_index(y as i64 + dy, self.height),
        )
    }

    pub fn wrap(&self, p: NVec2) -> NVec2 {
        NVec2::new(
            Self::wrap_coord(p.x, self.width),
            Self::wrap_coord(p.y, self.height),
        )
    }

    /// Shortest separation along one axis of length `n`
    pub fn axis_delta(a: f64, b: f64, n: usize) -> f64 {
        let n = n as f64;
        let d = (a - b).abs() % n;
        d.min(n - d)
    }

    /// Shortest distance between two points, going around the edges if closer
    pub fn distance(&self, a: NVec2, b: NVec2) -> f64 {
        let dx = Self::axis_delta(a.x, b.x, self.width);
        let dy = Self::axis_delta(a.y, b.y, self.height);
        (dx * dx + dy * dy).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_negative_indices() {
        assert_eq!(Torus::wrap_index(-1, 10), 9);
        assert_eq!(Torus::wrap_index(10, 10), 0);
        assert_eq!(Torus::wrap_index(-21, 10), 9);
    }

    #[test]
    fn wraps_coordinates_into_half_open_range() {
        assert_eq!(Torus::wrap_coord(-0.5, 10), 9.5);
        assert_eq!(Torus::wrap_coord(10.0, 10), 0.0);
        let tiny = Torus::wrap_coord(-1e-18, 10);
        assert!((0.0..10.0).contains(&tiny));
    }

    #[test]
    fn offset_crosses_edges() {
        let t = Torus::new(4, 3);
        assert_eq!(t.offset((0, 0), -1, -1), (3, 2));
        assert_eq!(t.offset((3, 2), 1, 1), (0, 0));
    }

    #[test]
    fn distance_goes_around() {
        let t = Torus::new(100, 100);
        let d = t.distance(NVec2::new(1.0, 50.0), NVec2::new(99.0, 50.0));
        assert!((d - 2.0).abs() < 1e-12);
    }
}
