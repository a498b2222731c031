//! Bounded FIFO history of per-entity samples
//!
//! Each entity keeps one buffer of primary-space samples (positions) and one
//! of phase-space samples; both are pushed once per tick so they stay in
//! lockstep.

use std::collections::VecDeque;

use serde::Serialize;

use super::states::NVec2;

/// Fixed-capacity FIFO; pushing past capacity evicts the oldest sample
#[derive(Debug, Clone)]
pub struct TrajectoryBuffer<T> {
    samples: VecDeque<T>,
    capacity: usize,
}

impl<T> TrajectoryBuffer<T> {
    /// A capacity of zero is bumped to one so the latest sample is always kept
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, sample: T) {
        self.samples.push_back(sample);
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Most recent sample
    pub fn latest(&self) -> Option<&T> {
        self.samples.back()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    /// Oldest first
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.samples.iter()
    }
}

/// One raw phase-space sample in physical units (x axis, y axis)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PhaseSample {
    pub x: f64,
    pub y: f64,
}

impl PhaseSample {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Paired position/phase history for one entity
#[derive(Debug, Clone)]
pub struct Trail {
    pub primary: TrajectoryBuffer<NVec2>,
    pub phase: TrajectoryBuffer<PhaseSample>,
}

impl Trail {
    pub fn new(capacity: usize) -> Self {
        Self::with_capacities(capacity, capacity)
    }

    pub fn with_capacities(primary: usize, phase: usize) -> Self {
        Self {
            primary: TrajectoryBuffer::new(primary),
            phase: TrajectoryBuffer::new(phase),
        }
    }

    pub fn record(&mut self, position: NVec2, sample: PhaseSample) {
        self.primary.push(position);
        self.phase.push(sample);
    }

    pub fn reset(&mut self) {
        self.primary.clear();
        self.phase.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evicts_oldest_first() {
        let mut buf = TrajectoryBuffer::new(3);
        for i in 0..5 {
            buf.push(i);
        }
        assert_eq!(buf.iter().copied().collect::<Vec<_>>(), vec![2, 3, 4]);
        assert_eq!(buf.latest(), Some(&4));
    }

    #[test]
    fn capacity_plus_one_keeps_most_recent() {
        let mut buf = TrajectoryBuffer::new(200);
        for i in 0..201 {
            buf.push(i);
        }
        assert_eq!(buf.len(), 200);
        assert_eq!(buf.iter().next(), Some(&1));
    }

    #[test]
    fn zero_capacity_keeps_latest() {
        let mut buf = TrajectoryBuffer::new(0);
        buf.push('a');
        buf.push('b');
        assert_eq!(buf.capacity(), 1);
        assert_eq!(buf.latest(), Some(&'b'));
    }

    #[test]
    fn trail_buffers_advance_together() {
        let mut trail = Trail::new(2);
        for i in 0..4 {
            let f = i as f64;
            trail.record(NVec2::new(f, f), PhaseSample::new(f, -f));
        }
        assert_eq!(trail.primary.len(), trail.phase.len());
        trail.reset();
        assert!(trail.primary.is_empty() && trail.phase.is_empty());
    }
}
