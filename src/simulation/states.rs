//! Core state types shared by every sketch.
//!
//! Defines the 2D vector alias, the entity identifier handed out by
//! [`StateStore`](super::store::StateStore), display colors and the
//! generic `Body`/`System` used by the orbital and three-body sketches.

use nalgebra::Vector2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::SimError;

use super::store::StateStore;
use super::trajectory::Trail;

pub type NVec2 = Vector2<f64>;

/// Stable handle for an entity inside a store
/// Ids are never reused within one store, even after `clear`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Display color in HSB space (hue 0..360, saturation/brightness 0..100)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsb {
    pub h: f64,
    pub s: f64,
    pub b: f64,
}

impl Hsb {
    /// Saturated, mid-brightness color with a random hue
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self {
            h: rng.random_range(0.0..360.0),
            s: rng.random_range(70.0..100.0),
            b: rng.random_range(30.0..80.0),
        }
    }

    /// Fixed bright yellow used for the orbital sun
    pub fn sun() -> Self {
        Self { h: 50.0, s: 100.0, b: 100.0 }
    }
}

#[derive(Debug, Clone)]
pub struct Body {
    pub x: NVec2, // position
    pub v: NVec2, // velocity
    pub m: f64, // mass
    pub size: f64, // drawing diameter
    pub color: Hsb,
}

impl Body {
    /// Build a body, rejecting non-positive mass and non-finite state
    pub fn new(x: NVec2, v: NVec2, m: f64, size: f64, color: Hsb) -> Result<Self, SimError> {
        if !(m.is_finite() && m > 0.0) {
            return Err(SimError::InvalidMass(m));
        }
        if !is_finite_vec(&x) || !is_finite_vec(&v) {
            return Err(SimError::NonFiniteState);
        }
        Ok(Self { x, v, m, size, color })
    }
}

/// A body together with its position/phase history
#[derive(Debug, Clone)]
pub struct Celestial {
    pub body: Body,
    pub trail: Trail,
}

impl Celestial {
    pub fn new(body: Body, trail_capacity: usize) -> Self {
        Self {
            body,
            trail: Trail::new(trail_capacity),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct System {
    pub bodies: StateStore<Celestial>, // live bodies
    pub t: f64, // elapsed ticks
}

pub(crate) fn is_finite_vec(v: &NVec2) -> bool {
    v.x.is_finite() && v.y.is_finite()
}

/// Rotate a vector counter-clockwise by `angle` radians
pub fn rotate(v: NVec2, angle: f64) -> NVec2 {
    let (s, c) = angle.sin_cos();
    NVec2::new(v.x * c - v.y * s, v.x * s + v.y * c)
}
