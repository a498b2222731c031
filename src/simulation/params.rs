//! Numerical and physical parameters for each sketch
//!
//! Every struct deserializes with `#[serde(default)]`, so a scenario file only
//! needs to name the values it changes. Defaults are the constants the
//! sketches were calibrated with.

use std::f64::consts::{FRAC_PI_6, TAU};

use serde::{Deserialize, Serialize};

use crate::error::SimError;

/// Canvas the renderer draws into. The left half holds the simulation, the
/// right half the phase-space plot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
}

impl Default for Canvas {
    fn default() -> Self {
        Self { width: 800.0, height: 600.0 }
    }
}

impl Canvas {
    /// Width of each half-panel
    pub fn panel_width(&self) -> f64 {
        self.width / 2.0
    }

    pub fn validate(&self) -> Result<(), SimError> {
        if !(self.width.is_finite() && self.height.is_finite() && self.width >= 4.0 && self.height >= 2.0) {
            return Err(SimError::InvalidConfig(format!(
                "canvas must be at least 4x2, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }
}

fn check_range(name: &str, r: [f64; 2]) -> Result<(), SimError> {
    if r[0].is_finite() && r[1].is_finite() && r[0] <= r[1] {
        Ok(())
    } else {
        Err(SimError::InvalidConfig(format!("{name} must be an ordered [min, max], got {r:?}")))
    }
}

fn check_non_negative(name: &str, v: f64) -> Result<(), SimError> {
    if v.is_finite() && v >= 0.0 {
        Ok(())
    } else {
        Err(SimError::InvalidConfig(format!("{name} must be finite and non-negative, got {v}")))
    }
}

fn check_positive(name: &str, v: f64) -> Result<(), SimError> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(SimError::InvalidConfig(format!("{name} must be positive, got {v}")))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OscillatorParams {
    pub dt: f64, // seconds per tick
    pub trail_capacity: usize, // phase path length
    pub amplitude_limits: [f64; 2], // slider bounds, also fix the plot domain
    pub frequency_limits: [f64; 2], // Hz
    pub spawn_amplitude: [f64; 2], // random amplitude on add
    pub plot_margin: f64,
}

impl Default for OscillatorParams {
    fn default() -> Self {
        Self {
            dt: 1.0 / 60.0,
            trail_capacity: 500,
            amplitude_limits: [10.0, 200.0],
            frequency_limits: [0.1, 1.0],
            spawn_amplitude: [50.0, 150.0],
            plot_margin: 40.0,
        }
    }
}

impl OscillatorParams {
    pub const ANGLE_LIMITS: [f64; 2] = [0.0, TAU];

    /// Largest displacement any oscillator can reach
    pub fn max_displacement(&self) -> f64 {
        self.amplitude_limits[1]
    }

    /// Largest speed any oscillator can reach
    pub fn max_velocity(&self) -> f64 {
        self.amplitude_limits[1] * TAU * self.frequency_limits[1]
    }

    pub fn validate(&self) -> Result<(), SimError> {
        check_positive("dt", self.dt)?;
        check_range("amplitude_limits", self.amplitude_limits)?;
        check_range("frequency_limits", self.frequency_limits)?;
        check_range("spawn_amplitude", self.spawn_amplitude)?;
        if self.spawn_amplitude[0] < self.amplitude_limits[0] || self.spawn_amplitude[1] > self.amplitude_limits[1] {
            return Err(SimError::InvalidConfig(format!(
                "spawn_amplitude {:?} must lie within amplitude_limits {:?}",
                self.spawn_amplitude, self.amplitude_limits
            )));
        }
        check_positive("amplitude_limits max", self.amplitude_limits[1])?;
        check_positive("frequency_limits max", self.frequency_limits[1])?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LandscapeParams {
    pub critical_velocity: f64, // speed below which a ball is stuck
    pub trail_capacity: usize,
    pub max_velocity: f64, // plot y-axis upper bound
    pub base_height: f64,
    pub high_spots: usize,
    pub low_spots: usize,
    pub high_value: f64, // peak height
    pub low_value: f64, // floor depth
    pub spot_radius: [f64; 2],
    pub exponent: f64, // steepness of spot profiles
    pub ball_size: f64,
    pub plot_margin: f64,
}

impl Default for LandscapeParams {
    fn default() -> Self {
        Self {
            critical_velocity: 0.1,
            trail_capacity: 200,
            max_velocity: 10.0,
            base_height: 0.5,
            high_spots: 3,
            low_spots: 2,
            high_value: 5.0,
            low_value: -5.0,
            spot_radius: [20.0, 40.0],
            exponent: 2.0,
            ball_size: 10.0,
            plot_margin: 50.0,
        }
    }
}

impl LandscapeParams {
    pub fn validate(&self) -> Result<(), SimError> {
        check_range("spot_radius", self.spot_radius)?;
        check_positive("spot_radius min", self.spot_radius[0])?;
        check_positive("max_velocity", self.max_velocity)?;
        if !(self.critical_velocity.is_finite() && self.critical_velocity >= 0.0) {
            return Err(SimError::InvalidConfig(format!(
                "critical_velocity must be non-negative, got {}",
                self.critical_velocity
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitalParams {
    pub g: f64, // gravitational constant
    pub sun_mass: f64,
    pub sun_size: f64,
    pub body_mass: f64,
    pub body_size: f64,
    pub min_d2: f64, // squared-distance clamp floor
    pub max_d2: f64, // squared-distance clamp ceiling
    pub circular: bool, // launch new bodies on circular orbits
    pub speed_jitter: [f64; 2], // speed factor range for non-circular launches
    pub angle_jitter: f64, // max tangent rotation for non-circular launches
    pub trail_capacity: usize,
    pub max_distance: Option<f64>, // plot x-axis bound, half the canvas width when unset
    pub max_velocity: f64, // plot y-axis bound
    pub plot_margin: f64,
}

impl Default for OrbitalParams {
    fn default() -> Self {
        Self {
            g: 6.0,
            sun_mass: 1000.0,
            sun_size: 40.0,
            body_mass: 5.0,
            body_size: 8.0,
            min_d2: 100.0,
            max_d2: 50_000.0,
            circular: true,
            speed_jitter: [0.5, 1.5],
            angle_jitter: FRAC_PI_6,
            trail_capacity: 200,
            max_distance: None,
            max_velocity: 10.0,
            plot_margin: 50.0,
        }
    }
}

impl OrbitalParams {
    pub fn validate(&self) -> Result<(), SimError> {
        check_positive("g", self.g)?;
        check_positive("sun_mass", self.sun_mass)?;
        check_positive("body_mass", self.body_mass)?;
        check_positive("min_d2", self.min_d2)?;
        check_range("d2 clamp", [self.min_d2, self.max_d2])?;
        check_range("speed_jitter", self.speed_jitter)?;
        check_non_negative("angle_jitter", self.angle_jitter)?;
        Ok(())
    }
}

/// How a gravity step walks the bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateOrder {
    /// Each body is moved in turn and later bodies see the moved positions
    #[default]
    Sequential,
    /// Every acceleration comes from the positions at the start of the step
    Simultaneous,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThreeBodyParams {
    pub g: f64,
    pub min_d2: f64,
    pub max_d2: f64,
    pub time_step: f64, // dt multiplier applied to velocity and position updates
    pub substeps: u32, // integrator calls per frame
    pub update_order: UpdateOrder,
    pub body_count: usize,
    pub mass_range: [f64; 2],
    pub max_initial_speed: f64, // per-axis velocity drawn from [-s, s]
    pub spawn_margin: f64,
    pub trail_capacity: usize,
    pub max_data_points: usize, // statistics kept per run
    pub max_separation: Option<f64>, // plot x-axis bound, half the canvas width when unset
    pub max_velocity: f64,
    pub plot_margin: f64,
}

impl Default for ThreeBodyParams {
    fn default() -> Self {
        Self {
            g: 1.0,
            min_d2: 25.0,
            max_d2: 50_000.0,
            time_step: 1.0,
            substeps: 1,
            update_order: UpdateOrder::Sequential,
            body_count: 3,
            mass_range: [5.0, 15.0],
            max_initial_speed: 1.0,
            spawn_margin: 50.0,
            trail_capacity: 200,
            max_data_points: 500,
            max_separation: None,
            max_velocity: 5.0,
            plot_margin: 50.0,
        }
    }
}

impl ThreeBodyParams {
    pub fn validate(&self) -> Result<(), SimError> {
        check_positive("g", self.g)?;
        check_positive("min_d2", self.min_d2)?;
        check_range("d2 clamp", [self.min_d2, self.max_d2])?;
        check_positive("time_step", self.time_step)?;
        if self.substeps == 0 {
            return Err(SimError::InvalidConfig("substeps must be at least 1".to_string()));
        }
        check_non_negative("max_initial_speed", self.max_initial_speed)?;
        check_range("mass_range", self.mass_range)?;
        check_positive("mass_range min", self.mass_range[0])?;
        if self.body_count < 2 {
            return Err(SimError::InvalidConfig(format!(
                "body_count must be at least 2, got {}",
                self.body_count
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oscillator_bounds_follow_limits() {
        let p = OscillatorParams::default();
        assert_eq!(p.max_displacement(), 200.0);
        assert!((p.max_velocity() - 200.0 * TAU).abs() < 1e-9);
    }

    #[test]
    fn defaults_validate() {
        assert!(Canvas::default().validate().is_ok());
        assert!(OscillatorParams::default().validate().is_ok());
        assert!(LandscapeParams::default().validate().is_ok());
        assert!(OrbitalParams::default().validate().is_ok());
        assert!(ThreeBodyParams::default().validate().is_ok());
    }

    #[test]
    fn unbounded_jitter_and_speed_are_rejected() {
        for angle_jitter in [f64::INFINITY, f64::NAN, -0.1] {
            let p = OrbitalParams { circular: false, angle_jitter, ..Default::default() };
            assert!(matches!(p.validate(), Err(SimError::InvalidConfig(_))), "accepted {angle_jitter}");
        }
        for max_initial_speed in [f64::INFINITY, f64::NAN, -1.0] {
            let p = ThreeBodyParams { max_initial_speed, ..Default::default() };
            assert!(matches!(p.validate(), Err(SimError::InvalidConfig(_))), "accepted {max_initial_speed}");
        }
        assert!(ThreeBodyParams { max_initial_speed: 0.0, ..Default::default() }.validate().is_ok());
    }

    #[test]
    fn zero_substeps_are_rejected() {
        let p = ThreeBodyParams { substeps: 0, ..Default::default() };
        assert!(matches!(p.validate(), Err(SimError::InvalidConfig(_))));
    }

    #[test]
    fn inverted_clamp_is_rejected() {
        let p = OrbitalParams { min_d2: 10.0, max_d2: 1.0, ..Default::default() };
        assert!(matches!(p.validate(), Err(SimError::InvalidConfig(_))));
    }
}
