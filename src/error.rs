//! Error type for the simulation core.

use thiserror::Error;

use crate::simulation::states::EntityId;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("mass must be positive and finite, got {0}")]
    InvalidMass(f64),

    #[error("position and velocity must be finite")]
    NonFiniteState,

    #[error("{name} = {value} is outside [{min}, {max}]")]
    ParameterOutOfRange {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("no entity with id {0}")]
    UnknownEntity(EntityId),

    #[error("body placed on the attracting mass; orbital speed is undefined")]
    CoincidentWithAttractor,

    #[error("height field must have non-zero dimensions, got {width}x{height}")]
    EmptyField { width: usize, height: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
