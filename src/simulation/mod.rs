pub mod states;
pub mod params;
pub mod engine;
pub mod store;
pub mod trajectory;
pub mod mapper;
pub mod forces;
pub mod integrator;
pub mod torus;
pub mod oscillator;
pub mod landscape;
pub mod orbital;
pub mod three_body;
pub mod scenario;
