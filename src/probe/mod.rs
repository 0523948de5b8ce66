//! Health probing and sweep strategies

mod http;
mod strategy;

pub use http::{HealthProbe, HttpProber, HEALTH_PATHS};
pub use strategy::first_live;
