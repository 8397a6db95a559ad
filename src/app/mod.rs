//! Application layer containing business logic and shared state.

pub mod config;
pub mod health;
pub mod service;
pub mod state;

pub use config::{Config, LogFormat};
pub use health::{DatabaseHealthCheck, HealthService, NetworkHealthCheck};
pub use service::RosettaService;
pub use state::AppState;
