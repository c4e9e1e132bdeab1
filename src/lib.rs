pub mod actions;
pub mod agent;
pub mod bridge_interface;
pub mod config;
pub mod game;
pub mod infra;
pub mod planners;
pub mod state;
pub mod stats;

#[cfg(test)]
mod testing;

// Re-export commonly used types for convenience
pub use agent::Agent;
pub use config::Config;
pub use game::Game;
pub use infra::{Bounds, Point};
