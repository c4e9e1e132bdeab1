pub mod bridge;
mod default_observer;
mod game_observer;
pub mod geometry;
mod types;
pub mod wire;

pub use bridge::{BridgeChannel, BridgeError, BridgeProcess, Episode, ProcessChannel};
pub use default_observer::DefaultObserver;
pub use game_observer::GameObserver;
pub use types::{Bounds, Point};
