use tracing::debug;

use crate::infra::Point;

use super::observation::Observation;

/// Main structures left of this x (raw resolution) mark a left-side start.
pub const HOME_SIDE_THRESHOLD_X: i32 = 32;

/// Which half of the map the starting base is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeSide {
    Left,
    Right,
}

impl HomeSide {
    pub fn from_x(x: i32) -> Self {
        if x < HOME_SIDE_THRESHOLD_X {
            HomeSide::Left
        } else {
            HomeSide::Right
        }
    }

    /// Pick the coordinate of the layout that matches this side.
    pub fn pick<T>(&self, left: T, right: T) -> T {
        match self {
            HomeSide::Left => left,
            HomeSide::Right => right,
        }
    }
}

/// Per-episode memory shared by all policies.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub tick: u64,
    pub home_side: Option<HomeSide>,
    /// World position of the main structure the home side was taken from.
    pub start_location: Option<Point>,
    pub episode_reward: f32,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold the current observation into the session. The home side is taken
    /// from the first main structure ever seen and never revised afterwards.
    pub fn observe(&mut self, observation: &Observation) {
        self.tick += 1;
        self.episode_reward += observation.reward;

        if self.home_side.is_none()
            && let Some(main) = observation.main_structure()
        {
            let side = HomeSide::from_x(main.world.x);
            debug!(
                "Home side established at tick {}: {:?} (main structure at {:?})",
                self.tick, side, main.world
            );
            self.home_side = Some(side);
            self.start_location = Some(main.world);
        }
    }
}
