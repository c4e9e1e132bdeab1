mod observation;
mod session;
mod unit;

pub use observation::{Observation, PlayerInfo, StepType, TimeStep, UnitQuery};
pub use session::{HOME_SIDE_THRESHOLD_X, HomeSide, Session};
pub use unit::{Alliance, CoordinateSpace, Unit, UnitTag, UnitType};
