use std::collections::HashSet;

use crate::actions::FunctionId;
use crate::infra::Bounds;

use super::unit::{Alliance, Unit, UnitType};

/// Scalar player counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerInfo {
    pub minerals: u32,
    pub vespene: u32,
    pub food_cap: u32,
    pub food_used: u32,
    pub idle_worker_count: u32,
}

/// Snapshot of the game handed to the agent once per tick. Read-only for the
/// duration of the tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub units: Vec<Unit>,
    pub player: PlayerInfo,
    pub available_actions: HashSet<FunctionId>,
    pub reward: f32,
    pub screen_size: i32,
    pub minimap_size: i32,
    pub raw_resolution: i32,
}

/// Unit filter: optional type, optional alliance, optionally completed only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnitQuery {
    pub unit_type: Option<UnitType>,
    pub alliance: Option<Alliance>,
    pub completed_only: bool,
}

impl UnitQuery {
    pub fn of_type(unit_type: UnitType) -> Self {
        Self {
            unit_type: Some(unit_type),
            ..Self::default()
        }
    }

    pub fn any() -> Self {
        Self::default()
    }

    pub fn owned(mut self) -> Self {
        self.alliance = Some(Alliance::Own);
        self
    }

    pub fn enemy(mut self) -> Self {
        self.alliance = Some(Alliance::Enemy);
        self
    }

    pub fn completed(mut self) -> Self {
        self.completed_only = true;
        self
    }

    pub fn matches(&self, unit: &Unit) -> bool {
        self.unit_type.is_none_or(|t| unit.unit_type == t)
            && self.alliance.is_none_or(|a| unit.alliance == a)
            && (!self.completed_only || unit.is_completed())
    }
}

impl Observation {
    /// Units matching `query`, in the order the bridge reported them.
    pub fn units_matching(&self, query: UnitQuery) -> Vec<&Unit> {
        self.units.iter().filter(|u| query.matches(u)).collect()
    }

    pub fn my_units(&self, unit_type: UnitType) -> Vec<&Unit> {
        self.units_matching(UnitQuery::of_type(unit_type).owned())
    }

    pub fn my_completed_units(&self, unit_type: UnitType) -> Vec<&Unit> {
        self.units_matching(UnitQuery::of_type(unit_type).owned().completed())
    }

    pub fn enemy_units(&self) -> Vec<&Unit> {
        self.units_matching(UnitQuery::any().enemy())
    }

    pub fn enemy_structures(&self) -> Vec<&Unit> {
        self.units
            .iter()
            .filter(|u| u.alliance == Alliance::Enemy && u.unit_type.is_structure())
            .collect()
    }

    /// Neutral units of any of `types`.
    pub fn neutral_units(&self, types: &[UnitType]) -> Vec<&Unit> {
        self.units
            .iter()
            .filter(|u| u.alliance == Alliance::Neutral && types.contains(&u.unit_type))
            .collect()
    }

    pub fn mineral_fields(&self) -> Vec<&Unit> {
        self.neutral_units(&UnitType::MINERAL_FIELDS)
    }

    pub fn geysers(&self) -> Vec<&Unit> {
        self.neutral_units(&UnitType::GEYSERS)
    }

    /// First own main structure, if one is visible.
    pub fn main_structure(&self) -> Option<&Unit> {
        self.units
            .iter()
            .find(|u| u.alliance == Alliance::Own && u.unit_type.is_main_structure())
    }

    pub fn own_unit_count(&self) -> usize {
        self.units.iter().filter(|u| u.alliance == Alliance::Own).count()
    }

    pub fn enemy_unit_count(&self) -> usize {
        self.units.iter().filter(|u| u.alliance == Alliance::Enemy).count()
    }

    /// Supply cap minus supply used; negative when over cap.
    pub fn free_supply(&self) -> i32 {
        self.player.food_cap as i32 - self.player.food_used as i32
    }

    pub fn is_available(&self, id: FunctionId) -> bool {
        self.available_actions.contains(&id)
    }

    pub fn screen_bounds(&self) -> Bounds {
        Bounds::square(self.screen_size)
    }

    pub fn minimap_bounds(&self) -> Bounds {
        Bounds::square(self.minimap_size)
    }

    pub fn world_bounds(&self) -> Bounds {
        Bounds::square(self.raw_resolution)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepType {
    First,
    Mid,
    Last,
}

/// One tick as delivered by the driver.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeStep {
    pub step_type: StepType,
    pub observation: Observation,
}

impl TimeStep {
    pub fn first(&self) -> bool {
        self.step_type == StepType::First
    }

    pub fn last(&self) -> bool {
        self.step_type == StepType::Last
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ObservationBuilder;

    #[test]
    fn test_units_matching_preserves_discovery_order() {
        let obs = ObservationBuilder::new()
            .own_at(UnitType::Probe, (10, 10))
            .own_at(UnitType::Pylon, (20, 20))
            .own_at(UnitType::Probe, (30, 30))
            .enemy_at(UnitType::Probe, (40, 40))
            .build();

        let probes = obs.my_units(UnitType::Probe);
        assert_eq!(probes.len(), 2);
        assert_eq!(probes[0].world.x, 10);
        assert_eq!(probes[1].world.x, 30);
    }

    #[test]
    fn test_completed_filter() {
        let obs = ObservationBuilder::new()
            .own_building(UnitType::Pylon, (20, 20), 40)
            .own_building(UnitType::Pylon, (24, 20), 100)
            .build();

        assert_eq!(obs.my_units(UnitType::Pylon).len(), 2);
        let completed = obs.my_completed_units(UnitType::Pylon);
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].world.x, 24);
    }

    #[test]
    fn test_no_match_is_empty_not_error() {
        let obs = ObservationBuilder::new().build();
        assert!(obs.my_units(UnitType::Gateway).is_empty());
        assert!(obs.enemy_units().is_empty());
        assert!(obs.main_structure().is_none());
    }

    #[test]
    fn test_free_supply_can_go_negative() {
        let obs = ObservationBuilder::new().supply(15, 17).build();
        assert_eq!(obs.free_supply(), -2);
    }

    #[test]
    fn test_unit_counts_by_alliance() {
        let obs = ObservationBuilder::new()
            .own_at(UnitType::Probe, (1, 1))
            .own_at(UnitType::Nexus, (2, 2))
            .enemy_at(UnitType::Zergling, (50, 50))
            .neutral_at(UnitType::MineralField, (5, 5))
            .build();
        assert_eq!(obs.own_unit_count(), 2);
        assert_eq!(obs.enemy_unit_count(), 1);
        assert_eq!(obs.mineral_fields().len(), 1);
    }

    #[test]
    fn test_neutral_units_by_type() {
        let obs = ObservationBuilder::new()
            .neutral_at(UnitType::MineralField, (5, 5))
            .neutral_at(UnitType::VespeneGeyser, (9, 9))
            .neutral_at(UnitType::MineralField750, (6, 5))
            .own_at(UnitType::Assimilator, (9, 9))
            .build();

        let minerals = obs.neutral_units(&[UnitType::MineralField, UnitType::MineralField750]);
        assert_eq!(minerals.len(), 2);
        assert_eq!(minerals[1].world.x, 6);
        assert_eq!(obs.neutral_units(&[UnitType::VespeneGeyser]).len(), 1);
        assert!(obs.neutral_units(&[UnitType::Assimilator]).is_empty());
    }
}
