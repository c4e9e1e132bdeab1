//! Observation fixtures shared by the unit tests.

use std::collections::HashSet;

use crate::actions::{ActionSchema, FunctionName};
use crate::infra::Point;
use crate::state::{
    Alliance, Observation, PlayerInfo, StepType, TimeStep, Unit, UnitTag, UnitType,
};

#[derive(Clone)]
pub struct ObservationBuilder {
    units: Vec<Unit>,
    player: PlayerInfo,
    available: HashSet<crate::actions::FunctionId>,
    reward: f32,
    next_tag: UnitTag,
}

impl ObservationBuilder {
    pub fn new() -> Self {
        Self {
            units: Vec::new(),
            player: PlayerInfo {
                minerals: 0,
                vespene: 0,
                food_cap: 15,
                food_used: 12,
                idle_worker_count: 0,
            },
            available: HashSet::new(),
            reward: 0.0,
            next_tag: 1,
        }
    }

    fn push(&mut self, unit_type: UnitType, alliance: Alliance, pos: (i32, i32)) -> &mut Unit {
        let tag = self.next_tag;
        self.next_tag += 1;
        let p = Point::from(pos);
        self.units.push(Unit {
            tag,
            unit_type,
            alliance,
            screen: p,
            minimap: p,
            world: p,
            build_progress: 100,
            order_length: 0,
        });
        self.units.last_mut().expect("just pushed")
    }

    pub fn own_at(mut self, unit_type: UnitType, pos: (i32, i32)) -> Self {
        self.push(unit_type, Alliance::Own, pos);
        self
    }

    pub fn own_building(mut self, unit_type: UnitType, pos: (i32, i32), progress: u8) -> Self {
        self.push(unit_type, Alliance::Own, pos).build_progress = progress;
        self
    }

    pub fn own_with_orders(mut self, unit_type: UnitType, pos: (i32, i32), orders: u32) -> Self {
        self.push(unit_type, Alliance::Own, pos).order_length = orders;
        self
    }

    pub fn enemy_at(mut self, unit_type: UnitType, pos: (i32, i32)) -> Self {
        self.push(unit_type, Alliance::Enemy, pos);
        self
    }

    /// Enemy unit whose minimap position differs from its screen position.
    pub fn enemy_on_minimap(mut self, unit_type: UnitType, minimap: (i32, i32)) -> Self {
        let unit = self.push(unit_type, Alliance::Enemy, (200, 200));
        unit.minimap = Point::from(minimap);
        self
    }

    pub fn neutral_at(mut self, unit_type: UnitType, pos: (i32, i32)) -> Self {
        self.push(unit_type, Alliance::Neutral, pos);
        self
    }

    pub fn minerals(mut self, minerals: u32) -> Self {
        self.player.minerals = minerals;
        self
    }

    pub fn vespene(mut self, vespene: u32) -> Self {
        self.player.vespene = vespene;
        self
    }

    pub fn supply(mut self, cap: u32, used: u32) -> Self {
        self.player.food_cap = cap;
        self.player.food_used = used;
        self
    }

    pub fn idle_workers(mut self, count: u32) -> Self {
        self.player.idle_worker_count = count;
        self
    }

    pub fn reward(mut self, reward: f32) -> Self {
        self.reward = reward;
        self
    }

    pub fn available(mut self, schema: &ActionSchema, functions: &[FunctionName]) -> Self {
        for function in functions {
            if let Some(id) = schema.id(*function) {
                self.available.insert(id);
            }
        }
        self
    }

    pub fn build(self) -> Observation {
        Observation {
            units: self.units,
            player: self.player,
            available_actions: self.available,
            reward: self.reward,
            screen_size: 84,
            minimap_size: 64,
            raw_resolution: 64,
        }
    }

    pub fn step(self, step_type: StepType) -> TimeStep {
        TimeStep {
            step_type,
            observation: self.build(),
        }
    }
}
