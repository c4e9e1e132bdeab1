use crate::infra::Point;

pub type UnitTag = u64;

/// Unit types the agents reason about. Everything else is carried as `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitType {
    // Protoss
    Nexus,
    Pylon,
    Assimilator,
    Gateway,
    CyberneticsCore,
    Zealot,
    Stalker,
    Probe,
    // Terran
    CommandCenter,
    SupplyDepot,
    Refinery,
    Barracks,
    Scv,
    Marine,
    // Zerg
    Hatchery,
    Extractor,
    SpawningPool,
    Drone,
    Zergling,
    Overlord,
    // Neutral
    MineralField,
    MineralField750,
    RichMineralField,
    RichMineralField750,
    VespeneGeyser,
    SpacePlatformGeyser,
    RichVespeneGeyser,
    Other(u32),
}

impl UnitType {
    pub const MINERAL_FIELDS: [UnitType; 4] = [
        UnitType::MineralField,
        UnitType::MineralField750,
        UnitType::RichMineralField,
        UnitType::RichMineralField750,
    ];

    pub const GEYSERS: [UnitType; 3] = [
        UnitType::VespeneGeyser,
        UnitType::SpacePlatformGeyser,
        UnitType::RichVespeneGeyser,
    ];

    pub fn from_id(id: u32) -> Self {
        match id {
            59 => UnitType::Nexus,
            60 => UnitType::Pylon,
            61 => UnitType::Assimilator,
            62 => UnitType::Gateway,
            72 => UnitType::CyberneticsCore,
            73 => UnitType::Zealot,
            74 => UnitType::Stalker,
            84 => UnitType::Probe,
            18 => UnitType::CommandCenter,
            19 => UnitType::SupplyDepot,
            20 => UnitType::Refinery,
            21 => UnitType::Barracks,
            45 => UnitType::Scv,
            48 => UnitType::Marine,
            86 => UnitType::Hatchery,
            88 => UnitType::Extractor,
            89 => UnitType::SpawningPool,
            104 => UnitType::Drone,
            105 => UnitType::Zergling,
            106 => UnitType::Overlord,
            341 => UnitType::MineralField,
            483 => UnitType::MineralField750,
            146 => UnitType::RichMineralField,
            147 => UnitType::RichMineralField750,
            342 => UnitType::VespeneGeyser,
            343 => UnitType::SpacePlatformGeyser,
            344 => UnitType::RichVespeneGeyser,
            other => UnitType::Other(other),
        }
    }

    pub fn is_structure(&self) -> bool {
        matches!(
            self,
            UnitType::Nexus
                | UnitType::Pylon
                | UnitType::Assimilator
                | UnitType::Gateway
                | UnitType::CyberneticsCore
                | UnitType::CommandCenter
                | UnitType::SupplyDepot
                | UnitType::Refinery
                | UnitType::Barracks
                | UnitType::Hatchery
                | UnitType::Extractor
                | UnitType::SpawningPool
        )
    }

    pub fn is_main_structure(&self) -> bool {
        matches!(
            self,
            UnitType::Nexus | UnitType::CommandCenter | UnitType::Hatchery
        )
    }

}

/// Ownership of a unit relative to the agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Alliance {
    Own,
    Ally,
    Neutral,
    Enemy,
}

impl Alliance {
    pub fn from_id(id: u32) -> Option<Self> {
        match id {
            1 => Some(Alliance::Own),
            2 => Some(Alliance::Ally),
            3 => Some(Alliance::Neutral),
            4 => Some(Alliance::Enemy),
            _ => None,
        }
    }
}

/// The grid a coordinate lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoordinateSpace {
    Screen,
    Minimap,
    World,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Unit {
    pub tag: UnitTag,
    pub unit_type: UnitType,
    pub alliance: Alliance,
    pub screen: Point,
    pub minimap: Point,
    /// Position in raw (world) resolution.
    pub world: Point,
    /// 0..=100
    pub build_progress: u8,
    pub order_length: u32,
}

impl Unit {
    pub fn position(&self, space: CoordinateSpace) -> Point {
        match space {
            CoordinateSpace::Screen => self.screen,
            CoordinateSpace::Minimap => self.minimap,
            CoordinateSpace::World => self.world,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.build_progress >= 100
    }
}
