//! Function names, their argument signatures, and the per-session table that
//! maps names to the numeric identifiers the bridge uses.

use std::collections::HashMap;
use std::fmt;

use tracing::{debug, warn};

/// Numeric function identifier as announced by the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FunctionId(pub u32);

impl fmt::Display for FunctionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Which action interface the bridge exposes for the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionSpace {
    /// Screen/minimap feature layers: selections and pixel coordinates.
    Features,
    /// Raw interface: unit tags and world coordinates.
    Raw,
}

/// Positional argument kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgKind {
    Queued,
    SelectPointAct,
    SelectAdd,
    SelectWorker,
    Screen,
    Minimap,
    World,
    UnitTags,
    TargetUnitTag,
}

impl ArgKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArgKind::Queued => "queued",
            ArgKind::SelectPointAct => "select_point_act",
            ArgKind::SelectAdd => "select_add",
            ArgKind::SelectWorker => "select_worker",
            ArgKind::Screen => "screen",
            ArgKind::Minimap => "minimap",
            ArgKind::World => "world",
            ArgKind::UnitTags => "unit_tags",
            ArgKind::TargetUnitTag => "target_unit_tag",
        }
    }
}

/// Every function any agent in this crate can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FunctionName {
    NoOp,
    // Feature-layer interface
    SelectPoint,
    SelectIdleWorker,
    SelectArmy,
    AttackMinimap,
    BuildAssimilatorScreen,
    BuildGatewayScreen,
    BuildNexusScreen,
    BuildPylonScreen,
    TrainProbeQuick,
    TrainZealotQuick,
    TrainStalkerQuick,
    ResearchWarpGateQuick,
    ResearchProtossGroundWeaponsQuick,
    ResearchProtossGroundArmorQuick,
    // Raw interface
    RawAttackPt,
    RawBuildGatewayPt,
    RawBuildPylonPt,
    RawHarvestGatherUnit,
    RawTrainProbeQuick,
    RawTrainZealotQuick,
}

const FEATURE_FUNCTIONS: &[FunctionName] = &[
    FunctionName::NoOp,
    FunctionName::SelectPoint,
    FunctionName::SelectIdleWorker,
    FunctionName::SelectArmy,
    FunctionName::AttackMinimap,
    FunctionName::BuildAssimilatorScreen,
    FunctionName::BuildGatewayScreen,
    FunctionName::BuildNexusScreen,
    FunctionName::BuildPylonScreen,
    FunctionName::TrainProbeQuick,
    FunctionName::TrainZealotQuick,
    FunctionName::TrainStalkerQuick,
    FunctionName::ResearchWarpGateQuick,
    FunctionName::ResearchProtossGroundWeaponsQuick,
    FunctionName::ResearchProtossGroundArmorQuick,
];

const RAW_FUNCTIONS: &[FunctionName] = &[
    FunctionName::NoOp,
    FunctionName::RawAttackPt,
    FunctionName::RawBuildGatewayPt,
    FunctionName::RawBuildPylonPt,
    FunctionName::RawHarvestGatherUnit,
    FunctionName::RawTrainProbeQuick,
    FunctionName::RawTrainZealotQuick,
];

impl FunctionName {
    /// Name as the bridge spells it. Raw and feature functions share names
    /// where the game does; the action space disambiguates.
    pub fn as_str(&self) -> &'static str {
        match self {
            FunctionName::NoOp => "no_op",
            FunctionName::SelectPoint => "select_point",
            FunctionName::SelectIdleWorker => "select_idle_worker",
            FunctionName::SelectArmy => "select_army",
            FunctionName::AttackMinimap => "Attack_minimap",
            FunctionName::BuildAssimilatorScreen => "Build_Assimilator_screen",
            FunctionName::BuildGatewayScreen => "Build_Gateway_screen",
            FunctionName::BuildNexusScreen => "Build_Nexus_screen",
            FunctionName::BuildPylonScreen => "Build_Pylon_screen",
            FunctionName::TrainProbeQuick => "Train_Probe_quick",
            FunctionName::TrainZealotQuick => "Train_Zealot_quick",
            FunctionName::TrainStalkerQuick => "Train_Stalker_quick",
            FunctionName::ResearchWarpGateQuick => "Research_WarpGate_quick",
            FunctionName::ResearchProtossGroundWeaponsQuick => {
                "Research_ProtossGroundWeapons_quick"
            }
            FunctionName::ResearchProtossGroundArmorQuick => "Research_ProtossGroundArmor_quick",
            FunctionName::RawAttackPt => "Attack_pt",
            FunctionName::RawBuildGatewayPt => "Build_Gateway_pt",
            FunctionName::RawBuildPylonPt => "Build_Pylon_pt",
            FunctionName::RawHarvestGatherUnit => "Harvest_Gather_unit",
            FunctionName::RawTrainProbeQuick => "Train_Probe_quick",
            FunctionName::RawTrainZealotQuick => "Train_Zealot_quick",
        }
    }

    pub fn all(space: ActionSpace) -> &'static [FunctionName] {
        match space {
            ActionSpace::Features => FEATURE_FUNCTIONS,
            ActionSpace::Raw => RAW_FUNCTIONS,
        }
    }

    pub fn from_str_in(space: ActionSpace, name: &str) -> Option<Self> {
        Self::all(space).iter().copied().find(|f| f.as_str() == name)
    }

    /// Positional argument signature.
    pub fn signature(&self) -> &'static [ArgKind] {
        use ArgKind::*;
        match self {
            FunctionName::NoOp => &[],
            FunctionName::SelectPoint => &[SelectPointAct, Screen],
            FunctionName::SelectIdleWorker => &[SelectWorker],
            FunctionName::SelectArmy => &[SelectAdd],
            FunctionName::AttackMinimap => &[Queued, Minimap],
            FunctionName::BuildAssimilatorScreen
            | FunctionName::BuildGatewayScreen
            | FunctionName::BuildNexusScreen
            | FunctionName::BuildPylonScreen => &[Queued, Screen],
            FunctionName::TrainProbeQuick
            | FunctionName::TrainZealotQuick
            | FunctionName::TrainStalkerQuick
            | FunctionName::ResearchWarpGateQuick
            | FunctionName::ResearchProtossGroundWeaponsQuick
            | FunctionName::ResearchProtossGroundArmorQuick => &[Queued],
            FunctionName::RawAttackPt
            | FunctionName::RawBuildGatewayPt
            | FunctionName::RawBuildPylonPt => &[Queued, UnitTags, World],
            FunctionName::RawHarvestGatherUnit => &[Queued, UnitTags, TargetUnitTag],
            FunctionName::RawTrainProbeQuick | FunctionName::RawTrainZealotQuick => {
                &[Queued, UnitTags]
            }
        }
    }

    fn default_id(&self) -> FunctionId {
        let id = match self {
            FunctionName::NoOp => 0,
            FunctionName::SelectPoint => 2,
            FunctionName::SelectIdleWorker => 6,
            FunctionName::SelectArmy => 7,
            FunctionName::AttackMinimap => 13,
            FunctionName::BuildAssimilatorScreen => 40,
            FunctionName::BuildGatewayScreen => 57,
            FunctionName::BuildNexusScreen => 65,
            FunctionName::BuildPylonScreen => 70,
            FunctionName::ResearchProtossGroundArmorQuick => 381,
            FunctionName::ResearchProtossGroundWeaponsQuick => 384,
            FunctionName::ResearchWarpGateQuick => 428,
            FunctionName::TrainProbeQuick => 485,
            FunctionName::TrainStalkerQuick => 493,
            FunctionName::TrainZealotQuick => 504,
            FunctionName::RawAttackPt => 3,
            FunctionName::RawBuildGatewayPt => 53,
            FunctionName::RawBuildPylonPt => 70,
            FunctionName::RawHarvestGatherUnit => 283,
            FunctionName::RawTrainProbeQuick => 527,
            FunctionName::RawTrainZealotQuick => 566,
        };
        FunctionId(id)
    }
}

impl fmt::Display for FunctionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Name <-> identifier table for one session.
#[derive(Debug, Clone)]
pub struct ActionSchema {
    ids: HashMap<FunctionName, FunctionId>,
    names: HashMap<FunctionId, FunctionName>,
}

impl ActionSchema {
    /// Table used when the bridge does not announce one.
    pub fn defaults(space: ActionSpace) -> Self {
        let mut schema = Self::empty();
        for name in FunctionName::all(space) {
            schema.insert(*name, name.default_id());
        }
        schema
    }

    /// Build the table from the `(name, id)` pairs announced by the bridge.
    /// Names this crate does not use are ignored; functions the bridge did not
    /// announce are unavailable for the session, except `no_op`, which falls
    /// back to its default identifier.
    pub fn from_announced<I, S>(space: ActionSpace, entries: I) -> Self
    where
        I: IntoIterator<Item = (S, u32)>,
        S: AsRef<str>,
    {
        let mut schema = Self::empty();
        for (name, id) in entries {
            match FunctionName::from_str_in(space, name.as_ref()) {
                Some(function) => schema.insert(function, FunctionId(id)),
                None => debug!("Ignoring unused function {} ({})", name.as_ref(), id),
            }
        }

        if !schema.ids.contains_key(&FunctionName::NoOp) {
            warn!("Bridge schema did not announce no_op, using the default identifier");
            schema.insert(FunctionName::NoOp, FunctionName::NoOp.default_id());
        }

        for name in FunctionName::all(space) {
            if !schema.ids.contains_key(name) {
                warn!("Function {} missing from bridge schema, it will never be emitted", name);
            }
        }

        schema
    }

    fn empty() -> Self {
        Self {
            ids: HashMap::new(),
            names: HashMap::new(),
        }
    }

    fn insert(&mut self, name: FunctionName, id: FunctionId) {
        self.ids.insert(name, id);
        self.names.insert(id, name);
    }

    pub fn id(&self, name: FunctionName) -> Option<FunctionId> {
        self.ids.get(&name).copied()
    }

    pub fn name(&self, id: FunctionId) -> Option<FunctionName> {
        self.names.get(&id).copied()
    }

    pub fn no_op_id(&self) -> FunctionId {
        self.id(FunctionName::NoOp)
            .unwrap_or_else(|| FunctionName::NoOp.default_id())
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
