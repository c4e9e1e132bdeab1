//! Messages exchanged with the bridge process, length-delimited protobuf on
//! its stdin/stdout.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum StartResult {
    Ok = 0,
    /// No game slot free yet; ask again.
    Queued = 1,
    MapUnavailable = 2,
    InternalError = 3,
}

impl StartResult {
    pub fn as_str_name(&self) -> &'static str {
        match self {
            StartResult::Ok => "OK",
            StartResult::Queued => "QUEUED",
            StartResult::MapUnavailable => "MAP_UNAVAILABLE",
            StartResult::InternalError => "INTERNAL_ERROR",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum StepType {
    First = 0,
    Mid = 1,
    Last = 2,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum ActionSpace {
    Features = 0,
    Raw = 1,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct StartRequest {
    #[prost(string, tag = "1")]
    pub agent_name: String,
    #[prost(string, tag = "2")]
    pub map: String,
    #[prost(string, tag = "3")]
    pub difficulty: String,
    #[prost(uint32, tag = "4")]
    pub step_mul: u32,
    #[prost(uint32, tag = "5")]
    pub screen_size: u32,
    #[prost(uint32, tag = "6")]
    pub minimap_size: u32,
    #[prost(enumeration = "ActionSpace", tag = "7")]
    pub action_space: i32,
}

/// One entry of the function table the bridge announces.
#[derive(Clone, PartialEq, prost::Message)]
pub struct FunctionSpec {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(uint32, tag = "2")]
    pub id: u32,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct StartResponse {
    #[prost(enumeration = "StartResult", tag = "1")]
    pub result: i32,
    #[prost(string, optional, tag = "2")]
    pub game_id: Option<String>,
    #[prost(message, repeated, tag = "3")]
    pub functions: Vec<FunctionSpec>,
    #[prost(message, optional, tag = "4")]
    pub step: Option<Step>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct Player {
    #[prost(uint32, tag = "1")]
    pub minerals: u32,
    #[prost(uint32, tag = "2")]
    pub vespene: u32,
    #[prost(uint32, tag = "3")]
    pub food_cap: u32,
    #[prost(uint32, tag = "4")]
    pub food_used: u32,
    #[prost(uint32, tag = "5")]
    pub idle_worker_count: u32,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct Point {
    #[prost(int32, tag = "1")]
    pub x: i32,
    #[prost(int32, tag = "2")]
    pub y: i32,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct Unit {
    #[prost(uint64, tag = "1")]
    pub tag: u64,
    #[prost(uint32, tag = "2")]
    pub unit_type: u32,
    /// 1 self, 2 ally, 3 neutral, 4 enemy.
    #[prost(uint32, tag = "3")]
    pub alliance: u32,
    #[prost(message, optional, tag = "4")]
    pub screen: Option<Point>,
    #[prost(message, optional, tag = "5")]
    pub minimap: Option<Point>,
    #[prost(message, optional, tag = "6")]
    pub world: Option<Point>,
    #[prost(uint32, tag = "7")]
    pub build_progress: u32,
    #[prost(uint32, tag = "8")]
    pub order_length: u32,
    #[prost(uint32, tag = "9")]
    pub assigned_harvesters: u32,
    #[prost(uint32, tag = "10")]
    pub ideal_harvesters: u32,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct Step {
    #[prost(enumeration = "StepType", tag = "1")]
    pub step_type: i32,
    #[prost(float, tag = "2")]
    pub reward: f32,
    #[prost(message, optional, tag = "3")]
    pub player: Option<Player>,
    #[prost(message, repeated, tag = "4")]
    pub units: Vec<Unit>,
    #[prost(uint32, repeated, tag = "5")]
    pub available_actions: Vec<u32>,
    #[prost(uint32, tag = "6")]
    pub screen_size: u32,
    #[prost(uint32, tag = "7")]
    pub minimap_size: u32,
    #[prost(uint32, tag = "8")]
    pub raw_resolution: u32,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct Argument {
    #[prost(int64, repeated, tag = "1")]
    pub values: Vec<i64>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct FunctionCall {
    #[prost(uint32, tag = "1")]
    pub function: u32,
    #[prost(message, repeated, tag = "2")]
    pub arguments: Vec<Argument>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ActRequest {
    #[prost(string, tag = "1")]
    pub game_id: String,
    #[prost(message, optional, tag = "2")]
    pub action: Option<FunctionCall>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ActResponse {
    #[prost(message, optional, tag = "1")]
    pub step: Option<Step>,
}
