//! Length-delimited protobuf framing and conversions between bridge messages
//! and the agent's own types.

use std::collections::HashSet;
use std::io::ErrorKind;

use prost::Message;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

use crate::actions::{ActionRequest, ActionSchema, ActionSpace, FunctionId};
use crate::bridge_interface as proto;
use crate::state::{Alliance, Observation, PlayerInfo, StepType, TimeStep, Unit, UnitType};

use super::bridge::BridgeError;
use super::types::Point;

/// A varint length prefix is at most this many bytes.
const MAX_DELIMITER_LEN: usize = 10;

/// Largest message accepted from the bridge.
pub const MAX_MESSAGE_LEN: usize = 16 * 1024 * 1024;

/// Raw resolution assumed when a step does not report one.
pub const DEFAULT_RAW_RESOLUTION: i32 = 64;

/// Grid sizes used in place of sizes a step leaves unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolutions {
    pub screen: i32,
    pub minimap: i32,
    pub raw: i32,
}

impl From<&proto::StartRequest> for Resolutions {
    fn from(request: &proto::StartRequest) -> Self {
        Self {
            screen: request.screen_size as i32,
            minimap: request.minimap_size as i32,
            raw: DEFAULT_RAW_RESOLUTION,
        }
    }
}

pub async fn write_delimited<W, M>(writer: &mut W, message: &M) -> Result<(), BridgeError>
where
    W: AsyncWrite + Unpin,
    M: Message,
{
    let buf = message.encode_length_delimited_to_vec();
    writer.write_all(&buf).await?;
    writer.flush().await?;
    Ok(())
}

/// Read one delimited message. `Ok(None)` when the stream ends cleanly
/// before the next message.
pub async fn read_delimited<R, M>(reader: &mut R) -> Result<Option<M>, BridgeError>
where
    R: AsyncRead + Unpin,
    M: Message + Default,
{
    let mut delimiter = Vec::with_capacity(MAX_DELIMITER_LEN);
    loop {
        let byte = match reader.read_u8().await {
            Ok(byte) => byte,
            Err(e) if e.kind() == ErrorKind::UnexpectedEof && delimiter.is_empty() => {
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };
        delimiter.push(byte);
        if byte & 0x80 == 0 {
            break;
        }
        if delimiter.len() == MAX_DELIMITER_LEN {
            return Err(BridgeError::Malformed("length prefix too long"));
        }
    }

    let len = prost::decode_length_delimiter(delimiter.as_slice())?;
    if len > MAX_MESSAGE_LEN {
        return Err(BridgeError::Malformed("message length over limit"));
    }
    let mut buf = vec![0u8; len];
    reader.read_exact(&mut buf).await?;
    Ok(Some(M::decode(buf.as_slice())?))
}

pub fn action_space_to_proto(space: ActionSpace) -> proto::ActionSpace {
    match space {
        ActionSpace::Features => proto::ActionSpace::Features,
        ActionSpace::Raw => proto::ActionSpace::Raw,
    }
}

/// Session schema from the announced function table, or the built-in
/// defaults when the bridge announced none.
pub fn schema_from_announced(space: ActionSpace, functions: &[proto::FunctionSpec]) -> ActionSchema {
    if functions.is_empty() {
        debug!("Bridge announced no functions, using default identifiers");
        return ActionSchema::defaults(space);
    }
    ActionSchema::from_announced(space, functions.iter().map(|f| (f.name.as_str(), f.id)))
}

fn point(p: &Option<proto::Point>) -> Point {
    p.as_ref().map(|p| Point::new(p.x, p.y)).unwrap_or_default()
}

fn unit_from_proto(unit: &proto::Unit) -> Option<Unit> {
    let Some(alliance) = Alliance::from_id(unit.alliance) else {
        debug!("Skipping unit {} with unknown alliance {}", unit.tag, unit.alliance);
        return None;
    };
    Some(Unit {
        tag: unit.tag,
        unit_type: UnitType::from_id(unit.unit_type),
        alliance,
        screen: point(&unit.screen),
        minimap: point(&unit.minimap),
        world: point(&unit.world),
        build_progress: unit.build_progress.min(100) as u8,
        order_length: unit.order_length,
    })
}

fn size_or(reported: u32, fallback: i32, what: &str) -> i32 {
    if reported == 0 {
        debug!("Step without {} size, using {}", what, fallback);
        fallback
    } else {
        reported as i32
    }
}

pub fn time_step_from_proto(
    step: &proto::Step,
    fallback: Resolutions,
) -> Result<TimeStep, BridgeError> {
    let step_type = match proto::StepType::try_from(step.step_type) {
        Ok(proto::StepType::First) => StepType::First,
        Ok(proto::StepType::Mid) => StepType::Mid,
        Ok(proto::StepType::Last) => StepType::Last,
        Err(_) => {
            return Err(BridgeError::UnknownEnum {
                what: "step type",
                value: step.step_type,
            });
        }
    };

    let player = step
        .player
        .as_ref()
        .map(|p| PlayerInfo {
            minerals: p.minerals,
            vespene: p.vespene,
            food_cap: p.food_cap,
            food_used: p.food_used,
            idle_worker_count: p.idle_worker_count,
        })
        .unwrap_or_default();

    let observation = Observation {
        units: step.units.iter().filter_map(unit_from_proto).collect(),
        player,
        available_actions: step
            .available_actions
            .iter()
            .map(|&id| FunctionId(id))
            .collect::<HashSet<_>>(),
        reward: step.reward,
        screen_size: size_or(step.screen_size, fallback.screen, "screen"),
        minimap_size: size_or(step.minimap_size, fallback.minimap, "minimap"),
        raw_resolution: size_or(step.raw_resolution, fallback.raw, "raw"),
    };

    Ok(TimeStep {
        step_type,
        observation,
    })
}

pub fn function_call_to_proto(request: &ActionRequest) -> proto::FunctionCall {
    proto::FunctionCall {
        function: request.id.0,
        arguments: request
            .arguments
            .iter()
            .map(|a| proto::Argument { values: a.values() })
            .collect(),
    }
}
