//! Saturate the main with probes, add a pylon and a gateway next to the
//! nexus, and send zealots across the map once three are out.

use crate::actions::{ActionRequest, FunctionName};
use crate::infra::geometry::nearest_to;
use crate::planners::{DecisionContext, MAX_ORDER_QUEUE};
use crate::state::CoordinateSpace;

use super::{BaseFacts, Rule, RuleCascade, raw_attack, raw_build, raw_harvest, raw_train};

const ATTACK_WAVE_SIZE: usize = 3;
const PROBE_TARGET: usize = 16;
const PROBE_COST: u32 = 50;
const PYLON_COST: u32 = 100;
const GATEWAY_COST: u32 = 150;
const ZEALOT_COST: u32 = 100;
/// Pylon goes at nexus + offset, gateway at nexus - offset.
const BUILD_OFFSET: i32 = 5;

pub fn probe_economy() -> RuleCascade {
    RuleCascade::new(
        "probe-economy",
        vec![
            Rule::new("attack_with_zealots", wave_ready, attack_with_zealots),
            Rule::new("train_probe", wants_probe, train_probe),
            Rule::new("build_pylon", needs_pylon, build_pylon),
            Rule::new("build_gateway", needs_gateway, build_gateway),
            Rule::new("train_zealot", can_train_zealot, train_zealot),
            Rule::new("gather_minerals", can_gather, gather_minerals),
        ],
    )
}

fn wave_ready(facts: &BaseFacts<'_>, _ctx: &DecisionContext<'_>) -> bool {
    facts.zealots.len() >= ATTACK_WAVE_SIZE
}

/// The enemy start is our start reflected through the map centre.
fn attack_with_zealots(
    facts: &BaseFacts<'_>,
    ctx: &mut DecisionContext<'_>,
) -> Option<ActionRequest> {
    let start = ctx.session.start_location?;
    let target = start.mirrored(ctx.observation.raw_resolution);
    raw_attack(ctx, facts.zealot_tags(), target)
}

fn wants_probe(facts: &BaseFacts<'_>, _ctx: &DecisionContext<'_>) -> bool {
    facts.probes.len() < PROBE_TARGET
        && facts.minerals >= PROBE_COST
        && facts
            .nexuses
            .iter()
            .any(|n| n.order_length < MAX_ORDER_QUEUE)
}

fn train_probe(facts: &BaseFacts<'_>, ctx: &mut DecisionContext<'_>) -> Option<ActionRequest> {
    let nexus = facts
        .nexuses
        .iter()
        .find(|n| n.order_length < MAX_ORDER_QUEUE)?;
    raw_train(ctx, FunctionName::RawTrainProbeQuick, nexus.tag)
}

fn needs_pylon(facts: &BaseFacts<'_>, _ctx: &DecisionContext<'_>) -> bool {
    facts.pylons.is_empty()
        && facts.minerals >= PYLON_COST
        && !facts.probes.is_empty()
        && !facts.nexuses.is_empty()
}

fn build_pylon(facts: &BaseFacts<'_>, ctx: &mut DecisionContext<'_>) -> Option<ActionRequest> {
    let nexus = facts.nexuses.first()?;
    let probe = facts.probes.first()?;
    let site = nexus.world.offset(BUILD_OFFSET, BUILD_OFFSET);
    raw_build(ctx, FunctionName::RawBuildPylonPt, probe.tag, site)
}

fn needs_gateway(facts: &BaseFacts<'_>, _ctx: &DecisionContext<'_>) -> bool {
    facts.gateways.is_empty()
        && !facts.pylons.is_empty()
        && facts.minerals >= GATEWAY_COST
        && !facts.probes.is_empty()
        && !facts.nexuses.is_empty()
}

fn build_gateway(facts: &BaseFacts<'_>, ctx: &mut DecisionContext<'_>) -> Option<ActionRequest> {
    let nexus = facts.nexuses.first()?;
    let probe = facts.probes.first()?;
    let site = nexus.world.offset(-BUILD_OFFSET, -BUILD_OFFSET);
    raw_build(ctx, FunctionName::RawBuildGatewayPt, probe.tag, site)
}

fn can_train_zealot(facts: &BaseFacts<'_>, _ctx: &DecisionContext<'_>) -> bool {
    facts.minerals >= ZEALOT_COST
        && facts
            .gateways
            .iter()
            .any(|g| g.order_length < MAX_ORDER_QUEUE)
}

fn train_zealot(facts: &BaseFacts<'_>, ctx: &mut DecisionContext<'_>) -> Option<ActionRequest> {
    let gateway = facts
        .gateways
        .iter()
        .find(|g| g.order_length < MAX_ORDER_QUEUE)?;
    raw_train(ctx, FunctionName::RawTrainZealotQuick, gateway.tag)
}

fn can_gather(facts: &BaseFacts<'_>, _ctx: &DecisionContext<'_>) -> bool {
    !facts.probes.is_empty() && !facts.nexuses.is_empty() && !facts.mineral_fields.is_empty()
}

fn gather_minerals(facts: &BaseFacts<'_>, ctx: &mut DecisionContext<'_>) -> Option<ActionRequest> {
    let probe = facts.probes.first()?;
    let nexus = facts.nexuses.first()?;
    let field = nearest_to(&facts.mineral_fields, nexus.world, CoordinateSpace::World)?;
    raw_harvest(ctx, probe.tag, field.tag)
}
