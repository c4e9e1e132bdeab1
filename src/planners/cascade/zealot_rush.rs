//! One pylon, one gateway, then zealots sent at the enemy as soon as supply
//! runs out.

use rand::seq::IndexedRandom;

use crate::actions::{ActionRequest, FunctionName};
use crate::infra::Point;
use crate::infra::geometry::{farthest_from, nearest_to};
use crate::planners::{DecisionContext, MAX_ORDER_QUEUE};
use crate::state::CoordinateSpace;

use super::{BaseFacts, Rule, RuleCascade, raw_attack, raw_build, raw_train};

const PYLON_COST: u32 = 100;
const GATEWAY_COST: u32 = 150;
const ZEALOT_COST: u32 = 100;
const ZEALOT_SUPPLY: i32 = 2;
const RAID_JITTER: i32 = 4;
/// Enemies closer than this to any probe count as an attack on the base.
const DEFENSE_RADIUS: f32 = 20.0;

// Layout for both starting sides, `(left, right)`.
const PYLON_SITE: (Point, Point) = (Point { x: 22, y: 20 }, Point { x: 35, y: 42 });
const GATEWAY_SITE: (Point, Point) = (Point { x: 22, y: 24 }, Point { x: 35, y: 45 });
const RAID_TARGET: (Point, Point) = (Point { x: 38, y: 44 }, Point { x: 19, y: 23 });
const RALLY_POINT: (Point, Point) = (Point { x: 22, y: 22 }, Point { x: 35, y: 40 });

const BASE_CORNERS: [Point; 4] = [
    Point { x: 38, y: 44 },
    Point { x: 38, y: 21 },
    Point { x: 21, y: 44 },
    Point { x: 21, y: 21 },
];
const OWN_CORNER: (Point, Point) = (Point { x: 21, y: 21 }, Point { x: 38, y: 44 });

pub fn zealot_rush() -> RuleCascade {
    RuleCascade::new(
        "zealot-rush",
        vec![
            Rule::new("build_pylon", needs_pylon, build_pylon),
            Rule::new("build_gateway", needs_gateway, build_gateway),
            Rule::new("train_zealot", can_train_zealot, train_zealot),
            Rule::new("raid_when_supply_blocked", supply_blocked, raid),
            Rule::new("defend_base", base_under_attack, defend_base),
            Rule::new("attack_enemy_base", has_zealots, attack_enemy_base),
        ],
    )
}

fn side_point(ctx: &DecisionContext<'_>, layout: (Point, Point)) -> Option<Point> {
    let side = ctx.session.home_side?;
    Some(side.pick(layout.0, layout.1))
}

fn needs_pylon(facts: &BaseFacts<'_>, _ctx: &DecisionContext<'_>) -> bool {
    facts.pylons.is_empty() && facts.minerals >= PYLON_COST && !facts.probes.is_empty()
}

fn build_pylon(facts: &BaseFacts<'_>, ctx: &mut DecisionContext<'_>) -> Option<ActionRequest> {
    let site = side_point(ctx, PYLON_SITE)?;
    let probe = nearest_to(&facts.probes, site, CoordinateSpace::World)?;
    raw_build(ctx, FunctionName::RawBuildPylonPt, probe.tag, site)
}

fn needs_gateway(facts: &BaseFacts<'_>, _ctx: &DecisionContext<'_>) -> bool {
    !facts.completed_pylons.is_empty()
        && facts.gateways.is_empty()
        && facts.minerals >= GATEWAY_COST
        && !facts.probes.is_empty()
}

fn build_gateway(facts: &BaseFacts<'_>, ctx: &mut DecisionContext<'_>) -> Option<ActionRequest> {
    let site = side_point(ctx, GATEWAY_SITE)?;
    let probe = nearest_to(&facts.probes, site, CoordinateSpace::World)?;
    raw_build(ctx, FunctionName::RawBuildGatewayPt, probe.tag, site)
}

fn can_train_zealot(facts: &BaseFacts<'_>, _ctx: &DecisionContext<'_>) -> bool {
    !facts.completed_gateways.is_empty()
        && facts.minerals >= ZEALOT_COST
        && facts.free_supply >= ZEALOT_SUPPLY
}

fn train_zealot(facts: &BaseFacts<'_>, ctx: &mut DecisionContext<'_>) -> Option<ActionRequest> {
    let gateway = facts
        .completed_gateways
        .iter()
        .find(|g| g.order_length < MAX_ORDER_QUEUE)?;
    raw_train(ctx, FunctionName::RawTrainZealotQuick, gateway.tag)
}

fn supply_blocked(facts: &BaseFacts<'_>, _ctx: &DecisionContext<'_>) -> bool {
    facts.free_supply < ZEALOT_SUPPLY && !facts.zealots.is_empty()
}

fn raid(facts: &BaseFacts<'_>, ctx: &mut DecisionContext<'_>) -> Option<ActionRequest> {
    let target = side_point(ctx, RAID_TARGET)?;
    let zealot = farthest_from(&facts.zealots, target, CoordinateSpace::World)?;
    let target = target.jittered(RAID_JITTER, ctx.rng);
    raw_attack(ctx, vec![zealot.tag], target)
}

fn base_under_attack(facts: &BaseFacts<'_>, _ctx: &DecisionContext<'_>) -> bool {
    !facts.zealots.is_empty()
        && facts.enemies.iter().any(|enemy| {
            facts
                .probes
                .iter()
                .any(|probe| probe.world.distance(&enemy.world) < DEFENSE_RADIUS)
        })
}

fn defend_base(facts: &BaseFacts<'_>, ctx: &mut DecisionContext<'_>) -> Option<ActionRequest> {
    let rally = side_point(ctx, RALLY_POINT)?;
    raw_attack(ctx, facts.zealot_tags(), rally)
}

fn has_zealots(facts: &BaseFacts<'_>, _ctx: &DecisionContext<'_>) -> bool {
    !facts.zealots.is_empty()
}

fn attack_enemy_base(facts: &BaseFacts<'_>, ctx: &mut DecisionContext<'_>) -> Option<ActionRequest> {
    let own = side_point(ctx, OWN_CORNER)?;
    let targets: Vec<Point> = BASE_CORNERS.into_iter().filter(|c| *c != own).collect();
    let target = *targets.choose(ctx.rng)?;
    raw_attack(ctx, facts.zealot_tags(), target)
}
