//! Fixed-priority rule cascades over the raw action interface.
//!
//! A cascade walks its rules in order. The first rule whose condition holds
//! and whose action produces a request wins the tick; when none does, the
//! cascade yields no-op.

mod probe_economy;
mod zealot_rush;

use tracing::debug;

use crate::actions::{ActionRequest, ActionSpace, Argument, FunctionName};
use crate::infra::Point;
use crate::state::{Observation, Unit, UnitTag, UnitType};

use super::{DecisionContext, Policy};

pub use probe_economy::probe_economy;
pub use zealot_rush::zealot_rush;

/// Counts and unit lists every rule of a cascade looks at, gathered once per tick.
pub struct BaseFacts<'a> {
    pub nexuses: Vec<&'a Unit>,
    pub probes: Vec<&'a Unit>,
    pub pylons: Vec<&'a Unit>,
    pub completed_pylons: Vec<&'a Unit>,
    pub gateways: Vec<&'a Unit>,
    pub completed_gateways: Vec<&'a Unit>,
    pub zealots: Vec<&'a Unit>,
    pub enemies: Vec<&'a Unit>,
    pub mineral_fields: Vec<&'a Unit>,
    pub minerals: u32,
    pub free_supply: i32,
}

impl<'a> BaseFacts<'a> {
    pub fn gather(observation: &'a Observation) -> Self {
        Self {
            nexuses: observation.my_units(UnitType::Nexus),
            probes: observation.my_units(UnitType::Probe),
            pylons: observation.my_units(UnitType::Pylon),
            completed_pylons: observation.my_completed_units(UnitType::Pylon),
            gateways: observation.my_units(UnitType::Gateway),
            completed_gateways: observation.my_completed_units(UnitType::Gateway),
            zealots: observation.my_units(UnitType::Zealot),
            enemies: observation.enemy_units(),
            mineral_fields: observation.mineral_fields(),
            minerals: observation.player.minerals,
            free_supply: observation.free_supply(),
        }
    }

    pub fn zealot_tags(&self) -> Vec<UnitTag> {
        self.zealots.iter().map(|z| z.tag).collect()
    }
}

pub type Condition = fn(&BaseFacts<'_>, &DecisionContext<'_>) -> bool;
pub type Action = fn(&BaseFacts<'_>, &mut DecisionContext<'_>) -> Option<ActionRequest>;

/// One `(name, condition, action)` entry of a cascade.
#[derive(Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    pub condition: Condition,
    pub action: Action,
}

impl Rule {
    pub const fn new(name: &'static str, condition: Condition, action: Action) -> Self {
        Self {
            name,
            condition,
            action,
        }
    }
}

pub struct RuleCascade {
    name: &'static str,
    rules: Vec<Rule>,
}

impl RuleCascade {
    pub fn new(name: &'static str, rules: Vec<Rule>) -> Self {
        Self { name, rules }
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name).collect()
    }
}

impl Policy for RuleCascade {
    fn name(&self) -> &'static str {
        self.name
    }

    fn action_space(&self) -> ActionSpace {
        ActionSpace::Raw
    }

    #[tracing::instrument(level = "debug", skip(self, ctx), fields(cascade = self.name))]
    fn decide(&mut self, ctx: &mut DecisionContext<'_>) -> ActionRequest {
        let facts = BaseFacts::gather(ctx.observation);

        for rule in &self.rules {
            if !(rule.condition)(&facts, ctx) {
                continue;
            }
            match (rule.action)(&facts, ctx) {
                Some(request) => {
                    debug!("Rule {} fired: {}", rule.name, request);
                    return request;
                }
                None => debug!("Rule {} held but produced no action", rule.name),
            }
        }

        debug!("No rule fired");
        ctx.no_op()
    }
}

// ============================================================================
// Raw action builders
// ============================================================================

fn world_point(ctx: &DecisionContext<'_>, point: Point) -> Point {
    ctx.observation.world_bounds().clamp(point)
}

/// `Build_*_pt(now, builder, point)`.
pub(super) fn raw_build(
    ctx: &DecisionContext<'_>,
    function: FunctionName,
    builder: UnitTag,
    point: Point,
) -> Option<ActionRequest> {
    ActionRequest::call(
        ctx.schema,
        function,
        vec![
            Argument::NOW,
            Argument::UnitTags(vec![builder]),
            Argument::World(world_point(ctx, point)),
        ],
    )
}

/// `Train_*_quick(now, producer)`.
pub(super) fn raw_train(
    ctx: &DecisionContext<'_>,
    function: FunctionName,
    producer: UnitTag,
) -> Option<ActionRequest> {
    ActionRequest::call(
        ctx.schema,
        function,
        vec![Argument::NOW, Argument::UnitTags(vec![producer])],
    )
}

/// `Attack_pt(now, units, point)`.
pub(super) fn raw_attack(
    ctx: &DecisionContext<'_>,
    units: Vec<UnitTag>,
    point: Point,
) -> Option<ActionRequest> {
    if units.is_empty() {
        return None;
    }
    ActionRequest::call(
        ctx.schema,
        FunctionName::RawAttackPt,
        vec![
            Argument::NOW,
            Argument::UnitTags(units),
            Argument::World(world_point(ctx, point)),
        ],
    )
}

/// `Harvest_Gather_unit(now, worker, target)`.
pub(super) fn raw_harvest(
    ctx: &DecisionContext<'_>,
    worker: UnitTag,
    target: UnitTag,
) -> Option<ActionRequest> {
    ActionRequest::call(
        ctx.schema,
        FunctionName::RawHarvestGatherUnit,
        vec![
            Argument::NOW,
            Argument::UnitTags(vec![worker]),
            Argument::TargetUnitTag(target),
        ],
    )
}

#[cfg(test)]
pub(crate) mod test_support {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use crate::actions::{ActionRequest, ActionSchema, ActionSpace};
    use crate::planners::{DecisionContext, Policy};
    use crate::state::{Observation, Session, StepType};

    /// Run one decision of `policy` on `observation` with an already observed session.
    pub fn decide_once(
        policy: &mut dyn Policy,
        observation: &Observation,
        session: &Session,
        seed: u64,
    ) -> ActionRequest {
        let schema = ActionSchema::defaults(ActionSpace::Raw);
        let mut rng = StdRng::seed_from_u64(seed);
        let mut ctx = DecisionContext {
            observation,
            step_type: StepType::Mid,
            schema: &schema,
            session,
            rng: &mut rng,
        };
        policy.decide(&mut ctx)
    }

    pub fn session_after(observations: &[&Observation]) -> Session {
        let mut session = Session::new();
        for obs in observations {
            session.observe(obs);
        }
        session
    }
}
