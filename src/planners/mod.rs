pub mod cascade;
pub mod catalog;
pub mod qlearning;
pub mod random_scan;

use std::fmt;
use std::str::FromStr;

use rand::rngs::StdRng;

use crate::actions::{ActionRequest, ActionSchema, ActionSpace};
use crate::config::ConfigError;
use crate::state::{Observation, Session, StepType};

pub use cascade::{Rule, RuleCascade};
pub use catalog::{Candidate, Upgrade};
pub use qlearning::{QLearningConfig, QLearningPolicy, QTable, StateKey};
pub use random_scan::RandomScanPolicy;

/// Production structures with this many queued orders are not asked to train more.
pub const MAX_ORDER_QUEUE: u32 = 5;

/// Everything a policy may look at while deciding one tick.
pub struct DecisionContext<'a> {
    pub observation: &'a Observation,
    pub step_type: StepType,
    pub schema: &'a ActionSchema,
    pub session: &'a Session,
    pub rng: &'a mut StdRng,
}

impl DecisionContext<'_> {
    pub fn no_op(&self) -> ActionRequest {
        ActionRequest::no_op(self.schema)
    }
}

/// Per-tick decision procedure.
pub trait Policy {
    fn name(&self) -> &'static str;

    /// Action interface the policy emits into.
    fn action_space(&self) -> ActionSpace;

    /// Called at the start of every episode. Policies drop per-episode memory
    /// here; anything learned across episodes is kept.
    fn reset(&mut self) {}

    /// Produce exactly one action for the tick. Never fails: missing units
    /// and illegal candidates degrade to no-op.
    fn decide(&mut self, ctx: &mut DecisionContext<'_>) -> ActionRequest;

    /// Number of learned entries, for policies that learn.
    fn learned_entries(&self) -> Option<usize> {
        None
    }
}

/// Which agent to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyKind {
    ZealotRush,
    ProbeEconomy,
    RandomScan,
    QLearning,
}

impl PolicyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyKind::ZealotRush => "zealot-rush",
            PolicyKind::ProbeEconomy => "probe-economy",
            PolicyKind::RandomScan => "random",
            PolicyKind::QLearning => "learning",
        }
    }

    pub fn action_space(&self) -> ActionSpace {
        match self {
            PolicyKind::ZealotRush | PolicyKind::ProbeEconomy => ActionSpace::Raw,
            PolicyKind::RandomScan | PolicyKind::QLearning => ActionSpace::Features,
        }
    }

    pub fn build(&self, qlearning: QLearningConfig) -> Box<dyn Policy> {
        match self {
            PolicyKind::ZealotRush => Box::new(cascade::zealot_rush()),
            PolicyKind::ProbeEconomy => Box::new(cascade::probe_economy()),
            PolicyKind::RandomScan => Box::new(RandomScanPolicy::new()),
            PolicyKind::QLearning => Box::new(QLearningPolicy::new(qlearning)),
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PolicyKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "zealot-rush" | "basic" => Ok(PolicyKind::ZealotRush),
            "probe-economy" | "simple" => Ok(PolicyKind::ProbeEconomy),
            "random" => Ok(PolicyKind::RandomScan),
            "learning" | "q-learning" => Ok(PolicyKind::QLearning),
            other => Err(ConfigError::UnknownAgent(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_kind_round_trips_through_its_name() {
        for kind in [
            PolicyKind::ZealotRush,
            PolicyKind::ProbeEconomy,
            PolicyKind::RandomScan,
            PolicyKind::QLearning,
        ] {
            assert_eq!(kind.as_str().parse::<PolicyKind>().ok(), Some(kind));
            let policy = kind.build(QLearningConfig::default());
            assert_eq!(policy.action_space(), kind.action_space());
        }
    }

    #[test]
    fn test_unknown_agent_is_rejected() {
        assert!("terran".parse::<PolicyKind>().is_err());
    }
}
