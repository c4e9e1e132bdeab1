//! Epsilon-greedy tabular Q-learning over the action catalog.

mod q_table;

use rand::Rng;
use rand::seq::IndexedRandom;
use tracing::debug;

use crate::actions::{ActionRequest, ActionSpace};
use crate::state::StepType;

use super::catalog::Candidate;
use super::{DecisionContext, Policy};

pub use q_table::{QTable, StateKey};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QLearningConfig {
    /// Learning rate.
    pub alpha: f64,
    /// Discount factor.
    pub gamma: f64,
    /// Probability of exploring a uniformly random candidate.
    pub epsilon: f64,
}

impl Default for QLearningConfig {
    fn default() -> Self {
        Self {
            alpha: 0.1,
            gamma: 0.9,
            epsilon: 0.5,
        }
    }
}

pub struct QLearningPolicy {
    config: QLearningConfig,
    catalog: Vec<Candidate>,
    table: QTable,
    /// State and candidate of the previous tick, waiting for their reward.
    previous: Option<(StateKey, Candidate)>,
}

impl QLearningPolicy {
    pub fn new(config: QLearningConfig) -> Self {
        Self {
            config,
            catalog: Candidate::catalog(),
            table: QTable::new(),
            previous: None,
        }
    }

    pub fn table(&self) -> &QTable {
        &self.table
    }

    pub fn previous(&self) -> Option<(StateKey, Candidate)> {
        self.previous
    }

    fn choose(&self, state: StateKey, ctx: &mut DecisionContext<'_>) -> Option<Candidate> {
        if ctx.rng.random_bool(self.config.epsilon.clamp(0.0, 1.0)) {
            self.catalog.choose(ctx.rng).copied()
        } else {
            self.table.best_action(state, &self.catalog)
        }
    }

    /// First candidate in catalog order with a legal, non no-op proposal.
    fn first_usable(&self, ctx: &mut DecisionContext<'_>) -> Option<(Candidate, ActionRequest)> {
        self.catalog.iter().find_map(|candidate| {
            let request = candidate.evaluate(ctx.observation, ctx.schema, ctx.rng);
            (!request.is_no_op() && request.is_legal(ctx.observation))
                .then_some((*candidate, request))
        })
    }
}

impl Policy for QLearningPolicy {
    fn name(&self) -> &'static str {
        "learning"
    }

    fn action_space(&self) -> ActionSpace {
        ActionSpace::Features
    }

    fn reset(&mut self) {
        self.previous = None;
    }

    #[tracing::instrument(level = "debug", skip(self, ctx))]
    fn decide(&mut self, ctx: &mut DecisionContext<'_>) -> ActionRequest {
        let state = StateKey::from_observation(ctx.observation);

        if let Some(previous) = self.previous.take() {
            let reward = f64::from(ctx.observation.reward);
            let value = self
                .table
                .update(previous, reward, state, &self.catalog, &self.config);
            debug!(
                "Q({:?}, {}) <- {:.4} (reward {})",
                previous.0, previous.1, value, reward
            );
        }

        let Some(chosen) = self.choose(state, ctx) else {
            return ctx.no_op();
        };

        let mut kind = chosen;
        let mut request = chosen.evaluate(ctx.observation, ctx.schema, ctx.rng);
        if request.is_no_op() || !request.is_legal(ctx.observation) {
            match self.first_usable(ctx) {
                Some((fallback, fallback_request)) => {
                    debug!("{} not usable, falling back to {}", chosen, fallback);
                    kind = fallback;
                    request = fallback_request;
                }
                None => {
                    debug!("{} not usable and no fallback available", chosen);
                    request = ctx.no_op();
                }
            }
        }

        if ctx.step_type != StepType::Last {
            self.previous = Some((state, kind));
        }
        request
    }

    fn learned_entries(&self) -> Option<usize> {
        Some(self.table.len())
    }
}
