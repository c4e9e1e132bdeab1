use std::collections::HashMap;

use crate::planners::catalog::Candidate;
use crate::state::Observation;

use super::QLearningConfig;

/// Coarse game state the learner keys its table on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StateKey {
    pub minerals: u32,
    pub vespene: u32,
    pub own_units: usize,
    pub enemy_units: usize,
}

impl StateKey {
    pub fn from_observation(observation: &Observation) -> Self {
        Self {
            minerals: observation.player.minerals,
            vespene: observation.player.vespene,
            own_units: observation.own_unit_count(),
            enemy_units: observation.enemy_unit_count(),
        }
    }
}

/// Action values for `(state, candidate)` pairs. Unseen pairs are worth 0.
/// Entries are never evicted.
#[derive(Debug, Clone, Default)]
pub struct QTable {
    values: HashMap<(StateKey, Candidate), f64>,
}

impl QTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, state: StateKey, action: Candidate) -> f64 {
        self.values.get(&(state, action)).copied().unwrap_or(0.0)
    }

    /// Highest value over `actions` in `state`; 0 when `actions` is empty.
    pub fn best_value(&self, state: StateKey, actions: &[Candidate]) -> f64 {
        actions
            .iter()
            .map(|a| self.get(state, *a))
            .fold(None, |best: Option<f64>, v| Some(best.map_or(v, |b| b.max(v))))
            .unwrap_or(0.0)
    }

    /// Action with the highest value in `state`. Ties go to the earliest entry of `actions`.
    pub fn best_action(&self, state: StateKey, actions: &[Candidate]) -> Option<Candidate> {
        let mut best: Option<(Candidate, f64)> = None;
        for &action in actions {
            let value = self.get(state, action);
            if best.is_none_or(|(_, best_value)| value > best_value) {
                best = Some((action, value));
            }
        }
        best.map(|(action, _)| action)
    }

    /// One temporal-difference step:
    /// `Q(s,a) += alpha * (reward + gamma * max_a' Q(s',a') - Q(s,a))`.
    /// Returns the new value.
    pub fn update(
        &mut self,
        (state, action): (StateKey, Candidate),
        reward: f64,
        next_state: StateKey,
        actions: &[Candidate],
        config: &QLearningConfig,
    ) -> f64 {
        let current = self.get(state, action);
        let target = reward + config.gamma * self.best_value(next_state, actions);
        let value = current + config.alpha * (target - current);
        self.values.insert((state, action), value);
        value
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
