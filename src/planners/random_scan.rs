use rand::seq::SliceRandom;
use tracing::debug;

use crate::actions::{ActionRequest, ActionSpace};

use super::catalog::Candidate;
use super::{DecisionContext, Policy};

/// Evaluates the catalog in a fresh random order every tick and plays the
/// first candidate with something legal to do.
pub struct RandomScanPolicy {
    order: Vec<Candidate>,
}

impl RandomScanPolicy {
    pub fn new() -> Self {
        Self {
            order: Candidate::catalog(),
        }
    }
}

impl Default for RandomScanPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl Policy for RandomScanPolicy {
    fn name(&self) -> &'static str {
        "random"
    }

    fn action_space(&self) -> ActionSpace {
        ActionSpace::Features
    }

    #[tracing::instrument(level = "debug", skip(self, ctx))]
    fn decide(&mut self, ctx: &mut DecisionContext<'_>) -> ActionRequest {
        self.order.shuffle(ctx.rng);

        for candidate in &self.order {
            let request = candidate.evaluate(ctx.observation, ctx.schema, ctx.rng);
            if !request.is_no_op() && request.is_legal(ctx.observation) {
                debug!("Candidate {} selected: {}", candidate, request);
                return request;
            }
        }

        debug!("No candidate applicable");
        ctx.no_op()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::{ActionSchema, FunctionName};
    use crate::state::{Observation, Session, StepType, UnitType};
    use crate::testing::ObservationBuilder;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn decide(policy: &mut RandomScanPolicy, obs: &Observation, rng: &mut StdRng) -> ActionRequest {
        let schema = ActionSchema::defaults(ActionSpace::Features);
        let session = Session::new();
        let mut ctx = DecisionContext {
            observation: obs,
            step_type: StepType::Mid,
            schema: &schema,
            session: &session,
            rng,
        };
        policy.decide(&mut ctx)
    }

    #[test]
    fn test_single_legal_candidate_is_always_chosen() {
        let schema = ActionSchema::defaults(ActionSpace::Features);
        let obs = ObservationBuilder::new()
            .own_at(UnitType::Nexus, (30, 30))
            .available(&schema, &[FunctionName::TrainProbeQuick])
            .build();
        let mut policy = RandomScanPolicy::new();
        let mut rng = StdRng::seed_from_u64(17);

        for _ in 0..100 {
            let request = decide(&mut policy, &obs, &mut rng);
            assert_eq!(request.function, FunctionName::TrainProbeQuick);
        }
    }

    #[test]
    fn test_nothing_legal_is_always_no_op() {
        let obs = ObservationBuilder::new()
            .own_at(UnitType::Nexus, (30, 30))
            .own_at(UnitType::Probe, (31, 30))
            .minerals(1000)
            .build();
        let mut policy = RandomScanPolicy::new();
        let mut rng = StdRng::seed_from_u64(17);

        for _ in 0..100 {
            assert!(decide(&mut policy, &obs, &mut rng).is_no_op());
        }
    }

    #[test]
    fn test_choice_varies_between_ticks() {
        let schema = ActionSchema::defaults(ActionSpace::Features);
        let obs = ObservationBuilder::new()
            .own_at(UnitType::Nexus, (30, 30))
            .available(
                &schema,
                &[FunctionName::TrainProbeQuick, FunctionName::SelectArmy],
            )
            .build();
        let mut policy = RandomScanPolicy::new();
        let mut rng = StdRng::seed_from_u64(3);

        let picks: Vec<FunctionName> = (0..50)
            .map(|_| decide(&mut policy, &obs, &mut rng).function)
            .collect();
        assert!(picks.contains(&FunctionName::TrainProbeQuick));
        assert!(picks.contains(&FunctionName::SelectArmy));
    }
}
