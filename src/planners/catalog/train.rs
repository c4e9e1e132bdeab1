use rand::Rng;

use crate::actions::{ActionRequest, ActionSchema, FunctionName};
use crate::planners::MAX_ORDER_QUEUE;
use crate::state::{Observation, UnitType};

use super::{EvaluateCandidate, Upgrade, quick};

pub struct TrainProbe;

impl EvaluateCandidate for TrainProbe {
    fn evaluate<R: Rng + ?Sized>(
        &self,
        observation: &Observation,
        schema: &ActionSchema,
        _rng: &mut R,
    ) -> Option<ActionRequest> {
        let has_free_nexus = observation
            .my_completed_units(UnitType::Nexus)
            .iter()
            .any(|n| n.order_length < MAX_ORDER_QUEUE);
        if !has_free_nexus {
            return None;
        }
        quick(observation, schema, FunctionName::TrainProbeQuick)
    }
}

fn has_free_gateway(observation: &Observation) -> bool {
    observation
        .my_units(UnitType::Gateway)
        .iter()
        .any(|g| g.order_length < MAX_ORDER_QUEUE)
}

pub struct TrainZealot;

impl EvaluateCandidate for TrainZealot {
    fn evaluate<R: Rng + ?Sized>(
        &self,
        observation: &Observation,
        schema: &ActionSchema,
        _rng: &mut R,
    ) -> Option<ActionRequest> {
        if !has_free_gateway(observation) {
            return None;
        }
        quick(observation, schema, FunctionName::TrainZealotQuick)
    }
}

pub struct TrainStalker;

impl EvaluateCandidate for TrainStalker {
    fn evaluate<R: Rng + ?Sized>(
        &self,
        observation: &Observation,
        schema: &ActionSchema,
        _rng: &mut R,
    ) -> Option<ActionRequest> {
        if !has_free_gateway(observation) {
            return None;
        }
        quick(observation, schema, FunctionName::TrainStalkerQuick)
    }
}

/// Research one upgrade. The game decides whether the selected structure can.
pub struct Research(pub Upgrade);

impl EvaluateCandidate for Research {
    fn evaluate<R: Rng + ?Sized>(
        &self,
        observation: &Observation,
        schema: &ActionSchema,
        _rng: &mut R,
    ) -> Option<ActionRequest> {
        quick(observation, schema, self.0.function())
    }
}
