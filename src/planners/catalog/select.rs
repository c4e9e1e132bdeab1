use rand::Rng;
use rand::seq::IndexedRandom;

use crate::actions::{ActionRequest, ActionSchema, Argument, FunctionName, SelectWorker};
use crate::state::{Observation, Unit, UnitType};

use super::{EvaluateCandidate, on_screen, select_point};

fn own_on_screen(observation: &Observation, unit_type: UnitType) -> Vec<&Unit> {
    observation
        .my_units(unit_type)
        .into_iter()
        .filter(|u| on_screen(observation, u))
        .collect()
}

/// Select a random probe on screen.
pub struct SelectProbe;

impl EvaluateCandidate for SelectProbe {
    fn evaluate<R: Rng + ?Sized>(
        &self,
        observation: &Observation,
        schema: &ActionSchema,
        rng: &mut R,
    ) -> Option<ActionRequest> {
        let probes = own_on_screen(observation, UnitType::Probe);
        let probe = probes.choose(rng)?;
        select_point(observation, schema, probe.screen)
    }
}

pub struct SelectIdleProbe;

impl EvaluateCandidate for SelectIdleProbe {
    fn evaluate<R: Rng + ?Sized>(
        &self,
        observation: &Observation,
        schema: &ActionSchema,
        _rng: &mut R,
    ) -> Option<ActionRequest> {
        if observation.player.idle_worker_count == 0 {
            return None;
        }
        ActionRequest::call_if_available(
            schema,
            observation,
            FunctionName::SelectIdleWorker,
            vec![Argument::SelectWorker(SelectWorker::Select)],
        )
    }
}

/// Select the first nexus on screen.
pub struct SelectNexus;

impl EvaluateCandidate for SelectNexus {
    fn evaluate<R: Rng + ?Sized>(
        &self,
        observation: &Observation,
        schema: &ActionSchema,
        _rng: &mut R,
    ) -> Option<ActionRequest> {
        let nexus = own_on_screen(observation, UnitType::Nexus).into_iter().next()?;
        select_point(observation, schema, nexus.screen)
    }
}

/// Select a random gateway on screen.
pub struct SelectGateway;

impl EvaluateCandidate for SelectGateway {
    fn evaluate<R: Rng + ?Sized>(
        &self,
        observation: &Observation,
        schema: &ActionSchema,
        rng: &mut R,
    ) -> Option<ActionRequest> {
        let gateways = own_on_screen(observation, UnitType::Gateway);
        let gateway = gateways.choose(rng)?;
        select_point(observation, schema, gateway.screen)
    }
}

pub struct SelectArmy;

impl EvaluateCandidate for SelectArmy {
    fn evaluate<R: Rng + ?Sized>(
        &self,
        observation: &Observation,
        schema: &ActionSchema,
        _rng: &mut R,
    ) -> Option<ActionRequest> {
        ActionRequest::call_if_available(
            schema,
            observation,
            FunctionName::SelectArmy,
            vec![Argument::SelectAdd(false)],
        )
    }
}
