//! The fixed action catalog shared by the random-scan and Q-learning agents.
//!
//! Every candidate proposes at most one feature-layer action for the current
//! observation. A candidate checks that its function is in the legal-action
//! set before proposing it; when it has nothing to propose it yields the
//! no-op sentinel. Candidates carry no state between ticks.

mod attack;
mod build;
mod select;
mod train;

use std::fmt;

use rand::Rng;

use crate::actions::{ActionRequest, ActionSchema, Argument, FunctionName, SelectPointAct};
use crate::infra::Point;
use crate::infra::geometry::clamp_to_screen;
use crate::state::{Observation, Unit};

use attack::AttackEnemyBase;
use build::{BuildAssimilator, BuildGateway, BuildPylon, Expand};
use select::{SelectArmy, SelectGateway, SelectIdleProbe, SelectNexus, SelectProbe};
use train::{Research, TrainProbe, TrainStalker, TrainZealot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Upgrade {
    WarpGate,
    GroundWeapons,
    GroundArmor,
}

impl Upgrade {
    pub fn function(&self) -> FunctionName {
        match self {
            Upgrade::WarpGate => FunctionName::ResearchWarpGateQuick,
            Upgrade::GroundWeapons => FunctionName::ResearchProtossGroundWeaponsQuick,
            Upgrade::GroundArmor => FunctionName::ResearchProtossGroundArmorQuick,
        }
    }
}

/// One catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Candidate {
    SelectProbe,
    SelectIdleProbe,
    SelectNexus,
    SelectGateway,
    BuildPylon,
    BuildGateway,
    BuildAssimilator,
    TrainProbe,
    TrainZealot,
    TrainStalker,
    Research(Upgrade),
    SelectArmy,
    AttackEnemyBase,
    Expand,
}

impl Candidate {
    /// The catalog in its fixed order.
    pub fn catalog() -> Vec<Candidate> {
        vec![
            Candidate::SelectProbe,
            Candidate::SelectIdleProbe,
            Candidate::SelectNexus,
            Candidate::SelectGateway,
            Candidate::BuildPylon,
            Candidate::BuildGateway,
            Candidate::BuildAssimilator,
            Candidate::TrainProbe,
            Candidate::TrainZealot,
            Candidate::TrainStalker,
            Candidate::Research(Upgrade::WarpGate),
            Candidate::Research(Upgrade::GroundWeapons),
            Candidate::Research(Upgrade::GroundArmor),
            Candidate::SelectArmy,
            Candidate::AttackEnemyBase,
            Candidate::Expand,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Candidate::SelectProbe => "SelectProbe",
            Candidate::SelectIdleProbe => "SelectIdleProbe",
            Candidate::SelectNexus => "SelectNexus",
            Candidate::SelectGateway => "SelectGateway",
            Candidate::BuildPylon => "BuildPylon",
            Candidate::BuildGateway => "BuildGateway",
            Candidate::BuildAssimilator => "BuildAssimilator",
            Candidate::TrainProbe => "TrainProbe",
            Candidate::TrainZealot => "TrainZealot",
            Candidate::TrainStalker => "TrainStalker",
            Candidate::Research(Upgrade::WarpGate) => "ResearchWarpGate",
            Candidate::Research(Upgrade::GroundWeapons) => "ResearchGroundWeapons",
            Candidate::Research(Upgrade::GroundArmor) => "ResearchGroundArmor",
            Candidate::SelectArmy => "SelectArmy",
            Candidate::AttackEnemyBase => "AttackEnemyBase",
            Candidate::Expand => "Expand",
        }
    }

    /// Propose an action for `observation`, or no-op.
    pub fn evaluate<R: Rng + ?Sized>(
        &self,
        observation: &Observation,
        schema: &ActionSchema,
        rng: &mut R,
    ) -> ActionRequest {
        let proposal = match self {
            Candidate::SelectProbe => SelectProbe.evaluate(observation, schema, rng),
            Candidate::SelectIdleProbe => SelectIdleProbe.evaluate(observation, schema, rng),
            Candidate::SelectNexus => SelectNexus.evaluate(observation, schema, rng),
            Candidate::SelectGateway => SelectGateway.evaluate(observation, schema, rng),
            Candidate::BuildPylon => BuildPylon.evaluate(observation, schema, rng),
            Candidate::BuildGateway => BuildGateway.evaluate(observation, schema, rng),
            Candidate::BuildAssimilator => BuildAssimilator.evaluate(observation, schema, rng),
            Candidate::TrainProbe => TrainProbe.evaluate(observation, schema, rng),
            Candidate::TrainZealot => TrainZealot.evaluate(observation, schema, rng),
            Candidate::TrainStalker => TrainStalker.evaluate(observation, schema, rng),
            Candidate::Research(upgrade) => Research(*upgrade).evaluate(observation, schema, rng),
            Candidate::SelectArmy => SelectArmy.evaluate(observation, schema, rng),
            Candidate::AttackEnemyBase => AttackEnemyBase.evaluate(observation, schema, rng),
            Candidate::Expand => Expand.evaluate(observation, schema, rng),
        };
        proposal.unwrap_or_else(|| ActionRequest::no_op(schema))
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub trait EvaluateCandidate {
    fn evaluate<R: Rng + ?Sized>(
        &self,
        observation: &Observation,
        schema: &ActionSchema,
        rng: &mut R,
    ) -> Option<ActionRequest>;
}

// ============================================================================
// Helper functions
// ============================================================================

fn on_screen(observation: &Observation, unit: &Unit) -> bool {
    observation.screen_bounds().contains(&unit.screen)
}

fn select_point(
    observation: &Observation,
    schema: &ActionSchema,
    point: Point,
) -> Option<ActionRequest> {
    ActionRequest::call_if_available(
        schema,
        observation,
        FunctionName::SelectPoint,
        vec![
            Argument::SelectPointAct(SelectPointAct::Select),
            Argument::Screen(point),
        ],
    )
}

fn quick(
    observation: &Observation,
    schema: &ActionSchema,
    function: FunctionName,
) -> Option<ActionRequest> {
    ActionRequest::call_if_available(schema, observation, function, vec![Argument::NOW])
}

fn build_at(
    observation: &Observation,
    schema: &ActionSchema,
    function: FunctionName,
    point: Point,
) -> Option<ActionRequest> {
    let point = clamp_to_screen(point, observation.screen_size);
    ActionRequest::call_if_available(
        schema,
        observation,
        function,
        vec![Argument::NOW, Argument::Screen(point)],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::{ActionSpace, ArgKind};
    use crate::state::UnitType;
    use crate::testing::ObservationBuilder;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn busy_observation(schema: &ActionSchema) -> Observation {
        ObservationBuilder::new()
            .own_at(UnitType::Nexus, (30, 30))
            .own_at(UnitType::Probe, (25, 28))
            .own_at(UnitType::Probe, (90, 10))
            .own_at(UnitType::Pylon, (40, 40))
            .own_at(UnitType::Gateway, (50, 45))
            .own_building(UnitType::Assimilator, (12, 60), 30)
            .own_at(UnitType::Zealot, (60, 60))
            .neutral_at(UnitType::VespeneGeyser, (12, 60))
            .neutral_at(UnitType::VespeneGeyser, (70, 12))
            .neutral_at(UnitType::MineralField, (20, 25))
            .neutral_at(UnitType::MineralField, (75, 70))
            .enemy_at(UnitType::Zergling, (100, 100))
            .minerals(500)
            .vespene(200)
            .idle_workers(1)
            .available(schema, FunctionName::all(ActionSpace::Features))
            .build()
    }

    #[test]
    fn test_catalog_names_are_unique() {
        let catalog = Candidate::catalog();
        let mut names: Vec<_> = catalog.iter().map(|c| c.name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), catalog.len());
    }

    #[test]
    fn test_every_candidate_is_legal_and_well_formed() {
        let schema = ActionSchema::defaults(ActionSpace::Features);
        let mut rng = StdRng::seed_from_u64(11);
        let observations = [
            ObservationBuilder::new().build(),
            ObservationBuilder::new()
                .available(&schema, FunctionName::all(ActionSpace::Features))
                .build(),
            busy_observation(&schema),
        ];

        for obs in &observations {
            for candidate in Candidate::catalog() {
                for _ in 0..20 {
                    let request = candidate.evaluate(obs, &schema, &mut rng);
                    assert!(request.matches_signature(), "{} -> {}", candidate, request);
                    assert!(request.is_legal(obs), "{} -> {}", candidate, request);
                    assert_eq!(schema.name(request.id), Some(request.function));
                }
            }
        }
    }

    #[test]
    fn test_empty_observation_yields_no_op_everywhere() {
        let schema = ActionSchema::defaults(ActionSpace::Features);
        let obs = ObservationBuilder::new().build();
        let mut rng = StdRng::seed_from_u64(3);
        for candidate in Candidate::catalog() {
            assert!(candidate.evaluate(&obs, &schema, &mut rng).is_no_op());
        }
    }

    #[test]
    fn test_emitted_screen_points_are_in_bounds() {
        let schema = ActionSchema::defaults(ActionSpace::Features);
        let obs = busy_observation(&schema);
        let bounds = obs.screen_bounds();
        let mut rng = StdRng::seed_from_u64(5);
        for candidate in Candidate::catalog() {
            for _ in 0..50 {
                let request = candidate.evaluate(&obs, &schema, &mut rng);
                if let Some(Argument::Screen(p)) = request.argument(ArgKind::Screen) {
                    assert!(bounds.contains(p), "{} emitted {:?}", candidate, p);
                }
            }
        }
    }

    #[test]
    fn test_build_target_is_clamped_to_screen() {
        let schema = ActionSchema::defaults(ActionSpace::Features);
        let obs = ObservationBuilder::new()
            .available(&schema, &[FunctionName::BuildPylonScreen])
            .build();
        let request = build_at(&obs, &schema, FunctionName::BuildPylonScreen, Point::new(-5, 200))
            .expect("pylon");
        assert_eq!(request.target_point(), Some(Point::new(0, 83)));
    }

    #[test]
    fn test_unannounced_function_degrades_to_no_op() {
        let schema = ActionSchema::from_announced(
            ActionSpace::Features,
            vec![("no_op", 0), ("select_army", 7)],
        );
        let obs = ObservationBuilder::new()
            .available(&schema, &[FunctionName::SelectArmy])
            .build();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(
            Candidate::TrainZealot
                .evaluate(&obs, &schema, &mut rng)
                .is_no_op()
        );
        assert_eq!(
            Candidate::SelectArmy.evaluate(&obs, &schema, &mut rng).function,
            FunctionName::SelectArmy
        );
    }
}
