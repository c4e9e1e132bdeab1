use rand::Rng;
use rand::seq::IndexedRandom;

use crate::actions::{ActionRequest, ActionSchema, FunctionName};
use crate::infra::geometry::nearest_to;
use crate::state::{CoordinateSpace, Observation, Unit, UnitType};

use super::{EvaluateCandidate, build_at, on_screen};

/// Pylons go within this many pixels of a random probe.
const PYLON_PLACEMENT_RADIUS: i32 = 10;
/// Gateways go within this many pixels of a random completed pylon.
const GATEWAY_PLACEMENT_RADIUS: i32 = 6;
/// A geyser with an assimilator this close to it is taken.
const GEYSER_CLAIM_RADIUS: f32 = 1.0;
/// Minimum screen distance between a new nexus site and any existing nexus.
pub const EXPANSION_MIN_DISTANCE: f32 = 10.0;
pub const NEXUS_MINERAL_COST: u32 = 400;

fn available(observation: &Observation, schema: &ActionSchema, function: FunctionName) -> bool {
    schema.id(function).is_some_and(|id| observation.is_available(id))
}

pub struct BuildPylon;

impl EvaluateCandidate for BuildPylon {
    fn evaluate<R: Rng + ?Sized>(
        &self,
        observation: &Observation,
        schema: &ActionSchema,
        rng: &mut R,
    ) -> Option<ActionRequest> {
        if !available(observation, schema, FunctionName::BuildPylonScreen) {
            return None;
        }
        let probes: Vec<&Unit> = observation
            .my_units(UnitType::Probe)
            .into_iter()
            .filter(|u| on_screen(observation, u))
            .collect();
        let probe = probes.choose(rng)?;
        let site = probe.screen.jittered(PYLON_PLACEMENT_RADIUS, rng);
        build_at(observation, schema, FunctionName::BuildPylonScreen, site)
    }
}

pub struct BuildGateway;

impl EvaluateCandidate for BuildGateway {
    fn evaluate<R: Rng + ?Sized>(
        &self,
        observation: &Observation,
        schema: &ActionSchema,
        rng: &mut R,
    ) -> Option<ActionRequest> {
        if !available(observation, schema, FunctionName::BuildGatewayScreen) {
            return None;
        }
        let pylons: Vec<&Unit> = observation
            .my_completed_units(UnitType::Pylon)
            .into_iter()
            .filter(|u| on_screen(observation, u))
            .collect();
        let pylon = pylons.choose(rng)?;
        let site = pylon.screen.jittered(GATEWAY_PLACEMENT_RADIUS, rng);
        build_at(observation, schema, FunctionName::BuildGatewayScreen, site)
    }
}

/// Take the free geyser nearest to the main nexus.
pub struct BuildAssimilator;

impl EvaluateCandidate for BuildAssimilator {
    fn evaluate<R: Rng + ?Sized>(
        &self,
        observation: &Observation,
        schema: &ActionSchema,
        _rng: &mut R,
    ) -> Option<ActionRequest> {
        if !available(observation, schema, FunctionName::BuildAssimilatorScreen) {
            return None;
        }

        let assimilators = observation.my_units(UnitType::Assimilator);
        let free_geysers: Vec<&Unit> = observation
            .geysers()
            .into_iter()
            .filter(|g| on_screen(observation, g))
            .filter(|g| {
                !assimilators
                    .iter()
                    .any(|a| a.screen.distance(&g.screen) <= GEYSER_CLAIM_RADIUS)
            })
            .collect();

        let anchor = observation
            .my_units(UnitType::Nexus)
            .first()
            .map(|n| n.screen)
            .unwrap_or_else(|| observation.screen_bounds().center());

        let geyser = nearest_to(&free_geysers, anchor, CoordinateSpace::Screen)?;
        build_at(
            observation,
            schema,
            FunctionName::BuildAssimilatorScreen,
            geyser.screen,
        )
    }
}

/// Found a nexus next to a mineral field away from every existing nexus.
pub struct Expand;

impl EvaluateCandidate for Expand {
    fn evaluate<R: Rng + ?Sized>(
        &self,
        observation: &Observation,
        schema: &ActionSchema,
        _rng: &mut R,
    ) -> Option<ActionRequest> {
        if observation.player.minerals < NEXUS_MINERAL_COST
            || !available(observation, schema, FunctionName::BuildNexusScreen)
        {
            return None;
        }

        let nexuses = observation.my_units(UnitType::Nexus);
        let site = observation
            .mineral_fields()
            .into_iter()
            .filter(|m| on_screen(observation, m))
            .find(|m| {
                nexuses
                    .iter()
                    .all(|n| n.screen.distance(&m.screen) > EXPANSION_MIN_DISTANCE)
            })?;

        build_at(observation, schema, FunctionName::BuildNexusScreen, site.screen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::ActionSpace;
    use crate::infra::Point;
    use crate::testing::ObservationBuilder;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn schema() -> ActionSchema {
        ActionSchema::defaults(ActionSpace::Features)
    }

    #[test]
    fn test_build_pylon_near_a_probe() {
        let schema = schema();
        let obs = ObservationBuilder::new()
            .own_at(UnitType::Probe, (40, 40))
            .available(&schema, &[FunctionName::BuildPylonScreen])
            .build();
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..30 {
            let request = BuildPylon.evaluate(&obs, &schema, &mut rng).expect("pylon");
            let p = request.target_point().expect("point");
            assert!((p.x - 40).abs() <= PYLON_PLACEMENT_RADIUS);
            assert!((p.y - 40).abs() <= PYLON_PLACEMENT_RADIUS);
        }
    }

    #[test]
    fn test_build_pylon_needs_a_probe() {
        let schema = schema();
        let obs = ObservationBuilder::new()
            .available(&schema, &[FunctionName::BuildPylonScreen])
            .build();
        let mut rng = StdRng::seed_from_u64(9);
        assert!(BuildPylon.evaluate(&obs, &schema, &mut rng).is_none());
    }

    #[test]
    fn test_build_gateway_needs_completed_pylon() {
        let schema = schema();
        let mut rng = StdRng::seed_from_u64(9);
        let warping = ObservationBuilder::new()
            .own_building(UnitType::Pylon, (40, 40), 50)
            .available(&schema, &[FunctionName::BuildGatewayScreen])
            .build();
        assert!(BuildGateway.evaluate(&warping, &schema, &mut rng).is_none());

        let powered = ObservationBuilder::new()
            .own_at(UnitType::Pylon, (40, 40))
            .available(&schema, &[FunctionName::BuildGatewayScreen])
            .build();
        assert!(BuildGateway.evaluate(&powered, &schema, &mut rng).is_some());
    }

    #[test]
    fn test_assimilator_skips_claimed_geyser() {
        let schema = schema();
        let obs = ObservationBuilder::new()
            .own_at(UnitType::Nexus, (30, 30))
            .own_building(UnitType::Assimilator, (32, 30), 10)
            .neutral_at(UnitType::VespeneGeyser, (32, 30))
            .neutral_at(UnitType::VespeneGeyser, (60, 60))
            .neutral_at(UnitType::VespeneGeyser, (70, 70))
            .available(&schema, &[FunctionName::BuildAssimilatorScreen])
            .build();
        let mut rng = StdRng::seed_from_u64(9);
        let request = BuildAssimilator
            .evaluate(&obs, &schema, &mut rng)
            .expect("assimilator");
        assert_eq!(request.target_point(), Some(Point::new(60, 60)));
    }

    #[test]
    fn test_assimilator_ignores_geysers_off_screen() {
        let schema = schema();
        let obs = ObservationBuilder::new()
            .neutral_at(UnitType::VespeneGeyser, (90, 10))
            .available(&schema, &[FunctionName::BuildAssimilatorScreen])
            .build();
        let mut rng = StdRng::seed_from_u64(9);
        assert!(BuildAssimilator.evaluate(&obs, &schema, &mut rng).is_none());
    }

    #[test]
    fn test_expand_respects_distance_and_cost() {
        let schema = schema();
        let base = || {
            ObservationBuilder::new()
                .own_at(UnitType::Nexus, (30, 30))
                .neutral_at(UnitType::MineralField, (35, 33))
                .neutral_at(UnitType::MineralField, (70, 20))
                .available(&schema, &[FunctionName::BuildNexusScreen])
        };
        let mut rng = StdRng::seed_from_u64(9);

        let poor = base().minerals(399).build();
        assert!(Expand.evaluate(&poor, &schema, &mut rng).is_none());

        let rich = base().minerals(400).build();
        let request = Expand.evaluate(&rich, &schema, &mut rng).expect("expand");
        assert_eq!(request.target_point(), Some(Point::new(70, 20)));
    }

    #[test]
    fn test_expand_without_far_minerals_is_no_op() {
        let schema = schema();
        let obs = ObservationBuilder::new()
            .own_at(UnitType::Nexus, (30, 30))
            .neutral_at(UnitType::MineralField, (33, 33))
            .minerals(1000)
            .available(&schema, &[FunctionName::BuildNexusScreen])
            .build();
        let mut rng = StdRng::seed_from_u64(9);
        assert!(Expand.evaluate(&obs, &schema, &mut rng).is_none());
    }
}
