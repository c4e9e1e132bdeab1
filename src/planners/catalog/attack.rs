use rand::Rng;
use rand::seq::IndexedRandom;

use crate::actions::{ActionRequest, ActionSchema, Argument, FunctionName};
use crate::infra::Point;
use crate::infra::geometry::mean_position;
use crate::state::Observation;

use super::EvaluateCandidate;

/// Distance from the minimap edge of the fallback corners.
const CORNER_MARGIN: i32 = 8;

/// Send the selected army to where the enemy seems to live.
pub struct AttackEnemyBase;

impl AttackEnemyBase {
    /// Known enemy structure first, then the centroid of visible enemies, then
    /// a random corner.
    fn target<R: Rng + ?Sized>(observation: &Observation, rng: &mut R) -> Point {
        if let Some(structure) = observation.enemy_structures().first() {
            return structure.minimap;
        }
        if let Some(mean) = mean_position(observation.enemy_units().iter().map(|u| u.minimap)) {
            return mean;
        }
        let bounds = observation.minimap_bounds();
        let corners = bounds.inset_corners(CORNER_MARGIN);
        corners.choose(rng).copied().unwrap_or_else(|| bounds.center())
    }
}

impl EvaluateCandidate for AttackEnemyBase {
    fn evaluate<R: Rng + ?Sized>(
        &self,
        observation: &Observation,
        schema: &ActionSchema,
        rng: &mut R,
    ) -> Option<ActionRequest> {
        let id = schema.id(FunctionName::AttackMinimap)?;
        if !observation.is_available(id) {
            return None;
        }
        let target = observation
            .minimap_bounds()
            .clamp(Self::target(observation, rng));
        ActionRequest::call(
            schema,
            FunctionName::AttackMinimap,
            vec![Argument::NOW, Argument::Minimap(target)],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::ActionSpace;
    use crate::state::UnitType;
    use crate::testing::ObservationBuilder;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn schema() -> ActionSchema {
        ActionSchema::defaults(ActionSpace::Features)
    }

    #[test]
    fn test_prefers_enemy_structure() {
        let schema = schema();
        let obs = ObservationBuilder::new()
            .enemy_on_minimap(UnitType::Zergling, (10, 10))
            .enemy_on_minimap(UnitType::Hatchery, (50, 48))
            .available(&schema, &[FunctionName::AttackMinimap])
            .build();
        let mut rng = StdRng::seed_from_u64(1);
        let request = AttackEnemyBase
            .evaluate(&obs, &schema, &mut rng)
            .expect("attack");
        assert_eq!(request.target_point(), Some(Point::new(50, 48)));
    }

    #[test]
    fn test_falls_back_to_enemy_centroid() {
        let schema = schema();
        let obs = ObservationBuilder::new()
            .enemy_on_minimap(UnitType::Zergling, (10, 20))
            .enemy_on_minimap(UnitType::Zergling, (20, 31))
            .available(&schema, &[FunctionName::AttackMinimap])
            .build();
        let mut rng = StdRng::seed_from_u64(1);
        let request = AttackEnemyBase
            .evaluate(&obs, &schema, &mut rng)
            .expect("attack");
        assert_eq!(request.target_point(), Some(Point::new(15, 25)));
    }

    #[test]
    fn test_no_enemies_targets_a_corner() {
        let schema = schema();
        let obs = ObservationBuilder::new()
            .available(&schema, &[FunctionName::AttackMinimap])
            .build();
        let corners = obs.minimap_bounds().inset_corners(CORNER_MARGIN);
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..20 {
            let request = AttackEnemyBase
                .evaluate(&obs, &schema, &mut rng)
                .expect("attack");
            let target = request.target_point().expect("point");
            assert!(corners.contains(&target));
        }
    }

    #[test]
    fn test_not_legal_is_none() {
        let schema = schema();
        let obs = ObservationBuilder::new()
            .enemy_on_minimap(UnitType::Hatchery, (50, 48))
            .build();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(AttackEnemyBase.evaluate(&obs, &schema, &mut rng).is_none());
    }
}
