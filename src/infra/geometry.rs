//! Distance-based unit selection and coordinate clamping.

use crate::state::{CoordinateSpace, Unit};

use super::types::{Bounds, Point};

/// Unit closest to `point`. Ties go to the first unit in iteration order.
pub fn nearest_to<'a>(
    units: &[&'a Unit],
    point: Point,
    space: CoordinateSpace,
) -> Option<&'a Unit> {
    let mut best: Option<(&'a Unit, f32)> = None;
    for &unit in units {
        let d = unit.position(space).distance(&point);
        if best.is_none_or(|(_, best_d)| d < best_d) {
            best = Some((unit, d));
        }
    }
    best.map(|(unit, _)| unit)
}

/// Unit farthest from `point`. Ties go to the first unit in iteration order.
pub fn farthest_from<'a>(
    units: &[&'a Unit],
    point: Point,
    space: CoordinateSpace,
) -> Option<&'a Unit> {
    let mut best: Option<(&'a Unit, f32)> = None;
    for &unit in units {
        let d = unit.position(space).distance(&point);
        if best.is_none_or(|(_, best_d)| d > best_d) {
            best = Some((unit, d));
        }
    }
    best.map(|(unit, _)| unit)
}

/// Clamp both coordinates into `[0, bound)`.
pub fn clamp_to_screen(point: Point, bound: i32) -> Point {
    Bounds::square(bound).clamp(point)
}

/// Integer mean of the points (truncated), `None` when there are none.
pub fn mean_position<I>(points: I) -> Option<Point>
where
    I: IntoIterator<Item = Point>,
{
    let (sum_x, sum_y, count) = points
        .into_iter()
        .fold((0i64, 0i64, 0i64), |(sx, sy, n), p| {
            (sx + p.x as i64, sy + p.y as i64, n + 1)
        });
    if count == 0 {
        return None;
    }
    Some(Point::new((sum_x / count) as i32, (sum_y / count) as i32))
}
