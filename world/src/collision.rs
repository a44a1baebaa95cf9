//! Axis-separated tile containment shared by every mobile entity.

use raycast_arena_core::{GridMap, WorldPoint};

/// Minimum distance a hostile keeps from other hostiles and pickups.
pub(crate) const SEPARATION_RADIUS: f32 = 0.4;

/// Translates `from` by the provided displacement, resolving each axis on its own.
///
/// The column axis is attempted first and kept only when the destination
/// stands on floor and satisfies `is_free`; the row axis is then attempted from
/// the possibly updated column. Entities therefore slide along walls instead
/// of stopping dead when moving diagonally into them.
pub(crate) fn slide<F>(map: &GridMap, from: WorldPoint, dx: f32, dy: f32, is_free: F) -> WorldPoint
where
    F: Fn(WorldPoint) -> bool,
{
    let mut position = from;

    if dx != 0.0 && dx.is_finite() {
        let candidate = WorldPoint::new(position.x() + dx, position.y());
        if map.is_walkable_at(candidate) && is_free(candidate) {
            position = candidate;
        }
    }

    if dy != 0.0 && dy.is_finite() {
        let candidate = WorldPoint::new(position.x(), position.y() + dy);
        if map.is_walkable_at(candidate) && is_free(candidate) {
            position = candidate;
        }
    }

    position
}

/// Reports whether `candidate` keeps the separation radius from every obstacle.
pub(crate) fn keeps_separation<I>(candidate: WorldPoint, obstacles: I) -> bool
where
    I: IntoIterator<Item = WorldPoint>,
{
    obstacles
        .into_iter()
        .all(|obstacle| candidate.distance_to(obstacle) >= SEPARATION_RADIUS)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corridor() -> GridMap {
        GridMap::parse(
            "#####\n\
             #...#\n\
             #.#.#\n\
             #...#\n\
             #####",
        )
        .expect("valid map")
    }

    #[test]
    fn diagonal_move_into_corner_slides_along_wall() {
        let map = corridor();
        let from = WorldPoint::new(1.5, 1.5);
        let to = slide(&map, from, -0.75, 0.25, |_| true);
        assert_eq!(to, WorldPoint::new(1.5, 1.75));
    }

    #[test]
    fn blocked_axes_leave_position_untouched() {
        let map = corridor();
        let from = WorldPoint::new(1.5, 1.5);
        let to = slide(&map, from, 0.0, -0.75, |_| true);
        assert_eq!(to, from);
    }

    #[test]
    fn row_axis_uses_the_updated_column() {
        let map = corridor();
        // Column move lands over the pillar column, so the row move must be rejected.
        let to = slide(&map, WorldPoint::new(1.75, 1.5), 0.5, 1.0, |_| true);
        assert_eq!(to, WorldPoint::new(2.25, 1.5));
    }

    #[test]
    fn occupied_candidates_are_rejected() {
        let map = corridor();
        let obstacle = WorldPoint::new(2.0, 1.5);
        let to = slide(&map, WorldPoint::new(1.5, 1.5), 0.25, 0.0, |candidate| {
            keeps_separation(candidate, [obstacle])
        });
        assert_eq!(to, WorldPoint::new(1.5, 1.5));
    }
}
