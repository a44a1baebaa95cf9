#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure bootstrap system that prepares a Raycast Arena level.

use raycast_arena_core::{Command, Event, GridMap, Heading, PickupEffect, WorldPoint};
use raycast_arena_world::{query, World};

/// Position the player occupies when a level loads.
pub const PLAYER_START: WorldPoint = WorldPoint::new(3.0, 3.0);

/// Health restored by the pickups seeded on map markers.
pub const MARKER_HEAL: u32 = 25;

/// Produces the commands and data required to start a level.
#[derive(Debug, Default)]
pub struct Bootstrap;

impl Bootstrap {
    /// Derives the banner that should be shown when the experience starts.
    #[must_use]
    pub fn welcome_banner<'world>(&self, world: &'world World) -> &'world str {
        query::welcome_banner(world)
    }

    /// Command that loads `map` with the player at the start position.
    #[must_use]
    pub fn load_arena(&self, map: GridMap) -> Command {
        Command::LoadArena {
            map,
            player_start: PLAYER_START,
            player_heading: Heading::new(0.0),
        }
    }

    /// Seeds a health pickup on every marker once an arena finished loading.
    pub fn handle(&self, events: &[Event], world: &World, out: &mut Vec<Command>) {
        if !events
            .iter()
            .any(|event| matches!(event, Event::ArenaLoaded { .. }))
        {
            return;
        }

        out.extend(
            query::map(world)
                .health_markers()
                .map(|cell| Command::SpawnPickup {
                    cell,
                    effect: PickupEffect::Heal {
                        amount: MARKER_HEAL,
                    },
                }),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use raycast_arena_core::{CellCoord, PickupKind, DEFAULT_ARENA, WELCOME_BANNER};
    use raycast_arena_world::apply;

    fn loaded() -> (World, Vec<Event>) {
        let mut world = World::new();
        let mut events = Vec::new();
        let map = GridMap::parse(DEFAULT_ARENA).expect("built-in arena parses");
        apply(&mut world, Bootstrap.load_arena(map), &mut events);
        (world, events)
    }

    #[test]
    fn banner_comes_from_the_world() {
        let (world, _) = loaded();
        assert_eq!(Bootstrap.welcome_banner(&world), WELCOME_BANNER);
    }

    #[test]
    fn player_starts_at_the_fixed_position() {
        let (world, _) = loaded();
        let player = query::player(&world);
        assert_eq!(player.position, PLAYER_START);
        assert_eq!(player.heading.radians(), 0.0);
        assert_eq!(player.health, 100);
    }

    #[test]
    fn arena_load_seeds_marker_pickups() {
        let (mut world, events) = loaded();
        let mut commands = Vec::new();
        Bootstrap.handle(&events, &world, &mut commands);

        let cells: Vec<CellCoord> = commands
            .iter()
            .filter_map(|command| match command {
                Command::SpawnPickup { cell, .. } => Some(*cell),
                _ => None,
            })
            .collect();
        assert_eq!(
            cells,
            vec![
                CellCoord::new(5, 1),
                CellCoord::new(5, 7),
                CellCoord::new(9, 11)
            ]
        );

        let mut spawned = Vec::new();
        for command in commands {
            apply(&mut world, command, &mut spawned);
        }
        let pickups = query::pickup_view(&world).into_vec();
        assert_eq!(pickups.len(), 3);
        assert!(pickups
            .iter()
            .all(|pickup| pickup.effect.kind() == PickupKind::Health));
    }

    #[test]
    fn other_events_seed_nothing() {
        let (world, _) = loaded();
        let mut commands = Vec::new();
        Bootstrap.handle(
            &[Event::TimeAdvanced {
                dt: std::time::Duration::from_millis(16),
            }],
            &world,
            &mut commands,
        );
        assert!(commands.is_empty());
    }
}
