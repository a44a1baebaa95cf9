//! Copies simulation snapshots into the rendering scene.

use raycast_arena_core::SessionSummary;
use raycast_arena_rendering::Scene;
use raycast_arena_simulation::Simulation;

/// Builds the first scene presented for `simulation`.
pub(crate) fn initial_scene(simulation: &Simulation) -> Scene {
    let mut scene = Scene::new(
        simulation.map().clone(),
        simulation.player(),
        simulation.hud(),
    );
    populate_scene(simulation, None, &mut scene);
    scene
}

/// Refreshes every dynamic part of `scene` from `simulation`.
pub(crate) fn populate_scene(
    simulation: &Simulation,
    summary: Option<SessionSummary>,
    scene: &mut Scene,
) {
    scene.player = simulation.player();
    scene.hostiles = simulation.hostiles().into_vec();
    scene.pickups = simulation.pickups().into_vec();
    scene.last_shot = simulation.last_shot();
    scene.now = simulation.now();
    scene.hud = simulation.hud();
    scene.summary = summary;
}

#[cfg(test)]
mod tests {
    use super::*;
    use raycast_arena_core::{GridMap, DEFAULT_ARENA};
    use raycast_arena_simulation::Config;

    #[test]
    fn initial_scene_mirrors_the_fresh_session() {
        let map = GridMap::parse(DEFAULT_ARENA).expect("built-in arena parses");
        let simulation = Simulation::new(map.clone(), Config::default());

        let scene = initial_scene(&simulation);
        assert_eq!(scene.map, map);
        assert_eq!(scene.player, simulation.player());
        assert_eq!(scene.pickups.len(), simulation.pickups().into_vec().len());
        assert!(scene.hostiles.is_empty());
        assert!(scene.summary.is_none());
    }
}
