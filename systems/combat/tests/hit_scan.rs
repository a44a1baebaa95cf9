use raycast_arena_core::{
    CellCoord, Command, Event, GridMap, Heading, HostileId, RoundPhase, WeaponKind, WorldPoint,
    DEFAULT_ARENA,
};
use raycast_arena_system_combat::{Combat, Config};
use raycast_arena_world::{apply, query, World};

#[test]
fn rifle_rounds_pass_through_every_hostile_in_line() {
    let mut world = arena(WorldPoint::new(1.5, 2.5), &[CellCoord::new(4, 2), CellCoord::new(6, 2)]);
    select(&mut world, WeaponKind::Rifle);

    let command = fire(&mut Combat::new(Config::new(3)), &world);
    let Command::Discharge { ref strikes, .. } = command else {
        panic!("rifle with a full magazine must discharge");
    };
    let struck: Vec<HostileId> = strikes.iter().map(|strike| strike.hostile).collect();
    assert_eq!(struck, vec![HostileId::new(0), HostileId::new(1)]);

    let events = execute(&mut world, command);
    assert!(events.contains(&Event::ShotFired {
        weapon: WeaponKind::Rifle,
        hit: true
    }));
    let remaining: Vec<f32> = query::hostile_view(&world)
        .iter()
        .map(|hostile| hostile.health)
        .collect();
    assert_eq!(remaining, vec![15.0, 15.0]);
}

#[test]
fn walls_shield_hostiles_from_every_weapon() {
    // Column eight holds a wall segment on rows three to five.
    let mut world = arena(WorldPoint::new(6.5, 4.5), &[CellCoord::new(10, 4)]);
    let mut combat = Combat::new(Config::new(11));

    for weapon in WeaponKind::ALL {
        select(&mut world, weapon);
        let command = fire(&mut combat, &world);
        let Command::Discharge {
            strikes, trace_end, ..
        } = command
        else {
            panic!("{weapon:?} must discharge");
        };
        assert!(strikes.is_empty(), "{weapon:?} struck through a wall");
        assert!(trace_end.x() < 8.1, "{weapon:?} trace passed the wall");
    }
}

#[test]
fn shotgun_pellets_stop_striking_once_the_target_dies() {
    let mut world = arena(WorldPoint::new(1.5, 2.5), &[CellCoord::new(2, 2)]);
    select(&mut world, WeaponKind::Shotgun);

    let command = fire(&mut Combat::new(Config::new(5)), &world);
    let Command::Discharge { ref strikes, .. } = command else {
        panic!("loaded shotgun must discharge");
    };
    assert_eq!(
        strikes.len(),
        5,
        "fifty health absorbs exactly five ten-point pellets"
    );

    let events = execute(&mut world, command);
    assert!(events.contains(&Event::HostileKilled {
        hostile: HostileId::new(0),
        score: 100
    }));
    assert_eq!(query::round(&world).kills, 1);
}

#[test]
fn spread_is_reproducible_for_a_seed() {
    let mut world = arena(WorldPoint::new(1.5, 2.5), &[]);
    let mut first = Combat::new(Config::new(42));
    let mut second = Combat::new(Config::new(42));

    select(&mut world, WeaponKind::Shotgun);
    for _ in 0..5 {
        assert_eq!(fire(&mut first, &world), fire(&mut second, &world));
    }
}

fn arena(player_start: WorldPoint, hostiles: &[CellCoord]) -> World {
    let mut world = World::new();
    let mut events = Vec::new();
    apply(
        &mut world,
        Command::LoadArena {
            map: GridMap::parse(DEFAULT_ARENA).expect("built-in arena parses"),
            player_start,
            player_heading: Heading::new(0.0),
        },
        &mut events,
    );
    apply(&mut world, Command::BeginCountdown { ticks: 0 }, &mut events);
    for cell in hostiles {
        apply(
            &mut world,
            Command::SpawnHostile {
                cell: *cell,
                health: 50,
            },
            &mut events,
        );
    }
    apply(&mut world, Command::CompleteSpawning, &mut events);
    assert_eq!(query::round(&world).phase, RoundPhase::Active);
    world
}

fn select(world: &mut World, weapon: WeaponKind) {
    let _ = execute(world, Command::SelectWeapon { weapon });
}

fn fire(combat: &mut Combat, world: &World) -> Command {
    combat.resolve(
        &query::weapon(world),
        &query::player(world),
        query::round(world).streak,
        query::map(world),
        &query::hostile_view(world),
    )
}

fn execute(world: &mut World, command: Command) -> Vec<Event> {
    let mut events = Vec::new();
    apply(world, command, &mut events);
    events
}
