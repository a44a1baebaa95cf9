use std::time::Duration;

use raycast_arena_core::{
    CellCoord, Command, Event, GridMap, Heading, HostileId, RoundPhase, Strike, WeaponKind,
    WorldPoint, DEFAULT_ARENA,
};
use raycast_arena_system_wave_director::{hostile_health, spawn_count, Config, WaveDirector};
use raycast_arena_world::{apply, query, World};

const FRAME: Duration = Duration::from_millis(100);

#[test]
fn first_wave_spawns_after_a_three_second_countdown() {
    let (mut world, mut director, loaded) = boot(7);
    let mut seen = pump(&mut world, &mut director, loaded);

    assert_eq!(
        query::round(&world).phase,
        RoundPhase::Countdown { remaining: 3 }
    );

    for _ in 0..29 {
        seen.extend(frame(&mut world, &mut director));
    }
    assert!(
        matches!(query::round(&world).phase, RoundPhase::Countdown { .. }),
        "wave spawned before the countdown elapsed"
    );

    seen.extend(frame(&mut world, &mut director));
    let round = query::round(&world);
    assert_eq!(round.phase, RoundPhase::Active);
    assert_eq!(round.wave, 1);
    assert_eq!(round.rounds_survived, 0);

    let hostiles = query::hostile_view(&world);
    assert_eq!(hostiles.len(), spawn_count(1) as usize);
    let player = query::player(&world).position;
    let mut cells: Vec<CellCoord> = Vec::new();
    for hostile in hostiles.iter() {
        assert_eq!(hostile.max_health, hostile_health(1));
        assert!(hostile.position.distance_to(player) > 5.0);
        let cell = hostile.position.cell().expect("inside the grid");
        assert!(!cells.contains(&cell), "two hostiles share {cell:?}");
        cells.push(cell);
    }

    let countdown_ticks = seen
        .iter()
        .filter(|event| matches!(event, Event::CountdownAdvanced { .. }))
        .count();
    assert_eq!(countdown_ticks, 3);
}

#[test]
fn clearing_a_wave_starts_the_next_countdown() {
    let (mut world, mut director, loaded) = boot(11);
    let _ = pump(&mut world, &mut director, loaded);
    for _ in 0..30 {
        let _ = frame(&mut world, &mut director);
    }
    assert_eq!(query::round(&world).wave, 1);

    let ids: Vec<HostileId> = query::hostile_view(&world).iter().map(|h| h.id).collect();
    let mut events = Vec::new();
    apply(
        &mut world,
        Command::Discharge {
            weapon: WeaponKind::Pistol,
            strikes: ids.into_iter().map(|id| Strike::new(id, 1_000.0)).collect(),
            trace_end: WorldPoint::new(8.0, 8.0),
        },
        &mut events,
    );
    let _ = pump(&mut world, &mut director, events);
    assert_eq!(
        query::round(&world).phase,
        RoundPhase::Countdown { remaining: 3 }
    );

    for _ in 0..30 {
        let _ = frame(&mut world, &mut director);
    }
    let round = query::round(&world);
    assert_eq!(round.wave, 2);
    assert_eq!(round.rounds_survived, 1);
    assert_eq!(query::hostile_view(&world).len(), spawn_count(2) as usize);
}

#[test]
fn cancelled_countdown_never_ticks() {
    let (mut world, mut director, loaded) = boot(3);
    let _ = pump(&mut world, &mut director, loaded);
    assert!(director.is_counting_down());

    director.cancel();
    assert!(!director.is_counting_down());

    for _ in 0..50 {
        let events = frame(&mut world, &mut director);
        assert!(
            !events
                .iter()
                .any(|event| matches!(event, Event::CountdownAdvanced { .. })),
            "cancelled countdown advanced"
        );
    }
}

#[test]
fn identical_seeds_place_identical_waves() {
    let run = |seed: u64| {
        let (mut world, mut director, loaded) = boot(seed);
        let _ = pump(&mut world, &mut director, loaded);
        for _ in 0..30 {
            let _ = frame(&mut world, &mut director);
        }
        query::hostile_view(&world)
            .iter()
            .map(|hostile| hostile.position)
            .collect::<Vec<_>>()
    };

    assert_eq!(run(99), run(99));
}

fn boot(seed: u64) -> (World, WaveDirector, Vec<Event>) {
    let mut world = World::new();
    let mut events = Vec::new();
    apply(
        &mut world,
        Command::LoadArena {
            map: GridMap::parse(DEFAULT_ARENA).expect("built-in arena parses"),
            player_start: WorldPoint::new(3.0, 3.0),
            player_heading: Heading::default(),
        },
        &mut events,
    );
    (world, WaveDirector::new(Config::with_seed(seed)), events)
}

fn frame(world: &mut World, director: &mut WaveDirector) -> Vec<Event> {
    let mut events = Vec::new();
    apply(world, Command::Tick { dt: FRAME }, &mut events);
    pump(world, director, events)
}

fn pump(world: &mut World, director: &mut WaveDirector, initial: Vec<Event>) -> Vec<Event> {
    let mut seen = Vec::new();
    let mut pending = initial;
    while !pending.is_empty() {
        let mut commands = Vec::new();
        director.handle(
            &pending,
            &query::round(world),
            &query::player(world),
            &query::hostile_view(world),
            query::map(world),
            &mut commands,
        );
        seen.append(&mut pending);

        for command in commands {
            apply(world, command, &mut pending);
        }
    }
    seen
}
