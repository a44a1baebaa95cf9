use glam::Vec2;
use raycast_arena_core::{InputEvent, WeaponKind};
use raycast_arena_rendering::FrameInput;
use raycast_arena_rendering_macroquad::{InputObservations, InputTranslator, KEY_TURN_RATE};

#[test]
fn cursor_travel_becomes_look_delta_after_the_first_frame() {
    let cursors = [100.0, 130.0, 110.0];
    let looks: Vec<f32> = replay(&cursors.map(observations_at))
        .iter()
        .map(|input| input.look_delta)
        .collect();

    assert_eq!(looks, vec![0.0, 30.0, -20.0]);
}

#[test]
fn resetting_the_pointer_suppresses_the_next_jump() {
    let mut translator = InputTranslator::new();
    let _ = translator.translate(&observations_at(10.0), FRAME);
    translator.reset_pointer();

    let input = translator.translate(&observations_at(500.0), FRAME);
    assert_eq!(input.look_delta, 0.0);
    let input = translator.translate(&observations_at(505.0), FRAME);
    assert_eq!(input.look_delta, 5.0);
}

#[test]
fn arrow_keys_turn_at_a_fixed_rate() {
    let mut translator = InputTranslator::new();
    let observations = InputObservations {
        turn_right: true,
        ..InputObservations::default()
    };

    let input = translator.translate(&observations, 0.5);
    assert!((input.look_delta - KEY_TURN_RATE * 0.5).abs() < 1e-4);

    let both = InputObservations {
        turn_left: true,
        turn_right: true,
        ..InputObservations::default()
    };
    assert_eq!(translator.translate(&both, 0.5).look_delta, 0.0);
}

#[test]
fn discrete_keys_map_to_events_in_a_stable_order() {
    let observations = InputObservations {
        pause: true,
        weapon_slot: Some(3),
        reload: true,
        fire_pressed: true,
        fire_released: true,
        restart: true,
        forward: true,
        strafe_left: true,
        ..InputObservations::default()
    };

    let first = replay(&[observations]);
    let second = replay(&[observations]);
    assert_eq!(first, second);

    let input = &first[0];
    assert_eq!(
        input.events,
        vec![
            InputEvent::TogglePause,
            InputEvent::SelectWeapon(WeaponKind::Rifle),
            InputEvent::Reload,
            InputEvent::FireDown,
            InputEvent::FireUp,
        ]
    );
    assert!(input.restart);
    assert!(input.intent.forward && input.intent.strafe_left);
    assert!(!input.intent.back && !input.intent.strafe_right);
}

#[test]
fn unknown_weapon_slots_are_ignored() {
    let observations = InputObservations {
        weapon_slot: Some(7),
        ..InputObservations::default()
    };
    assert!(replay(&[observations])[0].events.is_empty());
}

const FRAME: f32 = 1.0 / 60.0;

fn replay(sequence: &[InputObservations]) -> Vec<FrameInput> {
    let mut translator = InputTranslator::new();
    sequence
        .iter()
        .map(|observations| translator.translate(observations, FRAME))
        .collect()
}

fn observations_at(cursor_x: f32) -> InputObservations {
    InputObservations {
        cursor: Vec2::new(cursor_x, 240.0),
        ..InputObservations::default()
    }
}
