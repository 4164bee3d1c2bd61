//! Rapier backend integration tests
//!
//! Тот же тик, что и в headless тестах, но step делает bevy_rapier3d:
//! - configure_rapier: gravity и fixed timestep из ArenaConfig
//! - прыжок: impulse в ExternalImpulse + перезапись vy в том же тике
//! - бег вперёд + камера следует за телом после Writeback
//! - sensor CollisionEvent → TriggerEntered → Fixed → Dynamic

mod common;

use arena_simulation::*;
use bevy::prelude::*;
use bevy_rapier3d::prelude::{RapierConfiguration, TimestepMode};
use common::*;

/// Rapier App (TransformPlugin нужен для sync коллайдеров-детей)
fn rapier_app(config: ArenaConfig) -> App {
    let mut app = create_headless_app(42);
    app.insert_resource(config)
        .add_plugins(TransformPlugin)
        .add_plugins(ArenaSimulationPlugin::<RapierBackend>::default());
    start(&mut app);
    app
}

fn character_position(app: &mut App) -> Vec3 {
    let entity = character(app);
    RapierBackend::translation(app.world(), entity).expect("character body")
}

fn character_velocity(app: &mut App) -> Vec3 {
    let entity = character(app);
    RapierBackend::linear_velocity(app.world(), entity).expect("character body")
}

#[test]
fn test_rapier_configured_from_arena_config() {
    let mut app = rapier_app(ArenaConfig {
        gravity: -20.0,
        tick_hz: 30.0,
        ..empty_config()
    });

    let timestep = *app.world().resource::<TimestepMode>();
    match timestep {
        TimestepMode::Fixed { dt, substeps } => {
            assert!((dt - 1.0 / 30.0).abs() < 1e-6, "dt = {}", dt);
            assert_eq!(substeps, 1);
        }
        other => panic!("unexpected timestep mode {:?}", other),
    }

    let world = app.world_mut();
    let mut contexts = world.query::<&RapierConfiguration>();
    let rapier_config = contexts.single(world).expect("default rapier context");
    assert_eq!(rapier_config.gravity, Vec3::new(0.0, -20.0, 0.0));
}

#[test]
fn test_rapier_jump_from_rest() {
    let mut app = rapier_app(empty_config());

    // Успокоиться на полу
    tick(&mut app, 30);
    let rest = character_position(&mut app);
    assert!(character_velocity(&mut app).y.abs() < 0.1);

    send(&mut app, HostInputEvent::key_down(" "));
    tick(&mut app, 1);
    send(&mut app, HostInputEvent::key_up(" "));

    // Impulse применён поверх перезаписанной vy: 5 - g·dt
    let vy = character_velocity(&mut app).y;
    assert!((vy - (5.0 - 9.81 / 60.0)).abs() < 0.05, "vy = {}", vy);

    let mut max_y = rest.y;
    for _ in 0..60 {
        tick(&mut app, 1);
        max_y = max_y.max(character_position(&mut app).y);
    }
    assert!(max_y > rest.y + 0.9, "max_y = {} (rest {})", max_y, rest.y);

    // Приземлился обратно
    tick(&mut app, 60);
    assert!((character_position(&mut app).y - rest.y).abs() < 0.05);
}

#[test]
fn test_rapier_forward_run_and_camera_follow() {
    let mut app = rapier_app(empty_config());
    tick(&mut app, 10);
    let start_position = character_position(&mut app);

    send(&mut app, HostInputEvent::key_down("w"));
    tick(&mut app, 60);

    let position = character_position(&mut app);
    assert!(position.z < start_position.z - 13.0, "z = {}", position.z);
    assert!((position.x - start_position.x).abs() < 0.1, "x = {}", position.x);

    let (orbit, transform) = camera_state(&mut app);
    assert_vec3_near(transform.translation, position + Vec3::new(0.0, 5.0, 10.0), 1e-3);
    assert_vec3_near(orbit.look_at, position, 1e-5);
}

#[test]
fn test_rapier_sensor_activates_preset_obstacle() {
    let mut app = rapier_app(ArenaConfig::default());

    // Forward из spawn → сфера r1.6 на (0, 1, -8)
    send(&mut app, HostInputEvent::key_down("w"));
    tick(&mut app, 60);

    let snapshot = arena_snapshot::<RapierBackend>(app.world_mut());
    assert_eq!(snapshot.activated_count(), 1);
    let activated = snapshot
        .obstacles
        .iter()
        .find(|o| o.state.is_dynamic())
        .expect("activated obstacle");
    assert_eq!(activated.radius, 1.6);

    let events = app.world().resource::<Events<ObstacleActivated>>();
    let mut cursor = events.get_cursor();
    let activations: Vec<_> = cursor.read(events).copied().collect();
    assert_eq!(activations.len(), 1);
    assert_eq!(activations[0].cause, InteractionCause::Proximity);
    assert_eq!(
        RapierBackend::mass(app.world(), activations[0].obstacle),
        Some(ArenaConfig::default().obstacles.mass)
    );
}
