//! Obstacle integration tests
//!
//! Проверяем:
//! - персонаж входит в trigger volume → Fixed → Dynamic, масса из конфига
//! - ObstacleActivated ровно один раз, сколько бы триггеров ни пришло
//! - non-interactable никогда не активируется
//! - активированное препятствие падает под гравитацией и ложится на пол

mod common;

use arena_simulation::arena::spawn_bounds;
use arena_simulation::camera::spawn_orbit_camera;
use arena_simulation::locomotion::spawn_character;
use arena_simulation::obstacle::spawn_obstacle;
use arena_simulation::*;
use bevy::prelude::*;
use common::*;

/// App с персонажем, камерой и заданными препятствиями
fn obstacle_app(specs: Vec<ObstacleSpec>) -> App {
    let mut app = arena_app(empty_config(), 42, false);
    app.add_systems(
        Startup,
        move |mut commands: Commands, config: Res<ArenaConfig>| {
            spawn_bounds::<HeadlessBackend>(&mut commands, &config.bounds);
            for spec in &specs {
                spawn_obstacle::<HeadlessBackend>(&mut commands, spec, &config.obstacles);
            }
            spawn_character::<HeadlessBackend>(&mut commands, &config.character);
            spawn_orbit_camera(&mut commands, &config.orbit);
        },
    );
    start(&mut app);
    app
}

/// Препятствия в порядке spawn
fn obstacles(app: &mut App) -> Vec<Entity> {
    let world = app.world_mut();
    let mut query = world.query_filtered::<Entity, With<Obstacle>>();
    let mut entities: Vec<_> = query.iter(world).collect();
    entities.sort_by_key(|entity| entity.index());
    entities
}

fn state(app: &App, obstacle: Entity) -> ObstacleState {
    *app.world().get::<ObstacleState>(obstacle).expect("obstacle state")
}

fn activations(app: &App) -> Vec<ObstacleActivated> {
    let events = app.world().resource::<Events<ObstacleActivated>>();
    let mut cursor = events.get_cursor();
    cursor.read(events).copied().collect()
}

#[test]
fn test_character_walks_into_trigger() {
    // Сфера r=1.2 лежит на полу прямо по курсу (forward = -Z)
    let mut app = obstacle_app(vec![ObstacleSpec::interactable(Vec3::new(0.0, 1.2, -4.0), 1.2)]);
    let obstacle = obstacles(&mut app)[0];

    assert_eq!(state(&app, obstacle), ObstacleState::Fixed);
    assert_eq!(HeadlessBackend::mass(app.world(), obstacle), None);

    send(&mut app, HostInputEvent::key_down("w"));
    tick(&mut app, 20);

    assert_eq!(state(&app, obstacle), ObstacleState::Dynamic);
    assert_eq!(HeadlessBackend::mass(app.world(), obstacle), Some(10.0));
    assert_eq!(
        app.world().get::<ObstacleTint>(obstacle).map(|tint| tint.0),
        Some(ArenaConfig::default().obstacles.activated_color)
    );

    let activated = activations(&app);
    assert_eq!(activated.len(), 1);
    assert_eq!(activated[0].obstacle, obstacle);
    assert_eq!(activated[0].cause, InteractionCause::Proximity);
}

#[test]
fn test_activation_exactly_once() {
    let mut app = obstacle_app(vec![ObstacleSpec::interactable(Vec3::new(0.0, 1.2, -4.0), 1.2)]);
    let obstacle = obstacles(&mut app)[0];

    // Выбор указателем + вход в trigger + повторные выборы
    send(&mut app, HostInputEvent::key_down("w"));
    app.world_mut().send_event(ObstacleSelected { obstacle });
    tick(&mut app, 20);

    for _ in 0..3 {
        app.world_mut().send_event(ObstacleSelected { obstacle });
        tick(&mut app, 1);
    }

    // Отойти и вернуться: новый вход в trigger
    send(&mut app, HostInputEvent::key_up("w"));
    send(&mut app, HostInputEvent::key_down("s"));
    tick(&mut app, 20);
    send(&mut app, HostInputEvent::key_up("s"));
    send(&mut app, HostInputEvent::key_down("w"));
    tick(&mut app, 20);

    assert_eq!(state(&app, obstacle), ObstacleState::Dynamic);
    let activated = activations(&app);
    assert_eq!(activated.len(), 1);
    assert_eq!(activated[0].cause, InteractionCause::Selected);
}

#[test]
fn test_non_interactable_never_activates() {
    let spec = ObstacleSpec {
        position: Vec3::new(0.0, 1.2, -4.0),
        radius: 1.2,
        interactable: false,
    };
    let mut app = obstacle_app(vec![spec]);
    let obstacle = obstacles(&mut app)[0];

    // Без trigger volume
    let world = app.world_mut();
    let mut triggers = world.query::<&ObstacleTrigger>();
    assert_eq!(triggers.iter(world).count(), 0);

    send(&mut app, HostInputEvent::key_down("w"));
    app.world_mut().send_event(ObstacleSelected { obstacle });
    tick(&mut app, 30);

    assert_eq!(state(&app, obstacle), ObstacleState::Fixed);
    assert_eq!(HeadlessBackend::mass(app.world(), obstacle), None);
    assert!(activations(&app).is_empty());

    // Персонаж упёрся в Fixed сферу и не прошёл сквозь
    let position = character_position(&mut app);
    assert!(position.z > -4.0 + 1.2, "z = {}", position.z);
}

#[test]
fn test_other_bodies_do_not_trigger() {
    // Маленькая сфера висит над триггером большой; после активации
    // падает сквозь sensor большой: это не персонаж, активации нет
    let mut app = obstacle_app(vec![
        ObstacleSpec::interactable(Vec3::new(10.0, 1.6, 10.0), 1.6),
        ObstacleSpec::interactable(Vec3::new(10.0, 6.0, 10.0), 0.5),
    ]);
    let entities = obstacles(&mut app);
    let (large, small) = (entities[0], entities[1]);

    app.world_mut().send_event(ObstacleSelected { obstacle: small });
    tick(&mut app, 90);

    assert_eq!(state(&app, small), ObstacleState::Dynamic);
    assert_eq!(state(&app, large), ObstacleState::Fixed);
}

#[test]
fn test_activated_obstacle_falls_and_settles() {
    let mut app = obstacle_app(vec![ObstacleSpec::interactable(Vec3::new(-6.0, 4.0, -6.0), 0.8)]);
    let obstacle = obstacles(&mut app)[0];

    // Fixed: гравитация не действует
    tick(&mut app, 30);
    let fixed_position = HeadlessBackend::translation(app.world(), obstacle).expect("body");
    assert_eq!(fixed_position, Vec3::new(-6.0, 4.0, -6.0));

    app.world_mut().send_event(ObstacleSelected { obstacle });
    tick(&mut app, 1);
    assert_eq!(state(&app, obstacle), ObstacleState::Dynamic);

    tick(&mut app, 20);
    let falling = HeadlessBackend::translation(app.world(), obstacle).expect("body");
    assert!(falling.y < 4.0, "y = {}", falling.y);
    assert!(HeadlessBackend::linear_velocity(app.world(), obstacle).expect("body").y < 0.0);

    // Отскоки с restitution 0.7 затухают → лежит на полу
    tick(&mut app, 600);
    let resting = HeadlessBackend::translation(app.world(), obstacle).expect("body");
    assert!((resting.y - 0.8).abs() < 0.05, "y = {}", resting.y);
    assert!((resting.x + 6.0).abs() < 1e-4 && (resting.z + 6.0).abs() < 1e-4);
}

#[test]
fn test_preset_scene_snapshot() {
    let mut app = arena_app(ArenaConfig::default(), 42, true);
    start(&mut app);

    let snapshot = arena_snapshot::<HeadlessBackend>(app.world_mut());
    assert_eq!(snapshot.obstacles.len(), 5);
    assert_eq!(snapshot.activated_count(), 0);
    assert!(snapshot.obstacles.iter().all(|o| o.interactable));
    assert!(snapshot.character.is_some());
    assert!(snapshot.camera.is_some());

    // Forward из spawn → сфера r1.6 на (0, 1, -8)
    send(&mut app, HostInputEvent::key_down("w"));
    tick(&mut app, 60);

    let snapshot = arena_snapshot::<HeadlessBackend>(app.world_mut());
    assert_eq!(snapshot.activated_count(), 1);
    let activated = snapshot
        .obstacles
        .iter()
        .find(|o| o.state.is_dynamic())
        .expect("activated obstacle");
    assert_eq!(activated.radius, 1.6);
}
