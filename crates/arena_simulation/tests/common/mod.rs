//! Общие helpers для интеграционных тестов арены
//!
//! Тик = ручной прогон FixedUpdate: шаг детерминирован и не зависит от
//! wall-clock времени.

#![allow(dead_code)]

use arena_simulation::*;
use bevy::prelude::*;

/// Headless App с арены-plugin'ом и заданным конфигом
///
/// `spawn_scene = false` → тест сам спавнит сцену Startup системой
/// (до вызова `start`).
pub fn arena_app(config: ArenaConfig, seed: u64, spawn_scene: bool) -> App {
    let mut app = create_headless_app(seed);
    app.insert_resource(config);

    let plugin = if spawn_scene {
        ArenaSimulationPlugin::<HeadlessBackend>::default()
    } else {
        ArenaSimulationPlugin::<HeadlessBackend>::without_scene()
    };
    app.add_plugins(plugin);

    app
}

/// Конфиг без препятствий (чистый пол для locomotion/camera)
pub fn empty_config() -> ArenaConfig {
    ArenaConfig {
        layout: ObstacleLayout::Empty,
        ..default()
    }
}

/// Прогоняет Startup (сцена)
pub fn start(app: &mut App) {
    app.finish();
    app.cleanup();
    app.update();
}

/// N тиков симуляции
pub fn tick(app: &mut App, count: usize) {
    for _ in 0..count {
        app.world_mut().run_schedule(FixedUpdate);
    }
}

pub fn send(app: &mut App, event: HostInputEvent) {
    app.world_mut().send_event(event);
}

pub fn character(app: &mut App) -> Entity {
    let world = app.world_mut();
    let mut query = world.query_filtered::<Entity, With<Character>>();
    query.single(world).expect("character spawned")
}

pub fn character_position(app: &mut App) -> Vec3 {
    let entity = character(app);
    HeadlessBackend::translation(app.world(), entity).expect("character body")
}

pub fn character_velocity(app: &mut App) -> Vec3 {
    let entity = character(app);
    HeadlessBackend::linear_velocity(app.world(), entity).expect("character body")
}

/// (OrbitCamera, Transform) единственной камеры
pub fn camera_state(app: &mut App) -> (OrbitCamera, Transform) {
    let world = app.world_mut();
    let mut query = world.query::<(&OrbitCamera, &Transform)>();
    let (camera, transform) = query.single(world).expect("camera spawned");
    (*camera, *transform)
}

pub fn assert_vec3_near(actual: Vec3, expected: Vec3, tolerance: f32) {
    assert!(
        (actual - expected).length() <= tolerance,
        "expected {:?}, got {:?} (tolerance {})",
        expected,
        actual,
        tolerance
    );
}
