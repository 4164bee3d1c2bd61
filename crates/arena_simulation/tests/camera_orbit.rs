//! Camera-orbit integration tests
//!
//! Инварианты:
//! - камера всегда на горизонтальной дистанции radius и высоте height_offset
//!   от текущей позиции персонажа
//! - drag Δx меняет yaw на -Δx·0.005 независимо от стартового yaw
//! - yaw визуальной модели = yaw камеры в том же тике

mod common;

use arena_simulation::camera::apply_orbit_drag;
use arena_simulation::*;
use bevy::prelude::*;
use common::*;

fn drag(app: &mut App, from: f32, to: f32) {
    send(app, HostInputEvent::PointerDown {
        position: Vec2::new(from, 200.0),
    });
    send(app, HostInputEvent::PointerMove {
        position: Vec2::new(to, 240.0),
    });
    send(app, HostInputEvent::PointerUp);
}

fn assert_orbit_invariant(app: &mut App) {
    let position = character_position(app);
    let (orbit, transform) = camera_state(app);
    let offset = transform.translation - position;

    let horizontal = Vec2::new(offset.x, offset.z).length();
    assert!((horizontal - 10.0).abs() < 1e-3, "horizontal distance = {}", horizontal);
    assert!((offset.y - 5.0).abs() < 1e-3, "height = {}", offset.y);
    assert_vec3_near(orbit.look_at, position, 1e-5);
}

#[test]
fn test_initial_camera_pose() {
    let mut app = arena_app(empty_config(), 42, true);
    start(&mut app);

    let (orbit, transform) = camera_state(&mut app);
    assert_eq!(orbit.yaw, 0.0);
    assert_eq!(orbit.target, None);
    assert_vec3_near(transform.translation, Vec3::new(0.0, 5.0, 10.0), 1e-6);

    let facing = transform.forward();
    let to_origin = (Vec3::ZERO - transform.translation).normalize();
    assert!(facing.dot(to_origin) > 0.9999);
}

#[test]
fn test_drag_changes_yaw_linearly() {
    let mut app = arena_app(empty_config(), 42, true);
    start(&mut app);
    tick(&mut app, 1);

    // Δx = +60 → yaw -0.3
    drag(&mut app, 100.0, 160.0);
    tick(&mut app, 1);
    let (orbit, _) = camera_state(&mut app);
    assert!((orbit.yaw - (-0.3)).abs() < 1e-5, "yaw = {}", orbit.yaw);

    // С другого стартового yaw: Δx = -40 → +0.2
    drag(&mut app, 500.0, 460.0);
    tick(&mut app, 1);
    let (orbit, _) = camera_state(&mut app);
    assert!((orbit.yaw - (-0.1)).abs() < 1e-5, "yaw = {}", orbit.yaw);
}

#[test]
fn test_pointer_move_without_drag_ignored() {
    let mut app = arena_app(empty_config(), 42, true);
    start(&mut app);

    send(&mut app, HostInputEvent::PointerMove {
        position: Vec2::new(900.0, 10.0),
    });
    tick(&mut app, 1);

    let (orbit, _) = camera_state(&mut app);
    assert_eq!(orbit.yaw, 0.0);
}

#[test]
fn test_orbit_invariant_after_drags_and_frames() {
    let mut app = arena_app(empty_config(), 42, true);
    start(&mut app);

    send(&mut app, HostInputEvent::key_down("w"));
    tick(&mut app, 1);
    assert_orbit_invariant(&mut app);

    let drags = [(0.0, 120.0), (300.0, 50.0), (10.0, 11.0), (640.0, 1280.0)];
    for (from, to) in drags {
        drag(&mut app, from, to);
        tick(&mut app, 1);
        assert_orbit_invariant(&mut app);

        tick(&mut app, 7);
        assert_orbit_invariant(&mut app);
    }

    // Strafe + drag в одном тике
    send(&mut app, HostInputEvent::key_down("d"));
    drag(&mut app, 200.0, 100.0);
    tick(&mut app, 3);
    assert_orbit_invariant(&mut app);
}

#[test]
fn test_forward_follows_camera_yaw() {
    let mut app = arena_app(empty_config(), 42, true);
    start(&mut app);
    tick(&mut app, 1);

    // Drag влево на π/2 / 0.005 пикселей → yaw = +π/2
    let pixels = std::f32::consts::FRAC_PI_2 / 0.005;
    drag(&mut app, 1000.0, 1000.0 - pixels);
    send(&mut app, HostInputEvent::key_down("w"));
    tick(&mut app, 1);

    // Камера на +X → forward уводит персонажа в -X
    let velocity = character_velocity(&mut app);
    assert!((velocity.x + 15.0).abs() < 1e-2, "velocity = {:?}", velocity);
    assert!(velocity.z.abs() < 1e-2, "velocity = {:?}", velocity);
}

#[test]
fn test_model_yaw_follows_camera() {
    let mut app = arena_app(empty_config(), 42, true);
    start(&mut app);
    tick(&mut app, 1);

    drag(&mut app, 0.0, -100.0);
    tick(&mut app, 1);

    let (orbit, _) = camera_state(&mut app);
    let world = app.world_mut();
    let mut models = world.query::<(&CharacterModel, &Transform)>();
    let (model, transform) = models.single(world).expect("model");

    assert_eq!(model.yaw, orbit.yaw);
    assert!(transform.rotation.angle_between(Quat::from_rotation_y(orbit.yaw)) < 1e-5);
}

/// Drag trigger отдельно: поза считается от последней известной позиции,
/// без чтения physics тела
#[test]
fn test_drag_recomputes_from_last_known_target() {
    let mut world = World::new();
    world.init_resource::<Events<OrbitDrag>>();

    let target = Vec3::new(4.0, 1.0, -6.0);
    let camera = world
        .spawn((
            OrbitCamera {
                target: Some(target),
                look_at: target,
                ..default()
            },
            Transform::default(),
        ))
        .id();

    world.send_event(OrbitDrag { yaw_delta: 0.25 });
    world.send_event(OrbitDrag { yaw_delta: -0.75 });

    let mut schedule = Schedule::default();
    schedule.add_systems(apply_orbit_drag);
    schedule.run(&mut world);

    let orbit = *world.get::<OrbitCamera>(camera).expect("camera");
    let transform = *world.get::<Transform>(camera).expect("camera");

    assert!((orbit.yaw - (-0.5)).abs() < 1e-6);
    assert_vec3_near(
        transform.translation,
        target + Vec3::new((-0.5f32).sin() * 10.0, 5.0, (-0.5f32).cos() * 10.0),
        1e-4,
    );
    assert_eq!(orbit.look_at, target);
}

/// Drag до первого тика: yaw копится, поза не трогается (target неизвестен)
#[test]
fn test_drag_before_first_frame_keeps_initial_pose() {
    let mut world = World::new();
    world.init_resource::<Events<OrbitDrag>>();

    let initial = Transform::from_xyz(0.0, 5.0, 10.0).looking_at(Vec3::ZERO, Vec3::Y);
    let camera = world.spawn((OrbitCamera::default(), initial)).id();

    world.send_event(OrbitDrag { yaw_delta: 0.4 });

    let mut schedule = Schedule::default();
    schedule.add_systems(apply_orbit_drag);
    schedule.run(&mut world);

    assert_eq!(world.get::<OrbitCamera>(camera).map(|c| c.yaw), Some(0.4));
    assert_eq!(world.get::<Transform>(camera), Some(&initial));
}
