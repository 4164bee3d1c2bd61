//! Camera-orbit controller
//!
//! Два триггера, одна формула позы:
//! 1. Drag: OrbitDrag → yaw += delta → поза от ПОСЛЕДНЕЙ известной позиции
//!    персонажа (может отставать на тик от physics step)
//! 2. Frame: после physics step → поза от ТЕКУЩЕЙ позиции персонажа
//!
//! Формула: eye = target + (sin(yaw)·radius, height_offset, cos(yaw)·radius),
//! look-at = target (snap, без сглаживания).

use bevy::prelude::*;

use crate::components::{Character, OrbitCamera};
use crate::config::OrbitConfig;
use crate::input::OrbitDrag;
use crate::physics::PhysicsBackend;

/// Позиция камеры на орбите вокруг target
pub fn orbit_eye(target: Vec3, yaw: f32, radius: f32, height_offset: f32) -> Vec3 {
    let (sin, cos) = yaw.sin_cos();
    target + Vec3::new(sin * radius, height_offset, cos * radius)
}

/// Записывает позу камеры для target (обновляет look_at/target)
pub fn place_camera(camera: &mut OrbitCamera, transform: &mut Transform, target: Vec3) {
    camera.look_at = target;
    camera.target = Some(target);

    let eye = orbit_eye(target, camera.yaw, camera.radius, camera.height_offset);
    *transform = Transform::from_translation(eye).looking_at(target, Vec3::Y);
}

/// Система: OrbitDrag → yaw + немедленный пересчёт позы
///
/// До первого чтения персонажа target неизвестен: yaw копится,
/// поза остаётся начальной.
pub fn apply_orbit_drag(
    mut drags: EventReader<OrbitDrag>,
    mut cameras: Query<(&mut OrbitCamera, &mut Transform)>,
) {
    for drag in drags.read() {
        for (mut camera, mut transform) in cameras.iter_mut() {
            camera.yaw += drag.yaw_delta;

            if let Some(target) = camera.target {
                place_camera(&mut camera, &mut transform, target);
            }
        }
    }
}

/// Exclusive система: поза камеры от свежей позиции тела персонажа
///
/// Работает в ArenaSet::Camera (после physics step). Нет тела → skip.
pub fn follow_character<B: PhysicsBackend>(world: &mut World) {
    let mut characters = world.query_filtered::<Entity, With<Character>>();
    let Ok(character) = characters.single(world) else {
        return;
    };

    let Some(position) = B::translation(world, character) else {
        return;
    };

    let mut cameras = world.query::<(&mut OrbitCamera, &mut Transform)>();
    for (mut camera, mut transform) in cameras.iter_mut(world) {
        place_camera(&mut camera, &mut transform, position);
    }
}

/// Spawn helper: камера в начальной позе (один раз при setup)
pub fn spawn_orbit_camera(commands: &mut Commands, config: &OrbitConfig) -> Entity {
    commands
        .spawn((
            OrbitCamera {
                yaw: 0.0,
                radius: config.radius,
                height_offset: config.height_offset,
                look_at: config.initial_target,
                target: None,
            },
            Name::new("OrbitCamera"),
            Transform::from_translation(config.initial_eye)
                .looking_at(config.initial_target, Vec3::Y),
        ))
        .id()
}
