//! Locomotion controller: FrameInput + camera yaw → velocity команда тела
//!
//! Архитектура:
//! - `plan_locomotion`: чистая функция (input, yaw, vy) → LocomotionCommand
//! - `drive_character`: exclusive система, пишет команду через PhysicsBackend
//! - `sync_model_yaw`: cosmetic yaw визуальной модели = yaw камеры
//!
//! Работает в FixedUpdate (ArenaSet::Locomotion), до physics step.
//! Горизонтальная скорость перезаписывается КАЖДЫЙ тик (даже нулём),
//! вертикальная сохраняется, angular velocity обнуляется.

use bevy::prelude::*;

use crate::components::{Character, CharacterModel, CharacterSpawned, OrbitCamera};
use crate::config::{ArenaConfig, CharacterConfig, MovementConfig};
use crate::input::FrameInput;
use crate::logger;
use crate::physics::{CharacterBodyDesc, PhysicsBackend};

/// Команда тела на один тик
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocomotionCommand {
    /// Горизонтальная скорость: x → world X, y → world Z
    pub horizontal: Vec2,
    /// Вертикальный impulse прыжка (None: не прыгаем)
    pub jump_impulse: Option<f32>,
}

/// Горизонтальная скорость из направлений относительно yaw камеры
///
/// Вклады направлений суммируются БЕЗ нормализации:
/// forward + left = speed·√2.
pub fn horizontal_velocity(input: &FrameInput, yaw: f32, speed: f32) -> Vec2 {
    let (sin, cos) = yaw.sin_cos();
    let forward = Vec2::new(-sin, -cos) * speed;
    let left = Vec2::new(cos, -sin) * speed;

    let mut velocity = Vec2::ZERO;
    if input.forward {
        velocity += forward;
    }
    if input.backward {
        velocity -= forward;
    }
    if input.left {
        velocity += left;
    }
    if input.right {
        velocity -= left;
    }
    velocity
}

/// Grounded = |vy| ниже порога (выводится каждый тик, не хранится)
pub fn is_grounded(vertical_velocity: f32, threshold: f32) -> bool {
    vertical_velocity.abs() < threshold
}

/// Полная команда тика
pub fn plan_locomotion(
    input: &FrameInput,
    yaw: f32,
    vertical_velocity: f32,
    movement: &MovementConfig,
) -> LocomotionCommand {
    let jump_impulse = (input.jump
        && is_grounded(vertical_velocity, movement.grounded_threshold))
    .then_some(movement.jump_impulse);

    LocomotionCommand {
        horizontal: horizontal_velocity(input, yaw, movement.speed),
        jump_impulse,
    }
}

/// Exclusive система: FrameInput → velocity/impulse тела персонажа
///
/// Тело ещё не создано (или уже удалено) → тихий skip тика.
/// Yaw камеры читается после drag'ов этого тика (ArenaSet::Input раньше).
pub fn drive_character<B: PhysicsBackend>(world: &mut World) {
    let mut characters = world.query_filtered::<Entity, With<Character>>();
    let Ok(character) = characters.single(world) else {
        return;
    };

    let Some(input) = world.get_resource::<FrameInput>().copied() else {
        return;
    };
    let Some(movement) = world.get_resource::<ArenaConfig>().map(|c| c.movement) else {
        return;
    };

    let mut cameras = world.query::<&OrbitCamera>();
    let yaw = cameras.single(world).map(|camera| camera.yaw).unwrap_or(0.0);

    let Some(velocity) = B::linear_velocity(world, character) else {
        return;
    };

    let command = plan_locomotion(&input, yaw, velocity.y, &movement);

    if let Some(impulse) = command.jump_impulse {
        if B::apply_impulse(world, character, Vec3::Y * impulse) {
            logger::log(&format!("🦘 Jump impulse {:.1} (vy={:.3})", impulse, velocity.y));
        }
    }

    B::set_linear_velocity(
        world,
        character,
        Vec3::new(command.horizontal.x, velocity.y, command.horizontal.y),
    );
    B::set_angular_velocity(world, character, Vec3::ZERO);
}

/// Система: yaw визуальной модели ← yaw камеры
///
/// Пишем только если значение изменилось (точное сравнение, не tolerance).
pub fn sync_model_yaw(
    cameras: Query<&OrbitCamera>,
    mut models: Query<(&mut CharacterModel, &mut Transform)>,
) {
    let Ok(camera) = cameras.single() else {
        return;
    };

    for (mut model, mut transform) in models.iter_mut() {
        if model.yaw == camera.yaw {
            continue;
        }
        model.yaw = camera.yaw;
        transform.rotation = Quat::from_rotation_y(camera.yaw);
    }
}

/// Spawn helper: тело персонажа + child визуальной модели
///
/// Возвращает (character, model). Шлёт `CharacterSpawned` для observers.
pub fn spawn_character<B: PhysicsBackend>(
    commands: &mut Commands,
    config: &CharacterConfig,
) -> (Entity, Entity) {
    let character = commands
        .spawn((
            Character,
            Name::new("Character"),
            Transform::from_translation(config.spawn_position),
            B::character_body(CharacterBodyDesc {
                half_extents: config.half_extents,
                mass: config.mass,
                friction: config.friction,
            }),
        ))
        .id();

    let model = commands
        .spawn((
            CharacterModel::default(),
            Name::new("CharacterModel"),
            ChildOf(character),
        ))
        .id();

    commands.send_event(CharacterSpawned { character, model });

    logger::log_info(&format!(
        "🧍 Character spawned at {:?} (body {:?}, model {:?})",
        config.spawn_position, character, model
    ));

    (character, model)
}
