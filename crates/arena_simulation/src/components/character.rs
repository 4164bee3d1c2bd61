//! Character компоненты: Character marker, CharacterModel

use bevy::prelude::*;

/// Marker: физическое тело персонажа (single-player, один на арену)
///
/// Само тело (velocity, translation) принадлежит physics backend'у.
/// Controllers находят персонажа через `With<Character>` и читают/пишут
/// тело только через `PhysicsBackend`.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
#[require(Transform)]
pub struct Character;

/// Визуальная модель персонажа (child entity тела)
///
/// Yaw модели = yaw камеры, физика модель не вращает.
/// `yaw`: последнее записанное значение (equality check перед записью).
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
#[require(Transform)]
pub struct CharacterModel {
    pub yaw: f32,
}

/// Event: персонаж заспавнен, body handle доступен
///
/// Любое число observers может подписаться (host renderer, debug overlay).
#[derive(Event, Debug, Clone, Copy)]
pub struct CharacterSpawned {
    pub character: Entity,
    pub model: Entity,
}
