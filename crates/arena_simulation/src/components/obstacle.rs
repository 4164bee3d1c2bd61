//! Obstacle компоненты: Obstacle, ObstacleState, ObstacleTint, ObstacleTrigger

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Препятствие-сфера
///
/// Позиция фиксирована на spawn; после активации ей владеет солвер.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
#[require(ObstacleState, Transform)]
pub struct Obstacle {
    pub radius: f32,
    /// Масса после перехода в Dynamic
    pub mass: f32,
    pub restitution: f32,
    /// Только interactable препятствия реагируют на trigger/select
    pub interactable: bool,
    pub base_color: Color,
    pub activated_color: Color,
}

/// Lifecycle препятствия
///
/// Инвариант: только `Fixed → Dynamic`, обратного перехода нет.
#[derive(
    Component, Debug, Clone, Copy, PartialEq, Eq, Default, Reflect, Serialize, Deserialize,
)]
#[reflect(Component)]
pub enum ObstacleState {
    #[default]
    Fixed,
    Dynamic,
}

impl ObstacleState {
    pub fn is_dynamic(&self) -> bool {
        *self == ObstacleState::Dynamic
    }
}

/// Текущий цвет препятствия (читает renderer)
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct ObstacleTint(pub Color);

/// Sensor child: ссылка на препятствие-владельца trigger volume
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct ObstacleTrigger {
    pub obstacle: Entity,
}
