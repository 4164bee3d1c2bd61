//! Obstacle events

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Event: host выбрал препятствие указателем (picking на стороне host'а)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObstacleSelected {
    pub obstacle: Entity,
}

/// Чем вызвана активация
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InteractionCause {
    /// Персонаж вошёл в trigger volume
    Proximity,
    /// Прямой выбор указателем
    Selected,
}

/// Event: препятствие перешло Fixed → Dynamic
///
/// Генерируется ровно один раз на препятствие.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObstacleActivated {
    pub obstacle: Entity,
    pub cause: InteractionCause,
}
