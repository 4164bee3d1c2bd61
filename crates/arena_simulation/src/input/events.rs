//! Input events
//!
//! Host (окно/браузер/тест) пишет сырые события, sampler их дренирует
//! один раз за тик.

use bevy::prelude::*;

/// Сырое событие клавиатуры/указателя от host'а
///
/// # Архитектура
/// - Emit: host adapter (`HostInputPlugin`) или тест напрямую
/// - Consume: `sample_input` (ArenaSet::Input)
///
/// Key identifiers: как у DOM `KeyboardEvent.key`: `"w"`, `"ArrowUp"`, `" "`.
/// Координаты указателя: client space (pixels).
#[derive(Event, Debug, Clone, PartialEq)]
pub enum HostInputEvent {
    KeyDown { key: String },
    KeyUp { key: String },
    PointerDown { position: Vec2 },
    PointerUp,
    PointerMove { position: Vec2 },
}

impl HostInputEvent {
    pub fn key_down(key: impl Into<String>) -> Self {
        Self::KeyDown { key: key.into() }
    }

    pub fn key_up(key: impl Into<String>) -> Self {
        Self::KeyUp { key: key.into() }
    }
}

/// Event: drag по горизонтали повернул orbit камеру
///
/// Генерируется sampler'ом на каждый PointerMove во время drag.
/// Обрабатывается: `apply_orbit_drag` (немедленный пересчёт позы камеры).
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct OrbitDrag {
    /// Изменение yaw (радианы), уже с учётом rotation speed и знака
    pub yaw_delta: f32,
}
