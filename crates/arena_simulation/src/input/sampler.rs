//! Input sampler: KeySet/DragState → FrameInput
//!
//! Arena-style: каждый тик дренируем очередь HostInputEvent, обновляем
//! held-state, собираем свежий FrameInput snapshot. Snapshot прошлого тика
//! перезаписывается целиком. Drag в snapshot не попадает: каждый pointer move
//! сразу уходит камере как OrbitDrag.

use std::collections::HashMap;

use bevy::prelude::*;

use super::events::{HostInputEvent, OrbitDrag};
use super::keys::MoveKey;
use crate::config::ArenaConfig;
use crate::logger;

/// Held-state клавиш (key identifier → нажата ли)
///
/// Незнакомые клавиши тоже хранятся: фильтрация на уровне MoveKey.
#[derive(Resource, Debug, Default, Clone)]
pub struct KeySet {
    held: HashMap<String, bool>,
}

impl KeySet {
    pub fn press(&mut self, key: &str) {
        self.held.insert(key.to_string(), true);
    }

    pub fn release(&mut self, key: &str) {
        self.held.insert(key.to_string(), false);
    }

    pub fn is_down(&self, key: &str) -> bool {
        self.held.get(key).copied().unwrap_or(false)
    }

    /// Действие активно если нажата любая из его клавиш
    pub fn is_held(&self, action: MoveKey) -> bool {
        action.bindings().iter().any(|key| self.is_down(key))
    }
}

/// Состояние mouse drag (orbit камеры)
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq)]
pub struct DragState {
    pub dragging: bool,
    pub last_pointer: Vec2,
}

impl DragState {
    /// Pointer move → yaw delta (None если drag не активен)
    ///
    /// yaw_delta = -Δx × rotation_speed; last_pointer обновляется.
    pub fn drag_to(&mut self, position: Vec2, rotation_speed: f32) -> Option<f32> {
        if !self.dragging {
            return None;
        }
        let delta_x = position.x - self.last_pointer.x;
        self.last_pointer = position;
        Some(-delta_x * rotation_speed)
    }
}

/// Input snapshot текущего тика (читается locomotion)
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq)]
pub struct FrameInput {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

impl FrameInput {
    pub fn from_keys(keys: &KeySet) -> Self {
        Self {
            forward: keys.is_held(MoveKey::Forward),
            backward: keys.is_held(MoveKey::Backward),
            left: keys.is_held(MoveKey::Left),
            right: keys.is_held(MoveKey::Right),
            jump: keys.is_held(MoveKey::Jump),
        }
    }

    pub fn any_direction(&self) -> bool {
        self.forward || self.backward || self.left || self.right
    }
}

/// Система: drain HostInputEvent → KeySet/DragState → FrameInput + OrbitDrag
///
/// Работает в FixedUpdate (ArenaSet::Input), первой в тике.
pub fn sample_input(
    mut events: EventReader<HostInputEvent>,
    mut keys: ResMut<KeySet>,
    mut drag: ResMut<DragState>,
    mut frame: ResMut<FrameInput>,
    mut drags: EventWriter<OrbitDrag>,
    config: Res<ArenaConfig>,
) {
    for event in events.read() {
        match event {
            HostInputEvent::KeyDown { key } => keys.press(key),
            HostInputEvent::KeyUp { key } => keys.release(key),
            HostInputEvent::PointerDown { position } => {
                drag.dragging = true;
                drag.last_pointer = *position;
                logger::log("🖱️ Orbit drag started");
            }
            HostInputEvent::PointerUp => {
                if drag.dragging {
                    logger::log("🖱️ Orbit drag released");
                }
                drag.dragging = false;
            }
            HostInputEvent::PointerMove { position } => {
                if let Some(delta) = drag.drag_to(*position, config.orbit.rotation_speed) {
                    drags.write(OrbitDrag { yaw_delta: delta });
                }
            }
        }
    }

    *frame = FrameInput::from_keys(&keys);
}
