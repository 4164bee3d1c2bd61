//! Host input adapter: Bevy window input → HostInputEvent
//!
//! Добавляется только host'ом с InputPlugin/WindowPlugin (окно). Headless и
//! тесты пишут HostInputEvent напрямую.
//!
//! Keyboard: logical key → DOM-style identifier. Pointer: левая кнопка мыши
//! = PointerDown/PointerUp, CursorMoved (client space окна) = PointerMove.

use bevy::input::keyboard::KeyboardInput;
use bevy::input::mouse::MouseButtonInput;
use bevy::input::ButtonState;
use bevy::prelude::*;
use bevy::window::CursorMoved;

use super::events::HostInputEvent;
use super::keys::key_identifier;

/// Plugin: подписка на keyboard/pointer events host'а
///
/// Время жизни подписки = время жизни plugin'а в App.
pub struct HostInputPlugin;

impl Plugin for HostInputPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<KeyboardInput>()
            .add_event::<MouseButtonInput>()
            .add_event::<CursorMoved>()
            .add_event::<HostInputEvent>()
            .init_resource::<LastCursor>()
            .add_systems(PreUpdate, (forward_keyboard_input, forward_pointer_input));
    }
}

/// Последняя известная позиция курсора (client space)
///
/// MouseButtonInput позиции не несёт: PointerDown берёт её отсюда.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq)]
pub struct LastCursor(pub Vec2);

/// Система: KeyboardInput (logical key) → HostInputEvent::KeyDown/KeyUp
///
/// Auto-repeat пропускаем: held-state не меняется.
pub fn forward_keyboard_input(
    mut keyboard: EventReader<KeyboardInput>,
    mut host_events: EventWriter<HostInputEvent>,
) {
    for event in keyboard.read() {
        if event.repeat {
            continue;
        }

        let Some(key) = key_identifier(&event.logical_key) else {
            continue;
        };

        let host_event = match event.state {
            ButtonState::Pressed => HostInputEvent::KeyDown { key },
            ButtonState::Released => HostInputEvent::KeyUp { key },
        };
        host_events.write(host_event);
    }
}

/// Система: MouseButtonInput + CursorMoved → PointerDown/Move/Up
///
/// Порядок внутри кадра между кнопками и движением Bevy не сохраняет,
/// поэтому: нажатия → движения → отпускания. Клик с движением в одном
/// кадре всё равно даёт drag.
pub fn forward_pointer_input(
    mut buttons: EventReader<MouseButtonInput>,
    mut cursor: EventReader<CursorMoved>,
    mut last_cursor: ResMut<LastCursor>,
    mut host_events: EventWriter<HostInputEvent>,
) {
    let mut released = false;

    for event in buttons.read() {
        if event.button != MouseButton::Left {
            continue;
        }
        match event.state {
            ButtonState::Pressed => {
                host_events.write(HostInputEvent::PointerDown {
                    position: last_cursor.0,
                });
            }
            ButtonState::Released => released = true,
        }
    }

    for event in cursor.read() {
        last_cursor.0 = event.position;
        host_events.write(HostInputEvent::PointerMove {
            position: event.position,
        });
    }

    if released {
        host_events.write(HostInputEvent::PointerUp);
    }
}
