//! Key identifier → logical direction

use bevy::input::keyboard::Key;

/// Логическое действие, которое может держать игрок
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKey {
    Forward,
    Backward,
    Left,
    Right,
    Jump,
}

impl MoveKey {
    /// Все key identifiers, привязанные к действию
    pub fn bindings(self) -> &'static [&'static str] {
        match self {
            MoveKey::Forward => &["ArrowUp", "w"],
            MoveKey::Backward => &["ArrowDown", "s"],
            MoveKey::Left => &["ArrowLeft", "a"],
            MoveKey::Right => &["ArrowRight", "d"],
            MoveKey::Jump => &[" "],
        }
    }

    /// Действие для key identifier (None: незнакомая клавиша)
    pub fn from_key(key: &str) -> Option<Self> {
        [
            MoveKey::Forward,
            MoveKey::Backward,
            MoveKey::Left,
            MoveKey::Right,
            MoveKey::Jump,
        ]
        .into_iter()
        .find(|action| action.bindings().contains(&key))
    }
}

/// Bevy logical key → DOM-style identifier
///
/// Возвращает None для клавиш без текстового имени (модификаторы и т.п.).
pub fn key_identifier(key: &Key) -> Option<String> {
    match key {
        Key::Character(text) => Some(text.to_string()),
        Key::Space => Some(" ".to_string()),
        Key::ArrowUp => Some("ArrowUp".to_string()),
        Key::ArrowDown => Some("ArrowDown".to_string()),
        Key::ArrowLeft => Some("ArrowLeft".to_string()),
        Key::ArrowRight => Some("ArrowRight".to_string()),
        _ => None,
    }
}
