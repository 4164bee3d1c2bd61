//! Orbit camera state

use bevy::prelude::*;

/// Orbit камера вокруг персонажа
///
/// Инварианты:
/// - radius/height_offset константны, позицию меняет только yaw
/// - look_at = последняя известная позиция персонажа
///
/// `target`: None пока персонаж ни разу не был прочитан (drag до
/// первого тика только копит yaw).
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
#[require(Transform)]
pub struct OrbitCamera {
    /// Радианы, без wrap (тригонометрия заворачивает сама)
    pub yaw: f32,
    pub radius: f32,
    pub height_offset: f32,
    pub look_at: Vec3,
    pub target: Option<Vec3>,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            yaw: 0.0,
            radius: 10.0,
            height_offset: 5.0,
            look_at: Vec3::ZERO,
            target: None,
        }
    }
}
