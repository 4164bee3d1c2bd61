//! ArenaConfig: все константы controller'а в одном resource
//!
//! Defaults = исходная сцена (speed 15, orbit 10/5, 0.005 rad/px, ...).
//! Host может подменить resource до Startup (serde-совместимо).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Корневой конфиг арены
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArenaConfig {
    pub movement: MovementConfig,
    pub orbit: OrbitConfig,
    pub character: CharacterConfig,
    pub obstacles: ObstacleDefaults,
    pub bounds: ArenaBounds,
    pub layout: ObstacleLayout,
    /// Гравитация по Y (m/s²)
    pub gravity: f32,
    /// Частота FixedUpdate (тиков в секунду)
    pub tick_hz: f64,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            movement: MovementConfig::default(),
            orbit: OrbitConfig::default(),
            character: CharacterConfig::default(),
            obstacles: ObstacleDefaults::default(),
            bounds: ArenaBounds::default(),
            layout: ObstacleLayout::Preset,
            gravity: -9.81,
            tick_hz: 60.0,
        }
    }
}

/// Параметры locomotion
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MovementConfig {
    /// Горизонтальная скорость на одно направление (units/sec)
    pub speed: f32,
    /// Вертикальный impulse прыжка
    pub jump_impulse: f32,
    /// |vy| ниже порога → grounded
    pub grounded_threshold: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            speed: 15.0,
            jump_impulse: 5.0,
            grounded_threshold: 0.1,
        }
    }
}

/// Параметры orbit камеры
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrbitConfig {
    /// Горизонтальная дистанция камеры от персонажа
    pub radius: f32,
    /// Высота камеры над персонажем
    pub height_offset: f32,
    /// Радианы yaw на pixel горизонтального drag
    pub rotation_speed: f32,
    /// Начальная позиция камеры (ставится один раз при spawn)
    pub initial_eye: Vec3,
    /// Начальная точка look-at
    pub initial_target: Vec3,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            radius: 10.0,
            height_offset: 5.0,
            rotation_speed: 0.005,
            initial_eye: Vec3::new(0.0, 5.0, 10.0),
            initial_target: Vec3::ZERO,
        }
    }
}

/// Физическое тело персонажа
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CharacterConfig {
    pub spawn_position: Vec3,
    /// Half extents cuboid collider'а (визуал 1×2×1)
    pub half_extents: Vec3,
    pub mass: f32,
    pub friction: f32,
}

impl Default for CharacterConfig {
    fn default() -> Self {
        Self {
            spawn_position: Vec3::new(0.0, 1.0, 0.0),
            half_extents: Vec3::new(0.5, 1.0, 0.5),
            mass: 1.0,
            friction: 0.5,
        }
    }
}

/// Defaults для препятствий (перекрываются per-obstacle)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstacleDefaults {
    pub mass: f32,
    pub restitution: f32,
    pub base_color: Color,
    pub activated_color: Color,
    /// Насколько trigger volume шире самой сферы
    pub trigger_margin: f32,
}

impl Default for ObstacleDefaults {
    fn default() -> Self {
        Self {
            mass: 10.0,
            restitution: 0.7,
            base_color: Color::srgb_u8(0x96, 0x4B, 0x00),
            activated_color: Color::srgb_u8(0x6B, 0x8E, 0x23),
            trigger_margin: 0.05,
        }
    }
}

/// Границы арены: пол + 4 стены
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArenaBounds {
    /// Сторона квадратного пола
    pub ground_size: f32,
    pub wall_height: f32,
    pub wall_thickness: f32,
}

impl Default for ArenaBounds {
    fn default() -> Self {
        Self {
            ground_size: 50.0,
            wall_height: 5.0,
            wall_thickness: 1.0,
        }
    }
}

impl ArenaBounds {
    /// Половина стороны пола (стены стоят на ±half)
    pub fn half_size(&self) -> f32 {
        self.ground_size * 0.5
    }
}

/// Как расставлять препятствия
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ObstacleLayout {
    /// Пять препятствий исходной сцены
    Preset,
    /// Детерминированный scatter (DeterministicRng арены)
    Scattered {
        count: usize,
        min_radius: f32,
        max_radius: f32,
    },
    /// Без препятствий
    Empty,
}
