//! ECS компоненты арены
//!
//! Организация по доменам:
//! - character: Character marker, CharacterModel (cosmetic yaw), CharacterSpawned
//! - camera: OrbitCamera (yaw, radius, height offset, look-at)
//! - obstacle: Obstacle, ObstacleState (Fixed → Dynamic), ObstacleTint, ObstacleTrigger

pub mod camera;
pub mod character;
pub mod obstacle;

// Re-exports для удобного импорта
pub use camera::*;
pub use character::*;
pub use obstacle::*;
