//! Simulation driver: абстракция physics backend'а
//!
//! Controllers (locomotion, camera, obstacles) НЕ знают про конкретный движок:
//! все чтения/записи тела идут через `PhysicsBackend`.
//!
//! Реализации:
//! - `RapierBackend`: bevy_rapier3d (игра)
//! - `HeadlessBackend`: минимальный детерминированный интегратор (тесты, headless runner)
//!
//! Инвариант: controllers не кэшируют transform тела между тиками,
//! каждый read: свежий из backend'а.

use bevy::prelude::*;

pub mod headless;
pub mod rapier;

pub use headless::{HeadlessBackend, HeadlessBackendPlugin, HeadlessContacts, PhysicsBody, PhysicsShape};
pub use rapier::{RapierBackend, RapierBackendPlugin};

/// Классификация тела (fixed ↔ dynamic)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum BodyKind {
    Fixed,
    Dynamic,
}

/// Описание тела персонажа для spawn
#[derive(Debug, Clone, Copy)]
pub struct CharacterBodyDesc {
    pub half_extents: Vec3,
    pub mass: f32,
    pub friction: f32,
}

/// Описание препятствия (сфера) для spawn
#[derive(Debug, Clone, Copy)]
pub struct ObstacleBodyDesc {
    pub radius: f32,
    pub restitution: f32,
}

/// Маркер sensor-сферы (trigger volume)
///
/// Вешается backend'ом в `trigger_volume()`, обычно на child entity тела.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct TriggerVolume {
    pub radius: f32,
}

/// Event: collider вошёл в trigger volume
///
/// Генерируется backend'ом (rapier CollisionEvent / headless overlap test).
/// Обрабатывается: obstacle controller (resolve trigger → obstacle).
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerEntered {
    /// Entity с trigger volume (sensor)
    pub trigger: Entity,
    /// Entity тела, вошедшего в volume
    pub other: Entity,
}

/// Capability interface физического движка
///
/// Все accessors возвращают `Option`/`bool`: отсутствие тела (ещё не создано
/// или уже удалено): нормальное транзиентное состояние, вызывающий
/// просто пропускает тик.
pub trait PhysicsBackend: 'static + Send + Sync {
    /// Plugin, который регистрирует step движка внутри `ArenaSet::Step`.
    fn plugin() -> impl Plugin;

    /// Неподвижный box (пол, стены)
    fn fixed_box(half_extents: Vec3) -> impl Bundle;

    /// Dynamic тело персонажа с залоченными вращениями
    fn character_body(desc: CharacterBodyDesc) -> impl Bundle;

    /// Препятствие в стартовом Fixed состоянии
    fn obstacle_body(desc: ObstacleBodyDesc) -> impl Bundle;

    /// Sensor-сфера, генерирующая `TriggerEntered`
    fn trigger_volume(radius: f32) -> impl Bundle;

    /// Мировая позиция тела
    fn translation(world: &World, entity: Entity) -> Option<Vec3>;

    /// Линейная скорость тела
    fn linear_velocity(world: &World, entity: Entity) -> Option<Vec3>;

    fn set_linear_velocity(world: &mut World, entity: Entity, velocity: Vec3) -> bool;

    fn set_angular_velocity(world: &mut World, entity: Entity, angular_velocity: Vec3) -> bool;

    /// One-shot impulse (интегрируется солвером на следующем step)
    fn apply_impulse(world: &mut World, entity: Entity, impulse: Vec3) -> bool;

    /// Текущая классификация тела
    fn body_kind(world: &World, entity: Entity) -> Option<BodyKind>;

    /// Перевести тело в Dynamic с заданной массой
    fn make_dynamic(world: &mut World, entity: Entity, mass: f32) -> bool;

    /// Масса тела (None для Fixed или отсутствующего тела)
    fn mass(world: &World, entity: Entity) -> Option<f32>;
}
