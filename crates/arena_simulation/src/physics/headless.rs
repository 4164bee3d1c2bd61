//! Headless physics backend (без Rapier)
//!
//! Минимальный детерминированный интегратор для тестов и headless runner:
//! - gravity + impulse → velocity → Transform (explicit Euler, fixed timestep)
//! - push-out dynamic тел из Fixed коллайдеров по AABB (пол, стены, Fixed сферы)
//! - sphere-vs-AABB overlap для trigger volumes → `TriggerEntered` на входе
//!
//! Упрощения: dynamic ↔ dynamic контакты не разрешаются, трения нет.

use std::collections::HashSet;

use bevy::prelude::*;

use super::{
    BodyKind, CharacterBodyDesc, ObstacleBodyDesc, PhysicsBackend, TriggerEntered, TriggerVolume,
};
use crate::config::ArenaConfig;
use crate::ArenaSet;

/// Скорость отскока ниже порога гасится (иначе бесконечное дрожание)
const REST_SPEED: f32 = 0.5;

/// Тело headless симуляции
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct PhysicsBody {
    pub kind: BodyKind,
    pub velocity: Vec3,
    pub angular_velocity: Vec3,
    pub mass: f32,
    pub restitution: f32,
    /// Impulse, накопленный с прошлого step (сбрасывается при интеграции)
    pub pending_impulse: Vec3,
    pub lock_rotations: bool,
}

impl Default for PhysicsBody {
    fn default() -> Self {
        Self {
            kind: BodyKind::Fixed,
            velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            mass: 1.0,
            restitution: 0.0,
            pending_impulse: Vec3::ZERO,
            lock_rotations: false,
        }
    }
}

impl PhysicsBody {
    pub fn fixed() -> Self {
        Self::default()
    }

    pub fn dynamic(mass: f32) -> Self {
        Self {
            kind: BodyKind::Dynamic,
            mass,
            ..default()
        }
    }

    pub fn is_dynamic(&self) -> bool {
        self.kind == BodyKind::Dynamic
    }
}

/// Форма коллайдера headless тела
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub enum PhysicsShape {
    Cuboid { half_extents: Vec3 },
    Ball { radius: f32 },
}

impl PhysicsShape {
    /// Half extents axis-aligned bounding box
    pub fn aabb_half_extents(&self) -> Vec3 {
        match *self {
            PhysicsShape::Cuboid { half_extents } => half_extents,
            PhysicsShape::Ball { radius } => Vec3::splat(radius),
        }
    }
}

/// Гравитация headless мира
#[derive(Resource, Debug, Clone, Copy)]
pub struct HeadlessGravity(pub Vec3);

impl Default for HeadlessGravity {
    fn default() -> Self {
        Self(Vec3::new(0.0, -9.81, 0.0))
    }
}

/// Активные пересечения (trigger, body): для edge-detection входа
#[derive(Resource, Debug, Default)]
pub struct HeadlessContacts {
    pub active: HashSet<(Entity, Entity)>,
}

/// Headless backend
pub struct HeadlessBackend;

impl PhysicsBackend for HeadlessBackend {
    fn plugin() -> impl Plugin {
        HeadlessBackendPlugin
    }

    fn fixed_box(half_extents: Vec3) -> impl Bundle {
        (PhysicsBody::fixed(), PhysicsShape::Cuboid { half_extents })
    }

    fn character_body(desc: CharacterBodyDesc) -> impl Bundle {
        (
            PhysicsBody {
                lock_rotations: true,
                ..PhysicsBody::dynamic(desc.mass)
            },
            PhysicsShape::Cuboid {
                half_extents: desc.half_extents,
            },
        )
    }

    fn obstacle_body(desc: ObstacleBodyDesc) -> impl Bundle {
        (
            PhysicsBody {
                restitution: desc.restitution,
                ..PhysicsBody::fixed()
            },
            PhysicsShape::Ball {
                radius: desc.radius,
            },
        )
    }

    fn trigger_volume(radius: f32) -> impl Bundle {
        (Transform::default(), TriggerVolume { radius })
    }

    fn translation(world: &World, entity: Entity) -> Option<Vec3> {
        world.get::<PhysicsBody>(entity)?;
        world.get::<Transform>(entity).map(|t| t.translation)
    }

    fn linear_velocity(world: &World, entity: Entity) -> Option<Vec3> {
        world.get::<PhysicsBody>(entity).map(|b| b.velocity)
    }

    fn set_linear_velocity(world: &mut World, entity: Entity, velocity: Vec3) -> bool {
        let Some(mut body) = world.get_mut::<PhysicsBody>(entity) else {
            return false;
        };
        body.velocity = velocity;
        true
    }

    fn set_angular_velocity(world: &mut World, entity: Entity, angular_velocity: Vec3) -> bool {
        let Some(mut body) = world.get_mut::<PhysicsBody>(entity) else {
            return false;
        };
        body.angular_velocity = angular_velocity;
        true
    }

    fn apply_impulse(world: &mut World, entity: Entity, impulse: Vec3) -> bool {
        let Some(mut body) = world.get_mut::<PhysicsBody>(entity) else {
            return false;
        };
        body.pending_impulse += impulse;
        true
    }

    fn body_kind(world: &World, entity: Entity) -> Option<BodyKind> {
        world.get::<PhysicsBody>(entity).map(|b| b.kind)
    }

    fn make_dynamic(world: &mut World, entity: Entity, mass: f32) -> bool {
        let Some(mut body) = world.get_mut::<PhysicsBody>(entity) else {
            return false;
        };
        body.kind = BodyKind::Dynamic;
        body.mass = mass;
        true
    }

    fn mass(world: &World, entity: Entity) -> Option<f32> {
        world
            .get::<PhysicsBody>(entity)
            .filter(|b| b.is_dynamic())
            .map(|b| b.mass)
    }
}

/// Регистрирует headless step в `ArenaSet::Step`
pub struct HeadlessBackendPlugin;

impl Plugin for HeadlessBackendPlugin {
    fn build(&self, app: &mut App) {
        // Gravity из ArenaConfig, если он уже вставлен (иначе дефолт)
        let gravity = app
            .world()
            .get_resource::<ArenaConfig>()
            .map(|config| HeadlessGravity(Vec3::new(0.0, config.gravity, 0.0)))
            .unwrap_or_default();

        app.insert_resource(gravity)
            .init_resource::<HeadlessContacts>()
            .add_event::<TriggerEntered>()
            .register_type::<PhysicsBody>()
            .register_type::<PhysicsShape>();

        app.add_systems(
            FixedUpdate,
            (integrate_bodies, resolve_fixed_contacts, detect_trigger_entries)
                .chain()
                .in_set(ArenaSet::Step),
        );
    }
}

/// Система: impulse + gravity → velocity → Transform
///
/// dt = timestep `Time<Fixed>` (не delta): step детерминирован и при ручном
/// запуске FixedUpdate из тестов.
pub fn integrate_bodies(
    mut query: Query<(&mut PhysicsBody, &mut Transform)>,
    gravity: Res<HeadlessGravity>,
    time: Res<Time<Fixed>>,
) {
    let dt = time.timestep().as_secs_f32();

    for (mut body, mut transform) in query.iter_mut() {
        if !body.is_dynamic() {
            continue;
        }

        let impulse = std::mem::take(&mut body.pending_impulse);
        let mass = body.mass;
        if mass > 0.0 {
            body.velocity += impulse / mass;
        }
        body.velocity += gravity.0 * dt;

        transform.translation += body.velocity * dt;

        if !body.lock_rotations && body.angular_velocity != Vec3::ZERO {
            transform.rotate(Quat::from_scaled_axis(body.angular_velocity * dt));
        }
    }
}

/// Система: выталкивание dynamic тел из Fixed коллайдеров
///
/// AABB push-out вдоль оси минимального проникновения, нормальная
/// компонента скорости отражается с restitution тела.
pub fn resolve_fixed_contacts(mut query: Query<(&mut PhysicsBody, &mut Transform, &PhysicsShape)>) {
    let fixed: Vec<(Vec3, Vec3)> = query
        .iter()
        .filter(|(body, _, _)| !body.is_dynamic())
        .map(|(_, transform, shape)| (transform.translation, shape.aabb_half_extents()))
        .collect();

    for (mut body, mut transform, shape) in query.iter_mut() {
        if !body.is_dynamic() {
            continue;
        }

        let half = shape.aabb_half_extents();

        for &(center, fixed_half) in &fixed {
            let delta = transform.translation - center;
            let overlap = (half + fixed_half) - delta.abs();
            if overlap.min_element() <= 0.0 {
                continue;
            }

            let axis = if overlap.x <= overlap.y && overlap.x <= overlap.z {
                0
            } else if overlap.y <= overlap.z {
                1
            } else {
                2
            };
            let sign = if delta[axis] >= 0.0 { 1.0 } else { -1.0 };

            transform.translation[axis] += overlap[axis] * sign;

            // Скорость направлена в поверхность → отражаем
            if body.velocity[axis] * sign < 0.0 {
                let bounced = -body.velocity[axis] * body.restitution;
                body.velocity[axis] = if bounced.abs() < REST_SPEED { 0.0 } else { bounced };
            }
        }
    }
}

/// Система: sphere-vs-AABB overlap trigger volumes с dynamic телами
///
/// `TriggerEntered` только на переходе "не пересекались → пересекаются".
pub fn detect_trigger_entries(
    triggers: Query<(Entity, &TriggerVolume, &Transform, Option<&ChildOf>)>,
    parents: Query<&Transform, Without<TriggerVolume>>,
    bodies: Query<(Entity, &PhysicsBody, &PhysicsShape, &Transform), Without<TriggerVolume>>,
    mut contacts: ResMut<HeadlessContacts>,
    mut events: EventWriter<TriggerEntered>,
) {
    let mut current = HashSet::new();

    for (trigger, volume, local, child_of) in triggers.iter() {
        let owner = child_of.map(|c| c.parent());
        let center = match owner.and_then(|parent| parents.get(parent).ok()) {
            Some(parent_transform) => parent_transform.translation + local.translation,
            None => local.translation,
        };

        for (entity, body, shape, transform) in bodies.iter() {
            if !body.is_dynamic() || Some(entity) == owner {
                continue;
            }

            let half = shape.aabb_half_extents();
            let closest = center.clamp(transform.translation - half, transform.translation + half);
            if closest.distance_squared(center) <= volume.radius * volume.radius {
                current.insert((trigger, entity));
            }
        }
    }

    // Порядок событий не должен зависеть от hasher'а
    let mut entered: Vec<(Entity, Entity)> = current
        .iter()
        .filter(|pair| !contacts.active.contains(*pair))
        .copied()
        .collect();
    entered.sort();

    for (trigger, other) in entered {
        events.write(TriggerEntered { trigger, other });
    }

    contacts.active = current;
}
