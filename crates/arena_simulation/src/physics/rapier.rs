//! Rapier3D physics backend
//!
//! Архитектура:
//! - RapierPhysicsPlugin с `with_default_system_setup(false)`
//! - SyncBackend → StepSimulation → Writeback регистрируются в FixedUpdate
//!   внутри `ArenaSet::Step` (один step на тик, после locomotion)
//! - CollisionEvent (sensor) → `TriggerEntered`
//!
//! Gravity и timestep берутся из ArenaConfig при Startup.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use bevy_rapier3d::rapier::geometry::CollisionEventFlags;

use super::{
    BodyKind, CharacterBodyDesc, ObstacleBodyDesc, PhysicsBackend, TriggerEntered, TriggerVolume,
};
use crate::config::ArenaConfig;
use crate::ArenaSet;

/// Rapier3D backend
pub struct RapierBackend;

impl PhysicsBackend for RapierBackend {
    fn plugin() -> impl Plugin {
        RapierBackendPlugin
    }

    fn fixed_box(half_extents: Vec3) -> impl Bundle {
        (
            RigidBody::Fixed,
            Collider::cuboid(half_extents.x, half_extents.y, half_extents.z),
        )
    }

    fn character_body(desc: CharacterBodyDesc) -> impl Bundle {
        (
            RigidBody::Dynamic,
            Collider::cuboid(desc.half_extents.x, desc.half_extents.y, desc.half_extents.z),
            ColliderMassProperties::Mass(desc.mass),
            Friction::coefficient(desc.friction),
            LockedAxes::ROTATION_LOCKED,
            Velocity::default(),
            ExternalImpulse::default(),
        )
    }

    fn obstacle_body(desc: ObstacleBodyDesc) -> impl Bundle {
        (
            RigidBody::Fixed,
            Collider::ball(desc.radius),
            Restitution::coefficient(desc.restitution),
            Velocity::default(),
            ExternalImpulse::default(),
        )
    }

    fn trigger_volume(radius: f32) -> impl Bundle {
        (
            Transform::default(),
            Collider::ball(radius),
            Sensor,
            ActiveEvents::COLLISION_EVENTS,
            TriggerVolume { radius },
        )
    }

    fn translation(world: &World, entity: Entity) -> Option<Vec3> {
        world.get::<RigidBody>(entity)?;
        world.get::<Transform>(entity).map(|t| t.translation)
    }

    fn linear_velocity(world: &World, entity: Entity) -> Option<Vec3> {
        world.get::<Velocity>(entity).map(|v| v.linvel)
    }

    fn set_linear_velocity(world: &mut World, entity: Entity, velocity: Vec3) -> bool {
        let Some(mut vel) = world.get_mut::<Velocity>(entity) else {
            return false;
        };
        vel.linvel = velocity;
        true
    }

    fn set_angular_velocity(world: &mut World, entity: Entity, angular_velocity: Vec3) -> bool {
        let Some(mut vel) = world.get_mut::<Velocity>(entity) else {
            return false;
        };
        vel.angvel = angular_velocity;
        true
    }

    fn apply_impulse(world: &mut World, entity: Entity, impulse: Vec3) -> bool {
        let Some(mut ext_impulse) = world.get_mut::<ExternalImpulse>(entity) else {
            return false;
        };
        ext_impulse.impulse += impulse;
        true
    }

    fn body_kind(world: &World, entity: Entity) -> Option<BodyKind> {
        world.get::<RigidBody>(entity).map(|body| match body {
            RigidBody::Dynamic => BodyKind::Dynamic,
            _ => BodyKind::Fixed,
        })
    }

    fn make_dynamic(world: &mut World, entity: Entity, mass: f32) -> bool {
        let Ok(mut entity_mut) = world.get_entity_mut(entity) else {
            return false;
        };
        entity_mut.insert((RigidBody::Dynamic, ColliderMassProperties::Mass(mass)));
        true
    }

    fn mass(world: &World, entity: Entity) -> Option<f32> {
        if Self::body_kind(world, entity)? != BodyKind::Dynamic {
            return None;
        }
        match world.get::<ColliderMassProperties>(entity)? {
            ColliderMassProperties::Mass(mass) => Some(*mass),
            _ => None,
        }
    }
}

/// Регистрирует Rapier step в `ArenaSet::Step`
pub struct RapierBackendPlugin;

impl Plugin for RapierBackendPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(RapierPhysicsPlugin::<NoUserData>::default().with_default_system_setup(false))
            .add_event::<TriggerEntered>();

        app.configure_sets(
            FixedUpdate,
            (
                PhysicsSet::SyncBackend,
                PhysicsSet::StepSimulation,
                PhysicsSet::Writeback,
            )
                .chain()
                .in_set(ArenaSet::Step),
        );

        app.add_systems(
            FixedUpdate,
            (
                RapierPhysicsPlugin::<NoUserData>::get_systems(PhysicsSet::SyncBackend)
                    .in_set(PhysicsSet::SyncBackend),
                RapierPhysicsPlugin::<NoUserData>::get_systems(PhysicsSet::StepSimulation)
                    .in_set(PhysicsSet::StepSimulation),
                RapierPhysicsPlugin::<NoUserData>::get_systems(PhysicsSet::Writeback)
                    .in_set(PhysicsSet::Writeback),
                forward_sensor_events
                    .after(PhysicsSet::Writeback)
                    .in_set(ArenaSet::Step),
            ),
        );

        app.add_systems(Startup, configure_rapier);
    }
}

/// Система: gravity + fixed timestep из ArenaConfig
///
/// Timestep фиксированный: один step на тик FixedUpdate независимо от `Time`.
pub fn configure_rapier(
    mut commands: Commands,
    config: Option<Res<ArenaConfig>>,
    mut contexts: Query<&mut RapierConfiguration>,
) {
    let config = config.map(|c| c.clone()).unwrap_or_default();

    commands.insert_resource(TimestepMode::Fixed {
        dt: (1.0 / config.tick_hz) as f32,
        substeps: 1,
    });

    for mut rapier_config in contexts.iter_mut() {
        rapier_config.gravity = Vec3::new(0.0, config.gravity, 0.0);
    }
}

/// Система: Rapier sensor CollisionEvent::Started → TriggerEntered
pub fn forward_sensor_events(
    mut collision_events: EventReader<CollisionEvent>,
    triggers: Query<(), With<TriggerVolume>>,
    mut trigger_events: EventWriter<TriggerEntered>,
) {
    for event in collision_events.read() {
        let &CollisionEvent::Started(a, b, flags) = event else {
            continue;
        };

        if !flags.contains(CollisionEventFlags::SENSOR) {
            continue;
        }

        if triggers.contains(a) {
            trigger_events.write(TriggerEntered { trigger: a, other: b });
        } else if triggers.contains(b) {
            trigger_events.write(TriggerEntered { trigger: b, other: a });
        }
    }
}
