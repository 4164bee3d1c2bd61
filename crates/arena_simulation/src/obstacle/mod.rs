//! Obstacle controller: one-way Fixed → Dynamic
//!
//! Pipeline (ArenaSet::Obstacles, после physics step):
//! 1. `collect_obstacle_interactions`: TriggerEntered (персонаж в sensor'е)
//!    + ObstacleSelected → PendingInteractions
//! 2. `activate_obstacles` (exclusive): state check + make_dynamic + tint
//!    + ObstacleActivated, атомарно внутри одного тика
//!
//! Trigger и selection в одном тике → активация один раз (второй запрос
//! видит уже Dynamic и ничего не делает).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::components::{Character, Obstacle, ObstacleState, ObstacleTint, ObstacleTrigger};
use crate::config::ObstacleDefaults;
use crate::logger;
use crate::physics::{ObstacleBodyDesc, PhysicsBackend, TriggerEntered};

pub mod events;

pub use events::*;

/// Описание препятствия для spawn (layout арены)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstacleSpec {
    pub position: Vec3,
    pub radius: f32,
    pub interactable: bool,
}

impl ObstacleSpec {
    pub fn interactable(position: Vec3, radius: f32) -> Self {
        Self {
            position,
            radius,
            interactable: true,
        }
    }
}

/// Очередь запросов активации текущего тика
#[derive(Resource, Debug, Default)]
pub struct PendingInteractions {
    pub requests: Vec<(Entity, InteractionCause)>,
}

/// Spawn helper: сфера в Fixed состоянии (+ trigger child если interactable)
pub fn spawn_obstacle<B: PhysicsBackend>(
    commands: &mut Commands,
    spec: &ObstacleSpec,
    defaults: &ObstacleDefaults,
) -> Entity {
    let obstacle = commands
        .spawn((
            Obstacle {
                radius: spec.radius,
                mass: defaults.mass,
                restitution: defaults.restitution,
                interactable: spec.interactable,
                base_color: defaults.base_color,
                activated_color: defaults.activated_color,
            },
            ObstacleState::Fixed,
            ObstacleTint(defaults.base_color),
            Name::new("Obstacle"),
            Transform::from_translation(spec.position),
            B::obstacle_body(ObstacleBodyDesc {
                radius: spec.radius,
                restitution: defaults.restitution,
            }),
        ))
        .id();

    // Non-interactable: trigger volume не нужен
    if spec.interactable {
        commands.spawn((
            B::trigger_volume(spec.radius + defaults.trigger_margin),
            ObstacleTrigger { obstacle },
            ChildOf(obstacle),
        ));
    }

    obstacle
}

/// Система: trigger/selection events → PendingInteractions
///
/// В trigger учитывается только тело персонажа.
pub fn collect_obstacle_interactions(
    mut triggers: EventReader<TriggerEntered>,
    mut selections: EventReader<ObstacleSelected>,
    trigger_owners: Query<&ObstacleTrigger>,
    characters: Query<(), With<Character>>,
    mut pending: ResMut<PendingInteractions>,
) {
    for event in triggers.read() {
        if !characters.contains(event.other) {
            continue;
        }
        let Ok(owner) = trigger_owners.get(event.trigger) else {
            continue;
        };
        pending
            .requests
            .push((owner.obstacle, InteractionCause::Proximity));
    }

    for event in selections.read() {
        pending
            .requests
            .push((event.obstacle, InteractionCause::Selected));
    }
}

/// Exclusive система: Fixed → Dynamic для накопленных запросов
///
/// Guard'ы: неизвестная entity, non-interactable, уже Dynamic → no-op.
pub fn activate_obstacles<B: PhysicsBackend>(world: &mut World) {
    let Some(mut pending) = world.get_resource_mut::<PendingInteractions>() else {
        return;
    };
    let requests = std::mem::take(&mut pending.requests);

    for (entity, cause) in requests {
        let Some(obstacle) = world.get::<Obstacle>(entity).copied() else {
            continue;
        };
        if !obstacle.interactable {
            continue;
        }
        if world
            .get::<ObstacleState>(entity)
            .is_none_or(|state| state.is_dynamic())
        {
            continue;
        }

        if !B::make_dynamic(world, entity, obstacle.mass) {
            logger::log_warning(&format!(
                "Obstacle {:?}: physics body missing, activation skipped",
                entity
            ));
            continue;
        }

        if let Ok(mut entity_mut) = world.get_entity_mut(entity) {
            entity_mut.insert((ObstacleState::Dynamic, ObstacleTint(obstacle.activated_color)));
        }

        world.send_event(ObstacleActivated {
            obstacle: entity,
            cause,
        });

        logger::log_info(&format!(
            "🪨 Obstacle {:?} activated ({:?}), mass {}",
            entity, cause, obstacle.mass
        ));
    }
}
