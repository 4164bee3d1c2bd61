//! Arena setup: пол, стены, layout препятствий, snapshot
//!
//! `spawn_arena` (Startup): bounds → obstacles → character → camera.
//! Scatter layout детерминирован (DeterministicRng), одинаковый seed →
//! одинаковая арена.

use bevy::prelude::*;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::camera::spawn_orbit_camera;
use crate::components::{Character, Obstacle, ObstacleState, OrbitCamera};
use crate::config::{ArenaBounds, ArenaConfig, ObstacleLayout};
use crate::locomotion::spawn_character;
use crate::logger;
use crate::obstacle::{spawn_obstacle, ObstacleSpec};
use crate::physics::PhysicsBackend;
use crate::DeterministicRng;

/// Толщина плиты пола (верх плиты на y=0)
const GROUND_HALF_THICKNESS: f32 = 0.1;

/// Минимальный зазор между препятствием и точкой spawn персонажа
const SPAWN_CLEARANCE: f32 = 2.0;

/// Высота центра препятствий (как в исходной сцене)
const OBSTACLE_HEIGHT: f32 = 1.0;

/// Marker: неподвижная геометрия арены (пол, стены)
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
#[require(Transform)]
pub struct ArenaBoundary;

/// Пол + 4 стены (стены стоят на ±half_size)
pub fn spawn_bounds<B: PhysicsBackend>(commands: &mut Commands, bounds: &ArenaBounds) -> Vec<Entity> {
    let half = bounds.half_size();
    let wall_half_height = bounds.wall_height * 0.5;
    let wall_half_thickness = bounds.wall_thickness * 0.5;

    let pieces = [
        (
            "Ground",
            Vec3::new(0.0, -GROUND_HALF_THICKNESS, 0.0),
            Vec3::new(half, GROUND_HALF_THICKNESS, half),
        ),
        (
            "NorthWall",
            Vec3::new(0.0, wall_half_height, -half),
            Vec3::new(half, wall_half_height, wall_half_thickness),
        ),
        (
            "SouthWall",
            Vec3::new(0.0, wall_half_height, half),
            Vec3::new(half, wall_half_height, wall_half_thickness),
        ),
        (
            "EastWall",
            Vec3::new(half, wall_half_height, 0.0),
            Vec3::new(wall_half_thickness, wall_half_height, half),
        ),
        (
            "WestWall",
            Vec3::new(-half, wall_half_height, 0.0),
            Vec3::new(wall_half_thickness, wall_half_height, half),
        ),
    ];

    pieces
        .into_iter()
        .map(|(name, position, half_extents)| {
            commands
                .spawn((
                    ArenaBoundary,
                    Name::new(name),
                    Transform::from_translation(position),
                    B::fixed_box(half_extents),
                ))
                .id()
        })
        .collect()
}

/// Пять препятствий исходной сцены (все interactable)
pub fn preset_obstacles() -> Vec<ObstacleSpec> {
    vec![
        ObstacleSpec::interactable(Vec3::new(-5.0, 1.0, -5.0), 0.3),
        ObstacleSpec::interactable(Vec3::new(5.0, 1.0, -2.0), 1.2),
        ObstacleSpec::interactable(Vec3::new(0.0, 1.0, -8.0), 1.6),
        ObstacleSpec::interactable(Vec3::new(8.0, 1.0, -10.0), 0.8),
        ObstacleSpec::interactable(Vec3::new(-8.0, 1.0, 5.0), 2.2),
    ]
}

/// Случайная расстановка внутри стен, вдали от spawn
///
/// Кандидаты, пересекающие уже поставленные сферы или зону spawn,
/// отбрасываются. Попыток ограниченное число: при тесной арене
/// препятствий может получиться меньше `count`.
pub fn scatter_obstacles(
    rng: &mut ChaCha8Rng,
    count: usize,
    min_radius: f32,
    max_radius: f32,
    bounds: &ArenaBounds,
    spawn_point: Vec3,
) -> Vec<ObstacleSpec> {
    let (min_radius, max_radius) = if min_radius <= max_radius {
        (min_radius, max_radius)
    } else {
        (max_radius, min_radius)
    };
    let inner = bounds.half_size() - bounds.wall_thickness * 0.5;
    let max_attempts = count * 32;

    let mut placed: Vec<ObstacleSpec> = Vec::with_capacity(count);

    for _ in 0..max_attempts {
        if placed.len() == count {
            break;
        }

        let radius = rng.gen_range(min_radius..=max_radius);
        let limit = inner - radius;
        if limit <= 0.0 {
            continue;
        }

        let x = rng.gen_range(-limit..=limit);
        let z = rng.gen_range(-limit..=limit);
        let position = Vec3::new(x, OBSTACLE_HEIGHT, z);

        let spawn_distance = Vec2::new(x - spawn_point.x, z - spawn_point.z).length();
        if spawn_distance < radius + SPAWN_CLEARANCE {
            continue;
        }

        let overlaps = placed.iter().any(|other| {
            other.position.distance(position) < other.radius + radius
        });
        if overlaps {
            continue;
        }

        placed.push(ObstacleSpec::interactable(position, radius));
    }

    placed
}

/// Startup система: вся сцена арены
pub fn spawn_arena<B: PhysicsBackend>(
    mut commands: Commands,
    config: Res<ArenaConfig>,
    mut rng: ResMut<DeterministicRng>,
) {
    spawn_bounds::<B>(&mut commands, &config.bounds);

    let obstacles = match config.layout {
        ObstacleLayout::Preset => preset_obstacles(),
        ObstacleLayout::Scattered {
            count,
            min_radius,
            max_radius,
        } => scatter_obstacles(
            &mut rng.rng,
            count,
            min_radius,
            max_radius,
            &config.bounds,
            config.character.spawn_position,
        ),
        ObstacleLayout::Empty => Vec::new(),
    };

    for spec in &obstacles {
        spawn_obstacle::<B>(&mut commands, spec, &config.obstacles);
    }

    spawn_character::<B>(&mut commands, &config.character);
    spawn_orbit_camera(&mut commands, &config.orbit);

    logger::log_info(&format!(
        "🏟️ Arena spawned: {}x{} ground, {} obstacles (layout {:?}, seed {})",
        config.bounds.ground_size,
        config.bounds.ground_size,
        obstacles.len(),
        config.layout,
        rng.seed
    ));
}

/// Состояние тела персонажа
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CharacterSnapshot {
    pub position: Vec3,
    pub velocity: Vec3,
}

/// Состояние камеры
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraSnapshot {
    pub yaw: f32,
    pub eye: Vec3,
    pub look_at: Vec3,
}

/// Состояние препятствия
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstacleSnapshot {
    pub position: Vec3,
    pub radius: f32,
    pub interactable: bool,
    pub state: ObstacleState,
}

/// Snapshot арены (диагностика, сравнение детерминизма)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArenaSnapshot {
    pub character: Option<CharacterSnapshot>,
    pub camera: Option<CameraSnapshot>,
    /// Отсортированы по Entity index
    pub obstacles: Vec<ObstacleSnapshot>,
}

impl ArenaSnapshot {
    pub fn activated_count(&self) -> usize {
        self.obstacles
            .iter()
            .filter(|obstacle| obstacle.state.is_dynamic())
            .count()
    }
}

/// Собирает snapshot: тело персонажа читается через backend
pub fn arena_snapshot<B: PhysicsBackend>(world: &mut World) -> ArenaSnapshot {
    let mut characters = world.query_filtered::<Entity, With<Character>>();
    let character = characters.single(world).ok().and_then(|entity| {
        Some(CharacterSnapshot {
            position: B::translation(world, entity)?,
            velocity: B::linear_velocity(world, entity)?,
        })
    });

    let mut cameras = world.query::<(&OrbitCamera, &Transform)>();
    let camera = cameras
        .single(world)
        .ok()
        .map(|(camera, transform)| CameraSnapshot {
            yaw: camera.yaw,
            eye: transform.translation,
            look_at: camera.look_at,
        });

    let mut obstacle_query = world.query::<(Entity, &Obstacle, &ObstacleState, &Transform)>();
    let mut obstacles: Vec<_> = obstacle_query.iter(world).collect();
    obstacles.sort_by_key(|(entity, ..)| entity.index());

    let obstacles = obstacles
        .into_iter()
        .map(|(_, obstacle, state, transform)| ObstacleSnapshot {
            position: transform.translation,
            radius: obstacle.radius,
            interactable: obstacle.interactable,
            state: *state,
        })
        .collect();

    ArenaSnapshot {
        character,
        camera,
        obstacles,
    }
}
