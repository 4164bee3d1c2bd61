//! Orbit Arena Simulation Core
//!
//! ECS-симуляция на Bevy 0.16: персонаж на арене, orbit камера, препятствия
//! Fixed → Dynamic.
//!
//! Тик (FixedUpdate, порядок через `ArenaSet`):
//! ```text
//! Input → Locomotion → Step → Camera → Obstacles
//! ```
//! - Input: drain HostInputEvent → FrameInput, drag → yaw камеры
//! - Locomotion: FrameInput + yaw → velocity/impulse тела
//! - Step: physics backend (Rapier или headless)
//! - Camera: поза камеры от свежей позиции тела, yaw модели
//! - Obstacles: trigger/selection → Fixed → Dynamic
//!
//! Рендер, свет, материалы: на стороне host'а (читает Transform'ы).

use std::marker::PhantomData;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod arena;
pub mod camera;
pub mod components;
pub mod config;
pub mod input;
pub mod locomotion;
pub mod logger;
pub mod obstacle;
pub mod physics;

// Re-exports для удобства host'а и тестов
pub use arena::{arena_snapshot, spawn_arena, ArenaSnapshot};
pub use components::*;
pub use config::{ArenaConfig, ObstacleLayout};
pub use input::{FrameInput, HostInputEvent, HostInputPlugin, OrbitDrag};
pub use logger::{init_logger, log, log_error, log_info, log_warning, LogLevel, LogPrinter};
pub use obstacle::{InteractionCause, ObstacleActivated, ObstacleSelected, ObstacleSpec};
pub use physics::{HeadlessBackend, PhysicsBackend, RapierBackend, TriggerEntered};

/// Фазы тика арены (FixedUpdate, строго по порядку)
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArenaSet {
    /// Drain host input → FrameInput, drag → yaw
    Input,
    /// Velocity/impulse команда тела
    Locomotion,
    /// Physics step backend'а
    Step,
    /// Поза камеры, yaw модели
    Camera,
    /// Fixed → Dynamic переходы
    Obstacles,
}

/// Главный plugin симуляции (объединяет все подсистемы)
///
/// `B`: physics backend (`RapierBackend` в игре, `HeadlessBackend` в тестах).
/// ArenaConfig читается при build: host вставляет свой до add_plugins.
pub struct ArenaSimulationPlugin<B: PhysicsBackend> {
    /// Спавнить сцену арены на Startup (тесты часто собирают сцену сами)
    pub spawn_scene: bool,
    _backend: PhantomData<fn() -> B>,
}

impl<B: PhysicsBackend> Default for ArenaSimulationPlugin<B> {
    fn default() -> Self {
        Self {
            spawn_scene: true,
            _backend: PhantomData,
        }
    }
}

impl<B: PhysicsBackend> ArenaSimulationPlugin<B> {
    /// Только системы, без Startup сцены
    pub fn without_scene() -> Self {
        Self {
            spawn_scene: false,
            _backend: PhantomData,
        }
    }
}

impl<B: PhysicsBackend> Plugin for ArenaSimulationPlugin<B> {
    fn build(&self, app: &mut App) {
        app.init_resource::<ArenaConfig>();
        let tick_hz = app.world().resource::<ArenaConfig>().tick_hz;

        // Детерминистичный RNG (seed по умолчанию, если host не вставил свой)
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(42));
        }

        app
            // Fixed timestep для simulation tick
            .insert_resource(Time::<Fixed>::from_hz(tick_hz))
            // Input
            .add_event::<HostInputEvent>()
            .add_event::<OrbitDrag>()
            .init_resource::<input::KeySet>()
            .init_resource::<input::DragState>()
            .init_resource::<FrameInput>()
            // Character / obstacles
            .add_event::<CharacterSpawned>()
            .add_event::<ObstacleSelected>()
            .add_event::<ObstacleActivated>()
            .add_event::<TriggerEntered>()
            .init_resource::<obstacle::PendingInteractions>()
            .register_type::<Character>()
            .register_type::<CharacterModel>()
            .register_type::<OrbitCamera>()
            .register_type::<Obstacle>()
            .register_type::<ObstacleState>()
            .register_type::<ObstacleTint>()
            .register_type::<ObstacleTrigger>()
            .register_type::<arena::ArenaBoundary>()
            // Physics backend (после ArenaConfig: читает gravity)
            .add_plugins(B::plugin());

        app.configure_sets(
            FixedUpdate,
            (
                ArenaSet::Input,
                ArenaSet::Locomotion,
                ArenaSet::Step,
                ArenaSet::Camera,
                ArenaSet::Obstacles,
            )
                .chain(),
        );

        app.add_systems(
            FixedUpdate,
            (
                (input::sample_input, camera::apply_orbit_drag)
                    .chain()
                    .in_set(ArenaSet::Input),
                locomotion::drive_character::<B>.in_set(ArenaSet::Locomotion),
                (camera::follow_character::<B>, locomotion::sync_model_yaw)
                    .chain()
                    .in_set(ArenaSet::Camera),
                (
                    obstacle::collect_obstacle_interactions,
                    obstacle::activate_obstacles::<B>,
                )
                    .chain()
                    .in_set(ArenaSet::Obstacles),
            ),
        );

        if self.spawn_scene {
            app.add_systems(Startup, arena::spawn_arena::<B>);
        }
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// Plugin арены host добавляет сам (выбор backend'а и конфига).
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(60.0)); // 60Hz FixedUpdate

    app
}

/// Ручной шаг времени: каждый `app.update()` = ровно один тик FixedUpdate
///
/// Полный кадр (First → FixedMain → Last): очереди событий свапаются,
/// как в обычном App. Первый `update()` (Startup) тика не делает.
pub fn use_manual_ticks(app: &mut App) {
    let timestep = app.world().resource::<Time<Fixed>>().timestep();
    app.insert_resource(TimeUpdateStrategy::ManualDuration(timestep));
}
