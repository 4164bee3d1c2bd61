//! Headless симуляция арены
//!
//! Запускает Bevy App без рендера со scripted input: бег вперёд, orbit drag,
//! strafe, прыжок. Каждую секунду логирует snapshot.

use arena_simulation::{
    arena_snapshot, create_headless_app, log_info, use_manual_ticks, ArenaSimulationPlugin,
    HeadlessBackend, HostInputEvent,
};
use bevy::prelude::*;

const TICK_COUNT: u32 = 600;

/// Scripted input: события, которые host отправил бы к этому тику
fn scripted_input(tick: u32) -> Vec<HostInputEvent> {
    match tick {
        0 => vec![HostInputEvent::key_down("w")],
        120 => vec![HostInputEvent::PointerDown {
            position: Vec2::new(400.0, 300.0),
        }],
        121..=180 => vec![HostInputEvent::PointerMove {
            position: Vec2::new(400.0 - (tick - 120) as f32 * 5.0, 300.0),
        }],
        181 => vec![HostInputEvent::PointerUp],
        240 => vec![HostInputEvent::key_up("w"), HostInputEvent::key_down("d")],
        300 => vec![HostInputEvent::key_down(" ")],
        301 => vec![HostInputEvent::key_up(" ")],
        420 => vec![HostInputEvent::key_up("d"), HostInputEvent::key_down("ArrowDown")],
        540 => vec![HostInputEvent::key_up("ArrowDown")],
        _ => Vec::new(),
    }
}

fn main() {
    let seed = 42;
    println!("Starting Orbit Arena headless simulation (seed: {})", seed);

    let mut app = create_headless_app(seed);
    app.add_plugins(ArenaSimulationPlugin::<HeadlessBackend>::default());

    // Startup: сцена арены, дальше один update = один тик
    app.finish();
    app.cleanup();
    app.update();
    use_manual_ticks(&mut app);

    for tick in 0..TICK_COUNT {
        for event in scripted_input(tick) {
            app.world_mut().send_event(event);
        }

        app.update();

        if tick % 60 == 0 {
            let snapshot = arena_snapshot::<HeadlessBackend>(app.world_mut());
            let position = snapshot.character.map(|c| c.position).unwrap_or_default();
            let yaw = snapshot.camera.map(|c| c.yaw).unwrap_or_default();
            log_info(&format!(
                "Tick {}: character {:.2?}, yaw {:.3}, activated {}/{}",
                tick,
                position,
                yaw,
                snapshot.activated_count(),
                snapshot.obstacles.len()
            ));
        }
    }

    println!("Simulation complete!");
}
