//! Headless демо locomotion core
//!
//! Скриптованный прогон: ходьба, click-to-move, спринт, двойной прыжок.
//! Опционально: путь к RON конфигу первым аргументом.

use bevy::prelude::*;
use locomotion_core::{
    create_headless_app, init_logger, log_error, log_info, spawn_character, step_fixed, validate_setup,
    DebugSnapshot, InputSnapshot, LocomotionCamera, LocomotionConfig, ModeEvent, Player,
};

fn load_config() -> Option<LocomotionConfig> {
    let Some(path) = std::env::args().nth(1) else {
        return Some(LocomotionConfig::default());
    };

    let source = match std::fs::read_to_string(&path) {
        Ok(source) => source,
        Err(err) => {
            log_error(&format!("Cannot read config {}: {}", path, err));
            return None;
        }
    };

    match LocomotionConfig::from_ron_str(&source) {
        Ok(config) => Some(config),
        Err(err) => {
            log_error(&format!("Invalid config {}: {}", path, err));
            None
        }
    }
}

/// Что делает "игрок" на данном tick
fn drive_input(snapshot: &mut InputSnapshot, tick: u32, viewport: Vec2) {
    match tick {
        // Секунда вперёд
        0 => snapshot.set_direct_axis(Vec2::Y),
        60 => snapshot.set_direct_axis(Vec2::ZERO),
        // Click в центр экрана: камера смотрит в начало координат
        90 => snapshot.press_pointer(viewport * 0.5),
        91 => snapshot.release_pointer(viewport * 0.5),
        // Спринт вправо
        240 => {
            snapshot.push_mode(ModeEvent::SprintStart);
            snapshot.set_direct_axis(Vec2::X);
        }
        300 => {
            snapshot.push_mode(ModeEvent::SprintEnd);
            snapshot.set_direct_axis(Vec2::ZERO);
        }
        // Двойной прыжок
        330 | 345 => snapshot.press_jump(),
        _ => {}
    }
}

fn main() {
    init_logger();

    let Some(config) = load_config() else {
        std::process::exit(1);
    };

    let mut app = create_headless_app();
    let camera = LocomotionCamera::default();
    app.world_mut().spawn((
        camera,
        Transform::from_xyz(0.0, 10.0, 10.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    let character = spawn_character(&mut app, Vec3::ZERO, &config);
    app.world_mut().entity_mut(character).insert(Player);

    let report = validate_setup(app.world_mut());
    log_info(&format!("Starting locomotion demo (setup valid: {})", report.is_valid()));

    for tick in 0..420 {
        drive_input(&mut app.world_mut().resource_mut::<InputSnapshot>(), tick, camera.viewport_size);
        step_fixed(&mut app);

        if tick % 30 == 0 {
            if let Some(snapshot) = DebugSnapshot::capture(app.world(), character) {
                log_info(&format!(
                    "Tick {}: {} speed={:.2} pos=({:.2}, {:.2}, {:.2}) nav={:?}",
                    tick,
                    snapshot.state.name(),
                    snapshot.movement_speed,
                    snapshot.position[0],
                    snapshot.position[1],
                    snapshot.position[2],
                    snapshot.navigation_phase,
                ));
            }
        }
    }

    match DebugSnapshot::capture(app.world(), character).map(|snapshot| snapshot.to_ron()) {
        Some(Ok(text)) => log_info(&format!("Final snapshot:\n{}", text)),
        Some(Err(err)) => log_error(&format!("Snapshot serialization failed: {}", err)),
        None => log_error("Character disappeared"),
    }

    log_info("Simulation complete!");
}
