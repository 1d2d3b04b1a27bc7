//! Setup validation: есть ли камера, физика, персонажи
//!
//! Отсутствие зависимости - не ошибка, а деградация:
//! без камеры движение в world space и клики не кастуются,
//! без физики каждый raycast = miss.

use bevy::ecs::system::RunSystemOnce;
use bevy::prelude::*;
use bevy_rapier3d::prelude::ReadRapierContext;

use crate::character::LocomotionCharacter;
use crate::physics::RaycastBackend;
use crate::shared::{active_camera, LocomotionCamera};

/// Результат проверки зависимостей (обновляется каждый tick)
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
#[reflect(Resource)]
pub struct SetupReport {
    pub camera_available: bool,
    pub physics_available: bool,
    pub character_count: usize,
}

impl SetupReport {
    pub fn is_valid(&self) -> bool {
        self.camera_available && self.physics_available && self.character_count > 0
    }
}

fn collect_report(
    cameras: &Query<(&LocomotionCamera, &Transform)>,
    characters: &Query<(), With<LocomotionCharacter>>,
    backend: Option<&RaycastBackend>,
    rapier: &ReadRapierContext,
) -> SetupReport {
    SetupReport {
        camera_available: active_camera(cameras.iter()).is_some(),
        physics_available: backend.is_some_and(|backend| backend.is_available(rapier)),
        character_count: characters.iter().count(),
    }
}

fn report_changes(previous: &SetupReport, current: &SetupReport) {
    if previous.camera_available != current.camera_available {
        if current.camera_available {
            crate::log_info("📷 Locomotion camera available: camera-relative movement");
        } else {
            crate::log_warning("📷 No active LocomotionCamera: world-space movement, clicks disabled");
        }
    }

    if previous.physics_available != current.physics_available {
        if current.physics_available {
            crate::log_info("🧱 Physics query available");
        } else {
            crate::log_warning("🧱 Physics query unavailable: raycasts miss, characters airborne");
        }
    }

    if previous.character_count != current.character_count {
        crate::log(&format!(
            "👤 Locomotion characters: {} → {}",
            previous.character_count, current.character_count
        ));
    }
}

/// Система: refresh SetupReport (Sense set, первой)
///
/// Лог только на изменениях. Стартовое состояние "всё есть", поэтому
/// отсутствующая с первого tick зависимость тоже даёт warning.
pub fn refresh_setup_report(
    mut report: ResMut<SetupReport>,
    mut initialized: Local<bool>,
    cameras: Query<(&LocomotionCamera, &Transform)>,
    characters: Query<(), With<LocomotionCharacter>>,
    backend: Option<Res<RaycastBackend>>,
    rapier: ReadRapierContext,
) {
    let current = collect_report(&cameras, &characters, backend.as_deref(), &rapier);

    let previous = if *initialized {
        *report
    } else {
        *initialized = true;
        SetupReport {
            camera_available: true,
            physics_available: true,
            character_count: 0,
        }
    };

    report_changes(&previous, &current);

    if *report != current {
        *report = current;
    }
}

fn compute_setup_report(
    cameras: Query<(&LocomotionCamera, &Transform)>,
    characters: Query<(), With<LocomotionCharacter>>,
    backend: Option<Res<RaycastBackend>>,
    rapier: ReadRapierContext,
) -> SetupReport {
    collect_report(&cameras, &characters, backend.as_deref(), &rapier)
}

/// Проверка по запросу (вне schedule): тот же отчёт без логов
pub fn validate_setup(world: &mut World) -> SetupReport {
    match world.run_system_once(compute_setup_report) {
        Ok(report) => report,
        Err(err) => {
            crate::log_error(&format!("validate_setup failed: {}", err));
            SetupReport::default()
        }
    }
}
