//! Jump events

use bevy::prelude::*;

/// Event: намерение прыгнуть (jump intent)
///
/// Генерируется:
/// - input stage (jump just_pressed в InputSnapshot)
/// - любой внешний код (scripted sequences, тесты)
///
/// Обрабатывается: perform_requested_jumps (если JumpState разрешает)
#[derive(Event, Debug, Clone, Copy)]
pub struct JumpIntent {
    pub entity: Entity,
}

/// Event: прыжок выполнен (для анимации/audio)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct JumpPerformed {
    pub entity: Entity,
    /// Применённая vertical velocity (m/s)
    pub force: f32,
    pub is_air_jump: bool,
}
