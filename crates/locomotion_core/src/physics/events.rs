//! Physics events

use bevy::prelude::*;

/// Event: персонаж оторвался от земли / приземлился
///
/// Генерируется: ground_detection (только на фронте, не каждый tick)
/// Потребители: анимация, audio (footsteps), UI
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct GroundStateChanged {
    pub entity: Entity,
    pub is_grounded: bool,
}
