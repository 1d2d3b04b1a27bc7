//! MovementIntent - единственная resolved команда движения за tick

use bevy::prelude::*;
use serde::Serialize;

use crate::shared::safe_normalize_2d;

/// Откуда пришёл intent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect, Serialize)]
pub enum IntentSource {
    /// Нет активного источника (zero intent)
    #[default]
    None,
    /// Клавиатура (WASD / direct axis)
    Direct,
    /// Click/drag навигация
    ClickNav,
    /// Raw gamepad stick
    Gamepad,
}

/// Resolved intent текущего tick
///
/// Создаётся арбитром один раз за tick и заменяется целиком на следующем.
/// Поля приватные: после создания intent не меняется.
///
/// Инварианты:
/// - `magnitude` ∈ [0, 1]
/// - `direction` - unit vector или ZERO (никогда NaN)
#[derive(Component, Debug, Clone, Copy, PartialEq, Default, Reflect)]
#[reflect(Component)]
pub struct MovementIntent {
    direction: Vec2,
    magnitude: f32,
    source: IntentSource,
    timestamp: f64,
}

impl MovementIntent {
    pub fn zero(timestamp: f64) -> Self {
        Self {
            direction: Vec2::ZERO,
            magnitude: 0.0,
            source: IntentSource::None,
            timestamp,
        }
    }

    /// Intent из сырого axis vector (input space: x вправо, y вперёд)
    ///
    /// Длина > 1 (диагональ без нормализации) обрезается до 1,
    /// NaN/zero → zero intent.
    pub fn from_axis(axis: Vec2, source: IntentSource, timestamp: f64) -> Self {
        let direction = safe_normalize_2d(axis);
        if direction == Vec2::ZERO {
            return Self::zero(timestamp);
        }

        Self {
            direction,
            magnitude: axis.length().min(1.0),
            source,
            timestamp,
        }
    }

    pub fn direction(&self) -> Vec2 {
        self.direction
    }

    pub fn magnitude(&self) -> f32 {
        self.magnitude
    }

    pub fn source(&self) -> IntentSource {
        self.source
    }

    pub fn timestamp(&self) -> f64 {
        self.timestamp
    }

    /// direction * magnitude
    pub fn vector(&self) -> Vec2 {
        self.direction * self.magnitude
    }

    pub fn is_active(&self) -> bool {
        self.magnitude > 0.0
    }
}
