//! Input arbitration: direct axis vs gamepad vs click-навигация
//!
//! Приоритеты (hard override, не голосование):
//! 1. Direct input выше deadzone всегда выигрывает и отменяет навигацию
//! 2. Ниже deadzone - вектор навигации, если она активна
//! 3. Иначе zero intent
//!
//! Исключение: свежий click (override_timer навигации ещё не истёк).
//! В этом окне direct input игнорируется, чтобы остаточный tick стика
//! не убил только что выданную команду.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::intent::{IntentSource, MovementIntent};
use crate::shared::{safe_normalize_2d, smoothing_weight};

/// Параметры арбитра
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
#[serde(default)]
pub struct ArbiterConfig {
    /// Порог длины axis vector, ниже которого direct input = шум
    pub deadzone: f32,
    /// Скорость сглаживания input direction для telemetry (1/сек)
    pub input_smoothing: f32,
}

impl Default for ArbiterConfig {
    fn default() -> Self {
        Self {
            deadzone: 0.1,
            input_smoothing: 12.0,
        }
    }
}

/// Что навигация сообщает арбитру в этом tick
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NavigationSample {
    pub active: bool,
    /// Вектор к цели в input space (unit или ZERO)
    pub vector: Vec2,
    /// override_timer истёк → direct input может отменить навигацию
    pub override_allowed: bool,
}

/// Вход арбитра (snapshot + состояние навигации)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ArbitrationInput {
    pub direct_axis: Option<Vec2>,
    pub gamepad_axis: Option<Vec2>,
    /// None - у персонажа нет навигатора (фича выключена)
    pub navigation: Option<NavigationSample>,
}

/// Результат арбитража
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arbitration {
    pub intent: MovementIntent,
    /// Direct input перехватил управление → навигацию надо отменить в этом же tick
    pub cancel_navigation: bool,
}

/// Первый direct источник выше deadzone (клавиатура раньше gamepad)
fn pick_direct(input: &ArbitrationInput, deadzone: f32) -> Option<(Vec2, IntentSource)> {
    let candidates = [
        (input.direct_axis, IntentSource::Direct),
        (input.gamepad_axis, IntentSource::Gamepad),
    ];

    candidates.into_iter().find_map(|(axis, source)| {
        let axis = axis?;
        (axis.is_finite() && axis.length() > deadzone).then_some((axis, source))
    })
}

/// Pure arbitration: один intent на tick, всегда определён
pub fn resolve_intent(input: &ArbitrationInput, deadzone: f32, timestamp: f64) -> Arbitration {
    let navigation = input.navigation.filter(|nav| nav.active);
    let direct = pick_direct(input, deadzone);

    match (direct, navigation) {
        // Свежий click: direct подавлен до истечения override_timer
        (Some(_), Some(nav)) if !nav.override_allowed => Arbitration {
            intent: MovementIntent::from_axis(nav.vector, IntentSource::ClickNav, timestamp),
            cancel_navigation: false,
        },
        (Some((axis, source)), nav) => Arbitration {
            intent: MovementIntent::from_axis(axis, source, timestamp),
            cancel_navigation: nav.is_some(),
        },
        // Вектор ZERO (стоим ровно на цели) даёт zero intent через from_axis
        (None, Some(nav)) => Arbitration {
            intent: MovementIntent::from_axis(nav.vector, IntentSource::ClickNav, timestamp),
            cancel_navigation: false,
        },
        (None, None) => Arbitration {
            intent: MovementIntent::zero(timestamp),
            cancel_navigation: false,
        },
    }
}

/// Состояние арбитра персонажа
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct InputArbiter {
    /// Источник, выигравший в прошлом tick
    pub last_source: IntentSource,
    /// Сглаженный input (для анимации/telemetry, не для физики)
    pub smoothed_input: Vec2,
    /// Сколько раз direct input отменил навигацию
    pub navigation_overrides: u32,
}

impl InputArbiter {
    /// Принять результат арбитража; true если источник сменился
    pub fn record(&mut self, arbitration: &Arbitration, config: &ArbiterConfig, delta: f32) -> bool {
        let weight = smoothing_weight(config.input_smoothing, delta);
        let smoothed = self.smoothed_input.lerp(arbitration.intent.vector(), weight);
        self.smoothed_input = if smoothed.is_finite() { smoothed } else { Vec2::ZERO };

        if arbitration.cancel_navigation {
            self.navigation_overrides += 1;
        }

        let source = arbitration.intent.source();
        let changed = source != self.last_source;
        self.last_source = source;
        changed
    }

    /// Направление сглаженного input (unit или ZERO)
    pub fn smoothed_direction(&self) -> Vec2 {
        safe_normalize_2d(self.smoothed_input)
    }
}
