//! JumpState - ground jump, air jumps, coyote time
//!
//! Coyote timer считает ВВЕРХ от 0 после схода с земли (без прыжка)
//! и сравнивается с фиксированным окном. Одна переменная = и "время в воздухе",
//! и проверка права на ground jump.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Параметры прыжка
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
#[serde(default)]
pub struct JumpConfig {
    /// Всего прыжков до приземления (1 ground + max_jumps-1 air)
    pub max_jumps: u32,
    /// Окно coyote time (секунды)
    pub coyote_time_window: f32,
    /// Vertical velocity ground jump (m/s)
    pub jump_velocity: f32,
    /// Vertical velocity air jump (m/s)
    pub air_jump_velocity: f32,
}

impl Default for JumpConfig {
    fn default() -> Self {
        Self {
            max_jumps: 2, // double jump
            coyote_time_window: 0.15,
            jump_velocity: 5.0,
            air_jump_velocity: 4.5,
        }
    }
}

impl JumpConfig {
    pub fn velocity_for(&self, kind: JumpKind) -> f32 {
        match kind {
            JumpKind::Ground => self.jump_velocity,
            JumpKind::Air => self.air_jump_velocity,
        }
    }
}

/// Какой прыжок был потрачен
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect, Serialize)]
pub enum JumpKind {
    /// С земли или внутри coyote окна
    Ground,
    /// Один из air jumps
    Air,
}

/// Фронт grounded сигнала
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroundEdge {
    Landed,
    LeftGround,
}

/// Jump bookkeeping персонажа
///
/// Инварианты:
/// - `air_jumps_remaining` никогда не отрицательный (u32 + checked sub)
/// - reset только на фронте airborne → grounded
/// - coyote timer идёт только в воздухе после схода БЕЗ прыжка,
///   обнуляется при прыжке и при приземлении
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect, Serialize)]
#[reflect(Component)]
pub struct JumpState {
    pub has_ground_jump: bool,
    pub air_jumps_remaining: u32,
    pub coyote_timer: f32,
    pub max_jumps: u32,
    /// coyote окно открыто (сошли с края без прыжка)
    pub coyote_open: bool,
    /// Прыгали с последнего приземления
    pub jumped_since_grounded: bool,
    /// grounded сигнал прошлого tick (для фронтов), None до первого ground probe
    pub was_grounded: Option<bool>,
}

impl Default for JumpState {
    fn default() -> Self {
        Self::new(JumpConfig::default().max_jumps)
    }
}

impl JumpState {
    pub fn new(max_jumps: u32) -> Self {
        Self {
            has_ground_jump: true,
            air_jumps_remaining: max_jumps.saturating_sub(1),
            coyote_timer: 0.0,
            max_jumps,
            coyote_open: false,
            jumped_since_grounded: false,
            was_grounded: None,
        }
    }

    /// Вызывается каждый tick с grounded сигналом ground probe
    ///
    /// Первый sample только запоминается: фронта нет. Spawn в воздухе
    /// не даёт ни ground jump, ни coyote окна.
    pub fn update_grounded(&mut self, grounded: bool, delta: f32) -> Option<GroundEdge> {
        let Some(was_grounded) = self.was_grounded else {
            if !grounded {
                self.has_ground_jump = false;
            }
            self.was_grounded = Some(grounded);
            return None;
        };

        let edge = match (was_grounded, grounded) {
            (false, true) => {
                self.land();
                Some(GroundEdge::Landed)
            }
            (true, false) => {
                if !self.jumped_since_grounded {
                    // Сошли с края: ground jump живёт только внутри coyote окна
                    self.has_ground_jump = false;
                    self.coyote_open = true;
                    self.coyote_timer = 0.0;
                }
                Some(GroundEdge::LeftGround)
            }
            (false, false) => {
                if self.coyote_open {
                    self.coyote_timer += delta;
                }
                None
            }
            (true, true) => None,
        };

        self.was_grounded = Some(grounded);
        edge
    }

    fn land(&mut self) {
        self.has_ground_jump = true;
        self.air_jumps_remaining = self.max_jumps.saturating_sub(1);
        self.coyote_timer = 0.0;
        self.coyote_open = false;
        self.jumped_since_grounded = false;
    }

    /// Ground jump доступен: стоим на земле или внутри coyote окна
    pub fn ground_jump_available(&self, config: &JumpConfig) -> bool {
        self.has_ground_jump || (self.coyote_open && self.coyote_timer < config.coyote_time_window)
    }

    pub fn can_jump_at_all(&self, config: &JumpConfig) -> bool {
        self.ground_jump_available(config) || self.air_jumps_remaining > 0
    }

    /// Потратить прыжок. None - прыгать нечем (no-op, не ошибка)
    pub fn perform_jump(&mut self, config: &JumpConfig) -> Option<JumpKind> {
        let kind = if self.ground_jump_available(config) {
            self.has_ground_jump = false;
            JumpKind::Ground
        } else if let Some(remaining) = self.air_jumps_remaining.checked_sub(1) {
            self.air_jumps_remaining = remaining;
            JumpKind::Air
        } else {
            return None;
        };

        self.coyote_timer = 0.0;
        self.coyote_open = false;
        self.jumped_since_grounded = true;
        Some(kind)
    }

    /// Сменить max_jumps (config reload); применяется сразу к остатку
    pub fn set_max_jumps(&mut self, max_jumps: u32) {
        self.max_jumps = max_jumps;
        self.air_jumps_remaining = self.air_jumps_remaining.min(max_jumps.saturating_sub(1));
    }
}
