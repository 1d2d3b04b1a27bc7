//! Click/drag navigation resolver
//!
//! Фазы:
//! ```text
//! Idle → Previewing → Dragging | SingleDestination → ArrivalDelay → Idle
//! ```
//! - Previewing: кнопка зажата, destination уже активен
//! - Dragging: курсор ушёл дальше drag_start_threshold, destination
//!   обновляется не чаще drag_update_interval
//! - SingleDestination: кнопку отпустили, идём к последней точке
//! - ArrivalDelay: дошли, destination очищен, marker ещё виден
//!
//! Resolver не кастует лучи сам: pointer-down получает готовый hit,
//! pointer-move - closure, которую зовём только когда rate limit пропускает.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::physics::CollisionMask;
use crate::shared::{planar_distance, CameraBasis, TIMER_EPSILON};

/// Параметры click-навигации
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
#[serde(default)]
pub struct NavigationConfig {
    /// Сколько свежий click не отдаёт управление direct input (секунды)
    pub override_duration: f32,
    /// Минимальный интервал между drag обновлениями (секунды)
    pub drag_update_interval: f32,
    /// Сдвиг курсора (пиксели), после которого press становится drag
    pub drag_start_threshold: f32,
    pub drag_enabled: bool,
    /// Planar дистанция "дошли" (метры)
    pub arrival_threshold: f32,
    /// Сколько marker живёт после прибытия (секунды)
    pub arrival_delay: f32,
    pub max_ray_distance: f32,
    pub ground_mask: CollisionMask,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            override_duration: 0.1,
            drag_update_interval: 0.05, // 20 raycasts/sec максимум
            drag_start_threshold: 6.0,
            drag_enabled: true,
            arrival_threshold: 0.5,
            arrival_delay: 0.5,
            max_ray_distance: 1000.0,
            ground_mask: CollisionMask::WALKABLE,
        }
    }
}

/// Фаза resolver'а
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect, Serialize)]
pub enum NavigationPhase {
    #[default]
    Idle,
    Previewing,
    Dragging,
    SingleDestination,
    ArrivalDelay,
}

/// Активная цель навигации (максимум одна на персонажа)
#[derive(Debug, Clone, Copy, PartialEq, Default, Reflect)]
pub struct NavigationTarget {
    pub destination: Vec3,
    pub active: bool,
    pub is_dragging: bool,
    /// Fixed clock момента создания (секунды)
    pub created_at: f64,
    /// Пока > 0, direct input не может перехватить управление
    pub override_timer: f32,
}

/// Что произошло с навигацией (для marker UI и логов)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NavigationEventKind {
    DestinationSet(Vec3),
    DestinationUpdated(Vec3),
    Arrived(Vec3),
    /// Отмена (direct override, CancelNavigation, Escape)
    Cancelled,
    /// Arrival delay истёк, marker убран
    Cleared,
}

/// Click/drag навигатор персонажа
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct ClickNavigator {
    phase: NavigationPhase,
    target: NavigationTarget,
    /// Позиция marker'а (живёт дольше target на arrival_delay)
    marker: Option<Vec3>,
    /// Screen точка pointer-down (для drag threshold)
    press_position: Vec2,
    /// Время с последнего drag обновления
    drag_timer: f32,
    arrival_timer: f32,
    /// Обновления destination текущего drag
    drag_updates: u32,
}

impl ClickNavigator {
    pub fn phase(&self) -> NavigationPhase {
        self.phase
    }

    pub fn target(&self) -> &NavigationTarget {
        &self.target
    }

    pub fn marker(&self) -> Option<Vec3> {
        self.marker
    }

    pub fn drag_timer(&self) -> f32 {
        self.drag_timer
    }

    pub fn arrival_timer(&self) -> f32 {
        self.arrival_timer
    }

    pub fn drag_updates(&self) -> u32 {
        self.drag_updates
    }

    pub fn is_active(&self) -> bool {
        self.target.active
    }

    /// override_timer истёк → direct input может отменить навигацию
    pub fn override_allowed(&self) -> bool {
        self.target.override_timer <= TIMER_EPSILON
    }

    /// Таймеры tick'а (один раз за tick, до pointer событий)
    pub fn advance_timers(&mut self, delta: f32) -> Option<NavigationEventKind> {
        if self.target.active {
            self.target.override_timer = (self.target.override_timer - delta).max(0.0);
        }

        match self.phase {
            NavigationPhase::Dragging => {
                self.drag_timer += delta;
                None
            }
            NavigationPhase::ArrivalDelay => {
                self.arrival_timer -= delta;
                if self.arrival_timer <= TIMER_EPSILON {
                    self.reset();
                    Some(NavigationEventKind::Cleared)
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    /// Pointer-down. `hit` - результат raycast (None = miss → no-op)
    pub fn pointer_pressed(
        &mut self,
        screen: Vec2,
        hit: Option<Vec3>,
        now: f64,
        config: &NavigationConfig,
    ) -> Option<NavigationEventKind> {
        let destination = hit?;

        self.target = NavigationTarget {
            destination,
            active: true,
            is_dragging: false,
            created_at: now,
            override_timer: config.override_duration,
        };
        self.marker = Some(destination);
        self.phase = NavigationPhase::Previewing;
        self.press_position = screen;
        self.drag_timer = 0.0;
        self.arrival_timer = 0.0;
        self.drag_updates = 0;

        Some(NavigationEventKind::DestinationSet(destination))
    }

    /// Pointer-move при зажатой кнопке
    ///
    /// `cast` зовётся только когда destination действительно обновляется.
    pub fn pointer_moved(
        &mut self,
        screen: Vec2,
        cast: impl FnOnce(Vec2) -> Option<Vec3>,
        config: &NavigationConfig,
    ) -> Option<NavigationEventKind> {
        match self.phase {
            NavigationPhase::Previewing => {
                if !config.drag_enabled
                    || screen.distance(self.press_position) <= config.drag_start_threshold
                {
                    return None;
                }

                self.phase = NavigationPhase::Dragging;
                self.target.is_dragging = true;
                // Первое обновление drag - сразу
                self.update_destination(cast(screen))
            }
            NavigationPhase::Dragging => {
                if self.drag_timer + TIMER_EPSILON < config.drag_update_interval {
                    return None;
                }
                self.update_destination(cast(screen))
            }
            _ => None,
        }
    }

    fn update_destination(&mut self, hit: Option<Vec3>) -> Option<NavigationEventKind> {
        // Miss: destination прежний, rate limit не сбрасываем
        let destination = hit?;

        self.target.destination = destination;
        self.marker = Some(destination);
        self.drag_timer = 0.0;
        self.drag_updates += 1;
        Some(NavigationEventKind::DestinationUpdated(destination))
    }

    /// Pointer-up: Previewing/Dragging → SingleDestination
    pub fn pointer_released(&mut self) -> bool {
        if !matches!(self.phase, NavigationPhase::Previewing | NavigationPhase::Dragging) {
            return false;
        }

        self.phase = NavigationPhase::SingleDestination;
        self.target.is_dragging = false;
        true
    }

    /// Arrival check (каждый tick, только не-drag цель)
    ///
    /// Срабатывает один раз: после него target неактивен.
    pub fn check_arrival(&mut self, position: Vec3, config: &NavigationConfig) -> Option<NavigationEventKind> {
        if !self.target.active || self.target.is_dragging {
            return None;
        }

        if planar_distance(position, self.target.destination) >= config.arrival_threshold {
            return None;
        }

        let destination = self.target.destination;
        self.target = NavigationTarget::default();
        self.phase = NavigationPhase::ArrivalDelay;
        self.arrival_timer = config.arrival_delay;
        Some(NavigationEventKind::Arrived(destination))
    }

    /// Полная отмена (target, drag, preview, arrival delay) за один вызов
    ///
    /// Returns true если было что отменять.
    pub fn cancel(&mut self) -> bool {
        let had_anything = self.phase != NavigationPhase::Idle || self.target.active;
        self.reset();
        had_anything
    }

    fn reset(&mut self) {
        self.phase = NavigationPhase::Idle;
        self.target = NavigationTarget::default();
        self.marker = None;
        self.press_position = Vec2::ZERO;
        self.drag_timer = 0.0;
        self.arrival_timer = 0.0;
        self.drag_updates = 0;
    }

    /// Вектор к цели в input space (тот же, что у WASD). ZERO если цели нет
    pub fn movement_vector(&self, position: Vec3, basis: &CameraBasis) -> Vec2 {
        if !self.target.active {
            return Vec2::ZERO;
        }
        basis.to_input(self.target.destination - position)
    }
}
