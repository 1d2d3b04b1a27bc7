//! Per-tick input snapshot
//!
//! Хост (window/gamepad layer) пересобирает snapshot перед каждым tick.
//! Системы читают ТОЛЬКО этот resource, никакого глобального Input singleton.
//!
//! Level-данные (оси) живут пока хост их не перезапишет.
//! Edge-данные (клики, jump, mode events) очищаются в конце tick
//! системой `clear_input_edges`, поэтому каждое событие обрабатывается один раз.

use bevy::prelude::*;

/// Pointer событие в screen space (пиксели, y вниз)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Pressed { position: Vec2 },
    Moved { position: Vec2 },
    Released { position: Vec2 },
}

/// Mode toggles (sprint / slow-walk): отдельные start/end события
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum ModeEvent {
    SprintStart,
    SprintEnd,
    SlowWalkStart,
    SlowWalkEnd,
}

/// Input текущего tick для player-controlled персонажа
#[derive(Resource, Debug, Clone, Default)]
pub struct InputSnapshot {
    /// WASD / direct axis (x вправо, y вперёд). None = устройство недоступно
    pub direct_axis: Option<Vec2>,
    /// Raw gamepad stick. None = gamepad отключен
    pub gamepad_axis: Option<Vec2>,
    /// Pointer события в порядке поступления
    pub pointer_events: Vec<PointerEvent>,
    /// Jump button just_pressed
    pub jump_pressed: bool,
    /// Sprint / slow-walk edges
    pub mode_events: Vec<ModeEvent>,
    /// Явная отмена click-навигации (Escape / RMB)
    pub cancel_navigation: bool,
}

impl InputSnapshot {
    /// Сбросить edge-triggered данные (оси остаются)
    pub fn clear_edges(&mut self) {
        self.pointer_events.clear();
        self.jump_pressed = false;
        self.mode_events.clear();
        self.cancel_navigation = false;
    }

    pub fn has_edges(&self) -> bool {
        !self.pointer_events.is_empty()
            || self.jump_pressed
            || !self.mode_events.is_empty()
            || self.cancel_navigation
    }

    pub fn set_direct_axis(&mut self, axis: Vec2) {
        self.direct_axis = Some(axis);
    }

    pub fn press_pointer(&mut self, position: Vec2) {
        self.pointer_events.push(PointerEvent::Pressed { position });
    }

    pub fn move_pointer(&mut self, position: Vec2) {
        self.pointer_events.push(PointerEvent::Moved { position });
    }

    pub fn release_pointer(&mut self, position: Vec2) {
        self.pointer_events.push(PointerEvent::Released { position });
    }

    pub fn press_jump(&mut self) {
        self.jump_pressed = true;
    }

    pub fn push_mode(&mut self, event: ModeEvent) {
        self.mode_events.push(event);
    }
}

/// Система: очистка edge-данных в конце tick
pub fn clear_input_edges(mut snapshot: ResMut<InputSnapshot>) {
    if snapshot.has_edges() {
        snapshot.clear_edges();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_edges_keeps_axes() {
        let mut snapshot = InputSnapshot::default();
        snapshot.set_direct_axis(Vec2::Y);
        snapshot.press_pointer(Vec2::new(10.0, 20.0));
        snapshot.press_jump();
        snapshot.push_mode(ModeEvent::SprintStart);
        snapshot.cancel_navigation = true;
        assert!(snapshot.has_edges());

        snapshot.clear_edges();

        assert!(!snapshot.has_edges());
        assert_eq!(snapshot.direct_axis, Some(Vec2::Y));
    }
}
