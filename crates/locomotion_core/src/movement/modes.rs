//! Movement modes: sprint / slow-walk флаги и выбор скорости

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::input::{InputSnapshot, ModeEvent};
use crate::player::Player;

/// Параметры скоростей и ускорений
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
#[serde(default)]
pub struct MovementConfig {
    /// Скорость slow-walk (m/s)
    pub slow_walk_speed: f32,
    /// Обычная ходьба (m/s)
    pub walk_speed: f32,
    /// Бег (sprint) (m/s)
    pub run_speed: f32,
    /// Ускорение на земле (m/s²)
    pub ground_acceleration: f32,
    /// Торможение на земле (m/s²)
    pub ground_deceleration: f32,
    /// Air control (m/s²), ниже наземного
    pub air_acceleration: f32,
    pub air_deceleration: f32,
    /// Скорость поворота к направлению движения (1/сек)
    pub rotation_speed: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            slow_walk_speed: 1.5,
            walk_speed: 3.0,
            run_speed: 6.0,
            ground_acceleration: 15.0,
            ground_deceleration: 20.0,
            air_acceleration: 5.0,
            air_deceleration: 2.0,
            rotation_speed: 10.0,
        }
    }
}

/// Активные режимы движения
///
/// Меняются только через `ModeEvent` (start/end пары), не через polling.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
#[reflect(Component)]
pub struct MovementModes {
    pub sprinting: bool,
    pub slow_walking: bool,
}

impl MovementModes {
    pub fn apply(&mut self, event: ModeEvent) {
        match event {
            ModeEvent::SprintStart => self.sprinting = true,
            ModeEvent::SprintEnd => self.sprinting = false,
            ModeEvent::SlowWalkStart => self.slow_walking = true,
            ModeEvent::SlowWalkEnd => self.slow_walking = false,
        }
    }

    /// Run-mode для state machine (slow-walk перебивает sprint)
    pub fn is_running(&self) -> bool {
        self.sprinting && !self.slow_walking
    }

    pub fn target_speed(&self, config: &MovementConfig) -> f32 {
        if self.slow_walking {
            config.slow_walk_speed
        } else if self.sprinting {
            config.run_speed
        } else {
            config.walk_speed
        }
    }
}

/// Система: mode events из snapshot → MovementModes player персонажа
pub fn apply_mode_events(
    snapshot: Res<InputSnapshot>,
    mut query: Query<(Entity, &mut MovementModes), With<Player>>,
) {
    if snapshot.mode_events.is_empty() {
        return;
    }

    for (entity, mut modes) in query.iter_mut() {
        let before = *modes;
        for event in &snapshot.mode_events {
            modes.apply(*event);
        }

        if *modes != before {
            crate::log(&format!(
                "🏃 {:?} modes: sprint={} slow_walk={}",
                entity, modes.sprinting, modes.slow_walking
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speed_selection() {
        let config = MovementConfig::default();
        let mut modes = MovementModes::default();
        assert_eq!(modes.target_speed(&config), 3.0);

        modes.apply(ModeEvent::SprintStart);
        assert_eq!(modes.target_speed(&config), 6.0);
        assert!(modes.is_running());

        // slow-walk выигрывает у sprint
        modes.apply(ModeEvent::SlowWalkStart);
        assert_eq!(modes.target_speed(&config), 1.5);
        assert!(!modes.is_running());

        modes.apply(ModeEvent::SlowWalkEnd);
        modes.apply(ModeEvent::SprintEnd);
        assert_eq!(modes, MovementModes::default());
    }
}
