//! LocomotionConfig - все параметры персонажа одним документом
//!
//! Загружается из RON (`from_ron_str`) на старте, валидируется один раз.
//! Per-tick код ошибок не возвращает: всё невалидное отсекается здесь.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::input::ArbiterConfig;
use crate::jump::JumpConfig;
use crate::movement::MovementConfig;
use crate::navigation::NavigationConfig;
use crate::physics::KinematicController;
use crate::state_machine::StateMachineConfig;

/// Ошибки загрузки конфигурации (setup-time, не per-tick)
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("RON parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("RON serialization error: {0}")]
    Serialize(#[from] ron::Error),

    #[error("Invalid value: {field} {reason}, got {value}")]
    InvalidValue {
        field: &'static str,
        reason: &'static str,
        value: f64,
    },
}

/// Полный набор параметров одного персонажа
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LocomotionConfig {
    pub arbiter: ArbiterConfig,
    pub navigation: NavigationConfig,
    pub jump: JumpConfig,
    pub movement: MovementConfig,
    pub state_machine: StateMachineConfig,
    pub physics: KinematicController,
}

fn check(field: &'static str, value: f32, reason: &'static str, ok: bool) -> Result<(), ConfigError> {
    if value.is_finite() && ok {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            field,
            reason,
            value: value as f64,
        })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    check(field, value, "must be >= 0", value >= 0.0)
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    check(field, value, "must be > 0", value > 0.0)
}

impl LocomotionConfig {
    /// Распарсить RON документ и проверить значения
    ///
    /// Отсутствующие поля берутся из Default.
    pub fn from_ron_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_ron(&self) -> Result<String, ConfigError> {
        Ok(ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let arbiter = &self.arbiter;
        check("arbiter.deadzone", arbiter.deadzone, "must be in [0, 1)", (0.0..1.0).contains(&arbiter.deadzone))?;
        non_negative("arbiter.input_smoothing", arbiter.input_smoothing)?;

        let nav = &self.navigation;
        non_negative("navigation.override_duration", nav.override_duration)?;
        positive("navigation.drag_update_interval", nav.drag_update_interval)?;
        non_negative("navigation.drag_start_threshold", nav.drag_start_threshold)?;
        positive("navigation.arrival_threshold", nav.arrival_threshold)?;
        non_negative("navigation.arrival_delay", nav.arrival_delay)?;
        positive("navigation.max_ray_distance", nav.max_ray_distance)?;

        let jump = &self.jump;
        if jump.max_jumps == 0 {
            return Err(ConfigError::InvalidValue {
                field: "jump.max_jumps",
                reason: "must be >= 1",
                value: 0.0,
            });
        }
        non_negative("jump.coyote_time_window", jump.coyote_time_window)?;
        positive("jump.jump_velocity", jump.jump_velocity)?;
        positive("jump.air_jump_velocity", jump.air_jump_velocity)?;

        let movement = &self.movement;
        non_negative("movement.slow_walk_speed", movement.slow_walk_speed)?;
        non_negative("movement.walk_speed", movement.walk_speed)?;
        non_negative("movement.run_speed", movement.run_speed)?;
        positive("movement.ground_acceleration", movement.ground_acceleration)?;
        positive("movement.ground_deceleration", movement.ground_deceleration)?;
        non_negative("movement.air_acceleration", movement.air_acceleration)?;
        non_negative("movement.air_deceleration", movement.air_deceleration)?;
        non_negative("movement.rotation_speed", movement.rotation_speed)?;

        let machine = &self.state_machine;
        non_negative("state_machine.movement_threshold", machine.movement_threshold)?;
        non_negative("state_machine.landing_duration", machine.landing_duration)?;
        check(
            "state_machine.landing_blend_lead",
            machine.landing_blend_lead,
            "must be in [0, landing_duration]",
            machine.landing_blend_lead >= 0.0 && machine.landing_blend_lead <= machine.landing_duration,
        )?;

        let physics = &self.physics;
        check("physics.gravity", physics.gravity, "must be <= 0", physics.gravity <= 0.0)?;
        positive("physics.max_fall_speed", physics.max_fall_speed)?;
        non_negative("physics.ground_snap_distance", physics.ground_snap_distance)?;
        positive("physics.probe_height", physics.probe_height)?;

        Ok(())
    }
}
