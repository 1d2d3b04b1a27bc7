//! Movement integrator: intent → horizontal velocity + facing
//!
//! Вертикаль (gravity, прыжок, ground snap) живёт в physics/jump,
//! здесь только XZ и yaw.

use bevy::prelude::*;

use super::modes::{MovementConfig, MovementModes};
use crate::input::{ArbiterConfig, MovementIntent};
use crate::physics::CharacterBody;
use crate::shared::{
    active_basis, horizontal, lerp_angle, move_toward, smoothing_weight, yaw_from_direction,
    LocomotionCamera,
};
use crate::state_machine::{CharacterStateMachine, ControlProfile};

/// Ускорение/торможение активного control profile
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlRates {
    pub acceleration: f32,
    pub deceleration: f32,
}

impl MovementConfig {
    pub fn rates(&self, profile: ControlProfile) -> ControlRates {
        match profile {
            ControlProfile::Ground => ControlRates {
                acceleration: self.ground_acceleration,
                deceleration: self.ground_deceleration,
            },
            ControlProfile::Air => ControlRates {
                acceleration: self.air_acceleration,
                deceleration: self.air_deceleration,
            },
        }
    }
}

/// Одна итерация горизонтальной скорости
///
/// `direction` - горизонтальный unit vector (или ZERO).
/// magnitude выше deadzone → разгон к `direction * speed * magnitude`,
/// иначе торможение к нулю.
pub fn integrate_horizontal(
    velocity: Vec3,
    direction: Vec3,
    magnitude: f32,
    target_speed: f32,
    deadzone: f32,
    rates: ControlRates,
    delta: f32,
) -> Vec3 {
    let current = horizontal(velocity);

    if magnitude > deadzone && direction != Vec3::ZERO {
        let target = direction * target_speed * magnitude;
        move_toward(current, target, rates.acceleration * delta)
    } else {
        move_toward(current, Vec3::ZERO, rates.deceleration * delta)
    }
}

/// Yaw плавно догоняет направление движения
pub fn update_facing(current_yaw: f32, direction: Vec3, rotation_speed: f32, delta: f32) -> f32 {
    if direction == Vec3::ZERO {
        return current_yaw;
    }

    let target = yaw_from_direction(direction);
    lerp_angle(current_yaw, target, smoothing_weight(rotation_speed, delta))
}

/// Система: intent → CharacterBody.velocity.xz / facing_yaw
///
/// Control profile (ground/air) берётся из handler table текущего состояния.
pub fn integrate_movement(
    mut query: Query<(
        &MovementIntent,
        &MovementModes,
        &MovementConfig,
        &ArbiterConfig,
        &CharacterStateMachine,
        &mut CharacterBody,
    )>,
    cameras: Query<(&LocomotionCamera, &Transform)>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();
    let basis = active_basis(cameras.iter());

    for (intent, modes, config, arbiter_config, machine, mut body) in query.iter_mut() {
        let direction = basis.to_world(intent.direction());
        let rates = config.rates(machine.current.control());

        let planar = integrate_horizontal(
            body.velocity,
            direction,
            intent.magnitude(),
            modes.target_speed(config),
            arbiter_config.deadzone,
            rates,
            delta,
        );

        body.velocity.x = planar.x;
        body.velocity.z = planar.z;
        body.facing_yaw = update_facing(body.facing_yaw, direction, config.rotation_speed, delta);
    }
}
