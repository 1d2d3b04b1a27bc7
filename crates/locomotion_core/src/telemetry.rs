//! Telemetry для внешних потребителей (animation, HUD, debug overlay)
//!
//! Locomotion core только публикует данные, никто из потребителей
//! не влияет на логику.

use bevy::prelude::*;
use serde::Serialize;

use crate::input::{InputArbiter, IntentSource, MovementIntent};
use crate::jump::JumpState;
use crate::movement::MovementModes;
use crate::navigation::{ClickNavigator, NavigationPhase};
use crate::physics::CharacterBody;
use crate::state_machine::{CharacterState, CharacterStateMachine};

/// Снимок locomotion состояния, обновляется в конце tick
#[derive(Component, Debug, Clone, Copy, PartialEq, Default, Reflect)]
#[reflect(Component)]
pub struct LocomotionTelemetry {
    /// Горизонтальная скорость (m/s) - blend space анимации
    pub movement_speed: f32,
    /// Сглаженный input vector (input space)
    pub input_direction: Vec2,
    pub current_state: CharacterState,
    pub previous_state: CharacterState,
    pub is_grounded: bool,
}

/// Система: refresh telemetry (Telemetry set)
pub fn publish_telemetry(
    mut query: Query<(
        &mut LocomotionTelemetry,
        &CharacterBody,
        &CharacterStateMachine,
        &InputArbiter,
    )>,
) {
    for (mut telemetry, body, machine, arbiter) in query.iter_mut() {
        let next = LocomotionTelemetry {
            movement_speed: body.movement_speed,
            input_direction: arbiter.smoothed_input,
            current_state: machine.current,
            previous_state: machine.previous,
            is_grounded: body.is_grounded,
        };

        // Не трогаем Changed<> если ничего не поменялось
        if *telemetry != next {
            *telemetry = next;
        }
    }
}

/// Debug snapshot персонажа (tooling, не функциональный контракт)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DebugSnapshot {
    pub state: CharacterState,
    pub previous_state: CharacterState,
    pub landing_timer: f32,
    pub position: [f32; 3],
    pub velocity: [f32; 3],
    pub movement_speed: f32,
    pub facing_yaw: f32,
    pub is_grounded: bool,
    pub input_direction: [f32; 2],
    pub intent_source: IntentSource,
    pub intent_magnitude: f32,
    pub sprinting: bool,
    pub slow_walking: bool,
    pub has_ground_jump: bool,
    pub air_jumps_remaining: u32,
    pub coyote_timer: f32,
    pub navigation_phase: NavigationPhase,
    pub navigation_active: bool,
    pub override_timer: f32,
    pub drag_timer: f32,
    pub arrival_timer: f32,
    pub drag_updates: u32,
}

impl DebugSnapshot {
    /// Собрать snapshot из компонентов персонажа
    ///
    /// None если это не locomotion персонаж. Навигатор опционален.
    pub fn capture(world: &World, entity: Entity) -> Option<Self> {
        let transform = world.get::<Transform>(entity)?;
        let body = world.get::<CharacterBody>(entity)?;
        let machine = world.get::<CharacterStateMachine>(entity)?;
        let intent = world.get::<MovementIntent>(entity)?;
        let arbiter = world.get::<InputArbiter>(entity)?;
        let jump = world.get::<JumpState>(entity)?;
        let modes = world.get::<MovementModes>(entity).copied().unwrap_or_default();
        let navigator = world.get::<ClickNavigator>(entity).copied().unwrap_or_default();

        Some(Self {
            state: machine.current,
            previous_state: machine.previous,
            landing_timer: machine.landing_timer,
            position: transform.translation.to_array(),
            velocity: body.velocity.to_array(),
            movement_speed: body.movement_speed,
            facing_yaw: body.facing_yaw,
            is_grounded: body.is_grounded,
            input_direction: arbiter.smoothed_input.to_array(),
            intent_source: intent.source(),
            intent_magnitude: intent.magnitude(),
            sprinting: modes.sprinting,
            slow_walking: modes.slow_walking,
            has_ground_jump: jump.has_ground_jump,
            air_jumps_remaining: jump.air_jumps_remaining,
            coyote_timer: jump.coyote_timer,
            navigation_phase: navigator.phase(),
            navigation_active: navigator.is_active(),
            override_timer: navigator.target().override_timer,
            drag_timer: navigator.drag_timer(),
            arrival_timer: navigator.arrival_timer(),
            drag_updates: navigator.drag_updates(),
        })
    }

    pub fn to_ron(&self) -> Result<String, ron::Error> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
    }
}
