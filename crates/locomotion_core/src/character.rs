//! LocomotionCharacter - всё, что нужно персонажу, на одном entity

use bevy::prelude::*;

use crate::config::LocomotionConfig;
use crate::input::{ArbiterConfig, InputArbiter, MovementIntent};
use crate::jump::{JumpConfig, JumpState};
use crate::movement::{MovementConfig, MovementModes};
use crate::navigation::{ClickNavigator, NavigationConfig};
use crate::physics::{CharacterBody, KinematicController};
use crate::state_machine::{CharacterStateMachine, StateMachineConfig};
use crate::telemetry::LocomotionTelemetry;

/// Marker персонажа с locomotion
///
/// Автоматически добавляет остальные компоненты через Required Components
/// (с default параметрами). Свои параметры - через `spawn_locomotion_character`.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
#[require(
    Transform,
    MovementIntent,
    InputArbiter,
    ArbiterConfig,
    ClickNavigator,
    NavigationConfig,
    JumpState,
    JumpConfig,
    CharacterBody,
    KinematicController,
    MovementConfig,
    MovementModes,
    CharacterStateMachine,
    StateMachineConfig,
    LocomotionTelemetry
)]
pub struct LocomotionCharacter;

/// Spawn персонажа (ноги в `position`) с параметрами из конфига
///
/// Player marker не добавляется: `commands.entity(id).insert(Player)`.
pub fn spawn_locomotion_character(
    commands: &mut Commands,
    position: Vec3,
    config: &LocomotionConfig,
) -> Entity {
    let entity = commands
        .spawn((
            LocomotionCharacter,
            Transform::from_translation(position),
            config.arbiter,
            config.navigation,
            config.jump,
            JumpState::new(config.jump.max_jumps),
            config.movement,
            config.state_machine,
            config.physics,
        ))
        .id();

    crate::log(&format!(
        "🧍 Spawned locomotion character {:?} at ({:.2}, {:.2}, {:.2})",
        entity, position.x, position.y, position.z
    ));

    entity
}
