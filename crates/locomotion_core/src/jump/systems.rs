//! Jump systems
//!
//! Порядок внутри tick:
//! - Sense: update_jump_bookkeeping (фронты grounded, coyote timer)
//! - Input: emit_jump_intents (snapshot → JumpIntent)
//! - StateEvaluation: perform_requested_jumps (после transition table)

use bevy::prelude::*;

use super::events::{JumpIntent, JumpPerformed};
use super::state::{GroundEdge, JumpConfig, JumpKind, JumpState};
use crate::input::InputSnapshot;
use crate::physics::CharacterBody;
use crate::player::Player;
use crate::state_machine::{CharacterState, CharacterStateMachine, StateChanged, StateMachineConfig};

/// Система: grounded сигнал → JumpState
pub fn update_jump_bookkeeping(
    mut query: Query<(Entity, &mut JumpState, &JumpConfig, &CharacterBody)>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (entity, mut jump, config, body) in query.iter_mut() {
        if jump.max_jumps != config.max_jumps {
            jump.set_max_jumps(config.max_jumps);
        }

        if let Some(GroundEdge::Landed) = jump.update_grounded(body.is_grounded, delta) {
            crate::log(&format!(
                "🛬 {:?} landed: jumps reset (air jumps: {})",
                entity, jump.air_jumps_remaining
            ));
        }
    }
}

/// Система: jump press из snapshot → JumpIntent для player персонажей
pub fn emit_jump_intents(
    snapshot: Res<InputSnapshot>,
    players: Query<Entity, (With<Player>, With<JumpState>)>,
    mut intents: EventWriter<JumpIntent>,
) {
    if !snapshot.jump_pressed {
        return;
    }

    for entity in players.iter() {
        intents.write(JumpIntent { entity });
    }
}

/// Система: JumpIntent → прыжок (если JumpState разрешает)
///
/// Не больше одного прыжка на entity за tick: повторный intent того же tick
/// не должен сжечь air jump сразу вслед за ground jump.
/// Разрешённый прыжок форсирует Jumping поверх решения transition table.
pub fn perform_requested_jumps(
    mut intents: EventReader<JumpIntent>,
    mut query: Query<(
        &mut JumpState,
        &JumpConfig,
        &mut CharacterBody,
        &mut CharacterStateMachine,
        &StateMachineConfig,
    )>,
    mut jump_events: EventWriter<JumpPerformed>,
    mut state_events: EventWriter<StateChanged>,
) {
    let mut handled: Vec<Entity> = Vec::new();

    for intent in intents.read() {
        if handled.contains(&intent.entity) {
            continue;
        }
        handled.push(intent.entity);

        let Ok((mut jump, config, mut body, mut machine, machine_config)) = query.get_mut(intent.entity) else {
            crate::log_warning(&format!("JumpIntent for {:?} without jump components, ignored", intent.entity));
            continue;
        };

        // Прыгать нечем - тихий no-op
        let Some(kind) = jump.perform_jump(config) else {
            continue;
        };

        let force = config.velocity_for(kind);
        body.velocity.y = force;

        jump_events.write(JumpPerformed {
            entity: intent.entity,
            force,
            is_air_jump: kind == JumpKind::Air,
        });

        if let Some((old, new)) = machine.force(CharacterState::Jumping, machine_config) {
            state_events.write(StateChanged {
                entity: intent.entity,
                old,
                new,
            });
        }

        crate::log(&format!(
            "🦘 {:?} {:?} jump: vy={:.2}, air jumps left: {}",
            intent.entity, kind, force, jump.air_jumps_remaining
        ));
    }
}
