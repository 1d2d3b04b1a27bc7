//! State machine systems

use bevy::prelude::*;

use super::machine::{CharacterStateMachine, StateChanged};
use super::states::{next_state, StateMachineConfig, TransitionInputs};
use crate::input::MovementIntent;
use crate::movement::MovementModes;
use crate::physics::CharacterBody;

/// Система: transition table (StateEvaluation, до прыжков)
///
/// grounded - результат ground probe этого tick,
/// moving - intent ИЛИ остаточная горизонтальная скорость.
pub fn evaluate_character_state(
    mut query: Query<(
        Entity,
        &mut CharacterStateMachine,
        &StateMachineConfig,
        &CharacterBody,
        &MovementIntent,
        &MovementModes,
    )>,
    time: Res<Time<Fixed>>,
    mut state_events: EventWriter<StateChanged>,
) {
    let delta = time.delta_secs();

    for (entity, mut machine, config, body, intent, modes) in query.iter_mut() {
        let inputs = TransitionInputs {
            grounded: body.is_grounded,
            moving: intent.is_active() || body.horizontal_speed() > config.movement_threshold,
            intent_active: intent.is_active(),
            run_mode: modes.is_running(),
            landing_timer: machine.landing_timer,
            delta,
        };

        let transition = next_state(machine.current, &inputs, config);
        if let Some((old, new)) = machine.apply(transition) {
            crate::log(&format!("🔄 {:?} state: {} → {}", entity, old, new));
            state_events.write(StateChanged { entity, old, new });
        }
    }
}
