//! Character state machine
//!
//! Closed enum + handler table, pure transition function,
//! один component на персонажа.

pub mod machine;
pub mod states;
pub mod systems;

pub use machine::{CharacterStateMachine, StateChanged};
pub use states::{
    next_state, CharacterState, ControlProfile, StateHandler, StateMachineConfig, Transition,
    TransitionInputs, STATE_HANDLERS,
};
pub use systems::evaluate_character_state;
