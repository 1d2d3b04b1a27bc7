//! Jump subsystem - ground jump, air jumps, coyote time
//!
//! JumpState - чистый bookkeeping (без ECS зависимостей в логике),
//! systems связывают его с grounded сигналом, input и state machine.

pub mod events;
pub mod state;
pub mod systems;


pub use events::{JumpIntent, JumpPerformed};
pub use state::{GroundEdge, JumpConfig, JumpKind, JumpState};
pub use systems::{emit_jump_intents, perform_requested_jumps, update_jump_bookkeeping};
