//! Input domain - snapshot, arbitration, resolved intent
//!
//! Содержит:
//! - InputSnapshot (per-tick input от хоста)
//! - MovementIntent (одна resolved команда за tick)
//! - InputArbiter + resolve_intent (direct vs gamepad vs click-навигация)

pub mod arbiter;
pub mod intent;
pub mod snapshot;
pub mod systems;

pub use arbiter::{
    resolve_intent, ArbiterConfig, Arbitration, ArbitrationInput, InputArbiter, NavigationSample,
};
pub use intent::{IntentSource, MovementIntent};
pub use snapshot::{clear_input_edges, InputSnapshot, ModeEvent, PointerEvent};
pub use systems::arbitrate_movement_intent;
