//! Movement domain - integrator и режимы скорости
//!
//! Содержит:
//! - MovementConfig (скорости, ускорения, rotation speed)
//! - MovementModes (sprint / slow-walk)
//! - integrate_movement (intent → horizontal velocity + facing)

pub mod integrator;
pub mod modes;

pub use integrator::{integrate_horizontal, integrate_movement, update_facing, ControlRates};
pub use modes::{apply_mode_events, MovementConfig, MovementModes};
