//! Shared domain - cross-cutting типы
//!
//! - math: NaN-safe vector helpers, lerp_angle, move_toward
//! - camera: LocomotionCamera, CameraBasis, ViewRay

pub mod camera;
pub mod math;

pub use camera::*;
pub use math::*;
