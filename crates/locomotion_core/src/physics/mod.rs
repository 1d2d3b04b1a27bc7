//! Physics module
//!
//! Kinematic контроллер, ground probe, physics query interface.

pub mod body;
pub mod events;
pub mod movement;
pub mod query;

// Re-export основных типов
pub use body::CharacterBody;
pub use events::GroundStateChanged;
pub use movement::{
    apply_gravity, ground_detection, integrate_velocity_to_transform, probe_ground,
    sync_velocity_to_rapier, GroundContact, KinematicController,
};
pub use query::{
    CollisionMask, GroundPlane, PhysicsQuery, RapierQuery, RayHit, RayQuery, RaycastBackend,
};
