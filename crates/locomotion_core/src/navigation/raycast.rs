//! Screen point → ground hit

use bevy::prelude::*;

use super::resolver::NavigationConfig;
use crate::physics::{PhysicsQuery, RayQuery};
use crate::shared::LocomotionCamera;

/// Луч из камеры через screen точку против ground mask
///
/// None: нет камеры, нет физики, вырожденный viewport или просто промах.
pub fn cast_screen_point(
    camera: Option<(&LocomotionCamera, &Transform)>,
    physics: Option<&dyn PhysicsQuery>,
    screen: Vec2,
    config: &NavigationConfig,
) -> Option<Vec3> {
    let (camera, camera_transform) = camera?;
    let physics = physics?;
    let ray = camera.screen_ray(camera_transform, screen)?;

    physics
        .cast_ray(&RayQuery {
            origin: ray.origin,
            direction: ray.direction,
            max_distance: config.max_ray_distance,
            mask: config.ground_mask,
            exclude: None,
        })
        .map(|hit| hit.point)
}
