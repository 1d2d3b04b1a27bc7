//! Camera collaborator: горизонтальный basis + screen → world ray
//!
//! Камера НЕ принадлежит locomotion core. Мы только читаем её Transform,
//! чтобы перевести 2D input в 3D направление и построить луч для клика.

use bevy::prelude::*;

use super::math::{flatten, safe_normalize_2d};

/// Камера, относительно которой считается движение
///
/// Вешается на camera entity (рядом с Transform). Если такой entity нет,
/// движение деградирует в world-space (`CameraBasis::WORLD`), а клики не
/// кастуются (каждый pointer-down = miss).
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct LocomotionCamera {
    /// Вертикальный FOV (радианы)
    pub vertical_fov: f32,
    /// Размер viewport в пикселях (для screen → NDC)
    pub viewport_size: Vec2,
    /// Неактивные камеры игнорируются (cutscene, photo mode)
    pub active: bool,
}

impl Default for LocomotionCamera {
    fn default() -> Self {
        Self {
            vertical_fov: 60f32.to_radians(),
            viewport_size: Vec2::new(1920.0, 1080.0),
            active: true,
        }
    }
}

impl LocomotionCamera {
    /// Луч из камеры через точку экрана (пиксели, y вниз)
    ///
    /// None если viewport вырожденный или точка невалидная.
    pub fn screen_ray(&self, camera_transform: &Transform, screen: Vec2) -> Option<ViewRay> {
        let size = self.viewport_size;
        if size.x <= 0.0 || size.y <= 0.0 || !screen.is_finite() {
            return None;
        }

        let ndc_x = 2.0 * screen.x / size.x - 1.0;
        let ndc_y = 1.0 - 2.0 * screen.y / size.y;
        let half_height = (self.vertical_fov * 0.5).tan();
        let aspect = size.x / size.y;

        let direction = camera_transform.forward().as_vec3()
            + camera_transform.right().as_vec3() * ndc_x * half_height * aspect
            + camera_transform.up().as_vec3() * ndc_y * half_height;

        let direction = direction.normalize_or_zero();
        if direction == Vec3::ZERO {
            return None;
        }

        Some(ViewRay {
            origin: camera_transform.translation,
            direction,
        })
    }
}

/// Луч (origin + unit direction)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewRay {
    pub origin: Vec3,
    pub direction: Vec3,
}

/// Горизонтальный basis камеры (forward/right на плоскости XZ)
///
/// Input space: x = вправо, y = вперёд.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct CameraBasis {
    pub forward: Vec3,
    pub right: Vec3,
}

impl Default for CameraBasis {
    fn default() -> Self {
        Self::WORLD
    }
}

impl CameraBasis {
    /// Fallback без камеры: forward = -Z, right = +X
    pub const WORLD: Self = Self {
        forward: Vec3::NEG_Z,
        right: Vec3::X,
    };

    pub fn from_transform(transform: &Transform) -> Self {
        let mut forward = flatten(transform.forward().as_vec3());
        if forward == Vec3::ZERO {
            // Камера смотрит строго вниз: "вперёд" = верх экрана
            forward = flatten(transform.up().as_vec3());
        }
        let right = flatten(transform.right().as_vec3());

        if forward == Vec3::ZERO || right == Vec3::ZERO {
            return Self::WORLD;
        }

        Self { forward, right }
    }

    /// Input (x вправо, y вперёд) → горизонтальное world направление (unit или ZERO)
    pub fn to_world(&self, input: Vec2) -> Vec3 {
        if !input.is_finite() {
            return Vec3::ZERO;
        }
        flatten(self.right * input.x + self.forward * input.y)
    }

    /// World направление → input space (dot products с right/forward)
    pub fn to_input(&self, world_direction: Vec3) -> Vec2 {
        let direction = flatten(world_direction);
        safe_normalize_2d(Vec2::new(
            direction.dot(self.right),
            direction.dot(self.forward),
        ))
    }
}

/// Первая активная камера (если активных несколько, берём первую)
pub fn active_camera<'a>(
    cameras: impl IntoIterator<Item = (&'a LocomotionCamera, &'a Transform)>,
) -> Option<(&'a LocomotionCamera, &'a Transform)> {
    cameras.into_iter().find(|(camera, _)| camera.active)
}

/// Basis активной камеры или world fallback
pub fn active_basis<'a>(
    cameras: impl IntoIterator<Item = (&'a LocomotionCamera, &'a Transform)>,
) -> CameraBasis {
    active_camera(cameras)
        .map(|(_, transform)| CameraBasis::from_transform(transform))
        .unwrap_or(CameraBasis::WORLD)
}
