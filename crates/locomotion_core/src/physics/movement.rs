//! Kinematic контроллер персонажа
//!
//! Архитектура:
//! - Custom velocity integration (не используем Rapier forces)
//! - Ground probe через `RaycastBackend` (Rapier или аналитическая плоскость)
//! - Gravity только в воздухе
//! - Rapier backend: velocity зеркалится в Rapier `Velocity` (для collisions)
//!
//! Детерминизм: fixed timestep, все системы в FixedUpdate.

use bevy::prelude::*;
use bevy_rapier3d::prelude::{ReadRapierContext, Velocity};
use serde::{Deserialize, Serialize};

use super::body::CharacterBody;
use super::query::{CollisionMask, PhysicsQuery, RayQuery, RaycastBackend};
use crate::physics::events::GroundStateChanged;

/// Параметры kinematic контроллера
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
#[serde(default)]
pub struct KinematicController {
    /// Сила гравитации (m/s², отрицательная)
    pub gravity: f32,
    /// Ограничение скорости падения (m/s, положительное)
    pub max_fall_speed: f32,
    /// Насколько ниже ног ещё считаем "на земле" (метры)
    pub ground_snap_distance: f32,
    /// Высота над ногами, откуда стартует probe (метры)
    pub probe_height: f32,
    /// Слои, по которым можно ходить
    pub ground_mask: CollisionMask,
}

impl Default for KinematicController {
    fn default() -> Self {
        Self {
            gravity: -9.81, // Earth gravity
            max_fall_speed: 30.0,
            ground_snap_distance: 0.1,
            probe_height: 1.0,
            ground_mask: CollisionMask::WALKABLE,
        }
    }
}

/// Результат ground probe
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundContact {
    pub grounded: bool,
    pub floor_height: Option<f32>,
}

/// Ground probe: луч вниз от `feet + probe_height`
///
/// Поднимаемся (velocity.y > 0) → не на земле, даже если пол рядом:
/// иначе прыжок "прилипал" бы к полу в первый же tick.
pub fn probe_ground(
    query: Option<&dyn PhysicsQuery>,
    feet: Vec3,
    vertical_velocity: f32,
    controller: &KinematicController,
    exclude: Option<Entity>,
) -> GroundContact {
    let not_grounded = GroundContact {
        grounded: false,
        floor_height: None,
    };

    let Some(query) = query else {
        return not_grounded;
    };

    if vertical_velocity > 0.0 {
        return not_grounded;
    }

    let ray = RayQuery {
        origin: feet + Vec3::Y * controller.probe_height,
        direction: Vec3::NEG_Y,
        max_distance: controller.probe_height + controller.ground_snap_distance,
        mask: controller.ground_mask,
        exclude,
    };

    match query.cast_ray(&ray) {
        Some(hit) => GroundContact {
            grounded: true,
            floor_height: Some(hit.point.y),
        },
        None => not_grounded,
    }
}

/// Система ground detection (начало tick)
///
/// Работает по позиции, которую оставил предыдущий tick.
/// Grounded → snap к полу и гасим отрицательную vertical velocity.
pub fn ground_detection(
    mut query: Query<(Entity, &KinematicController, &mut CharacterBody, &mut Transform)>,
    backend: Res<RaycastBackend>,
    rapier: ReadRapierContext,
    mut ground_events: EventWriter<GroundStateChanged>,
) {
    backend.with_query(&rapier, |physics| {
        for (entity, controller, mut body, mut transform) in query.iter_mut() {
            let contact = probe_ground(
                physics,
                transform.translation,
                body.velocity.y,
                controller,
                Some(entity),
            );

            if contact.grounded != body.is_grounded {
                crate::log(&format!(
                    "🦶 {:?} ground state: {} → {}",
                    entity, body.is_grounded, contact.grounded
                ));
                ground_events.write(GroundStateChanged {
                    entity,
                    is_grounded: contact.grounded,
                });
            }

            body.is_grounded = contact.grounded;
            body.floor_height = contact.floor_height;

            if let Some(floor) = contact.floor_height {
                transform.translation.y = floor;
                body.velocity.y = body.velocity.y.max(0.0);
            }
        }
    });
}

/// Система применения gravity к velocity
pub fn apply_gravity(
    mut query: Query<(&KinematicController, &mut CharacterBody)>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (controller, mut body) in query.iter_mut() {
        if !body.is_grounded {
            // Применяем гравитацию только в воздухе
            body.velocity.y = (body.velocity.y + controller.gravity * delta).max(-controller.max_fall_speed);
        }
    }
}

/// Система интеграции velocity → Transform
///
/// Позиция + facing rotation. Rapier (если есть) только разрешает коллизии.
pub fn integrate_velocity_to_transform(
    mut query: Query<(&mut CharacterBody, &mut Transform), With<KinematicController>>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (mut body, mut transform) in query.iter_mut() {
        if !body.velocity.is_finite() {
            crate::log_error(&format!("CharacterBody velocity is not finite ({:?}), reset", body.velocity));
            body.velocity = Vec3::ZERO;
        }

        transform.translation += body.velocity * delta;
        transform.rotation = body.facing_rotation();
        body.movement_speed = body.horizontal_speed();
    }
}

/// Зеркалим velocity в Rapier `Velocity` (только у entity с Rapier телом)
pub fn sync_velocity_to_rapier(
    mut query: Query<(&CharacterBody, &mut Velocity), With<KinematicController>>,
) {
    for (body, mut rapier_velocity) in query.iter_mut() {
        rapier_velocity.linvel = body.velocity;
    }
}
