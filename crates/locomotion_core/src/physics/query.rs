//! Physics world query interface (raycast)
//!
//! Locomotion core не владеет физическим миром, только спрашивает его:
//! - click-навигация: луч из камеры в землю
//! - ground probe: луч вниз из персонажа
//!
//! Backend выбирается resource'ом `RaycastBackend`:
//! - Rapier - настоящий query через bevy_rapier3d
//! - GroundPlane - аналитическая плоскость (headless, тесты)
//! - Disabled - каждый query = miss (физика недоступна)

use bevy::prelude::*;
use bevy_rapier3d::prelude::{CollisionGroups, Group, QueryFilter, RapierContext, ReadRapierContext};
use serde::{Deserialize, Serialize};

/// Битовая маска слоёв коллизий
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect, Serialize, Deserialize)]
pub struct CollisionMask(pub u32);

impl CollisionMask {
    pub const GROUND: Self = Self(1 << 0);
    pub const ENVIRONMENT: Self = Self(1 << 1);
    pub const ACTORS: Self = Self(1 << 2);

    /// Маска по умолчанию для клика и ground probe
    pub const WALKABLE: Self = Self(Self::GROUND.0 | Self::ENVIRONMENT.0);

    pub fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }
}

impl Default for CollisionMask {
    fn default() -> Self {
        Self::WALKABLE
    }
}

/// Параметры одного raycast
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayQuery {
    pub origin: Vec3,
    pub direction: Vec3,
    pub max_distance: f32,
    pub mask: CollisionMask,
    /// Не попадать в собственный collider
    pub exclude: Option<Entity>,
}

/// Попадание луча
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub point: Vec3,
    pub distance: f32,
}

/// Синхронный bounded query к физическому миру
///
/// Никогда не паникует: недоступный мир = None (miss).
pub trait PhysicsQuery {
    fn cast_ray(&self, query: &RayQuery) -> Option<RayHit>;
}

/// Бесконечная горизонтальная плоскость на высоте `height` (слой GROUND)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundPlane {
    pub height: f32,
}

impl PhysicsQuery for GroundPlane {
    fn cast_ray(&self, query: &RayQuery) -> Option<RayHit> {
        if !query.mask.intersects(CollisionMask::GROUND) {
            return None;
        }

        let direction = query.direction.normalize_or_zero();
        // Луч параллелен плоскости или смотрит от неё
        if direction.y.abs() <= f32::EPSILON {
            return None;
        }

        let distance = (self.height - query.origin.y) / direction.y;
        if !distance.is_finite() || distance < 0.0 || distance > query.max_distance {
            return None;
        }

        Some(RayHit {
            point: query.origin + direction * distance,
            distance,
        })
    }
}

/// Rapier query (bevy_rapier3d context)
pub struct RapierQuery<'a, 'w> {
    pub context: &'a RapierContext<'w>,
}

impl PhysicsQuery for RapierQuery<'_, '_> {
    fn cast_ray(&self, query: &RayQuery) -> Option<RayHit> {
        let direction = query.direction.normalize_or_zero();
        if direction == Vec3::ZERO {
            return None;
        }

        let mut filter = QueryFilter::default().groups(CollisionGroups::new(
            Group::ALL,
            Group::from_bits_truncate(query.mask.0),
        ));
        // Свой collider может висеть и без RigidBody, исключаем оба варианта
        if let Some(entity) = query.exclude {
            filter = filter.exclude_collider(entity).exclude_rigid_body(entity);
        }

        self.context
            .cast_ray(query.origin, direction, query.max_distance, true, filter)
            .map(|(_, distance)| RayHit {
                point: query.origin + direction * distance,
                distance,
            })
    }
}

/// Какой physics query использовать
#[derive(Resource, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Resource)]
pub enum RaycastBackend {
    /// bevy_rapier3d (RapierPhysicsPlugin должен быть добавлен хостом)
    Rapier,
    /// Аналитическая плоскость (headless симуляция без Rapier)
    GroundPlane { height: f32 },
    /// Физика недоступна: каждый raycast = miss
    Disabled,
}

impl Default for RaycastBackend {
    fn default() -> Self {
        Self::Rapier
    }
}

impl RaycastBackend {
    /// Выполнить `f` с physics query текущего backend
    ///
    /// Rapier context отсутствует (plugin не добавлен) → `None`, т.е. miss.
    pub fn with_query<R>(
        &self,
        rapier: &ReadRapierContext,
        f: impl FnOnce(Option<&dyn PhysicsQuery>) -> R,
    ) -> R {
        match *self {
            RaycastBackend::GroundPlane { height } => f(Some(&GroundPlane { height })),
            RaycastBackend::Rapier => match rapier.single() {
                Ok(context) => f(Some(&RapierQuery { context: &context })),
                Err(_) => f(None),
            },
            RaycastBackend::Disabled => f(None),
        }
    }

    /// Может ли backend вообще отвечать на query (для setup report)
    pub fn is_available(&self, rapier: &ReadRapierContext) -> bool {
        match self {
            RaycastBackend::GroundPlane { .. } => true,
            RaycastBackend::Rapier => rapier.single().is_ok(),
            RaycastBackend::Disabled => false,
        }
    }
}
