//! CharacterBody - физическое состояние персонажа
//!
//! Позиция живёт в Transform. Здесь только то, что пишут integrator
//! и physics step (gravity / ground probe).

use bevy::prelude::*;

/// Физическое состояние персонажа
///
/// Пишут: movement integrator (velocity.xz, facing_yaw), physics step
/// (velocity.y, is_grounded, floor_height, movement_speed).
/// Все остальные только читают.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct CharacterBody {
    /// Скорость (m/s)
    pub velocity: Vec3,
    /// На земле (результат ground probe этого tick)
    pub is_grounded: bool,
    /// Горизонтальная скорость (m/s), пересчитывается после integration
    pub movement_speed: f32,
    /// Куда смотрит персонаж (yaw вокруг +Y, forward = -Z при 0)
    pub facing_yaw: f32,
    /// Высота пола под персонажем (Some только когда grounded)
    pub floor_height: Option<f32>,
}

impl CharacterBody {
    pub fn horizontal_velocity(&self) -> Vec3 {
        Vec3::new(self.velocity.x, 0.0, self.velocity.z)
    }

    pub fn horizontal_speed(&self) -> f32 {
        self.horizontal_velocity().length()
    }

    pub fn facing_rotation(&self) -> Quat {
        Quat::from_rotation_y(self.facing_yaw)
    }
}
