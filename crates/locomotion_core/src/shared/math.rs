//! Vector helpers без NaN
//!
//! Нормализация нулевого/NaN вектора всегда даёт ZERO, никогда не пропускаем NaN
//! в velocity или intent.

use bevy::prelude::*;
use std::f32::consts::{PI, TAU};

/// Допуск для сравнения накопленных f32 таймеров с интервалами
///
/// 3 × (1/60) в f32 даёт 0.049999997, а не 0.05.
pub const TIMER_EPSILON: f32 = 1e-4;

/// Unit vector или ZERO (для zero-length и non-finite входа)
pub fn safe_normalize_2d(v: Vec2) -> Vec2 {
    if !v.is_finite() {
        return Vec2::ZERO;
    }
    v.normalize_or_zero()
}

/// Проекция на горизонтальную плоскость (y отбрасываем) + normalize
pub fn flatten(v: Vec3) -> Vec3 {
    if !v.is_finite() {
        return Vec3::ZERO;
    }
    Vec3::new(v.x, 0.0, v.z).normalize_or_zero()
}

/// Горизонтальная (XZ) компонента без нормализации
pub fn horizontal(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Расстояние в плоскости XZ (высота не учитывается)
pub fn planar_distance(a: Vec3, b: Vec3) -> f32 {
    Vec2::new(a.x - b.x, a.z - b.z).length()
}

/// Линейное приближение `current` к `target` не больше чем на `max_delta`
pub fn move_toward(current: Vec3, target: Vec3, max_delta: f32) -> Vec3 {
    let offset = target - current;
    let distance = offset.length();
    if distance <= max_delta || distance <= f32::EPSILON {
        target
    } else {
        current + offset / distance * max_delta
    }
}

/// Кратчайшая разница углов в [-PI, PI]
pub fn angle_difference(from: f32, to: f32) -> f32 {
    let diff = (to - from) % TAU;
    (2.0 * diff) % TAU - diff
}

/// Интерполяция угла по кратчайшей дуге
pub fn lerp_angle(from: f32, to: f32, weight: f32) -> f32 {
    let result = from + angle_difference(from, to) * weight.clamp(0.0, 1.0);
    // держим yaw в [-PI, PI], чтобы не копить обороты
    if result > PI {
        result - TAU
    } else if result < -PI {
        result + TAU
    } else {
        result
    }
}

/// Yaw (вокруг +Y), при котором forward (-Z) смотрит вдоль `direction`
pub fn yaw_from_direction(direction: Vec3) -> f32 {
    (-direction.x).atan2(-direction.z)
}

/// Вес экспоненциального сглаживания: не зависит от частоты тиков
pub fn smoothing_weight(rate: f32, delta: f32) -> f32 {
    if rate <= 0.0 || delta <= 0.0 {
        return 0.0;
    }
    1.0 - (-rate * delta).exp()
}
