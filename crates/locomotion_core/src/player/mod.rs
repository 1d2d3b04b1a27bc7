//! Player control marker component
//!
//! Отмечает персонажа, которым управляет игрок через InputSnapshot.

use bevy::prelude::*;

/// Marker component для player-controlled персонажа
///
/// - С этим компонентом: direct/gamepad оси, pointer события, jump press
///   и mode events из `InputSnapshot`
/// - Без него: персонаж двигается только через `JumpIntent` events
///   и навигацию, выставленную извне
///
/// # Possession
/// Переключение контроля между персонажами:
/// ```ignore
/// commands.entity(old_character).remove::<Player>();
/// commands.entity(new_character).insert(Player);
/// ```
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Player;
