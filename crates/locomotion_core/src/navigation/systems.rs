//! Navigation systems

use bevy::prelude::*;
use bevy_rapier3d::prelude::ReadRapierContext;

use super::events::{CancelNavigation, NavigationEvent};
use super::raycast::cast_screen_point;
use super::resolver::{ClickNavigator, NavigationConfig, NavigationEventKind};
use crate::input::{InputSnapshot, PointerEvent};
use crate::physics::RaycastBackend;
use crate::player::Player;
use crate::shared::{active_camera, LocomotionCamera};

fn log_navigation(entity: Entity, kind: &NavigationEventKind) {
    match kind {
        NavigationEventKind::DestinationSet(point) => crate::log(&format!(
            "📍 {:?} destination set: ({:.2}, {:.2}, {:.2})",
            entity, point.x, point.y, point.z
        )),
        NavigationEventKind::Arrived(point) => crate::log(&format!(
            "🏁 {:?} arrived at ({:.2}, {:.2}, {:.2})",
            entity, point.x, point.y, point.z
        )),
        NavigationEventKind::Cancelled => crate::log(&format!("❌ {:?} navigation cancelled", entity)),
        // Drag обновления и очистка marker'а слишком частые для лога
        NavigationEventKind::DestinationUpdated(_) | NavigationEventKind::Cleared => {}
    }
}

/// Система: явная отмена навигации (Input set)
///
/// CancelNavigation event - любой entity, snapshot.cancel_navigation - только player.
pub fn apply_navigation_cancels(
    mut requests: EventReader<CancelNavigation>,
    snapshot: Res<InputSnapshot>,
    mut navigators: Query<(Entity, &mut ClickNavigator, Has<Player>)>,
    mut nav_events: EventWriter<NavigationEvent>,
) {
    let requested: Vec<Entity> = requests.read().map(|request| request.entity).collect();

    if requested.is_empty() && !snapshot.cancel_navigation {
        return;
    }

    for (entity, mut navigator, is_player) in navigators.iter_mut() {
        let wants_cancel = requested.contains(&entity) || (is_player && snapshot.cancel_navigation);
        if wants_cancel && navigator.cancel() {
            let kind = NavigationEventKind::Cancelled;
            log_navigation(entity, &kind);
            nav_events.write(NavigationEvent { entity, kind });
        }
    }
}

/// Система: таймеры, pointer события, arrival (Navigation set)
///
/// Pointer события из snapshot получает только player персонаж.
pub fn update_click_navigation(
    mut navigators: Query<(Entity, &mut ClickNavigator, &NavigationConfig, &Transform, Has<Player>)>,
    cameras: Query<(&LocomotionCamera, &Transform)>,
    snapshot: Res<InputSnapshot>,
    backend: Res<RaycastBackend>,
    rapier: ReadRapierContext,
    time: Res<Time<Fixed>>,
    mut nav_events: EventWriter<NavigationEvent>,
) {
    let delta = time.delta_secs();
    let now = time.elapsed_secs_f64();
    let camera = active_camera(cameras.iter());

    backend.with_query(&rapier, |physics| {
        for (entity, mut navigator, config, transform, is_player) in navigators.iter_mut() {
            let mut emitted: Vec<NavigationEventKind> = Vec::new();

            emitted.extend(navigator.advance_timers(delta));

            if is_player {
                for pointer in &snapshot.pointer_events {
                    let kind = match *pointer {
                        PointerEvent::Pressed { position } => {
                            let hit = cast_screen_point(camera, physics, position, config);
                            navigator.pointer_pressed(position, hit, now, config)
                        }
                        PointerEvent::Moved { position } => navigator.pointer_moved(
                            position,
                            |screen| cast_screen_point(camera, physics, screen, config),
                            config,
                        ),
                        PointerEvent::Released { .. } => {
                            navigator.pointer_released();
                            None
                        }
                    };
                    emitted.extend(kind);
                }
            }

            emitted.extend(navigator.check_arrival(transform.translation, config));

            for kind in emitted {
                log_navigation(entity, &kind);
                nav_events.write(NavigationEvent { entity, kind });
            }
        }
    });
}
