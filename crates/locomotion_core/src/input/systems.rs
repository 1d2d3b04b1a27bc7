//! Input arbitration system

use bevy::prelude::*;

use super::arbiter::{resolve_intent, ArbiterConfig, ArbitrationInput, InputArbiter, NavigationSample};
use super::intent::MovementIntent;
use super::snapshot::InputSnapshot;
use crate::navigation::{ClickNavigator, NavigationEvent, NavigationEventKind};
use crate::player::Player;
use crate::shared::{active_basis, LocomotionCamera};

/// Система: один MovementIntent на персонажа за tick (Arbitration set)
///
/// Direct/gamepad оси читает только player персонаж; остальные
/// (scripted, NPC) двигаются только навигацией.
/// Override навигации отменяется здесь же, в этом tick.
pub fn arbitrate_movement_intent(
    mut query: Query<(
        Entity,
        &mut MovementIntent,
        &mut InputArbiter,
        &ArbiterConfig,
        &Transform,
        Option<&mut ClickNavigator>,
        Has<Player>,
    )>,
    cameras: Query<(&LocomotionCamera, &Transform)>,
    snapshot: Res<InputSnapshot>,
    time: Res<Time<Fixed>>,
    mut nav_events: EventWriter<NavigationEvent>,
) {
    let delta = time.delta_secs();
    let now = time.elapsed_secs_f64();
    let basis = active_basis(cameras.iter());

    for (entity, mut intent, mut arbiter, config, transform, navigator, is_player) in query.iter_mut() {
        let navigation = navigator.as_deref().map(|navigator| NavigationSample {
            active: navigator.is_active(),
            vector: navigator.movement_vector(transform.translation, &basis),
            override_allowed: navigator.override_allowed(),
        });

        let input = ArbitrationInput {
            direct_axis: snapshot.direct_axis.filter(|_| is_player),
            gamepad_axis: snapshot.gamepad_axis.filter(|_| is_player),
            navigation,
        };

        let arbitration = resolve_intent(&input, config.deadzone, now);

        if arbitration.cancel_navigation {
            if let Some(mut navigator) = navigator {
                navigator.cancel();
            }
            crate::log(&format!(
                "🎮 {:?} direct input overrides click navigation ({:?})",
                entity,
                arbitration.intent.source()
            ));
            nav_events.write(NavigationEvent {
                entity,
                kind: NavigationEventKind::Cancelled,
            });
        }

        if arbiter.record(&arbitration, config, delta) {
            crate::log(&format!(
                "🎮 {:?} intent source: {:?}",
                entity,
                arbitration.intent.source()
            ));
        }

        *intent = arbitration.intent;
    }
}
