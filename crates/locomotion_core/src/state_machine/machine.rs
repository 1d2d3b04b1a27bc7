//! CharacterStateMachine component + StateChanged event

use bevy::prelude::*;

use super::states::{CharacterState, StateMachineConfig, Transition};

/// Текущее состояние персонажа
///
/// Всегда ровно одно состояние, previous определён с первого tick
/// (стартуем Idle → Idle).
#[derive(Component, Debug, Clone, Copy, PartialEq, Default, Reflect)]
#[reflect(Component)]
pub struct CharacterStateMachine {
    pub current: CharacterState,
    pub previous: CharacterState,
    /// Оставшееся время landing позы (секунды)
    pub landing_timer: f32,
    /// Счётчик переходов (telemetry)
    pub transitions: u32,
}

impl CharacterStateMachine {
    /// Применить результат `next_state`
    ///
    /// Returns `Some((old, new))` если состояние сменилось.
    pub fn apply(&mut self, transition: Transition) -> Option<(CharacterState, CharacterState)> {
        self.landing_timer = transition.landing_timer;
        self.switch(transition.next)
    }

    /// Принудительный переход (authorized jump)
    pub fn force(
        &mut self,
        state: CharacterState,
        config: &StateMachineConfig,
    ) -> Option<(CharacterState, CharacterState)> {
        self.landing_timer = (state.handler().enter_timer)(config);
        self.switch(state)
    }

    fn switch(&mut self, next: CharacterState) -> Option<(CharacterState, CharacterState)> {
        if next == self.current {
            return None;
        }

        let old = self.current;
        self.previous = old;
        self.current = next;
        self.transitions += 1;
        Some((old, next))
    }
}

/// Event: смена состояния (animation tree, HUD)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct StateChanged {
    pub entity: Entity,
    pub old: CharacterState,
    pub new: CharacterState,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_tracks_previous() {
        let mut machine = CharacterStateMachine::default();

        let changed = machine.apply(Transition {
            next: CharacterState::Walking,
            landing_timer: 0.0,
        });
        assert_eq!(changed, Some((CharacterState::Idle, CharacterState::Walking)));
        assert_eq!(machine.previous, CharacterState::Idle);

        // Тот же state → не переход
        let same = machine.apply(Transition {
            next: CharacterState::Walking,
            landing_timer: 0.0,
        });
        assert_eq!(same, None);
        assert_eq!(machine.transitions, 1);
    }

    #[test]
    fn test_force_sets_entry_timer() {
        let config = StateMachineConfig::default();
        let mut machine = CharacterStateMachine::default();

        machine.force(CharacterState::Landing, &config);
        assert_eq!(machine.landing_timer, config.landing_duration);

        machine.force(CharacterState::Jumping, &config);
        assert_eq!(machine.landing_timer, 0.0);
        assert_eq!(machine.previous, CharacterState::Landing);
    }
}
