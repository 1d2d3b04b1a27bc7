//! Character state machine: состояния, handler table, transition function
//!
//! Состояния - закрытый enum, поведение состояния - строка в `STATE_HANDLERS`
//! (индекс = discriminant). Никаких trait objects и runtime регистрации.
//!
//! Transition table (приоритет сверху вниз):
//! 1. !grounded и state ≠ Airborne → Airborne (падение вытесняет всё)
//! 2. grounded и state == Airborne → Landing (старт landing таймера)
//! 3. Landing: есть intent → Walking/Running сразу, иначе countdown → Idle
//!    чуть раньше нуля (blend lead)
//! 4. grounded, moving, state ≠ нужный locomotion state → Walking/Running
//! 5. grounded, !moving, state ≠ Idle → Idle
//!
//! Jumping не достижим через таблицу: только `force` после разрешения JumpState.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Дискретное состояние персонажа
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect, Serialize)]
pub enum CharacterState {
    #[default]
    Idle,
    Walking,
    Running,
    Jumping,
    Airborne,
    Landing,
}

impl CharacterState {
    pub const ALL: [CharacterState; 6] = [
        CharacterState::Idle,
        CharacterState::Walking,
        CharacterState::Running,
        CharacterState::Jumping,
        CharacterState::Airborne,
        CharacterState::Landing,
    ];

    pub fn handler(self) -> &'static StateHandler {
        &STATE_HANDLERS[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.handler().name
    }

    pub fn control(self) -> ControlProfile {
        self.handler().control
    }
}

impl fmt::Display for CharacterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Какие константы ускорения применяет integrator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect, Serialize)]
pub enum ControlProfile {
    Ground,
    /// Пониженный air control
    Air,
}

/// Поведение одного состояния
pub struct StateHandler {
    pub state: CharacterState,
    pub name: &'static str,
    pub control: ControlProfile,
    /// Состояние гоняет landing countdown (quick cancel по intent)
    pub landing_countdown: bool,
    /// Значение landing таймера при входе в состояние
    pub enter_timer: fn(&StateMachineConfig) -> f32,
}

fn no_timer(_: &StateMachineConfig) -> f32 {
    0.0
}

fn landing_timer(config: &StateMachineConfig) -> f32 {
    config.landing_duration
}

/// Handler table, индекс = `CharacterState as usize`
pub static STATE_HANDLERS: [StateHandler; 6] = [
    StateHandler {
        state: CharacterState::Idle,
        name: "Idle",
        control: ControlProfile::Ground,
        landing_countdown: false,
        enter_timer: no_timer,
    },
    StateHandler {
        state: CharacterState::Walking,
        name: "Walking",
        control: ControlProfile::Ground,
        landing_countdown: false,
        enter_timer: no_timer,
    },
    StateHandler {
        state: CharacterState::Running,
        name: "Running",
        control: ControlProfile::Ground,
        landing_countdown: false,
        enter_timer: no_timer,
    },
    StateHandler {
        state: CharacterState::Jumping,
        name: "Jumping",
        control: ControlProfile::Air,
        landing_countdown: false,
        enter_timer: no_timer,
    },
    StateHandler {
        state: CharacterState::Airborne,
        name: "Airborne",
        control: ControlProfile::Air,
        landing_countdown: false,
        enter_timer: no_timer,
    },
    StateHandler {
        state: CharacterState::Landing,
        name: "Landing",
        control: ControlProfile::Ground,
        landing_countdown: true,
        enter_timer: landing_timer,
    },
];

/// Параметры state machine
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
#[serde(default)]
pub struct StateMachineConfig {
    /// Горизонтальная скорость, выше которой персонаж "движется" (m/s)
    pub movement_threshold: f32,
    /// Длительность landing позы (секунды)
    pub landing_duration: f32,
    /// Переход Landing → Idle на столько раньше нуля (pre-emptive blend)
    pub landing_blend_lead: f32,
}

impl Default for StateMachineConfig {
    fn default() -> Self {
        Self {
            movement_threshold: 0.1,
            landing_duration: 0.2,
            landing_blend_lead: 0.05,
        }
    }
}

/// Всё, от чего зависит переход (ничего скрытого)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TransitionInputs {
    pub grounded: bool,
    /// intent активен ИЛИ горизонтальная скорость > movement_threshold
    pub moving: bool,
    pub intent_active: bool,
    pub run_mode: bool,
    pub landing_timer: f32,
    pub delta: f32,
}

/// Результат transition function
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub next: CharacterState,
    pub landing_timer: f32,
}

impl Transition {
    fn enter(next: CharacterState, config: &StateMachineConfig) -> Self {
        Self {
            next,
            landing_timer: (next.handler().enter_timer)(config),
        }
    }

    fn stay(current: CharacterState, landing_timer: f32) -> Self {
        Self {
            next: current,
            landing_timer,
        }
    }
}

/// Pure transition function
pub fn next_state(
    current: CharacterState,
    inputs: &TransitionInputs,
    config: &StateMachineConfig,
) -> Transition {
    let locomotion = if inputs.run_mode {
        CharacterState::Running
    } else {
        CharacterState::Walking
    };

    // 1. Падение вытесняет любое состояние
    if !inputs.grounded {
        return if current == CharacterState::Airborne {
            Transition::stay(current, inputs.landing_timer)
        } else {
            Transition::enter(CharacterState::Airborne, config)
        };
    }

    // 2. Приземление
    if current == CharacterState::Airborne {
        return Transition::enter(CharacterState::Landing, config);
    }

    // 3. Landing: quick cancel или countdown
    if current.handler().landing_countdown {
        if inputs.intent_active {
            return Transition::enter(locomotion, config);
        }
        let remaining = inputs.landing_timer - inputs.delta;
        return if remaining <= config.landing_blend_lead {
            Transition::enter(CharacterState::Idle, config)
        } else {
            Transition::stay(current, remaining)
        };
    }

    // 4. Движемся
    if inputs.moving {
        return if current != locomotion {
            Transition::enter(locomotion, config)
        } else {
            Transition::stay(current, inputs.landing_timer)
        };
    }

    // 5. Стоим
    if current != CharacterState::Idle {
        return Transition::enter(CharacterState::Idle, config);
    }

    Transition::stay(current, inputs.landing_timer)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn grounded(moving: bool) -> TransitionInputs {
        TransitionInputs {
            grounded: true,
            moving,
            intent_active: moving,
            run_mode: false,
            landing_timer: 0.0,
            delta: DT,
        }
    }

    #[test]
    fn test_handler_table_matches_enum_order() {
        for state in CharacterState::ALL {
            assert_eq!(state.handler().state, state);
        }
        assert_eq!(CharacterState::Jumping.control(), ControlProfile::Air);
        assert_eq!(CharacterState::Landing.control(), ControlProfile::Ground);
        assert_eq!(CharacterState::Running.to_string(), "Running");
    }

    #[test]
    fn test_fall_preempts_every_state() {
        let config = StateMachineConfig::default();
        let airborne = TransitionInputs {
            grounded: false,
            ..grounded(true)
        };

        for state in CharacterState::ALL {
            let transition = next_state(state, &airborne, &config);
            assert_eq!(transition.next, CharacterState::Airborne, "from {:?}", state);
        }
    }

    #[test]
    fn test_airborne_lands_with_timer() {
        let config = StateMachineConfig::default();
        let transition = next_state(CharacterState::Airborne, &grounded(false), &config);
        assert_eq!(transition.next, CharacterState::Landing);
        assert_eq!(transition.landing_timer, config.landing_duration);
    }

    #[test]
    fn test_landing_quick_cancel_with_intent() {
        let config = StateMachineConfig::default();
        let mut inputs = grounded(true);
        inputs.landing_timer = config.landing_duration;
        inputs.run_mode = true;

        let transition = next_state(CharacterState::Landing, &inputs, &config);
        assert_eq!(transition.next, CharacterState::Running);
    }

    #[test]
    fn test_landing_countdown_blends_before_zero() {
        let config = StateMachineConfig::default();
        let first = next_state(CharacterState::Airborne, &grounded(false), &config);
        let mut state = first.next;
        let mut timer = first.landing_timer;
        let mut ticks_in_landing = 0;

        while state == CharacterState::Landing {
            let mut inputs = grounded(false);
            inputs.landing_timer = timer;
            let transition = next_state(state, &inputs, &config);
            state = transition.next;
            timer = transition.landing_timer;
            ticks_in_landing += 1;
            assert!(ticks_in_landing < 100, "landing never ended");
        }

        assert_eq!(state, CharacterState::Idle);
        // (0.2 - 0.05) / (1/60) = 9 тиков countdown
        let expected = ((config.landing_duration - config.landing_blend_lead) / DT).ceil() as i32;
        assert!((ticks_in_landing - expected).abs() <= 1, "ticks = {}", ticks_in_landing);
    }

    #[test]
    fn test_walking_running_idle() {
        let config = StateMachineConfig::default();

        assert_eq!(next_state(CharacterState::Idle, &grounded(true), &config).next, CharacterState::Walking);

        let mut run = grounded(true);
        run.run_mode = true;
        assert_eq!(next_state(CharacterState::Walking, &run, &config).next, CharacterState::Running);
        assert_eq!(next_state(CharacterState::Running, &grounded(true), &config).next, CharacterState::Walking);

        assert_eq!(next_state(CharacterState::Running, &grounded(false), &config).next, CharacterState::Idle);
        assert_eq!(next_state(CharacterState::Idle, &grounded(false), &config).next, CharacterState::Idle);
    }

    #[test]
    fn test_jumping_grounded_resolves_to_locomotion() {
        let config = StateMachineConfig::default();
        assert_eq!(next_state(CharacterState::Jumping, &grounded(false), &config).next, CharacterState::Idle);
        assert_eq!(next_state(CharacterState::Jumping, &grounded(true), &config).next, CharacterState::Walking);
    }

    #[test]
    fn test_transition_is_pure() {
        let config = StateMachineConfig::default();
        let inputs = TransitionInputs {
            grounded: true,
            moving: false,
            intent_active: false,
            run_mode: true,
            landing_timer: 0.12,
            delta: DT,
        };

        for state in CharacterState::ALL {
            let a = next_state(state, &inputs, &config);
            let b = next_state(state, &inputs, &config);
            assert_eq!(a, b);
        }
    }
}
