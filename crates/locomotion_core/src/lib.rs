//! Locomotion Core
//!
//! ECS-симуляция передвижения персонажа на Bevy 0.16 (headless)
//!
//! Каждый fixed tick:
//! - InputSnapshot + click-навигация → один MovementIntent (арбитр)
//! - state machine выбирает состояние и control profile
//! - integrator двигает velocity, kinematic controller - Transform
//!
//! Камера, анимация, HUD - внешние потребители telemetry и events.

use bevy::prelude::*;

// Публичные модули
pub mod character;
pub mod config;
pub mod input;
pub mod jump;
pub mod logger;
pub mod movement;
pub mod navigation;
pub mod physics;
pub mod player;
pub mod setup;
pub mod shared;
pub mod state_machine;
pub mod telemetry;

// Re-export основных типов для удобства
pub use character::{spawn_locomotion_character, LocomotionCharacter};
pub use config::{ConfigError, LocomotionConfig};
pub use input::{ArbiterConfig, InputArbiter, InputSnapshot, IntentSource, ModeEvent, MovementIntent};
pub use jump::{JumpConfig, JumpIntent, JumpPerformed, JumpState};
pub use logger::*;
pub use movement::{MovementConfig, MovementModes};
pub use navigation::{CancelNavigation, ClickNavigator, NavigationConfig, NavigationEvent, NavigationPhase};
pub use physics::{CharacterBody, GroundStateChanged, KinematicController, RaycastBackend};
pub use player::Player;
pub use setup::{validate_setup, SetupReport};
pub use shared::{CameraBasis, LocomotionCamera};
pub use state_machine::{CharacterState, CharacterStateMachine, StateChanged, StateMachineConfig};
pub use telemetry::{DebugSnapshot, LocomotionTelemetry};

/// Фазы fixed tick (строго по порядку)
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocomotionSet {
    /// Setup report, ground probe, jump bookkeeping
    Sense,
    /// Mode events, jump intents, cancel requests
    Input,
    /// Pointer → raycast → NavigationTarget, arrival
    Navigation,
    /// Один MovementIntent на персонажа
    Arbitration,
    /// Transition table, затем разрешённые прыжки
    StateEvaluation,
    /// Horizontal velocity + facing
    Integration,
    /// Gravity, velocity → Transform, Rapier sync
    Physics,
    /// Telemetry, очистка edge input
    Telemetry,
}

/// Главный plugin locomotion (все подсистемы)
pub struct LocomotionPlugin;

impl Plugin for LocomotionPlugin {
    fn build(&self, app: &mut App) {
        app
            // Fixed timestep 60Hz для simulation tick
            .insert_resource(Time::<Fixed>::from_hz(60.0))
            .init_resource::<InputSnapshot>()
            .init_resource::<RaycastBackend>()
            .init_resource::<SetupReport>()
            .add_event::<GroundStateChanged>()
            .add_event::<JumpIntent>()
            .add_event::<JumpPerformed>()
            .add_event::<StateChanged>()
            .add_event::<NavigationEvent>()
            .add_event::<CancelNavigation>()
            .register_type::<LocomotionCharacter>()
            .register_type::<Player>()
            .register_type::<MovementIntent>()
            .register_type::<InputArbiter>()
            .register_type::<ArbiterConfig>()
            .register_type::<ClickNavigator>()
            .register_type::<NavigationConfig>()
            .register_type::<JumpState>()
            .register_type::<JumpConfig>()
            .register_type::<CharacterBody>()
            .register_type::<KinematicController>()
            .register_type::<MovementConfig>()
            .register_type::<MovementModes>()
            .register_type::<CharacterStateMachine>()
            .register_type::<StateMachineConfig>()
            .register_type::<LocomotionTelemetry>()
            .register_type::<LocomotionCamera>()
            .register_type::<RaycastBackend>()
            .register_type::<SetupReport>()
            .configure_sets(
                FixedUpdate,
                (
                    LocomotionSet::Sense,
                    LocomotionSet::Input,
                    LocomotionSet::Navigation,
                    LocomotionSet::Arbitration,
                    LocomotionSet::StateEvaluation,
                    LocomotionSet::Integration,
                    LocomotionSet::Physics,
                    LocomotionSet::Telemetry,
                )
                    .chain(),
            )
            .add_systems(
                FixedUpdate,
                (
                    // Фаза 1: что вокруг (ground probe по позиции прошлого tick)
                    (
                        setup::refresh_setup_report,
                        physics::ground_detection,
                        jump::update_jump_bookkeeping,
                    )
                        .chain()
                        .in_set(LocomotionSet::Sense),
                    // Фаза 2: edge input
                    (
                        movement::apply_mode_events,
                        jump::emit_jump_intents,
                        navigation::apply_navigation_cancels,
                    )
                        .chain()
                        .in_set(LocomotionSet::Input),
                    // Фаза 3: click/drag навигация
                    navigation::update_click_navigation.in_set(LocomotionSet::Navigation),
                    // Фаза 4: арбитраж
                    input::arbitrate_movement_intent.in_set(LocomotionSet::Arbitration),
                    // Фаза 5: state machine, прыжок форсирует Jumping после таблицы
                    (
                        state_machine::evaluate_character_state,
                        jump::perform_requested_jumps,
                    )
                        .chain()
                        .in_set(LocomotionSet::StateEvaluation),
                    // Фаза 6: integrator
                    movement::integrate_movement.in_set(LocomotionSet::Integration),
                    // Фаза 7: kinematic controller
                    (
                        physics::apply_gravity,
                        physics::integrate_velocity_to_transform,
                        physics::sync_velocity_to_rapier,
                    )
                        .chain()
                        .in_set(LocomotionSet::Physics),
                    // Фаза 8: telemetry, edge input прочитан всеми
                    (telemetry::publish_telemetry, input::clear_input_edges)
                        .chain()
                        .in_set(LocomotionSet::Telemetry),
                ),
            );
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// Без Rapier: ground probe и клики идут в плоскость y = 0.
pub fn create_headless_app() -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .add_plugins(LocomotionPlugin)
        .insert_resource(RaycastBackend::GroundPlane { height: 0.0 });

    app
}

/// Один fixed tick вручную (детерминированно, без wall clock)
///
/// После tick свапаем буферы locomotion events (в полном App это делает `First`):
/// events tick N читаются до конца tick N+1, дальше отбрасываются.
pub fn step_fixed(app: &mut App) {
    let world = app.world_mut();
    let timestep = world.resource::<Time<Fixed>>().timestep();
    world.resource_mut::<Time<Fixed>>().advance_by(timestep);
    world.run_schedule(FixedUpdate);
    update_locomotion_events(world);
}

/// Double buffer swap для всех events, которые регистрирует `LocomotionPlugin`
fn update_locomotion_events(world: &mut World) {
    fn swap<E: Event>(world: &mut World) {
        if let Some(mut events) = world.get_resource_mut::<Events<E>>() {
            events.update();
        }
    }

    swap::<GroundStateChanged>(world);
    swap::<JumpIntent>(world);
    swap::<JumpPerformed>(world);
    swap::<StateChanged>(world);
    swap::<NavigationEvent>(world);
    swap::<CancelNavigation>(world);
}

/// Spawn персонажа прямо в World (headless runner, тесты)
pub fn spawn_character(app: &mut App, position: Vec3, config: &LocomotionConfig) -> Entity {
    let world = app.world_mut();
    let entity = {
        let mut commands = world.commands();
        spawn_locomotion_character(&mut commands, position, config)
    };
    world.flush();
    entity
}
