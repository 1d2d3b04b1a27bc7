//! Integration тесты: сценарии locomotion в headless App
//!
//! Каждый tick - ручной `step_fixed` (1/60 сек), без wall clock.

use bevy::ecs::event::EventCursor;
use bevy::prelude::*;
use bevy_rapier3d::prelude::{
    Collider, CollisionGroups, Group, NoUserData, RapierPhysicsPlugin, RigidBody, TimestepMode, Velocity,
};
use locomotion_core::navigation::NavigationEventKind;
use locomotion_core::*;

const CLICK_TARGET: Vec3 = Vec3::new(5.0, 0.0, 5.0);

fn player_app() -> (App, Entity) {
    let mut app = create_headless_app();
    let character = spawn_character(&mut app, Vec3::ZERO, &LocomotionConfig::default());
    app.world_mut().entity_mut(character).insert(Player);
    (app, character)
}

/// Top-down камера над CLICK_TARGET: центр экрана попадает ровно в цель
fn spawn_camera_over_target(app: &mut App) -> LocomotionCamera {
    let camera = LocomotionCamera::default();
    app.world_mut().spawn((
        camera,
        Transform::from_xyz(CLICK_TARGET.x, 20.0, CLICK_TARGET.z).looking_at(CLICK_TARGET, Vec3::NEG_Z),
    ));
    camera
}

fn snapshot(app: &mut App) -> Mut<'_, InputSnapshot> {
    app.world_mut().resource_mut::<InputSnapshot>()
}

/// Events одного типа, собранные tick за tick
///
/// `step_fixed` свапает буферы, поэтому читать надо после каждого tick.
struct EventLog<E: Event> {
    cursor: EventCursor<E>,
    events: Vec<E>,
}

impl<E: Event + Clone> EventLog<E> {
    /// Пишет только то, что придёт после создания
    fn new(app: &App) -> Self {
        Self {
            cursor: app.world().resource::<Events<E>>().get_cursor_current(),
            events: Vec::new(),
        }
    }

    fn collect(&mut self, app: &App) {
        let events = app.world().resource::<Events<E>>();
        self.events.extend(self.cursor.read(events).cloned());
    }
}

/// `ticks` шагов с записью одного типа events
fn run_recording<E: Event + Clone>(app: &mut App, ticks: usize, log: &mut EventLog<E>) {
    for _ in 0..ticks {
        step_fixed(app);
        log.collect(app);
    }
}

fn state(app: &App, entity: Entity) -> CharacterState {
    app.world().get::<CharacterStateMachine>(entity).expect("state machine").current
}

fn body(app: &App, entity: Entity) -> CharacterBody {
    *app.world().get::<CharacterBody>(entity).expect("body")
}

fn intent(app: &App, entity: Entity) -> MovementIntent {
    *app.world().get::<MovementIntent>(entity).expect("intent")
}

fn navigator(app: &App, entity: Entity) -> ClickNavigator {
    *app.world().get::<ClickNavigator>(entity).expect("navigator")
}

#[test]
fn test_walk_forward_reaches_walk_speed() {
    let (mut app, character) = player_app();
    let mut changes = EventLog::<StateChanged>::new(&app);

    snapshot(&mut app).set_direct_axis(Vec2::Y);
    run_recording(&mut app, 1, &mut changes);

    // Первый tick с intent → Walking
    assert_eq!(state(&app, character), CharacterState::Walking);
    let changes = changes.events;
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].old, CharacterState::Idle);
    assert_eq!(changes[0].new, CharacterState::Walking);

    for _ in 1..60 {
        step_fixed(&mut app);
    }

    let body = body(&app, character);
    assert!((body.movement_speed - 3.0).abs() < 1e-3, "speed = {}", body.movement_speed);
    assert!(body.is_grounded);

    // Без камеры: вперёд = -Z
    let transform = app.world().get::<Transform>(character).expect("transform");
    assert!(transform.translation.z < -2.0);
    assert!(transform.translation.x.abs() < 1e-4);
    assert_eq!(transform.translation.y, 0.0);

    let telemetry = app.world().get::<LocomotionTelemetry>(character).expect("telemetry");
    assert_eq!(telemetry.current_state, CharacterState::Walking);
    assert!(telemetry.input_direction.y > 0.9);
}

#[test]
fn test_sprint_and_release_to_idle() {
    let (mut app, character) = player_app();

    snapshot(&mut app).set_direct_axis(Vec2::X);
    snapshot(&mut app).push_mode(ModeEvent::SprintStart);
    for _ in 0..60 {
        step_fixed(&mut app);
    }
    assert_eq!(state(&app, character), CharacterState::Running);
    assert!((body(&app, character).movement_speed - 6.0).abs() < 1e-3);

    // Отпустили всё: тормозим (20 m/s²), потом Idle
    snapshot(&mut app).set_direct_axis(Vec2::ZERO);
    snapshot(&mut app).push_mode(ModeEvent::SprintEnd);
    step_fixed(&mut app);
    // Ещё скользим: moving по остаточной скорости, но уже не sprint
    assert_eq!(state(&app, character), CharacterState::Walking);

    for _ in 0..30 {
        step_fixed(&mut app);
    }
    assert_eq!(state(&app, character), CharacterState::Idle);
    assert_eq!(body(&app, character).movement_speed, 0.0);
}

#[test]
fn test_click_to_move_arrives_and_clears() {
    let (mut app, character) = player_app();
    let camera = spawn_camera_over_target(&mut app);
    let center = camera.viewport_size * 0.5;
    let mut nav_events = EventLog::<NavigationEvent>::new(&app);

    snapshot(&mut app).press_pointer(center);
    snapshot(&mut app).release_pointer(center);
    run_recording(&mut app, 1, &mut nav_events);

    let nav = navigator(&app, character);
    assert_eq!(nav.phase(), NavigationPhase::SingleDestination);
    assert!((nav.target().destination - CLICK_TARGET).length() < 1e-3);

    // Intent в input space: вправо-назад (world +X, +Z)
    let first = intent(&app, character);
    assert_eq!(first.source(), IntentSource::ClickNav);
    assert!((first.direction() - Vec2::new(1.0, -1.0).normalize()).length() < 1e-3);

    let mut arrival_tick = None;
    let mut delay_ticks = 0;
    for tick in 0..600 {
        run_recording(&mut app, 1, &mut nav_events);
        let phase = navigator(&app, character).phase();

        if phase == NavigationPhase::ArrivalDelay {
            arrival_tick.get_or_insert(tick);
            delay_ticks += 1;
            assert!(!intent(&app, character).is_active(), "intent during arrival delay");
        }
        if arrival_tick.is_some() && phase == NavigationPhase::Idle {
            break;
        }
    }

    assert!(arrival_tick.is_some(), "never arrived");
    // arrival_delay 0.5 s при 60 Hz
    assert_eq!(delay_ticks, 30);
    assert_eq!(navigator(&app, character).phase(), NavigationPhase::Idle);
    assert_eq!(navigator(&app, character).marker(), None);

    let arrived: Vec<_> = nav_events
        .events
        .iter()
        .filter(|event| matches!(event.kind, NavigationEventKind::Arrived(_)))
        .collect();
    assert_eq!(arrived.len(), 1);

    let position = app.world().get::<Transform>(character).expect("transform").translation;
    let planar = Vec2::new(position.x - CLICK_TARGET.x, position.z - CLICK_TARGET.z).length();
    assert!(planar < 1.0, "stopped {} from target", planar);

    // Остановились → Idle
    for _ in 0..30 {
        step_fixed(&mut app);
    }
    assert_eq!(state(&app, character), CharacterState::Idle);
}

#[test]
fn test_direct_input_overrides_click_after_suppression_window() {
    let (mut app, character) = player_app();
    let camera = spawn_camera_over_target(&mut app);
    let center = camera.viewport_size * 0.5;
    let mut nav_events = EventLog::<NavigationEvent>::new(&app);

    snapshot(&mut app).press_pointer(center);
    snapshot(&mut app).release_pointer(center);
    snapshot(&mut app).set_direct_axis(Vec2::Y);

    let mut sources = Vec::new();
    for _ in 0..10 {
        run_recording(&mut app, 1, &mut nav_events);
        sources.push(intent(&app, character).source());
    }

    // 0.1 s = 6 тиков навигация держит управление
    let first_direct = sources
        .iter()
        .position(|source| *source == IntentSource::Direct)
        .expect("direct never won");
    assert_eq!(first_direct, 6);
    assert!(sources[..6].iter().all(|source| *source == IntentSource::ClickNav));

    let nav = navigator(&app, character);
    assert!(!nav.is_active());
    assert_eq!(nav.phase(), NavigationPhase::Idle);

    let cancelled = nav_events
        .events
        .iter()
        .filter(|event| event.kind == NavigationEventKind::Cancelled)
        .count();
    assert_eq!(cancelled, 1);

    let arbiter = app.world().get::<InputArbiter>(character).expect("arbiter");
    assert_eq!(arbiter.navigation_overrides, 1);
}

#[test]
fn test_cancel_navigation_event_clears_target() {
    let (mut app, character) = player_app();
    let camera = spawn_camera_over_target(&mut app);

    snapshot(&mut app).press_pointer(camera.viewport_size * 0.5);
    step_fixed(&mut app);
    assert_eq!(navigator(&app, character).phase(), NavigationPhase::Previewing);

    app.world_mut().send_event(CancelNavigation { entity: character });
    step_fixed(&mut app);

    let nav = navigator(&app, character);
    assert_eq!(nav.phase(), NavigationPhase::Idle);
    assert!(!nav.is_active());
    assert!(!intent(&app, character).is_active());
}

#[test]
fn test_double_jump_state_sequence() {
    let (mut app, character) = player_app();
    step_fixed(&mut app);

    let mut jumps = EventLog::<JumpPerformed>::new(&app);
    let mut changes = EventLog::<StateChanged>::new(&app);
    let mut ground = EventLog::<GroundStateChanged>::new(&app);
    let mut tick = |app: &mut App, count: usize| {
        for _ in 0..count {
            step_fixed(app);
            jumps.collect(app);
            changes.collect(app);
            ground.collect(app);
        }
    };

    snapshot(&mut app).press_jump();
    tick(&mut app, 1);
    assert_eq!(state(&app, character), CharacterState::Jumping);
    assert_eq!(body(&app, character).velocity.y, 5.0);

    // Следующий tick: ground probe видит подъём → Airborne
    tick(&mut app, 1);
    assert_eq!(state(&app, character), CharacterState::Airborne);

    tick(&mut app, 8);
    snapshot(&mut app).press_jump();
    tick(&mut app, 1);
    assert_eq!(state(&app, character), CharacterState::Jumping);

    // Третий прыжок: прыгать нечем
    tick(&mut app, 5);
    snapshot(&mut app).press_jump();
    tick(&mut app, 1);

    tick(&mut app, 240);

    let jumps = jumps.events;
    assert_eq!(jumps.len(), 2);
    assert!(!jumps[0].is_air_jump);
    assert!(jumps[1].is_air_jump);
    assert_eq!(jumps[1].force, 4.5);

    let sequence: Vec<_> = changes.events.iter().map(|change| change.new).collect();
    assert_eq!(
        sequence,
        vec![
            CharacterState::Jumping,
            CharacterState::Airborne,
            CharacterState::Jumping,
            CharacterState::Airborne,
            CharacterState::Landing,
            CharacterState::Idle,
        ]
    );

    // Один отрыв и одно приземление, air jump фронта не даёт
    assert_eq!(
        ground.events,
        vec![
            GroundStateChanged {
                entity: character,
                is_grounded: false,
            },
            GroundStateChanged {
                entity: character,
                is_grounded: true,
            },
        ]
    );

    // Приземлились: прыжки восстановлены
    let jump = app.world().get::<JumpState>(character).expect("jump");
    assert!(jump.has_ground_jump);
    assert_eq!(jump.air_jumps_remaining, 1);
    assert!(body(&app, character).is_grounded);
    assert_eq!(app.world().get::<Transform>(character).expect("transform").translation.y, 0.0);
}

#[test]
fn test_coyote_jump_after_ground_disappears() {
    let (mut app, character) = player_app();
    step_fixed(&mut app);

    // "Сошли с края": пол пропал
    app.world_mut().insert_resource(RaycastBackend::Disabled);
    for _ in 0..3 {
        step_fixed(&mut app);
    }
    assert_eq!(state(&app, character), CharacterState::Airborne);

    // 3 тика = 0.05 s < 0.15 s coyote окна → ground jump
    let mut jumps = EventLog::<JumpPerformed>::new(&app);
    snapshot(&mut app).press_jump();
    run_recording(&mut app, 1, &mut jumps);

    let jumps = jumps.events;
    assert_eq!(jumps.len(), 1);
    assert!(!jumps[0].is_air_jump);
    let jump = app.world().get::<JumpState>(character).expect("jump");
    assert_eq!(jump.air_jumps_remaining, 1);

    let report = *app.world().resource::<SetupReport>();
    assert!(!report.physics_available);
}

#[test]
fn test_missing_physics_means_airborne() {
    let mut app = create_headless_app();
    // Rapier backend без RapierPhysicsPlugin: каждый raycast = miss
    app.insert_resource(RaycastBackend::Rapier);
    let character = spawn_character(&mut app, Vec3::new(0.0, 2.0, 0.0), &LocomotionConfig::default());

    for _ in 0..10 {
        step_fixed(&mut app);
    }

    assert_eq!(state(&app, character), CharacterState::Airborne);
    assert!(body(&app, character).velocity.y < 0.0);
    assert!(!validate_setup(app.world_mut()).is_valid());
}

#[test]
fn test_non_player_ignores_snapshot() {
    let mut app = create_headless_app();
    let npc = spawn_character(&mut app, Vec3::ZERO, &LocomotionConfig::default());
    let mut jumps = EventLog::<JumpPerformed>::new(&app);

    snapshot(&mut app).set_direct_axis(Vec2::Y);
    snapshot(&mut app).press_jump();
    run_recording(&mut app, 10, &mut jumps);

    assert_eq!(state(&app, npc), CharacterState::Idle);
    assert!(jumps.events.is_empty());

    // Внешний JumpIntent работает и без Player
    app.world_mut().send_event(JumpIntent { entity: npc });
    step_fixed(&mut app);
    assert_eq!(state(&app, npc), CharacterState::Jumping);
}

#[test]
fn test_spawn_in_air_gets_only_air_jumps() {
    let mut app = create_headless_app();
    let character = spawn_character(&mut app, Vec3::new(0.0, 3.0, 0.0), &LocomotionConfig::default());
    app.world_mut().entity_mut(character).insert(Player);
    let mut jumps = EventLog::<JumpPerformed>::new(&app);

    step_fixed(&mut app);
    assert!(!body(&app, character).is_grounded);

    // Coyote окно не открывалось: первый прыжок сразу air jump
    snapshot(&mut app).press_jump();
    run_recording(&mut app, 1, &mut jumps);
    snapshot(&mut app).press_jump();
    run_recording(&mut app, 1, &mut jumps);

    assert_eq!(jumps.events.len(), 1);
    assert!(jumps.events[0].is_air_jump);
    assert_eq!(jumps.events[0].force, 4.5);
}

#[test]
fn test_event_buffers_stay_bounded() {
    let (mut app, _) = player_app();

    for tick in 0..1200 {
        if tick % 60 == 0 {
            snapshot(&mut app).press_jump();
        }
        if tick % 120 == 30 {
            snapshot(&mut app).set_direct_axis(Vec2::Y);
        }
        if tick % 120 == 90 {
            snapshot(&mut app).set_direct_axis(Vec2::ZERO);
        }
        step_fixed(&mut app);

        // После swap живут только events последнего tick
        assert!(app.world().resource::<Events<StateChanged>>().len() <= 2, "tick {}", tick);
        assert!(app.world().resource::<Events<JumpPerformed>>().len() <= 1, "tick {}", tick);
        assert!(app.world().resource::<Events<GroundStateChanged>>().len() <= 1, "tick {}", tick);
    }
}

// ============================================================================
// Rapier backend
// ============================================================================

/// Headless App с настоящим Rapier миром в FixedUpdate
fn rapier_app() -> App {
    let mut app = create_headless_app();
    app.insert_resource(RaycastBackend::Rapier)
        .insert_resource(TimestepMode::Fixed {
            dt: 1.0 / 60.0,
            substeps: 1,
        })
        .add_plugins(RapierPhysicsPlugin::<NoUserData>::default().in_fixed_schedule());

    // Пол: слой GROUND, верх на y = 0
    app.world_mut().spawn((
        RigidBody::Fixed,
        Collider::cuboid(50.0, 0.5, 50.0),
        CollisionGroups::new(Group::GROUP_1, Group::ALL),
        Transform::from_xyz(0.0, -0.5, 0.0),
    ));

    app
}

/// Player с собственным collider (все слои) и Rapier velocity
fn spawn_rapier_player(app: &mut App) -> Entity {
    let character = spawn_character(app, Vec3::new(0.0, 0.05, 0.0), &LocomotionConfig::default());
    app.world_mut().entity_mut(character).insert((
        Player,
        Collider::capsule_y(0.5, 0.3),
        Velocity::default(),
    ));
    character
}

/// Startup (Rapier context) + несколько tick на регистрацию colliders
fn warm_up(app: &mut App) {
    for _ in 0..5 {
        app.update();
    }
    for _ in 0..20 {
        step_fixed(app);
    }
}

#[test]
fn test_rapier_floor_grounds_character() {
    let mut app = rapier_app();
    let character = spawn_rapier_player(&mut app);
    warm_up(&mut app);

    // Собственная капсула (верх на 0.8) не считается полом
    let body = body(&app, character);
    assert!(body.is_grounded);
    let floor = body.floor_height.expect("floor height");
    assert!(floor.abs() < 1e-3, "floor = {}", floor);

    let y = app.world().get::<Transform>(character).expect("transform").translation.y;
    assert!(y.abs() < 1e-3, "y = {}", y);
    assert_eq!(state(&app, character), CharacterState::Idle);
    assert!(validate_setup(app.world_mut()).physics_available);
}

#[test]
fn test_rapier_click_hits_floor_through_actor_layer() {
    let mut app = rapier_app();
    let camera = spawn_camera_over_target(&mut app);
    // Ящик на слое ACTORS прямо над целью: WALKABLE маска его пропускает
    app.world_mut().spawn((
        RigidBody::Fixed,
        Collider::cuboid(0.5, 0.5, 0.5),
        CollisionGroups::new(Group::GROUP_3, Group::ALL),
        Transform::from_xyz(CLICK_TARGET.x, 1.0, CLICK_TARGET.z),
    ));
    let character = spawn_rapier_player(&mut app);
    warm_up(&mut app);

    let center = camera.viewport_size * 0.5;
    snapshot(&mut app).press_pointer(center);
    snapshot(&mut app).release_pointer(center);
    step_fixed(&mut app);

    let nav = navigator(&app, character);
    assert_eq!(nav.phase(), NavigationPhase::SingleDestination);
    let destination = nav.target().destination;
    assert!((destination - CLICK_TARGET).length() < 1e-3, "destination = {:?}", destination);
}

#[test]
fn test_rapier_velocity_mirrors_character_body() {
    let mut app = rapier_app();
    let character = spawn_rapier_player(&mut app);
    warm_up(&mut app);

    snapshot(&mut app).set_direct_axis(Vec2::Y);
    for _ in 0..10 {
        step_fixed(&mut app);
    }

    let body = body(&app, character);
    assert!(body.movement_speed > 1.0);
    let velocity = app.world().get::<Velocity>(character).expect("rapier velocity");
    assert_eq!(velocity.linvel, body.velocity);
}
