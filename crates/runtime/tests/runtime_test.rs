use std::time::Duration;

use tactics_core::{
    AbilityId, AbilityRef, Action, CancelReason, GameConfig, GameEndReason, ManualClock, PlayerId,
    Position, PriorityTier, ResolutionReport, SubmitError, Target, TargetFlags, TurnEvent,
    TurnPhase, UnitId, ValidationCode, ValidatorConfig,
};
use tactics_runtime::{
    AbilityEffect, Arena, Event, Runtime, RuntimeConfig, RuntimeError, RuntimeHandle,
    StandardExecutor, SubmissionEvent, Topic, UnitRecord,
};
use tokio::sync::broadcast;
use tokio::time::timeout;

const STRIKE: AbilityId = AbilityId(1);
const GUARD: AbilityId = AbilityId(2);
const FLARE: AbilityId = AbilityId(3);

fn strike() -> AbilityRef {
    AbilityRef::new(STRIKE, PriorityTier::Offensive, TargetFlags::ENEMY)
        .with_range(3)
        .with_cost(10)
        .with_cooldown(1)
}

fn guard() -> AbilityRef {
    AbilityRef::new(GUARD, PriorityTier::DefensiveUtility, TargetFlags::SELF)
}

fn flare() -> AbilityRef {
    AbilityRef::new(FLARE, PriorityTier::Offensive, TargetFlags::GROUND).with_range(4)
}

fn manual_config(strict: bool) -> RuntimeConfig {
    RuntimeConfig {
        game: GameConfig::default()
            .with_validator(ValidatorConfig::default().with_strict(strict))
            .with_selection_timer(3),
        tick_interval: None,
        ..RuntimeConfig::default()
    }
}

async fn start(config: RuntimeConfig, arena: Arena) -> Runtime {
    Runtime::builder()
        .config(config)
        .arena(arena)
        .executor(StandardExecutor::new().with_effect(STRIKE, AbilityEffect::damage(8)))
        .build()
        .await
        .expect("runtime should start")
}

fn duel(hero_speed: u32, foe_speed: u32) -> Arena {
    Arena::new(8, 8)
        .with_unit(UnitRecord::new(UnitId(1), PlayerId::One, Position::new(1, 1)).with_speed(hero_speed))
        .and_then(|arena| {
            arena.with_unit(
                UnitRecord::new(UnitId(2), PlayerId::Two, Position::new(3, 1)).with_speed(foe_speed),
            )
        })
        .expect("valid arena")
}

async fn next_turn_event(rx: &mut broadcast::Receiver<Event>) -> TurnEvent {
    loop {
        let event = timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("turn event in time")
            .expect("turn channel open");
        if let Event::Turn(event) = event {
            return event;
        }
    }
}

async fn next_report(rx: &mut broadcast::Receiver<Event>) -> ResolutionReport {
    loop {
        if let TurnEvent::ActionsResolved { report } = next_turn_event(rx).await {
            return report;
        }
    }
}

async fn next_submission(rx: &mut broadcast::Receiver<Event>) -> SubmissionEvent {
    loop {
        let event = timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("submission event in time")
            .expect("submission channel open");
        if let Event::Submission(event) = event {
            return event;
        }
    }
}

async fn submit(handle: &RuntimeHandle, player: PlayerId, action: Action) {
    handle
        .submit_action(player, action)
        .await
        .expect("runtime alive")
        .expect("submission accepted");
}

#[tokio::test]
async fn defensive_tier_resolves_before_a_faster_attacker() {
    let runtime = start(manual_config(false), duel(6, 12)).await;
    let handle = runtime.handle();
    let mut turns = handle.subscribe(Topic::Turn);

    submit(&handle, PlayerId::One, Action::use_ability(UnitId(1), guard(), Target::SelfTarget)).await;
    submit(&handle, PlayerId::Two, Action::use_ability(UnitId(2), strike(), Target::Unit(UnitId(1)))).await;

    let report = next_report(&mut turns).await;
    assert_eq!(report.turn, 1);
    assert_eq!(report.executed_order, vec![UnitId(1), UnitId(2)]);
    assert!(report.actions.iter().all(|action| action.is_resolved()));

    let units = handle.query_units().await.expect("units");
    let hero = units.iter().find(|unit| unit.id == UnitId(1)).expect("hero");
    assert_eq!(hero.health, 22);

    runtime.shutdown().await.expect("clean shutdown");
}

#[tokio::test]
async fn equal_tier_and_speed_fall_back_to_unit_id() {
    let arena = Arena::new(8, 8)
        .with_unit(UnitRecord::new(UnitId(7), PlayerId::One, Position::new(0, 0)))
        .and_then(|arena| arena.with_unit(UnitRecord::new(UnitId(3), PlayerId::Two, Position::new(7, 7))))
        .expect("valid arena");
    let runtime = start(manual_config(false), arena).await;
    let handle = runtime.handle();
    let mut turns = handle.subscribe(Topic::Turn);

    submit(&handle, PlayerId::One, Action::move_to(UnitId(7), Position::new(1, 0))).await;
    submit(&handle, PlayerId::Two, Action::move_to(UnitId(3), Position::new(6, 7))).await;

    let report = next_report(&mut turns).await;
    assert_eq!(report.executed_order, vec![UnitId(3), UnitId(7)]);

    runtime.shutdown().await.expect("clean shutdown");
}

#[tokio::test]
async fn out_of_range_submission_is_rejected_with_its_code() {
    let arena = Arena::new(8, 8)
        .with_unit(UnitRecord::new(UnitId(1), PlayerId::One, Position::new(0, 0)))
        .and_then(|arena| arena.with_unit(UnitRecord::new(UnitId(2), PlayerId::Two, Position::new(7, 7))))
        .expect("valid arena");
    let runtime = start(manual_config(false), arena).await;
    let handle = runtime.handle();
    let mut submissions = handle.subscribe(Topic::Submission);

    let verdict = handle
        .submit_action(
            PlayerId::One,
            Action::use_ability(UnitId(1), strike(), Target::Unit(UnitId(2))),
        )
        .await
        .expect("runtime alive");
    assert!(matches!(verdict, Err(SubmitError::Rejected(_))));

    match next_submission(&mut submissions).await {
        SubmissionEvent::Rejected {
            player, code, turn, ..
        } => {
            assert_eq!(player, PlayerId::One);
            assert_eq!(code, "IMPOSSIBLE_RANGE");
            assert_eq!(turn, 1);
        }
        other => panic!("expected a rejection, got {other:?}"),
    }

    let snapshot = handle.query_turn().await.expect("turn");
    assert!(!snapshot.is_locked(PlayerId::One));
    assert_eq!(snapshot.phase, TurnPhase::ActionSelection);

    runtime.shutdown().await.expect("clean shutdown");
}

#[tokio::test]
async fn rapid_submissions_are_throttled_until_the_window_passes() {
    let clock = ManualClock::new();
    let runtime = Runtime::builder()
        .config(manual_config(true))
        .arena(duel(10, 10))
        .clock(clock.clone())
        .build()
        .await
        .expect("runtime should start");
    let handle = runtime.handle();

    // Off-board flares pass the rate check and then fail the bounds check.
    let off_board = || Action::use_ability(UnitId(1), flare(), Target::Ground(Position::new(-1, 1)));
    for _ in 0..ValidatorConfig::DEFAULT_MAX_SUBMISSIONS_PER_WINDOW {
        let verdict = handle.submit_action(PlayerId::One, off_board()).await.expect("runtime alive");
        match verdict {
            Err(SubmitError::Rejected(error)) => assert_eq!(error.code(), ValidationCode::OutOfBounds),
            other => panic!("expected an out-of-bounds rejection, got {other:?}"),
        }
    }

    let verdict = handle.submit_action(PlayerId::One, off_board()).await.expect("runtime alive");
    match verdict {
        Err(SubmitError::Rejected(error)) => {
            assert_eq!(error.code(), ValidationCode::RapidSubmission)
        }
        other => panic!("expected a rate rejection, got {other:?}"),
    }

    clock.advance(Duration::from_secs(2));
    submit(&handle, PlayerId::One, Action::move_to(UnitId(1), Position::new(1, 2))).await;

    runtime.shutdown().await.expect("clean shutdown");
}

#[tokio::test]
async fn both_locks_complete_the_turn_and_open_the_next() {
    let runtime = start(manual_config(false), duel(10, 10)).await;
    let handle = runtime.handle();
    let mut turns = handle.subscribe(Topic::Turn);

    submit(&handle, PlayerId::One, Action::use_ability(UnitId(1), strike(), Target::Unit(UnitId(2)))).await;
    let snapshot = handle.query_turn().await.expect("turn");
    assert!(snapshot.is_locked(PlayerId::One));
    assert!(!snapshot.is_locked(PlayerId::Two));

    let receipt = handle
        .submit_action(PlayerId::Two, Action::move_to(UnitId(2), Position::new(4, 1)))
        .await
        .expect("runtime alive")
        .expect("second lock");
    assert!(receipt.triggered_resolution);

    let mut seen = Vec::new();
    loop {
        let event = next_turn_event(&mut turns).await;
        // The worker announces turn 1 when it starts.
        if event == (TurnEvent::TurnStarted { turn: 1 }) {
            continue;
        }
        let done = event == TurnEvent::TurnStarted { turn: 2 };
        seen.push(event.as_snake_case());
        if done {
            break;
        }
    }
    assert_eq!(
        seen,
        vec![
            "phase_changed",
            "actions_revealed",
            "actions_resolved",
            "phase_changed",
            "turn_completed",
            "phase_changed",
            "turn_started",
        ]
    );

    let snapshot = handle.query_turn().await.expect("turn");
    assert_eq!(snapshot.turn_number, 2);
    assert_eq!(snapshot.phase, TurnPhase::ActionSelection);
    assert!(snapshot.locked.is_empty());
    assert_eq!(snapshot.selection_timer, 3);

    // Movement resolves before the strike, so the foe was hit at its new cell.
    let units = handle.query_units().await.expect("units");
    let hero = units.iter().find(|unit| unit.id == UnitId(1)).expect("hero");
    let foe = units.iter().find(|unit| unit.id == UnitId(2)).expect("foe");
    assert_eq!(foe.position, Position::new(4, 1));
    assert_eq!(foe.health, 22);
    // 50 - 10 for the strike, +5 regeneration at end of turn.
    assert_eq!(hero.resource, 45);

    runtime.shutdown().await.expect("clean shutdown");
}

#[tokio::test]
async fn cooldown_blocks_the_following_turn_only() {
    let runtime = start(manual_config(false), duel(10, 10)).await;
    let handle = runtime.handle();
    let mut turns = handle.subscribe(Topic::Turn);

    let mut strike_results = Vec::new();
    for _ in 0..3 {
        submit(&handle, PlayerId::One, Action::use_ability(UnitId(1), strike(), Target::Unit(UnitId(2)))).await;
        submit(&handle, PlayerId::Two, Action::use_ability(UnitId(2), guard(), Target::SelfTarget)).await;
        let report = next_report(&mut turns).await;
        let strike = report.action_of(UnitId(1)).expect("strike reported");
        strike_results.push((strike.is_resolved(), strike.cancel_reason()));
    }
    assert_eq!(
        strike_results,
        vec![
            (true, None),
            (false, Some(CancelReason::OnCooldown)),
            (true, None),
        ]
    );

    let units = handle.query_units().await.expect("units");
    let foe = units.iter().find(|unit| unit.id == UnitId(2)).expect("foe");
    assert_eq!(foe.health, 14);

    runtime.shutdown().await.expect("clean shutdown");
}

#[tokio::test]
async fn selection_timeout_resolves_with_a_pass() {
    let runtime = start(manual_config(false), duel(10, 10)).await;
    let handle = runtime.handle();
    let mut turns = handle.subscribe(Topic::Turn);

    submit(&handle, PlayerId::One, Action::move_to(UnitId(1), Position::new(1, 2))).await;
    handle.advance_ticks(2).await.expect("ticks");
    assert_eq!(handle.query_turn().await.expect("turn").turn_number, 1);

    handle.advance_ticks(1).await.expect("ticks");
    let report = next_report(&mut turns).await;
    assert_eq!(report.executed_order, vec![UnitId(1)]);
    assert_eq!(handle.query_turn().await.expect("turn").turn_number, 2);

    runtime.shutdown().await.expect("clean shutdown");
}

#[tokio::test]
async fn periodic_ticks_drive_the_selection_timer() {
    let config = RuntimeConfig {
        game: GameConfig::default().with_selection_timer(2),
        tick_interval: Some(Duration::from_millis(10)),
        ..RuntimeConfig::default()
    };
    let runtime = start(config, duel(10, 10)).await;
    let handle = runtime.handle();
    let mut turns = handle.subscribe(Topic::Turn);

    loop {
        if next_turn_event(&mut turns).await == (TurnEvent::TurnStarted { turn: 2 }) {
            break;
        }
    }

    runtime.shutdown().await.expect("clean shutdown");
}

#[tokio::test]
async fn killing_the_last_unit_ends_the_match() {
    let arena = Arena::new(8, 8)
        .with_unit(UnitRecord::new(UnitId(1), PlayerId::One, Position::new(1, 1)))
        .and_then(|arena| {
            arena.with_unit(UnitRecord::new(UnitId(2), PlayerId::Two, Position::new(3, 1)).with_health(5))
        })
        .expect("valid arena");
    let runtime = start(manual_config(false), arena).await;
    let handle = runtime.handle();
    let mut turns = handle.subscribe(Topic::Turn);
    let mut submissions = handle.subscribe(Topic::Submission);

    submit(&handle, PlayerId::One, Action::use_ability(UnitId(1), strike(), Target::Unit(UnitId(2)))).await;
    submit(&handle, PlayerId::Two, Action::use_ability(UnitId(2), strike(), Target::Unit(UnitId(1)))).await;

    let outcome = loop {
        if let TurnEvent::GameEnded { outcome } = next_turn_event(&mut turns).await {
            break outcome;
        }
    };
    assert_eq!(outcome.winner, Some(PlayerId::One));
    assert_eq!(outcome.reason, GameEndReason::Victory);
    assert_eq!(outcome.turn, 1);

    let snapshot = handle.query_turn().await.expect("turn");
    assert!(snapshot.is_over());
    assert_eq!(snapshot.outcome, Some(outcome));

    let units = handle.query_units().await.expect("units");
    let foe = units.iter().find(|unit| unit.id == UnitId(2)).expect("foe");
    assert!(!foe.alive);

    // Drain the two acceptances before checking the refusal.
    assert!(next_submission(&mut submissions).await.is_accepted());
    assert!(next_submission(&mut submissions).await.is_accepted());
    let verdict = handle
        .submit_action(PlayerId::One, Action::move_to(UnitId(1), Position::new(1, 2)))
        .await
        .expect("runtime alive");
    assert!(verdict.is_err());
    match next_submission(&mut submissions).await {
        SubmissionEvent::Rejected { code, .. } => assert_eq!(code, "WRONG_PHASE"),
        other => panic!("expected a rejection, got {other:?}"),
    }
    assert!(matches!(
        handle.force_resolution().await,
        Err(RuntimeError::Turn(_))
    ));

    runtime.shutdown().await.expect("clean shutdown");
}

#[tokio::test]
async fn building_without_an_arena_fails() {
    let result = Runtime::builder().build().await;
    assert!(matches!(result, Err(RuntimeError::MissingArena)));
}

#[test]
fn config_loads_from_json_with_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("runtime.json");
    std::fs::write(
        &path,
        r#"{ "tick_interval": null, "game": { "selection_timer_ticks": 4 } }"#,
    )
    .expect("write config");

    let config = RuntimeConfig::from_json_file(&path).expect("valid config");
    assert_eq!(config.tick_interval, None);
    assert_eq!(config.game.selection_timer_ticks, 4);
    assert_eq!(config.game.max_turns, GameConfig::DEFAULT_MAX_TURNS);
    assert_eq!(config.command_buffer_size, RuntimeConfig::default().command_buffer_size);

    assert!(matches!(
        RuntimeConfig::from_json_file(dir.path().join("missing.json")),
        Err(RuntimeError::ConfigIo { .. })
    ));
    std::fs::write(&path, "not json").expect("write config");
    assert!(matches!(
        RuntimeConfig::from_json_file(&path),
        Err(RuntimeError::ConfigParse(_))
    ));
}
