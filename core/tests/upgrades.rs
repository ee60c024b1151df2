//! Building upgrades: cost curve, command-level gate, affordability.

use lastwar_core::{
    engine::GameEngine,
    error::GameError,
    event::{GameEvent, Rejection},
    journal::Severity,
    resources::{ResourceKind, Resources},
    snapshot::SaveSlot,
};

fn make_engine() -> GameEngine {
    GameEngine::build_test(42).unwrap()
}

#[test]
fn command_center_upgrade_debits_cost_and_raises_level() {
    let mut engine = make_engine();

    let events = engine.upgrade("b1").unwrap();

    assert_eq!(engine.state.building("b1").unwrap().level, 2);
    assert_eq!(engine.state.resources, Resources::new(300, 500, 100, 50));
    assert!(engine
        .state
        .log
        .newest()
        .unwrap()
        .ends_with("✓ Infrastructure Upgrade: Command Center reached Level 2"));
    match &events[..] {
        [GameEvent::BuildingUpgraded { building_id, new_level, cost, .. }] => {
            assert_eq!(building_id, "b1");
            assert_eq!(*new_level, 2);
            assert_eq!(cost.get(&ResourceKind::Gold), Some(&200));
        }
        other => panic!("unexpected events: {other:?}"),
    }
}

#[test]
fn buildings_cannot_outgrow_the_command_center() {
    let mut engine = make_engine();
    let before = engine.state.resources;

    let events = engine.upgrade("b2").unwrap();

    assert_eq!(engine.state.building("b2").unwrap().level, 1);
    assert_eq!(engine.state.resources, before);
    assert!(engine
        .state
        .log
        .newest()
        .unwrap()
        .contains("⚠ Restriction: Command Center Level 2 required for further base expansion."));
    assert!(matches!(
        &events[..],
        [GameEvent::UpgradeRejected {
            reason: Rejection::CommandLevelTooLow { required_level: 2 },
            ..
        }]
    ));
}

#[test]
fn buildings_may_match_the_command_level() {
    let mut engine = make_engine();
    engine.upgrade("b1").unwrap();

    engine.upgrade("b2").unwrap();
    assert_eq!(engine.state.building("b2").unwrap().level, 2);
    assert_eq!(engine.state.resources, Resources::new(200, 500, 50, 50));

    engine.upgrade("b2").unwrap();
    assert_eq!(engine.state.building("b2").unwrap().level, 2, "capped at command level");
}

#[test]
fn unaffordable_upgrade_is_refused_identically_every_time() {
    let mut engine = make_engine();
    engine.state.resources = Resources::new(199, 0, 100, 0);
    let errors_before = engine.state.log.count_severity(Severity::Error);

    engine.upgrade("b1").unwrap();
    let after_first = (engine.state.resources, engine.state.building("b1").unwrap().level);
    assert_eq!(engine.state.log.count_severity(Severity::Error), errors_before + 1);

    engine.upgrade("b1").unwrap();
    let after_second = (engine.state.resources, engine.state.building("b1").unwrap().level);
    assert_eq!(engine.state.log.count_severity(Severity::Error), errors_before + 2);

    assert_eq!(after_first, (Resources::new(199, 0, 100, 0), 1));
    assert_eq!(after_first, after_second);
    assert!(engine
        .state
        .log
        .newest()
        .unwrap()
        .contains("Insufficient logistics for Command Center upgrade."));
    assert_eq!(engine.event_count("upgrade_rejected").unwrap(), 2);
}

#[test]
fn second_upgrade_uses_the_grown_cost() {
    let mut engine = make_engine();
    engine.state.resources = Resources::new(10_000, 0, 10_000, 0);

    engine.upgrade("b1").unwrap();
    engine.upgrade("b1").unwrap();

    // 200 + floor(200 * 1.8) = 560 gold, 100 + 180 = 280 steel
    assert_eq!(engine.state.resources, Resources::new(9_440, 0, 9_720, 0));
    assert_eq!(engine.state.building("b1").unwrap().level, 3);
}

#[test]
fn unknown_building_is_an_error_and_changes_nothing() {
    let mut engine = make_engine();
    let before = engine.state.clone();

    let err = engine.upgrade("b99").unwrap_err();

    assert!(matches!(err, GameError::UnknownBuilding { ref id } if id == "b99"));
    assert_eq!(engine.state, before);
}

#[test]
fn upgrades_are_saved_immediately() {
    let mut engine = make_engine();
    engine.upgrade("b1").unwrap();

    let saved = SaveSlot::new(engine.config().save_key.clone())
        .load(&engine.store)
        .unwrap()
        .unwrap();
    assert_eq!(saved.building("b1").unwrap().level, 2);
    assert_eq!(saved, engine.state);
}
