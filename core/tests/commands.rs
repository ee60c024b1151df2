//! Player commands through the single `apply` entry point, and advice.

use lastwar_core::{
    command::PlayerCommand,
    config::GameConfig,
    engine::GameEngine,
    event::GameEvent,
    narrative::{FieldManual, ADVICE_FALLBACK},
    store::GameStore,
};

fn field_manual_engine() -> GameEngine {
    let store = GameStore::in_memory().unwrap();
    store.migrate().unwrap();
    let mut engine = GameEngine::boot(GameConfig::default(), 3, store, Box::new(FieldManual)).unwrap();
    engine.await_scan().unwrap();
    engine
}

#[test]
fn commands_parse_from_json() {
    let parsed: Vec<PlayerCommand> = serde_json::from_str(
        r#"[
            {"cmd":"upgrade","building_id":"b1"},
            {"cmd":"train","unit_id":"u1"},
            {"cmd":"start_mission","mission_id":"m-1-0"},
            {"cmd":"scan_for_missions"},
            {"cmd":"request_advice"},
            {"cmd":"reset_game"}
        ]"#,
    )
    .unwrap();

    assert_eq!(parsed[0], PlayerCommand::Upgrade { building_id: "b1".into() });
    assert_eq!(parsed[3], PlayerCommand::ScanForMissions { manual: false });
    assert_eq!(parsed[5].name(), "reset_game");
}

#[test]
fn apply_routes_to_the_matching_action() {
    let mut engine = GameEngine::build_test(1).unwrap();

    engine.apply(PlayerCommand::Train { unit_id: "u1".into() }).unwrap();
    engine.apply(PlayerCommand::Upgrade { building_id: "b1".into() }).unwrap();

    assert_eq!(engine.state.unit("u1").unwrap().1.count, 1);
    assert_eq!(engine.state.building("b1").unwrap().level, 2);
    assert_eq!(engine.event_count("unit_trained").unwrap(), 1);
    assert_eq!(engine.event_count("building_upgraded").unwrap(), 1);
}

#[test]
fn offline_advice_uses_the_fallback() {
    let mut engine = GameEngine::build_test(1).unwrap();
    let before = engine.state.clone();

    let events = engine.apply(PlayerCommand::RequestAdvice).unwrap();

    match &events[..] {
        [GameEvent::AdviceIssued { text, .. }] => assert_eq!(text, ADVICE_FALLBACK),
        other => panic!("unexpected events: {other:?}"),
    }
    assert_eq!(engine.state, before, "advice never touches the state");
}

#[test]
fn field_manual_advice_reflects_the_base() {
    let engine = field_manual_engine();

    let advice = engine.request_advice();

    assert!(advice.starts_with("Day 1 assessment"));
    assert!(advice.contains("combined power of 0"));
}

#[test]
fn field_manual_briefings_describe_offers() {
    let engine = field_manual_engine();
    assert_eq!(engine.missions.len(), 3);
    for offer in engine.missions.offers() {
        assert!(!offer.description.is_empty());
        assert_ne!(offer.description, lastwar_core::narrative::BRIEFING_FALLBACK);
    }
}

#[test]
fn every_event_carries_the_session() {
    let mut engine = GameEngine::build_test(1).unwrap();
    engine.apply(PlayerCommand::ScanForMissions { manual: true }).unwrap();
    engine.run_ticks(2).unwrap();

    let events = engine.events().unwrap();
    assert!(events.iter().all(|e| e.session_id == engine.session_id));
    let types: Vec<_> = events.iter().map(|e| e.event_type.as_str()).collect();
    assert_eq!(
        types,
        [
            "session_started",
            "scan_started",
            "missions_posted",
            "scan_idle",
            "production_applied"
        ]
    );
}
