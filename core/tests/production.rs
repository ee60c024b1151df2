//! Production ticks credit building yields to the ledger.

use lastwar_core::{
    engine::GameEngine,
    production_subsystem::produce,
    resources::{ResourceKind, Resources},
};

#[test]
fn one_production_tick_credits_each_yield_once() {
    let mut engine = GameEngine::build_test(1).unwrap();
    let before = engine.state.resources;

    engine.run_ticks(2).unwrap();

    let after = engine.state.resources;
    assert_eq!(after.gold - before.gold, 10);
    assert_eq!(after.food - before.food, 15);
    assert_eq!(after.steel - before.steel, 5);
    assert_eq!(after.tech, before.tech, "nothing produces Tech");
}

#[test]
fn off_cycle_ticks_produce_nothing() {
    let mut engine = GameEngine::build_test(1).unwrap();
    let before = engine.state.resources;

    engine.run_ticks(1).unwrap();

    assert_eq!(engine.state.resources, before);
}

#[test]
fn yield_scales_with_level() {
    let mut engine = GameEngine::build_test(1).unwrap();
    engine.state.building_mut("b2").unwrap().level = 3;
    engine.state.building_mut("b4").unwrap().level = 2;
    engine.state.resources = Resources::default();

    let yielded = produce(&mut engine.state);

    assert_eq!(yielded.get(&ResourceKind::Gold), Some(&30));
    assert_eq!(yielded.get(&ResourceKind::Food), Some(&15));
    assert_eq!(yielded.get(&ResourceKind::Steel), Some(&10));
    assert_eq!(engine.state.resources, Resources::new(30, 15, 10, 0));
}

#[test]
fn non_producing_buildings_contribute_nothing() {
    let mut engine = GameEngine::build_test(1).unwrap();
    for building in &mut engine.state.buildings {
        if building.production.is_none() {
            building.level = 9;
        }
    }
    let before = engine.state.resources;

    engine.run_ticks(2).unwrap();

    assert_eq!(engine.state.resources.gold - before.gold, 10);
}

#[test]
fn production_is_recorded_and_saved() {
    let mut engine = GameEngine::build_test(1).unwrap();

    engine.run_ticks(10).unwrap();

    assert_eq!(engine.event_count("production_applied").unwrap(), 5);
    let saved = lastwar_core::snapshot::SaveSlot::new(engine.config().save_key.clone())
        .load(&engine.store)
        .unwrap()
        .expect("slot written");
    assert_eq!(saved.resources, engine.state.resources);
}
