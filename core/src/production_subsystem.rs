//! Production subsystem: credits building yields to the ledger.
//!
//! Every `interval` ticks, each producing building credits
//! `yield_per_level * level` of each kind it produces.
//! No journal entry: production is silent.

use crate::{
    clock::is_due,
    error::GameResult,
    event::GameEvent,
    resources::Bundle,
    state::GameState,
    subsystem::GameSubsystem,
    types::Tick,
};

pub struct ProductionSubsystem {
    interval: Tick,
}

impl ProductionSubsystem {
    pub fn new(interval: Tick) -> Self {
        Self { interval }
    }
}

/// Apply one production round to `state`. Returns the total yield.
pub fn produce(state: &mut GameState) -> Bundle {
    let mut yielded = Bundle::new();
    for building in &state.buildings {
        for (kind, amount) in building.yield_per_tick() {
            if amount != 0 {
                *yielded.entry(kind).or_insert(0) += amount;
            }
        }
    }
    state.resources.credit_bundle(&yielded);
    yielded
}

impl GameSubsystem for ProductionSubsystem {
    fn name(&self) -> &'static str { "production" }

    fn update(&mut self, tick: Tick, state: &mut GameState) -> GameResult<Vec<GameEvent>> {
        if !is_due(tick, self.interval) {
            return Ok(vec![]);
        }

        let yielded = produce(state);
        if yielded.is_empty() {
            return Ok(vec![]);
        }

        log::debug!("tick={tick} production: {}", crate::resources::describe_bundle(&yielded));

        Ok(vec![GameEvent::ProductionApplied { tick, yielded }])
    }
}
