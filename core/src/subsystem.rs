//! Subsystem trait.
//!
//! RULE: Every clock-driven effect implements GameSubsystem.
//! The engine calls update() on each registered subsystem
//! in registration order, every tick, handing it the current state.
//! Subsystems keep no copy of the state between ticks.

use crate::{
    error::GameResult,
    event::GameEvent,
    state::GameState,
    types::Tick,
};

pub trait GameSubsystem: Send {
    /// Unique stable name, recorded as the event source.
    fn name(&self) -> &'static str;

    /// Called once per tick by the engine.
    ///
    /// Returns the events describing any change made to `state`.
    fn update(&mut self, tick: Tick, state: &mut GameState) -> GameResult<Vec<GameEvent>>;
}
