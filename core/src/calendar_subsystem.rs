//! Calendar subsystem: advances the in-game day.
//!
//! Every `interval` ticks the day counter goes up by one. Days that
//! land on a multiple of HOSTILE_ALERT_EVERY raise a warning in the
//! journal.

use crate::{
    clock::is_due,
    error::GameResult,
    event::GameEvent,
    journal::Severity,
    state::GameState,
    subsystem::GameSubsystem,
    types::Tick,
};

pub const HOSTILE_ALERT_EVERY: u32 = 5;

pub struct CalendarSubsystem {
    interval: Tick,
}

impl CalendarSubsystem {
    pub fn new(interval: Tick) -> Self {
        Self { interval }
    }
}

/// Advance `state` by one day. Returns true when the hostile-activity
/// warning was raised.
pub fn advance_day(state: &mut GameState) -> bool {
    state.day += 1;
    let alert = state.day % HOSTILE_ALERT_EVERY == 0;
    if alert {
        state.note(
            &format!(
                "COMM HQ: It is now Day {}. Intelligence reports increased hostile activity.",
                state.day
            ),
            Severity::Warning,
        );
    }
    alert
}

impl GameSubsystem for CalendarSubsystem {
    fn name(&self) -> &'static str { "calendar" }

    fn update(&mut self, tick: Tick, state: &mut GameState) -> GameResult<Vec<GameEvent>> {
        if !is_due(tick, self.interval) {
            return Ok(vec![]);
        }

        let hostile_alert = advance_day(state);

        log::debug!("tick={tick} calendar: day={} alert={hostile_alert}", state.day);

        Ok(vec![GameEvent::DayAdvanced {
            tick,
            day: state.day,
            hostile_alert,
        }])
    }
}
