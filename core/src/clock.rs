//! Game clock: owns the tick counter and decides which periodic
//! effects are due on a given tick.

use crate::types::Tick;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameClock {
    pub current_tick: Tick,
}

impl GameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance one tick. Returns the new tick number.
    pub fn advance(&mut self) -> Tick {
        self.current_tick += 1;
        self.current_tick
    }

    pub fn reset(&mut self) {
        self.current_tick = 0;
    }
}

/// True when a periodic effect with this interval fires on `tick`.
/// A zero interval never fires.
pub fn is_due(tick: Tick, interval: Tick) -> bool {
    interval > 0 && tick > 0 && tick % interval == 0
}

/// Periods of the three recurring effects, in ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intervals {
    pub production_ticks:   Tick,
    pub day_ticks:          Tick,
    pub mission_scan_ticks: Tick,
}

impl Default for Intervals {
    fn default() -> Self {
        Self {
            production_ticks:   2,
            day_ticks:          60,
            mission_scan_ticks: 45,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effects_fire_on_their_multiples_only() {
        let fired: Vec<Tick> = (0..=10).filter(|t| is_due(*t, 2)).collect();
        assert_eq!(fired, vec![2, 4, 6, 8, 10]);
        assert!(!is_due(59, 60));
        assert!(is_due(120, 60));
    }

    #[test]
    fn zero_interval_is_disabled() {
        assert!(!is_due(10, 0));
    }
}
