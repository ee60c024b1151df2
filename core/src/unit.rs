//! Unit roster records.
//!
//! A unit's position in the roster decides which barracks level
//! unlocks it: the first unit needs level 1, the second level 2, and so on.

use crate::{resources::Bundle, types::EntityId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitCategory {
    Infantry,
    Vehicle,
    Air,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub id:       EntityId,
    pub name:     String,
    #[serde(rename = "type")]
    pub category: UnitCategory,
    pub power:    u32,
    pub cost:     Bundle,
    pub count:    u32,
}

impl Unit {
    pub fn strength(&self) -> u64 {
        u64::from(self.power) * u64::from(self.count)
    }
}

/// Barracks level needed to train the unit at `roster_index`.
pub fn required_barracks_level(roster_index: usize) -> u32 {
    roster_index as u32 + 1
}

/// Sum of `power * count` over the roster.
pub fn total_power(units: &[Unit]) -> u64 {
    units.iter().map(Unit::strength).sum()
}

/// Shrink every unit count to `floor(count * survival_rate)`.
pub fn apply_casualties(units: &mut [Unit], survival_rate: f64) {
    for unit in units {
        unit.count = (f64::from(unit.count) * survival_rate).floor() as u32;
    }
}
