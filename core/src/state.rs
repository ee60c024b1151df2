//! The game-state aggregate: ledger, buildings, units, journal, day.
//!
//! RULE: Exactly one owner (the engine). Every component that needs
//! the state receives it explicitly as `&GameState` / `&mut GameState`.

use crate::{
    building::{Building, BuildingCategory},
    config::GameConfig,
    journal::{Journal, Severity},
    resources::Resources,
    unit::{self, Unit},
};
use serde::{Deserialize, Serialize};

pub const FIRST_DAY: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub resources: Resources,
    pub buildings: Vec<Building>,
    pub units:     Vec<Unit>,
    /// Older saves have no journal; they load with a single relink notice.
    #[serde(default = "Journal::relinked")]
    pub log:       Journal,
    pub day:       u32,
}

impl GameState {
    /// The fresh-start aggregate.
    pub fn initial(config: &GameConfig) -> Self {
        Self {
            resources: config.starting_resources,
            buildings: config.buildings.clone(),
            units:     config.units.clone(),
            log:       Journal::welcome(),
            day:       FIRST_DAY,
        }
    }

    pub fn note(&mut self, message: &str, severity: Severity) {
        self.log.append(message, severity);
    }

    pub fn total_power(&self) -> u64 {
        unit::total_power(&self.units)
    }

    pub fn building(&self, building_id: &str) -> Option<&Building> {
        self.buildings.iter().find(|b| b.id == building_id)
    }

    pub fn building_mut(&mut self, building_id: &str) -> Option<&mut Building> {
        self.buildings.iter_mut().find(|b| b.id == building_id)
    }

    /// The building that caps every other building's level.
    pub fn command_building(&self) -> Option<&Building> {
        self.buildings.iter().find(|b| b.is_command())
    }

    /// The building whose level unlocks units.
    pub fn barracks(&self) -> Option<&Building> {
        self.buildings
            .iter()
            .find(|b| b.category == BuildingCategory::Military)
    }

    /// Roster position and record of a unit.
    pub fn unit(&self, unit_id: &str) -> Option<(usize, &Unit)> {
        self.units.iter().enumerate().find(|(_, u)| u.id == unit_id)
    }

    pub fn unit_mut(&mut self, unit_id: &str) -> Option<&mut Unit> {
        self.units.iter_mut().find(|u| u.id == unit_id)
    }
}
