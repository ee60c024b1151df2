use crate::{
    building::{Building, BuildingCategory},
    clock::Intervals,
    resources::{ResourceKind, Resources},
    unit::{Unit, UnitCategory},
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_SAVE_KEY: &str = "last_war_save_data";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Key of the single durable save slot.
    #[serde(default = "default_save_key")]
    pub save_key:           String,
    #[serde(default)]
    pub intervals:          Intervals,
    pub starting_resources: Resources,
    pub buildings:          Vec<Building>,
    pub units:              Vec<Unit>,
}

fn default_save_key() -> String {
    DEFAULT_SAVE_KEY.to_string()
}

impl GameConfig {
    /// Load from `{data_dir}/catalog.json`.
    /// In tests, use GameConfig::default().
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let path = format!("{data_dir}/catalog.json");
        let content = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: GameConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.intervals.production_ticks > 0
                && self.intervals.day_ticks > 0
                && self.intervals.mission_scan_ticks > 0,
            "all intervals must be positive: {:?}",
            self.intervals
        );
        let commands = self.buildings.iter().filter(|b| b.is_command()).count();
        anyhow::ensure!(commands == 1, "expected exactly one command building, found {commands}");
        anyhow::ensure!(
            self.buildings.iter().all(|b| b.level >= 1),
            "buildings must start at level 1 or higher"
        );
        anyhow::ensure!(!self.save_key.is_empty(), "save_key must not be empty");
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        use ResourceKind::{Food, Gold, Steel, Tech};

        let buildings = vec![
            Building {
                id:              "b1".into(),
                name:            "Command Center".into(),
                level:           1,
                base_cost:       [(Gold, 200), (Steel, 100)].into(),
                cost_multiplier: 1.8,
                description:     "The heart of your base. Limits max level of other buildings.".into(),
                category:        BuildingCategory::Command,
                production:      None,
            },
            Building {
                id:              "b2".into(),
                name:            "Gold Mine".into(),
                level:           1,
                base_cost:       [(Gold, 100), (Steel, 50)].into(),
                cost_multiplier: 1.5,
                description:     "Excavates precious metals from the wasteland.".into(),
                category:        BuildingCategory::Production,
                production:      Some([(Gold, 10.0)].into()),
            },
            Building {
                id:              "b3".into(),
                name:            "Hydroponic Farm".into(),
                level:           1,
                base_cost:       [(Gold, 80), (Steel, 40)].into(),
                cost_multiplier: 1.4,
                description:     "Produces food for your citizens and troops.".into(),
                category:        BuildingCategory::Production,
                production:      Some([(Food, 15.0)].into()),
            },
            Building {
                id:              "b4".into(),
                name:            "Steel Works".into(),
                level:           1,
                base_cost:       [(Gold, 150), (Steel, 80)].into(),
                cost_multiplier: 1.6,
                description:     "Smelts scrap into industrial-grade steel.".into(),
                category:        BuildingCategory::Production,
                production:      Some([(Steel, 5.0)].into()),
            },
            Building {
                id:              "b5".into(),
                name:            "Barracks".into(),
                level:           1,
                base_cost:       [(Gold, 300), (Steel, 150)].into(),
                cost_multiplier: 1.7,
                description:     "Train and house your military units.".into(),
                category:        BuildingCategory::Military,
                production:      None,
            },
        ];

        let units = vec![
            Unit {
                id:       "u1".into(),
                name:     "Wasteland Scavenger".into(),
                category: UnitCategory::Infantry,
                power:    5,
                cost:     [(Food, 20), (Gold, 10)].into(),
                count:    0,
            },
            Unit {
                id:       "u2".into(),
                name:     "Armored Raider".into(),
                category: UnitCategory::Vehicle,
                power:    25,
                cost:     [(Food, 50), (Steel, 30), (Gold, 20)].into(),
                count:    0,
            },
            Unit {
                id:       "u3".into(),
                name:     "Stealth Drone".into(),
                category: UnitCategory::Air,
                power:    60,
                cost:     [(Tech, 20), (Steel, 50), (Gold, 100)].into(),
                count:    0,
            },
        ];

        Self {
            save_key:           default_save_key(),
            intervals:          Intervals::default(),
            starting_resources: Resources::new(500, 500, 200, 50),
            buildings,
            units,
        }
    }
}
