//! Building registry records and their cost curve.
//!
//! RULE: Levels start at 1 and only ever go up.
//! The command building caps the level of every other building.

use crate::{
    resources::{Bundle, ResourceKind, Yield},
    types::EntityId,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildingCategory {
    Production,
    Military,
    Tech,
    Command,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Building {
    pub id:              EntityId,
    pub name:            String,
    pub level:           u32,
    pub base_cost:       Bundle,
    pub cost_multiplier: f64,
    pub description:     String,
    #[serde(rename = "type")]
    pub category:        BuildingCategory,
    /// Per-level yield, credited every production tick.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub production:      Option<Yield>,
}

impl Building {
    /// Cost of the next upgrade: `floor(base * multiplier^(level-1))` per kind.
    pub fn upgrade_cost(&self) -> Bundle {
        let growth = self.cost_multiplier.powf(f64::from(self.level.saturating_sub(1)));
        self.base_cost
            .iter()
            .map(|(kind, base)| (*kind, (*base as f64 * growth).floor() as i64))
            .collect()
    }

    /// What one production tick yields at the current level:
    /// `floor(per_level * level)` per kind. Empty for buildings that
    /// produce nothing.
    pub fn yield_per_tick(&self) -> Bundle {
        let Some(production) = &self.production else {
            return Bundle::new();
        };
        production
            .iter()
            .map(|(kind, per_level)| (*kind, (per_level * f64::from(self.level)).floor() as i64))
            .collect()
    }

    pub fn produces(&self, kind: ResourceKind) -> bool {
        self.production
            .as_ref()
            .is_some_and(|p| p.get(&kind).is_some_and(|rate| *rate > 0.0))
    }

    pub fn is_command(&self) -> bool {
        self.category == BuildingCategory::Command
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command_center(level: u32) -> Building {
        Building {
            id:              "b1".into(),
            name:            "Command Center".into(),
            level,
            base_cost:       [(ResourceKind::Gold, 200), (ResourceKind::Steel, 100)].into(),
            cost_multiplier: 1.8,
            description:     String::new(),
            category:        BuildingCategory::Command,
            production:      None,
        }
    }

    #[test]
    fn level_one_costs_the_base_amount() {
        let cost = command_center(1).upgrade_cost();
        assert_eq!(cost.get(&ResourceKind::Gold), Some(&200));
        assert_eq!(cost.get(&ResourceKind::Steel), Some(&100));
    }

    #[test]
    fn cost_grows_geometrically_and_is_floored() {
        // 200 * 1.8^2 = 648, 100 * 1.8^2 = 324
        let cost = command_center(3).upgrade_cost();
        assert_eq!(cost.get(&ResourceKind::Gold), Some(&648));
        assert_eq!(cost.get(&ResourceKind::Steel), Some(&324));

        // 200 * 1.8^3 = 1166.4
        let cost = command_center(4).upgrade_cost();
        assert_eq!(cost.get(&ResourceKind::Gold), Some(&1166));
    }

    #[test]
    fn deep_levels_follow_the_real_exponent() {
        let cost = command_center(50).upgrade_cost();
        assert_eq!(cost.get(&ResourceKind::Gold), Some(&644_737_225_089_949));
        assert_eq!(cost.get(&ResourceKind::Steel), Some(&322_368_612_544_974));
    }

    #[test]
    fn fractional_yields_are_floored() {
        let mut farm = command_center(3);
        farm.category = BuildingCategory::Production;
        farm.production = Some([(ResourceKind::Food, 2.5), (ResourceKind::Tech, 0.25)].into());

        let yielded = farm.yield_per_tick();
        assert_eq!(yielded.get(&ResourceKind::Food), Some(&7));
        assert_eq!(yielded.get(&ResourceKind::Tech), Some(&0));
        assert!(farm.produces(ResourceKind::Tech));
    }

    #[test]
    fn non_producers_yield_nothing() {
        assert!(command_center(5).yield_per_tick().is_empty());
    }
}
