//! Resource ledger: the four stockpiles every action draws on.
//!
//! RULE: Bundles are partial. A kind absent from a bundle costs (or
//! rewards) nothing.
//!
//! Player actions go through `spend()`, which checks affordability and
//! debits in one step. `debit()` itself never clamps.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    Gold,
    Food,
    Steel,
    Tech,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 4] = [
        ResourceKind::Gold,
        ResourceKind::Food,
        ResourceKind::Steel,
        ResourceKind::Tech,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Gold  => "Gold",
            Self::Food  => "Food",
            Self::Steel => "Steel",
            Self::Tech  => "Tech",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A partial mapping from resource kind to amount, used for costs
/// and rewards.
pub type Bundle = BTreeMap<ResourceKind, i64>;

/// Per-level production rates. Rates may be fractional; what a
/// building actually yields is floored.
pub type Yield = BTreeMap<ResourceKind, f64>;

/// The ledger. All four kinds are always present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resources {
    #[serde(rename = "Gold")]
    pub gold:  i64,
    #[serde(rename = "Food")]
    pub food:  i64,
    #[serde(rename = "Steel")]
    pub steel: i64,
    #[serde(rename = "Tech")]
    pub tech:  i64,
}

impl Resources {
    pub fn new(gold: i64, food: i64, steel: i64, tech: i64) -> Self {
        Self { gold, food, steel, tech }
    }

    pub fn get(&self, kind: ResourceKind) -> i64 {
        match kind {
            ResourceKind::Gold  => self.gold,
            ResourceKind::Food  => self.food,
            ResourceKind::Steel => self.steel,
            ResourceKind::Tech  => self.tech,
        }
    }

    fn slot_mut(&mut self, kind: ResourceKind) -> &mut i64 {
        match kind {
            ResourceKind::Gold  => &mut self.gold,
            ResourceKind::Food  => &mut self.food,
            ResourceKind::Steel => &mut self.steel,
            ResourceKind::Tech  => &mut self.tech,
        }
    }

    pub fn credit(&mut self, kind: ResourceKind, amount: i64) {
        *self.slot_mut(kind) += amount;
    }

    pub fn debit(&mut self, kind: ResourceKind, amount: i64) {
        *self.slot_mut(kind) -= amount;
    }

    /// True iff every requested amount is covered by the current stockpile.
    pub fn can_afford(&self, bundle: &Bundle) -> bool {
        bundle.iter().all(|(kind, amount)| self.get(*kind) >= *amount)
    }

    pub fn credit_bundle(&mut self, bundle: &Bundle) {
        for (kind, amount) in bundle {
            self.credit(*kind, *amount);
        }
    }

    /// Check and debit in one step. Returns false (ledger untouched)
    /// when the bundle is unaffordable.
    pub fn spend(&mut self, bundle: &Bundle) -> bool {
        if !self.can_afford(bundle) {
            return false;
        }
        for (kind, amount) in bundle {
            self.debit(*kind, *amount);
        }
        true
    }

    /// The kind with the smallest stockpile. Ties go to the earlier kind.
    pub fn scarcest(&self) -> ResourceKind {
        ResourceKind::ALL
            .into_iter()
            .min_by_key(|kind| self.get(*kind))
            .unwrap_or(ResourceKind::Gold)
    }
}

impl fmt::Display for Resources {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Gold({}), Food({}), Steel({}), Tech({})",
            self.gold, self.food, self.steel, self.tech
        )
    }
}

/// Render a bundle as `Gold 200, Steel 100`.
pub fn describe_bundle(bundle: &Bundle) -> String {
    bundle
        .iter()
        .map(|(kind, amount)| format!("{kind} {amount}"))
        .collect::<Vec<_>>()
        .join(", ")
}
