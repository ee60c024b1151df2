//! Mission offers, the bounded mission board, and battle resolution.
//!
//! RULE: A mission is created by replenishment and consumed exactly once,
//! by either a win or a loss. It is never edited in place.
//!
//! The board never holds more than MISSION_POOL_CAPACITY offers. At most
//! one replenishment scan runs at a time; the ScanToken enforces that.

use crate::{
    resources::{Bundle, ResourceKind},
    rng::SubsystemRng,
    types::EntityId,
};
use serde::{Deserialize, Serialize};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

pub const MISSION_POOL_CAPACITY: usize = 3;

pub const MIN_WIN_CHANCE: f64 = 0.05;
pub const MAX_WIN_CHANCE: f64 = 0.98;

/// Survivors after a defeat: between 60% and 90% of every unit type.
pub const MIN_SURVIVAL_RATE: f64 = 0.6;
pub const SURVIVAL_RATE_SPREAD: f64 = 0.3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mission {
    pub id:          EntityId,
    pub title:       String,
    pub difficulty:  u32,
    pub enemy_power: u64,
    pub rewards:     Bundle,
    pub description: String,
}

impl Mission {
    /// Build an offer scaled to `difficulty` and the current `day`.
    pub fn offer(id: EntityId, title: String, difficulty: u32, day: u32, description: String) -> Self {
        Self {
            id,
            title,
            difficulty,
            enemy_power: enemy_power(difficulty, day),
            rewards: reward_bundle(difficulty, day),
            description,
        }
    }
}

/// An offer whose numbers are fixed but whose briefing is still on
/// its way from the narrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissionDraft {
    pub id:         EntityId,
    pub title:      String,
    pub difficulty: u32,
    pub day:        u32,
}

impl MissionDraft {
    pub fn brief(self, description: String) -> Mission {
        Mission::offer(self.id, self.title, self.difficulty, self.day, description)
    }
}

/// Difficulty drawn uniformly from `[1, 5 + day/10]`.
pub fn roll_difficulty(day: u32, rng: &mut SubsystemRng) -> u32 {
    let ceiling = 5 + u64::from(day / 10);
    1 + rng.next_u64_below(ceiling) as u32
}

pub fn enemy_power(difficulty: u32, day: u32) -> u64 {
    u64::from(difficulty) * 50 + u64::from(day) * 2
}

pub fn reward_bundle(difficulty: u32, day: u32) -> Bundle {
    let d = i64::from(difficulty);
    let day = i64::from(day);
    [
        (ResourceKind::Gold, d * 150 + day * 10),
        (ResourceKind::Steel, d * 75 + day * 5),
        (ResourceKind::Tech, d * 10 + day),
    ]
    .into()
}

/// `m-<unix millis>-<serial>`
pub fn mission_id(issued_at_ms: i64, serial: u64) -> EntityId {
    format!("m-{issued_at_ms}-{serial}")
}

/// `clamp(player / (enemy * 1.5), 0.05, 0.98)`
pub fn win_chance(player_power: u64, enemy_power: u64) -> f64 {
    if enemy_power == 0 {
        return MAX_WIN_CHANCE;
    }
    (player_power as f64 / (enemy_power as f64 * 1.5)).clamp(MIN_WIN_CHANCE, MAX_WIN_CHANCE)
}

/// Map a uniform draw in [0, 1) onto the survival range.
pub fn survival_rate(draw: f64) -> f64 {
    MIN_SURVIVAL_RATE + draw * SURVIVAL_RATE_SPREAD
}

#[derive(Debug, Clone, PartialEq)]
pub enum BattleOutcome {
    Victory { win_chance: f64, rewards: Bundle },
    Defeat { win_chance: f64, survival_rate: f64 },
}

/// Decide a battle from two uniform draws: `roll` against the win
/// chance, and `survival_draw` for the casualty rate on a loss.
pub fn resolve_battle(
    player_power: u64,
    mission: &Mission,
    roll: f64,
    survival_draw: f64,
) -> BattleOutcome {
    let chance = win_chance(player_power, mission.enemy_power);
    if roll < chance {
        BattleOutcome::Victory {
            win_chance: chance,
            rewards: mission.rewards.clone(),
        }
    } else {
        BattleOutcome::Defeat {
            win_chance: chance,
            survival_rate: survival_rate(survival_draw),
        }
    }
}

/// Proof that the holder owns the single in-flight replenishment.
/// Dropping it releases the board for the next scan.
#[derive(Debug)]
pub struct ScanToken {
    flag: Arc<AtomicBool>,
}

impl Drop for ScanToken {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

#[derive(Debug, Default)]
pub struct MissionBoard {
    offers:   Vec<Mission>,
    scanning: Arc<AtomicBool>,
    issued:   u64,
}

impl MissionBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offers(&self) -> &[Mission] {
        &self.offers
    }

    pub fn len(&self) -> usize {
        self.offers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offers.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.offers.len() >= MISSION_POOL_CAPACITY
    }

    /// Open slots left on the board.
    pub fn deficit(&self) -> usize {
        MISSION_POOL_CAPACITY.saturating_sub(self.offers.len())
    }

    pub fn get(&self, mission_id: &str) -> Option<&Mission> {
        self.offers.iter().find(|m| m.id == mission_id)
    }

    /// Remove and return an offer. Each mission can be taken once.
    pub fn take(&mut self, mission_id: &str) -> Option<Mission> {
        let index = self.offers.iter().position(|m| m.id == mission_id)?;
        Some(self.offers.remove(index))
    }

    /// Add offers up to capacity. Surplus offers (from scans that
    /// completed after the board filled up) are dropped.
    /// Returns the ids that made it onto the board.
    pub fn post(&mut self, missions: Vec<Mission>) -> Vec<EntityId> {
        let room = self.deficit();
        let mut posted = Vec::with_capacity(room.min(missions.len()));
        for mission in missions.into_iter().take(room) {
            posted.push(mission.id.clone());
            self.offers.push(mission);
        }
        posted
    }

    /// A fresh id, unique for the lifetime of this board even when two
    /// scans land in the same millisecond.
    pub fn next_id(&mut self, issued_at_ms: i64) -> EntityId {
        let id = mission_id(issued_at_ms, self.issued);
        self.issued += 1;
        id
    }

    pub fn clear(&mut self) {
        self.offers.clear();
    }

    /// Claim the scan slot. None while another scan is in flight.
    pub fn try_begin_scan(&self) -> Option<ScanToken> {
        self.scanning
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| ScanToken { flag: Arc::clone(&self.scanning) })
    }

    pub fn is_scanning(&self) -> bool {
        self.scanning.load(Ordering::Acquire)
    }
}
