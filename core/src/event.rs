//! Typed game events: the audit trail of everything that happened.
//!
//! RULE: Every state change the engine makes is reported as an event,
//! and every event is appended to the event_log table.
//! Variants are only ever added, never removed or reordered.

use crate::{
    resources::Bundle,
    types::{EntityId, SessionId, Tick},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    // ── Engine events ──────────────────────────────
    SessionStarted {
        session_id: SessionId,
        seed:       u64,
        restored:   bool,
    },
    GameReset {
        tick: Tick,
    },

    // ── Clock-driven events ────────────────────────
    ProductionApplied {
        tick:    Tick,
        yielded: Bundle,
    },
    DayAdvanced {
        tick:          Tick,
        day:           u32,
        hostile_alert: bool,
    },

    // ── Mission board ──────────────────────────────
    MissionsPosted {
        tick:        Tick,
        mission_ids: Vec<EntityId>,
        manual:      bool,
    },
    ScanIdle {
        tick:   Tick,
        manual: bool,
    },
    ScanSuppressed {
        tick:   Tick,
        manual: bool,
    },

    // ── Player actions ─────────────────────────────
    BuildingUpgraded {
        tick:        Tick,
        building_id: EntityId,
        new_level:   u32,
        cost:        Bundle,
    },
    UpgradeRejected {
        tick:        Tick,
        building_id: EntityId,
        reason:      Rejection,
    },
    UnitTrained {
        tick:    Tick,
        unit_id: EntityId,
        count:   u32,
        cost:    Bundle,
    },
    TrainingRejected {
        tick:    Tick,
        unit_id: EntityId,
        reason:  Rejection,
    },
    MissionWon {
        tick:       Tick,
        mission_id: EntityId,
        win_chance: f64,
        rewards:    Bundle,
    },
    MissionLost {
        tick:          Tick,
        mission_id:    EntityId,
        win_chance:    f64,
        survival_rate: f64,
    },
    MissionRejected {
        tick:       Tick,
        mission_id: EntityId,
        reason:     Rejection,
    },
    AdviceIssued {
        tick: Tick,
        text: String,
    },

    /// Offers drafted; briefings requested from the narrator. The
    /// matching MissionsPosted follows once they arrive.
    ScanStarted {
        tick:      Tick,
        manual:    bool,
        requested: usize,
    },
}

/// Why a player action was refused. Refusals never change state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Rejection {
    InsufficientResources { needed: Bundle },
    CommandLevelTooLow { required_level: u32 },
    BarracksLevelTooLow { required_level: u32 },
    NoForces,
}

impl GameEvent {
    /// Stable string name, used for the event_type column.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::SessionStarted { .. }    => "session_started",
            Self::GameReset { .. }         => "game_reset",
            Self::ProductionApplied { .. } => "production_applied",
            Self::DayAdvanced { .. }       => "day_advanced",
            Self::MissionsPosted { .. }    => "missions_posted",
            Self::ScanIdle { .. }          => "scan_idle",
            Self::ScanSuppressed { .. }    => "scan_suppressed",
            Self::BuildingUpgraded { .. }  => "building_upgraded",
            Self::UpgradeRejected { .. }   => "upgrade_rejected",
            Self::UnitTrained { .. }       => "unit_trained",
            Self::TrainingRejected { .. }  => "training_rejected",
            Self::MissionWon { .. }        => "mission_won",
            Self::MissionLost { .. }       => "mission_lost",
            Self::MissionRejected { .. }   => "mission_rejected",
            Self::AdviceIssued { .. }      => "advice_issued",
            Self::ScanStarted { .. }       => "scan_started",
        }
    }
}

/// The event log entry as persisted to SQLite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventLogEntry {
    pub id:         Option<i64>,
    pub session_id: SessionId,
    pub tick:       Tick,
    pub source:     String,
    pub event_type: String,
    pub payload:    String, // JSON-serialized GameEvent
}
