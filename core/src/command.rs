use crate::types::EntityId;
use serde::{Deserialize, Serialize};

/// All player-issued actions.
/// Variants are only ever added, never removed or reordered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum PlayerCommand {
    Upgrade { building_id: EntityId },
    Train { unit_id: EntityId },
    StartMission { mission_id: EntityId },
    ScanForMissions {
        #[serde(default)]
        manual: bool,
    },
    RequestAdvice,
    ResetGame,
}

impl PlayerCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Upgrade { .. }         => "upgrade",
            Self::Train { .. }           => "train",
            Self::StartMission { .. }    => "start_mission",
            Self::ScanForMissions { .. } => "scan_for_missions",
            Self::RequestAdvice          => "request_advice",
            Self::ResetGame              => "reset_game",
        }
    }
}
