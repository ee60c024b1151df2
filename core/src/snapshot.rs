//! Save slot: the whole game state to/from one durable JSON record.
//!
//! The engine writes the slot after every mutation. On boot the slot
//! is read back; an absent or unreadable slot falls back to the
//! initial aggregate, and the corrupt record is overwritten by the
//! next save.

use crate::{
    config::GameConfig,
    error::GameResult,
    state::GameState,
    store::GameStore,
};

pub fn encode(state: &GameState) -> GameResult<String> {
    Ok(serde_json::to_string(state)?)
}

/// Parse a saved record. A missing journal is replaced by a single
/// relink notice.
pub fn decode(json: &str) -> GameResult<GameState> {
    Ok(serde_json::from_str(json)?)
}

/// Where a booted state came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    Restored,
    Fresh,
}

#[derive(Debug, Clone)]
pub struct SaveSlot {
    key: String,
}

impl SaveSlot {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn save(&self, store: &GameStore, state: &GameState) -> GameResult<()> {
        store.write_slot(&self.key, &encode(state)?)
    }

    /// Ok(None) when the slot is empty or its contents cannot be parsed.
    pub fn load(&self, store: &GameStore) -> GameResult<Option<GameState>> {
        let Some(json) = store.read_slot(&self.key)? else {
            return Ok(None);
        };
        match decode(&json) {
            Ok(state) => Ok(Some(state)),
            Err(e) => {
                log::warn!("save slot '{}' is unreadable, starting fresh: {e}", self.key);
                Ok(None)
            }
        }
    }

    pub fn load_or_initial(
        &self,
        store: &GameStore,
        config: &GameConfig,
    ) -> GameResult<(GameState, Provenance)> {
        Ok(match self.load(store)? {
            Some(state) => (state, Provenance::Restored),
            None => (GameState::initial(config), Provenance::Fresh),
        })
    }

    pub fn clear(&self, store: &GameStore) -> GameResult<()> {
        store.clear_slot(&self.key)
    }
}
