use thiserror::Error;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Building '{id}' not found")]
    UnknownBuilding { id: String },

    #[error("Unit '{id}' not found")]
    UnknownUnit { id: String },

    #[error("Mission '{id}' is not on the board")]
    UnknownMission { id: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type GameResult<T> = Result<T, GameError>;
