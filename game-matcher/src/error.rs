//! Error types for the hosting layer. The scheduling engine itself never fails.

use thiserror::Error;

use crate::matching::TeamType;

/// Rejections raised while validating a session configuration
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("at least one player is required")]
    NoPlayers,

    #[error("courts, hours and games per hour must all be at least 1 (got {courts}, {hours}, {games_per_hour})")]
    InvalidSessionSize {
        courts: u32,
        hours: u32,
        games_per_hour: u32,
    },

    #[error("{requested} games requested, at most {max} fit in one session")]
    TooManyGames { requested: u64, max: u32 },

    #[error("{slots} player slots cannot seat {players} players; add courts, hours or games per hour")]
    NotEnoughSlots { slots: u32, players: usize },

    #[error("duplicate player id: {0}")]
    DuplicatePlayerId(String),

    #[error("fixed partnership names unknown player: {0}")]
    UnknownPartner(String),

    #[error("fixed partnership pairs player {0} with themselves")]
    SelfPartnership(String),

    #[error("player {player_id} cannot be fixed into a {} team", .team_type.code())]
    PartnerTypeMismatch { player_id: String, team_type: TeamType },

    #[error("player {player_id} already has a fixed {} partner", .team_type.code())]
    AlreadyFixed { player_id: String, team_type: TeamType },
}

/// Failures while loading a roster or session file
#[derive(Debug, Error)]
pub enum RosterError {
    #[error("failed to read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid session JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("row {row}: unknown gender {value:?}")]
    UnknownGender { row: usize, value: String },

    #[error("row {row}: unknown grade {value:?}")]
    UnknownGrade { row: usize, value: String },
}
