//! Error types for the table layer.

use deckhall_protocol::UserId;

use crate::round::RoundPhase;

/// Errors raised by seat-level table operations.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    /// The seat index is outside the table's seat range.
    #[error("seat {0} is out of range")]
    InvalidSeat(usize),

    /// The seat already holds a player.
    #[error("seat {0} is occupied")]
    SeatOccupied(usize),

    /// The seat holds no player.
    #[error("seat {0} is empty")]
    SeatEmpty(usize),

    /// Every seat is taken.
    #[error("table is full")]
    TableFull,

    /// The user is not seated at this table.
    #[error("player {0} not seated")]
    PlayerNotFound(UserId),

    /// An operation needed at least one occupied seat.
    #[error("no players seated")]
    NoPlayersSeated,

    /// The current-turn pointer is unset.
    #[error("current turn not set")]
    TurnNotSet,

    /// The table was constructed with unusable settings.
    #[error("invalid table config: {0}")]
    InvalidConfig(String),
}

impl TableError {
    /// The variant's textual name, used as the wire error message.
    pub fn name(&self) -> &'static str {
        match self {
            Self::InvalidSeat(_) => "InvalidSeat",
            Self::SeatOccupied(_) => "SeatOccupied",
            Self::SeatEmpty(_) => "SeatEmpty",
            Self::TableFull => "TableFull",
            Self::PlayerNotFound(_) => "PlayerNotFound",
            Self::NoPlayersSeated => "NoPlayersSeated",
            Self::TurnNotSet => "TurnNotSet",
            Self::InvalidConfig(_) => "InvalidConfig",
        }
    }
}

/// Errors raised by the round phase machine.
#[derive(Debug, thiserror::Error)]
pub enum RoundError {
    /// The operation is not legal in the round's current phase.
    #[error("operation not legal in phase {0}")]
    InvalidPhaseTransition(RoundPhase),

    /// Challenge resolution was attempted before a toss winner was set.
    #[error("no toss winner set")]
    MissingTossWinner,

    /// Fewer players are seated than the round requires.
    #[error("{seated} players seated, {required} required")]
    NotEnoughPlayers { seated: usize, required: usize },

    /// A seat-level failure during a round operation.
    #[error(transparent)]
    Table(#[from] TableError),
}

impl RoundError {
    /// The variant's textual name, used as the wire error message.
    pub fn name(&self) -> &'static str {
        match self {
            Self::InvalidPhaseTransition(_) => "InvalidPhaseTransition",
            Self::MissingTossWinner => "MissingTossWinner",
            Self::NotEnoughPlayers { .. } => "NotEnoughPlayers",
            Self::Table(e) => e.name(),
        }
    }
}
