//! Error types for the lobby layer.

use deckhall_table::RoundError;

/// Errors raised by the user and room registries.
///
/// The dispatcher encodes these as `-32000` error frames whose message
/// is the variant's textual [`name`](LobbyError::name).
#[derive(Debug, thiserror::Error)]
pub enum LobbyError {
    // -- User domain --
    /// The nickname is held by another user.
    #[error("nickname already taken")]
    UserExists,

    /// No user with that id exists.
    #[error("user not found")]
    UserNotFound,

    /// The nickname is empty after trimming.
    #[error("invalid nickname")]
    InvalidUsername,

    // -- Room domain --
    /// The caller has not claimed an identity yet.
    #[error("not logged in")]
    NotLoggedIn,

    /// The caller has an identity but no username bound.
    #[error("no username bound")]
    MissingUsername,

    /// The caller is already a member of a room.
    #[error("already in a room")]
    AlreadyInRoom,

    /// A room with that name already exists.
    #[error("room name already taken")]
    RoomNameExists,

    /// The room name is empty after trimming.
    #[error("invalid room name")]
    InvalidRoomName,

    /// The player limit is outside the allowed range, or below the
    /// room's current occupancy.
    #[error("invalid player limit")]
    InvalidPlayerLimit,

    /// No room with that id exists.
    #[error("room not found")]
    RoomNotFound,

    /// The room has no free player slots.
    #[error("room is full")]
    RoomFull,

    /// The room's round is already running.
    #[error("room is in game")]
    RoomInProgress,

    /// The caller is not a member of any room.
    #[error("not in a room")]
    NotInRoom,

    /// The operation is reserved for the room's host.
    #[error("caller is not the host")]
    NotHost,

    /// Not every member is prepared.
    #[error("players not ready")]
    PlayersNotReady,

    // -- Round passthrough --
    /// A failure from the round machine while starting or updating a game.
    #[error(transparent)]
    Round(#[from] RoundError),
}

impl LobbyError {
    /// The variant's textual name, used as the wire error message.
    pub fn name(&self) -> &'static str {
        match self {
            Self::UserExists => "UserExists",
            Self::UserNotFound => "UserNotFound",
            Self::InvalidUsername => "InvalidUsername",
            Self::NotLoggedIn => "NotLoggedIn",
            Self::MissingUsername => "MissingUsername",
            Self::AlreadyInRoom => "AlreadyInRoom",
            Self::RoomNameExists => "RoomNameExists",
            Self::InvalidRoomName => "InvalidRoomName",
            Self::InvalidPlayerLimit => "InvalidPlayerLimit",
            Self::RoomNotFound => "RoomNotFound",
            Self::RoomFull => "RoomFull",
            Self::RoomInProgress => "RoomInProgress",
            Self::NotInRoom => "NotInRoom",
            Self::NotHost => "NotHost",
            Self::PlayersNotReady => "PlayersNotReady",
            Self::Round(e) => e.name(),
        }
    }
}
