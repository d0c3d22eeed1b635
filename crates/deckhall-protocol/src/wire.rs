//! Payload types carried inside JSON-RPC frames.
//!
//! These are the method parameter and result shapes of the lobby
//! protocol. Unknown fields are ignored on input (serde's default), and
//! enum states serialize as the lowercase snake_case strings the client
//! SDK matches on.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A unique identifier for a user, assigned on first nickname claim.
///
/// Serializes as a plain number via `#[serde(transparent)]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "U-{}", self.0)
    }
}

/// A unique identifier for a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(pub u32);

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Room state on the wire
// ---------------------------------------------------------------------------

/// Lifecycle of a room as the client sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomLifecycle {
    /// Accepting joins, readiness toggles, and config updates.
    Waiting,
    /// A round is running.
    InGame,
}

/// Readiness of a single room member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerReadiness {
    NotPrepared,
    Prepared,
}

/// One row of a `room_list` snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomSummary {
    pub id: RoomId,
    pub name: String,
    pub state: RoomLifecycle,
    pub player_count: u8,
    pub player_limit: u8,
}

/// One member inside a [`RoomDetail`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomPlayerInfo {
    pub user_id: UserId,
    pub username: String,
    pub state: PlayerReadiness,
    pub is_host: bool,
}

/// Adjustable room settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomConfigInfo {
    pub player_limit: u8,
}

/// Full view of one room, returned by every room mutation.
///
/// `player_limit` is duplicated at the top level and inside `config`;
/// the two always agree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomDetail {
    pub id: RoomId,
    pub name: String,
    pub state: RoomLifecycle,
    pub host_id: UserId,
    pub player_limit: u8,
    pub config: RoomConfigInfo,
    pub players: Vec<RoomPlayerInfo>,
}

// ---------------------------------------------------------------------------
// Method parameter shapes
// ---------------------------------------------------------------------------

/// Parameters for methods that take none (`ping`, `room_list`, ...).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct EmptyParams {}

/// `user_set_name` parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetNameParams {
    pub nickname: String,
}

/// `room_create` parameters. A missing or blank name is auto-assigned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRoomParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub player_limit: u8,
}

/// `room_join` parameters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct JoinRoomParams {
    pub room_id: RoomId,
}

/// `room_ready` parameters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ReadyParams {
    pub prepared: bool,
}

/// `room_config_update` parameters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ConfigUpdateParams {
    pub player_limit: u8,
}

// ---------------------------------------------------------------------------
// Method result shapes
// ---------------------------------------------------------------------------

/// A status payload: the `system` welcome notification and the `ping`
/// response both use this shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusMessage {
    pub code: String,
    pub message: String,
}

impl StatusMessage {
    /// The notification pushed to every freshly accepted connection.
    pub fn welcome() -> Self {
        Self {
            code: "connected".into(),
            message: "Welcome to the game server".into(),
        }
    }

    /// The `ping` response.
    pub fn pong() -> Self {
        Self {
            code: "pong".into(),
            message: "Heartbeat ok".into(),
        }
    }
}

/// `user_set_name` result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetNameResult {
    pub id: UserId,
    pub username: String,
}

/// `room_list` result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomListResult {
    pub rooms: Vec<RoomSummary>,
}

/// `room_leave` result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LeaveRoomResult {
    pub room_id: RoomId,
}

// =========================================================================
// Tests
// =========================================================================
