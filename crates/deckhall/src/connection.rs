//! Per-connection state.

use deckhall_protocol::{RoomId, UserId};

/// What the server knows about one transport session.
///
/// Owned by exactly one connection task; the transport delivers a
/// connection's frames in order, so handlers never race on this.
/// `user_name` is the connection's own copy of the nickname; the user
/// registry holds an independent one.
#[derive(Debug, Default)]
pub struct ConnectionState {
    /// Bound identity, set by `user_set_name`.
    pub user_id: Option<UserId>,
    /// Connection-owned copy of the nickname.
    pub user_name: Option<String>,
    /// Room the user currently occupies, mirrored from the room registry.
    pub room_id: Option<RoomId>,
    /// Guards `on_disconnect` against running twice.
    pub disconnected: bool,
}

impl ConnectionState {
    pub fn new() -> Self {
        Self::default()
    }
}
