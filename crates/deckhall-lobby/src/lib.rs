//! User and room registries for the Deckhall lobby.
//!
//! The authoritative in-memory state of the server:
//!
//! 1. **User registry**: nickname → identity, with unique-nickname and
//!    rename semantics ([`UserRegistry`]).
//! 2. **Room registry**: room lifecycle, membership, readiness, host
//!    migration, and auto-cleanup ([`RoomRegistry`]).
//!
//! Both are plain single-threaded structures; the dispatcher above owns
//! the locking.

mod error;
mod room;
mod user;

pub use error::LobbyError;
pub use room::{
    Room, RoomConfig, RoomPlayer, RoomRegistry, MAX_PLAYER_LIMIT,
    MIN_PLAYER_LIMIT,
};
pub use user::UserRegistry;
