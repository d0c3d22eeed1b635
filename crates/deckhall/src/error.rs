//! Unified error type for the Deckhall server crate.

use deckhall_lobby::LobbyError;
use deckhall_protocol::FrameError;
use deckhall_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attributes auto-generate `From` impls so the `?`
/// operator converts sub-crate errors on the way up.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// A transport-level error (bind, accept, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A framing-level error (parse, classify).
    #[error(transparent)]
    Frame(#[from] FrameError),

    /// A lobby-level error (users, rooms, rounds).
    #[error(transparent)]
    Lobby(#[from] LobbyError),

    /// A method name was registered twice. Registration happens once at
    /// startup, so this is a programming error surfaced early.
    #[error("handler already registered for method `{0}`")]
    HandlerExists(&'static str),
}
