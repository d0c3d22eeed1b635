//! # Deckhall
//!
//! Real-time card-game lobby server speaking JSON-RPC 2.0 over
//! WebSocket. Connections claim an identity, discover and join rooms,
//! toggle readiness, and the host starts the card round.
//!
//! The layers, bottom up:
//!
//! - [`deckhall_transport`]: WebSocket accept loop and text frames.
//! - [`deckhall_protocol`]: JSON-RPC 2.0 framing and payload types.
//! - [`deckhall_table`]: seat table and round phase machine.
//! - [`deckhall_lobby`]: user and room registries.
//! - this crate: the [`Dispatcher`], per-connection state, and the
//!   [`LobbyServer`] harness tying everything together.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use deckhall::LobbyServer;
//!
//! # async fn run() -> Result<(), deckhall::ServerError> {
//! let server = LobbyServer::builder().bind("0.0.0.0:7998").build().await?;
//! server.run().await
//! # }
//! ```

mod app;
mod connection;
mod dispatch;
mod error;
mod server;

pub use app::{register_methods, LobbyApp};
pub use connection::ConnectionState;
pub use dispatch::Dispatcher;
pub use error::ServerError;
pub use server::{LobbyServer, LobbyServerBuilder};

/// Everything a server embedder usually needs.
pub mod prelude {
    pub use crate::{
        ConnectionState, Dispatcher, LobbyApp, LobbyServer,
        LobbyServerBuilder, ServerError,
    };
    pub use deckhall_lobby::{
        LobbyError, RoomRegistry, UserRegistry, MAX_PLAYER_LIMIT,
        MIN_PLAYER_LIMIT,
    };
    pub use deckhall_protocol::{
        parse_frame, Call, ErrorObject, Frame, RequestId, RoomDetail,
        RoomId, RoomSummary, UserId,
    };
    pub use deckhall_table::{CardRound, RoundConfig, RoundPhase};
    pub use deckhall_transport::TransportConfig;
}
