//! `LobbyServer` builder and accept loop.
//!
//! Glue between the transport and the dispatcher: accept a connection,
//! push the welcome notification, then route every inbound frame until
//! the peer goes away, at which point the disconnect callback fires.

use std::sync::Arc;
use std::time::Duration;

use deckhall_protocol::{
    encode_error, map_parse_frame_error, parse_frame, Frame,
};
use deckhall_transport::{
    Connection, Transport, TransportConfig, WebSocketConnection,
    WebSocketTransport,
};

use crate::app::{register_methods, LobbyApp};
use crate::connection::ConnectionState;
use crate::dispatch::Dispatcher;
use crate::ServerError;

/// Shared state handed to each connection task.
pub(crate) struct ServerState {
    pub(crate) app: LobbyApp,
    pub(crate) dispatcher: Dispatcher<LobbyApp>,
}

/// Builder for configuring and starting a lobby server.
///
/// # Example
///
/// ```rust,ignore
/// use deckhall::LobbyServer;
///
/// let server = LobbyServer::builder()
///     .bind("0.0.0.0:7998")
///     .build()
///     .await?;
/// server.run().await
/// ```
pub struct LobbyServerBuilder {
    bind_addr: String,
    transport_config: TransportConfig,
}

impl LobbyServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: "0.0.0.0:7998".to_string(),
            transport_config: TransportConfig::default(),
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets the maximum inbound frame size in bytes.
    pub fn max_frame_size(mut self, bytes: usize) -> Self {
        self.transport_config.max_frame_size = bytes;
        self
    }

    /// Sets the WebSocket handshake timeout.
    pub fn handshake_timeout(mut self, timeout: Duration) -> Self {
        self.transport_config.handshake_timeout = timeout;
        self
    }

    /// Builds the server: registers the method surface and binds the
    /// transport.
    pub async fn build(self) -> Result<LobbyServer, ServerError> {
        let mut dispatcher = Dispatcher::new();
        register_methods(&mut dispatcher)?;

        let transport = WebSocketTransport::bind_with_config(
            &self.bind_addr,
            self.transport_config,
        )
        .await?;

        Ok(LobbyServer {
            transport,
            state: Arc::new(ServerState {
                app: LobbyApp::new(),
                dispatcher,
            }),
        })
    }
}

impl Default for LobbyServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A running lobby server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct LobbyServer {
    transport: WebSocketTransport,
    state: Arc<ServerState>,
}

impl LobbyServer {
    /// Creates a new builder.
    pub fn builder() -> LobbyServerBuilder {
        LobbyServerBuilder::new()
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }

    /// Runs the accept loop, spawning one task per connection. Runs
    /// until the process is terminated.
    pub async fn run(mut self) -> Result<(), ServerError> {
        tracing::info!("lobby server running");

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(handle_connection(conn, state));
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}

/// Handles a single connection from welcome to teardown.
async fn handle_connection(
    conn: WebSocketConnection,
    state: Arc<ServerState>,
) {
    let conn_id = conn.id();
    let mut conn_state = ConnectionState::new();
    tracing::debug!(%conn_id, "handling new connection");

    let welcome = state.dispatcher.on_connect();
    if let Err(e) = conn.send(&welcome).await {
        tracing::debug!(%conn_id, error = %e, "failed to send welcome");
        state.app.on_disconnect(&mut conn_state);
        return;
    }

    loop {
        let payload = match conn.recv().await {
            Ok(Some(payload)) => payload,
            Ok(None) => {
                tracing::debug!(%conn_id, "connection closed cleanly");
                break;
            }
            Err(e) => {
                tracing::debug!(%conn_id, error = %e, "recv error");
                break;
            }
        };

        match parse_frame(&payload) {
            Ok(Frame::Call(call)) => {
                tracing::debug!(
                    %conn_id,
                    method = %call.method,
                    notification = call.is_notification(),
                    "frame received"
                );
                let reply = state.dispatcher.on_call(
                    &state.app,
                    &mut conn_state,
                    &call,
                );
                if let Some(reply) = reply {
                    if let Err(e) = conn.send(&reply).await {
                        tracing::debug!(
                            %conn_id, error = %e, "failed to write reply"
                        );
                        break;
                    }
                }
            }
            Ok(Frame::Response(resp)) => {
                tracing::debug!(
                    %conn_id,
                    id = %resp.id,
                    "unexpected response frame from client, dropped"
                );
            }
            Ok(Frame::Error(err)) => {
                tracing::debug!(
                    %conn_id,
                    code = err.error.code,
                    message = %err.error.message,
                    "unexpected error frame from client, dropped"
                );
            }
            Err(parse_err) => {
                let reply =
                    encode_error(None, &map_parse_frame_error(&parse_err));
                // The connection is already suspect; a failed write of
                // the error reply is logged and swallowed.
                if let Err(e) = conn.send(&reply).await {
                    tracing::debug!(
                        %conn_id, error = %e, "failed to write parse error"
                    );
                }
            }
        }
    }

    state.app.on_disconnect(&mut conn_state);
    tracing::debug!(%conn_id, "connection torn down");
}
