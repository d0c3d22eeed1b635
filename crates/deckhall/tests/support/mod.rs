//! Test client and fixture for integration tests.
//!
//! [`spawn_server`] boots a real server on an ephemeral loopback port;
//! [`RpcClient`] is a blocking-style JSON-RPC client over a real
//! WebSocket, with explicit read timeouts so a missing reply fails the
//! test instead of hanging it.

use std::time::Duration;

use deckhall::LobbyServer;
use deckhall_protocol::{
    encode_notification, encode_request, parse_frame, Call, ErrorObject,
    Frame, RequestId,
};
use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use tokio_tungstenite::tungstenite::Message;

type ClientWs = tokio_tungstenite::WebSocketStream<
    tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
>;

const READ_TIMEOUT: Duration = Duration::from_secs(2);

/// Starts a server on a random loopback port and returns its address.
///
/// The integration harness allows larger frames than the production
/// default so tests can push multi-room payloads through.
pub async fn spawn_server() -> String {
    let server = LobbyServer::builder()
        .bind("127.0.0.1:0")
        .max_frame_size(2048)
        .build()
        .await
        .expect("server should build");

    let addr = server
        .local_addr()
        .expect("should have local addr")
        .to_string();

    tokio::spawn(async move {
        let _ = server.run().await;
    });

    // Give the accept loop a moment to start.
    tokio::time::sleep(Duration::from_millis(10)).await;
    addr
}

/// A synchronous-feeling JSON-RPC client for driving the server.
pub struct RpcClient {
    ws: ClientWs,
    next_id: i64,
}

impl RpcClient {
    /// Connects and consumes the welcome notification.
    pub async fn connect(addr: &str) -> Self {
        let mut client = Self::connect_raw(addr).await;
        let welcome = client.recv_frame().await;
        match welcome {
            Frame::Call(call) if call.method == "system" => {}
            other => panic!("expected welcome notification, got {other:?}"),
        }
        client
    }

    /// Connects without consuming anything, for tests that assert on
    /// the welcome frame itself.
    pub async fn connect_raw(addr: &str) -> Self {
        let (ws, _) =
            tokio_tungstenite::connect_async(format!("ws://{addr}"))
                .await
                .expect("client should connect");
        Self { ws, next_id: 0 }
    }

    /// Receives and parses the next frame, failing after the timeout.
    pub async fn recv_frame(&mut self) -> Frame {
        let msg = tokio::time::timeout(READ_TIMEOUT, self.ws.next())
            .await
            .expect("timed out waiting for a frame")
            .expect("connection ended unexpectedly")
            .expect("websocket error");
        parse_frame(&msg.into_data()).expect("server sent unparseable frame")
    }

    /// Receives the next notification, skipping nothing.
    pub async fn recv_notification(&mut self) -> Call {
        match self.recv_frame().await {
            Frame::Call(call) if call.is_notification() => call,
            other => panic!("expected notification, got {other:?}"),
        }
    }

    /// Sends a request and awaits the response or error with the same id.
    pub async fn call(
        &mut self,
        method: &str,
        params: Value,
    ) -> Result<Value, ErrorObject> {
        self.next_id += 1;
        let id = RequestId::Number(self.next_id);
        self.send_text(&encode_request(&id, method, &params)).await;

        loop {
            match self.recv_frame().await {
                Frame::Response(resp) if resp.id == id => {
                    return Ok(resp.result);
                }
                Frame::Error(err) if err.id.as_ref() == Some(&id) => {
                    return Err(err.error);
                }
                Frame::Call(call) if call.is_notification() => {
                    // Server-pushed notification between request and
                    // reply; irrelevant to this call.
                    continue;
                }
                other => panic!("unexpected frame {other:?}"),
            }
        }
    }

    /// Sends a request and returns its `result`, panicking on error.
    pub async fn call_ok(&mut self, method: &str, params: Value) -> Value {
        self.call(method, params)
            .await
            .unwrap_or_else(|e| panic!("{method} failed: {e:?}"))
    }

    /// Sends a request and returns its error, panicking on success.
    pub async fn call_err(
        &mut self,
        method: &str,
        params: Value,
    ) -> ErrorObject {
        match self.call(method, params).await {
            Err(e) => e,
            Ok(v) => panic!("{method} unexpectedly succeeded: {v}"),
        }
    }

    /// Sends a notification (no id, no reply expected).
    pub async fn notify(&mut self, method: &str, params: Value) {
        self.send_text(&encode_notification(method, &params)).await;
    }

    /// Sends an arbitrary text payload.
    pub async fn send_text(&mut self, text: &str) {
        self.ws
            .send(Message::Text(text.to_string().into()))
            .await
            .expect("send should succeed");
    }

    /// Sends arbitrary raw bytes as a binary frame.
    pub async fn send_bytes(&mut self, bytes: &[u8]) {
        self.ws
            .send(Message::Binary(bytes.to_vec().into()))
            .await
            .expect("send should succeed");
    }

    /// Closes the connection.
    pub async fn close(mut self) {
        let _ = self.ws.send(Message::Close(None)).await;
    }
}
