//! Integration tests for the WebSocket transport.
//!
//! These spin up a real listener and a real `tokio-tungstenite` client to
//! verify that frames actually flow over the network, that text payloads
//! survive the round trip byte-for-byte, and that the configured frame
//! cap is enforced by the handshake config.

#[cfg(feature = "websocket")]
mod websocket {
    use std::time::Duration;

    use deckhall_transport::{
        Connection, Transport, TransportConfig, WebSocketTransport,
    };
    use futures_util::{SinkExt, StreamExt};
    use tokio_tungstenite::tungstenite::Message;

    type ClientWs = tokio_tungstenite::WebSocketStream<
        tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
    >;

    async fn connect_client(addr: &str) -> ClientWs {
        let url = format!("ws://{addr}");
        let (ws, _) = tokio_tungstenite::connect_async(&url)
            .await
            .expect("client should connect");
        ws
    }

    /// Binds on an ephemeral port and returns (transport, addr).
    async fn bind_ephemeral(
        config: TransportConfig,
    ) -> (WebSocketTransport, String) {
        let transport =
            WebSocketTransport::bind_with_config("127.0.0.1:0", config)
                .await
                .expect("should bind");
        let addr = transport
            .local_addr()
            .expect("should have local addr")
            .to_string();
        (transport, addr)
    }

    #[tokio::test]
    async fn test_accept_and_exchange_text_frames() {
        let (mut transport, addr) =
            bind_ephemeral(TransportConfig::default()).await;

        let server_handle = tokio::spawn(async move {
            transport.accept().await.expect("should accept")
        });

        let mut client_ws = connect_client(&addr).await;
        let server_conn =
            server_handle.await.expect("task should complete");

        assert!(server_conn.id().into_inner() > 0);

        // Server sends, client receives.
        server_conn
            .send(r#"{"hello":"client"}"#)
            .await
            .expect("send should succeed");
        let msg = client_ws.next().await.unwrap().unwrap();
        assert_eq!(msg.into_data().as_ref(), br#"{"hello":"client"}"#);

        // Client sends, server receives.
        client_ws
            .send(Message::Text(r#"{"hello":"server"}"#.into()))
            .await
            .unwrap();
        let received = server_conn
            .recv()
            .await
            .expect("recv should succeed")
            .expect("should have data");
        assert_eq!(received, br#"{"hello":"server"}"#);

        server_conn.close().await.expect("close should succeed");
    }

    #[tokio::test]
    async fn test_recv_surfaces_binary_payloads_as_bytes() {
        let (mut transport, addr) =
            bind_ephemeral(TransportConfig::default()).await;

        let server_handle = tokio::spawn(async move {
            transport.accept().await.expect("should accept")
        });

        let mut client_ws = connect_client(&addr).await;
        let server_conn = server_handle.await.unwrap();

        client_ws
            .send(Message::Binary(b"{\"id\":1}".to_vec().into()))
            .await
            .unwrap();

        let received = server_conn.recv().await.unwrap().unwrap();
        assert_eq!(received, b"{\"id\":1}");
    }

    #[tokio::test]
    async fn test_recv_returns_none_on_client_close() {
        let (mut transport, addr) =
            bind_ephemeral(TransportConfig::default()).await;

        let server_handle = tokio::spawn(async move {
            transport.accept().await.expect("should accept")
        });

        let mut client_ws = connect_client(&addr).await;
        let server_conn = server_handle.await.unwrap();

        client_ws.send(Message::Close(None)).await.unwrap();

        let result =
            server_conn.recv().await.expect("recv should not error");
        assert!(result.is_none(), "should return None on client close");
    }

    #[tokio::test]
    async fn test_oversized_frame_is_rejected() {
        let config = TransportConfig {
            max_frame_size: 64,
            handshake_timeout: Duration::from_secs(5),
        };
        let (mut transport, addr) = bind_ephemeral(config).await;

        let server_handle = tokio::spawn(async move {
            transport.accept().await.expect("should accept")
        });

        let mut client_ws = connect_client(&addr).await;
        let server_conn = server_handle.await.unwrap();

        let oversized = "x".repeat(4096);
        client_ws
            .send(Message::Text(oversized.into()))
            .await
            .unwrap();

        // The server side must not surface the oversized payload as data.
        match server_conn.recv().await {
            Err(_) | Ok(None) => {}
            Ok(Some(data)) => {
                panic!("oversized frame leaked through ({} bytes)", data.len())
            }
        }
    }

    #[tokio::test]
    async fn test_connection_ids_are_unique() {
        let (mut transport, addr) =
            bind_ephemeral(TransportConfig::default()).await;

        let server_handle = tokio::spawn(async move {
            let a = transport.accept().await.expect("accept first");
            let b = transport.accept().await.expect("accept second");
            (a, b)
        });

        let _c1 = connect_client(&addr).await;
        let _c2 = connect_client(&addr).await;
        let (a, b) = server_handle.await.unwrap();

        assert_ne!(a.id(), b.id());
    }
}
