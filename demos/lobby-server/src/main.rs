//! Runnable lobby server.
//!
//! Binds the default lobby port (or the address given as the first
//! argument) and serves until terminated.

use deckhall::LobbyServer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let addr = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "0.0.0.0:7998".to_string());

    let server = LobbyServer::builder().bind(&addr).build().await?;
    tracing::info!(%addr, "deckhall lobby server listening");

    server.run().await?;
    Ok(())
}
