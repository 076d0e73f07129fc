//! Mock backend for local development
//!
//! Serves the static directory and a canned JSON reply to submissions.

mod routes;

pub use routes::{router, ServerState};

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::path::PathBuf;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Where the mock backend listens and what it serves
#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub port: u16,
    pub static_dir: PathBuf,
    pub fixture: PathBuf,
}

/// Run the mock backend until the process is stopped
pub async fn serve(settings: ServerSettings) -> Result<()> {
    let app = router(ServerState::new(settings.fixture.clone()), &settings.static_dir)
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], settings.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("failed to bind to address")?;

    info!(
        %addr,
        static_dir = %settings.static_dir.display(),
        fixture = %settings.fixture.display(),
        "Mock server listening"
    );

    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}
