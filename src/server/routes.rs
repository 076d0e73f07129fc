//! Mock backend routes
//!
//! `POST /api/users` answers every submission with the same fixture file,
//! read from disk on each request so it can be swapped while the server runs.
//! Everything else is served from the static directory.

use axum::{
    body::Bytes,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tower_http::services::ServeDir;
use tracing::{debug, warn};

/// Shared state for the mock routes
#[derive(Debug, Clone)]
pub struct ServerState {
    fixture: Arc<PathBuf>,
}

impl ServerState {
    pub fn new(fixture: PathBuf) -> Self {
        Self {
            fixture: Arc::new(fixture),
        }
    }

    pub fn fixture(&self) -> &Path {
        &self.fixture
    }
}

/// Create the mock backend router
pub fn router(state: ServerState, static_dir: &Path) -> Router {
    Router::new()
        .route("/api/users", post(create_user))
        .fallback_service(ServeDir::new(static_dir))
        .with_state(state)
}

/// Canned reply to a form submission; the body is not inspected
async fn create_user(State(state): State<ServerState>, body: Bytes) -> Response {
    debug!(bytes = body.len(), "Received submission");

    match fs::read_to_string(state.fixture()).await {
        Ok(contents) => ([(header::CONTENT_TYPE, "application/json")], contents).into_response(),
        Err(e) => {
            warn!(path = %state.fixture().display(), error = %e, "failed to read fixture");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "status": "error", "reason": "Fixture unavailable" })),
            )
                .into_response()
        }
    }
}
