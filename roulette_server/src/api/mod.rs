//! HTTP API for the roulette server.
//!
//! The API is the seam between a chat transport and the session registry.
//! It carries no authentication: the transport is trusted to report who
//! sent a message and in which room.
//!
//! # Modules
//!
//! - [`sessions`]: Command intake and session inspection
//! - [`request_id`]: Request ID propagation for log correlation
//!
//! # Endpoints Overview
//!
//! ```text
//! GET  /health                                  - Server health status
//! GET  /api/v1/sessions/{session_key}           - Public view of a room's game
//! POST /api/v1/sessions/{session_key}/commands  - Run a chat command
//! ```
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use roulette::session::{RegistryConfig, SessionManager};
//! use roulette_server::api::{AppState, create_router};
//! use std::sync::Arc;
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!
//! let state = AppState {
//!     session_manager: Arc::new(SessionManager::new(RegistryConfig::default())),
//! };
//!
//! let app = create_router(state);
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:6969").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

pub mod request_id;
pub mod sessions;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
};
use roulette::session::SessionManager;
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Application state shared across all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub session_manager: Arc<SessionManager>,
}

/// Create the complete API router with all endpoints and middleware.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", create_v1_router())
        .layer(axum::middleware::from_fn(request_id::request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn create_v1_router() -> Router<AppState> {
    Router::new()
        .route("/sessions/{session_key}", get(sessions::get_session))
        .route(
            "/sessions/{session_key}/commands",
            post(sessions::post_command),
        )
}

/// Health check endpoint for monitoring and load balancers.
///
/// # Example
///
/// ```bash
/// curl http://localhost:6969/health
/// # {"status":"healthy","version":"1.0.0","sessions":{"active_count":2},"timestamp":"2026-10-16T10:30:00Z"}
/// ```
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let active_count = state.session_manager.session_count().await;

    let response = json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "sessions": {
            "active_count": active_count,
        },
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    (StatusCode::OK, Json(response))
}
