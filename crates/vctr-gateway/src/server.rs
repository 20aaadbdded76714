// SPDX-FileCopyrightText: 2026 VCTR Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::extract::DefaultBodyLimit;
use axum::middleware as axum_middleware;
use axum::routing::{get, post};
use axum::Router;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use vctr_agent::ChatAgent;
use vctr_config::model::ServerConfig;
use vctr_core::{RateLimitStore, SpeechAdapter, TranscriptionAdapter, VctrError};

use crate::handlers;
use crate::rate_limit::rate_limit;

/// Base64 audio uploads exceed axum's default 2 MiB body cap.
const TRANSCRIBE_BODY_LIMIT: usize = 25 * 1024 * 1024;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct AppState {
    pub agent: Arc<ChatAgent>,
    /// `None` when no Deepgram key is configured.
    pub speech: Option<Arc<dyn SpeechAdapter>>,
    /// `None` when no Groq key is configured.
    pub transcriber: Option<Arc<dyn TranscriptionAdapter>>,
    pub limiter: Arc<dyn RateLimitStore>,
    /// Process start time for uptime calculation.
    pub started: Instant,
}

/// Builds the application router.
///
/// Routes:
/// - POST /api/chat (rate limited)
/// - POST /api/speech
/// - POST /api/transcribe
/// - GET /health
///
/// Other methods on the API routes get 405 without counting against the
/// rate limit.
pub fn build_router(state: AppState) -> Router {
    let chat = post(handlers::chat)
        .route_layer(axum_middleware::from_fn_with_state(state.clone(), rate_limit))
        .fallback(handlers::method_not_allowed);

    let transcribe = post(handlers::transcribe)
        .layer(DefaultBodyLimit::max(TRANSCRIBE_BODY_LIMIT))
        .fallback(handlers::method_not_allowed);

    Router::new()
        .route("/api/chat", chat)
        .route(
            "/api/speech",
            post(handlers::speech).fallback(handlers::method_not_allowed),
        )
        .route("/api/transcribe", transcribe)
        .route("/health", get(handlers::health))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Binds the listener and serves until `shutdown` is cancelled.
pub async fn serve(
    config: &ServerConfig,
    state: AppState,
    shutdown: CancellationToken,
) -> Result<(), VctrError> {
    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| VctrError::Internal(format!("failed to bind {addr}: {e}")))?;

    info!("VCTR API listening on {addr}");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move { shutdown.cancelled().await })
    .await
    .map_err(|e| VctrError::Internal(format!("server error: {e}")))?;

    info!("VCTR API stopped");
    Ok(())
}
