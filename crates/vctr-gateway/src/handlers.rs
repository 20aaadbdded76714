// SPDX-FileCopyrightText: 2026 VCTR Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the gateway REST API.
//!
//! Handles POST /api/chat, POST /api/speech, POST /api/transcribe and
//! GET /health.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info, warn};
use vctr_agent::{ChatReply, ChatTurn};
use vctr_core::{HealthStatus, PluginAdapter, VctrError};

use crate::error::ApiError;
use crate::server::AppState;

/// POST /api/chat
pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatTurn>, JsonRejection>,
) -> Result<Json<ChatReply>, ApiError> {
    let Json(turn) = payload?;
    let reply = state.agent.handle(turn).await?;
    info!(
        chars = reply.text.chars().count(),
        ui_actions = reply.ui_actions.len(),
        "chat reply sent"
    );
    Ok(Json(reply))
}

/// Request body for POST /api/speech.
#[derive(Debug, Deserialize)]
pub struct SpeechRequest {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SpeechResponse {
    /// Base64-encoded audio.
    pub audio: String,
}

/// POST /api/speech
///
/// Upstream failures keep the upstream's status and body.
pub async fn speech(
    State(state): State<AppState>,
    payload: Result<Json<SpeechRequest>, JsonRejection>,
) -> Result<Json<SpeechResponse>, ApiError> {
    let Json(body) = payload?;
    let message = body
        .message
        .filter(|m| !m.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("Message is required".to_string()))?;

    let speech = state
        .speech
        .as_ref()
        .ok_or_else(|| ApiError::internal("Deepgram API key missing"))?;

    match speech.synthesize(&message).await {
        Ok(audio) => Ok(Json(SpeechResponse {
            audio: BASE64.encode(audio),
        })),
        Err(VctrError::Provider {
            message,
            status: Some(status),
            ..
        }) => {
            error!(status, "speech synthesis rejected upstream");
            Err(ApiError::Upstream {
                status: StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
                message,
            })
        }
        Err(e) => Err(e.into()),
    }
}

/// Request body for POST /api/transcribe.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscribeRequest {
    #[serde(default)]
    pub action: Option<String>,
    /// Base64-encoded WAV audio.
    #[serde(default)]
    pub audio_data: Option<String>,
}

/// POST /api/transcribe
///
/// Replies carry a `success` flag rather than the plain error shape.
pub async fn transcribe(
    State(state): State<AppState>,
    payload: Result<Json<TranscribeRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(body) = payload?;
    let Some(transcriber) = state.transcriber.as_ref() else {
        return Err(ApiError::internal("Groq API key not configured"));
    };

    match body.action.as_deref() {
        Some("test") => Ok(Json(json!({
            "success": true,
            "message": "Transcription endpoint is ready",
            "hasApiKey": true,
        }))
        .into_response()),
        Some("transcribe") => {
            let audio = match body.audio_data.as_deref().map(str::trim) {
                None | Some("") => return Ok(no_audio(None)),
                Some(encoded) => match BASE64.decode(encoded) {
                    Ok(audio) if !audio.is_empty() => audio,
                    Ok(_) => return Ok(no_audio(None)),
                    Err(e) => return Ok(no_audio(Some(e.to_string()))),
                },
            };

            match transcriber.transcribe(audio).await {
                Ok(transcript) => Ok(Json(json!({
                    "success": true,
                    "transcript": transcript,
                    "message": "Transcription completed",
                }))
                .into_response()),
                Err(e) => {
                    error!(error = %e, "transcription failed");
                    Ok((
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Json(json!({
                            "success": false,
                            "error": "Failed to transcribe audio",
                            "details": e.public_message(),
                        })),
                    )
                        .into_response())
                }
            }
        }
        _ => Err(ApiError::BadRequest(
            "Invalid action. Use 'transcribe' or 'test'".to_string(),
        )),
    }
}

fn no_audio(details: Option<String>) -> Response {
    let mut body = json!({"success": false, "error": "No audio data provided"});
    if let Some(details) = details {
        body["details"] = json!(details);
    }
    (StatusCode::BAD_REQUEST, Json(body)).into_response()
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `"ok"` unless a configured upstream reports a problem.
    pub status: &'static str,
    pub version: &'static str,
    pub uptime_secs: u64,
    pub upstreams: Upstreams,
}

/// Health of each upstream.
#[derive(Debug, Serialize)]
pub struct Upstreams {
    pub database: UpstreamHealth,
    pub chat: UpstreamHealth,
    pub speech: UpstreamHealth,
    pub transcription: UpstreamHealth,
}

impl Upstreams {
    fn all_ok(&self) -> bool {
        [&self.database, &self.chat, &self.speech, &self.transcription]
            .into_iter()
            .all(|u| matches!(u, UpstreamHealth::Unconfigured | UpstreamHealth::Healthy))
    }
}

/// Outcome of one adapter's health check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "lowercase")]
pub enum UpstreamHealth {
    Unconfigured,
    Healthy,
    Degraded(String),
    Unhealthy(String),
}

async fn check_upstream<A>(adapter: Option<&A>) -> UpstreamHealth
where
    A: PluginAdapter + ?Sized,
{
    let Some(adapter) = adapter else {
        return UpstreamHealth::Unconfigured;
    };
    let health = match adapter.health_check().await {
        Ok(HealthStatus::Healthy) => UpstreamHealth::Healthy,
        Ok(HealthStatus::Degraded(reason)) => UpstreamHealth::Degraded(reason),
        Ok(HealthStatus::Unhealthy(reason)) => UpstreamHealth::Unhealthy(reason),
        Err(e) => UpstreamHealth::Unhealthy(e.public_message()),
    };
    if health != UpstreamHealth::Healthy {
        warn!(
            adapter = adapter.name(),
            kind = %adapter.adapter_type(),
            ?health,
            "upstream health check failed"
        );
    }
    health
}

/// GET /health
///
/// Runs every configured adapter's health check. Always 200 so the
/// process stays live while an upstream is down.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let (database, chat, speech, transcription) = tokio::join!(
        check_upstream(state.agent.data_store().map(|s| s.as_ref())),
        check_upstream(state.agent.chat_provider().map(|p| p.as_ref())),
        check_upstream(state.speech.as_deref()),
        check_upstream(state.transcriber.as_deref()),
    );
    let upstreams = Upstreams {
        database,
        chat,
        speech,
        transcription,
    };

    Json(HealthResponse {
        status: if upstreams.all_ok() { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        uptime_secs: state.started.elapsed().as_secs(),
        upstreams,
    })
}

/// Fallback for any non-POST method on an API route.
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
