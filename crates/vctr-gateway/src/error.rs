// SPDX-FileCopyrightText: 2026 VCTR Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP error responses.
//!
//! Every error leaves the gateway as `{"error": ..., "details"?: [...]}`.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::error;
use vctr_core::VctrError;

/// An error returned to API callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Malformed or incomplete request (400).
    BadRequest(String),
    /// Wrong HTTP method on an API route (405).
    MethodNotAllowed,
    /// The caller exceeded its rate-limit window (429).
    RateLimited,
    /// An upstream failure whose status is passed through.
    Upstream { status: StatusCode, message: String },
    /// Missing configuration, database or model failures (500).
    Internal {
        message: String,
        details: Vec<String>,
    },
}

impl ApiError {
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::Internal {
            message: message.into(),
            details: Vec::new(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Upstream { status, .. } => *status,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(m) => m,
            ApiError::MethodNotAllowed => "Method not allowed",
            ApiError::RateLimited => "Too many requests",
            ApiError::Upstream { message, .. } | ApiError::Internal { message, .. } => message,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    #[serde(skip_serializing_if = "no_details")]
    details: &'a [String],
}

fn no_details(details: &&[String]) -> bool {
    details.is_empty()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let details: &[String] = match &self {
            ApiError::Internal { details, .. } => details,
            _ => &[],
        };
        let body = ErrorBody {
            error: self.message(),
            details,
        };
        (status, Json(body)).into_response()
    }
}

impl From<VctrError> for ApiError {
    fn from(err: VctrError) -> Self {
        match err {
            VctrError::Validation(message) => ApiError::BadRequest(message),
            VctrError::Storage { message, details } => {
                error!(error = message.as_str(), ?details, "request failed in storage");
                ApiError::Internal { message, details }
            }
            other => {
                error!(error = %other, "request failed");
                ApiError::internal(other.public_message())
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}
