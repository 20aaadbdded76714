// SPDX-FileCopyrightText: 2026 VCTR Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the VCTR assistant.

use thiserror::Error;

/// The primary error type used across all VCTR adapter traits and core operations.
#[derive(Debug, Error)]
pub enum VctrError {
    /// Configuration errors (missing API keys, missing connection parameters).
    #[error("configuration error: {0}")]
    Config(String),

    /// Invalid caller input (missing message, unknown category, bad payload).
    #[error("validation error: {0}")]
    Validation(String),

    /// Data store errors. `details` carries the underlying message of every
    /// failed query when several ran together.
    #[error("storage error: {message}")]
    Storage {
        message: String,
        details: Vec<String>,
    },

    /// Upstream model or speech provider errors (HTTP failure, bad payload).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        /// HTTP status returned by the upstream, when one was received.
        status: Option<u16>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl VctrError {
    /// Shorthand for a storage error without per-query details.
    pub fn storage(message: impl Into<String>) -> Self {
        VctrError::Storage {
            message: message.into(),
            details: Vec::new(),
        }
    }

    /// Shorthand for a provider error without an HTTP status or source.
    pub fn provider(message: impl Into<String>) -> Self {
        VctrError::Provider {
            message: message.into(),
            status: None,
            source: None,
        }
    }

    /// Prefixes a provider error's message with the caller's label, as in
    /// `"Groq API error: 503 - overloaded"`. Other variants pass through.
    pub fn upstream_context(self, label: &str) -> Self {
        match self {
            VctrError::Provider {
                message,
                status,
                source,
            } => VctrError::Provider {
                message: format!("{label}: {message}"),
                status,
                source,
            },
            other => other,
        }
    }

    /// Human-readable message without the variant prefix, suitable for
    /// returning to API callers.
    pub fn public_message(&self) -> String {
        match self {
            VctrError::Config(m) | VctrError::Validation(m) | VctrError::Internal(m) => m.clone(),
            VctrError::Storage { message, .. } | VctrError::Provider { message, .. } => {
                message.clone()
            }
            VctrError::Timeout { .. } => self.to_string(),
        }
    }
}
