// SPDX-FileCopyrightText: 2026 VCTR Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider trait for chat-completion endpoints.

use async_trait::async_trait;

use crate::error::VctrError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{CompletionRequest, CompletionResponse};

/// Adapter for an LLM chat-completion endpoint.
#[async_trait]
pub trait ChatProvider: PluginAdapter {
    /// Sends a completion request and returns the full response.
    ///
    /// A non-success upstream status is an error; nothing is retried.
    async fn complete(&self, request: CompletionRequest)
        -> Result<CompletionResponse, VctrError>;
}
