// SPDX-FileCopyrightText: 2026 VCTR Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Groq provider adapter for the VCTR assistant.
//!
//! This crate implements [`ChatProvider`] over Groq's OpenAI-compatible chat
//! completions endpoint and [`TranscriptionAdapter`] over its Whisper
//! transcription endpoint.

pub mod client;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info};
use vctr_config::model::GroqConfig;
use vctr_core::types::{AdapterType, CompletionRequest, CompletionResponse, HealthStatus};
use vctr_core::{ChatProvider, PluginAdapter, TranscriptionAdapter, VctrError};

use crate::client::GroqClient;
use crate::types::ChatCompletionRequest;

/// Groq provider implementing [`ChatProvider`] and [`TranscriptionAdapter`].
#[derive(Debug, Clone)]
pub struct GroqProvider {
    client: GroqClient,
    transcription_model: String,
}

impl GroqProvider {
    /// Creates a provider from configuration.
    ///
    /// Returns `Ok(None)` when no API key is configured; requests needing
    /// Groq then fail individually.
    pub fn from_config(config: &GroqConfig) -> Result<Option<Self>, VctrError> {
        let Some(api_key) = config.key() else {
            info!("Groq API key not configured, chat and transcription disabled");
            return Ok(None);
        };

        let client = GroqClient::new(
            api_key,
            &config.base_url,
            Duration::from_secs(config.timeout_secs),
        )?;

        info!(
            base_url = config.base_url.as_str(),
            fast = config.chat_model_fast.as_str(),
            strong = config.chat_model_strong.as_str(),
            "Groq provider initialized"
        );

        Ok(Some(Self::with_client(
            client,
            config.transcription_model.clone(),
        )))
    }

    /// Creates a provider around an existing client.
    pub fn with_client(client: GroqClient, transcription_model: String) -> Self {
        Self {
            client,
            transcription_model,
        }
    }
}

#[async_trait]
impl PluginAdapter for GroqProvider {
    fn name(&self) -> &str {
        "groq"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, VctrError> {
        // Probing the API would spend tokens; a built client is enough.
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl ChatProvider for GroqProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, VctrError> {
        let api_request = ChatCompletionRequest::from(&request);
        debug!(
            model = api_request.model.as_str(),
            messages = api_request.messages.len(),
            tools = request.tools.len(),
            "sending chat completion"
        );
        let response = self.client.chat(&api_request).await?;
        Ok(response.into())
    }
}

#[async_trait]
impl TranscriptionAdapter for GroqProvider {
    async fn transcribe(&self, audio: Vec<u8>) -> Result<String, VctrError> {
        self.client.transcribe(audio, &self.transcription_model).await
    }
}
