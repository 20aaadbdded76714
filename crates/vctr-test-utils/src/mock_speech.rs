// SPDX-FileCopyrightText: 2026 VCTR Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock speech synthesis and transcription adapters.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use vctr_core::types::{AdapterType, HealthStatus};
use vctr_core::{PluginAdapter, SpeechAdapter, TranscriptionAdapter, VctrError};

/// Returns fixed audio bytes, or a fixed upstream failure.
#[derive(Clone)]
pub struct MockSpeech {
    outcome: Result<Vec<u8>, (u16, String)>,
    texts: Arc<Mutex<Vec<String>>>,
}

impl MockSpeech {
    pub fn returning(audio: impl Into<Vec<u8>>) -> Self {
        Self {
            outcome: Ok(audio.into()),
            texts: Arc::default(),
        }
    }

    pub fn failing(status: u16, body: impl Into<String>) -> Self {
        Self {
            outcome: Err((status, body.into())),
            texts: Arc::default(),
        }
    }

    /// Texts synthesized so far.
    pub fn texts(&self) -> Vec<String> {
        self.texts.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl PluginAdapter for MockSpeech {
    fn name(&self) -> &str {
        "mock-speech"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Speech
    }

    async fn health_check(&self) -> Result<HealthStatus, VctrError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl SpeechAdapter for MockSpeech {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, VctrError> {
        self.texts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(text.to_string());
        match &self.outcome {
            Ok(audio) => Ok(audio.clone()),
            Err((status, body)) => Err(VctrError::Provider {
                message: body.clone(),
                status: Some(*status),
                source: None,
            }),
        }
    }
}

/// Returns a fixed transcript, or a fixed failure.
#[derive(Clone)]
pub struct MockTranscriber {
    outcome: Result<String, String>,
    received: Arc<Mutex<Vec<Vec<u8>>>>,
}

impl MockTranscriber {
    pub fn returning(transcript: impl Into<String>) -> Self {
        Self {
            outcome: Ok(transcript.into()),
            received: Arc::default(),
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            outcome: Err(message.into()),
            received: Arc::default(),
        }
    }

    /// Audio clips received so far.
    pub fn received(&self) -> Vec<Vec<u8>> {
        self.received.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl PluginAdapter for MockTranscriber {
    fn name(&self) -> &str {
        "mock-transcriber"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Transcription
    }

    async fn health_check(&self) -> Result<HealthStatus, VctrError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl TranscriptionAdapter for MockTranscriber {
    async fn transcribe(&self, audio: Vec<u8>) -> Result<String, VctrError> {
        self.received
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(audio);
        self.outcome.clone().map_err(VctrError::provider)
    }
}
