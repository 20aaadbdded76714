// SPDX-FileCopyrightText: 2026 VCTR Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Speech adapters: text-to-speech and speech-to-text.

use async_trait::async_trait;

use crate::error::VctrError;
use crate::traits::adapter::PluginAdapter;

/// Text-to-speech synthesis.
#[async_trait]
pub trait SpeechAdapter: PluginAdapter {
    /// Synthesizes `text` and returns the encoded audio bytes.
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, VctrError>;
}

/// Speech-to-text transcription.
#[async_trait]
pub trait TranscriptionAdapter: PluginAdapter {
    /// Transcribes an audio clip (WAV) into plain text.
    async fn transcribe(&self, audio: Vec<u8>) -> Result<String, VctrError>;
}
