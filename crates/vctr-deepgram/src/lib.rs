// SPDX-FileCopyrightText: 2026 VCTR Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deepgram text-to-speech adapter for the VCTR assistant.
//!
//! Implements [`SpeechAdapter`] over `POST {base}/speak?model={voice}`.
//! The upstream's status is preserved on failure so the gateway can pass
//! it through to the caller.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Serialize;
use tracing::{debug, info};
use vctr_config::model::DeepgramConfig;
use vctr_core::types::{AdapterType, HealthStatus};
use vctr_core::{PluginAdapter, SpeechAdapter, VctrError};

#[derive(Serialize)]
struct SpeakRequest<'a> {
    text: &'a str,
}

/// Deepgram speech synthesizer.
#[derive(Debug, Clone)]
pub struct DeepgramSpeech {
    client: reqwest::Client,
    base_url: String,
    voice_model: String,
    timeout: Duration,
}

impl DeepgramSpeech {
    /// Creates the adapter from configuration. `Ok(None)` when no key is set.
    pub fn from_config(config: &DeepgramConfig) -> Result<Option<Self>, VctrError> {
        let Some(api_key) = config.key() else {
            info!("Deepgram API key not configured, speech disabled");
            return Ok(None);
        };
        let speech = Self::new(
            api_key,
            &config.base_url,
            &config.voice_model,
            Duration::from_secs(config.timeout_secs),
        )?;
        info!(voice = config.voice_model.as_str(), "Deepgram speech initialized");
        Ok(Some(speech))
    }

    pub fn new(
        api_key: &str,
        base_url: &str,
        voice_model: &str,
        timeout: Duration,
    ) -> Result<Self, VctrError> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Token {api_key}"))
            .map_err(|e| VctrError::Config(format!("invalid API key header value: {e}")))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| VctrError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                status: None,
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            voice_model: voice_model.to_string(),
            timeout,
        })
    }
}

#[async_trait]
impl PluginAdapter for DeepgramSpeech {
    fn name(&self) -> &str {
        "deepgram"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Speech
    }

    async fn health_check(&self) -> Result<HealthStatus, VctrError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl SpeechAdapter for DeepgramSpeech {
    /// Returns the encoded audio. A non-success status becomes a provider
    /// error whose message is the upstream body.
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, VctrError> {
        debug!(chars = text.chars().count(), "requesting speech synthesis");

        let response = self
            .client
            .post(format!("{}/speak?model={}", self.base_url, self.voice_model))
            .json(&SpeakRequest { text })
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    VctrError::Timeout {
                        duration: self.timeout,
                    }
                } else {
                    VctrError::Provider {
                        message: format!("HTTP request failed: {e}"),
                        status: None,
                        source: Some(Box::new(e)),
                    }
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VctrError::Provider {
                message: body,
                status: Some(status.as_u16()),
                source: None,
            });
        }

        let audio = response.bytes().await.map_err(|e| VctrError::Provider {
            message: format!("failed to read audio: {e}"),
            status: Some(status.as_u16()),
            source: Some(Box::new(e)),
        })?;
        debug!(bytes = audio.len(), "speech synthesized");
        Ok(audio.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn speech(uri: &str) -> DeepgramSpeech {
        DeepgramSpeech::new("dg-key", uri, "aura-2-athena-en", Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn synthesize_returns_audio_bytes() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/speak"))
            .and(query_param("model", "aura-2-athena-en"))
            .and(header("authorization", "Token dg-key"))
            .and(body_json(serde_json::json!({"text": "Hello there"})))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0xFF, 0xF3, 0x01]))
            .expect(1)
            .mount(&server)
            .await;

        let audio = speech(&server.uri()).synthesize("Hello there").await.unwrap();
        assert_eq!(audio, vec![0xFF, 0xF3, 0x01]);
    }

    #[tokio::test]
    async fn upstream_status_is_preserved() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/speak"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid credentials"))
            .mount(&server)
            .await;

        let err = speech(&server.uri()).synthesize("hi").await.unwrap_err();
        match err {
            VctrError::Provider { message, status, .. } => {
                assert_eq!(status, Some(401));
                assert_eq!(message, "invalid credentials");
            }
            other => panic!("expected provider error, got {other:?}"),
        }
    }

    #[test]
    fn missing_key_disables_speech() {
        assert!(DeepgramSpeech::from_config(&DeepgramConfig::default()).unwrap().is_none());
        let config = DeepgramConfig {
            api_key: Some("dg".into()),
            ..DeepgramConfig::default()
        };
        let speech = DeepgramSpeech::from_config(&config).unwrap().unwrap();
        assert_eq!(speech.name(), "deepgram");
        assert_eq!(speech.adapter_type(), AdapterType::Speech);
    }
}
