// SPDX-FileCopyrightText: 2026 VCTR Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Groq OpenAI-compatible API.
//!
//! Provides [`GroqClient`] which handles bearer authentication, chat
//! completions and multipart audio transcription. Nothing is retried:
//! a non-success status is returned as `"{status} - {body}"`.

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::multipart::{Form, Part};
use tracing::debug;
use vctr_core::VctrError;

use crate::types::{ChatCompletionRequest, ChatCompletionResponse};

/// HTTP client for Groq API communication.
#[derive(Debug, Clone)]
pub struct GroqClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl GroqClient {
    /// Creates a new Groq API client.
    ///
    /// # Arguments
    /// * `api_key` - Groq API key, sent as a bearer token
    /// * `base_url` - API root, e.g. `https://api.groq.com/openai/v1`
    /// * `timeout` - Per-request timeout
    pub fn new(api_key: &str, base_url: &str, timeout: Duration) -> Result<Self, VctrError> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {api_key}"))
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
            timeout,
        })
    }

    /// Overrides the base URL (for testing with wiremock).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Sends a non-streaming chat completion request.
    pub async fn chat(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, VctrError> {
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .json(request)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let body = read_success(response).await?;
        serde_json::from_str(&body).map_err(|e| VctrError::Provider {
            message: format!("failed to parse API response: {e}"),
            status: None,
            source: Some(Box::new(e)),
        })
    }

    /// Uploads a WAV clip for English transcription and returns the text.
    ///
    /// The clip is sent from memory as a multipart form.
    pub async fn transcribe(&self, audio: Vec<u8>, model: &str) -> Result<String, VctrError> {
        let size = audio.len();
        let file = Part::bytes(audio)
            .file_name("audio.wav")
            .mime_str("audio/wav")
            .map_err(|e| VctrError::Internal(format!("invalid audio part: {e}")))?;
        let form = Form::new()
            .part("file", file)
            .text("model", model.to_string())
            .text("language", "en")
            .text("temperature", "0")
            .text("response_format", "text");

        debug!(bytes = size, model, "uploading audio for transcription");
        let response = self
            .client
            .post(format!("{}/audio/transcriptions", self.base_url))
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        read_success(response).await
    }

    fn transport_error(&self, e: reqwest::Error) -> VctrError {
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
    }
}

/// Returns the body of a success response, or the status and body as an error.
pub(crate) async fn read_success(response: reqwest::Response) -> Result<String, VctrError> {
    let status = response.status();
    debug!(status = %status, "response received");

    let body = response.text().await.map_err(|e| VctrError::Provider {
        message: format!("failed to read response body: {e}"),
        status: Some(status.as_u16()),
        source: Some(Box::new(e)),
    })?;

    if status.is_success() {
        Ok(body)
    } else {
        Err(VctrError::Provider {
            message: format!("{} - {body}", status.as_u16()),
            status: Some(status.as_u16()),
            source: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ApiMessage;
    use wiremock::matchers::{body_partial_json, body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(base_url: &str) -> GroqClient {
        GroqClient::new("test-api-key", "https://unused.invalid", Duration::from_secs(5))
            .unwrap()
            .with_base_url(base_url)
    }

    fn test_request() -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: "llama-3.1-8b-instant".into(),
            messages: vec![ApiMessage {
                role: "user".into(),
                content: "Hello".into(),
            }],
            max_tokens: 100,
            temperature: 0.0,
            tools: None,
            tool_choice: None,
            response_format: None,
        }
    }

    #[tokio::test]
    async fn chat_success() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer test-api-key"))
            .and(body_partial_json(serde_json::json!({"model": "llama-3.1-8b-instant"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "model": "llama-3.1-8b-instant",
                "choices": [{"message": {"role": "assistant", "content": "Hi there!"}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let result = client.chat(&test_request()).await.unwrap();
        assert_eq!(result.choices[0].message.content.as_deref(), Some("Hi there!"));
    }

    #[tokio::test]
    async fn chat_error_carries_status_and_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client.chat(&test_request()).await.unwrap_err();
        match err {
            VctrError::Provider { message, status, .. } => {
                assert_eq!(message, "429 - rate limited");
                assert_eq!(status, Some(429));
            }
            other => panic!("expected provider error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn chat_rejects_malformed_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client.chat(&test_request()).await.unwrap_err();
        assert!(err.to_string().contains("failed to parse API response"), "got: {err}");
    }

    #[tokio::test]
    async fn transcribe_uploads_multipart_text_request() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/audio/transcriptions"))
            .and(header("authorization", "Bearer test-api-key"))
            .and(body_string_contains("whisper-large-v3-turbo"))
            .and(body_string_contains("filename=\"audio.wav\""))
            .and(body_string_contains("RIFFdata"))
            .respond_with(ResponseTemplate::new(200).set_body_string("hello world"))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let text = client
            .transcribe(b"RIFFdata".to_vec(), "whisper-large-v3-turbo")
            .await
            .unwrap();
        assert_eq!(text, "hello world");
    }

    #[tokio::test]
    async fn transcribe_error_is_reported() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/audio/transcriptions"))
            .respond_with(ResponseTemplate::new(400).set_body_string("bad audio"))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client.transcribe(vec![1, 2, 3], "whisper").await.unwrap_err();
        assert_eq!(err.public_message(), "400 - bad audio");
    }

    #[tokio::test]
    async fn slow_upstream_times_out() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&server)
            .await;

        let client = GroqClient::new("k", &server.uri(), Duration::from_millis(50)).unwrap();
        let err = client.chat(&test_request()).await.unwrap_err();
        assert!(matches!(err, VctrError::Timeout { .. }), "got: {err:?}");
    }
}
