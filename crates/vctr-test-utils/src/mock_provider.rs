// SPDX-FileCopyrightText: 2026 VCTR Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock chat-completion provider for deterministic testing.
//!
//! `MockProvider` implements `ChatProvider` with pre-configured replies,
//! enabling fast, CI-runnable tests without external API calls. Every
//! request is recorded so tests can assert on model choice, prompt and tools.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use vctr_core::types::{
    AdapterType, CompletionRequest, CompletionResponse, HealthStatus, ToolCall,
};
use vctr_core::{ChatProvider, PluginAdapter, VctrError};

/// A queued reply: either a response or an upstream failure.
enum Reply {
    Response(CompletionResponse),
    Failure { status: u16, body: String },
}

/// A mock chat provider that returns pre-configured replies.
///
/// Replies are popped from a FIFO queue. When the queue is empty,
/// a default "mock response" text is returned.
#[derive(Clone, Default)]
pub struct MockProvider {
    replies: Arc<Mutex<VecDeque<Reply>>>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl MockProvider {
    /// Create a new mock provider with an empty reply queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock provider pre-loaded with plain text replies.
    pub fn with_responses(responses: Vec<String>) -> Self {
        let queue = responses
            .into_iter()
            .map(|text| Reply::Response(text_response(text)))
            .collect();
        Self {
            replies: Arc::new(Mutex::new(queue)),
            requests: Arc::default(),
        }
    }

    /// Queue a plain text reply.
    pub async fn add_response(&self, text: impl Into<String>) {
        self.replies
            .lock()
            .await
            .push_back(Reply::Response(text_response(text.into())));
    }

    /// Queue a reply consisting of `show_projects` tool calls, one per
    /// argument string.
    pub async fn add_tool_calls(&self, arguments: &[&str]) {
        let tool_calls = arguments
            .iter()
            .enumerate()
            .map(|(i, args)| ToolCall {
                id: format!("call_{i}"),
                name: "show_projects".to_string(),
                arguments: args.to_string(),
            })
            .collect();
        self.replies
            .lock()
            .await
            .push_back(Reply::Response(CompletionResponse {
                content: None,
                tool_calls,
                model: "mock-model".to_string(),
            }));
    }

    /// Queue an arbitrary response.
    pub async fn add_completion(&self, response: CompletionResponse) {
        self.replies.lock().await.push_back(Reply::Response(response));
    }

    /// Queue an upstream failure with the given HTTP status and body.
    pub async fn add_failure(&self, status: u16, body: impl Into<String>) {
        self.replies.lock().await.push_back(Reply::Failure {
            status,
            body: body.into(),
        });
    }

    /// Every request received so far, in order.
    pub async fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().await.clone()
    }

    /// Number of requests received so far.
    pub async fn call_count(&self) -> usize {
        self.requests.lock().await.len()
    }
}

fn text_response(text: String) -> CompletionResponse {
    CompletionResponse {
        content: Some(text),
        tool_calls: Vec::new(),
        model: "mock-model".to_string(),
    }
}

#[async_trait]
impl PluginAdapter for MockProvider {
    fn name(&self) -> &str {
        "mock-provider"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, VctrError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl ChatProvider for MockProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, VctrError> {
        let model = request.model.clone();
        self.requests.lock().await.push(request);

        match self.replies.lock().await.pop_front() {
            Some(Reply::Response(mut response)) => {
                response.model = model;
                Ok(response)
            }
            Some(Reply::Failure { status, body }) => Err(VctrError::Provider {
                message: format!("{status} - {body}"),
                status: Some(status),
                source: None,
            }),
            None => Ok(CompletionResponse {
                model,
                ..text_response("mock response".to_string())
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use vctr_core::ChatMessage;

    use super::*;

    fn request() -> CompletionRequest {
        CompletionRequest {
            model: "test-model".to_string(),
            messages: vec![ChatMessage::user("hello")],
            max_tokens: 100,
            temperature: 0.5,
            tools: Vec::new(),
            json_response: false,
        }
    }

    #[tokio::test]
    async fn default_response_when_queue_empty() {
        let provider = MockProvider::new();
        let resp = provider.complete(request()).await.unwrap();
        assert_eq!(resp.content.as_deref(), Some("mock response"));
        assert_eq!(resp.model, "test-model");
    }

    #[tokio::test]
    async fn queued_replies_returned_in_order() {
        let provider = MockProvider::with_responses(vec!["first".into()]);
        provider.add_failure(503, "overloaded").await;

        let first = provider.complete(request()).await.unwrap();
        assert_eq!(first.content.as_deref(), Some("first"));

        let err = provider.complete(request()).await.unwrap_err();
        assert_eq!(err.public_message(), "503 - overloaded");
        assert_eq!(provider.call_count().await, 2);
    }

    #[tokio::test]
    async fn tool_call_replies_carry_arguments() {
        let provider = MockProvider::new();
        provider.add_tool_calls(&[r#"{"offset":0,"limit":2}"#]).await;
        let resp = provider.complete(request()).await.unwrap();
        assert!(resp.content.is_none());
        assert_eq!(resp.tool_calls[0].name, "show_projects");
        assert_eq!(resp.tool_calls[0].arguments, r#"{"offset":0,"limit":2}"#);
    }
}
