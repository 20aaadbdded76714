// SPDX-FileCopyrightText: 2026 VCTR Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end integration testing.
//!
//! `TestHarness` assembles the full HTTP stack (gateway router, chat agent,
//! rate limiter) over mock adapters. Provides `post_json()` to drive a
//! request through the router in-process.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Method, Request, StatusCode};
use chrono::{DateTime, Utc};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;
use vctr_agent::ChatAgent;
use vctr_config::VctrConfig;
use vctr_core::{Category, SpeechAdapter, TranscriptionAdapter};
use vctr_gateway::{AppState, MemoryRateLimiter, build_router};

use crate::mock_provider::MockProvider;
use crate::mock_speech::{MockSpeech, MockTranscriber};
use crate::mock_store::MockStore;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    config: VctrConfig,
    store: Option<MockStore>,
    provider: Option<MockProvider>,
    speech: Option<MockSpeech>,
    transcriber: Option<MockTranscriber>,
    now: Option<DateTime<Utc>>,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            config: VctrConfig::default(),
            store: Some(MockStore::new()),
            provider: Some(MockProvider::new()),
            speech: None,
            transcriber: None,
            now: None,
        }
    }

    /// Replace the default configuration.
    pub fn with_config(mut self, config: VctrConfig) -> Self {
        self.config = config;
        self
    }

    /// Seed a table of the mock store.
    pub fn with_table(mut self, category: Category, rows: Vec<Value>) -> Self {
        self.store = Some(self.store.unwrap_or_default().with_table(category, rows));
        self
    }

    /// Use a specific mock store.
    pub fn with_store(mut self, store: MockStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Build without a data store, as when Supabase is not configured.
    pub fn without_store(mut self) -> Self {
        self.store = None;
        self
    }

    /// Use a specific mock provider.
    pub fn with_provider(mut self, provider: MockProvider) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Build without a chat provider, as when no Groq key is configured.
    pub fn without_provider(mut self) -> Self {
        self.provider = None;
        self
    }

    pub fn with_speech(mut self, speech: MockSpeech) -> Self {
        self.speech = Some(speech);
        self
    }

    pub fn with_transcriber(mut self, transcriber: MockTranscriber) -> Self {
        self.transcriber = Some(transcriber);
        self
    }

    /// Pin the agent's clock.
    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = Some(now);
        self
    }

    /// Build the test harness.
    pub fn build(self) -> TestHarness {
        let mut agent = ChatAgent::new(
            &self.config,
            self.store
                .clone()
                .map(|s| Arc::new(s) as Arc<dyn vctr_core::DataStore>),
            self.provider
                .clone()
                .map(|p| Arc::new(p) as Arc<dyn vctr_core::ChatProvider>),
        );
        if let Some(now) = self.now {
            agent = agent.with_clock(move || now);
        }

        let limiter = MemoryRateLimiter::new(
            self.config.rate_limit.max_requests,
            Duration::from_secs(self.config.rate_limit.window_secs),
        );

        let router = build_router(AppState {
            agent: Arc::new(agent),
            speech: self
                .speech
                .clone()
                .map(|s| Arc::new(s) as Arc<dyn SpeechAdapter>),
            transcriber: self
                .transcriber
                .clone()
                .map(|t| Arc::new(t) as Arc<dyn TranscriptionAdapter>),
            limiter: Arc::new(limiter),
            started: Instant::now(),
        });

        TestHarness {
            router,
            store: self.store.unwrap_or_default(),
            provider: self.provider.unwrap_or_default(),
            speech: self.speech,
            transcriber: self.transcriber,
        }
    }
}

/// A response captured from the router.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    /// Parsed JSON body, or `Value::Null` when the body is not JSON.
    pub body: Value,
}

impl TestResponse {
    /// A header as a string, if present.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// Complete in-process test environment.
pub struct TestHarness {
    router: Router,
    /// The mock store behind the agent (a default one if built without).
    pub store: MockStore,
    /// The mock provider behind the agent (a default one if built without).
    pub provider: MockProvider,
    pub speech: Option<MockSpeech>,
    pub transcriber: Option<MockTranscriber>,
}

impl TestHarness {
    /// Create a builder for configuring the test harness.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// The assembled router.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// POST a JSON body.
    pub async fn post_json(&self, uri: &str, body: Value) -> TestResponse {
        self.post_raw(uri, body.to_string()).await
    }

    /// POST a raw body with a JSON content type.
    pub async fn post_raw(&self, uri: &str, body: impl Into<Body>) -> TestResponse {
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header("content-type", "application/json")
            .body(body.into())
            .expect("request is well-formed");
        self.send(request).await
    }

    /// Send a request with an arbitrary method and empty body.
    pub async fn request(&self, method: Method, uri: &str) -> TestResponse {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .expect("request is well-formed");
        self.send(request).await
    }

    /// Drive a request through the router.
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body is readable")
            .to_bytes();
        TestResponse {
            status,
            headers,
            body: serde_json::from_slice(&bytes).unwrap_or(Value::Null),
        }
    }
}
