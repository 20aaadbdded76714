// SPDX-FileCopyrightText: 2026 VCTR Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests for the complete HTTP pipeline.
//!
//! Each test builds an isolated TestHarness (router, agent, rate limiter)
//! over mock adapters. Tests are independent and order-insensitive.

use axum::http::{Method, StatusCode};
use chrono::{TimeZone, Utc};
use serde_json::json;
use vctr_core::{Category, Role};
use vctr_test_utils::{MockProvider, MockSpeech, MockStore, MockTranscriber, StoreCall, TestHarness};

fn portfolio() -> MockStore {
    MockStore::new()
        .with_table(Category::Profile, vec![json!({"name": "Victor", "title": "Engineer"})])
        .with_table(
            Category::Education,
            vec![json!({"school": "State University", "start_year": 2018, "end_year": "May 2022"})],
        )
        .with_table(Category::Experience, vec![json!({"company": "Acme"})])
        .with_table(
            Category::Projects,
            vec![
                json!({"title": "Atlas", "description": "Maps for hikers. Offline first."}),
                json!({"title": "Beacon", "description": "Alerting service"}),
                json!({"title": "Comet", "description": "Orbit simulator"}),
            ],
        )
}

// ---- Chat ----

#[tokio::test]
async fn greeting_short_circuits_without_upstreams() {
    let harness = TestHarness::builder().with_store(portfolio()).build();

    let res = harness.post_json("/api/chat", json!({"message": "hi"})).await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(
        res.body,
        json!({
            "text": "Hi there, what would you like to know about Victor? I am here to help.",
            "uiActions": []
        })
    );
    assert!(harness.store.calls().is_empty());
    assert_eq!(harness.provider.call_count().await, 0);
}

#[tokio::test]
async fn education_question_embeds_rows_and_date_context() {
    let provider = MockProvider::with_responses(vec!["He graduated in 2022.".into()]);
    let harness = TestHarness::builder()
        .with_store(portfolio())
        .with_provider(provider)
        .at(Utc.with_ymd_and_hms(2026, 3, 15, 12, 0, 0).unwrap())
        .build();

    let res = harness
        .post_json("/api/chat", json!({"message": "Where did he study? Tell me about his education"}))
        .await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["text"], "He graduated in 2022.");
    assert_eq!(
        harness.store.calls(),
        vec![StoreCall::All(Category::Profile), StoreCall::All(Category::Education)]
    );

    let requests = harness.provider.requests().await;
    assert_eq!(requests.len(), 1, "keyword match must not call the classifier");
    let system = &requests[0].messages[0];
    assert_eq!(system.role, Role::System);
    assert!(system.content.contains("State University"));
    assert!(system.content.contains("Most recent education year: 2022. Years since: 4."));
    assert!(requests[0].tools.is_empty());
}

#[tokio::test]
async fn explicit_projects_category_returns_a_page() {
    let provider = MockProvider::new();
    provider.add_tool_calls(&[r#"{"offset": 0, "limit": 5}"#]).await;
    let harness = TestHarness::builder()
        .with_store(portfolio())
        .with_provider(provider)
        .build();

    let res = harness
        .post_json("/api/chat", json!({"message": "What has he built?", "category": "projects"}))
        .await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(
        res.body["text"],
        "I found 3 projects Victor worked on. Here are the first two: 1) Atlas - Maps for hikers 2) Beacon - Alerting service"
    );
    let action = &res.body["uiActions"][0];
    assert_eq!(action["type"], "show_projects");
    assert_eq!(action["items"].as_array().unwrap().len(), 2);
    assert_eq!(
        action["paging"],
        json!({"offset": 0, "limit": 2, "total": 3, "hasMore": true})
    );
    assert!(res.body["followUpPrompt"].is_string());

    let request = &harness.provider.requests().await[0];
    assert_eq!(request.tools[0].name, "show_projects");
    assert!(!request.messages[0].content.contains("Maps for hikers"));
    assert!(harness.store.calls().contains(&StoreCall::Page {
        category: Category::Projects,
        offset: 0,
        limit: 2,
    }));
}

#[tokio::test]
async fn second_page_reports_no_more() {
    let provider = MockProvider::new();
    provider.add_tool_calls(&[r#"{"offset": 2, "limit": 2}"#]).await;
    let harness = TestHarness::builder()
        .with_store(portfolio())
        .with_provider(provider)
        .build();

    let res = harness
        .post_json(
            "/api/chat",
            json!({
                "message": "show me the next projects",
                "projectPaging": {"offset": 0, "limit": 2, "total": 3, "hasMore": true}
            }),
        )
        .await;

    assert_eq!(res.status, StatusCode::OK);
    let paging = &res.body["uiActions"][0]["paging"];
    assert_eq!(paging["offset"], 2);
    assert_eq!(paging["hasMore"], false);
    assert!(res.body["text"].as_str().unwrap().contains("Comet - Orbit simulator"));
}

#[tokio::test]
async fn chat_history_is_sent_after_the_system_prompt() {
    let harness = TestHarness::builder().with_store(portfolio()).build();

    let res = harness
        .post_json(
            "/api/chat",
            json!({
                "message": "and his experience?",
                "chatHistory": [
                    {"role": "user", "content": "who is he?"},
                    {"role": "assistant", "content": "An engineer."},
                    {"role": "user", "content": "and his experience?"}
                ]
            }),
        )
        .await;

    assert_eq!(res.status, StatusCode::OK);
    let request = &harness.provider.requests().await[0];
    assert_eq!(request.messages.len(), 4);
    assert_eq!(request.messages[2].role, Role::Assistant);
}

#[tokio::test]
async fn blank_message_is_bad_request() {
    let harness = TestHarness::builder().build();
    let res = harness.post_json("/api/chat", json!({"message": "  "})).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body, json!({"error": "Message is required"}));
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let harness = TestHarness::builder().build();
    let res = harness.post_raw("/api/chat", "{not json").await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert!(res.body["error"].is_string());
}

#[tokio::test]
async fn database_failure_lists_details() {
    let harness = TestHarness::builder()
        .with_store(portfolio().failing(Category::Experience))
        .build();

    let res = harness
        .post_json("/api/chat", json!({"message": "tell me about his experience"}))
        .await;

    assert_eq!(res.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(res.body["error"], "Failed to fetch data from database");
    assert_eq!(
        res.body["details"],
        json!(["relation \"public.experience\" does not exist"])
    );
    assert_eq!(harness.provider.call_count().await, 0);
}

#[tokio::test]
async fn missing_database_config_is_internal_error() {
    let harness = TestHarness::builder().without_store().build();
    let res = harness
        .post_json("/api/chat", json!({"message": "what projects has he done"}))
        .await;
    assert_eq!(res.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(res.body, json!({"error": "Supabase env vars missing"}));
}

#[tokio::test]
async fn model_failure_is_labelled() {
    let provider = MockProvider::new();
    provider.add_failure(503, "over capacity").await;
    let harness = TestHarness::builder()
        .with_store(portfolio())
        .with_provider(provider)
        .build();

    let res = harness
        .post_json("/api/chat", json!({"message": "his experience please"}))
        .await;

    assert_eq!(res.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(res.body["error"], "Groq API error: 503 - over capacity");
}

// ---- Rate limiting ----

#[tokio::test]
async fn thirty_requests_per_window_then_429() {
    let harness = TestHarness::builder().build();

    for expected_remaining in (0..30).rev() {
        let res = harness.post_json("/api/chat", json!({"message": "hey"})).await;
        assert_eq!(res.status, StatusCode::OK);
        assert_eq!(res.header("x-ratelimit-limit"), Some("30"));
        let remaining = expected_remaining.to_string();
        assert_eq!(res.header("x-ratelimit-remaining"), Some(remaining.as_str()));
    }

    let res = harness.post_json("/api/chat", json!({"message": "hey"})).await;
    assert_eq!(res.status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(res.body, json!({"error": "Too many requests"}));
    assert_eq!(res.header("x-ratelimit-remaining"), Some("0"));
    assert!(res.header("x-ratelimit-reset").is_some());
}

#[tokio::test]
async fn wrong_method_is_405_and_not_counted() {
    let harness = TestHarness::builder().build();

    let res = harness.request(Method::GET, "/api/chat").await;
    assert_eq!(res.status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(res.body, json!({"error": "Method not allowed"}));
    assert!(res.header("x-ratelimit-limit").is_none());

    let res = harness.post_json("/api/chat", json!({"message": "hi"})).await;
    assert_eq!(res.header("x-ratelimit-remaining"), Some("29"));
}

// ---- Speech ----

#[tokio::test]
async fn speech_returns_base64_audio() {
    let speech = MockSpeech::returning(b"RIFF".to_vec());
    let harness = TestHarness::builder().with_speech(speech.clone()).build();

    let res = harness
        .post_json("/api/speech", json!({"message": "Hello there"}))
        .await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body, json!({"audio": "UklGRg=="}));
    assert_eq!(speech.texts(), vec!["Hello there".to_string()]);
}

#[tokio::test]
async fn speech_upstream_status_passes_through() {
    let harness = TestHarness::builder()
        .with_speech(MockSpeech::failing(401, "invalid credentials"))
        .build();

    let res = harness.post_json("/api/speech", json!({"message": "Hello"})).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.body, json!({"error": "invalid credentials"}));
}

#[tokio::test]
async fn speech_without_key_is_internal_error() {
    let harness = TestHarness::builder().build();
    let res = harness.post_json("/api/speech", json!({"message": "Hello"})).await;
    assert_eq!(res.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(res.body, json!({"error": "Deepgram API key missing"}));
}

// ---- Transcription ----

#[tokio::test]
async fn transcription_test_action_reports_ready() {
    let harness = TestHarness::builder()
        .with_transcriber(MockTranscriber::returning("unused"))
        .build();

    let res = harness.post_json("/api/transcribe", json!({"action": "test"})).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(
        res.body,
        json!({"success": true, "message": "Transcription endpoint is ready", "hasApiKey": true})
    );
}

#[tokio::test]
async fn transcription_decodes_audio() {
    let transcriber = MockTranscriber::returning("tell me about his projects");
    let harness = TestHarness::builder()
        .with_transcriber(transcriber.clone())
        .build();

    let res = harness
        .post_json(
            "/api/transcribe",
            json!({"action": "transcribe", "audioData": "UklGRg=="}),
        )
        .await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["success"], true);
    assert_eq!(res.body["transcript"], "tell me about his projects");
    assert_eq!(transcriber.received(), vec![b"RIFF".to_vec()]);
}

#[tokio::test]
async fn transcription_rejects_missing_audio_and_unknown_actions() {
    let harness = TestHarness::builder()
        .with_transcriber(MockTranscriber::returning("unused"))
        .build();

    let res = harness
        .post_json("/api/transcribe", json!({"action": "transcribe"}))
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body, json!({"success": false, "error": "No audio data provided"}));

    let res = harness.post_json("/api/transcribe", json!({"action": "dance"})).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body, json!({"error": "Invalid action. Use 'transcribe' or 'test'"}));
}

#[tokio::test]
async fn transcription_without_key_is_internal_error() {
    let harness = TestHarness::builder().build();
    let res = harness.post_json("/api/transcribe", json!({"action": "test"})).await;
    assert_eq!(res.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(res.body, json!({"error": "Groq API key not configured"}));
}

// ---- Health ----

#[tokio::test]
async fn health_reports_configured_upstreams() {
    let harness = TestHarness::builder()
        .without_provider()
        .with_speech(MockSpeech::returning(Vec::new()))
        .build();

    let res = harness.request(Method::GET, "/health").await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["status"], "ok");
    assert_eq!(
        res.body["upstreams"],
        json!({
            "database": {"status": "healthy"},
            "chat": {"status": "unconfigured"},
            "speech": {"status": "healthy"},
            "transcription": {"status": "unconfigured"}
        })
    );
}

#[tokio::test]
async fn health_reports_failing_database() {
    let harness = TestHarness::builder()
        .with_store(portfolio().failing(Category::Profile))
        .build();

    let res = harness.request(Method::GET, "/health").await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["status"], "degraded");
    assert_eq!(
        res.body["upstreams"]["database"],
        json!({"status": "unhealthy", "detail": "relation \"public.profile\" does not exist"})
    );
    assert!(harness.store.calls().is_empty());
}
