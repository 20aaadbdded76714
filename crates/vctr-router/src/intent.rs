// SPDX-FileCopyrightText: 2026 VCTR Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Model-backed intent classification for messages no keyword matched.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;
use vctr_core::types::CompletionRequest;
use vctr_core::{ChatMessage, ChatProvider, IntentResult, IntentSource, VctrError};

const CLASSIFY_MAX_TOKENS: u32 = 120;

/// Returned when the model's reply cannot be decoded at all.
const FALLBACK_INTENT: &str = "general";
const FALLBACK_CONFIDENCE: f32 = 0.3;

/// Used when a decoded object lacks a numeric confidence.
const DEFAULT_CONFIDENCE: f32 = 0.5;

/// Asks the intent model to label a message.
pub struct IntentResolver {
    provider: Arc<dyn ChatProvider>,
    model: String,
}

impl IntentResolver {
    pub fn new(provider: Arc<dyn ChatProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    /// Classifies `message` with the model.
    ///
    /// An undecodable reply degrades to `general` at confidence 0.3; an
    /// upstream failure is an error.
    pub async fn classify(&self, message: &str) -> Result<IntentResult, VctrError> {
        let request = CompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system("Return JSON only."),
                ChatMessage::user(classification_prompt(message)),
            ],
            max_tokens: CLASSIFY_MAX_TOKENS,
            temperature: 0.0,
            tools: Vec::new(),
            json_response: true,
        };

        let response = self
            .provider
            .complete(request)
            .await
            .map_err(|e| e.upstream_context("Intent fallback error"))?;

        let raw = response.content.unwrap_or_default();
        let (intent, confidence) = decode_intent(&raw);
        debug!(intent = intent.as_str(), confidence, "model classified intent");

        Ok(IntentResult {
            intent: Some(intent),
            confidence,
            source: IntentSource::Llm,
        })
    }
}

fn classification_prompt(message: &str) -> String {
    format!(
        "Classify the user message into one of: projects, experience, education, personal, general.\n\
         Return ONLY valid JSON with keys intent and confidence (0-1).\n\
         Message: \"{message}\""
    )
}

/// Decodes a classification reply: strict JSON, then the outermost
/// `{...}` span, then the fallback label.
pub fn decode_intent(raw: &str) -> (String, f32) {
    parse_strict(raw)
        .or_else(|| parse_braced(raw))
        .map(|obj| fields_of(&obj))
        .unwrap_or_else(|| (FALLBACK_INTENT.to_string(), FALLBACK_CONFIDENCE))
}

fn parse_strict(raw: &str) -> Option<Value> {
    serde_json::from_str::<Value>(raw)
        .ok()
        .filter(Value::is_object)
}

fn parse_braced(raw: &str) -> Option<Value> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end <= start {
        return None;
    }
    parse_strict(&raw[start..=end])
}

fn fields_of(obj: &Value) -> (String, f32) {
    let intent = obj
        .get("intent")
        .and_then(Value::as_str)
        .map(str::to_lowercase)
        .unwrap_or_else(|| FALLBACK_INTENT.to_string());
    let confidence = obj
        .get("confidence")
        .and_then(Value::as_f64)
        .map(|c| c as f32)
        .unwrap_or(DEFAULT_CONFIDENCE);
    (intent, confidence)
}
