// SPDX-FileCopyrightText: 2026 VCTR Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fast/strong model selection and per-mode sampling parameters.

use tracing::debug;
use vctr_config::model::{GroqConfig, RoutingConfig};

/// Which configured chat model a request goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelTier {
    /// Short message, short conversation.
    Fast,
    /// Everything else.
    Strong,
}

impl std::fmt::Display for ModelTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelTier::Fast => write!(f, "fast"),
            ModelTier::Strong => write!(f, "strong"),
        }
    }
}

/// Model and sampling parameters chosen for one chat request.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutingDecision {
    pub model: String,
    pub tier: ModelTier,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Picks the chat model and sampling parameters for a request.
pub struct ModelRouter {
    fast_model: String,
    strong_model: String,
    config: RoutingConfig,
}

impl ModelRouter {
    pub fn new(groq: &GroqConfig, config: RoutingConfig) -> Self {
        Self {
            fast_model: groq.chat_model_fast.clone(),
            strong_model: groq.chat_model_strong.clone(),
            config,
        }
    }

    /// Routes a request.
    ///
    /// `conversation_len` is the number of messages the client sent as
    /// history, or 1 when it sent only the current message. Message length
    /// is counted in characters.
    pub fn route(&self, message: &str, conversation_len: usize, project_mode: bool) -> RoutingDecision {
        let short_message = message.chars().count() <= self.config.fast_max_message_chars;
        let short_history = conversation_len <= self.config.fast_max_history;

        let (tier, model) = if short_message && short_history {
            (ModelTier::Fast, &self.fast_model)
        } else {
            (ModelTier::Strong, &self.strong_model)
        };

        let (max_tokens, temperature) = if project_mode {
            (self.config.project_max_tokens, self.config.project_temperature)
        } else {
            (self.config.max_tokens, self.config.temperature)
        };

        debug!(
            tier = %tier,
            model = model.as_str(),
            project_mode,
            "routed chat request"
        );

        RoutingDecision {
            model: model.clone(),
            tier,
            max_tokens,
            temperature,
        }
    }
}
