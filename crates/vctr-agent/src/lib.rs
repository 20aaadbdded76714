// SPDX-FileCopyrightText: 2026 VCTR Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat pipeline for the VCTR assistant.
//!
//! The [`ChatAgent`] handles one stateless chat turn:
//! - Short-circuits bare greetings without touching any upstream
//! - Resolves the request's category (explicit, keyword, or model-classified)
//! - Fetches the needed tables and derives the education date context
//! - Composes the system prompt and routes to the fast or strong model
//! - Answers `show_projects` tool calls from the database

pub mod dispatcher;
pub mod fetcher;
pub mod projects;
pub mod shutdown;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use vctr_config::VctrConfig;
use vctr_context::{PromptComposer, PromptInput, derive_education_context};
use vctr_core::types::CompletionRequest;
use vctr_core::{
    Category, ChatMessage, ChatProvider, DataStore, IntentResult, ProjectContext, ProjectPaging,
    UiAction, VctrError,
};
use vctr_router::{IntentResolver, ModelRouter, greeting_reply, is_greeting, keyword_intent};

use crate::fetcher::FetchPlan;

pub use fetcher::FETCH_FAILED;

/// One chat request as sent by the client.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatTurn {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub chat_history: Option<Vec<ChatMessage>>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub project_paging: Option<ProjectPaging>,
    #[serde(default)]
    pub project_context: Option<ProjectContext>,
}

impl ChatTurn {
    /// A turn carrying just a message.
    pub fn message(text: impl Into<String>) -> Self {
        Self {
            message: Some(text.into()),
            ..Self::default()
        }
    }
}

/// The reply to one chat turn.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    pub text: String,
    pub ui_actions: Vec<UiAction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub follow_up_prompt: Option<String>,
}

type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Runs the chat pipeline against the configured store and model provider.
///
/// Both upstreams are optional: a missing one only fails the requests
/// that need it.
pub struct ChatAgent {
    subject: String,
    store: Option<Arc<dyn DataStore>>,
    provider: Option<Arc<dyn ChatProvider>>,
    intent: Option<IntentResolver>,
    composer: PromptComposer,
    router: ModelRouter,
    clock: Clock,
}

impl ChatAgent {
    pub fn new(
        config: &VctrConfig,
        store: Option<Arc<dyn DataStore>>,
        provider: Option<Arc<dyn ChatProvider>>,
    ) -> Self {
        let intent = provider
            .clone()
            .map(|p| IntentResolver::new(p, config.groq.intent_model.clone()));
        Self {
            subject: config.agent.subject.clone(),
            store,
            provider,
            intent,
            composer: PromptComposer::new(&config.agent),
            router: ModelRouter::new(&config.groq, config.routing.clone()),
            clock: Arc::new(Utc::now),
        }
    }

    /// Replaces the wall clock, for deterministic prompts in tests.
    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<Utc> + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// The configured chat provider, if any.
    pub fn chat_provider(&self) -> Option<&Arc<dyn ChatProvider>> {
        self.provider.as_ref()
    }

    /// The configured data store, if any.
    pub fn data_store(&self) -> Option<&Arc<dyn DataStore>> {
        self.store.as_ref()
    }

    /// Handles one chat turn.
    pub async fn handle(&self, turn: ChatTurn) -> Result<ChatReply, VctrError> {
        let message = turn
            .message
            .as_deref()
            .filter(|m| !m.trim().is_empty())
            .ok_or_else(|| VctrError::Validation("Message is required".to_string()))?;

        if is_greeting(message) {
            debug!("greeting short-circuit");
            return Ok(ChatReply {
                text: greeting_reply(&self.subject),
                ui_actions: Vec::new(),
                follow_up_prompt: None,
            });
        }

        let explicit = parse_category(turn.category.as_deref())?;
        let store = self.store()?;

        let (plan, intent) = match explicit {
            Some(category) => (FetchPlan::for_category(category), None),
            None => {
                let intent = self.resolve_intent(&message.to_lowercase()).await?;
                (FetchPlan::for_intent(&intent), Some(intent))
            }
        };
        let project_mode = explicit == Some(Category::Projects)
            || intent.as_ref().and_then(IntentResult::category) == Some(Category::Projects);

        let data = fetcher::fetch(store.as_ref(), &plan).await?;
        let now = (self.clock)();
        let education_context = derive_education_context(data.education.as_deref(), now);

        let system = self.composer.compose(&PromptInput {
            explicit_category: explicit,
            project_mode,
            data: &data,
            now,
            education_context: &education_context,
            paging: turn.project_paging.as_ref(),
            shown: turn.project_context.as_ref(),
        });

        let conversation = match turn.chat_history {
            Some(history) => history,
            None => vec![ChatMessage::user(message)],
        };
        let route = self
            .router
            .route(message, conversation.len(), project_mode);

        let mut messages = Vec::with_capacity(conversation.len() + 1);
        messages.push(ChatMessage::system(system));
        messages.extend(conversation);

        let provider = self.provider()?;
        let request = CompletionRequest {
            model: route.model.clone(),
            messages,
            max_tokens: route.max_tokens,
            temperature: route.temperature,
            tools: if project_mode {
                vec![projects::tool_definition(&self.subject)]
            } else {
                Vec::new()
            },
            json_response: false,
        };

        info!(
            model = route.model.as_str(),
            tier = %route.tier,
            project_mode,
            explicit_category = ?explicit,
            "calling chat model"
        );
        let response = provider
            .complete(request)
            .await
            .map_err(|e| e.upstream_context("Groq API error"))?;

        dispatcher::dispatch(response, project_mode, store.as_ref(), &self.subject).await
    }

    async fn resolve_intent(&self, lowered: &str) -> Result<IntentResult, VctrError> {
        if let Some(intent) = keyword_intent(lowered) {
            debug!(intent = ?intent.intent, "keyword intent");
            return Ok(intent);
        }
        let resolver = self
            .intent
            .as_ref()
            .ok_or_else(|| VctrError::Config("Groq API key missing".to_string()))?;
        resolver.classify(lowered).await
    }

    fn store(&self) -> Result<&Arc<dyn DataStore>, VctrError> {
        self.store
            .as_ref()
            .ok_or_else(|| VctrError::Config("Supabase env vars missing".to_string()))
    }

    fn provider(&self) -> Result<&Arc<dyn ChatProvider>, VctrError> {
        self.provider
            .as_ref()
            .ok_or_else(|| VctrError::Config("Groq API key missing".to_string()))
    }
}

/// Blank means "no category"; anything else must name a known table.
fn parse_category(raw: Option<&str>) -> Result<Option<Category>, VctrError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(name) => name
            .parse()
            .map(Some)
            .map_err(|_| VctrError::Validation(format!("Unknown category: {name}"))),
    }
}
