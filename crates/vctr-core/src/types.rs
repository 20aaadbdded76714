// SPDX-FileCopyrightText: 2026 VCTR Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across adapter traits and the chat pipeline.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// A single database row: an arbitrary JSON object.
pub type Row = serde_json::Map<String, serde_json::Value>;

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of adapter behind a trait object.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Storage,
    Provider,
    Speech,
    Transcription,
}

/// The closed set of data categories, one table each.
///
/// Ordering puts `Profile` first so serialized table maps lead with the
/// baseline context.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Profile,
    Projects,
    Experience,
    Education,
    Personal,
}

impl Category {
    /// Categories in keyword-matching order. `Profile` comes last so that a
    /// message mentioning both "projects" and "profile" routes to projects.
    pub const KEYWORD_ORDER: [Category; 5] = [
        Category::Projects,
        Category::Experience,
        Category::Education,
        Category::Personal,
        Category::Profile,
    ];

    /// Name of the backing table.
    pub fn table(self) -> &'static str {
        match self {
            Category::Profile => "profile",
            Category::Projects => "projects",
            Category::Experience => "experience",
            Category::Education => "education",
            Category::Personal => "personal",
        }
    }

    /// Lower-case keyword used for substring matching.
    pub fn keyword(self) -> &'static str {
        self.table()
    }
}

/// Which path produced an [`IntentResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum IntentSource {
    /// Literal category-name containment.
    Keyword,
    /// Classification by the intent model.
    Llm,
}

/// Outcome of intent resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentResult {
    /// Raw intent label. May be a non-category label such as `"general"`.
    pub intent: Option<String>,
    /// Confidence in the label (0.0-1.0).
    pub confidence: f32,
    /// Which path produced the label.
    pub source: IntentSource,
}

impl IntentResult {
    /// A keyword match: exact, confidence 1.
    pub fn keyword(category: Category) -> Self {
        Self {
            intent: Some(category.to_string()),
            confidence: 1.0,
            source: IntentSource::Keyword,
        }
    }

    /// Maps the label to a known category, if it is one.
    pub fn category(&self) -> Option<Category> {
        self.intent.as_deref().and_then(|i| i.parse().ok())
    }
}

/// Role of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

/// A chat message, constructed per request and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// A page of the projects table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPaging {
    pub offset: u64,
    pub limit: u64,
    pub total: u64,
    #[serde(default)]
    pub has_more: bool,
}

impl ProjectPaging {
    /// Builds paging for a fetched page; `has_more` is derived.
    pub fn new(offset: u64, limit: u64, total: u64) -> Self {
        Self {
            offset,
            limit,
            total,
            has_more: offset.saturating_add(limit) < total,
        }
    }
}

/// Projects the client currently displays, echoed back on follow-up turns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectContext {
    #[serde(default)]
    pub items: Vec<serde_json::Value>,
    #[serde(default)]
    pub paging: Option<ProjectPaging>,
}

/// Structured instruction for the client UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UiAction {
    /// Render a page of projects.
    ShowProjects {
        items: Vec<serde_json::Value>,
        paging: ProjectPaging,
    },
}

/// A page of rows together with the exact total row count.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowPage {
    pub rows: Vec<Row>,
    pub total: u64,
}

/// Rows fetched for a single chat request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchedData {
    /// Tables fetched for the prompt, keyed by category.
    pub tables: BTreeMap<Category, Vec<Row>>,
    /// Education rows used for the date context. `None` when unavailable.
    pub education: Option<Vec<Row>>,
}

impl FetchedData {
    /// Rows of one fetched table.
    pub fn table(&self, category: Category) -> Option<&[Row]> {
        self.tables.get(&category).map(Vec::as_slice)
    }

    /// All fetched tables as a JSON object keyed by table name.
    pub fn to_json(&self) -> serde_json::Value {
        let map: serde_json::Map<String, serde_json::Value> = self
            .tables
            .iter()
            .map(|(category, rows)| {
                (
                    category.table().to_string(),
                    serde_json::Value::Array(
                        rows.iter().cloned().map(serde_json::Value::Object).collect(),
                    ),
                )
            })
            .collect();
        serde_json::Value::Object(map)
    }
}

/// A tool the model may call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    /// JSON Schema of the tool's arguments.
    pub parameters: serde_json::Value,
}

/// A tool invocation requested by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    /// Raw JSON-encoded arguments as produced by the model.
    pub arguments: String,
}

/// A chat-completion request to a [`ChatProvider`](crate::traits::ChatProvider).
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
    /// Tools offered to the model. Empty means no tools are attached.
    pub tools: Vec<ToolDefinition>,
    /// Ask the upstream for a JSON-object response.
    pub json_response: bool,
}

/// A chat-completion response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompletionResponse {
    /// Assistant text, absent when the model only called tools.
    pub content: Option<String>,
    pub tool_calls: Vec<ToolCall>,
    pub model: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_parses_case_insensitively() {
        assert_eq!("Education".parse::<Category>().unwrap(), Category::Education);
        assert_eq!("projects".parse::<Category>().unwrap(), Category::Projects);
        assert!("friends".parse::<Category>().is_err());
    }

    #[test]
    fn category_serializes_lowercase() {
        let json = serde_json::to_string(&Category::Personal).unwrap();
        assert_eq!(json, "\"personal\"");
        assert_eq!(Category::Experience.to_string(), "experience");
    }

    #[test]
    fn intent_result_maps_known_labels_only() {
        let general = IntentResult {
            intent: Some("general".into()),
            confidence: 0.3,
            source: IntentSource::Llm,
        };
        assert_eq!(general.category(), None);
        assert_eq!(
            IntentResult::keyword(Category::Education).category(),
            Some(Category::Education)
        );
    }

    #[test]
    fn paging_has_more_is_derived() {
        assert!(ProjectPaging::new(0, 2, 5).has_more);
        assert!(!ProjectPaging::new(4, 2, 5).has_more);
        assert!(!ProjectPaging::new(3, 2, 5).has_more);
        assert!(!ProjectPaging::new(u64::MAX, 2, 5).has_more);
    }

    #[test]
    fn paging_uses_camel_case_on_the_wire() {
        let json = serde_json::to_value(ProjectPaging::new(0, 2, 3)).unwrap();
        assert_eq!(json["hasMore"], true);
        assert_eq!(json["total"], 3);
    }

    #[test]
    fn ui_action_is_tagged() {
        let action = UiAction::ShowProjects {
            items: vec![],
            paging: ProjectPaging::new(0, 2, 0),
        };
        let json = serde_json::to_value(&action).unwrap();
        assert_eq!(json["type"], "show_projects");
        assert_eq!(json["paging"]["limit"], 2);
    }

    #[test]
    fn fetched_data_json_leads_with_profile() {
        let mut data = FetchedData::default();
        data.tables.insert(Category::Education, vec![Row::new()]);
        data.tables.insert(Category::Profile, vec![]);
        let json = serde_json::to_string(&data.to_json()).unwrap();
        assert_eq!(json, r#"{"profile":[],"education":[{}]}"#);
        let keys: Vec<&Category> = data.tables.keys().collect();
        assert_eq!(keys, vec![&Category::Profile, &Category::Education]);
    }

    #[test]
    fn chat_message_roles_serialize_lowercase() {
        let msg = ChatMessage::user("hello");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["role"], "user");
    }
}
