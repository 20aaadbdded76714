// SPDX-FileCopyrightText: 2026 VCTR Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI-compatible chat completion request/response types, as served by Groq.

use serde::{Deserialize, Deserializer, Serialize};
use vctr_core::types::{CompletionRequest, CompletionResponse, ToolCall, ToolDefinition};

// --- Tool types ---

/// A tool offered to the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiTool {
    /// Always `"function"`.
    #[serde(rename = "type")]
    pub tool_type: String,
    pub function: FunctionDefinition,
}

/// A function tool's name, description and JSON Schema parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionDefinition {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

impl From<&ToolDefinition> for ApiTool {
    fn from(tool: &ToolDefinition) -> Self {
        Self {
            tool_type: "function".to_string(),
            function: FunctionDefinition {
                name: tool.name.clone(),
                description: tool.description.clone(),
                parameters: tool.parameters.clone(),
            },
        }
    }
}

// --- Request types ---

/// A request to `POST {base}/chat/completions`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ApiMessage>,
    pub max_tokens: u32,
    pub temperature: f32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ApiTool>>,

    /// `"auto"` whenever tools are attached.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,
}

/// A single message in the request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiMessage {
    pub role: String,
    pub content: String,
}

/// Constrains the response format, e.g. `{"type": "json_object"}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseFormat {
    #[serde(rename = "type")]
    pub format_type: String,
}

impl From<&CompletionRequest> for ChatCompletionRequest {
    fn from(request: &CompletionRequest) -> Self {
        let tools = (!request.tools.is_empty())
            .then(|| request.tools.iter().map(ApiTool::from).collect::<Vec<_>>());
        Self {
            model: request.model.clone(),
            messages: request
                .messages
                .iter()
                .map(|m| ApiMessage {
                    role: m.role.to_string(),
                    content: m.content.clone(),
                })
                .collect(),
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            tool_choice: tools.as_ref().map(|_| "auto".to_string()),
            tools,
            response_format: request.json_response.then(|| ResponseFormat {
                format_type: "json_object".to_string(),
            }),
        }
    }
}

// --- Response types ---

/// A non-streaming chat completion response.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub model: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub choices: Vec<Choice>,
}

/// One completion choice. Only the first is used.
#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// The assistant message of a choice.
#[derive(Debug, Clone, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tool_calls: Vec<ApiToolCall>,
}

/// A tool call requested by the model.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiToolCall {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    pub function: FunctionCall,
}

/// The called function and its JSON-encoded arguments.
#[derive(Debug, Clone, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub arguments: String,
}

/// Explicit `null` decodes like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl From<ChatCompletionResponse> for CompletionResponse {
    fn from(response: ChatCompletionResponse) -> Self {
        let message = response.choices.into_iter().next().map(|c| c.message);
        let (content, tool_calls) = match message {
            Some(m) => (m.content, m.tool_calls),
            None => (None, Vec::new()),
        };
        CompletionResponse {
            content,
            tool_calls: tool_calls
                .into_iter()
                .map(|call| ToolCall {
                    id: call.id,
                    name: call.function.name,
                    arguments: call.function.arguments,
                })
                .collect(),
            model: response.model,
        }
    }
}
