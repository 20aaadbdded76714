// SPDX-FileCopyrightText: 2026 VCTR Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The `show_projects` tool: schema, argument handling and reply text.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Value, json};
use tracing::warn;
use vctr_core::ProjectPaging;
use vctr_core::types::ToolDefinition;

pub const TOOL_NAME: &str = "show_projects";

/// Projects shown per page unless the model asks for fewer.
pub const DEFAULT_PAGE_SIZE: u64 = 2;
const MAX_PAGE_SIZE: u64 = 2;

/// Length cap of a project's one-line description, in characters.
const SHORT_DESCRIPTION_CHARS: usize = 140;

pub const FOLLOW_UP_PROMPT: &str =
    "Would you like to see the next projects or have any questions about these two projects?";

static UNDERSCORE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"__+").expect("underscore pattern is valid"));
static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s{2,}").expect("whitespace pattern is valid"));

/// Tool schema offered to the model in project mode.
pub fn tool_definition(subject: &str) -> ToolDefinition {
    ToolDefinition {
        name: TOOL_NAME.to_string(),
        description: format!(
            "Fetch a small page of {subject}'s projects for the UI. Use this when the user asks about projects or wants to see the next project."
        ),
        parameters: json!({
            "type": "object",
            "properties": {
                "offset": {
                    "type": "integer",
                    "description": "Starting index for projects (0-based)."
                },
                "limit": {
                    "type": "integer",
                    "description": "Number of projects to return (1-2)."
                }
            },
            "required": ["offset", "limit"]
        }),
    }
}

/// A sanitized page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub offset: u64,
    pub limit: u64,
}

impl PageRequest {
    /// Clamps raw values: offset to 0..=i64::MAX, limit to 1..=2.
    pub fn clamped(offset: Option<f64>, limit: Option<f64>) -> Self {
        // PostgREST offsets are signed 64-bit.
        let offset = (offset.unwrap_or(0.0).max(0.0).floor() as u64).min(i64::MAX as u64);
        let limit = limit
            .map(|l| l.floor().clamp(1.0, MAX_PAGE_SIZE as f64) as u64)
            .unwrap_or(DEFAULT_PAGE_SIZE);
        Self { offset, limit }
    }

    /// Parses the model's JSON arguments. Malformed input gets the defaults.
    pub fn from_arguments(raw: &str) -> Self {
        let raw = if raw.trim().is_empty() { "{}" } else { raw };
        let args = match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(args)) => args,
            Ok(other) => {
                warn!(arguments = %other, "tool arguments are not an object, using defaults");
                Default::default()
            }
            Err(e) => {
                warn!(error = %e, "invalid tool arguments, using defaults");
                Default::default()
            }
        };
        Self::clamped(
            args.get("offset").and_then(numeric),
            args.get("limit").and_then(numeric),
        )
    }
}

/// Numbers and numeric strings; anything else counts as absent.
fn numeric(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    n.filter(|n| n.is_finite())
}

/// One project as `"{title} - {first sentence}"`.
pub fn project_line(project: &Value) -> String {
    let title = match project.get("title") {
        None | Some(Value::Null) => "Project".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    };
    let description = match project.get("description") {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    };

    let collapsed = description.split_whitespace().collect::<Vec<_>>().join(" ");
    let first_sentence = collapsed.split(". ").next().unwrap_or_default();
    let short: String = first_sentence.chars().take(SHORT_DESCRIPTION_CHARS).collect();

    format!("{title} - {}", short.trim())
}

/// The reply text for a page of projects.
pub fn summarize(items: &[Value], paging: &ProjectPaging, subject: &str) -> String {
    let noun = if paging.total == 1 { "project" } else { "projects" };
    let mut parts = vec![format!("I found {} {noun} {subject} worked on.", paging.total)];

    let position = if paging.offset == 0 { "first" } else { "next" };
    parts.push(match items.len() {
        0 => "There are no more projects to show.".to_string(),
        1 => format!("Here is the {position} one:"),
        _ => format!("Here are the {position} two:"),
    });

    parts.extend(
        items
            .iter()
            .enumerate()
            .map(|(i, item)| format!("{}) {}", i + 1, project_line(item))),
    );
    parts.join(" ")
}

/// Removes markdown emphasis the UI would show literally.
pub fn strip_markdown(text: &str) -> String {
    let text = text.replace("**", "");
    let text = UNDERSCORE_RUN.replace_all(&text, "");
    WHITESPACE_RUN.replace_all(&text, " ").trim().to_string()
}
