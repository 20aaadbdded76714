// SPDX-FileCopyrightText: 2026 VCTR Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Turns a model response into the client reply.
//!
//! In project mode a response carrying `show_projects` calls is answered
//! from the database instead of the model's text.

use serde_json::Value;
use tracing::{debug, error};
use vctr_core::types::CompletionResponse;
use vctr_core::{Category, DataStore, ProjectPaging, UiAction, VctrError};

use crate::ChatReply;
use crate::projects::{self, FOLLOW_UP_PROMPT, PageRequest, TOOL_NAME};

/// Builds the reply for a model response.
pub async fn dispatch(
    response: CompletionResponse,
    project_mode: bool,
    store: &dyn DataStore,
    subject: &str,
) -> Result<ChatReply, VctrError> {
    if project_mode
        && let Some(reply) = answer_tool_calls(&response, store, subject).await?
    {
        return Ok(reply);
    }
    Ok(plain_reply(response, project_mode))
}

/// Executes every `show_projects` call. `None` when there was none.
async fn answer_tool_calls(
    response: &CompletionResponse,
    store: &dyn DataStore,
    subject: &str,
) -> Result<Option<ChatReply>, VctrError> {
    let mut actions = Vec::new();

    for call in response.tool_calls.iter().filter(|c| c.name == TOOL_NAME) {
        let page = PageRequest::from_arguments(&call.arguments);
        debug!(
            call_id = call.id.as_str(),
            offset = page.offset,
            limit = page.limit,
            "executing show_projects"
        );

        let rows = store
            .select_page(Category::Projects, page.offset, page.limit)
            .await
            .map_err(|e| {
                error!(error = %e, "project page query failed");
                VctrError::Storage {
                    message: "Failed to fetch projects".to_string(),
                    details: vec![e.public_message()],
                }
            })?;

        actions.push(UiAction::ShowProjects {
            items: rows.rows.into_iter().map(Value::Object).collect(),
            paging: ProjectPaging::new(page.offset, page.limit, rows.total),
        });
    }

    let text = match actions.first() {
        Some(UiAction::ShowProjects { items, paging }) => projects::summarize(items, paging, subject),
        None => return Ok(None),
    };

    Ok(Some(ChatReply {
        text,
        ui_actions: actions,
        follow_up_prompt: Some(FOLLOW_UP_PROMPT.to_string()),
    }))
}

fn plain_reply(response: CompletionResponse, project_mode: bool) -> ChatReply {
    let text = response.content.unwrap_or_default();
    ChatReply {
        text: if project_mode {
            projects::strip_markdown(&text)
        } else {
            text
        },
        ui_actions: Vec::new(),
        follow_up_prompt: None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use vctr_core::types::ToolCall;
    use vctr_test_utils::{MockStore, StoreCall};

    use super::*;

    fn store() -> MockStore {
        MockStore::new().with_table(
            Category::Projects,
            vec![
                json!({"title": "Atlas", "description": "Maps"}),
                json!({"title": "Beacon", "description": "Alerts"}),
                json!({"title": "Comet", "description": "Orbits"}),
            ],
        )
    }

    fn tool_response(calls: &[(&str, &str)]) -> CompletionResponse {
        CompletionResponse {
            content: Some("ignored".into()),
            tool_calls: calls
                .iter()
                .enumerate()
                .map(|(i, (name, args))| ToolCall {
                    id: format!("call_{i}"),
                    name: name.to_string(),
                    arguments: args.to_string(),
                })
                .collect(),
            model: "m".into(),
        }
    }

    #[tokio::test]
    async fn tool_calls_become_ui_actions() {
        let store = store();
        let reply = dispatch(
            tool_response(&[("show_projects", r#"{"offset":2,"limit":5}"#)]),
            true,
            &store,
            "Victor",
        )
        .await
        .unwrap();

        assert_eq!(
            reply.text,
            "I found 3 projects Victor worked on. Here is the next one: 1) Comet - Orbits"
        );
        assert_eq!(reply.follow_up_prompt.as_deref(), Some(FOLLOW_UP_PROMPT));
        match &reply.ui_actions[0] {
            UiAction::ShowProjects { items, paging } => {
                assert_eq!(items.len(), 1);
                assert_eq!(*paging, ProjectPaging::new(2, 2, 3));
                assert!(!paging.has_more);
            }
        }
        assert_eq!(
            store.calls(),
            vec![StoreCall::Page {
                category: Category::Projects,
                offset: 2,
                limit: 2
            }]
        );
    }

    #[tokio::test]
    async fn huge_offset_yields_an_empty_last_page() {
        let store = store();
        let reply = dispatch(
            tool_response(&[("show_projects", r#"{"offset": 1e20, "limit": 2}"#)]),
            true,
            &store,
            "Victor",
        )
        .await
        .unwrap();

        assert_eq!(
            reply.text,
            "I found 3 projects Victor worked on. There are no more projects to show."
        );
        match &reply.ui_actions[0] {
            UiAction::ShowProjects { items, paging } => {
                assert!(items.is_empty());
                assert_eq!(paging.offset, i64::MAX as u64);
                assert!(!paging.has_more);
            }
        }
    }

    #[tokio::test]
    async fn every_show_projects_call_is_executed() {
        let store = store();
        let reply = dispatch(
            tool_response(&[
                ("show_projects", r#"{"offset":0,"limit":2}"#),
                ("other_tool", "{}"),
                ("show_projects", "garbage"),
            ]),
            true,
            &store,
            "Victor",
        )
        .await
        .unwrap();
        assert_eq!(reply.ui_actions.len(), 2);
        assert!(reply.text.contains("Here are the first two: 1) Atlas - Maps 2) Beacon - Alerts"));
    }

    #[tokio::test]
    async fn unrelated_tool_calls_fall_through_to_text() {
        let store = store();
        let reply = dispatch(
            tool_response(&[("other_tool", "{}")]),
            true,
            &store,
            "Victor",
        )
        .await
        .unwrap();
        assert_eq!(reply.text, "ignored");
        assert!(reply.ui_actions.is_empty());
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn tool_calls_are_ignored_outside_project_mode() {
        let store = store();
        let reply = dispatch(
            tool_response(&[("show_projects", "{}")]),
            false,
            &store,
            "Victor",
        )
        .await
        .unwrap();
        assert_eq!(reply.text, "ignored");
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn project_text_is_cleaned() {
        let response = CompletionResponse {
            content: Some("**Atlas**  maps  things".into()),
            ..Default::default()
        };
        let reply = dispatch(response, true, &MockStore::new(), "Victor").await.unwrap();
        assert_eq!(reply.text, "Atlas maps things");
        assert!(reply.follow_up_prompt.is_none());
    }

    #[tokio::test]
    async fn plain_text_is_untouched_outside_project_mode() {
        let response = CompletionResponse {
            content: Some("**Bold**  answer".into()),
            ..Default::default()
        };
        let reply = dispatch(response, false, &MockStore::new(), "Victor").await.unwrap();
        assert_eq!(reply.text, "**Bold**  answer");
    }

    #[tokio::test]
    async fn page_query_failure_is_a_storage_error() {
        let store = MockStore::new().failing(Category::Projects);
        let err = dispatch(tool_response(&[("show_projects", "{}")]), true, &store, "Victor")
            .await
            .unwrap_err();
        assert_eq!(err.public_message(), "Failed to fetch projects");
    }
}
