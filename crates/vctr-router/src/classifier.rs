// SPDX-FileCopyrightText: 2026 VCTR Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Zero-cost message classification: greetings and category keywords.
//!
//! Neither check touches the network, so both run before any upstream
//! is configured.

use std::sync::LazyLock;

use regex::Regex;
use vctr_core::{Category, IntentResult};

/// Bare greetings, optionally followed by punctuation.
static GREETING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(hi|hello|hey|yo|what's up|whats up|sup)[\s!.?]*$")
        .expect("greeting pattern is valid")
});

/// Returns true when the whole (trimmed) message is a bare greeting.
pub fn is_greeting(message: &str) -> bool {
    GREETING.is_match(message.trim())
}

/// The canned reply to a greeting.
pub fn greeting_reply(subject: &str) -> String {
    format!("Hi there, what would you like to know about {subject}? I am here to help.")
}

/// First category whose name occurs in the message, in
/// [`Category::KEYWORD_ORDER`].
pub fn match_keyword(message: &str) -> Option<Category> {
    let lower = message.to_lowercase();
    Category::KEYWORD_ORDER
        .into_iter()
        .find(|category| lower.contains(category.keyword()))
}

/// The keyword path of intent resolution. `None` means the model must
/// classify the message.
pub fn keyword_intent(message: &str) -> Option<IntentResult> {
    match_keyword(message).map(IntentResult::keyword)
}
