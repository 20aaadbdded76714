// SPDX-FileCopyrightText: 2026 VCTR Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message classification and model routing for the VCTR assistant.
//!
//! This crate provides:
//! - [`is_greeting`] / [`keyword_intent`]: heuristic checks with no network cost
//! - [`IntentResolver`]: model-backed intent classification with tolerant decoding
//! - [`ModelRouter`]: fast/strong model selection with per-mode sampling parameters

pub mod classifier;
pub mod intent;
pub mod router;

pub use classifier::{greeting_reply, is_greeting, keyword_intent, match_keyword};
pub use intent::{IntentResolver, decode_intent};
pub use router::{ModelRouter, ModelTier, RoutingDecision};
