// SPDX-FileCopyrightText: 2026 VCTR Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions for the external collaborators of the chat
//! pipeline: the data store, the model provider, speech services and the
//! rate-limit store.
//!
//! All adapters extend the [`PluginAdapter`] base trait and use
//! `#[async_trait]` for dynamic dispatch compatibility.

pub mod adapter;
pub mod provider;
pub mod rate_limit;
pub mod speech;
pub mod store;

pub use adapter::PluginAdapter;
pub use provider::ChatProvider;
pub use rate_limit::{RateLimitDecision, RateLimitStore};
pub use speech::{SpeechAdapter, TranscriptionAdapter};
pub use store::DataStore;
