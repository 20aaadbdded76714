// SPDX-FileCopyrightText: 2026 VCTR Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the VCTR portfolio assistant.
//!
//! This crate provides the foundational trait definitions, error types, and
//! domain types used throughout the VCTR workspace. Every external
//! collaborator (data store, model provider, speech services, rate-limit
//! store) is reached through a trait defined here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::VctrError;
pub use types::{
    AdapterType, Category, ChatMessage, FetchedData, HealthStatus, IntentResult, IntentSource,
    ProjectContext, ProjectPaging, Role, Row, RowPage, UiAction,
};

pub use traits::{
    ChatProvider, DataStore, PluginAdapter, RateLimitDecision, RateLimitStore, SpeechAdapter,
    TranscriptionAdapter,
};
