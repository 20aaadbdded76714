// SPDX-FileCopyrightText: 2026 VCTR Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for VCTR integration tests.
//!
//! Provides mock adapters and test harness infrastructure for fast,
//! deterministic, CI-runnable tests without Supabase, Groq or Deepgram.
//!
//! # Components
//!
//! - [`MockProvider`] - Mock chat provider with queued replies and request capture
//! - [`MockStore`] - In-memory data store with per-table failure injection
//! - [`MockSpeech`] / [`MockTranscriber`] - Canned speech and transcription adapters
//! - [`TestHarness`] - The full HTTP router over the mocks

pub mod harness;
pub mod mock_provider;
pub mod mock_speech;
pub mod mock_store;

pub use harness::{TestHarness, TestHarnessBuilder, TestResponse};
pub use mock_provider::MockProvider;
pub use mock_speech::{MockSpeech, MockTranscriber};
pub use mock_store::{MockStore, StoreCall};
