// SPDX-FileCopyrightText: 2026 VCTR Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for the VCTR assistant.
//!
//! Exposes the chat pipeline, speech synthesis and transcription as a JSON
//! API with per-client rate limiting on chat.

pub mod error;
pub mod handlers;
pub mod rate_limit;
pub mod server;

pub use error::ApiError;
pub use rate_limit::{MemoryRateLimiter, spawn_purge_task};
pub use server::{AppState, build_router, serve};
