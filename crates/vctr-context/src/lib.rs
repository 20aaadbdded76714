// SPDX-FileCopyrightText: 2026 VCTR Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prompt assembly for the VCTR assistant.
//!
//! - [`derive_education_context`]: turns education rows into a
//!   "years since" sentence so the model can answer date questions
//! - [`PromptComposer`]: builds the system message from rules, fetched data
//!   and project paging state

pub mod composer;
pub mod date_context;

pub use composer::{PromptComposer, PromptInput};
pub use date_context::{derive_education_context, parse_year};
