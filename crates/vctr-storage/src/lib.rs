// SPDX-FileCopyrightText: 2026 VCTR Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Read-only data access for the VCTR assistant.
//!
//! The portfolio lives in five Supabase tables (`profile`, `projects`,
//! `experience`, `education`, `personal`), read through PostgREST with the
//! project's anon key.

pub mod supabase;

pub use supabase::SupabaseStore;
