// SPDX-FileCopyrightText: 2026 VCTR Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./vctr.toml` > `~/.config/vctr/vctr.toml` > `/etc/vctr/vctr.toml`
//! with overrides from the well-known service env vars and the `VCTR_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::VctrConfig;

/// System-wide config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/vctr/vctr.toml";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_PATH: &str = "vctr.toml";

/// Sections addressable through `VCTR_<SECTION>_<KEY>` variables.
///
/// `rate_limit` must precede any section that is a prefix of it.
const SECTIONS: &[&str] = &[
    "rate_limit",
    "routing",
    "agent",
    "server",
    "groq",
    "supabase",
    "deepgram",
];

/// Path of the per-user config file, if the platform has a config dir.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("vctr/vctr.toml"))
}

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/vctr/vctr.toml` (system-wide)
/// 3. `~/.config/vctr/vctr.toml` (user XDG config)
/// 4. `./vctr.toml` (local directory)
/// 5. `VITE_SUPABASE_*`, then the deployment env vars (`SUPABASE_URL`, `GROQ_API_KEY`, `PORT`, ...)
/// 6. `VCTR_*` environment variables
pub fn load_config() -> Result<VctrConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit config file specification.
pub fn load_config_from_str(toml_content: &str) -> Result<VctrConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(VctrConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<VctrConfig, figment::Error> {
    with_env(
        Figment::new()
            .merge(Serialized::defaults(VctrConfig::default()))
            .merge(Toml::file(path)),
    )
    .extract()
}

/// Build the Figment used internally for config loading.
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    with_env(
        Figment::new()
            .merge(Serialized::defaults(VctrConfig::default()))
            .merge(Toml::file(SYSTEM_CONFIG_PATH))
            .merge(Toml::file(user_config_path().unwrap_or_default()))
            .merge(Toml::file(LOCAL_CONFIG_PATH)),
    )
}

fn with_env(figment: Figment) -> Figment {
    figment
        .merge(vite_env_provider())
        .merge(service_env_provider())
        .merge(prefixed_env_provider())
}

/// Frontend-style Supabase variables. Merged first so the plain
/// `SUPABASE_*` names win when both are set.
fn vite_env_provider() -> Env {
    Env::raw()
        .only(&["VITE_SUPABASE_URL", "VITE_SUPABASE_ANON_KEY"])
        .map(|key| match key.as_str().to_ascii_lowercase().as_str() {
            "vite_supabase_url" => "supabase.url".into(),
            _ => "supabase.anon_key".into(),
        })
}

/// The variable names used by existing deployments.
fn service_env_provider() -> Env {
    Env::raw()
        .only(&[
            "SUPABASE_URL",
            "SUPABASE_ANON_KEY",
            "GROQ_API_KEY",
            "GROQ_INTENT_MODEL",
            "GROQ_CHAT_MODEL_FAST",
            "GROQ_CHAT_MODEL_STRONG",
            "DEEPGRAM_API_KEY",
            "PORT",
        ])
        .map(|key| map_service_key(key.as_str()).into())
}

fn map_service_key(key: &str) -> String {
    match key.to_ascii_lowercase().as_str() {
        "supabase_url" => "supabase.url".to_string(),
        "supabase_anon_key" => "supabase.anon_key".to_string(),
        "groq_api_key" => "groq.api_key".to_string(),
        "groq_intent_model" => "groq.intent_model".to_string(),
        "groq_chat_model_fast" => "groq.chat_model_fast".to_string(),
        "groq_chat_model_strong" => "groq.chat_model_strong".to_string(),
        "deepgram_api_key" => "deepgram.api_key".to_string(),
        "port" => "server.port".to_string(),
        other => other.to_string(),
    }
}

/// Create the `VCTR_` provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `VCTR_GROQ_CHAT_MODEL_FAST` must map to `groq.chat_model_fast`.
fn prefixed_env_provider() -> Env {
    Env::prefixed("VCTR_").map(|key| map_prefixed_key(key.as_str()).into())
}

/// Maps a prefix-stripped key such as `rate_limit_max_requests` to
/// `rate_limit.max_requests`. Keys outside a known section pass through.
pub fn map_prefixed_key(key: &str) -> String {
    let key = key.to_ascii_lowercase();
    for section in SECTIONS {
        if let Some(rest) = key
            .strip_prefix(section)
            .and_then(|rest| rest.strip_prefix('_'))
        {
            return format!("{section}.{rest}");
        }
    }
    key
}
