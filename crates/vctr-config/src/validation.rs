// SPDX-FileCopyrightText: 2026 VCTR Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as bind addresses, URL schemes and non-zero limits.

use crate::diagnostic::ConfigError;
use crate::model::VctrConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every failure instead of stopping at the first one.
pub fn validate_config(config: &VctrConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    let host = config.server.host.trim();
    if host.is_empty() {
        fail("server.host must not be empty".to_string());
    } else if host.parse::<std::net::IpAddr>().is_err()
        && !host
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
    {
        fail(format!(
            "server.host `{host}` is not a valid IP address or hostname"
        ));
    }

    for (key, url) in [
        ("groq.base_url", Some(&config.groq.base_url)),
        ("deepgram.base_url", Some(&config.deepgram.base_url)),
        ("supabase.url", config.supabase.url.as_ref()),
    ] {
        if let Some(url) = url
            && !url.trim().is_empty()
            && !(url.starts_with("http://") || url.starts_with("https://"))
        {
            fail(format!("{key} must start with http:// or https://, got `{url}`"));
        }
    }

    for (key, secs) in [
        ("groq.timeout_secs", config.groq.timeout_secs),
        ("supabase.timeout_secs", config.supabase.timeout_secs),
        ("deepgram.timeout_secs", config.deepgram.timeout_secs),
        ("rate_limit.window_secs", config.rate_limit.window_secs),
    ] {
        if secs == 0 {
            fail(format!("{key} must be greater than zero"));
        }
    }

    if config.rate_limit.max_requests == 0 {
        fail("rate_limit.max_requests must be greater than zero".to_string());
    }

    let routing = &config.routing;
    if routing.max_tokens == 0 || routing.project_max_tokens == 0 {
        fail("routing.max_tokens and routing.project_max_tokens must be greater than zero".into());
    }
    for (key, t) in [
        ("routing.temperature", routing.temperature),
        ("routing.project_temperature", routing.project_temperature),
    ] {
        if !(0.0..=2.0).contains(&t) {
            fail(format!("{key} must be between 0 and 2, got {t}"));
        }
    }

    for (key, model) in [
        ("groq.intent_model", &config.groq.intent_model),
        ("groq.chat_model_fast", &config.groq.chat_model_fast),
        ("groq.chat_model_strong", &config.groq.chat_model_strong),
        ("groq.transcription_model", &config.groq.transcription_model),
        ("deepgram.voice_model", &config.deepgram.voice_model),
    ] {
        if model.trim().is_empty() {
            fail(format!("{key} must not be empty"));
        }
    }

    if config.agent.subject.trim().is_empty() {
        fail("agent.subject must not be empty".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
