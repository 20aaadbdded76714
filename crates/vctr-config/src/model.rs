// SPDX-FileCopyrightText: 2026 VCTR Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the VCTR assistant.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level VCTR configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct VctrConfig {
    /// Assistant identity settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Groq chat-completion and transcription settings.
    #[serde(default)]
    pub groq: GroqConfig,

    /// Supabase (PostgREST) data store settings.
    #[serde(default)]
    pub supabase: SupabaseConfig,

    /// Deepgram text-to-speech settings.
    #[serde(default)]
    pub deepgram: DeepgramConfig,

    /// Fast/strong model routing settings.
    #[serde(default)]
    pub routing: RoutingConfig,

    /// Per-IP rate limiting settings.
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
}

/// Assistant identity configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name of the assistant.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// The one person the assistant answers questions about.
    #[serde(default = "default_subject")]
    pub subject: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            subject: default_subject(),
            log_level: default_log_level(),
        }
    }
}

fn default_agent_name() -> String {
    "VCTR".to_string()
}

fn default_subject() -> String {
    "Victor".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3001
}

/// Groq (OpenAI-compatible) API configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GroqConfig {
    /// Groq API key. `None` makes chat and transcription requests fail with 500.
    #[serde(default)]
    pub api_key: Option<String>,

    /// API base URL (without the trailing endpoint path).
    #[serde(default = "default_groq_base_url")]
    pub base_url: String,

    /// Model used for the intent classification fallback.
    #[serde(default = "default_fast_model")]
    pub intent_model: String,

    /// Model for short queries with short history.
    #[serde(default = "default_fast_model")]
    pub chat_model_fast: String,

    /// Model for everything else.
    #[serde(default = "default_strong_model")]
    pub chat_model_strong: String,

    /// Speech-to-text model.
    #[serde(default = "default_transcription_model")]
    pub transcription_model: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl std::fmt::Debug for GroqConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroqConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[redacted]"))
            .field("base_url", &self.base_url)
            .field("intent_model", &self.intent_model)
            .field("chat_model_fast", &self.chat_model_fast)
            .field("chat_model_strong", &self.chat_model_strong)
            .field("transcription_model", &self.transcription_model)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl GroqConfig {
    /// The API key, unless unset or blank.
    pub fn key(&self) -> Option<&str> {
        non_blank(&self.api_key)
    }
}

impl Default for GroqConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_groq_base_url(),
            intent_model: default_fast_model(),
            chat_model_fast: default_fast_model(),
            chat_model_strong: default_strong_model(),
            transcription_model: default_transcription_model(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Empty and whitespace-only values count as unset.
fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn default_groq_base_url() -> String {
    "https://api.groq.com/openai/v1".to_string()
}

fn default_fast_model() -> String {
    "llama-3.1-8b-instant".to_string()
}

fn default_strong_model() -> String {
    "llama-3.3-70b-versatile".to_string()
}

fn default_transcription_model() -> String {
    "whisper-large-v3-turbo".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

/// Supabase project configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SupabaseConfig {
    /// Project URL, e.g. `https://xyz.supabase.co`.
    #[serde(default)]
    pub url: Option<String>,

    /// Anonymous (public) API key.
    #[serde(default)]
    pub anon_key: Option<String>,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for SupabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            anon_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl SupabaseConfig {
    /// Project URL and anon key, when both are set and non-blank.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        Some((non_blank(&self.url)?, non_blank(&self.anon_key)?))
    }
}

impl std::fmt::Debug for SupabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseConfig")
            .field("url", &self.url)
            .field("anon_key", &self.anon_key.as_ref().map(|_| "[redacted]"))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Deepgram text-to-speech configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DeepgramConfig {
    /// Deepgram API key. `None` makes speech requests fail with 500.
    #[serde(default)]
    pub api_key: Option<String>,

    /// API base URL.
    #[serde(default = "default_deepgram_base_url")]
    pub base_url: String,

    /// Voice model passed to the speak endpoint.
    #[serde(default = "default_voice_model")]
    pub voice_model: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl std::fmt::Debug for DeepgramConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeepgramConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[redacted]"))
            .field("base_url", &self.base_url)
            .field("voice_model", &self.voice_model)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl DeepgramConfig {
    /// The API key, unless unset or blank.
    pub fn key(&self) -> Option<&str> {
        non_blank(&self.api_key)
    }
}

impl Default for DeepgramConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_deepgram_base_url(),
            voice_model: default_voice_model(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_deepgram_base_url() -> String {
    "https://api.deepgram.com/v1".to_string()
}

fn default_voice_model() -> String {
    "aura-2-athena-en".to_string()
}

/// Model routing configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RoutingConfig {
    /// Longest message (in characters) still eligible for the fast model.
    #[serde(default = "default_fast_max_message_chars")]
    pub fast_max_message_chars: usize,

    /// Longest conversation (in messages) still eligible for the fast model.
    #[serde(default = "default_fast_max_history")]
    pub fast_max_history: usize,

    /// Max tokens for regular answers.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature for regular answers.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Max tokens when the project tool is active.
    #[serde(default = "default_project_max_tokens")]
    pub project_max_tokens: u32,

    /// Sampling temperature when the project tool is active.
    #[serde(default = "default_project_temperature")]
    pub project_temperature: f32,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            fast_max_message_chars: default_fast_max_message_chars(),
            fast_max_history: default_fast_max_history(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            project_max_tokens: default_project_max_tokens(),
            project_temperature: default_project_temperature(),
        }
    }
}

fn default_fast_max_message_chars() -> usize {
    160
}

fn default_fast_max_history() -> usize {
    6
}

fn default_max_tokens() -> u32 {
    1000
}

fn default_temperature() -> f32 {
    0.9
}

fn default_project_max_tokens() -> u32 {
    300
}

fn default_project_temperature() -> f32 {
    0.4
}

/// Per-client fixed-window rate limiting.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RateLimitConfig {
    /// Window length in seconds.
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,

    /// Requests allowed per window.
    #[serde(default = "default_max_requests")]
    pub max_requests: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window_secs: default_window_secs(),
            max_requests: default_max_requests(),
        }
    }
}

fn default_window_secs() -> u64 {
    60
}

fn default_max_requests() -> u32 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_service_limits() {
        let config = VctrConfig::default();
        assert_eq!(config.agent.name, "VCTR");
        assert_eq!(config.agent.subject, "Victor");
        assert_eq!(config.rate_limit.window_secs, 60);
        assert_eq!(config.rate_limit.max_requests, 30);
        assert_eq!(config.routing.fast_max_message_chars, 160);
        assert_eq!(config.routing.fast_max_history, 6);
        assert_eq!(config.groq.chat_model_fast, "llama-3.1-8b-instant");
        assert_eq!(config.groq.chat_model_strong, "llama-3.3-70b-versatile");
        assert!(config.groq.api_key.is_none());
    }

    #[test]
    fn debug_redacts_secrets() {
        let mut config = VctrConfig::default();
        config.groq.api_key = Some("gsk-secret".into());
        config.supabase.anon_key = Some("anon-secret".into());
        config.deepgram.api_key = Some("dg-secret".into());

        let debug = format!("{config:?}");
        assert!(!debug.contains("gsk-secret"));
        assert!(!debug.contains("anon-secret"));
        assert!(!debug.contains("dg-secret"));
        assert!(debug.contains("[redacted]"));
    }

    #[test]
    fn blank_keys_count_as_unset() {
        let mut config = VctrConfig::default();
        config.groq.api_key = Some("   ".into());
        config.deepgram.api_key = Some(" dg-key ".into());
        config.supabase.url = Some("https://xyz.supabase.co".into());
        config.supabase.anon_key = Some(String::new());

        assert_eq!(config.groq.key(), None);
        assert_eq!(config.deepgram.key(), Some("dg-key"));
        assert_eq!(config.supabase.credentials(), None);

        config.supabase.anon_key = Some("anon".into());
        assert_eq!(
            config.supabase.credentials(),
            Some(("https://xyz.supabase.co", "anon"))
        );
    }
}
