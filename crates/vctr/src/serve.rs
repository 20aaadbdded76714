// SPDX-FileCopyrightText: 2026 VCTR Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `vctr serve` command implementation.
//!
//! Builds the upstream adapters from configuration, assembles the chat agent
//! and gateway state, and serves HTTP until SIGINT or SIGTERM.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{error, info, warn};
use vctr_agent::ChatAgent;
use vctr_agent::shutdown;
use vctr_config::VctrConfig;
use vctr_core::{ChatProvider, DataStore, SpeechAdapter, TranscriptionAdapter, VctrError};
use vctr_deepgram::DeepgramSpeech;
use vctr_gateway::{AppState, MemoryRateLimiter, spawn_purge_task};
use vctr_groq::GroqProvider;
use vctr_storage::SupabaseStore;

/// How long in-flight requests get to finish after a shutdown signal.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(30);

/// Runs the `vctr serve` command.
pub async fn run_serve(config: VctrConfig) -> Result<(), VctrError> {
    init_tracing(&config.agent.log_level);

    info!(name = config.agent.name.as_str(), "starting vctr serve");

    let store = SupabaseStore::from_config(&config.supabase)?
        .map(|s| Arc::new(s) as Arc<dyn DataStore>);
    let groq = GroqProvider::from_config(&config.groq)?.map(Arc::new);
    let speech = DeepgramSpeech::from_config(&config.deepgram)?
        .map(|s| Arc::new(s) as Arc<dyn SpeechAdapter>);

    if store.is_none() {
        warn!("Supabase is not configured, /api/chat will answer with 500");
    }

    let agent = ChatAgent::new(
        &config,
        store,
        groq.clone().map(|g| g as Arc<dyn ChatProvider>),
    );

    let limiter = Arc::new(MemoryRateLimiter::new(
        config.rate_limit.max_requests,
        Duration::from_secs(config.rate_limit.window_secs),
    ));

    let cancel = shutdown::install_signal_handler();
    spawn_purge_task(
        limiter.clone(),
        Duration::from_secs(config.rate_limit.window_secs.max(1)),
        cancel.clone(),
    );

    let state = AppState {
        agent: Arc::new(agent),
        speech,
        transcriber: groq.map(|g| g as Arc<dyn TranscriptionAdapter>),
        limiter,
        started: Instant::now(),
    };

    let server_config = config.server.clone();
    let server_cancel = cancel.clone();
    let mut server = tokio::spawn(async move {
        vctr_gateway::serve(&server_config, state, server_cancel).await
    });

    // The server only returns early when it fails to bind or crashes.
    let outcome = tokio::select! {
        joined = &mut server => Some(joined),
        _ = cancel.cancelled() => None,
    };

    let joined = match outcome {
        Some(joined) => joined,
        None => {
            if !shutdown::drain(&mut server, DRAIN_TIMEOUT).await {
                server.abort();
            }
            info!("vctr serve shutdown complete");
            return Ok(());
        }
    };

    cancel.cancel();
    match joined {
        Ok(result) => result,
        Err(e) => {
            error!(error = %e, "server task panicked");
            Err(VctrError::Internal(format!("server task failed: {e}")))
        }
    }
}

/// Initializes the tracing subscriber with the given log level.
///
/// `RUST_LOG` takes precedence when set.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("vctr={log_level},tower_http={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
