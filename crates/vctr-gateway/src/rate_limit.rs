// SPDX-FileCopyrightText: 2026 VCTR Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fixed-window rate limiting for the chat endpoint.
//!
//! Clients are keyed by the first `X-Forwarded-For` entry, falling back to
//! the socket peer address. Windows live in process memory; a shared store
//! can be plugged in through [`RateLimitStore`].

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::extract::{ConnectInfo, Request, State};
use axum::http::{HeaderMap, HeaderValue};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use dashmap::DashMap;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};
use vctr_core::{RateLimitDecision, RateLimitStore, VctrError};

use crate::error::ApiError;
use crate::server::AppState;

#[derive(Debug, Clone, Copy)]
struct Window {
    count: u32,
    reset_at_ms: i64,
}

/// Process-local fixed-window counter.
#[derive(Debug)]
pub struct MemoryRateLimiter {
    windows: DashMap<String, Window>,
    limit: u32,
    window_ms: i64,
}

impl MemoryRateLimiter {
    pub fn new(limit: u32, window: Duration) -> Self {
        Self {
            windows: DashMap::new(),
            limit,
            window_ms: i64::try_from(window.as_millis()).unwrap_or(i64::MAX),
        }
    }

    /// Drops every window that has expired by `now_ms`.
    pub fn purge_expired(&self, now_ms: i64) -> usize {
        let before = self.windows.len();
        self.windows.retain(|_, w| w.reset_at_ms > now_ms);
        before - self.windows.len()
    }

    /// Number of tracked clients.
    pub fn tracked(&self) -> usize {
        self.windows.len()
    }

    fn decide(&self, key: &str, now_ms: i64) -> RateLimitDecision {
        let fresh = Window {
            count: 0,
            reset_at_ms: now_ms.saturating_add(self.window_ms),
        };
        let mut window = self.windows.entry(key.to_string()).or_insert(fresh);
        if now_ms >= window.reset_at_ms {
            *window = fresh;
        }

        let allowed = window.count < self.limit;
        if allowed {
            window.count += 1;
        }
        RateLimitDecision {
            allowed,
            limit: self.limit,
            remaining: self.limit.saturating_sub(window.count),
            reset_at_ms: window.reset_at_ms,
        }
    }
}

#[async_trait]
impl RateLimitStore for MemoryRateLimiter {
    async fn hit(&self, key: &str, now_ms: i64) -> Result<RateLimitDecision, VctrError> {
        Ok(self.decide(key, now_ms))
    }
}

/// Purges expired windows once per window until `shutdown` fires.
pub fn spawn_purge_task(
    limiter: Arc<MemoryRateLimiter>,
    every: Duration,
    shutdown: CancellationToken,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.tick().await;
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let purged = limiter.purge_expired(chrono::Utc::now().timestamp_millis());
                    if purged > 0 {
                        debug!(purged, remaining = limiter.tracked(), "purged expired rate-limit windows");
                    }
                }
                _ = shutdown.cancelled() => break,
            }
        }
    })
}

/// The client key: first forwarded address, else the peer IP, else `"unknown"`.
pub fn client_key(headers: &HeaderMap, peer: Option<IpAddr>) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .or_else(|| peer.map(|ip| ip.to_string()))
        .unwrap_or_else(|| "unknown".to_string())
}

/// Middleware counting each request and stamping `X-RateLimit-*` headers.
pub async fn rate_limit(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());
    let key = client_key(request.headers(), peer);

    let decision = match state
        .limiter
        .hit(&key, chrono::Utc::now().timestamp_millis())
        .await
    {
        Ok(decision) => decision,
        Err(e) => {
            error!(error = %e, "rate limit store failed");
            return ApiError::from(e).into_response();
        }
    };

    let mut response = if decision.allowed {
        next.run(request).await
    } else {
        warn!(client = key.as_str(), "rate limit exceeded");
        ApiError::RateLimited.into_response()
    };

    let headers = response.headers_mut();
    headers.insert("x-ratelimit-limit", HeaderValue::from(decision.limit));
    headers.insert("x-ratelimit-remaining", HeaderValue::from(decision.remaining));
    headers.insert("x-ratelimit-reset", HeaderValue::from(decision.reset_at_secs()));
    response
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    const MINUTE: Duration = Duration::from_secs(60);

    #[test]
    fn thirty_allowed_then_rejected() {
        let limiter = MemoryRateLimiter::new(30, MINUTE);
        for i in 0..30 {
            let d = limiter.decide("1.2.3.4", 1_000 + i);
            assert!(d.allowed);
            assert_eq!(d.remaining, 29 - i as u32);
            assert_eq!(d.reset_at_ms, 61_000);
        }
        let d = limiter.decide("1.2.3.4", 2_000);
        assert!(!d.allowed);
        assert_eq!(d.remaining, 0);
    }

    #[test]
    fn window_resets_at_reset_time() {
        let limiter = MemoryRateLimiter::new(1, MINUTE);
        assert!(limiter.decide("a", 0).allowed);
        assert!(!limiter.decide("a", 59_999).allowed);

        let d = limiter.decide("a", 60_000);
        assert!(d.allowed);
        assert_eq!(d.remaining, 0);
        assert_eq!(d.reset_at_ms, 120_000);
    }

    #[test]
    fn clients_are_independent() {
        let limiter = MemoryRateLimiter::new(1, MINUTE);
        assert!(limiter.decide("a", 0).allowed);
        assert!(limiter.decide("b", 0).allowed);
        assert!(!limiter.decide("a", 1).allowed);
    }

    #[test]
    fn purge_drops_only_expired_windows() {
        let limiter = MemoryRateLimiter::new(5, MINUTE);
        limiter.decide("old", 0);
        limiter.decide("new", 30_000);
        assert_eq!(limiter.purge_expired(60_000), 1);
        assert_eq!(limiter.tracked(), 1);
    }

    #[test]
    fn client_key_prefers_forwarded_for() {
        let mut headers = HeaderMap::new();
        let peer = Some(IpAddr::from([10, 0, 0, 1]));
        assert_eq!(client_key(&headers, peer), "10.0.0.1");
        assert_eq!(client_key(&headers, None), "unknown");

        headers.insert("x-forwarded-for", HeaderValue::from_static(" 203.0.113.7 , 10.0.0.2"));
        assert_eq!(client_key(&headers, peer), "203.0.113.7");

        headers.insert("x-forwarded-for", HeaderValue::from_static(""));
        assert_eq!(client_key(&headers, peer), "10.0.0.1");
    }

    #[tokio::test]
    async fn purge_task_stops_on_shutdown() {
        let limiter = Arc::new(MemoryRateLimiter::new(5, MINUTE));
        let token = CancellationToken::new();
        let handle = spawn_purge_task(limiter, Duration::from_millis(10), token.clone());
        token.cancel();
        handle.await.unwrap();
    }

    proptest! {
        #[test]
        fn never_more_than_limit_per_window(limit in 1u32..50, hits in 1usize..120) {
            let limiter = MemoryRateLimiter::new(limit, MINUTE);
            let allowed = (0..hits)
                .filter(|&i| limiter.decide("k", i as i64).allowed)
                .count();
            prop_assert_eq!(allowed, hits.min(limit as usize));
        }
    }
}
