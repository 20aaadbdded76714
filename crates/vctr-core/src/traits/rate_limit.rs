// SPDX-FileCopyrightText: 2026 VCTR Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rate-limit store trait.
//!
//! The in-memory implementation lives in the gateway and only counts
//! requests seen by one process. Deployments with several instances plug in
//! a shared-cache implementation behind the same trait.

use async_trait::async_trait;

use crate::error::VctrError;

/// Outcome of counting one request against a key's window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    /// Whether the request may proceed.
    pub allowed: bool,
    /// Window cap.
    pub limit: u32,
    /// Requests left in the current window.
    pub remaining: u32,
    /// Window reset time, epoch milliseconds.
    pub reset_at_ms: i64,
}

impl RateLimitDecision {
    /// Reset time in epoch seconds, rounded up.
    pub fn reset_at_secs(&self) -> i64 {
        (self.reset_at_ms + 999).div_euclid(1000)
    }
}

/// Fixed-window request counter keyed by client identity.
#[async_trait]
pub trait RateLimitStore: Send + Sync + 'static {
    /// Counts one request for `key` observed at `now_ms` (epoch millis).
    async fn hit(&self, key: &str, now_ms: i64) -> Result<RateLimitDecision, VctrError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_seconds_round_up() {
        let decision = RateLimitDecision {
            allowed: true,
            limit: 30,
            remaining: 29,
            reset_at_ms: 60_001,
        };
        assert_eq!(decision.reset_at_secs(), 61);

        let exact = RateLimitDecision {
            reset_at_ms: 60_000,
            ..decision
        };
        assert_eq!(exact.reset_at_secs(), 60);
    }
}
