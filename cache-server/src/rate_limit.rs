//! Per-IP request rate limiting.
//!
//! A fixed one-minute window per IP, counted entirely in memory — no
//! backing store, so counts reset on restart and are not shared across
//! instances.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::extract::{ConnectInfo, Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tokio::sync::RwLock;

/// One IP's request count within the current fixed one-minute window.
struct Window {
    count: u32,
    window_started_at: u64,
}

/// A per-IP, fixed-window, in-memory rate limiter.
#[derive(Clone)]
pub struct RateLimiter {
    limit_per_minute: u32,
    windows: Arc<RwLock<HashMap<String, Window>>>,
}

/// Outcome of a rate-limit check, also used to populate response headers.
pub struct RateLimitInfo {
    pub limit: u32,
    pub remaining: u32,
    pub reset_after_secs: u64,
}

impl RateLimiter {
    /// Builds a limiter enforcing `limit_per_minute` requests per IP.
    pub fn new(limit_per_minute: u32) -> Self {
        Self {
            limit_per_minute,
            windows: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Registers one request from `ip`, returning whether it is allowed and
    /// the resulting quota state.
    pub async fn check(&self, ip: &str) -> (bool, RateLimitInfo) {
        if self.limit_per_minute == 0 {
            return (
                false,
                RateLimitInfo {
                    limit: 0,
                    remaining: 0,
                    reset_after_secs: 60,
                },
            );
        }
        let now = now_secs();
        let mut windows = self.windows.write().await;
        let entry = windows.entry(ip.to_string()).or_insert(Window {
            count: 0,
            window_started_at: now,
        });

        if now.saturating_sub(entry.window_started_at) >= 60 {
            entry.count = 0;
            entry.window_started_at = now;
        }

        let reset_after_secs = 60 - now.saturating_sub(entry.window_started_at);
        if entry.count >= self.limit_per_minute {
            return (
                false,
                RateLimitInfo {
                    limit: self.limit_per_minute,
                    remaining: 0,
                    reset_after_secs,
                },
            );
        }

        entry.count += 1;
        let remaining = self.limit_per_minute - entry.count;
        (
            true,
            RateLimitInfo {
                limit: self.limit_per_minute,
                remaining,
                reset_after_secs,
            },
        )
    }
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Tower middleware applying [`RateLimiter::check`] to every request,
/// returning 429 with `RateLimit-*` headers on rejection and stamping the
/// same headers onto successful responses.
pub async fn rate_limit_middleware(
    State(limiter): State<RateLimiter>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    req: Request,
    next: Next,
) -> Response {
    let ip = addr.ip().to_string();
    let (allowed, info) = limiter.check(&ip).await;

    if !allowed {
        let body = Json(json!({
            "error": "rate limit exceeded",
            "limit": info.limit,
            "resetAfterSeconds": info.reset_after_secs,
        }));
        return (
            StatusCode::TOO_MANY_REQUESTS,
            [
                ("RateLimit-Limit", info.limit.to_string()),
                ("RateLimit-Remaining", info.remaining.to_string()),
                ("RateLimit-Reset", info.reset_after_secs.to_string()),
            ],
            body,
        )
            .into_response();
    }

    let mut response = next.run(req).await;
    let headers = response.headers_mut();
    if let Ok(v) = info.limit.to_string().parse() {
        headers.insert("RateLimit-Limit", v);
    }
    if let Ok(v) = info.remaining.to_string().parse() {
        headers.insert("RateLimit-Remaining", v);
    }
    if let Ok(v) = info.reset_after_secs.to_string().parse() {
        headers.insert("RateLimit-Reset", v);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn allows_requests_under_the_limit() {
        let limiter = RateLimiter::new(2);
        let (allowed1, _) = limiter.check("1.2.3.4").await;
        let (allowed2, _) = limiter.check("1.2.3.4").await;
        assert!(allowed1);
        assert!(allowed2);
    }

    #[tokio::test]
    async fn rejects_once_the_window_is_exhausted() {
        let limiter = RateLimiter::new(1);
        let (first, _) = limiter.check("5.6.7.8").await;
        let (second, info) = limiter.check("5.6.7.8").await;
        assert!(first);
        assert!(!second);
        assert_eq!(info.remaining, 0);
    }

    #[tokio::test]
    async fn counts_are_independent_per_ip() {
        let limiter = RateLimiter::new(1);
        let (a, _) = limiter.check("9.9.9.9").await;
        let (b, _) = limiter.check("8.8.8.8").await;
        assert!(a);
        assert!(b);
    }
}
