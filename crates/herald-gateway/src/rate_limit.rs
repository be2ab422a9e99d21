// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fixed-window request limiting keyed by client address.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::{ConnectInfo, Request, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use dashmap::DashMap;
use tracing::warn;

use crate::error::ApiError;

/// Window count above which expired entries are swept before the next check.
const SWEEP_THRESHOLD: usize = 4096;

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

/// Result of one admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allowed { remaining: u32 },
    Limited { retry_after: Duration },
}

/// Per-client fixed windows of `limit` requests.
#[derive(Debug)]
pub struct RateLimiter {
    limit: u32,
    window: Duration,
    windows: DashMap<IpAddr, Window>,
}

impl RateLimiter {
    pub fn new(limit: u32, window: Duration) -> Self {
        Self {
            limit,
            window,
            windows: DashMap::new(),
        }
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn check(&self, client: IpAddr) -> Decision {
        self.check_at(client, Instant::now())
    }

    fn check_at(&self, client: IpAddr, now: Instant) -> Decision {
        if self.windows.len() > SWEEP_THRESHOLD {
            self.sweep(now);
        }

        let mut entry = self.windows.entry(client).or_insert(Window {
            started: now,
            count: 0,
        });
        let elapsed = now.saturating_duration_since(entry.started);
        if elapsed >= self.window {
            *entry = Window {
                started: now,
                count: 0,
            };
        }

        if entry.count >= self.limit {
            let elapsed = now.saturating_duration_since(entry.started);
            return Decision::Limited {
                retry_after: self.window.saturating_sub(elapsed),
            };
        }
        entry.count += 1;
        Decision::Allowed {
            remaining: self.limit - entry.count,
        }
    }

    fn sweep(&self, now: Instant) {
        self.windows
            .retain(|_, w| now.saturating_duration_since(w.started) < self.window);
    }
}

/// Best-effort client address: first `X-Forwarded-For` entry, then
/// `X-Real-IP`, then the socket peer.
pub fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> IpAddr {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .and_then(|v| v.trim().parse().ok());
    let real = || {
        headers
            .get("x-real-ip")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse().ok())
    };
    forwarded
        .or_else(real)
        .or_else(|| peer.map(|p| p.ip()))
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
}

/// Middleware applying a [`RateLimiter`] to the wrapped routes.
pub async fn rate_limit(
    State(limiter): State<Arc<RateLimiter>>,
    request: Request,
    next: Next,
) -> Response {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let client = client_ip(request.headers(), peer);

    match limiter.check(client) {
        Decision::Allowed { remaining } => {
            let mut response = next.run(request).await;
            let headers = response.headers_mut();
            headers.insert("x-ratelimit-limit", HeaderValue::from(limiter.limit()));
            headers.insert("x-ratelimit-remaining", HeaderValue::from(remaining));
            response
        }
        Decision::Limited { retry_after } => {
            warn!(client = %client, path = %request.uri().path(), "rate limit exceeded");
            let mut response =
                ApiError::new(StatusCode::TOO_MANY_REQUESTS, "Rate limit exceeded").into_response();
            let retry_secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
            let headers = response.headers_mut();
            headers.insert("retry-after", HeaderValue::from(retry_secs));
            headers.insert("x-ratelimit-limit", HeaderValue::from(limiter.limit()));
            headers.insert("x-ratelimit-remaining", HeaderValue::from(0u32));
            response
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLIENT: IpAddr = IpAddr::V4(Ipv4Addr::new(203, 0, 113, 7));

    #[test]
    fn admits_up_to_limit_then_limits() {
        let limiter = RateLimiter::new(2, Duration::from_secs(60));
        let start = Instant::now();
        assert_eq!(
            limiter.check_at(CLIENT, start),
            Decision::Allowed { remaining: 1 }
        );
        assert_eq!(
            limiter.check_at(CLIENT, start),
            Decision::Allowed { remaining: 0 }
        );
        assert_eq!(
            limiter.check_at(CLIENT, start + Duration::from_secs(15)),
            Decision::Limited {
                retry_after: Duration::from_secs(45)
            }
        );
    }

    #[test]
    fn window_resets_after_expiry() {
        let limiter = RateLimiter::new(1, Duration::from_secs(10));
        let start = Instant::now();
        assert!(matches!(limiter.check_at(CLIENT, start), Decision::Allowed { .. }));
        assert!(matches!(limiter.check_at(CLIENT, start), Decision::Limited { .. }));
        assert!(matches!(
            limiter.check_at(CLIENT, start + Duration::from_secs(10)),
            Decision::Allowed { remaining: 0 }
        ));
    }

    #[test]
    fn clients_are_counted_separately() {
        let limiter = RateLimiter::new(1, Duration::from_secs(10));
        let now = Instant::now();
        let other = IpAddr::V4(Ipv4Addr::new(198, 51, 100, 1));
        assert!(matches!(limiter.check_at(CLIENT, now), Decision::Allowed { .. }));
        assert!(matches!(limiter.check_at(other, now), Decision::Allowed { .. }));
    }

    #[test]
    fn sweep_drops_expired_windows() {
        let limiter = RateLimiter::new(1, Duration::from_secs(10));
        let start = Instant::now();
        limiter.check_at(CLIENT, start);
        limiter.sweep(start + Duration::from_secs(11));
        assert!(limiter.windows.is_empty());
    }

    #[test]
    fn client_ip_prefers_forwarded_header() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("203.0.113.7, 10.0.0.1"));
        headers.insert("x-real-ip", HeaderValue::from_static("198.51.100.1"));
        assert_eq!(client_ip(&headers, None), CLIENT);

        headers.remove("x-forwarded-for");
        assert_eq!(client_ip(&headers, None).to_string(), "198.51.100.1");

        let peer: SocketAddr = "192.0.2.5:4000".parse().unwrap();
        assert_eq!(client_ip(&HeaderMap::new(), Some(peer)).to_string(), "192.0.2.5");
        assert_eq!(
            client_ip(&HeaderMap::new(), None),
            IpAddr::V4(Ipv4Addr::UNSPECIFIED)
        );
    }
}
