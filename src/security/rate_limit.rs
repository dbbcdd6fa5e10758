//! Access gate: allow-listed IP bypass plus fixed-window rate limiting.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{HeaderMap, Request, StatusCode},
    middleware::Next,
    response::Response,
};
use dashmap::DashMap;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::config::AccessConfig;
use crate::observability::metrics;

const X_FORWARDED_FOR: &str = "x-forwarded-for";

/// Request count for one caller within the current window.
#[derive(Debug, Clone, Copy)]
struct Window {
    count: u32,
    started: Instant,
}

/// Fixed-window limiter shared by every request in the process.
///
/// Each key is updated under its `DashMap` shard lock, so concurrent
/// requests from one caller never lose increments.
#[derive(Debug)]
pub struct FixedWindowLimiter {
    windows: DashMap<String, Window>,
    max_requests: u32,
    window: Duration,
}

impl FixedWindowLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            windows: DashMap::new(),
            max_requests,
            window,
        }
    }

    /// Count one request for `key`. Returns false once the window is full.
    pub fn check(&self, key: &str) -> bool {
        self.check_at(key, Instant::now())
    }

    pub fn check_at(&self, key: &str, now: Instant) -> bool {
        let mut entry = self
            .windows
            .entry(key.to_string())
            .or_insert_with(|| Window { count: 0, started: now });

        if now.duration_since(entry.started) >= self.window {
            entry.count = 0;
            entry.started = now;
        }

        if entry.count < self.max_requests {
            entry.count += 1;
            true
        } else {
            false
        }
    }

    /// Drop windows that have expired. Returns how many were removed.
    pub fn purge_expired(&self, now: Instant) -> usize {
        let before = self.windows.len();
        self.windows
            .retain(|_, w| now.duration_since(w.started) < self.window);
        before.saturating_sub(self.windows.len())
    }

    pub fn tracked_keys(&self) -> usize {
        self.windows.len()
    }

    pub fn window(&self) -> Duration {
        self.window
    }
}

/// Outcome of the gate for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    /// Caller is the allow-listed IP; the limiter is not consulted.
    Bypass,
    Allowed,
    Limited,
}

/// Per-request bypass-or-limit decision, built once at startup.
#[derive(Debug)]
pub struct AccessGate {
    allowed_ip: String,
    limiter: FixedWindowLimiter,
    message: String,
}

impl AccessGate {
    pub fn from_config(config: &AccessConfig) -> Self {
        Self {
            allowed_ip: config.allowed_ip.clone(),
            limiter: FixedWindowLimiter::new(
                config.max_requests,
                Duration::from_secs(config.window_secs),
            ),
            message: config.message.clone(),
        }
    }

    pub fn decide(&self, caller_ip: &str) -> AccessDecision {
        if caller_ip == self.allowed_ip {
            AccessDecision::Bypass
        } else if self.limiter.check(caller_ip) {
            AccessDecision::Allowed
        } else {
            AccessDecision::Limited
        }
    }

    pub fn limiter(&self) -> &FixedWindowLimiter {
        &self.limiter
    }

    /// Periodically evict expired windows until shutdown.
    pub fn spawn_purge_task(self: Arc<Self>, mut shutdown: broadcast::Receiver<()>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.limiter.window());
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let removed = self.limiter.purge_expired(Instant::now());
                        if removed > 0 {
                            tracing::debug!(removed, remaining = self.limiter.tracked_keys(), "Purged rate limit windows");
                        }
                    }
                    _ = shutdown.recv() => break,
                }
            }
        })
    }
}

/// Caller key: the whole trimmed `X-Forwarded-For` value if present, else
/// the peer address. A proxy chain is not split, so it never matches the
/// allow-listed IP.
pub fn caller_ip(headers: &HeaderMap, peer: SocketAddr) -> String {
    headers
        .get(X_FORWARDED_FOR)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| peer.ip().to_string())
}

/// Middleware applying the access gate.
pub async fn access_gate_middleware(
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    State(gate): State<Arc<AccessGate>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let ip = caller_ip(request.headers(), addr);

    match gate.decide(&ip) {
        AccessDecision::Bypass | AccessDecision::Allowed => next.run(request).await,
        AccessDecision::Limited => {
            tracing::warn!(client = %ip, "Rate limit exceeded");
            metrics::record_rate_limited();
            let mut response = Response::new(Body::from(gate.message.clone()));
            *response.status_mut() = StatusCode::TOO_MANY_REQUESTS;
            response
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::connect_info::MockConnectInfo, middleware, routing::get, Router};
    use tower::ServiceExt;

    fn gate() -> AccessGate {
        AccessGate::from_config(&AccessConfig::default())
    }

    #[test]
    fn test_sixth_request_is_rejected() {
        let limiter = FixedWindowLimiter::new(5, Duration::from_secs(60));
        let now = Instant::now();
        for _ in 0..5 {
            assert!(limiter.check_at("203.0.113.7", now));
        }
        assert!(!limiter.check_at("203.0.113.7", now + Duration::from_secs(59)));
        // Other callers have their own window
        assert!(limiter.check_at("198.51.100.1", now));
    }

    #[test]
    fn test_window_resets() {
        let limiter = FixedWindowLimiter::new(5, Duration::from_secs(60));
        let now = Instant::now();
        for _ in 0..6 {
            limiter.check_at("a", now);
        }
        assert!(!limiter.check_at("a", now + Duration::from_secs(30)));
        assert!(limiter.check_at("a", now + Duration::from_secs(60)));
    }

    #[test]
    fn test_purge_expired() {
        let limiter = FixedWindowLimiter::new(5, Duration::from_secs(60));
        let now = Instant::now();
        limiter.check_at("old", now);
        limiter.check_at("new", now + Duration::from_secs(50));

        assert_eq!(limiter.purge_expired(now + Duration::from_secs(70)), 1);
        assert_eq!(limiter.tracked_keys(), 1);
    }

    #[test]
    fn test_concurrent_updates_are_not_lost() {
        let limiter = Arc::new(FixedWindowLimiter::new(5, Duration::from_secs(60)));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let limiter = limiter.clone();
                std::thread::spawn(move || (0..10).filter(|_| limiter.check("same-caller")).count())
            })
            .collect();

        let admitted: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(admitted, 5);
    }

    #[test]
    fn test_allow_listed_ip_is_never_limited() {
        let gate = gate();
        for _ in 0..1000 {
            assert_eq!(gate.decide("127.0.0.1"), AccessDecision::Bypass);
        }
        assert_eq!(gate.limiter().tracked_keys(), 0);
    }

    #[test]
    fn test_forwarded_chain_starting_with_allow_listed_ip_is_limited() {
        let gate = gate();
        let peer: SocketAddr = "10.1.2.3:5000".parse().unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(X_FORWARDED_FOR, "127.0.0.1, 203.0.113.7".parse().unwrap());

        let ip = caller_ip(&headers, peer);
        let decisions: Vec<_> = (0..6).map(|_| gate.decide(&ip)).collect();
        assert!(!decisions.contains(&AccessDecision::Bypass));
        assert_eq!(decisions[5], AccessDecision::Limited);
    }

    #[test]
    fn test_caller_ip_prefers_forwarded_for() {
        let peer: SocketAddr = "10.1.2.3:5000".parse().unwrap();
        let mut headers = HeaderMap::new();
        assert_eq!(caller_ip(&headers, peer), "10.1.2.3");

        headers.insert(X_FORWARDED_FOR, " 203.0.113.7 ".parse().unwrap());
        assert_eq!(caller_ip(&headers, peer), "203.0.113.7");

        headers.insert(X_FORWARDED_FOR, "203.0.113.7, 10.0.0.1".parse().unwrap());
        assert_eq!(caller_ip(&headers, peer), "203.0.113.7, 10.0.0.1");

        headers.insert(X_FORWARDED_FOR, " ".parse().unwrap());
        assert_eq!(caller_ip(&headers, peer), "10.1.2.3");
    }

    fn app(peer: SocketAddr) -> Router {
        let gate = Arc::new(gate());
        Router::new()
            .route("/", get(|| async { "ok" }))
            .layer(middleware::from_fn_with_state(gate, access_gate_middleware))
            .layer(MockConnectInfo(peer))
    }

    #[tokio::test]
    async fn test_middleware_rejects_with_fixed_message() {
        let app = app("192.0.2.10:4000".parse().unwrap());

        for _ in 0..5 {
            let res = app.clone().oneshot(Request::get("/").body(Body::empty()).unwrap()).await.unwrap();
            assert_eq!(res.status(), StatusCode::OK);
        }

        let res = app.oneshot(Request::get("/").body(Body::empty()).unwrap()).await.unwrap();
        assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);
        let body = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"rate limited");
    }

    #[tokio::test]
    async fn test_middleware_bypasses_allow_listed_peer() {
        let app = app("127.0.0.1:4000".parse().unwrap());
        for _ in 0..20 {
            let res = app.clone().oneshot(Request::get("/").body(Body::empty()).unwrap()).await.unwrap();
            assert_eq!(res.status(), StatusCode::OK);
        }
    }
}
