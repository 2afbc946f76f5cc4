//! Per-client request rate limiting.
//!
//! Sliding-window counters keyed by client address. Each client may make
//! `limit` requests in any 60-second window.

use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::warn;

use crate::error::ApiError;
use crate::state::AppState;

const WINDOW: Duration = Duration::from_secs(60);

/// Clients tracked before idle entries are swept.
const SWEEP_THRESHOLD: usize = 10_000;

#[derive(Clone)]
pub struct RateLimiter {
    limit: usize,
    window: Duration,
    requests: Arc<Mutex<HashMap<String, VecDeque<Instant>>>>,
}

impl RateLimiter {
    /// `limit` requests per minute per client; 0 disables limiting.
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            window: WINDOW,
            requests: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.limit > 0
    }

    /// Records a request from `client`. Returns false if it is over the limit.
    pub fn check(&self, client: &str) -> bool {
        self.check_at(client, Instant::now())
    }

    fn check_at(&self, client: &str, now: Instant) -> bool {
        if !self.is_enabled() {
            return true;
        }
        let mut requests = self.requests.lock().unwrap_or_else(PoisonError::into_inner);

        if requests.len() > SWEEP_THRESHOLD {
            requests.retain(|_, deque| {
                prune_window(deque, now, self.window);
                !deque.is_empty()
            });
        }

        let deque = requests.entry(client.to_string()).or_default();
        prune_window(deque, now, self.window);
        if deque.len() >= self.limit {
            return false;
        }
        deque.push_back(now);
        true
    }
}

fn prune_window(deque: &mut VecDeque<Instant>, now: Instant, window: Duration) {
    while let Some(&front) = deque.front() {
        if now.duration_since(front) >= window {
            deque.pop_front();
        } else {
            break;
        }
    }
}

/// Client key: socket address, then the first `x-forwarded-for` hop, then "unknown".
pub fn client_key(req: &Request) -> String {
    if let Some(ConnectInfo(addr)) = req.extensions().get::<ConnectInfo<SocketAddr>>() {
        return addr.ip().to_string();
    }
    req.headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
        .unwrap_or_else(|| "unknown".to_string())
}

/// Middleware rejecting clients over the limit with 429.
pub async fn enforce(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let client = client_key(&req);
    if !state.rate_limiter.check(&client) {
        warn!(client = %client, path = %req.uri().path(), "Rate limit exceeded");
        return ApiError::RateLimited.into_response();
    }
    next.run(req).await
}
