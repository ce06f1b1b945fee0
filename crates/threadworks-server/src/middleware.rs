use axum::extract::{Extension, Request, State};
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use subtle::ConstantTimeEq;
use threadworks_core::ConfigError;
use uuid::Uuid;

use crate::api::ApiError;

/// Newtype wrapping a request ID string, stored as a request extension.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Axum middleware that extracts or generates a request ID.
///
/// If the incoming request has an `x-request-id` header, that value is used.
/// Otherwise a new `UUIDv4` is generated. The ID is:
/// - Inserted into request extensions as [`RequestId`]
/// - Set on the response as the `x-request-id` header
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    req.extensions_mut().insert(RequestId(id.clone()));

    let mut res = next.run(req).await;

    if let Ok(val) = HeaderValue::from_str(&id) {
        res.headers_mut().insert("x-request-id", val);
    }

    res
}

/// Bearer-token auth state: an optional expected SHA-256(salt || key) hash
/// to compare incoming tokens against in constant time. `None` means
/// anonymous access is permitted (development only).
#[derive(Clone)]
pub struct AuthState {
    salt: String,
    expected_hash: Option<[u8; 32]>,
}

impl AuthState {
    fn hash_key(salt: &str, key: &str) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(salt.as_bytes());
        hasher.update(key.as_bytes());
        hasher.into()
    }

    /// Build auth state from `THREADWORKS_API_KEY` and the config's
    /// `api_key_hash_salt`. If no API key is configured and
    /// `allow_anonymous` is true (development), every request is admitted
    /// unauthenticated. Otherwise a missing API key is a config error.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] if `THREADWORKS_API_KEY` is
    /// unset and `allow_anonymous` is false.
    pub fn from_config(
        config: &threadworks_core::AppConfig,
        allow_anonymous: bool,
    ) -> Result<Self, ConfigError> {
        let salt = config.api_key_hash_salt.clone().unwrap_or_else(|| "threadworks".to_string());
        match std::env::var("THREADWORKS_API_KEY") {
            Ok(key) => Ok(Self { expected_hash: Some(Self::hash_key(&salt, &key)), salt }),
            Err(_) if allow_anonymous => Ok(Self { expected_hash: None, salt }),
            Err(_) => Err(ConfigError::MissingEnvVar("THREADWORKS_API_KEY".to_string())),
        }
    }

    fn accepts(&self, token: &str) -> bool {
        match self.expected_hash {
            None => true,
            Some(expected) => {
                let actual = Self::hash_key(&self.salt, token);
                actual.ct_eq(&expected).into()
            }
        }
    }
}

/// Require a valid `Authorization: Bearer <token>` header unless the
/// server is running anonymous (`AuthState::expected_hash` is `None`).
pub async fn require_bearer_auth(
    State(auth): State<AuthState>,
    Extension(req_id): Extension<RequestId>,
    req: Request,
    next: Next,
) -> Response {
    if auth.expected_hash.is_none() {
        return next.run(req).await;
    }

    let token = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    match token {
        Some(token) if auth.accepts(token) => next.run(req).await,
        _ => {
            ApiError::new(req_id.0, "unauthorized", "missing or invalid bearer token")
                .into_response()
        }
    }
}

/// Fixed-window rate limiter keyed by client IP (spec: out of scope for
/// the core search/facet logic, but every exposed HTTP surface needs one
/// the way the teacher's API does).
#[derive(Clone)]
pub struct RateLimitState {
    max_requests: u32,
    window: Duration,
    windows: std::sync::Arc<Mutex<HashMap<String, (Instant, u32)>>>,
}

impl RateLimitState {
    #[must_use]
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self { max_requests, window, windows: std::sync::Arc::new(Mutex::new(HashMap::new())) }
    }

    fn check(&self, client_key: &str) -> bool {
        let now = Instant::now();
        let mut windows = self.windows.lock().expect("rate limit lock poisoned");
        match windows.get_mut(client_key) {
            Some((started, count)) if now.duration_since(*started) < self.window => {
                *count += 1;
                *count <= self.max_requests
            }
            _ => {
                windows.insert(client_key.to_string(), (now, 1));
                true
            }
        }
    }
}

/// Rejects requests once a client exceeds `max_requests` within `window`.
/// Client identity is the `x-request-id`-adjacent `x-forwarded-for` header
/// when present, else a constant bucket (single-client deployments/tests).
pub async fn enforce_rate_limit(
    State(rate_limit): State<RateLimitState>,
    Extension(req_id): Extension<RequestId>,
    req: Request,
    next: Next,
) -> Response {
    let client_key = req
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    if rate_limit.check(&client_key) {
        next.run(req).await
    } else {
        ApiError::new(req_id.0, "rate_limited", "too many requests").into_response()
    }
}
