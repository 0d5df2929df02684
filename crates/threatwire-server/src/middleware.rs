use std::{
    collections::VecDeque,
    sync::Arc,
    time::{Duration, Instant},
};

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderName, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use subtle::ConstantTimeEq;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::api::{ApiError, ErrorCode};

pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

const MAX_REQUEST_ID_LEN: usize = 128;

/// Correlation id for one request; handlers read it from request extensions.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

impl RequestId {
    /// Reuse a caller-supplied id when it is short printable ASCII,
    /// otherwise mint a fresh UUID.
    fn from_header(value: Option<&HeaderValue>) -> Self {
        let supplied = value
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|id| {
                !id.is_empty()
                    && id.len() <= MAX_REQUEST_ID_LEN
                    && id.bytes().all(|b| b.is_ascii_graphic())
            });
        match supplied {
            Some(id) => Self(id.to_owned()),
            None => Self(Uuid::new_v4().to_string()),
        }
    }
}

fn request_id_of(req: &Request) -> RequestId {
    req.extensions()
        .get::<RequestId>()
        .cloned()
        .unwrap_or_else(|| RequestId::from_header(None))
}

/// Bearer tokens accepted on the operator routes.
#[derive(Debug, Clone)]
pub struct AuthState {
    tokens: Arc<[String]>,
    pub enabled: bool,
}

impl AuthState {
    /// Outside development an empty key list is a startup error; in
    /// development it turns bearer auth off.
    pub fn from_keys(keys: &[String], is_development: bool) -> anyhow::Result<Self> {
        let tokens: Vec<String> = keys
            .iter()
            .map(|k| k.trim().to_owned())
            .filter(|k| !k.is_empty())
            .collect();

        let enabled = !tokens.is_empty();
        if !enabled {
            if !is_development {
                anyhow::bail!(
                    "THREATWIRE_API_KEYS must list at least one bearer token outside development"
                );
            }
            tracing::warn!("no THREATWIRE_API_KEYS configured; operator routes are unauthenticated");
        }

        Ok(Self {
            tokens: tokens.into(),
            enabled,
        })
    }

    // Compares against every token so timing does not reveal which one matched.
    fn allows(&self, presented: &str) -> bool {
        self.tokens.iter().fold(false, |hit, token| {
            hit | bool::from(token.as_bytes().ct_eq(presented.as_bytes()))
        })
    }
}

/// Sliding-log limiter shared by all operator routes.
#[derive(Debug, Clone)]
pub struct RateLimitState {
    limit: usize,
    period: Duration,
    hits: Arc<Mutex<VecDeque<Instant>>>,
}

impl RateLimitState {
    #[must_use]
    pub fn new(limit: usize, period: Duration) -> Self {
        Self {
            limit,
            period,
            hits: Arc::new(Mutex::new(VecDeque::with_capacity(limit))),
        }
    }

    /// Records a hit at `now` unless `limit` hits already fall inside the
    /// trailing `period`.
    async fn admit(&self, now: Instant) -> bool {
        let mut hits = self.hits.lock().await;
        while hits
            .front()
            .is_some_and(|&at| now.saturating_duration_since(at) >= self.period)
        {
            hits.pop_front();
        }
        if hits.len() >= self.limit {
            return false;
        }
        hits.push_back(now);
        true
    }
}

/// Attach a [`RequestId`] to the request and echo it on the response.
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = RequestId::from_header(req.headers().get(&REQUEST_ID_HEADER));
    let echoed = HeaderValue::from_str(&id.0).ok();
    req.extensions_mut().insert(id);

    let mut res = next.run(req).await;
    if let Some(value) = echoed {
        res.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    res
}

pub async fn require_bearer_auth(
    State(auth): State<AuthState>,
    req: Request,
    next: Next,
) -> Response {
    let authorized = !auth.enabled
        || bearer_token(req.headers().get(AUTHORIZATION)).is_some_and(|t| auth.allows(t));
    if authorized {
        return next.run(req).await;
    }

    tracing::warn!(path = %req.uri().path(), "rejected operator request without valid token");
    ApiError::new(
        &request_id_of(&req),
        ErrorCode::Unauthorized,
        "missing or invalid bearer token",
    )
    .into_response()
}

pub async fn enforce_rate_limit(
    State(limiter): State<RateLimitState>,
    req: Request,
    next: Next,
) -> Response {
    if limiter.admit(Instant::now()).await {
        return next.run(req).await;
    }

    ApiError::new(
        &request_id_of(&req),
        ErrorCode::RateLimited,
        format!(
            "at most {} operator requests per {}s",
            limiter.limit,
            limiter.period.as_secs()
        ),
    )
    .into_response()
}

fn bearer_token(value: Option<&HeaderValue>) -> Option<&str> {
    let token = value?.to_str().ok()?.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then_some(token)
}
