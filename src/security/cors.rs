//! CORS origin allow-list.
//!
//! Requests without an `Origin` header pass untouched. Requests from an
//! allow-listed origin get the usual CORS response headers from
//! `tower_http::cors`. Anything else is refused before reaching a handler.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, Method, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::config::CorsConfig;

/// Exact-match origin allow-list.
#[derive(Debug, Clone)]
pub struct OriginPolicy {
    allowed: Vec<HeaderValue>,
}

impl OriginPolicy {
    pub fn from_config(config: &CorsConfig) -> Self {
        let allowed = config
            .allowed_origins
            .iter()
            .filter_map(|origin| HeaderValue::from_str(origin).ok())
            .collect();
        Self { allowed }
    }

    /// True when the origin is absent or listed.
    pub fn permits(&self, origin: Option<&HeaderValue>) -> bool {
        match origin {
            None => true,
            Some(origin) => self.allowed.iter().any(|allowed| allowed == origin),
        }
    }

    /// Layer adding `access-control-*` headers for listed origins.
    pub fn cors_layer(&self) -> CorsLayer {
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(self.allowed.clone()))
            .allow_methods([Method::GET])
    }
}

/// Middleware rejecting browser requests from unlisted origins.
pub async fn origin_guard_middleware(
    State(policy): State<Arc<OriginPolicy>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let origin = request.headers().get(header::ORIGIN);
    if policy.permits(origin) {
        return next.run(request).await;
    }

    tracing::warn!(origin = ?origin, "Origin not allowed");
    (StatusCode::FORBIDDEN, Json(json!({ "error": "not allowed" }))).into_response()
}
