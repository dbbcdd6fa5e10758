//! Configuration validation.
//!
//! Serde handles syntax; this module checks values. All errors are collected
//! so a bad file is reported in one go.

use std::net::{IpAddr, SocketAddr};

use axum::http::HeaderValue;
use thiserror::Error;
use url::Url;

use crate::config::schema::ServiceConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("access.allowed_ip `{0}` is not an IP address")]
    AllowedIp(String),

    #[error("access.max_requests must be greater than zero")]
    ZeroMaxRequests,

    #[error("access.window_secs must be greater than zero")]
    ZeroWindow,

    #[error("cors origin `{0}` is not a valid header value")]
    CorsOrigin(String),

    #[error("{field} `{value}` is not a usable base URL")]
    BaseUrl { field: &'static str, value: String },

    #[error("presence.avatar_size must be greater than zero")]
    ZeroAvatarSize,

    #[error("observability.metrics_address `{0}` is not a socket address")]
    MetricsAddress(String),
}

/// Validate a configuration, returning every problem found.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.access.allowed_ip.parse::<IpAddr>().is_err() {
        errors.push(ValidationError::AllowedIp(config.access.allowed_ip.clone()));
    }
    if config.access.max_requests == 0 {
        errors.push(ValidationError::ZeroMaxRequests);
    }
    if config.access.window_secs == 0 {
        errors.push(ValidationError::ZeroWindow);
    }

    for origin in &config.cors.allowed_origins {
        // tower-http refuses a wildcard inside an explicit list
        if origin == "*" || HeaderValue::from_str(origin).is_err() {
            errors.push(ValidationError::CorsOrigin(origin.clone()));
        }
    }

    for (field, value) in [
        ("presence.base_url", &config.presence.base_url),
        ("presence.avatar_base_url", &config.presence.avatar_base_url),
    ] {
        let usable = Url::parse(value)
            .map(|url| !url.cannot_be_a_base())
            .unwrap_or(false);
        if !usable {
            errors.push(ValidationError::BaseUrl {
                field,
                value: value.clone(),
            });
        }
    }
    if config.presence.avatar_size == 0 {
        errors.push(ValidationError::ZeroAvatarSize);
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
