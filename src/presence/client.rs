//! Outbound presence lookups.

use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::config::PresenceConfig;
use crate::observability::metrics;
use crate::presence::types::{AvatarTemplate, PresenceEnvelope, PresenceSnapshot};

/// Why a presence lookup produced no snapshot.
#[derive(Debug, Error)]
pub enum PresenceError {
    #[error("presence base URL cannot carry a user id")]
    InvalidUrl,

    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("upstream returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("could not decode upstream payload: {0}")]
    Decode(#[source] reqwest::Error),

    #[error("upstream payload has no data")]
    MissingData,
}

impl PresenceError {
    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            PresenceError::InvalidUrl => "invalid_url",
            PresenceError::Transport(_) => "transport",
            PresenceError::Status(_) => "status",
            PresenceError::Decode(_) => "decode",
            PresenceError::MissingData => "missing_data",
        }
    }
}

/// Client for the upstream presence API.
///
/// Cheap to clone; the inner `reqwest::Client` shares its connection pool.
#[derive(Clone)]
pub struct PresenceClient {
    http: reqwest::Client,
    base_url: Url,
    avatar: AvatarTemplate,
}

impl PresenceClient {
    /// Build a client from validated configuration.
    pub fn new(config: &PresenceConfig) -> Result<Self, PresenceError> {
        let base_url = Url::parse(&config.base_url).map_err(|_| PresenceError::InvalidUrl)?;
        if base_url.cannot_be_a_base() {
            return Err(PresenceError::InvalidUrl);
        }

        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build().map_err(PresenceError::Transport)?;

        Ok(Self {
            http,
            base_url,
            avatar: AvatarTemplate {
                base_url: config.avatar_base_url.clone(),
                size: config.avatar_size,
            },
        })
    }

    /// URL for a user; the id is encoded as a single path segment.
    pub fn user_url(&self, user_id: &str) -> Result<Url, PresenceError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| PresenceError::InvalidUrl)?
            .pop_if_empty()
            .push(user_id);
        Ok(url)
    }

    /// Fetch and reshape presence data for `user_id`. One request, no retries.
    pub async fn fetch(&self, user_id: &str) -> Result<PresenceSnapshot, PresenceError> {
        let result = self.fetch_inner(user_id).await;
        if let Err(e) = &result {
            tracing::error!(user_id = %user_id, kind = e.kind(), error = %e, "Error while getting user data");
            metrics::record_upstream_error(e.kind());
        }
        result
    }

    async fn fetch_inner(&self, user_id: &str) -> Result<PresenceSnapshot, PresenceError> {
        let url = self.user_url(user_id)?;
        tracing::debug!(url = %url, "Fetching presence");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(PresenceError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(PresenceError::Status(status));
        }

        let envelope: PresenceEnvelope = response.json().await.map_err(PresenceError::Decode)?;
        let data = envelope.data.ok_or(PresenceError::MissingData)?;

        Ok(data.into_snapshot(&self.avatar))
    }
}
