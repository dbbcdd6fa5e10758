//! Upstream payload types and the reshaped snapshot.

use serde::{Deserialize, Serialize};

/// Top-level upstream response. Only `data` is used.
#[derive(Debug, Clone, Deserialize)]
pub struct PresenceEnvelope {
    #[serde(default)]
    pub data: Option<PresenceData>,
}

/// Inner presence payload.
#[derive(Debug, Clone, Deserialize)]
pub struct PresenceData {
    pub discord_status: String,
    #[serde(default)]
    pub activities: Vec<UpstreamActivity>,
    #[serde(default)]
    pub spotify: Option<SpotifyField>,
    pub discord_user: DiscordUser,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamActivity {
    pub name: String,
    #[serde(default)]
    pub state: Option<String>,
}

/// `spotify` arrives as a single object or as a list.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SpotifyField {
    Many(Vec<SpotifyTrack>),
    One(SpotifyTrack),
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyTrack {
    #[serde(default)]
    pub album: Option<String>,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub song: Option<String>,
    #[serde(default)]
    pub album_art_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DiscordUser {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
}

/// Filtered view returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresenceSnapshot {
    pub status: String,
    pub activities: Vec<Activity>,
    pub spotify: Vec<SpotifyEntry>,
    #[serde(rename = "avatar")]
    pub avatar_url: Option<String>,
    pub username: String,
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Activity {
    pub name: String,
    pub state: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpotifyEntry {
    pub album: Option<String>,
    pub artist: Option<String>,
    pub song: Option<String>,
    #[serde(rename = "image")]
    pub image_url: Option<String>,
}

impl From<SpotifyTrack> for SpotifyEntry {
    fn from(track: SpotifyTrack) -> Self {
        Self {
            album: track.album,
            artist: track.artist,
            song: track.song,
            image_url: track.album_art_url,
        }
    }
}

/// Normalize the loose `spotify` field into an ordered list.
pub fn normalize_spotify(field: Option<SpotifyField>) -> Vec<SpotifyEntry> {
    match field {
        None => Vec::new(),
        Some(SpotifyField::One(track)) => vec![track.into()],
        Some(SpotifyField::Many(tracks)) => tracks.into_iter().map(Into::into).collect(),
    }
}

/// Avatar CDN settings used when building the snapshot.
#[derive(Debug, Clone)]
pub struct AvatarTemplate {
    pub base_url: String,
    pub size: u32,
}

impl AvatarTemplate {
    /// `{base}/{user_id}/{hash}.png?size={size}`, or `None` without a hash.
    pub fn render(&self, user: &DiscordUser) -> Option<String> {
        let hash = user.avatar.as_deref()?;
        Some(format!(
            "{}/{}/{}.png?size={}",
            self.base_url.trim_end_matches('/'),
            user.id,
            hash,
            self.size
        ))
    }
}

impl PresenceData {
    /// Reshape the upstream payload, dropping every field callers don't need.
    pub fn into_snapshot(self, avatar: &AvatarTemplate) -> PresenceSnapshot {
        let avatar_url = avatar.render(&self.discord_user);
        PresenceSnapshot {
            status: self.discord_status,
            activities: self
                .activities
                .into_iter()
                .map(|activity| Activity {
                    name: activity.name,
                    state: activity.state,
                })
                .collect(),
            spotify: normalize_spotify(self.spotify),
            avatar_url,
            username: self.discord_user.username,
            display_name: self.discord_user.display_name,
        }
    }
}
