//! Spotify Web API payload types.
//!
//! Track lists are kept as raw JSON values so that one malformed entry can be
//! skipped without rejecting the whole payload.

use serde::Deserialize;
use serde_json::Value;

/// Raw audio-feature object from `GET /audio-features`
pub type FeatureRecord = serde_json::Map<String, Value>;

/// Response from `GET /playlists/{id}`
#[derive(Debug, Clone, Deserialize)]
pub struct ApiPlaylist {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    pub tracks: ApiPlaylistTracks,
}

/// First page of a playlist's track listing
#[derive(Debug, Clone, Deserialize)]
pub struct ApiPlaylistTracks {
    /// Each item wraps its track as `{"track": {...}}`; the track may be null
    #[serde(default)]
    pub items: Vec<Value>,
}

/// Response from `GET /recommendations`
#[derive(Debug, Clone, Deserialize)]
pub struct ApiRecommendations {
    #[serde(default)]
    pub tracks: Vec<Value>,
}

/// Response from `GET /me/top/tracks`
#[derive(Debug, Clone, Deserialize)]
pub struct ApiTopTracks {
    #[serde(default)]
    pub items: Vec<Value>,
}

/// Response from `GET /me`
#[derive(Debug, Clone, Deserialize)]
pub struct ApiUser {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Full track object, as nested in every listing above
#[derive(Debug, Clone, Deserialize)]
pub struct ApiTrack {
    pub id: String,
    pub name: String,
    pub artists: Vec<ApiArtist>,
    pub album: ApiAlbum,
    pub duration_ms: u64,
    pub popularity: u8,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiArtist {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiAlbum {
    pub name: String,
}

/// Response from `GET /audio-features?ids=...`
#[derive(Debug, Deserialize)]
pub struct ApiAudioFeatures {
    pub audio_features: Vec<Option<FeatureRecord>>,
}

/// Response from `POST /users/{user_id}/playlists`
#[derive(Debug, Deserialize)]
pub struct ApiCreatedPlaylist {
    pub id: String,
}
