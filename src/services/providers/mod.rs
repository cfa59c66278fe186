//! Music streaming provider abstraction
//!
//! The recommendation pipeline only talks to the streaming service through
//! this trait, so the HTTP client can be swapped for a stub in tests.

use crate::{
    error::AppResult,
    models::{ApiPlaylist, ApiRecommendations, ApiTopTracks, ApiUser, FeatureRecord, PlaylistId},
    services::auth::Credentials,
};

pub mod spotify;

pub use spotify::SpotifyProvider;

/// Trait for music streaming providers
///
/// Every call carries the caller's credentials explicitly. Implementations
/// surface an expired or rejected token as `AppError::Auth` and never retry.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MusicProvider: Send + Sync {
    /// Fetch a playlist with its (first page of) track entries
    async fn fetch_playlist_tracks(
        &self,
        credentials: &Credentials,
        playlist_id: &PlaylistId,
    ) -> AppResult<ApiPlaylist>;

    /// Fetch audio features for `track_ids`
    ///
    /// The result has one slot per requested id, in request order. A slot is
    /// `None` when the service has no analysis for that track.
    async fn fetch_audio_features(
        &self,
        credentials: &Credentials,
        track_ids: &[String],
    ) -> AppResult<Vec<Option<FeatureRecord>>>;

    /// Fetch up to `limit` recommended tracks seeded on `seed_ids` (at most 5)
    async fn fetch_recommendations_for_seeds(
        &self,
        credentials: &Credentials,
        seed_ids: &[String],
        limit: u32,
    ) -> AppResult<ApiRecommendations>;

    /// Create a playlist owned by `user_id`, returning its id
    async fn create_playlist(
        &self,
        credentials: &Credentials,
        user_id: &str,
        name: &str,
        description: &str,
    ) -> AppResult<String>;

    /// Append tracks, given as `spotify:track:<id>` URIs, in one call
    async fn add_tracks_to_playlist(
        &self,
        credentials: &Credentials,
        playlist_id: &str,
        track_uris: &[String],
    ) -> AppResult<()>;

    /// The user the credentials belong to
    async fn get_current_user(&self, credentials: &Credentials) -> AppResult<ApiUser>;

    /// The user's most played tracks over `time_range`
    async fn fetch_top_tracks(
        &self,
        credentials: &Credentials,
        time_range: &str,
        limit: u32,
    ) -> AppResult<ApiTopTracks>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
