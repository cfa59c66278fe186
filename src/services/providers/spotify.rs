//! Spotify Web API provider
//!
//! Thin reqwest wrapper over the endpoints the recommendation pipeline needs.
//! Payloads are returned close to their wire shape; turning them into tracks
//! and feature tables happens in `services::features`.

use reqwest::{Client as HttpClient, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::{
    error::{AppError, AppResult},
    models::{
        spotify::{ApiAudioFeatures, ApiCreatedPlaylist},
        ApiPlaylist, ApiRecommendations, ApiTopTracks, ApiUser, FeatureRecord, PlaylistId,
    },
    services::{auth::Credentials, providers::MusicProvider},
};

/// Most ids the audio-features endpoint accepts per request
const AUDIO_FEATURES_PAGE: usize = 100;

#[derive(Clone)]
pub struct SpotifyProvider {
    http_client: HttpClient,
    api_url: String,
}

impl SpotifyProvider {
    pub fn new(api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_url,
        }
    }

    fn get(&self, credentials: &Credentials, path: &str) -> RequestBuilder {
        self.http_client
            .get(format!("{}{}", self.api_url, path))
            .bearer_auth(&credentials.access_token)
    }

    fn post(&self, credentials: &Credentials, path: &str) -> RequestBuilder {
        self.http_client
            .post(format!("{}{}", self.api_url, path))
            .bearer_auth(&credentials.access_token)
    }
}

/// Maps a non-success status to the matching error kind
fn status_error(status: StatusCode, body: &str) -> AppError {
    match status {
        StatusCode::UNAUTHORIZED => AppError::Auth(format!(
            "Spotify rejected the access token: {}",
            body
        )),
        StatusCode::NOT_FOUND => AppError::NotFound(format!("Spotify resource not found: {}", body)),
        _ => AppError::ExternalApi(format!("Spotify API returned status {}: {}", status, body)),
    }
}

async fn read_json<T: DeserializeOwned>(response: Response, endpoint: &str) -> AppResult<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        tracing::error!(
            endpoint = %endpoint,
            status = %status,
            body = %body,
            "Spotify API request failed"
        );
        return Err(status_error(status, &body));
    }

    Ok(response.json().await?)
}

#[async_trait::async_trait]
impl MusicProvider for SpotifyProvider {
    async fn fetch_playlist_tracks(
        &self,
        credentials: &Credentials,
        playlist_id: &PlaylistId,
    ) -> AppResult<ApiPlaylist> {
        let response = self
            .get(credentials, &format!("/playlists/{}", playlist_id))
            .send()
            .await?;
        let playlist: ApiPlaylist = read_json(response, "playlists").await?;

        tracing::info!(
            playlist_id = %playlist_id,
            items = playlist.tracks.items.len(),
            provider = self.name(),
            "Playlist fetched"
        );

        Ok(playlist)
    }

    async fn fetch_audio_features(
        &self,
        credentials: &Credentials,
        track_ids: &[String],
    ) -> AppResult<Vec<Option<FeatureRecord>>> {
        let mut records = Vec::with_capacity(track_ids.len());

        for page in track_ids.chunks(AUDIO_FEATURES_PAGE) {
            let response = self
                .get(credentials, "/audio-features")
                .query(&[("ids", page.join(","))])
                .send()
                .await?;
            let body: ApiAudioFeatures = read_json(response, "audio-features").await?;

            if body.audio_features.len() != page.len() {
                return Err(AppError::ExternalApi(format!(
                    "audio-features returned {} entries for {} ids",
                    body.audio_features.len(),
                    page.len()
                )));
            }
            records.extend(body.audio_features);
        }

        tracing::debug!(
            requested = track_ids.len(),
            available = records.iter().filter(|r| r.is_some()).count(),
            provider = self.name(),
            "Audio features fetched"
        );

        Ok(records)
    }

    async fn fetch_recommendations_for_seeds(
        &self,
        credentials: &Credentials,
        seed_ids: &[String],
        limit: u32,
    ) -> AppResult<ApiRecommendations> {
        let response = self
            .get(credentials, "/recommendations")
            .query(&[
                ("seed_tracks", seed_ids.join(",")),
                ("limit", limit.to_string()),
            ])
            .send()
            .await?;

        read_json(response, "recommendations").await
    }

    async fn create_playlist(
        &self,
        credentials: &Credentials,
        user_id: &str,
        name: &str,
        description: &str,
    ) -> AppResult<String> {
        let response = self
            .post(credentials, &format!("/users/{}/playlists", user_id))
            .json(&json!({
                "name": name,
                "description": description,
                "public": true,
            }))
            .send()
            .await?;
        let created: ApiCreatedPlaylist = read_json(response, "create-playlist").await?;

        tracing::info!(
            playlist_id = %created.id,
            user_id = %user_id,
            provider = self.name(),
            "Playlist created"
        );

        Ok(created.id)
    }

    async fn add_tracks_to_playlist(
        &self,
        credentials: &Credentials,
        playlist_id: &str,
        track_uris: &[String],
    ) -> AppResult<()> {
        let response = self
            .post(credentials, &format!("/playlists/{}/tracks", playlist_id))
            .json(&json!({ "uris": track_uris }))
            .send()
            .await?;
        let _: serde_json::Value = read_json(response, "add-tracks").await?;

        Ok(())
    }

    async fn get_current_user(&self, credentials: &Credentials) -> AppResult<ApiUser> {
        let response = self.get(credentials, "/me").send().await?;
        read_json(response, "me").await
    }

    async fn fetch_top_tracks(
        &self,
        credentials: &Credentials,
        time_range: &str,
        limit: u32,
    ) -> AppResult<ApiTopTracks> {
        let response = self
            .get(credentials, "/me/top/tracks")
            .query(&[("time_range", time_range.to_string()), ("limit", limit.to_string())])
            .send()
            .await?;

        read_json(response, "top-tracks").await
    }

    fn name(&self) -> &'static str {
        "spotify"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_unauthorized_is_auth() {
        let error = status_error(StatusCode::UNAUTHORIZED, "The access token expired");
        assert!(matches!(error, AppError::Auth(_)));
        assert!(error.to_string().contains("expired"));
    }

    #[test]
    fn test_status_error_not_found() {
        let error = status_error(StatusCode::NOT_FOUND, "Invalid playlist Id");
        assert!(matches!(error, AppError::NotFound(_)));
    }

    #[test]
    fn test_status_error_other_is_external() {
        for status in [
            StatusCode::TOO_MANY_REQUESTS,
            StatusCode::INTERNAL_SERVER_ERROR,
            StatusCode::BAD_GATEWAY,
        ] {
            assert!(matches!(status_error(status, ""), AppError::ExternalApi(_)));
        }
    }

    #[test]
    fn test_requests_carry_bearer_token() {
        let provider = SpotifyProvider::new("http://test.local/v1".to_string());
        let request = provider
            .get(&Credentials::bearer("tok"), "/me")
            .build()
            .unwrap();

        assert_eq!(request.url().as_str(), "http://test.local/v1/me");
        assert_eq!(
            request.headers().get("authorization").unwrap(),
            "Bearer tok"
        );
    }
}
