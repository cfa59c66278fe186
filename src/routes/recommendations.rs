use axum::{extract::State, http::HeaderMap, Extension, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    error::AppResult,
    middleware::request_id::RequestId,
    models::{PlaylistId, SkippedEntry, Track},
    routes::AppState,
    services::{
        auth::{ensure_fresh, Credentials},
        recommendations::{publish_recommendations, recommend_for_playlist},
    },
};

#[derive(Debug, Deserialize)]
pub struct RecommendationRequest {
    /// Playlist id, `spotify:playlist:` URI or open.spotify.com URL
    pub playlist: String,
    /// When set, the recommendations are also saved as a new playlist with this name
    #[serde(default)]
    pub publish_as: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub tracks: Vec<Track>,
    pub skipped: Vec<SkippedEntry>,
    pub published_playlist_id: Option<String>,
}

/// Handler for recommendations endpoint
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    headers: HeaderMap,
    Json(request): Json<RecommendationRequest>,
) -> AppResult<Json<RecommendationResponse>> {
    let playlist_id = PlaylistId::parse(&request.playlist)?;
    let credentials =
        ensure_fresh(state.token_provider.as_ref(), Credentials::from_headers(&headers)?).await?;

    tracing::info!(
        request_id = %request_id,
        playlist_id = %playlist_id,
        publish = request.publish_as.is_some(),
        "Processing recommendation request"
    );

    let result =
        recommend_for_playlist(state.provider.as_ref(), &credentials, &playlist_id).await?;

    let published_playlist_id = match request.publish_as.as_deref() {
        Some(name) => Some(
            publish_recommendations(
                state.provider.as_ref(),
                &credentials,
                &result,
                name,
                &state.playlist_description,
            )
            .await?,
        ),
        None => None,
    };

    tracing::info!(
        request_id = %request_id,
        recommended = result.tracks.len(),
        "Recommendation request completed"
    );

    Ok(Json(RecommendationResponse {
        tracks: result.tracks,
        skipped: result.skipped,
        published_playlist_id,
    }))
}
