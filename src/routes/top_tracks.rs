use axum::{extract::State, http::HeaderMap, Json};
use std::sync::Arc;

use crate::{
    error::AppResult,
    models::TopTrack,
    routes::AppState,
    services::{
        auth::{ensure_fresh, Credentials},
        top_tracks::get_top_tracks,
    },
};

/// Handler for the current user's top tracks
pub async fn top_tracks(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> AppResult<Json<Vec<TopTrack>>> {
    let credentials =
        ensure_fresh(state.token_provider.as_ref(), Credentials::from_headers(&headers)?).await?;
    let tracks = get_top_tracks(state.provider.as_ref(), &credentials).await?;
    Ok(Json(tracks))
}
