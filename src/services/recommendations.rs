use std::time::Instant;

use crate::{
    error::{AppError, AppResult},
    models::{EntryStage, PlaylistId, RecommendationResult, SkippedEntry, Track, TrackFeatureTable},
    services::{
        auth::Credentials,
        features::{build_feature_table, extract_playlist_tracks, extract_tracks},
        providers::MusicProvider,
        scoring::{cosine_similarity, min_max_scale},
        selector::select_recommendations,
    },
};

/// Seed tracks sent per recommendations request
pub const SEED_BATCH_SIZE: usize = 5;
/// Recommended tracks requested per seed batch
pub const RECOMMENDATIONS_PER_BATCH: u32 = 25;

/// Splits seed ids into full batches of [`SEED_BATCH_SIZE`].
///
/// Trailing seeds that do not fill a batch are never sent: 7 seeds give one
/// batch (ids 0-4), 4 seeds give none.
pub fn seed_batches(seed_ids: &[String]) -> Vec<&[String]> {
    seed_ids.chunks_exact(SEED_BATCH_SIZE).collect()
}

/// Recommends tracks that sound like the given playlist
///
/// Runs the whole pipeline serially: seed tracks and their audio features,
/// candidate recommendations per seed batch, independent min-max scaling of
/// both feature sets, cosine scoring and selection of the closest distinct
/// candidate per seed. Any failed API call fails the request; individual
/// malformed entries are skipped and reported in the result.
pub async fn recommend_for_playlist(
    provider: &dyn MusicProvider,
    credentials: &Credentials,
    playlist_id: &PlaylistId,
) -> AppResult<RecommendationResult> {
    let start = Instant::now();
    let mut skipped = Vec::new();

    // 1. Seed tracks
    let playlist = provider
        .fetch_playlist_tracks(credentials, playlist_id)
        .await?;
    let seed_tracks = extract_playlist_tracks(&playlist, EntryStage::SeedTracks, &mut skipped);

    // 2-3. Seed features and feature columns
    let seeds = fetch_feature_table(
        provider,
        credentials,
        seed_tracks,
        EntryStage::SeedFeatures,
        &mut skipped,
    )
    .await?;

    if seeds.is_empty() {
        return Err(AppError::InsufficientData(format!(
            "Playlist {} has no tracks with audio features",
            playlist_id
        )));
    }

    tracing::info!(
        playlist_id = %playlist_id,
        seed_count = seeds.len(),
        feature_count = seeds.columns().len(),
        "Seed tracks loaded"
    );

    // 4. Candidates
    let candidates = fetch_candidates(provider, credentials, &seeds, &mut skipped).await?;

    // 5-6. Normalize each side against itself, then score
    let scores = cosine_similarity(
        &min_max_scale(&seeds.feature_matrix()),
        &min_max_scale(&candidates.feature_matrix()),
    )?;

    // 7. Select
    let selected = select_recommendations(&candidates, &seeds, &scores)?;

    tracing::info!(
        playlist_id = %playlist_id,
        candidate_count = candidates.len(),
        recommended = selected.len(),
        skipped = skipped.len(),
        processing_time_ms = start.elapsed().as_millis(),
        "Recommendations computed"
    );

    Ok(RecommendationResult {
        tracks: selected.tracks().to_vec(),
        skipped,
    })
}

/// Writes the most popular recommendations to a new playlist owned by the
/// current user, returning the new playlist's id
pub async fn publish_recommendations(
    provider: &dyn MusicProvider,
    credentials: &Credentials,
    result: &RecommendationResult,
    playlist_name: &str,
    description: &str,
) -> AppResult<String> {
    if playlist_name.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "Playlist name cannot be empty".to_string(),
        ));
    }

    let track_uris: Vec<String> = result
        .ranked_for_publish()
        .into_iter()
        .map(Track::uri)
        .collect();

    let user = provider.get_current_user(credentials).await?;
    let playlist_id = provider
        .create_playlist(credentials, &user.id, playlist_name, description)
        .await?;

    // the add endpoint rejects an empty uri list
    if !track_uris.is_empty() {
        provider
            .add_tracks_to_playlist(credentials, &playlist_id, &track_uris)
            .await?;
    }

    tracing::info!(
        playlist_id = %playlist_id,
        user_id = %user.id,
        track_count = track_uris.len(),
        "Recommendations published"
    );

    Ok(playlist_id)
}

/// Fetches audio features for `tracks` and pairs them into a table
async fn fetch_feature_table(
    provider: &dyn MusicProvider,
    credentials: &Credentials,
    tracks: Vec<Track>,
    stage: EntryStage,
    skipped: &mut Vec<SkippedEntry>,
) -> AppResult<TrackFeatureTable> {
    if tracks.is_empty() {
        return Ok(TrackFeatureTable::default());
    }

    let ids: Vec<String> = tracks.iter().map(|t| t.id.clone()).collect();
    let records = provider.fetch_audio_features(credentials, &ids).await?;

    build_feature_table(tracks, records, stage, skipped)
}

/// Requests recommendations for every full seed batch, one batch at a time,
/// and concatenates the resulting tables in batch order
async fn fetch_candidates(
    provider: &dyn MusicProvider,
    credentials: &Credentials,
    seeds: &TrackFeatureTable,
    skipped: &mut Vec<SkippedEntry>,
) -> AppResult<TrackFeatureTable> {
    let seed_ids: Vec<String> = seeds.tracks().iter().map(|t| t.id.clone()).collect();
    let batches = seed_batches(&seed_ids);

    if batches.is_empty() {
        tracing::info!(
            seed_count = seed_ids.len(),
            batch_size = SEED_BATCH_SIZE,
            "Too few seeds for a full batch, no candidates requested"
        );
    }

    let mut candidates = TrackFeatureTable::default();

    for (batch_index, batch) in batches.into_iter().enumerate() {
        let recommendations = provider
            .fetch_recommendations_for_seeds(credentials, batch, RECOMMENDATIONS_PER_BATCH)
            .await?;
        let tracks = extract_tracks(
            &recommendations.tracks,
            EntryStage::CandidateTracks,
            skipped,
        );
        let table = fetch_feature_table(
            provider,
            credentials,
            tracks,
            EntryStage::CandidateFeatures,
            skipped,
        )
        .await?;

        tracing::debug!(
            batch = batch_index,
            candidates = table.len(),
            "Candidate batch fetched"
        );

        candidates = candidates.concat(&table)?;
    }

    Ok(candidates)
}
