//! Shaping of raw API payloads into tracks and feature tables.

use serde_json::Value;

use crate::{
    error::{AppError, AppResult},
    models::{
        spotify::ApiTrack, ApiPlaylist, EntryStage, FeatureRecord, SkippedEntry, Track,
        TrackFeatureTable,
    },
};

/// Audio descriptors eligible for similarity scoring, in API field order
pub const FEATURE_ALLOW_LIST: [&str; 11] = [
    "danceability",
    "energy",
    "key",
    "loudness",
    "mode",
    "speechiness",
    "acousticness",
    "instrumentalness",
    "liveness",
    "valence",
    "tempo",
];

/// Categorical descriptors that cosine similarity cannot compare meaningfully
pub const EXCLUDED_FEATURES: [&str; 2] = ["mode", "key"];

/// Records a skipped entry and logs it
pub fn record_skip(
    skipped: &mut Vec<SkippedEntry>,
    stage: EntryStage,
    position: usize,
    reason: impl Into<String>,
) {
    let reason = reason.into();
    tracing::warn!(stage = ?stage, position, reason = %reason, "Skipping malformed entry");
    skipped.push(SkippedEntry {
        stage,
        position,
        reason,
    });
}

/// Pulls tracks out of a playlist payload, where each item wraps a nullable track
pub fn extract_playlist_tracks(
    playlist: &ApiPlaylist,
    stage: EntryStage,
    skipped: &mut Vec<SkippedEntry>,
) -> Vec<Track> {
    let null = Value::Null;
    let nested: Vec<&Value> = playlist
        .tracks
        .items
        .iter()
        .map(|item| item.get("track").unwrap_or(&null))
        .collect();

    collect_tracks(nested, stage, skipped)
}

/// Pulls tracks out of a flat list of track objects
pub fn extract_tracks(
    entries: &[Value],
    stage: EntryStage,
    skipped: &mut Vec<SkippedEntry>,
) -> Vec<Track> {
    collect_tracks(entries.iter().collect(), stage, skipped)
}

fn collect_tracks(
    entries: Vec<&Value>,
    stage: EntryStage,
    skipped: &mut Vec<SkippedEntry>,
) -> Vec<Track> {
    let mut tracks = Vec::with_capacity(entries.len());
    for (position, entry) in entries.into_iter().enumerate() {
        match parse_track(entry) {
            Ok(track) => tracks.push(track),
            Err(reason) => record_skip(skipped, stage, position, reason),
        }
    }
    tracks
}

fn parse_track(entry: &Value) -> Result<Track, String> {
    if entry.is_null() {
        return Err("track data missing".to_string());
    }

    let api_track: ApiTrack =
        serde_json::from_value(entry.clone()).map_err(|e| format!("unparsable track: {}", e))?;

    let artist = api_track
        .artists
        .into_iter()
        .next()
        .ok_or_else(|| "track has no artists".to_string())?;

    Ok(Track {
        id: api_track.id,
        name: api_track.name,
        album: api_track.album.name,
        artist: artist.name,
        duration_ms: api_track.duration_ms,
        popularity: api_track.popularity,
    })
}

/// Feature columns used for scoring: allow-listed descriptors present in
/// `record`, minus the categorical ones
pub fn derive_feature_columns(record: &FeatureRecord) -> Vec<String> {
    FEATURE_ALLOW_LIST
        .iter()
        .copied()
        .filter(|name| !EXCLUDED_FEATURES.contains(name))
        .filter(|name| record.contains_key(*name))
        .map(|name| name.to_string())
        .collect()
}

/// Pairs tracks with their feature records.
///
/// Columns come from the first available record. A track whose record is
/// null or lacks a numeric value for any column is dropped together with its
/// record. `records` must line up with `tracks`.
pub fn build_feature_table(
    tracks: Vec<Track>,
    records: Vec<Option<FeatureRecord>>,
    stage: EntryStage,
    skipped: &mut Vec<SkippedEntry>,
) -> AppResult<TrackFeatureTable> {
    if tracks.len() != records.len() {
        return Err(AppError::ExternalApi(format!(
            "Requested audio features for {} tracks, received {}",
            tracks.len(),
            records.len()
        )));
    }

    let columns = match records.iter().flatten().next() {
        Some(first) => derive_feature_columns(first),
        None => {
            for position in 0..tracks.len() {
                record_skip(skipped, stage, position, "audio features unavailable");
            }
            return Ok(TrackFeatureTable::default());
        }
    };

    let mut kept_tracks = Vec::with_capacity(tracks.len());
    let mut rows = Vec::with_capacity(tracks.len());

    for (position, (track, record)) in tracks.into_iter().zip(records).enumerate() {
        let Some(record) = record else {
            record_skip(skipped, stage, position, "audio features unavailable");
            continue;
        };

        match feature_row(&record, &columns) {
            Ok(row) => {
                kept_tracks.push(track);
                rows.push(row);
            }
            Err(reason) => record_skip(skipped, stage, position, reason),
        }
    }

    TrackFeatureTable::new(columns, kept_tracks, rows)
}

fn feature_row(record: &FeatureRecord, columns: &[String]) -> Result<Vec<f64>, String> {
    columns
        .iter()
        .map(|column| {
            record
                .get(column)
                .and_then(Value::as_f64)
                .ok_or_else(|| format!("feature `{}` missing or non-numeric", column))
        })
        .collect()
}
