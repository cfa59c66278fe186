use serde::{Deserialize, Serialize};
use std::fmt::Display;

use crate::error::{AppError, AppResult};

pub mod spotify;
pub mod track_features;

pub use spotify::{ApiPlaylist, ApiRecommendations, ApiTopTracks, ApiUser, FeatureRecord};
pub use track_features::{FeatureMatrix, SimilarityMatrix, TrackFeatureTable};

/// Most tracks written to a published playlist
pub const MAX_PUBLISHED_TRACKS: usize = 50;

/// A track as used by the recommendation pipeline
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Track {
    pub id: String,
    pub name: String,
    pub album: String,
    pub artist: String,
    pub duration_ms: u64,
    /// 0-100, as reported by the streaming API
    pub popularity: u8,
}

impl Track {
    /// URI form expected by the playlist write endpoints
    pub fn uri(&self) -> String {
        format!("spotify:track:{}", self.id)
    }
}

/// Identifier of a Spotify playlist
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlaylistId(String);

impl PlaylistId {
    /// Parses a bare playlist id, a `spotify:playlist:<id>` URI, or an
    /// `https://open.spotify.com/playlist/<id>` URL (query string ignored).
    pub fn parse(input: &str) -> AppResult<Self> {
        let input = input.trim();

        let candidate = if let Some(rest) = input.strip_prefix("spotify:playlist:") {
            rest
        } else if input.starts_with("http://") || input.starts_with("https://") {
            let without_query = input.split(['?', '#']).next().unwrap_or_default();
            let mut segments = without_query.trim_end_matches('/').rsplit('/');
            let id = segments.next().unwrap_or_default();
            if segments.next() != Some("playlist") {
                return Err(AppError::InvalidInput(format!(
                    "Not a playlist URL: {}",
                    input
                )));
            }
            id
        } else {
            input
        };

        if candidate.is_empty() || !candidate.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(AppError::InvalidInput(format!(
                "Invalid playlist reference: {}",
                input
            )));
        }

        Ok(Self(candidate.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for PlaylistId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where in the pipeline an entry was dropped
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EntryStage {
    SeedTracks,
    SeedFeatures,
    CandidateTracks,
    CandidateFeatures,
    TopTracks,
}

/// Diagnostic for an entry that was skipped instead of failing the request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SkippedEntry {
    pub stage: EntryStage,
    /// Position of the entry within the payload it came from
    pub position: usize,
    pub reason: String,
}

/// Final output of the recommendation pipeline
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct RecommendationResult {
    /// Distinct, seed-disjoint picks in order of first use by a seed
    pub tracks: Vec<Track>,
    pub skipped: Vec<SkippedEntry>,
}

impl RecommendationResult {
    /// Tracks sorted by popularity (highest first), capped at [`MAX_PUBLISHED_TRACKS`].
    /// Equal popularity keeps selection order.
    pub fn ranked_for_publish(&self) -> Vec<&Track> {
        let mut ranked: Vec<&Track> = self.tracks.iter().collect();
        ranked.sort_by(|a, b| b.popularity.cmp(&a.popularity));
        ranked.truncate(MAX_PUBLISHED_TRACKS);
        ranked
    }
}

/// One row of the user's top tracks listing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TopTrack {
    /// 1-based
    pub rank: usize,
    pub name: String,
    pub artist: String,
}
