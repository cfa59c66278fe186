use crate::{
    error::AppResult,
    models::{EntryStage, TopTrack},
    services::{auth::Credentials, features::extract_tracks, providers::MusicProvider},
};

/// Window the listing covers, roughly the last four weeks
pub const TOP_TRACKS_TIME_RANGE: &str = "short_term";
pub const TOP_TRACKS_LIMIT: u32 = 50;

/// The current user's most played recent tracks, ranked from 1
///
/// Entries that cannot be read are left out and the remaining ones ranked
/// contiguously.
pub async fn get_top_tracks(
    provider: &dyn MusicProvider,
    credentials: &Credentials,
) -> AppResult<Vec<TopTrack>> {
    let response = provider
        .fetch_top_tracks(credentials, TOP_TRACKS_TIME_RANGE, TOP_TRACKS_LIMIT)
        .await?;

    let mut skipped = Vec::new();
    let tracks = extract_tracks(&response.items, EntryStage::TopTracks, &mut skipped);

    Ok(tracks
        .into_iter()
        .enumerate()
        .map(|(index, track)| TopTrack {
            rank: index + 1,
            name: track.name,
            artist: track.artist,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::ApiTopTracks, services::providers::MockMusicProvider, test_support::api_track,
    };
    use serde_json::Value;

    #[tokio::test]
    async fn test_top_tracks_ranked_from_one() {
        let mut provider = MockMusicProvider::new();
        provider
            .expect_fetch_top_tracks()
            .withf(|_, range, limit| range == "short_term" && *limit == 50)
            .returning(|_, _, _| {
                Ok(ApiTopTracks {
                    items: vec![
                        api_track("a", "First", 90),
                        Value::Null,
                        api_track("b", "Second", 80),
                    ],
                })
            });

        let top = get_top_tracks(&provider, &Credentials::bearer("tok"))
            .await
            .unwrap();

        assert_eq!(top.len(), 2);
        assert_eq!(top[0].rank, 1);
        assert_eq!(top[0].name, "First");
        assert_eq!(top[1].rank, 2);
        assert_eq!(top[1].artist, "Artist");
    }
}
