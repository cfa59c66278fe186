//! Builders shared by unit tests.

use serde_json::{json, Value};

use crate::models::{FeatureRecord, Track};

pub fn track(id: &str, name: &str, popularity: u8) -> Track {
    Track {
        id: id.to_string(),
        name: name.to_string(),
        album: "Album".to_string(),
        artist: "Artist".to_string(),
        duration_ms: 200_000,
        popularity,
    }
}

/// Raw track object the way the API nests it
pub fn api_track(id: &str, name: &str, popularity: u8) -> Value {
    json!({
        "id": id,
        "name": name,
        "artists": [ { "name": "Artist" } ],
        "album": { "name": "Album" },
        "duration_ms": 200000,
        "popularity": popularity,
    })
}

/// Audio-feature record with the API's full field set. Distinct `seed`
/// values give distinct vectors.
pub fn feature_record(id: &str, seed: f64) -> FeatureRecord {
    let value = json!({
        "danceability": 0.1 + 0.08 * seed,
        "energy": 0.9 - 0.07 * seed,
        "key": 5,
        "loudness": -12.0 + seed,
        "mode": 1,
        "speechiness": 0.03 + 0.01 * (seed % 3.0),
        "acousticness": 0.5 + 0.04 * (seed % 4.0) - 0.02 * seed,
        "instrumentalness": 0.001 * seed,
        "liveness": 0.1 + 0.05 * (seed % 2.0),
        "valence": 0.2 + 0.06 * seed,
        "tempo": 90.0 + 7.5 * seed,
        "type": "audio_features",
        "id": id,
        "uri": format!("spotify:track:{}", id),
        "track_href": format!("https://api.spotify.com/v1/tracks/{}", id),
        "analysis_url": format!("https://api.spotify.com/v1/audio-analysis/{}", id),
        "duration_ms": 200000,
        "time_signature": 4,
    });

    match value {
        Value::Object(map) => map,
        _ => unreachable!("json! object literal"),
    }
}
