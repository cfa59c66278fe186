use std::collections::HashSet;

use crate::{
    error::AppResult,
    models::{SimilarityMatrix, TrackFeatureTable},
};

/// Picks the closest candidate for every seed and filters the picks.
///
/// Each seed nominates its best-scoring candidate (first index wins ties).
/// Repeated nominations keep their first occurrence, and any candidate whose
/// name equals a seed track's name is dropped whatever its id. The returned
/// table keeps the order in which seeds first nominated each track.
pub fn select_recommendations(
    candidates: &TrackFeatureTable,
    seeds: &TrackFeatureTable,
    scores: &SimilarityMatrix,
) -> AppResult<TrackFeatureTable> {
    if scores.seed_count() == 0 || scores.candidate_count == 0 {
        return Ok(TrackFeatureTable::default());
    }

    let seed_names: HashSet<&str> = seeds.tracks().iter().map(|t| t.name.as_str()).collect();
    let mut seen_ids: HashSet<&str> = HashSet::new();

    let mut tracks = Vec::new();
    let mut rows = Vec::new();

    for seed in 0..scores.seed_count() {
        let Some(index) = scores.best_candidate(seed) else {
            continue;
        };
        let (Some(track), Some(row)) = (candidates.tracks().get(index), candidates.rows().get(index))
        else {
            continue;
        };

        if !seen_ids.insert(track.id.as_str()) {
            continue;
        }
        if seed_names.contains(track.name.as_str()) {
            tracing::debug!(track_id = %track.id, name = %track.name, "Dropping pick already in seed playlist");
            continue;
        }

        tracks.push(track.clone());
        rows.push(row.clone());
    }

    TrackFeatureTable::new(candidates.columns().to_vec(), tracks, rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::track;

    fn table(tracks: Vec<crate::models::Track>) -> TrackFeatureTable {
        let rows = (0..tracks.len()).map(|i| vec![i as f64]).collect();
        TrackFeatureTable::new(vec!["energy".to_string()], tracks, rows).unwrap()
    }

    fn scores(scores: Vec<Vec<f64>>) -> SimilarityMatrix {
        let candidate_count = scores.first().map(Vec::len).unwrap_or(0);
        SimilarityMatrix {
            scores,
            candidate_count,
        }
    }

    #[test]
    fn test_one_pick_per_seed_in_seed_order() {
        let seeds = table(vec![track("s1", "Seed 1", 10), track("s2", "Seed 2", 10)]);
        let candidates = table(vec![
            track("c1", "Cand 1", 50),
            track("c2", "Cand 2", 60),
            track("c3", "Cand 3", 70),
        ]);

        let picked = select_recommendations(
            &candidates,
            &seeds,
            &scores(vec![vec![0.1, 0.2, 0.9], vec![0.8, 0.1, 0.3]]),
        )
        .unwrap();

        let ids: Vec<&str> = picked.tracks().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["c3", "c1"]);
        assert_eq!(picked.rows(), &[vec![2.0], vec![0.0]]);
    }

    #[test]
    fn test_tie_breaks_on_lowest_index() {
        let seeds = table(vec![track("s1", "Seed 1", 10)]);
        let candidates = table(vec![
            track("c1", "Cand 1", 50),
            track("c2", "Cand 2", 60),
            track("c3", "Cand 3", 70),
        ]);

        let picked =
            select_recommendations(&candidates, &seeds, &scores(vec![vec![0.4, 0.7, 0.7]]))
                .unwrap();

        assert_eq!(picked.tracks()[0].id, "c2");
    }

    #[test]
    fn test_repeated_picks_deduplicated() {
        let seeds = table(vec![
            track("s1", "Seed 1", 10),
            track("s2", "Seed 2", 10),
            track("s3", "Seed 3", 10),
        ]);
        let candidates = table(vec![track("c1", "Cand 1", 50), track("c2", "Cand 2", 60)]);

        let picked = select_recommendations(
            &candidates,
            &seeds,
            &scores(vec![vec![0.9, 0.1], vec![0.1, 0.9], vec![0.8, 0.2]]),
        )
        .unwrap();

        let ids: Vec<&str> = picked.tracks().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["c1", "c2"]);
    }

    #[test]
    fn test_seed_names_excluded_regardless_of_id() {
        let seeds = table(vec![track("s1", "Same Song", 10), track("s2", "Seed 2", 10)]);
        let candidates = table(vec![
            track("remaster", "Same Song", 50),
            track("c2", "Cand 2", 60),
        ]);

        let picked = select_recommendations(
            &candidates,
            &seeds,
            &scores(vec![vec![0.9, 0.1], vec![0.1, 0.9]]),
        )
        .unwrap();

        assert_eq!(picked.len(), 1);
        assert_eq!(picked.tracks()[0].id, "c2");
    }

    #[test]
    fn test_name_match_is_exact() {
        let seeds = table(vec![track("s1", "Song", 10)]);
        let candidates = table(vec![track("c1", "song", 50)]);

        let picked =
            select_recommendations(&candidates, &seeds, &scores(vec![vec![0.5]])).unwrap();

        assert_eq!(picked.len(), 1);
    }

    #[test]
    fn test_no_seeds_or_candidates_gives_empty() {
        let seeds = table(vec![track("s1", "Seed 1", 10)]);
        let candidates = table(vec![]);

        let no_candidates =
            select_recommendations(&candidates, &seeds, &scores(vec![vec![]])).unwrap();
        let no_seeds = select_recommendations(&seeds, &candidates, &scores(vec![])).unwrap();

        assert!(no_candidates.is_empty());
        assert!(no_seeds.is_empty());
    }
}
