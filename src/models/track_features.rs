use crate::error::{AppError, AppResult};

use super::Track;

/// Tracks paired 1:1 with their audio-feature rows
///
/// Every row holds one value per entry in `columns`, in column order. The
/// table is never mutated in place; combining or projecting it returns a new value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackFeatureTable {
    columns: Vec<String>,
    tracks: Vec<Track>,
    rows: Vec<Vec<f64>>,
}

impl TrackFeatureTable {
    /// Builds a table, checking the track/row pairing and row widths
    pub fn new(columns: Vec<String>, tracks: Vec<Track>, rows: Vec<Vec<f64>>) -> AppResult<Self> {
        if tracks.len() != rows.len() {
            return Err(AppError::Internal(format!(
                "Track/feature pairing broken: {} tracks, {} feature rows",
                tracks.len(),
                rows.len()
            )));
        }

        if let Some(row) = rows.iter().find(|row| row.len() != columns.len()) {
            return Err(AppError::Internal(format!(
                "Feature row has {} values, expected {}",
                row.len(),
                columns.len()
            )));
        }

        Ok(Self {
            columns,
            tracks,
            rows,
        })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Appends `other` after `self`. An empty side is ignored; otherwise both
    /// tables must share the same feature columns.
    pub fn concat(&self, other: &TrackFeatureTable) -> AppResult<Self> {
        if other.is_empty() {
            return Ok(self.clone());
        }
        if self.is_empty() {
            return Ok(other.clone());
        }
        if self.columns != other.columns {
            return Err(AppError::ExternalApi(format!(
                "Feature columns differ between batches: {:?} vs {:?}",
                self.columns, other.columns
            )));
        }

        Ok(Self {
            columns: self.columns.clone(),
            tracks: self.tracks.iter().chain(&other.tracks).cloned().collect(),
            rows: self.rows.iter().chain(&other.rows).cloned().collect(),
        })
    }

    /// Numeric view of the table, detached from the tracks
    pub fn feature_matrix(&self) -> FeatureMatrix {
        FeatureMatrix {
            columns: self.columns.clone(),
            rows: self.rows.clone(),
        }
    }
}

/// Column-labelled numeric matrix, one row per track
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureMatrix {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<f64>>,
}

impl FeatureMatrix {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Seed × candidate similarity scores
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimilarityMatrix {
    /// `scores[i][j]` compares seed `i` with candidate `j`
    pub scores: Vec<Vec<f64>>,
    pub candidate_count: usize,
}

impl SimilarityMatrix {
    pub fn seed_count(&self) -> usize {
        self.scores.len()
    }

    /// Index of the best candidate for a seed, lowest index on ties.
    /// `None` when there are no candidates.
    pub fn best_candidate(&self, seed: usize) -> Option<usize> {
        let row = self.scores.get(seed)?;
        let mut best: Option<(usize, f64)> = None;
        for (index, &score) in row.iter().enumerate() {
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((index, score)),
            }
        }
        best.map(|(index, _)| index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::track;

    fn columns() -> Vec<String> {
        vec!["energy".to_string(), "tempo".to_string()]
    }

    #[test]
    fn test_new_rejects_broken_pairing() {
        let result = TrackFeatureTable::new(columns(), vec![track("a", "A", 1)], vec![]);
        assert!(matches!(result, Err(AppError::Internal(_))));
    }

    #[test]
    fn test_new_rejects_short_row() {
        let result =
            TrackFeatureTable::new(columns(), vec![track("a", "A", 1)], vec![vec![0.5]]);
        assert!(result.is_err());
    }

    #[test]
    fn test_concat_preserves_order() {
        let first =
            TrackFeatureTable::new(columns(), vec![track("a", "A", 1)], vec![vec![0.1, 90.0]])
                .unwrap();
        let second =
            TrackFeatureTable::new(columns(), vec![track("b", "B", 2)], vec![vec![0.2, 120.0]])
                .unwrap();

        let combined = first.concat(&second).unwrap();

        assert_eq!(combined.len(), 2);
        assert_eq!(combined.tracks()[1].id, "b");
        assert_eq!(combined.rows()[1], vec![0.2, 120.0]);
        // inputs are untouched
        assert_eq!(first.len(), 1);
    }

    #[test]
    fn test_concat_with_empty_side() {
        let table =
            TrackFeatureTable::new(columns(), vec![track("a", "A", 1)], vec![vec![0.1, 90.0]])
                .unwrap();

        assert_eq!(TrackFeatureTable::default().concat(&table).unwrap(), table);
        assert_eq!(table.concat(&TrackFeatureTable::default()).unwrap(), table);
    }

    #[test]
    fn test_concat_rejects_mismatched_columns() {
        let first =
            TrackFeatureTable::new(columns(), vec![track("a", "A", 1)], vec![vec![0.1, 90.0]])
                .unwrap();
        let second = TrackFeatureTable::new(
            vec!["valence".to_string()],
            vec![track("b", "B", 2)],
            vec![vec![0.3]],
        )
        .unwrap();

        assert!(first.concat(&second).is_err());
    }

    #[test]
    fn test_best_candidate_prefers_first_of_equal_maxima() {
        let matrix = SimilarityMatrix {
            scores: vec![vec![0.2, 0.9, 0.9], vec![0.5, 0.5, 0.5]],
            candidate_count: 3,
        };

        assert_eq!(matrix.best_candidate(0), Some(1));
        assert_eq!(matrix.best_candidate(1), Some(0));
    }

    #[test]
    fn test_best_candidate_without_candidates() {
        let matrix = SimilarityMatrix {
            scores: vec![vec![]],
            candidate_count: 0,
        };

        assert_eq!(matrix.best_candidate(0), None);
        assert_eq!(matrix.best_candidate(5), None);
    }
}
