use crate::{
    error::{AppError, AppResult},
    models::{FeatureMatrix, SimilarityMatrix},
};

/// Rescales every column of `matrix` to [0, 1] using that matrix's own
/// column minimum and maximum.
///
/// Seed and candidate matrices are each scaled against themselves, so the
/// same raw value can land on different scaled values in the two. A constant
/// column scales to 0 in every row.
pub fn min_max_scale(matrix: &FeatureMatrix) -> FeatureMatrix {
    let width = matrix.columns.len();
    let mut mins = vec![f64::INFINITY; width];
    let mut maxs = vec![f64::NEG_INFINITY; width];

    for row in &matrix.rows {
        for (column, &value) in row.iter().enumerate() {
            mins[column] = mins[column].min(value);
            maxs[column] = maxs[column].max(value);
        }
    }

    let rows = matrix
        .rows
        .iter()
        .map(|row| {
            row.iter()
                .enumerate()
                .map(|(column, &value)| {
                    let range = maxs[column] - mins[column];
                    if range > 0.0 {
                        (value - mins[column]) / range
                    } else {
                        0.0
                    }
                })
                .collect()
        })
        .collect();

    FeatureMatrix {
        columns: matrix.columns.clone(),
        rows,
    }
}

/// Cosine similarity of every seed row against every candidate row.
/// A zero-norm vector scores 0 against everything.
pub fn cosine_similarity(
    seeds: &FeatureMatrix,
    candidates: &FeatureMatrix,
) -> AppResult<SimilarityMatrix> {
    if !seeds.is_empty() && !candidates.is_empty() && seeds.columns != candidates.columns {
        return Err(AppError::Internal(format!(
            "Cannot compare feature sets {:?} and {:?}",
            seeds.columns, candidates.columns
        )));
    }

    let candidate_norms: Vec<f64> = candidates.rows.iter().map(|row| norm(row)).collect();

    let scores = seeds
        .rows
        .iter()
        .map(|seed| {
            let seed_norm = norm(seed);
            candidates
                .rows
                .iter()
                .zip(&candidate_norms)
                .map(|(candidate, &candidate_norm)| {
                    if seed_norm == 0.0 || candidate_norm == 0.0 {
                        0.0
                    } else {
                        dot(seed, candidate) / (seed_norm * candidate_norm)
                    }
                })
                .collect()
        })
        .collect();

    Ok(SimilarityMatrix {
        scores,
        candidate_count: candidates.rows.len(),
    })
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn norm(v: &[f64]) -> f64 {
    dot(v, v).sqrt()
}
