use serde::{Deserialize, Serialize};

use super::tfidf::SparseVector;

/// Weight of text (cosine) similarity in the blended score
pub const CONTENT_WEIGHT: f64 = 0.8;
/// Weight of rating co-magnitude in the blended score
pub const RATING_WEIGHT: f64 = 0.2;

/// Dense symmetric N×N similarity matrix, row-major, entries in [0, 1].
/// Immutable after build; the row/column index is the catalog position.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimilarityMatrix {
    n: usize,
    data: Vec<f64>,
}

impl SimilarityMatrix {
    /// Number of movies the matrix covers
    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Blended similarity of movies `i` and `j`
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.n + j]
    }

    /// Full similarity row for movie `i`
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.n..(i + 1) * self.n]
    }
}

/// Computes the blended pairwise similarity matrix.
///
/// Content similarity is the dot product of the pre-normalized TF-IDF
/// vectors (cosine); a zero vector dots to 0 against everything, never NaN.
/// Ratings are min-max scaled over the catalog and combined as an outer
/// product: a co-magnitude measure, so two high-rated movies score higher
/// together than two low-rated ones. The blend is 0.8 content + 0.2 rating,
/// entries are written for j >= i and mirrored, so symmetry is exact.
pub fn build_similarity_matrix(
    vectors: &[SparseVector],
    ratings: &[Option<f64>],
) -> SimilarityMatrix {
    debug_assert_eq!(vectors.len(), ratings.len());

    let n = vectors.len();
    let scaled = min_max_scale(ratings);
    let mut data = vec![0.0; n * n];

    for i in 0..n {
        for j in i..n {
            let content = dot(&vectors[i], &vectors[j]);
            let rating = scaled[i] * scaled[j];
            let score = CONTENT_WEIGHT * content + RATING_WEIGHT * rating;
            data[i * n + j] = score;
            data[j * n + i] = score;
        }
    }

    SimilarityMatrix { n, data }
}

/// Dot product of two sparse vectors sorted by term index
fn dot(a: &SparseVector, b: &SparseVector) -> f64 {
    let mut sum = 0.0;
    let (mut ai, mut bi) = (0, 0);

    while ai < a.len() && bi < b.len() {
        match a[ai].0.cmp(&b[bi].0) {
            std::cmp::Ordering::Less => ai += 1,
            std::cmp::Ordering::Greater => bi += 1,
            std::cmp::Ordering::Equal => {
                sum += a[ai].1 * b[bi].1;
                ai += 1;
                bi += 1;
            }
        }
    }

    sum
}

/// Min-max scales ratings to [0, 1] over the values observed in the catalog.
///
/// Missing ratings are imputed as 0.0 before scaling, i.e. treated as the
/// lowest observable score. That replicates the original build's behavior;
/// mean imputation would be a reasonable alternative but changes every
/// blended score, so it is deliberately not applied here.
fn min_max_scale(ratings: &[Option<f64>]) -> Vec<f64> {
    let imputed: Vec<f64> = ratings.iter().map(|r| r.unwrap_or(0.0)).collect();

    let min = imputed.iter().copied().fold(f64::INFINITY, f64::min);
    let max = imputed.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    // A constant column scales to all zeros instead of dividing by zero
    let denom = if range > 0.0 { range } else { 1.0 };

    imputed.into_iter().map(|r| (r - min) / denom).collect()
}
