pub mod features;
pub mod recommender;
pub mod similarity;
pub mod stopwords;
pub mod tfidf;

pub use recommender::{Recommendation, RecommendationModel};
pub use similarity::SimilarityMatrix;
pub use tfidf::TfidfVectorizer;

use crate::models::Movie;

/// Vocabulary cap for the text vectorizer
pub const VOCABULARY_SIZE: usize = 10_000;

/// Runs the offline build pipeline over an ordered catalog: feature
/// composition, TF-IDF vectorization over the full corpus, then the
/// blended pairwise similarity matrix. Single-threaded batch work; matrix
/// row/column indices are the catalog positions.
pub fn build_model(movies: &[Movie]) -> SimilarityMatrix {
    let (blobs, ratings): (Vec<String>, Vec<Option<f64>>) =
        movies.iter().map(features::compose).unzip();

    let vectors = TfidfVectorizer::new(VOCABULARY_SIZE).fit_transform(&blobs);
    similarity::build_similarity_matrix(&vectors, &ratings)
}
