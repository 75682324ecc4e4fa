use std::collections::HashMap;

use serde::Serialize;

use crate::models::Movie;

use super::similarity::SimilarityMatrix;

/// One ranked entry of a recommendation result
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Recommendation {
    pub movie: Movie,
    pub similarity_score: f64,
}

/// The loaded model artifact: the similarity matrix joined with the
/// index-aligned movie metadata.
///
/// Constructed once at process start (or directly in tests with a fake
/// catalog) and shared behind an `Arc`; every operation takes `&self`, so
/// any number of callers can query it concurrently without locking.
pub struct RecommendationModel {
    matrix: SimilarityMatrix,
    movies: Vec<Movie>,
    title_index: HashMap<String, usize>,
}

impl RecommendationModel {
    /// Builds the model from an index-aligned matrix and metadata table.
    /// When a title appears twice the first occurrence wins, matching the
    /// catalog's lookup semantics.
    pub fn new(matrix: SimilarityMatrix, movies: Vec<Movie>) -> Self {
        let mut title_index = HashMap::with_capacity(movies.len());
        for (index, movie) in movies.iter().enumerate() {
            title_index.entry(movie.title.clone()).or_insert(index);
        }

        Self {
            matrix,
            movies,
            title_index,
        }
    }

    /// Number of movies in the catalog
    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    /// Metadata table in catalog (matrix) order
    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    /// Exact-match metadata lookup by title
    pub fn movie_by_title(&self, title: &str) -> Option<&Movie> {
        self.title_index.get(title).map(|&index| &self.movies[index])
    }

    /// Returns the `top_n` movies most similar to `title`, best first.
    ///
    /// An unknown title (exact match only) produces an empty result rather
    /// than an error. The query movie itself is always skipped, equal
    /// scores keep catalog order, and `top_n` larger than the catalog
    /// clamps to the N-1 eligible candidates.
    pub fn recommend(&self, title: &str, top_n: usize) -> Vec<Recommendation> {
        let Some(&query) = self.title_index.get(title) else {
            return Vec::new();
        };

        let mut scored: Vec<(usize, f64)> = self
            .matrix
            .row(query)
            .iter()
            .copied()
            .enumerate()
            .filter(|&(index, _)| index != query)
            .collect();

        // Descending by score; sort stability keeps ties in index order
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        scored
            .into_iter()
            .take(top_n)
            .map(|(index, similarity_score)| Recommendation {
                movie: self.movies[index].clone(),
                similarity_score,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine;

    fn movie(tmdb_id: i64, title: &str, text: &str, rating: f64) -> Movie {
        Movie {
            tmdb_id,
            title: title.to_string(),
            overview: text.to_string(),
            genres: vec![],
            director: String::new(),
            top_cast: String::new(),
            keywords: String::new(),
            poster_path: None,
            vote_average: Some(rating),
            release_date: None,
            runtime: None,
            year: None,
            production_countries: vec![],
        }
    }

    fn test_model() -> RecommendationModel {
        let movies = vec![
            movie(1, "A", "action hero", 8.0),
            movie(2, "B", "action hero", 8.0),
            movie(3, "C", "romance drama", 5.0),
        ];
        let matrix = engine::build_model(&movies);
        RecommendationModel::new(matrix, movies)
    }

    #[test]
    fn test_identical_movie_ranks_first() {
        let model = test_model();
        let recommendations = model.recommend("A", 2);

        assert_eq!(recommendations.len(), 2);
        assert_eq!(recommendations[0].movie.title, "B");
        assert_eq!(recommendations[1].movie.title, "C");
        assert!((recommendations[0].similarity_score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_query_movie_is_excluded() {
        let model = test_model();
        let recommendations = model.recommend("A", 10);
        assert!(recommendations.iter().all(|r| r.movie.title != "A"));
    }

    #[test]
    fn test_unknown_title_returns_empty() {
        let model = test_model();
        assert!(model.recommend("Movie Not In Catalog", 10).is_empty());
    }

    #[test]
    fn test_top_n_clamps_to_catalog_size() {
        let model = test_model();
        let recommendations = model.recommend("A", 10_000);
        assert_eq!(recommendations.len(), 2); // N-1 eligible candidates
    }

    #[test]
    fn test_equal_scores_keep_catalog_order() {
        let movies = vec![
            movie(1, "Query", "western frontier", 7.0),
            movie(2, "First", "space station", 7.0),
            movie(3, "Second", "ocean documentary", 7.0),
        ];
        let matrix = engine::build_model(&movies);
        let model = RecommendationModel::new(matrix, movies);

        // No shared vocabulary and equal ratings: both candidates tie, so
        // catalog order decides
        let recommendations = model.recommend("Query", 2);
        assert_eq!(recommendations[0].movie.title, "First");
        assert_eq!(recommendations[1].movie.title, "Second");
    }

    #[test]
    fn test_duplicate_title_resolves_to_first_occurrence() {
        let movies = vec![
            movie(1, "Twin", "action hero", 8.0),
            movie(2, "Twin", "romance drama", 5.0),
            movie(3, "Other", "action hero", 8.0),
        ];
        let matrix = engine::build_model(&movies);
        let model = RecommendationModel::new(matrix, movies);

        let recommendations = model.recommend("Twin", 1);
        // Row 0 is the query, so its text twin at index 2 ranks first
        assert_eq!(recommendations[0].movie.tmdb_id, 3);
    }
}
