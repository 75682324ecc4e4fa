use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::engine::{RecommendationModel, SimilarityMatrix};
use crate::models::movie::{join_list, split_list};
use crate::models::Movie;

/// Error types for artifact persistence
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Distinct "model not built" condition: the caller should trigger an
    /// offline rebuild instead of serving
    #[error("model artifact not found at {0}")]
    NotFound(PathBuf),

    /// The blob and metadata table disagree; serving from them would
    /// silently corrupt recommendations
    #[error("model artifact is corrupt: {0}")]
    Corrupt(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("metadata table error: {0}")]
    Csv(#[from] csv::Error),

    #[error("blob encoding error: {0}")]
    Blob(#[from] bincode::Error),
}

/// Binary blob half of the artifact: the matrix plus the ordered id/title
/// index that is authoritative for row order
#[derive(Serialize, Deserialize)]
struct ModelBlob {
    similarity_matrix: SimilarityMatrix,
    movie_ids: Vec<i64>,
    movie_titles: Vec<String>,
}

/// One row of the persisted metadata table. List columns are flattened to
/// pipe-delimited strings; keywords are intentionally absent (they are a
/// build-time input only).
#[derive(Debug, Serialize, Deserialize)]
struct MetadataRecord {
    tmdb_id: i64,
    title: String,
    overview: String,
    genres: String,
    director: String,
    top_cast: String,
    poster_path: Option<String>,
    vote_average: Option<f64>,
    release_date: Option<String>,
    runtime: Option<f64>,
    year: Option<i32>,
    production_countries: String,
}

impl From<&Movie> for MetadataRecord {
    fn from(movie: &Movie) -> Self {
        Self {
            tmdb_id: movie.tmdb_id,
            title: movie.title.clone(),
            overview: movie.overview.clone(),
            genres: join_list(&movie.genres),
            director: movie.director.clone(),
            top_cast: movie.top_cast.clone(),
            poster_path: movie.poster_path.clone(),
            vote_average: movie.vote_average,
            release_date: movie.release_date.clone(),
            runtime: movie.runtime,
            year: movie.year,
            production_countries: join_list(&movie.production_countries),
        }
    }
}

impl From<MetadataRecord> for Movie {
    fn from(record: MetadataRecord) -> Self {
        Movie {
            tmdb_id: record.tmdb_id,
            title: record.title,
            overview: record.overview,
            genres: split_list(Some(&record.genres)),
            director: record.director,
            top_cast: record.top_cast,
            keywords: String::new(),
            poster_path: record.poster_path,
            vote_average: record.vote_average,
            release_date: record.release_date,
            runtime: record.runtime,
            year: record.year,
            production_countries: split_list(Some(&record.production_countries)),
        }
    }
}

/// Persists and loads the model artifact: a bincode blob holding the
/// similarity matrix plus the ordered id/title index, and a CSV metadata
/// table whose row order must match the blob's index order.
pub struct ModelStore {
    model_path: PathBuf,
    metadata_path: PathBuf,
}

impl ModelStore {
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(model_path: P, metadata_path: Q) -> Self {
        Self {
            model_path: model_path.as_ref().to_path_buf(),
            metadata_path: metadata_path.as_ref().to_path_buf(),
        }
    }

    /// Writes the complete artifact, or nothing.
    ///
    /// Both resources are written to temporary files and renamed into
    /// place, so a crash mid-save never leaves a loadable half-written
    /// pair; the load-time alignment check covers the window between the
    /// two renames.
    pub fn save(&self, matrix: &SimilarityMatrix, movies: &[Movie]) -> Result<(), StoreError> {
        if let Some(parent) = self.model_path.parent() {
            fs::create_dir_all(parent)?;
        }
        if let Some(parent) = self.metadata_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let blob = ModelBlob {
            similarity_matrix: matrix.clone(),
            movie_ids: movies.iter().map(|m| m.tmdb_id).collect(),
            movie_titles: movies.iter().map(|m| m.title.clone()).collect(),
        };

        let blob_tmp = self.model_path.with_extension("bin.tmp");
        fs::write(&blob_tmp, bincode::serialize(&blob)?)?;

        let metadata_tmp = self.metadata_path.with_extension("csv.tmp");
        {
            let mut writer = csv::Writer::from_path(&metadata_tmp)?;
            for movie in movies {
                writer.serialize(MetadataRecord::from(movie))?;
            }
            writer.flush()?;
        }

        fs::rename(&blob_tmp, &self.model_path)?;
        fs::rename(&metadata_tmp, &self.metadata_path)?;

        info!(
            movies = movies.len(),
            model = %self.model_path.display(),
            metadata = %self.metadata_path.display(),
            "model artifact persisted"
        );
        Ok(())
    }

    /// Loads the artifact and re-validates index alignment between the
    /// blob and the metadata table. A missing resource is the distinct
    /// `NotFound` condition; any mismatch in length or order is `Corrupt`.
    pub fn load(&self) -> Result<RecommendationModel, StoreError> {
        let blob_bytes = read_or_not_found(&self.model_path)?;
        let blob: ModelBlob = bincode::deserialize(&blob_bytes)?;

        if !self.metadata_path.exists() {
            return Err(StoreError::NotFound(self.metadata_path.clone()));
        }
        let mut reader = csv::Reader::from_path(&self.metadata_path)?;
        let mut movies = Vec::new();
        for result in reader.deserialize() {
            let record: MetadataRecord = result?;
            movies.push(Movie::from(record));
        }

        validate_alignment(&blob, &movies)?;

        info!(movies = movies.len(), "model artifact loaded");
        Ok(RecommendationModel::new(blob.similarity_matrix, movies))
    }
}

fn read_or_not_found(path: &Path) -> Result<Vec<u8>, StoreError> {
    match fs::read(path) {
        Ok(bytes) => Ok(bytes),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(StoreError::NotFound(path.to_path_buf()))
        }
        Err(e) => Err(e.into()),
    }
}

/// The blob's id/title index is authoritative; the metadata table must
/// match it row for row, otherwise every lookup would silently join the
/// wrong metadata to the matrix.
fn validate_alignment(blob: &ModelBlob, movies: &[Movie]) -> Result<(), StoreError> {
    let n = blob.similarity_matrix.len();
    if blob.movie_titles.len() != n || blob.movie_ids.len() != n {
        return Err(StoreError::Corrupt(format!(
            "matrix covers {} movies but the blob index lists {}",
            n,
            blob.movie_titles.len()
        )));
    }
    if movies.len() != n {
        return Err(StoreError::Corrupt(format!(
            "blob index lists {} movies but the metadata table has {}",
            n,
            movies.len()
        )));
    }

    for (index, movie) in movies.iter().enumerate() {
        if blob.movie_ids[index] != movie.tmdb_id || blob.movie_titles[index] != movie.title {
            return Err(StoreError::Corrupt(format!(
                "row {index} mismatch: blob has {} ({}), metadata has {} ({})",
                blob.movie_titles[index], blob.movie_ids[index], movie.title, movie.tmdb_id
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine;

    fn sample_catalog() -> Vec<Movie> {
        vec![
            Movie {
                tmdb_id: 603,
                title: "The Matrix".to_string(),
                overview: "A hacker discovers reality is simulated".to_string(),
                genres: vec!["Action".to_string(), "Science Fiction".to_string()],
                director: "Lana Wachowski".to_string(),
                top_cast: "Keanu Reeves|Laurence Fishburne".to_string(),
                keywords: "cyberpunk".to_string(),
                poster_path: Some("/matrix.jpg".to_string()),
                vote_average: Some(8.2),
                release_date: Some("1999-03-31".to_string()),
                runtime: Some(136.0),
                year: Some(1999),
                production_countries: vec!["United States of America".to_string()],
            },
            Movie {
                tmdb_id: 27205,
                title: "Inception".to_string(),
                overview: "A thief steals secrets through dreams".to_string(),
                genres: vec!["Action".to_string(), "Thriller".to_string()],
                director: "Christopher Nolan".to_string(),
                top_cast: "Leonardo DiCaprio".to_string(),
                keywords: "dreams heist".to_string(),
                poster_path: None,
                vote_average: Some(8.4),
                release_date: Some("2010-07-16".to_string()),
                runtime: Some(148.0),
                year: Some(2010),
                production_countries: vec![],
            },
        ]
    }

    fn test_store(dir: &tempfile::TempDir) -> ModelStore {
        ModelStore::new(
            dir.path().join("recommendation_model.bin"),
            dir.path().join("movie_metadata.csv"),
        )
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = test_store(&dir);

        let movies = sample_catalog();
        let matrix = engine::build_model(&movies);
        store.save(&matrix, &movies).unwrap();

        let model = store.load().unwrap();
        assert_eq!(model.len(), 2);

        let matrix_movie = model.movie_by_title("The Matrix").unwrap();
        assert_eq!(matrix_movie.tmdb_id, 603);
        assert_eq!(matrix_movie.genres, vec!["Action", "Science Fiction"]);
        // keywords are a build-time input, not part of the artifact
        assert_eq!(matrix_movie.keywords, "");
    }

    #[test]
    fn test_load_missing_artifact_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = test_store(&dir);
        assert!(matches!(store.load(), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_misaligned_metadata_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let store = test_store(&dir);

        let movies = sample_catalog();
        let matrix = engine::build_model(&movies);
        store.save(&matrix, &movies).unwrap();

        // Drop a row from the metadata table behind the store's back
        let metadata_path = dir.path().join("movie_metadata.csv");
        let contents = fs::read_to_string(&metadata_path).unwrap();
        let truncated: Vec<&str> = contents.lines().take(2).collect();
        fs::write(&metadata_path, truncated.join("\n")).unwrap();

        assert!(matches!(store.load(), Err(StoreError::Corrupt(_))));
    }

    #[test]
    fn test_reordered_metadata_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let store = test_store(&dir);

        let movies = sample_catalog();
        let matrix = engine::build_model(&movies);
        store.save(&matrix, &movies).unwrap();

        // Rebuild the metadata table with rows swapped
        let mut reversed = movies.clone();
        reversed.reverse();
        let metadata_path = dir.path().join("movie_metadata.csv");
        let mut writer = csv::Writer::from_path(&metadata_path).unwrap();
        for movie in &reversed {
            writer.serialize(MetadataRecord::from(movie)).unwrap();
        }
        writer.flush().unwrap();
        drop(writer);

        assert!(matches!(store.load(), Err(StoreError::Corrupt(_))));
    }

    #[test]
    fn test_no_partial_artifact_after_save() {
        let dir = tempfile::tempdir().unwrap();
        let store = test_store(&dir);

        let movies = sample_catalog();
        let matrix = engine::build_model(&movies);
        store.save(&matrix, &movies).unwrap();

        // No temp files are left behind
        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }
}
