use std::path::Path;

use anyhow::Context;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// A catalog movie with full metadata
///
/// Movies are produced by the offline ingestion pipeline and are read-only
/// afterwards. Missing text fields are represented as empty strings rather
/// than options so that feature composition never has to branch on them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    /// Stable TMDB identifier
    pub tmdb_id: i64,
    /// Title, unique within the catalog (the lookup key for queries)
    pub title: String,
    pub overview: String,
    pub genres: Vec<String>,
    pub director: String,
    /// Leading cast names, pipe-delimited as ingested
    pub top_cast: String,
    /// Keyword tags; consumed during the build, not persisted with metadata
    #[serde(default)]
    pub keywords: String,
    pub poster_path: Option<String>,
    /// Average vote on a 0-10 scale; absent when the movie has no votes
    pub vote_average: Option<f64>,
    pub release_date: Option<String>,
    pub runtime: Option<f64>,
    pub year: Option<i32>,
    pub production_countries: Vec<String>,
}

/// One row of the cleaned catalog CSV consumed by the build entrypoint.
/// List-valued columns (genres, production_countries) are pipe-delimited
/// strings; most columns may be empty.
#[derive(Debug, Deserialize)]
pub struct CatalogRecord {
    pub tmdb_id: i64,
    pub title: String,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub genres: Option<String>,
    #[serde(default)]
    pub director: Option<String>,
    #[serde(default)]
    pub top_cast: Option<String>,
    #[serde(default)]
    pub keywords: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub runtime: Option<f64>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub production_countries: Option<String>,
}

/// Splits a pipe-delimited list column into its entries, dropping empties
pub(crate) fn split_list(field: Option<&str>) -> Vec<String> {
    field
        .unwrap_or_default()
        .split('|')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Joins list entries back into the pipe-delimited column form
pub(crate) fn join_list(entries: &[String]) -> String {
    entries.join("|")
}

fn year_from_release_date(release_date: Option<&str>) -> Option<i32> {
    release_date
        .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
        .map(|d| d.year())
}

impl From<CatalogRecord> for Movie {
    fn from(record: CatalogRecord) -> Self {
        let year = record
            .year
            .or_else(|| year_from_release_date(record.release_date.as_deref()));

        Movie {
            tmdb_id: record.tmdb_id,
            title: record.title,
            overview: record.overview.unwrap_or_default(),
            genres: split_list(record.genres.as_deref()),
            director: record.director.unwrap_or_default(),
            top_cast: record.top_cast.unwrap_or_default(),
            keywords: record.keywords.unwrap_or_default(),
            poster_path: record.poster_path,
            vote_average: record.vote_average,
            release_date: record.release_date,
            runtime: record.runtime,
            year,
            production_countries: split_list(record.production_countries.as_deref()),
        }
    }
}

/// Reads the cleaned catalog CSV into an ordered sequence of movies.
/// Row order is preserved: the position of a movie here becomes its index
/// in the similarity matrix.
pub fn load_catalog<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Movie>> {
    let mut reader = csv::Reader::from_path(path.as_ref())
        .with_context(|| format!("Failed to open catalog file {:?}", path.as_ref()))?;

    let mut movies = Vec::new();
    for result in reader.deserialize() {
        let record: CatalogRecord = result.context("Failed to parse catalog record")?;
        movies.push(Movie::from(record));
    }

    Ok(movies)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_record_conversion() {
        let record = CatalogRecord {
            tmdb_id: 603,
            title: "The Matrix".to_string(),
            overview: Some("A hacker discovers reality is a simulation".to_string()),
            genres: Some("Action|Science Fiction".to_string()),
            director: Some("Lana Wachowski".to_string()),
            top_cast: Some("Keanu Reeves|Laurence Fishburne".to_string()),
            keywords: Some("cyberpunk|dystopia".to_string()),
            poster_path: Some("/matrix.jpg".to_string()),
            vote_average: Some(8.2),
            release_date: Some("1999-03-31".to_string()),
            runtime: Some(136.0),
            year: None,
            production_countries: Some("United States of America".to_string()),
        };

        let movie = Movie::from(record);
        assert_eq!(movie.genres, vec!["Action", "Science Fiction"]);
        assert_eq!(movie.year, Some(1999)); // derived from release_date
        assert_eq!(movie.production_countries.len(), 1);
    }

    #[test]
    fn test_missing_fields_become_empty_strings() {
        let record = CatalogRecord {
            tmdb_id: 1,
            title: "Obscure".to_string(),
            overview: None,
            genres: None,
            director: None,
            top_cast: None,
            keywords: None,
            poster_path: None,
            vote_average: None,
            release_date: None,
            runtime: None,
            year: None,
            production_countries: None,
        };

        let movie = Movie::from(record);
        assert_eq!(movie.overview, "");
        assert!(movie.genres.is_empty());
        assert_eq!(movie.vote_average, None);
        assert_eq!(movie.year, None);
    }

    #[test]
    fn test_split_list_drops_empty_entries() {
        assert_eq!(split_list(Some("Action||Drama|")), vec!["Action", "Drama"]);
        assert!(split_list(None).is_empty());
        assert!(split_list(Some("")).is_empty());
    }
}
