use axum::{
    extract::{Query, State},
    Json,
};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, AppResult},
    models::Movie,
};

use super::AppState;

/// Ordered title list for the caller's movie picker
#[derive(Debug, Serialize)]
pub struct MovieListResponse {
    pub total: usize,
    pub titles: Vec<String>,
}

/// Full metadata for a single movie
#[derive(Debug, Serialize)]
pub struct MovieResponse {
    pub tmdb_id: i64,
    pub title: String,
    pub genres: Vec<String>,
    pub director: String,
    pub top_cast: String,
    pub vote_average: Option<f64>,
    pub release_date: Option<String>,
    pub runtime: Option<f64>,
    pub year: Option<i32>,
    pub production_countries: Vec<String>,
    pub poster_path: Option<String>,
    pub overview: String,
}

impl From<&Movie> for MovieResponse {
    fn from(movie: &Movie) -> Self {
        Self {
            tmdb_id: movie.tmdb_id,
            title: movie.title.clone(),
            genres: movie.genres.clone(),
            director: movie.director.clone(),
            top_cast: movie.top_cast.clone(),
            vote_average: movie.vote_average,
            release_date: movie.release_date.clone(),
            runtime: movie.runtime,
            year: movie.year,
            production_countries: movie.production_countries.clone(),
            poster_path: movie.poster_path.clone(),
            overview: movie.overview.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LookupQuery {
    pub title: String,
}

/// Lists every catalog title in index order
pub async fn list(State(state): State<AppState>) -> AppResult<Json<MovieListResponse>> {
    let model = state.model()?;
    let titles: Vec<String> = model.movies().iter().map(|m| m.title.clone()).collect();

    Ok(Json(MovieListResponse {
        total: titles.len(),
        titles,
    }))
}

/// Exact-match metadata lookup for one title
pub async fn lookup(
    State(state): State<AppState>,
    Query(params): Query<LookupQuery>,
) -> AppResult<Json<MovieResponse>> {
    let model = state.model()?;
    let movie = model
        .movie_by_title(&params.title)
        .ok_or_else(|| AppError::NotFound(format!("'{}' is not in the catalog", params.title)))?;

    Ok(Json(MovieResponse::from(movie)))
}

/// Picks one movie uniformly at random from the catalog
pub async fn random(State(state): State<AppState>) -> AppResult<Json<MovieResponse>> {
    let model = state.model()?;
    if model.is_empty() {
        return Err(AppError::NotFound("the catalog is empty".to_string()));
    }

    let index = rand::thread_rng().gen_range(0..model.len());
    Ok(Json(MovieResponse::from(&model.movies()[index])))
}
