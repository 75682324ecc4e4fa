use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    engine::Recommendation, error::AppResult, middleware::request_id::RequestId,
    models::Movie,
};

use super::AppState;

#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    pub title: String,
    pub top_n: Option<usize>,
}

/// One recommendation entry as served to the presentation layer. The list
/// is ordered by the engine's ranking; callers may re-sort by other fields.
#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
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
    pub similarity_score: f64,
}

impl From<Recommendation> for RecommendationResponse {
    fn from(recommendation: Recommendation) -> Self {
        let Movie {
            title,
            genres,
            director,
            top_cast,
            vote_average,
            release_date,
            runtime,
            year,
            production_countries,
            poster_path,
            overview,
            ..
        } = recommendation.movie;

        Self {
            title,
            genres,
            director,
            top_cast,
            vote_average,
            release_date,
            runtime,
            year,
            production_countries,
            poster_path,
            overview,
            similarity_score: recommendation.similarity_score,
        }
    }
}

/// Handler for the recommendations endpoint.
///
/// An unknown title answers `200 []` so the caller can tell "not in
/// catalog" apart from "system unavailable" (503 when the model is not
/// built).
pub async fn recommend(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(params): Query<RecommendationQuery>,
) -> AppResult<Json<Vec<RecommendationResponse>>> {
    let model = state.model()?;
    let top_n = params.top_n.unwrap_or(state.default_top_n);

    let recommendations = model.recommend(&params.title, top_n);

    tracing::info!(
        request_id = %request_id,
        title = %params.title,
        top_n,
        returned = recommendations.len(),
        "processed recommendation request"
    );

    Ok(Json(
        recommendations
            .into_iter()
            .map(RecommendationResponse::from)
            .collect(),
    ))
}
