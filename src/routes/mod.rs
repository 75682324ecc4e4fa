use std::sync::Arc;

use axum::{
    http::StatusCode,
    middleware,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod movies;
pub mod recommendations;

use crate::engine::RecommendationModel;
use crate::middleware::request_id::{make_span_with_request_id, request_id_middleware};

/// Shared application state: the model artifact loaded once at startup.
///
/// `model` is `None` when the artifact has not been built yet; query
/// handlers then answer with the distinct "model not built" condition
/// instead of serving stale or empty-but-successful results.
#[derive(Clone)]
pub struct AppState {
    pub model: Option<Arc<RecommendationModel>>,
    pub default_top_n: usize,
}

impl AppState {
    pub fn new(model: Option<Arc<RecommendationModel>>, default_top_n: usize) -> Self {
        Self {
            model,
            default_top_n,
        }
    }

    /// The loaded model, or the "model not built" error
    pub(crate) fn model(&self) -> Result<&Arc<RecommendationModel>, crate::error::AppError> {
        self.model.as_ref().ok_or(crate::error::AppError::ModelNotBuilt)
    }
}

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes(state))
        // Layers run outermost-last: request ids are assigned before the
        // trace span is created so the span can carry them
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
}

/// API routes under /api/v1
fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/recommendations", get(recommendations::recommend))
        .route("/movies", get(movies::list))
        .route("/movies/lookup", get(movies::lookup))
        .route("/movies/random", get(movies::random))
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
