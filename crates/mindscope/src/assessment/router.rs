use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::cache::ResultsCache;
use super::catalog::AssessmentMode;
use super::service::{AssessmentRequest, AssessmentService, AssessmentServiceError};

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ModeQuery {
    mode: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ShareRequest {
    share_url: Option<String>,
}

/// JSON endpoints for fetching questions, scoring answers and sharing results.
pub fn assessment_router<C>(service: Arc<AssessmentService<C>>) -> Router
where
    C: ResultsCache + 'static,
{
    Router::new()
        .route("/api/questions", get(questions_handler::<C>))
        .route("/api/assess", post(assess_handler::<C>))
        .route("/api/results/latest", get(latest_handler::<C>))
        .route("/api/share", post(share_handler::<C>))
        .with_state(service)
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    let payload = json!({ "error": message.into() });
    (status, Json(payload)).into_response()
}

fn service_error_response(error: AssessmentServiceError) -> Response {
    match error {
        AssessmentServiceError::NoAnswers => {
            error_response(StatusCode::BAD_REQUEST, error.to_string())
        }
        AssessmentServiceError::NoResults => {
            error_response(StatusCode::NOT_FOUND, error.to_string())
        }
        AssessmentServiceError::Cache(_) => {
            error_response(StatusCode::INTERNAL_SERVER_ERROR, error.to_string())
        }
    }
}

pub(crate) async fn questions_handler<C>(
    State(service): State<Arc<AssessmentService<C>>>,
    Query(query): Query<ModeQuery>,
) -> Response
where
    C: ResultsCache + 'static,
{
    let mode = match query.mode.as_deref().map(str::parse::<AssessmentMode>) {
        None => AssessmentMode::Full,
        Some(Ok(mode)) => mode,
        Some(Err(error)) => return error_response(StatusCode::BAD_REQUEST, error.to_string()),
    };

    let set = service.questions(mode, &mut rand::thread_rng());
    (StatusCode::OK, Json(set)).into_response()
}

pub(crate) async fn assess_handler<C>(
    State(service): State<Arc<AssessmentService<C>>>,
    Json(request): Json<AssessmentRequest>,
) -> Response
where
    C: ResultsCache + 'static,
{
    match service.assess(request, &mut rand::thread_rng()) {
        Ok(payload) => (StatusCode::OK, Json(payload)).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn latest_handler<C>(State(service): State<Arc<AssessmentService<C>>>) -> Response
where
    C: ResultsCache + 'static,
{
    match service.latest() {
        Ok(payload) => (StatusCode::OK, Json(payload)).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn share_handler<C>(
    State(service): State<Arc<AssessmentService<C>>>,
    request: Option<Json<ShareRequest>>,
) -> Response
where
    C: ResultsCache + 'static,
{
    let request = request.map(|Json(request)| request).unwrap_or_default();
    match service.share(request.share_url.as_deref(), &mut rand::thread_rng()) {
        Ok(share) => (StatusCode::OK, Json(share)).into_response(),
        Err(error) => service_error_response(error),
    }
}
