use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::{ProfileId, RawProfile};
use super::repository::{CatalogueSource, ProfileRepository, RepositoryError};
use super::service::{AssessmentService, AssessmentServiceError};
use crate::pnp::PnpProgram;

/// Profile submitted for an ad hoc computation. `asOf` defaults to today (UTC).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentRequest {
    pub profile: RawProfile,
    #[serde(default)]
    pub as_of: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramMatchRequest {
    pub profile: RawProfile,
    #[serde(default)]
    pub as_of: Option<NaiveDate>,
    /// Overrides the configured catalogue when present.
    #[serde(default)]
    pub catalogue: Option<Vec<PnpProgram>>,
}

/// Router builder exposing the scoring, eligibility, and matching endpoints.
pub fn assessment_router<P, C>(service: Arc<AssessmentService<P, C>>) -> Router
where
    P: ProfileRepository + 'static,
    C: CatalogueSource + 'static,
{
    Router::new()
        .route("/api/v1/express-entry/score", post(score_handler::<P, C>))
        .route(
            "/api/v1/express-entry/eligibility",
            post(eligibility_handler::<P, C>),
        )
        .route("/api/v1/pnp/match", post(pnp_match_handler::<P, C>))
        .route(
            "/api/v1/express-entry/profiles/:profile_id/assessment",
            get(assessment_handler::<P, C>),
        )
        .with_state(service)
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

pub(crate) async fn score_handler<P, C>(
    State(service): State<Arc<AssessmentService<P, C>>>,
    payload: Result<axum::Json<AssessmentRequest>, JsonRejection>,
) -> Response
where
    P: ProfileRepository + 'static,
    C: CatalogueSource + 'static,
{
    let request = match payload {
        Ok(axum::Json(request)) => request,
        Err(rejection) => return rejection_response(rejection),
    };
    let as_of = request.as_of.unwrap_or_else(today);
    match service.score(&request.profile, as_of) {
        Ok(breakdown) => (StatusCode::OK, axum::Json(breakdown)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn eligibility_handler<P, C>(
    State(service): State<Arc<AssessmentService<P, C>>>,
    payload: Result<axum::Json<AssessmentRequest>, JsonRejection>,
) -> Response
where
    P: ProfileRepository + 'static,
    C: CatalogueSource + 'static,
{
    let request = match payload {
        Ok(axum::Json(request)) => request,
        Err(rejection) => return rejection_response(rejection),
    };
    let as_of = request.as_of.unwrap_or_else(today);
    match service.eligibility(&request.profile, as_of) {
        Ok(report) => {
            let payload = json!({
                "eligible_programs": report.eligible_programs(),
                "fswp": report.fswp,
                "cec": report.cec,
                "fstp": report.fstp,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn pnp_match_handler<P, C>(
    State(service): State<Arc<AssessmentService<P, C>>>,
    payload: Result<axum::Json<ProgramMatchRequest>, JsonRejection>,
) -> Response
where
    P: ProfileRepository + 'static,
    C: CatalogueSource + 'static,
{
    let request = match payload {
        Ok(axum::Json(request)) => request,
        Err(rejection) => return rejection_response(rejection),
    };
    let as_of = request.as_of.unwrap_or_else(today);
    match service.match_programs(&request.profile, request.catalogue, as_of) {
        Ok(assessments) => {
            let matches: Vec<&str> = assessments
                .iter()
                .filter(|program| program.eligible)
                .map(|program| program.program_id.as_str())
                .collect();
            let payload = json!({
                "matches": matches,
                "programs": assessments,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn assessment_handler<P, C>(
    State(service): State<Arc<AssessmentService<P, C>>>,
    Path(profile_id): Path<String>,
) -> Response
where
    P: ProfileRepository + 'static,
    C: CatalogueSource + 'static,
{
    let id = ProfileId(profile_id);
    match service.assess(&id, today()) {
        Ok(assessment) => (StatusCode::OK, axum::Json(assessment)).into_response(),
        Err(AssessmentServiceError::Repository(RepositoryError::NotFound)) => {
            let payload = json!({
                "error": "profile not found",
                "profile_id": id.0,
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

/// Undecodable bodies share the shape of field-level validation failures.
fn rejection_response(rejection: JsonRejection) -> Response {
    let (status, code) = match &rejection {
        JsonRejection::JsonDataError(_) => (StatusCode::UNPROCESSABLE_ENTITY, "invalid_document"),
        JsonRejection::JsonSyntaxError(_) => (StatusCode::UNPROCESSABLE_ENTITY, "malformed_json"),
        other => (other.status(), "unreadable_body"),
    };
    let payload = json!({
        "error": rejection.body_text(),
        "field": "body",
        "reason": { "code": code },
    });
    (status, axum::Json(payload)).into_response()
}

fn error_response(error: AssessmentServiceError) -> Response {
    match error {
        AssessmentServiceError::InvalidInput(invalid) => {
            let payload = json!({
                "error": invalid.to_string(),
                "field": invalid.field,
                "reason": invalid.reason,
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        AssessmentServiceError::Repository(RepositoryError::NotFound) => {
            let payload = json!({
                "error": "record not found",
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        other => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
