use super::common::*;
use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, Request, StatusCode};
use chrono::Days;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use crate::express_entry::router::{
    assessment_handler, score_handler, AssessmentRequest, ProgramMatchRequest,
};

fn post(uri: &str, payload: Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&payload).unwrap()))
        .unwrap()
}

#[tokio::test]
async fn score_handler_returns_breakdown() {
    let service = Arc::new(build_service(MemoryProfiles::default()));

    let response = score_handler::<MemoryProfiles, StandardCatalogue>(
        State(service),
        Ok(axum::Json(AssessmentRequest {
            profile: single_profile(),
            as_of: Some(as_of()),
        })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["total"], 473);
    assert_eq!(body["core"]["subtotal"], 418);
}

#[tokio::test]
async fn score_handler_returns_unprocessable_for_invalid_profile() {
    let service = Arc::new(build_service(MemoryProfiles::default()));
    let mut profile = single_profile();
    profile.language_proficiency.clear();

    let response = score_handler::<MemoryProfiles, StandardCatalogue>(
        State(service),
        Ok(axum::Json(AssessmentRequest {
            profile,
            as_of: Some(as_of()),
        })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = read_json_body(response).await;
    assert_eq!(body["field"], "languageProficiency");
    assert_eq!(body["reason"]["code"], "missing_language_test");
}

#[tokio::test]
async fn unknown_codes_in_the_body_return_structured_errors() {
    let router = router_with_service(build_service(MemoryProfiles::default()));
    let mut profile = serde_json::to_value(single_profile()).unwrap();
    profile["languageProficiency"][0]["test"] = json!("toefl");

    let response = router
        .oneshot(post(
            "/api/v1/express-entry/score",
            json!({ "profile": profile, "asOf": "2025-06-01" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = read_json_body(response).await;
    assert_eq!(body["field"], "body");
    assert_eq!(body["reason"]["code"], "invalid_document");
    assert!(body["error"].as_str().is_some_and(|text| text.contains("toefl")));
}

#[tokio::test]
async fn malformed_json_returns_structured_errors() {
    let router = router_with_service(build_service(MemoryProfiles::default()));
    let request = Request::post("/api/v1/pnp/match")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"profile\": "))
        .unwrap();

    let response = router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = read_json_body(response).await;
    assert_eq!(body["reason"]["code"], "malformed_json");
}

#[tokio::test]
async fn assessment_handler_returns_not_found_for_unknown_profile() {
    let service = Arc::new(build_service(MemoryProfiles::default()));

    let response = assessment_handler::<MemoryProfiles, StandardCatalogue>(
        State(service),
        Path("missing".to_string()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = read_json_body(response).await;
    assert_eq!(body["profile_id"], "missing");
}

#[tokio::test]
async fn eligibility_route_lists_eligible_programs() {
    let router = router_with_service(build_service(MemoryProfiles::default()));

    let response = router
        .oneshot(post(
            "/api/v1/express-entry/eligibility",
            json!({ "profile": single_profile(), "asOf": "2025-06-01" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(
        body["eligible_programs"],
        json!(["federal_skilled_worker", "canadian_experience_class"])
    );
    assert_eq!(body["fstp"]["is_eligible"], false);
}

#[tokio::test]
async fn pnp_match_route_uses_supplied_catalogue() {
    let router = router_with_service(build_service(MemoryProfiles::default()));
    let catalogue = crate::pnp::PnpCatalogue::standard().into_programs();
    let request = ProgramMatchRequest {
        profile: single_profile(),
        as_of: Some(as_of()),
        catalogue: Some(catalogue[..1].to_vec()),
    };

    let response = router
        .oneshot(post(
            "/api/v1/pnp/match",
            serde_json::to_value(&request).unwrap(),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["matches"], json!(["on-001"]));
    assert_eq!(body["programs"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn pnp_match_route_defaults_to_configured_catalogue() {
    let router = router_with_service(build_service(MemoryProfiles::default()));

    let response = router
        .oneshot(post(
            "/api/v1/pnp/match",
            json!({ "profile": single_profile(), "asOf": "2025-06-01" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["matches"], json!(["on-001"]));
    assert_eq!(body["programs"].as_array().map(Vec::len), Some(6));
}

#[tokio::test]
async fn assessment_route_loads_stored_profile() {
    let today = chrono::Utc::now().date_naive();
    let mut profile = single_profile();
    profile.language_proficiency[0].test_date = today - Days::new(30);
    profile.work_experience[0].start_date = today - Days::new(3 * 365 + 30);
    let router = router_with_service(build_service(MemoryProfiles::with("applicant-1", profile)));

    let response = router
        .oneshot(
            Request::get("/api/v1/express-entry/profiles/applicant-1/assessment")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["profile_id"], "applicant-1");
    assert_eq!(body["score"]["total"], 473);
    assert_eq!(body["as_of"], json!(today));
    assert_eq!(body["cutoff"]["draw_number"], 245);
    assert_eq!(body["cutoff"]["cutoff_gap"], -8);
}
