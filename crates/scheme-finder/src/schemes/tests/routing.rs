use super::common::*;
use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, Request, StatusCode};
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

use crate::schemes::router::{self, USER_HEADER};
use crate::schemes::saved::tests::common::{MemoryLocal, MemoryRemote};

#[tokio::test]
async fn scheme_handler_returns_not_found_payload() {
    let (service, _, _) = build_service();

    let response = router::scheme_handler::<MemoryRemote, MemoryLocal>(
        State(Arc::new(service)),
        Path("missing".to_string()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let payload = read_json_body(response).await;
    assert_eq!(payload["error"], "scheme not found");
    assert_eq!(payload["scheme_id"], "missing");
}

#[tokio::test]
async fn search_route_decodes_selection_and_paginates() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(
            Request::get("/api/v1/schemes?categories=Education%2520%2526%2520Learning&per_page=1")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["total"], 1);
    assert_eq!(payload["per_page"], 1);
    assert_eq!(payload["schemes"][0]["scheme_id"], "nsp-girls");
}

#[tokio::test]
async fn search_route_returns_empty_page_when_nothing_matches() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(
            Request::get("/api/v1/schemes?states=Goa&q=loan")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["total"], 0);
    assert_eq!(payload["schemes"], json!([]));
}

#[tokio::test]
async fn eligibility_route_rejects_unknown_strategy() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(
            Request::post("/api/v1/eligibility?strategy=lenient")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(kerala_fisher_profile().to_string()))
                .expect("request"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn eligibility_route_rejects_malformed_numbers() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(
            Request::post("/api/v1/eligibility")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({"age": "thirty"}).to_string()))
                .expect("request"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn eligibility_route_reports_scores_for_scored_strategy() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(
            Request::post("/api/v1/eligibility?strategy=scored")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(kerala_fisher_profile().to_string()))
                .expect("request"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["strategy"], "scored");
    assert_eq!(payload["evaluated"], 5);
    let scores = payload["scores"].as_array().expect("scores listed");
    assert_eq!(scores.len(), payload["total"].as_u64().unwrap_or_default() as usize);
}

#[tokio::test]
async fn strict_eligibility_route_omits_scores() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(
            Request::post("/api/v1/eligibility")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(kerala_fisher_profile().to_string()))
                .expect("request"),
        )
        .await
        .expect("route executes");

    let payload = read_json_body(response).await;
    assert_eq!(payload["strategy"], "strict");
    assert_eq!(payload["total"], 1);
    assert_eq!(payload["schemes"][0]["scheme_id"], "kerala-fisher");
    assert!(payload.get("scores").is_none());
}

#[tokio::test]
async fn saved_routes_track_user_selection() {
    let (service, remote, _) = build_service();
    let router = router_with_service(service);

    let put = || {
        Request::put("/api/v1/saved/pm-kisan")
            .header(USER_HEADER, "user-42")
            .body(Body::empty())
            .expect("request")
    };

    let first = router.clone().oneshot(put()).await.expect("route executes");
    assert_eq!(first.status(), StatusCode::CREATED);
    let payload = read_json_body(first).await;
    assert_eq!(payload["outcome"], "saved");
    assert_eq!(payload["store"], "remote");

    let second = router.clone().oneshot(put()).await.expect("route executes");
    assert_eq!(second.status(), StatusCode::OK);
    assert_eq!(read_json_body(second).await["outcome"], "already_saved");

    let status = router
        .clone()
        .oneshot(
            Request::get("/api/v1/saved/pm-kisan")
                .header(USER_HEADER, "user-42")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("route executes");
    assert_eq!(
        read_json_body(status).await,
        json!({"scheme_id": "pm-kisan", "saved": true})
    );

    let anonymous = router
        .oneshot(
            Request::get("/api/v1/saved")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("route executes");
    assert_eq!(read_json_body(anonymous).await["total"], 0);
    assert_eq!(remote.entries_for(&crate::schemes::saved::UserId("user-42".into())).len(), 1);
}

#[tokio::test]
async fn saving_unknown_scheme_returns_not_found() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(
            Request::put("/api/v1/saved/missing")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn saved_routes_report_unavailable_stores() {
    let (service, _, _) = build_service_with(MemoryRemote::failing(), MemoryLocal::failing());
    let router = router_with_service(service);

    let response = router
        .oneshot(
            Request::delete("/api/v1/saved/pm-kisan")
                .header(USER_HEADER, "user-42")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn browse_routes_list_states_and_ministries() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);

    let states = router
        .clone()
        .oneshot(
            Request::get("/api/v1/states")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("route executes");
    let states = read_json_body(states).await;
    assert_eq!(states["central_count"], 3);
    assert_eq!(states["states"][0]["name"], "Kerala");

    let ministries = router
        .oneshot(
            Request::get("/api/v1/ministries")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("route executes");
    let ministries = read_json_body(ministries).await;
    assert_eq!(ministries["ministries"].as_array().map(Vec::len), Some(3));
}
