use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use scheme_finder::schemes::domain::SchemeId;
use scheme_finder::schemes::saved::{
    LocalSavedSchemes, RemoteSavedSchemes, SavedScheme, SavedSchemesService, StoreError, UserId,
};
use scheme_finder::schemes::{
    scheme_router, EligibilityEngine, FilterCache, Normalizer, SchemeCatalog, SchemeFinderService,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

const BUNDLED: &str = include_str!("../../../data/schemes.json");

/// Remote store that is always offline, forcing the local fallback.
struct OfflineRemote;

#[async_trait]
impl RemoteSavedSchemes for OfflineRemote {
    async fn list(&self, _user: &UserId) -> Result<Vec<SavedScheme>, StoreError> {
        Err(StoreError::Unavailable("offline".to_string()))
    }

    async fn insert(&self, _user: &UserId, _scheme: SavedScheme) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("offline".to_string()))
    }

    async fn delete(&self, _user: &UserId, _scheme_id: &SchemeId) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("offline".to_string()))
    }
}

#[derive(Default)]
struct DeviceStore {
    lists: Mutex<HashMap<String, Vec<SavedScheme>>>,
}

#[async_trait]
impl LocalSavedSchemes for DeviceStore {
    async fn load(&self, namespace: &str) -> Result<Vec<SavedScheme>, StoreError> {
        let lists = self
            .lists
            .lock()
            .map_err(|_| StoreError::Unavailable("poisoned".to_string()))?;
        Ok(lists.get(namespace).cloned().unwrap_or_default())
    }

    async fn persist(&self, namespace: &str, schemes: &[SavedScheme]) -> Result<(), StoreError> {
        let mut lists = self
            .lists
            .lock()
            .map_err(|_| StoreError::Unavailable("poisoned".to_string()))?;
        lists.insert(namespace.to_string(), schemes.to_vec());
        Ok(())
    }
}

fn app() -> axum::Router {
    let (catalog, _) = SchemeCatalog::from_reader(BUNDLED.as_bytes(), &Normalizer::default())
        .expect("bundled dataset loads");
    let saved = SavedSchemesService::new(Arc::new(OfflineRemote), Arc::new(DeviceStore::default()));
    let service = SchemeFinderService::new(
        catalog,
        EligibilityEngine::default(),
        FilterCache::new(4),
        saved,
    );
    scheme_router(Arc::new(service))
}

async fn read_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), 512 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json payload")
}

async fn send(router: &axum::Router, request: Request<Body>) -> Response {
    router
        .clone()
        .oneshot(request)
        .await
        .expect("route executes")
}

#[tokio::test]
async fn shared_link_query_filters_the_bundled_catalog() {
    let router = app();

    let response = send(
        &router,
        Request::get("/api/v1/schemes?states=Kerala,Delhi&q=month")
            .body(Body::empty())
            .expect("request"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let payload = read_json(response).await;
    assert_eq!(payload["total"], 1);
    assert_eq!(payload["schemes"][0]["scheme_id"], "delhi-widow-pension");
}

#[tokio::test]
async fn per_scheme_assessment_explains_the_exclusion() {
    let router = app();
    let profile = json!({
        "gender": "Female",
        "age": "65",
        "maritalStatus": "Widowed",
        "state": "Delhi",
        "residenceType": "Urban",
        "isBPL": "Yes"
    });

    let response = send(
        &router,
        Request::post("/api/v1/schemes/delhi-widow-pension/eligibility")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(profile.to_string()))
            .expect("request"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let payload = read_json(response).await;
    assert_eq!(payload["eligible"], false);
    assert_eq!(payload["exclusion"]["reason"], "age_out_of_range");
    assert_eq!(payload["exclusion"]["age"], 65);
}

#[tokio::test]
async fn signed_in_saves_fall_back_to_the_device_store_when_offline() {
    let router = app();

    let response = send(
        &router,
        Request::put("/api/v1/saved/pm-kisan")
            .header("x-user-id", "farmer-7")
            .body(Body::empty())
            .expect("request"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = send(
        &router,
        Request::get("/api/v1/saved")
            .header("x-user-id", "farmer-7")
            .body(Body::empty())
            .expect("request"),
    )
    .await;
    let payload = read_json(response).await;
    assert_eq!(payload["total"], 1);
    assert_eq!(payload["schemes"][0]["scheme_id"], "pm-kisan");

    let response = send(
        &router,
        Request::delete("/api/v1/saved/pm-kisan")
            .header("x-user-id", "farmer-7")
            .body(Body::empty())
            .expect("request"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(
        &router,
        Request::get("/api/v1/saved/pm-kisan")
            .header("x-user-id", "farmer-7")
            .body(Body::empty())
            .expect("request"),
    )
    .await;
    let payload = read_json(response).await;
    assert_eq!(payload["saved"], false);
}
