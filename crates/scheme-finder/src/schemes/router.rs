use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::eligibility::{EligibilityProfile, EligibilityStrategy};
use super::filter::from_pairs;
use super::saved::{LocalSavedSchemes, RemoteSavedSchemes, SaveOutcome, UserId};
use super::service::{SchemeFinderService, SchemeServiceError};

/// Header carrying the signed-in identity; absent means anonymous.
pub const USER_HEADER: &str = "x-user-id";

/// Router builder exposing catalog, eligibility and saved-scheme endpoints.
pub fn scheme_router<R, L>(service: Arc<SchemeFinderService<R, L>>) -> Router
where
    R: RemoteSavedSchemes + 'static,
    L: LocalSavedSchemes + 'static,
{
    Router::new()
        .route("/api/v1/schemes", get(search_handler::<R, L>))
        .route("/api/v1/schemes/:scheme_id", get(scheme_handler::<R, L>))
        .route(
            "/api/v1/schemes/:scheme_id/eligibility",
            post(assessment_handler::<R, L>),
        )
        .route("/api/v1/facets", get(facets_handler::<R, L>))
        .route("/api/v1/states", get(states_handler::<R, L>))
        .route("/api/v1/ministries", get(ministries_handler::<R, L>))
        .route("/api/v1/eligibility", post(eligibility_handler::<R, L>))
        .route("/api/v1/saved", get(saved_list_handler::<R, L>))
        .route(
            "/api/v1/saved/:scheme_id",
            get(saved_status_handler::<R, L>)
                .put(save_handler::<R, L>)
                .delete(unsave_handler::<R, L>),
        )
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct StrategyParams {
    strategy: Option<String>,
}

impl StrategyParams {
    fn parse(&self) -> Result<Option<EligibilityStrategy>, Response> {
        match self.strategy.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(name) => EligibilityStrategy::from_name(name).map(Some).ok_or_else(|| {
                let payload = json!({
                    "error": format!("unknown eligibility strategy '{name}'"),
                });
                (StatusCode::BAD_REQUEST, Json(payload)).into_response()
            }),
        }
    }
}

fn user_from_headers(headers: &HeaderMap) -> Option<UserId> {
    headers
        .get(USER_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(UserId::parse)
}

fn page_param(pairs: &[(String, String)], key: &str) -> Option<usize> {
    pairs
        .iter()
        .rev()
        .find(|(name, _)| name == key)
        .and_then(|(_, value)| value.trim().parse().ok())
}

fn error_response(error: SchemeServiceError) -> Response {
    match error {
        SchemeServiceError::NotFound(scheme_id) => {
            let payload = json!({
                "error": "scheme not found",
                "scheme_id": scheme_id.as_str(),
            });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
        SchemeServiceError::Saved(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::SERVICE_UNAVAILABLE, Json(payload)).into_response()
        }
    }
}

pub(crate) async fn search_handler<R, L>(
    State(service): State<Arc<SchemeFinderService<R, L>>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Response
where
    R: RemoteSavedSchemes + 'static,
    L: LocalSavedSchemes + 'static,
{
    let selection = from_pairs(pairs.iter().map(|(key, value)| (key.as_str(), value.as_str())));
    let page = service.search_page(
        &selection,
        page_param(&pairs, "page"),
        page_param(&pairs, "per_page"),
    );
    (StatusCode::OK, Json(page)).into_response()
}

pub(crate) async fn scheme_handler<R, L>(
    State(service): State<Arc<SchemeFinderService<R, L>>>,
    Path(scheme_id): Path<String>,
) -> Response
where
    R: RemoteSavedSchemes + 'static,
    L: LocalSavedSchemes + 'static,
{
    match service.scheme(&scheme_id) {
        Ok(scheme) => (StatusCode::OK, Json(scheme)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn facets_handler<R, L>(
    State(service): State<Arc<SchemeFinderService<R, L>>>,
) -> Response
where
    R: RemoteSavedSchemes + 'static,
    L: LocalSavedSchemes + 'static,
{
    (StatusCode::OK, Json(service.facets())).into_response()
}

pub(crate) async fn states_handler<R, L>(
    State(service): State<Arc<SchemeFinderService<R, L>>>,
) -> Response
where
    R: RemoteSavedSchemes + 'static,
    L: LocalSavedSchemes + 'static,
{
    let payload = json!({
        "central_count": service.catalog().schemes().iter().filter(|scheme| scheme.is_central()).count(),
        "states": service.states(),
    });
    (StatusCode::OK, Json(payload)).into_response()
}

pub(crate) async fn ministries_handler<R, L>(
    State(service): State<Arc<SchemeFinderService<R, L>>>,
) -> Response
where
    R: RemoteSavedSchemes + 'static,
    L: LocalSavedSchemes + 'static,
{
    let payload = json!({
        "ministries": service.ministries(),
    });
    (StatusCode::OK, Json(payload)).into_response()
}

pub(crate) async fn eligibility_handler<R, L>(
    State(service): State<Arc<SchemeFinderService<R, L>>>,
    Query(params): Query<StrategyParams>,
    Json(profile): Json<EligibilityProfile>,
) -> Response
where
    R: RemoteSavedSchemes + 'static,
    L: LocalSavedSchemes + 'static,
{
    let strategy = match params.parse() {
        Ok(strategy) => strategy,
        Err(response) => return response,
    };

    let outcome = service.eligibility(&profile, strategy);
    let mut payload = json!({
        "strategy": outcome.strategy,
        "evaluated": outcome.evaluated,
        "total": outcome.len(),
        "schemes": outcome.schemes(),
    });

    if outcome.strategy == EligibilityStrategy::Scored {
        let scores: Vec<_> = outcome
            .eligible
            .iter()
            .map(|entry| {
                json!({
                    "scheme_id": entry.scheme.scheme_id.as_str(),
                    "score": entry.score,
                    "components": entry.components,
                })
            })
            .collect();
        payload["scores"] = json!(scores);
    }

    (StatusCode::OK, Json(payload)).into_response()
}

pub(crate) async fn assessment_handler<R, L>(
    State(service): State<Arc<SchemeFinderService<R, L>>>,
    Path(scheme_id): Path<String>,
    Query(params): Query<StrategyParams>,
    Json(profile): Json<EligibilityProfile>,
) -> Response
where
    R: RemoteSavedSchemes + 'static,
    L: LocalSavedSchemes + 'static,
{
    let strategy = match params.parse() {
        Ok(strategy) => strategy,
        Err(response) => return response,
    };

    match service.assess(&scheme_id, &profile, strategy) {
        Ok(assessment) => (StatusCode::OK, Json(assessment)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn saved_list_handler<R, L>(
    State(service): State<Arc<SchemeFinderService<R, L>>>,
    headers: HeaderMap,
) -> Response
where
    R: RemoteSavedSchemes + 'static,
    L: LocalSavedSchemes + 'static,
{
    let user = user_from_headers(&headers);
    match service.saved(user.as_ref()).await {
        Ok(saved) => {
            let payload = json!({
                "total": saved.len(),
                "schemes": saved,
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn saved_status_handler<R, L>(
    State(service): State<Arc<SchemeFinderService<R, L>>>,
    Path(scheme_id): Path<String>,
    headers: HeaderMap,
) -> Response
where
    R: RemoteSavedSchemes + 'static,
    L: LocalSavedSchemes + 'static,
{
    let user = user_from_headers(&headers);
    match service.is_saved(user.as_ref(), &scheme_id).await {
        Ok(saved) => {
            let payload = json!({
                "scheme_id": scheme_id.trim(),
                "saved": saved,
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn save_handler<R, L>(
    State(service): State<Arc<SchemeFinderService<R, L>>>,
    Path(scheme_id): Path<String>,
    headers: HeaderMap,
) -> Response
where
    R: RemoteSavedSchemes + 'static,
    L: LocalSavedSchemes + 'static,
{
    let user = user_from_headers(&headers);
    match service.save(user.as_ref(), &scheme_id).await {
        Ok(outcome @ SaveOutcome::Saved { .. }) => {
            (StatusCode::CREATED, Json(outcome)).into_response()
        }
        Ok(outcome @ SaveOutcome::AlreadySaved) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn unsave_handler<R, L>(
    State(service): State<Arc<SchemeFinderService<R, L>>>,
    Path(scheme_id): Path<String>,
    headers: HeaderMap,
) -> Response
where
    R: RemoteSavedSchemes + 'static,
    L: LocalSavedSchemes + 'static,
{
    let user = user_from_headers(&headers);
    match service.unsave(user.as_ref(), &scheme_id).await {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(error) => error_response(error),
    }
}
