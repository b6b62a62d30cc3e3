use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::error;
use serde::Deserialize;

use crate::analyzers::collection::CollectionAnalyzer;
use crate::analyzers::tracks::TrackAnalyzer;
use crate::config::CACHE_CONTROL;
use crate::discogs::CollectionFetch;
use crate::normalize::record::RecordNormalizer;
use crate::server::AppState;
use crate::tracks::filter::TrackQuery;
use crate::tracks::TrackFilter;
use crate::VinylError;

#[derive(Debug, Default, Deserialize)]
pub struct CollectionQuery {
    pub username: Option<String>,
}

/// Plain-text error responses: upstream failures keep their status and
/// body, a missing username is a 400, anything else a 500.
#[derive(Debug)]
pub struct ApiError(pub VinylError);

impl From<VinylError> for ApiError {
    fn from(err: VinylError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.0 {
            VinylError::Upstream { status, body } => {
                let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
                (status, body).into_response()
            }
            VinylError::MissingUsername => {
                (StatusCode::BAD_REQUEST, VinylError::MissingUsername.to_string()).into_response()
            }
            other => {
                error!("Request failed: {}", other);
                (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()).into_response()
            }
        }
    }
}

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "vinyl-stats",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn fetch_collection(state: &AppState, query: &CollectionQuery) -> Result<CollectionFetch, ApiError> {
    let username = query
        .username
        .as_deref()
        .filter(|u| !u.is_empty())
        .ok_or(VinylError::MissingUsername)?;
    let fetcher = state.fetcher.as_ref().ok_or(VinylError::MissingToken)?;
    Ok(fetcher.fetch_all(username).await?)
}

/// `GET /discogs-collection?username=`
pub async fn collection(
    State(state): State<AppState>,
    Query(query): Query<CollectionQuery>,
) -> Result<Response, ApiError> {
    let fetch = fetch_collection(&state, &query).await?;
    Ok(([(header::CACHE_CONTROL, CACHE_CONTROL)], Json(fetch.releases)).into_response())
}

/// `GET /discogs-collection/stats?username=`
pub async fn collection_stats(
    State(state): State<AppState>,
    Query(query): Query<CollectionQuery>,
) -> Result<Response, ApiError> {
    let fetch = fetch_collection(&state, &query).await?;
    let records = RecordNormalizer::normalize_releases(&fetch.releases);
    let stats = CollectionAnalyzer::new().analyze(&records);
    Ok(([(header::CACHE_CONTROL, CACHE_CONTROL)], Json(stats)).into_response())
}

/// `GET /tracks?ymin=&ymax=&dmax=&art=&lab=`
pub async fn tracks(State(state): State<AppState>, Query(query): Query<TrackQuery>) -> Response {
    let Some(data) = state.tracks.as_ref() else {
        return (StatusCode::NOT_FOUND, "No track dataset loaded").into_response();
    };

    let filter = TrackFilter::from_query(&query, &data.defaults);
    let filtered = filter.apply(&data.tracks);
    let summary = TrackAnalyzer::new().summarize(&filtered);

    Json(serde_json::json!({
        "filter": filter,
        "summary": summary,
    }))
    .into_response()
}
