//! HTTP query API over the published index.
//!
//! Every handler takes one index snapshot up front, so a reload landing
//! mid-request never mixes two catalogs in one response.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use eir_core::{FacetFilter, FacetKind, IngestReport, Part, SearchHit};
use serde::{Deserialize, Serialize};

use crate::reload::Reloader;

// ---------------------------------------------------------------------------
// State and errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct AppState {
    pub reloader: Arc<Reloader>,
}

impl AppState {
    pub fn new(reloader: Arc<Reloader>) -> Self {
        Self { reloader }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("part {0:?} not found")]
    PartNotFound(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("reload failed: {0}")]
    Reload(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::PartNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Reload(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(ErrorBody { error: self.to_string() })).into_response()
    }
}

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

/// A search result on the wire: the part plus its score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredPart {
    pub score: f64,
    pub part: Part,
}

impl From<SearchHit<'_>> for ScoredPart {
    fn from(hit: SearchHit<'_>) -> Self {
        Self { score: hit.score, part: hit.part.clone() }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    pub provider: Option<String>,
    pub machine: Option<String>,
    pub service: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    pub query: String,
    /// Matches before `limit` was applied.
    pub total: usize,
    pub hits: Vec<ScoredPart>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FacetsResponse {
    pub providers: Vec<String>,
    pub machines: Vec<String>,
    pub services: Vec<String>,
    pub records: usize,
    pub built_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SuggestParams {
    #[serde(default)]
    pub q: String,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/parts", get(list_parts))
        .route("/api/parts/{id}", get(get_part))
        .route("/api/search", get(search))
        .route("/api/facets", get(facets))
        .route("/api/facets/{kind}", get(suggest))
        .route("/api/reload", post(reload))
        .with_state(state)
}

/// Bind `addr` and serve until ctrl-c.
pub async fn serve(state: AppState, addr: &str) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "HTTP API listening");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutting down");
        })
        .await?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn list_parts(State(state): State<AppState>) -> Json<Vec<Part>> {
    Json(state.reloader.handle().snapshot().parts().to_vec())
}

async fn get_part(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Part>, ApiError> {
    let index = state.reloader.handle().snapshot();
    index
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or(ApiError::PartNotFound(id))
}

async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Json<SearchResponse> {
    let index = state.reloader.handle().snapshot();
    let filter = FacetFilter {
        provider: params.provider,
        machine: params.machine,
        service: params.service,
    };
    let hits = index.search_filtered(&params.q, &filter);
    let total = hits.len();
    let limit = params.limit.unwrap_or(usize::MAX);
    Json(SearchResponse {
        query: params.q,
        total,
        hits: hits.into_iter().take(limit).map(ScoredPart::from).collect(),
    })
}

async fn facets(State(state): State<AppState>) -> Json<FacetsResponse> {
    let index = state.reloader.handle().snapshot();
    Json(FacetsResponse {
        providers: index.distinct_providers(),
        machines: index.distinct_machines(),
        services: index.distinct_services(),
        records: index.len(),
        built_at: index.built_at(),
    })
}

async fn suggest(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Query(params): Query<SuggestParams>,
) -> Result<Json<Vec<String>>, ApiError> {
    let kind: FacetKind = kind.parse().map_err(ApiError::BadRequest)?;
    let index = state.reloader.handle().snapshot();
    Ok(Json(index.facets().suggest(kind, &params.q)))
}

async fn reload(State(state): State<AppState>) -> Result<Json<IngestReport>, ApiError> {
    state
        .reloader
        .reload()
        .await
        .map(Json)
        .map_err(|error| ApiError::Reload(format!("{error:#}")))
}
