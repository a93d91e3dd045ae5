//! Preview server
//!
//! Serves the preview route the builder loads into its frame, plus two
//! read-only JSON endpoints over the catalog.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;

use crate::catalog::Catalog;
use crate::preview::{render_preview, PreviewError, PreviewQuery, PREVIEW_PATH};
use crate::render::Renderer;
use crate::resolver::{fingerprint, BlueprintResolver, ResolveError};

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub renderer: Arc<Renderer>,
}

struct ApiError(StatusCode, String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.0, Json(json!({ "error": self.1 }))).into_response()
    }
}

impl From<PreviewError> for ApiError {
    fn from(err: PreviewError) -> Self {
        let status = match &err {
            PreviewError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
            PreviewError::Resolve(ResolveError::UnknownIndustry(_)) => StatusCode::NOT_FOUND,
            _ => StatusCode::BAD_REQUEST,
        };
        ApiError(status, err.to_string())
    }
}

impl From<ResolveError> for ApiError {
    fn from(err: ResolveError) -> Self {
        let status = match &err {
            ResolveError::UnknownIndustry(_) => StatusCode::NOT_FOUND,
            ResolveError::UnknownTemplateFamily { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        ApiError(status, err.to_string())
    }
}

async fn preview(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Html<String>, ApiError> {
    let query = PreviewQuery::from_pairs(params)?;
    let html = render_preview(&state.catalog, &state.renderer, &query)?;
    tracing::debug!(
        industry = %query.industry,
        sections = query.blueprint.as_ref().map(Vec::len),
        "Preview rendered"
    );
    Ok(Html(html))
}

async fn list_industries(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!(state.catalog.industries.summaries()))
}

async fn resolve_industry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let sections = BlueprintResolver::new(&state.catalog).resolve(&id)?;
    let fingerprint = fingerprint(&sections)
        .map_err(|e| ApiError(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    Ok(Json(json!({
        "industry": id,
        "fingerprint": fingerprint,
        "sections": sections,
    })))
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(PREVIEW_PATH, get(preview))
        .route("/api/industries", get(list_industries))
        .route("/api/industries/:id/resolve", get(resolve_industry))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, state: AppState) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "Preview server listening");
    axum::serve(listener, router(state)).await
}
