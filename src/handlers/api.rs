use crate::{
    error::RegistryError,
    models::{CreatedLink, LinkRecord},
    AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLinkRequest {
    url: String,
    #[serde(default)]
    custom_slug: Option<String>,
}

/// JSON error body: `{"error": "..."}`.
pub struct ApiError(RegistryError);

impl From<RegistryError> for ApiError {
    fn from(e: RegistryError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if !self.0.is_user_error() {
            tracing::error!("API storage error: {:?}", self.0);
        }
        (self.0.status(), Json(json!({ "error": self.0.user_message() }))).into_response()
    }
}

/// GET /api/links
pub async fn list_links(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<LinkRecord>>, ApiError> {
    Ok(Json(state.registry.list()?))
}

/// POST /api/links
pub async fn create_link(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateLinkRequest>,
) -> Result<(StatusCode, Json<CreatedLink>), ApiError> {
    let record = state
        .registry
        .create(&req.url, req.custom_slug.as_deref())?;
    Ok((
        StatusCode::CREATED,
        Json(CreatedLink::from_record(&record, &state.config.base_url)),
    ))
}

/// DELETE /api/links/:slug
pub async fn delete_link(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<StatusCode, ApiError> {
    if state.registry.delete(&slug)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Ok(StatusCode::NOT_FOUND)
    }
}
