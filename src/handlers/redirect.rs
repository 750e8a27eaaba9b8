use crate::{
    navigator::{self, HttpNavigator},
    AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

/// GET /:slug
///
/// Resolve the slug, count the visit and redirect to the stored URL. Unknown
/// slugs (or an empty registry) go to the not-found indicator on the home
/// page instead.
pub async fn redirect(State(state): State<Arc<AppState>>, Path(slug): Path<String>) -> Response {
    match navigator::follow(&state.resolver, &slug, &HttpNavigator) {
        Ok(response) => response,
        Err(e) => {
            tracing::error!("Storage error resolving slug '{}': {:?}", slug, e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal error").into_response()
        }
    }
}
