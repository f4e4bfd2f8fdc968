//! Health check endpoint.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub form_open: bool,
    pub version: &'static str,
}

/// `GET /api/health` — liveness check for the page.
pub async fn check(
    State(ctx): State<ApiContext>,
) -> Result<Json<HealthResponse>, ApiError> {
    let form_open = ctx.core.lock_form()?.is_some();

    Ok(Json(HealthResponse {
        status: "ok",
        form_open,
        version: crate::config::APP_VERSION,
    }))
}
