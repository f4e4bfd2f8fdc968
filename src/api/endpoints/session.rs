//! Session endpoints.
//!
//! Stand-in for the hospital's sign-on: the session (token, role,
//! user id) is plain mutable state. The form derives nurse mode and
//! patient identity from it on every render, so a change here shows
//! up on the next `GET /api/form` with no further wiring.

use axum::extract::State;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::session::UserSession;

/// `GET /api/session` — current session.
pub async fn current(State(ctx): State<ApiContext>) -> Result<Json<UserSession>, ApiError> {
    Ok(Json(ctx.core.session_snapshot()?))
}

/// `PUT /api/session` — replace the session wholesale.
pub async fn replace(
    State(ctx): State<ApiContext>,
    Json(next): Json<UserSession>,
) -> Result<Json<UserSession>, ApiError> {
    tracing::debug!(
        is_nurse = next.is_nurse(),
        user_id = next.user_id.as_deref().unwrap_or("-"),
        "Session replaced"
    );
    *ctx.core.write_session()? = next.clone();
    Ok(Json(next))
}
