//! Form endpoints.
//!
//! The page drives the whole lifecycle through four calls:
//! - `POST /api/form/open` — mount a fresh draft (per page load)
//! - `GET /api/form` — current snapshot
//! - `PATCH /api/form/field` — one field edit
//! - `POST /api/form/submit` — validate, send to the records service

use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::form::{Field, FormError, FormView, SubmitStep};

#[derive(Deserialize)]
pub struct OpenFormRequest {
    /// Patient id carried by the page route, e.g. `/addHealthInfo/P7`.
    pub patient_id: Option<String>,
}

/// `POST /api/form/open` — replace any previous form with a fresh one.
pub async fn open(
    State(ctx): State<ApiContext>,
    Json(req): Json<OpenFormRequest>,
) -> Result<Json<FormView>, ApiError> {
    let view = ctx.core.open_form(req.patient_id)?;
    tracing::debug!(draft_id = %view.draft_id, "Form opened");
    Ok(Json(view))
}

/// `GET /api/form` — snapshot of the open form for rendering.
pub async fn view(State(ctx): State<ApiContext>) -> Result<Json<FormView>, ApiError> {
    let session = ctx.core.session_snapshot()?;
    let guard = ctx.core.lock_form()?;
    let form = guard.as_ref().ok_or(FormError::NotOpen)?;
    Ok(Json(form.view(&session)))
}

#[derive(Deserialize)]
pub struct FieldUpdate {
    /// Wire name of the field, e.g. `pulseRate`.
    pub field: String,
    /// Raw input text; parsing happens server-side.
    pub value: String,
}

/// `PATCH /api/form/field` — apply one edit to the draft.
pub async fn update_field(
    State(ctx): State<ApiContext>,
    Json(req): Json<FieldUpdate>,
) -> Result<Json<FormView>, ApiError> {
    let field =
        Field::from_str(&req.field).ok_or_else(|| FormError::UnknownField(req.field.clone()))?;

    let session = ctx.core.session_snapshot()?;
    let mut guard = ctx.core.lock_form()?;
    let form = guard.as_mut().ok_or(FormError::NotOpen)?;
    form.draft.apply(field, &req.value);
    Ok(Json(form.view(&session)))
}

/// `POST /api/form/submit` — validate the draft and send it.
///
/// The form lock is never held across the gateway call. The draft id
/// captured at dispatch decides whether the completion still belongs
/// to the open form; a completion for a replaced form is dropped.
pub async fn submit(State(ctx): State<ApiContext>) -> Result<Json<FormView>, ApiError> {
    let session = ctx.core.session_snapshot()?;

    let (draft_id, reading) = {
        let mut guard = ctx.core.lock_form()?;
        let form = guard.as_mut().ok_or(FormError::NotOpen)?;
        match form.begin_submit(&session)? {
            SubmitStep::Dispatch(reading) => (form.draft_id, reading),
            SubmitStep::Rejected => return Ok(Json(form.view(&session))),
        }
    };

    tracing::info!(%draft_id, patient_id = %reading.patient_id, "Submitting reading");
    let result = ctx.gateway.add_reading(&reading).await;

    // Session may have changed while the request was in flight
    let session = ctx.core.session_snapshot()?;
    let mut guard = ctx.core.lock_form()?;
    let form = guard.as_mut().ok_or(FormError::NotOpen)?;

    if form.draft_id != draft_id {
        tracing::warn!(%draft_id, "Dropping completion for a replaced form");
        return Ok(Json(form.view(&session)));
    }

    match result {
        Ok(echo) => {
            tracing::info!(%draft_id, "Reading accepted");
            form.record_success(echo);
        }
        Err(err) => {
            tracing::warn!(%draft_id, error = %err, "Submission failed");
            form.record_failure(err.to_string());
        }
    }

    Ok(Json(form.view(&session)))
}
