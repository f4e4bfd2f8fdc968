//! Form router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//!
//! Pages:
//! - `GET /` and `GET /addHealthInfo[/{patient_id}]` — the form
//! - `GET /healthInfo/{patient_id}` — post-save confirmation
//!
//! JSON endpoints under `/api/` (all responses `Cache-Control: no-store`):
//! health, form open/view/field/submit, session get/put.

use std::sync::Arc;

use axum::http::{header, HeaderValue};
use axum::routing::{get, patch, post};
use axum::Router;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::api::endpoints;
use crate::api::types::ApiContext;
use crate::core_state::CoreState;
use crate::gateway::RecordsGateway;

/// Build the full router: embedded pages plus the `/api/` endpoints.
pub fn form_router(core: Arc<CoreState>, gateway: Arc<RecordsGateway>) -> Router {
    build_router(ApiContext::new(core, gateway))
}

fn build_router(ctx: ApiContext) -> Router {
    // Form state is draft data; no response may end up in a shared cache.
    // NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
    let api = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/form/open", post(endpoints::form::open))
        .route("/form", get(endpoints::form::view))
        .route("/form/field", patch(endpoints::form::update_field))
        .route("/form/submit", post(endpoints::form::submit))
        .route(
            "/session",
            get(endpoints::session::current).put(endpoints::session::replace),
        )
        .with_state(ctx)
        .layer(SetResponseHeaderLayer::if_not_present(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ));

    let pages = Router::new()
        .route("/", get(endpoints::pages::form_page))
        .route("/addHealthInfo", get(endpoints::pages::form_page))
        .route(
            "/addHealthInfo/:patient_id",
            get(endpoints::pages::form_page),
        )
        .route(
            "/healthInfo/:patient_id",
            get(endpoints::pages::confirmation_page),
        );

    Router::new().nest("/api", api).merge(pages)
}
