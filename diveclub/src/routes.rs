//! The complete HTTP surface: HTML screens, the admin index, the admin API
//! and its Scalar documentation.

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;
use utoipa_scalar::{Scalar, Servable};

use crate::{
    AppState,
    admin::{self, DOCS_PATH},
    views::{dives, equipment, home, members},
};

/// Build the application router.
///
/// HTML paths end in a slash; the admin API paths do not.
pub fn app(state: AppState) -> Router {
    let (admin_api, openapi) = admin::api_router().split_for_parts();

    Router::new()
        .route("/", get(home::home))
        .route("/members/", get(members::list))
        .route("/members/create/", get(members::create_form).post(members::create))
        .route("/members/{id}/", get(members::detail))
        .route("/members/{id}/update/", get(members::update_form).post(members::update))
        .route("/members/{id}/delete/", get(members::delete_confirm).post(members::delete))
        .route("/dives/", get(dives::list))
        .route("/dives/create/", get(dives::create_form).post(dives::create))
        .route("/dives/{id}/", get(dives::detail))
        .route("/dives/{id}/update/", get(dives::update_form).post(dives::update))
        .route("/dives/{id}/delete/", get(dives::delete_confirm).post(dives::delete))
        .route("/equipment/", get(equipment::list))
        .route("/equipment/create/", get(equipment::create_form).post(equipment::create))
        .route("/equipment/{id}/", get(equipment::detail))
        .route("/equipment/{id}/update/", get(equipment::update_form).post(equipment::update))
        .route("/equipment/{id}/delete/", get(equipment::delete_confirm).post(equipment::delete))
        .route("/admin/", get(admin::index))
        .merge(admin_api)
        .with_state(state)
        .merge(Scalar::with_url(DOCS_PATH, openapi))
        .layer(TraceLayer::new_for_http())
}
