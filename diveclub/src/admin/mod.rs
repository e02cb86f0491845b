//! Generic admin console: a JSON API per record type, documented with
//! OpenAPI and browsable through Scalar at `/admin/docs`.
//!
//! Each record type is described once by an [`AdminResource`]
//! implementation; the handlers, routes and schema entries are generated from
//! it.

use axum::Json;
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};
use utoipa_axum::router::OpenApiRouter;

use crate::AppState;

pub mod handlers;
pub mod resource;
pub mod resources;

pub use resource::{AdminResource, ResourceInfo};
pub use resources::{DiveAdmin, EquipmentAdmin, MemberAdmin};

handlers::admin_api!(
    members,
    crate::admin::resources::MemberAdmin,
    crate::entities::member::Model,
    crate::operations::members::MemberPayload,
    "members"
);
handlers::admin_api!(
    dives,
    crate::admin::resources::DiveAdmin,
    crate::admin::resources::DiveAdminRow,
    crate::operations::dives::DivePayload,
    "dives"
);
handlers::admin_api!(
    equipment,
    crate::admin::resources::EquipmentAdmin,
    crate::admin::resources::EquipmentAdminRow,
    crate::operations::equipment::EquipmentPayload,
    "equipment"
);

pub const DOCS_PATH: &str = "/admin/docs";

#[derive(OpenApi)]
#[openapi(
    info(title = "Dive club admin API", description = "Record management for members, dives and equipment."),
    components(schemas(ResourceInfo, AdminIndex))
)]
pub struct AdminApiDoc;

/// The admin API with its OpenAPI document, mounted under `/admin/api`.
#[must_use]
pub fn api_router() -> OpenApiRouter<AppState> {
    OpenApiRouter::with_openapi(AdminApiDoc::openapi())
        .nest("/admin/api/members", members::router())
        .nest("/admin/api/dives", dives::router())
        .nest("/admin/api/equipment", equipment::router())
}

/// Body of `GET /admin/`.
#[derive(Debug, Serialize, ToSchema)]
pub struct AdminIndex {
    pub resources: Vec<ResourceInfo>,
    pub docs: &'static str,
}

/// Registered resources and their configuration.
pub async fn index() -> Json<AdminIndex> {
    Json(AdminIndex {
        resources: vec![MemberAdmin::describe(), DiveAdmin::describe(), EquipmentAdmin::describe()],
        docs: DOCS_PATH,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_index_lists_every_resource() {
        let Json(index) = index().await;
        let names: Vec<_> = index.resources.iter().map(|info| info.name).collect();
        assert_eq!(names, vec!["members", "dives", "equipment"]);
        assert_eq!(index.docs, "/admin/docs");
    }

    #[test]
    fn test_openapi_document_has_admin_info() {
        let (_, api) = api_router().split_for_parts();
        assert_eq!(api.info.title, "Dive club admin API");
        assert!(!api.paths.paths.is_empty());
    }
}
