//! Generic admin handlers over [`AdminResource`], plus the macro that stamps
//! out documented axum handlers and a router for one resource.

use axum::{Json, http::HeaderMap, http::StatusCode};
use sea_orm::{DatabaseConnection, Order};
use serde::Deserialize;
use utoipa::IntoParams;

use super::resource::AdminResource;
use crate::{
    errors::ApiError,
    filtering::apply_filters,
    pagination::{DEFAULT_PER_PAGE, MAX_PER_PAGE, calculate_content_range, parse_range},
};

/// Query parameters of the admin list endpoints.
///
/// # Filtering
/// `filter` is a JSON object: `q` searches the resource's search fields,
/// `id` takes one id or a list, any list filter column is an exact match.
///
/// # Pagination
/// React-Admin `range=[0,9]`, inclusive on both ends.
///
/// # Sorting
/// `sort=["column","ASC"]`; unknown columns fall back to the default order.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AdminListParams {
    /// JSON filter, for example `{"q": "Jadransko", "location": "Plitvice"}`
    #[param(example = r#"{"q": "Jadransko"}"#)]
    pub filter: Option<String>,
    /// Inclusive row range, for example `[0,9]`
    #[param(example = "[0,9]")]
    pub range: Option<String>,
    /// `["column", "ASC|DESC"]`
    #[param(example = r#"["id", "ASC"]"#)]
    pub sort: Option<String>,
}

/// Resolve a React-Admin sort array against the sortable columns.
///
/// Returns `None` when no usable sort was requested.
pub fn parse_sort<C: Copy>(sort: Option<&str>, columns: &[(&str, C)]) -> Option<(C, Order)> {
    let [column, direction]: [String; 2] = serde_json::from_str(sort?).ok()?;
    let &(_, column) = columns.iter().find(|(name, _)| *name == column)?;
    let order = if direction.eq_ignore_ascii_case("desc") {
        Order::Desc
    } else {
        Order::Asc
    };
    Some((column, order))
}

/// # Errors
///
/// Returns a bad request for a malformed filter and a database error if a
/// query fails.
pub async fn list<R: AdminResource>(
    db: &DatabaseConnection,
    params: &AdminListParams,
) -> Result<(HeaderMap, Json<Vec<R::Row>>), ApiError> {
    let search_fields: Vec<_> = R::search_fields().into_iter().map(|(_, column)| column).collect();
    let condition = apply_filters(params.filter.as_deref(), &search_fields, &R::list_filter(), R::ID_COLUMN)?;
    let (offset, end) = parse_range(params.range.as_deref(), DEFAULT_PER_PAGE);
    let limit = end.saturating_sub(offset).saturating_add(1).min(MAX_PER_PAGE);
    let ordering = parse_sort(params.sort.as_deref(), &R::sortable_columns())
        .map_or_else(R::default_ordering, |requested| vec![requested]);

    let total = R::total_count(db, condition.clone()).await?;
    let items = R::get_all(db, condition, ordering, offset, limit).await?;
    tracing::debug!(
        resource = R::RESOURCE_NAME_PLURAL,
        offset,
        limit,
        total,
        "Admin list"
    );

    let headers = calculate_content_range(offset, limit, total, R::RESOURCE_NAME_PLURAL);
    Ok((headers, Json(items)))
}

/// # Errors
///
/// Returns a not-found error for an unknown id.
pub async fn get_one<R: AdminResource>(db: &DatabaseConnection, id: i32) -> Result<Json<R::Row>, ApiError> {
    R::get_one(db, id).await.map(Json)
}

/// # Errors
///
/// Returns a validation error for an invalid payload.
pub async fn create<R: AdminResource>(
    db: &DatabaseConnection,
    payload: R::Payload,
) -> Result<(StatusCode, Json<R::Row>), ApiError> {
    let row = R::create(db, payload).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// # Errors
///
/// Returns a not-found error for an unknown id or a validation error for an
/// invalid payload.
pub async fn update<R: AdminResource>(
    db: &DatabaseConnection,
    id: i32,
    payload: R::Payload,
) -> Result<Json<R::Row>, ApiError> {
    R::update(db, id, payload).await.map(Json)
}

/// # Errors
///
/// Returns a not-found error for an unknown id.
pub async fn delete<R: AdminResource>(db: &DatabaseConnection, id: i32) -> Result<StatusCode, ApiError> {
    R::delete(db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Generate `list`, `create`, `get_one`, `update` and `delete` axum handlers
/// with OpenAPI annotations for one [`AdminResource`], and a `router()`
/// mounting them at `/` and `/{id}`.
macro_rules! admin_api {
    ($module:ident, $resource:ty, $row:ty, $payload:ty, $tag:literal) => {
        pub mod $module {
            use axum::{
                Json,
                extract::{Path, Query, State},
                http::{HeaderMap, StatusCode},
            };
            use utoipa_axum::{router::OpenApiRouter, routes};

            use super::resource::AdminResource;
            use super::handlers::{self, AdminListParams};
            use crate::{AppState, errors::ApiError};

            #[utoipa::path(
                get,
                path = "/",
                tag = $tag,
                params(AdminListParams),
                responses(
                    (status = axum::http::StatusCode::OK, description = "One page of records; the total is in Content-Range", body = [$row]),
                    (status = axum::http::StatusCode::BAD_REQUEST, description = "Malformed filter"),
                    (status = axum::http::StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error")
                ),
                operation_id = format!("get_all_{}", <$resource as AdminResource>::RESOURCE_NAME_PLURAL),
                summary = format!("List {}", <$resource as AdminResource>::RESOURCE_NAME_PLURAL),
                description = format!(
                    "Lists {} with filtering, sorting and pagination. The total is returned in the `Content-Range` header.\n\n{}",
                    <$resource as AdminResource>::RESOURCE_NAME_PLURAL,
                    <$resource as AdminResource>::RESOURCE_DESCRIPTION
                )
            )]
            pub async fn list_handler(
                State(state): State<AppState>,
                Query(params): Query<AdminListParams>,
            ) -> Result<(HeaderMap, Json<Vec<$row>>), ApiError> {
                handlers::list::<$resource>(&state.db, &params).await
            }

            #[utoipa::path(
                get,
                path = "/{id}",
                tag = $tag,
                params(("id" = i32, Path, description = "Record id")),
                responses(
                    (status = axum::http::StatusCode::OK, description = "The requested record", body = $row),
                    (status = axum::http::StatusCode::NOT_FOUND, description = "Record not found")
                ),
                operation_id = format!("get_one_{}", <$resource as AdminResource>::RESOURCE_NAME_SINGULAR),
                summary = format!("Get one {}", <$resource as AdminResource>::RESOURCE_NAME_SINGULAR)
            )]
            pub async fn get_one_handler(
                State(state): State<AppState>,
                Path(id): Path<i32>,
            ) -> Result<Json<$row>, ApiError> {
                handlers::get_one::<$resource>(&state.db, id).await
            }

            #[utoipa::path(
                post,
                path = "/",
                tag = $tag,
                request_body = $payload,
                responses(
                    (status = axum::http::StatusCode::CREATED, description = "Record created", body = $row),
                    (status = axum::http::StatusCode::UNPROCESSABLE_ENTITY, description = "Validation failed")
                ),
                operation_id = format!("create_one_{}", <$resource as AdminResource>::RESOURCE_NAME_SINGULAR),
                summary = format!("Create one {}", <$resource as AdminResource>::RESOURCE_NAME_SINGULAR)
            )]
            pub async fn create_handler(
                State(state): State<AppState>,
                Json(payload): Json<$payload>,
            ) -> Result<(StatusCode, Json<$row>), ApiError> {
                handlers::create::<$resource>(&state.db, payload).await
            }

            #[utoipa::path(
                put,
                path = "/{id}",
                tag = $tag,
                params(("id" = i32, Path, description = "Record id")),
                request_body = $payload,
                responses(
                    (status = axum::http::StatusCode::OK, description = "Record replaced", body = $row),
                    (status = axum::http::StatusCode::NOT_FOUND, description = "Record not found"),
                    (status = axum::http::StatusCode::UNPROCESSABLE_ENTITY, description = "Validation failed")
                ),
                operation_id = format!("update_one_{}", <$resource as AdminResource>::RESOURCE_NAME_SINGULAR),
                summary = format!("Replace one {}", <$resource as AdminResource>::RESOURCE_NAME_SINGULAR)
            )]
            pub async fn update_handler(
                State(state): State<AppState>,
                Path(id): Path<i32>,
                Json(payload): Json<$payload>,
            ) -> Result<Json<$row>, ApiError> {
                handlers::update::<$resource>(&state.db, id, payload).await
            }

            #[utoipa::path(
                delete,
                path = "/{id}",
                tag = $tag,
                params(("id" = i32, Path, description = "Record id")),
                responses(
                    (status = axum::http::StatusCode::NO_CONTENT, description = "Record deleted"),
                    (status = axum::http::StatusCode::NOT_FOUND, description = "Record not found")
                ),
                operation_id = format!("delete_one_{}", <$resource as AdminResource>::RESOURCE_NAME_SINGULAR),
                summary = format!("Delete one {}", <$resource as AdminResource>::RESOURCE_NAME_SINGULAR)
            )]
            pub async fn delete_handler(
                State(state): State<AppState>,
                Path(id): Path<i32>,
            ) -> Result<StatusCode, ApiError> {
                handlers::delete::<$resource>(&state.db, id).await
            }

            pub fn router() -> OpenApiRouter<AppState> {
                OpenApiRouter::new()
                    .routes(routes!(list_handler, create_handler))
                    .routes(routes!(get_one_handler, update_handler, delete_handler))
            }
        }
    };
}

pub(crate) use admin_api;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::member;

    fn columns() -> Vec<(&'static str, member::Column)> {
        vec![
            ("id", member::Column::Id),
            ("last_name", member::Column::LastName),
        ]
    }

    #[test]
    fn test_parse_sort() {
        let (column, order) = parse_sort(Some(r#"["last_name", "DESC"]"#), &columns()).unwrap();
        assert!(matches!(column, member::Column::LastName));
        assert!(matches!(order, Order::Desc));

        let (_, order) = parse_sort(Some(r#"["id", "asc"]"#), &columns()).unwrap();
        assert!(matches!(order, Order::Asc));
    }

    #[test]
    fn test_parse_sort_falls_back() {
        assert!(parse_sort(None, &columns()).is_none());
        assert!(parse_sort(Some(r#"["password", "ASC"]"#), &columns()).is_none());
        assert!(parse_sort(Some("last_name"), &columns()).is_none());
    }
}
