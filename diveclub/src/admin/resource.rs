use async_trait::async_trait;
use sea_orm::{ColumnTrait, Condition, DatabaseConnection, Order, sea_query::ColumnRef};
use serde::{Serialize, de::DeserializeOwned};
use utoipa::ToSchema;

use crate::errors::ApiError;

/// Per-entity configuration and storage access for the admin console.
///
/// The generic handlers in [`super::handlers`] only talk to this trait;
/// everything entity specific (joins, validation, cascade rules) lives in the
/// implementations, which delegate writes to [`crate::operations`].
#[async_trait]
pub trait AdminResource: Send + Sync + 'static {
    type Column: ColumnTrait + Copy + Send + Sync + 'static;
    /// Serialized list and detail representation.
    type Row: Serialize + ToSchema + Send;
    /// Create and full-replacement update body.
    type Payload: DeserializeOwned + ToSchema + Send + 'static;

    const RESOURCE_NAME_SINGULAR: &'static str;
    const RESOURCE_NAME_PLURAL: &'static str;
    const RESOURCE_DESCRIPTION: &'static str = "";
    const ID_COLUMN: Self::Column;

    /// Fields shown as columns in the record browser.
    fn list_display() -> &'static [&'static str];

    /// Columns matched by `filter={"q": ...}`, possibly on joined tables.
    fn search_fields() -> Vec<(&'static str, ColumnRef)>;

    /// Columns that accept an exact-match filter.
    fn list_filter() -> Vec<(&'static str, Self::Column)>;

    #[must_use]
    fn sortable_columns() -> Vec<(&'static str, Self::Column)> {
        vec![("id", Self::ID_COLUMN)]
    }

    /// Ordering used when the request does not ask for one.
    fn default_ordering() -> Vec<(Self::Column, Order)>;

    async fn get_all(
        db: &DatabaseConnection,
        condition: Condition,
        ordering: Vec<(Self::Column, Order)>,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Self::Row>, ApiError>;

    async fn total_count(db: &DatabaseConnection, condition: Condition) -> Result<u64, ApiError>;

    async fn get_one(db: &DatabaseConnection, id: i32) -> Result<Self::Row, ApiError>;

    async fn create(db: &DatabaseConnection, payload: Self::Payload) -> Result<Self::Row, ApiError>;

    async fn update(db: &DatabaseConnection, id: i32, payload: Self::Payload) -> Result<Self::Row, ApiError>;

    async fn delete(db: &DatabaseConnection, id: i32) -> Result<(), ApiError>;

    /// Configuration summary for the console index.
    #[must_use]
    fn describe() -> ResourceInfo {
        ResourceInfo {
            name: Self::RESOURCE_NAME_PLURAL,
            singular: Self::RESOURCE_NAME_SINGULAR,
            description: Self::RESOURCE_DESCRIPTION,
            endpoint: format!("/admin/api/{}", Self::RESOURCE_NAME_PLURAL),
            list_display: Self::list_display().to_vec(),
            search_fields: Self::search_fields().into_iter().map(|(name, _)| name).collect(),
            list_filter: Self::list_filter().into_iter().map(|(name, _)| name).collect(),
            sortable: Self::sortable_columns().into_iter().map(|(name, _)| name).collect(),
        }
    }
}

/// One entry of the admin index.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ResourceInfo {
    pub name: &'static str,
    pub singular: &'static str,
    pub description: &'static str,
    pub endpoint: String,
    pub list_display: Vec<&'static str>,
    pub search_fields: Vec<&'static str>,
    pub list_filter: Vec<&'static str>,
    pub sortable: Vec<&'static str>,
}
