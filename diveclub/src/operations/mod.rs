//! Per-entity list, detail, create, update and delete operations.
//!
//! Both the HTML views and the admin API go through these functions, so the
//! validation and foreign-key rules are enforced in one place:
//!
//! - payloads are trimmed, then checked with [`Validatable`]
//! - referenced members must exist
//! - member e-mail addresses are unique
//! - deleting a member removes its dives and unassigns its equipment inside a
//!   single transaction

use sea_orm::{ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, SelectorTrait, SqlErr};
use serde::Deserialize;
use serde_with::{NoneAsEmptyString, serde_as};

use crate::{
    entities::member,
    errors::ApiError,
    pagination::{Page, resolve_page},
    validation::{Validatable, ValidationErrors},
};

pub mod dives;
pub mod equipment;
pub mod members;

/// Query string accepted by the list views. Blank values count as absent.
#[serde_as]
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ListQuery {
    /// Case-insensitive substring filter.
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub q: Option<String>,
    /// 1-based page number, or `last`.
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub page: Option<String>,
    /// Exact equipment category; ignored by the other lists.
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default, rename = "type")]
    pub equipment_type: Option<String>,
}

impl ListQuery {
    /// The search text, if one was given.
    #[must_use]
    pub fn search(&self) -> Option<&str> {
        self.q.as_deref().filter(|q| !q.is_empty())
    }

    #[must_use]
    pub fn type_filter(&self) -> Option<&str> {
        self.equipment_type.as_deref().filter(|t| !t.is_empty())
    }
}

/// Fetch one page of an already filtered and ordered query.
///
/// The total is counted first so `last` and out-of-range pages can be
/// resolved before any rows are loaded.
pub(crate) async fn paginate<'db, C, S>(
    db: &'db C,
    select: S,
    raw_page: Option<&str>,
    per_page: u64,
) -> Result<Page<<S::Selector as SelectorTrait>::Item>, ApiError>
where
    C: ConnectionTrait,
    S: PaginatorTrait<'db, C>,
{
    let paginator = select.paginate(db, per_page);
    let total = paginator.num_items().await?;
    let number = resolve_page(raw_page, total, per_page)?;
    let items = paginator.fetch_page(number - 1).await?;

    Ok(Page {
        items,
        number,
        per_page,
        total,
    })
}

/// Trim a text field in place.
pub(crate) fn trim(value: &mut String) {
    let trimmed = value.trim();
    if trimmed.len() != value.len() {
        *value = trimmed.to_string();
    }
}

/// Run payload validation and turn the outcome into an `ApiError`.
pub(crate) fn validate<P: Validatable>(payload: &P) -> Result<(), ApiError> {
    payload.validate().map_err(ApiError::from)
}

/// Ensure `member_id` references an existing member, reporting the failure
/// against `field`.
pub(crate) async fn ensure_member_exists<C>(db: &C, field: &str, member_id: i32) -> Result<member::Model, ApiError>
where
    C: ConnectionTrait,
{
    member::Entity::find_by_id(member_id)
        .one(db)
        .await?
        .ok_or_else(|| {
            ApiError::from(ValidationErrors::single(
                field,
                "Select a valid choice. That choice is not one of the available choices.",
            ))
        })
}

/// Map constraint violations raised by the database while saving onto the
/// form field that caused them.
pub(crate) fn constraint_error(err: DbErr, unique_field: &str, unique_message: &str, fk_field: &str) -> ApiError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            tracing::debug!(%detail, "Unique constraint rejected write");
            ApiError::invalid_field(unique_field, unique_message)
        }
        Some(SqlErr::ForeignKeyConstraintViolation(detail)) => {
            tracing::debug!(%detail, "Foreign key constraint rejected write");
            ApiError::invalid_field(
                fk_field,
                "Select a valid choice. That choice is not one of the available choices.",
            )
        }
        _ => ApiError::from(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_parameters_are_ignored() {
        let query = ListQuery {
            q: Some(String::new()),
            page: None,
            equipment_type: Some(String::new()),
        };
        assert_eq!(query.search(), None);
        assert_eq!(query.type_filter(), None);
    }

    #[test]
    fn test_type_parameter_name() {
        let query: ListQuery = serde_json::from_str(r#"{"q": "Boca", "type": "tank"}"#).unwrap();
        assert_eq!(query.search(), Some("Boca"));
        assert_eq!(query.type_filter(), Some("tank"));
    }

    #[test]
    fn test_empty_strings_deserialize_as_none() {
        let query: ListQuery = serde_json::from_str(r#"{"q": "", "page": ""}"#).unwrap();
        assert_eq!(query.q, None);
        assert_eq!(query.page, None);
    }
}
