use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder,
    sea_query::{ColumnRef, IntoColumnRef},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{ListQuery, constraint_error, ensure_member_exists, paginate, trim};
use crate::{
    entities::{dive, member},
    errors::ApiError,
    filtering::search_condition,
    pagination::Page,
    validation::{Validatable, ValidationErrors, validators},
};

/// A dive joined with the member who logged it.
pub type DiveRow = (dive::Model, Option<member::Model>);

/// Editable dive fields.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct DivePayload {
    pub member_id: i32,
    pub location: String,
    pub date: NaiveDate,
    /// Metres, at most 5 digits with 2 decimal places.
    #[schema(value_type = String, example = "18.50")]
    pub depth: Decimal,
    /// Minutes.
    pub duration: i32,
}

impl Validatable for DivePayload {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Err(error) = validators::validate_required("location", &self.location) {
            errors.add(error);
        } else {
            errors.check(validators::validate_max_length("location", &self.location, 200));
        }
        errors.check(validators::validate_decimal_digits("depth", self.depth, 5, 2));
        errors.check(validators::validate_positive("duration", i64::from(self.duration)));
        errors.result()
    }
}

/// Columns matched by the `q` parameter, including the owner's name and
/// e-mail.
#[must_use]
pub fn search_fields() -> Vec<ColumnRef> {
    vec![
        (dive::Entity, dive::Column::Location).into_column_ref(),
        (member::Entity, member::Column::FirstName).into_column_ref(),
        (member::Entity, member::Column::LastName).into_column_ref(),
        (member::Entity, member::Column::Email).into_column_ref(),
    ]
}

/// Dives with their owners, newest first.
///
/// # Errors
///
/// Returns a not-found error for an invalid page and a database error if the
/// query fails.
pub async fn list(db: &DatabaseConnection, query: &ListQuery, per_page: u64) -> Result<Page<DiveRow>, ApiError> {
    let mut select = dive::Entity::find()
        .find_also_related(member::Entity)
        .order_by_desc(dive::Column::Date)
        .order_by_desc(dive::Column::Id);

    if let Some(condition) = query.search().and_then(|q| search_condition(q, &search_fields())) {
        select = select.filter(condition);
    }

    paginate(db, select, query.page.as_deref(), per_page).await
}

/// # Errors
///
/// Returns a not-found error if no dive has this id.
pub async fn get(db: &DatabaseConnection, id: i32) -> Result<dive::Model, ApiError> {
    dive::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ApiError::not_found("Dive", Some(id.to_string())))
}

/// # Errors
///
/// Returns a not-found error if no dive has this id.
pub async fn detail(db: &DatabaseConnection, id: i32) -> Result<DiveRow, ApiError> {
    dive::Entity::find_by_id(id)
        .find_also_related(member::Entity)
        .one(db)
        .await?
        .ok_or_else(|| ApiError::not_found("Dive", Some(id.to_string())))
}

async fn prepare(db: &DatabaseConnection, mut payload: DivePayload) -> Result<DivePayload, ApiError> {
    trim(&mut payload.location);

    let mut errors = payload.validate().err().unwrap_or_default();
    match ensure_member_exists(db, "member", payload.member_id).await {
        Ok(_) => {}
        Err(ApiError::ValidationFailed { errors: missing }) => errors.extend(missing),
        Err(other) => return Err(other),
    }
    errors.result()?;
    Ok(payload)
}

/// Validate and insert a new dive.
///
/// # Errors
///
/// Returns a validation error for invalid fields or an unknown member.
pub async fn create(db: &DatabaseConnection, payload: DivePayload) -> Result<dive::Model, ApiError> {
    let payload = prepare(db, payload).await?;

    let active = dive::ActiveModel {
        member_id: Set(payload.member_id),
        location: Set(payload.location),
        date: Set(payload.date),
        depth: Set(payload.depth),
        duration: Set(payload.duration),
        ..Default::default()
    };
    let model = active
        .insert(db)
        .await
        .map_err(|err| constraint_error(err, "member", "Invalid dive.", "member"))?;

    tracing::info!(id = model.id, member_id = model.member_id, "Logged dive");
    Ok(model)
}

/// Replace every editable field of an existing dive.
///
/// # Errors
///
/// Returns a not-found error for an unknown id, otherwise the same errors as
/// [`create`].
pub async fn update(db: &DatabaseConnection, id: i32, payload: DivePayload) -> Result<dive::Model, ApiError> {
    let existing = get(db, id).await?;
    let payload = prepare(db, payload).await?;

    let mut active = existing.into_active_model();
    active.member_id = Set(payload.member_id);
    active.location = Set(payload.location);
    active.date = Set(payload.date);
    active.depth = Set(payload.depth);
    active.duration = Set(payload.duration);

    let model = active
        .update(db)
        .await
        .map_err(|err| constraint_error(err, "member", "Invalid dive.", "member"))?;

    tracing::info!(id = model.id, "Updated dive");
    Ok(model)
}

/// # Errors
///
/// Returns a not-found error if no dive has this id.
pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<(), ApiError> {
    let result = dive::Entity::delete_by_id(id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(ApiError::not_found("Dive", Some(id.to_string())));
    }
    tracing::info!(id, "Deleted dive");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn payload() -> DivePayload {
        DivePayload {
            member_id: 1,
            location: "Jadransko more".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            depth: Decimal::from_str("18.50").unwrap(),
            duration: 45,
        }
    }

    #[test]
    fn test_valid_payload() {
        assert!(payload().validate().is_ok());
    }

    #[test]
    fn test_duration_must_be_positive() {
        let zero = DivePayload {
            duration: 0,
            ..payload()
        };
        let errors = zero.validate().unwrap_err();
        assert!(errors.has_field("duration"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_depth_precision() {
        let too_precise = DivePayload {
            depth: Decimal::from_str("18.555").unwrap(),
            ..payload()
        };
        assert!(too_precise.validate().unwrap_err().has_field("depth"));
    }

    #[test]
    fn test_location_limits() {
        let blank = DivePayload {
            location: String::new(),
            ..payload()
        };
        assert!(blank.validate().unwrap_err().has_field("location"));

        let long = DivePayload {
            location: "x".repeat(201),
            ..payload()
        };
        assert!(long.validate().unwrap_err().has_field("location"));
    }
}
