use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    QueryFilter, QueryOrder,
    sea_query::{ColumnRef, IntoColumnRef},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{ListQuery, constraint_error, ensure_member_exists, paginate, trim};
use crate::{
    entities::{EquipmentType, equipment, member},
    errors::ApiError,
    filtering::search_condition,
    pagination::Page,
    validation::{Validatable, ValidationErrors, validators},
};

/// An equipment item joined with its owner, if any.
pub type EquipmentRow = (equipment::Model, Option<member::Model>);

const fn functional_by_default() -> bool {
    true
}

/// Editable equipment fields.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct EquipmentPayload {
    pub name: String,
    pub equipment_type: EquipmentType,
    #[serde(default = "functional_by_default")]
    pub is_functional: bool,
    /// Owning member; `null` leaves the item unassigned.
    #[serde(default)]
    pub member_id: Option<i32>,
}

impl Validatable for EquipmentPayload {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Err(error) = validators::validate_required("name", &self.name) {
            errors.add(error);
        } else {
            errors.check(validators::validate_max_length("name", &self.name, 100));
        }
        errors.result()
    }
}

#[must_use]
pub fn search_fields() -> Vec<ColumnRef> {
    vec![(equipment::Entity, equipment::Column::Name).into_column_ref()]
}

/// Equipment ordered by name.
///
/// `type` is an exact match on the stored category and is applied together
/// with `q`. A value outside the known categories matches nothing.
///
/// # Errors
///
/// Returns a not-found error for an invalid page and a database error if the
/// query fails.
pub async fn list(
    db: &DatabaseConnection,
    query: &ListQuery,
    per_page: u64,
) -> Result<Page<EquipmentRow>, ApiError> {
    let mut select = equipment::Entity::find()
        .find_also_related(member::Entity)
        .order_by_asc(equipment::Column::Name)
        .order_by_asc(equipment::Column::Id);

    if let Some(condition) = query.search().and_then(|q| search_condition(q, &search_fields())) {
        select = select.filter(condition);
    }
    if let Some(kind) = query.type_filter() {
        select = select.filter(equipment::Column::EquipmentType.eq(kind));
    }

    paginate(db, select, query.page.as_deref(), per_page).await
}

/// # Errors
///
/// Returns a not-found error if no equipment has this id.
pub async fn get(db: &DatabaseConnection, id: i32) -> Result<equipment::Model, ApiError> {
    equipment::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ApiError::not_found("Equipment", Some(id.to_string())))
}

/// # Errors
///
/// Returns a not-found error if no equipment has this id.
pub async fn detail(db: &DatabaseConnection, id: i32) -> Result<EquipmentRow, ApiError> {
    equipment::Entity::find_by_id(id)
        .find_also_related(member::Entity)
        .one(db)
        .await?
        .ok_or_else(|| ApiError::not_found("Equipment", Some(id.to_string())))
}

async fn prepare(db: &DatabaseConnection, mut payload: EquipmentPayload) -> Result<EquipmentPayload, ApiError> {
    trim(&mut payload.name);

    let mut errors = payload.validate().err().unwrap_or_default();
    if let Some(member_id) = payload.member_id {
        match ensure_member_exists(db, "member", member_id).await {
            Ok(_) => {}
            Err(ApiError::ValidationFailed { errors: missing }) => errors.extend(missing),
            Err(other) => return Err(other),
        }
    }
    errors.result()?;
    Ok(payload)
}

/// Validate and insert a new equipment item.
///
/// # Errors
///
/// Returns a validation error for invalid fields or an unknown member.
pub async fn create(db: &DatabaseConnection, payload: EquipmentPayload) -> Result<equipment::Model, ApiError> {
    let payload = prepare(db, payload).await?;

    let active = equipment::ActiveModel {
        name: Set(payload.name),
        equipment_type: Set(payload.equipment_type),
        is_functional: Set(payload.is_functional),
        member_id: Set(payload.member_id),
        ..Default::default()
    };
    let model = active
        .insert(db)
        .await
        .map_err(|err| constraint_error(err, "name", "Invalid equipment.", "member"))?;

    tracing::info!(id = model.id, kind = model.equipment_type.as_str(), "Added equipment");
    Ok(model)
}

/// Replace every editable field of an existing equipment item.
///
/// # Errors
///
/// Returns a not-found error for an unknown id, otherwise the same errors as
/// [`create`].
pub async fn update(
    db: &DatabaseConnection,
    id: i32,
    payload: EquipmentPayload,
) -> Result<equipment::Model, ApiError> {
    let existing = get(db, id).await?;
    let payload = prepare(db, payload).await?;

    let mut active = existing.into_active_model();
    active.name = Set(payload.name);
    active.equipment_type = Set(payload.equipment_type);
    active.is_functional = Set(payload.is_functional);
    active.member_id = Set(payload.member_id);

    let model = active
        .update(db)
        .await
        .map_err(|err| constraint_error(err, "name", "Invalid equipment.", "member"))?;

    tracing::info!(id = model.id, "Updated equipment");
    Ok(model)
}

/// # Errors
///
/// Returns a not-found error if no equipment has this id.
pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<(), ApiError> {
    let result = equipment::Entity::delete_by_id(id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(ApiError::not_found("Equipment", Some(id.to_string())));
    }
    tracing::info!(id, "Deleted equipment");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_defaults() {
        let payload: EquipmentPayload =
            serde_json::from_str(r#"{"name": "Oprema 1", "equipment_type": "fins"}"#).unwrap();
        assert!(payload.is_functional);
        assert_eq!(payload.member_id, None);
        assert_eq!(payload.equipment_type, EquipmentType::Fins);
    }

    #[test]
    fn test_rejects_unknown_type() {
        let result =
            serde_json::from_str::<EquipmentPayload>(r#"{"name": "Oprema 1", "equipment_type": "boat"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_name_is_required() {
        let payload = EquipmentPayload {
            name: "  ".to_string(),
            equipment_type: EquipmentType::Tank,
            is_functional: true,
            member_id: None,
        };
        assert!(payload.validate().unwrap_err().has_field("name"));
    }
}
