use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, DatabaseConnection, EntityTrait,
    IntoActiveModel, ModelTrait, QueryFilter, QueryOrder, TransactionTrait,
    sea_query::{ColumnRef, Expr, IntoColumnRef},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{ListQuery, constraint_error, paginate, trim, validate};
use crate::{
    entities::{dive, equipment, member},
    errors::ApiError,
    filtering::search_condition,
    pagination::Page,
    validation::{Validatable, ValidationErrors, validators},
};

const DUPLICATE_EMAIL: &str = "Member with this Email already exists.";

/// Editable member fields. `date_joined` is set on insert and never changes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct MemberPayload {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub certification: String,
}

impl MemberPayload {
    fn normalized(mut self) -> Self {
        trim(&mut self.first_name);
        trim(&mut self.last_name);
        trim(&mut self.email);
        trim(&mut self.certification);
        self
    }
}

impl From<&member::Model> for MemberPayload {
    fn from(model: &member::Model) -> Self {
        Self {
            first_name: model.first_name.clone(),
            last_name: model.last_name.clone(),
            email: model.email.clone(),
            certification: model.certification.clone(),
        }
    }
}

impl Validatable for MemberPayload {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        for (field, value) in [
            ("first_name", &self.first_name),
            ("last_name", &self.last_name),
            ("certification", &self.certification),
        ] {
            if let Err(error) = validators::validate_required(field, value) {
                errors.add(error);
            } else {
                errors.check(validators::validate_max_length(field, value, 100));
            }
        }

        if let Err(error) = validators::validate_required("email", &self.email) {
            errors.add(error);
        } else {
            errors.check(validators::validate_email("email", &self.email));
        }
        errors.result()
    }
}

/// A member together with everything it owns.
#[derive(Debug, Clone)]
pub struct MemberDetail {
    pub member: member::Model,
    pub dives: Vec<dive::Model>,
    pub equipment: Vec<equipment::Model>,
}

/// Columns matched by the `q` parameter.
#[must_use]
pub fn search_fields() -> Vec<ColumnRef> {
    [
        member::Column::FirstName,
        member::Column::LastName,
        member::Column::Email,
        member::Column::Certification,
    ]
    .into_iter()
    .map(|column| (member::Entity, column).into_column_ref())
    .collect()
}

/// Members ordered by last name, then first name.
///
/// # Errors
///
/// Returns a not-found error for an invalid page and a database error if the
/// query fails.
pub async fn list(
    db: &DatabaseConnection,
    query: &ListQuery,
    per_page: u64,
) -> Result<Page<member::Model>, ApiError> {
    let mut select = member::Entity::find()
        .order_by_asc(member::Column::LastName)
        .order_by_asc(member::Column::FirstName)
        .order_by_asc(member::Column::Id);

    if let Some(condition) = query.search().and_then(|q| search_condition(q, &search_fields())) {
        select = select.filter(condition);
    }

    paginate(db, select, query.page.as_deref(), per_page).await
}

/// All members in list order, for owner drop-downs.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn choices(db: &DatabaseConnection) -> Result<Vec<member::Model>, ApiError> {
    Ok(member::Entity::find()
        .order_by_asc(member::Column::LastName)
        .order_by_asc(member::Column::FirstName)
        .order_by_asc(member::Column::Id)
        .all(db)
        .await?)
}

/// # Errors
///
/// Returns a not-found error if no member has this id.
pub async fn get(db: &DatabaseConnection, id: i32) -> Result<member::Model, ApiError> {
    member::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ApiError::not_found("Member", Some(id.to_string())))
}

/// Load a member with its dives (newest first) and equipment (by name).
///
/// # Errors
///
/// Returns a not-found error if no member has this id.
pub async fn detail(db: &DatabaseConnection, id: i32) -> Result<MemberDetail, ApiError> {
    let member = get(db, id).await?;
    let dives = member
        .find_related(dive::Entity)
        .order_by_desc(dive::Column::Date)
        .order_by_desc(dive::Column::Id)
        .all(db)
        .await?;
    let equipment = member
        .find_related(equipment::Entity)
        .order_by_asc(equipment::Column::Name)
        .order_by_asc(equipment::Column::Id)
        .all(db)
        .await?;

    Ok(MemberDetail {
        member,
        dives,
        equipment,
    })
}

async fn ensure_email_free(db: &DatabaseConnection, email: &str, except: Option<i32>) -> Result<(), ApiError> {
    let mut condition = Condition::all().add(member::Column::Email.eq(email));
    if let Some(id) = except {
        condition = condition.add(member::Column::Id.ne(id));
    }

    if member::Entity::find().filter(condition).one(db).await?.is_some() {
        return Err(ApiError::invalid_field("email", DUPLICATE_EMAIL));
    }
    Ok(())
}

/// Validate and insert a new member.
///
/// # Errors
///
/// Returns a validation error for invalid fields or an e-mail address that is
/// already in use.
pub async fn create(db: &DatabaseConnection, payload: MemberPayload) -> Result<member::Model, ApiError> {
    let payload = payload.normalized();
    validate(&payload)?;
    ensure_email_free(db, &payload.email, None).await?;

    let active = member::ActiveModel {
        first_name: Set(payload.first_name),
        last_name: Set(payload.last_name),
        email: Set(payload.email),
        certification: Set(payload.certification),
        ..Default::default()
    };
    let model = active
        .insert(db)
        .await
        .map_err(|err| constraint_error(err, "email", DUPLICATE_EMAIL, "email"))?;

    tracing::info!(id = model.id, email = %model.email, "Created member");
    Ok(model)
}

/// Replace the editable fields of an existing member.
///
/// # Errors
///
/// Returns a not-found error for an unknown id, otherwise the same errors as
/// [`create`].
pub async fn update(db: &DatabaseConnection, id: i32, payload: MemberPayload) -> Result<member::Model, ApiError> {
    let existing = get(db, id).await?;
    let payload = payload.normalized();
    validate(&payload)?;
    ensure_email_free(db, &payload.email, Some(id)).await?;

    let mut active = existing.into_active_model();
    active.first_name = Set(payload.first_name);
    active.last_name = Set(payload.last_name);
    active.email = Set(payload.email);
    active.certification = Set(payload.certification);

    let model = active
        .update(db)
        .await
        .map_err(|err| constraint_error(err, "email", DUPLICATE_EMAIL, "email"))?;

    tracing::info!(id = model.id, "Updated member");
    Ok(model)
}

/// Delete a member, its dives, and its claim on any equipment.
///
/// Everything happens in one transaction; equipment rows survive with no
/// owner.
///
/// # Errors
///
/// Returns a not-found error for an unknown id.
pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<member::Model, ApiError> {
    let txn = db.begin().await?;

    let member = member::Entity::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or_else(|| ApiError::not_found("Member", Some(id.to_string())))?;

    let dives = dive::Entity::delete_many()
        .filter(dive::Column::MemberId.eq(id))
        .exec(&txn)
        .await?;
    let released = equipment::Entity::update_many()
        .col_expr(equipment::Column::MemberId, Expr::value(None::<i32>))
        .filter(equipment::Column::MemberId.eq(id))
        .exec(&txn)
        .await?;
    let result = member::Entity::delete_by_id(id).exec(&txn).await?;
    if result.rows_affected == 0 {
        return Err(ApiError::not_found("Member", Some(id.to_string())));
    }

    txn.commit().await?;

    tracing::info!(
        id,
        dives_deleted = dives.rows_affected,
        equipment_released = released.rows_affected,
        "Deleted member"
    );
    Ok(member)
}
