//! [`AdminResource`] implementations for members, dives and equipment.
//!
//! Reads are built here so the admin list can sort and page freely; writes go
//! through [`crate::operations`] and share validation with the HTML forms.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    Condition, DatabaseConnection, EntityTrait, JoinType, Order, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait,
    sea_query::{ColumnRef, IntoColumnRef},
};
use serde::Serialize;
use utoipa::ToSchema;

use super::resource::AdminResource;
use crate::{
    entities::{EquipmentType, dive, equipment, member},
    errors::ApiError,
    operations::{
        dives::{self, DivePayload},
        equipment::{self as items, EquipmentPayload},
        members::{self, MemberPayload},
    },
};

fn named(name: &'static str, column: impl IntoColumnRef) -> (&'static str, ColumnRef) {
    (name, column.into_column_ref())
}

fn owner_name(owner: Option<&member::Model>) -> Option<String> {
    owner.map(member::Model::full_name)
}

pub struct MemberAdmin;

#[async_trait]
impl AdminResource for MemberAdmin {
    type Column = member::Column;
    type Row = member::Model;
    type Payload = MemberPayload;

    const RESOURCE_NAME_SINGULAR: &'static str = "member";
    const RESOURCE_NAME_PLURAL: &'static str = "members";
    const RESOURCE_DESCRIPTION: &'static str = "Club members. Deleting a member removes their dives and unassigns their equipment.";
    const ID_COLUMN: Self::Column = member::Column::Id;

    fn list_display() -> &'static [&'static str] {
        &["first_name", "last_name", "email", "certification", "date_joined"]
    }

    fn search_fields() -> Vec<(&'static str, ColumnRef)> {
        vec![
            named("first_name", (member::Entity, member::Column::FirstName)),
            named("last_name", (member::Entity, member::Column::LastName)),
            named("email", (member::Entity, member::Column::Email)),
            named("certification", (member::Entity, member::Column::Certification)),
        ]
    }

    fn list_filter() -> Vec<(&'static str, Self::Column)> {
        vec![
            ("certification", member::Column::Certification),
            ("date_joined", member::Column::DateJoined),
        ]
    }

    fn sortable_columns() -> Vec<(&'static str, Self::Column)> {
        vec![
            ("id", member::Column::Id),
            ("first_name", member::Column::FirstName),
            ("last_name", member::Column::LastName),
            ("email", member::Column::Email),
            ("date_joined", member::Column::DateJoined),
        ]
    }

    fn default_ordering() -> Vec<(Self::Column, Order)> {
        vec![
            (member::Column::LastName, Order::Asc),
            (member::Column::FirstName, Order::Asc),
        ]
    }

    async fn get_all(
        db: &DatabaseConnection,
        condition: Condition,
        ordering: Vec<(Self::Column, Order)>,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Self::Row>, ApiError> {
        let mut select = member::Entity::find().filter(condition);
        for (column, order) in ordering {
            select = select.order_by(column, order);
        }
        Ok(select
            .order_by_asc(member::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(db)
            .await?)
    }

    async fn total_count(db: &DatabaseConnection, condition: Condition) -> Result<u64, ApiError> {
        Ok(member::Entity::find().filter(condition).count(db).await?)
    }

    async fn get_one(db: &DatabaseConnection, id: i32) -> Result<Self::Row, ApiError> {
        members::get(db, id).await
    }

    async fn create(db: &DatabaseConnection, payload: Self::Payload) -> Result<Self::Row, ApiError> {
        members::create(db, payload).await
    }

    async fn update(db: &DatabaseConnection, id: i32, payload: Self::Payload) -> Result<Self::Row, ApiError> {
        members::update(db, id, payload).await
    }

    async fn delete(db: &DatabaseConnection, id: i32) -> Result<(), ApiError> {
        members::delete(db, id).await.map(|_| ())
    }
}

/// A dive as the admin API returns it, with the owner's name inlined.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DiveAdminRow {
    pub id: i32,
    pub member_id: i32,
    /// Full name of the member who logged the dive.
    pub member: Option<String>,
    pub location: String,
    pub date: NaiveDate,
    #[schema(value_type = String, example = "18.50")]
    pub depth: Decimal,
    pub duration: i32,
}

impl From<dives::DiveRow> for DiveAdminRow {
    fn from((dive, owner): dives::DiveRow) -> Self {
        Self {
            id: dive.id,
            member_id: dive.member_id,
            member: owner_name(owner.as_ref()),
            location: dive.location,
            date: dive.date,
            depth: dive.depth,
            duration: dive.duration,
        }
    }
}

pub struct DiveAdmin;

#[async_trait]
impl AdminResource for DiveAdmin {
    type Column = dive::Column;
    type Row = DiveAdminRow;
    type Payload = DivePayload;

    const RESOURCE_NAME_SINGULAR: &'static str = "dive";
    const RESOURCE_NAME_PLURAL: &'static str = "dives";
    const RESOURCE_DESCRIPTION: &'static str = "Logged dives. Every dive belongs to one member.";
    const ID_COLUMN: Self::Column = dive::Column::Id;

    fn list_display() -> &'static [&'static str] {
        &["member", "location", "date", "depth", "duration"]
    }

    fn search_fields() -> Vec<(&'static str, ColumnRef)> {
        vec![
            named("location", (dive::Entity, dive::Column::Location)),
            named("member__first_name", (member::Entity, member::Column::FirstName)),
            named("member__last_name", (member::Entity, member::Column::LastName)),
            named("member__email", (member::Entity, member::Column::Email)),
        ]
    }

    fn list_filter() -> Vec<(&'static str, Self::Column)> {
        vec![
            ("member_id", dive::Column::MemberId),
            ("location", dive::Column::Location),
            ("date", dive::Column::Date),
        ]
    }

    fn sortable_columns() -> Vec<(&'static str, Self::Column)> {
        vec![
            ("id", dive::Column::Id),
            ("date", dive::Column::Date),
            ("location", dive::Column::Location),
            ("depth", dive::Column::Depth),
            ("duration", dive::Column::Duration),
        ]
    }

    fn default_ordering() -> Vec<(Self::Column, Order)> {
        vec![(dive::Column::Date, Order::Desc)]
    }

    async fn get_all(
        db: &DatabaseConnection,
        condition: Condition,
        ordering: Vec<(Self::Column, Order)>,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Self::Row>, ApiError> {
        let mut select = dive::Entity::find().find_also_related(member::Entity).filter(condition);
        for (column, order) in ordering {
            select = select.order_by(column, order);
        }
        let rows = select
            .order_by_desc(dive::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(db)
            .await?;
        Ok(rows.into_iter().map(DiveAdminRow::from).collect())
    }

    async fn total_count(db: &DatabaseConnection, condition: Condition) -> Result<u64, ApiError> {
        Ok(dive::Entity::find()
            .join(JoinType::LeftJoin, dive::Relation::Member.def())
            .filter(condition)
            .count(db)
            .await?)
    }

    async fn get_one(db: &DatabaseConnection, id: i32) -> Result<Self::Row, ApiError> {
        dives::detail(db, id).await.map(DiveAdminRow::from)
    }

    async fn create(db: &DatabaseConnection, payload: Self::Payload) -> Result<Self::Row, ApiError> {
        let dive = dives::create(db, payload).await?;
        Self::get_one(db, dive.id).await
    }

    async fn update(db: &DatabaseConnection, id: i32, payload: Self::Payload) -> Result<Self::Row, ApiError> {
        dives::update(db, id, payload).await?;
        Self::get_one(db, id).await
    }

    async fn delete(db: &DatabaseConnection, id: i32) -> Result<(), ApiError> {
        dives::delete(db, id).await
    }
}

/// An equipment item as the admin API returns it.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EquipmentAdminRow {
    pub id: i32,
    pub name: String,
    pub equipment_type: EquipmentType,
    pub is_functional: bool,
    pub member_id: Option<i32>,
    /// Full name of the assigned member, if any.
    pub member: Option<String>,
}

impl From<items::EquipmentRow> for EquipmentAdminRow {
    fn from((item, owner): items::EquipmentRow) -> Self {
        Self {
            id: item.id,
            name: item.name,
            equipment_type: item.equipment_type,
            is_functional: item.is_functional,
            member_id: item.member_id,
            member: owner_name(owner.as_ref()),
        }
    }
}

pub struct EquipmentAdmin;

#[async_trait]
impl AdminResource for EquipmentAdmin {
    type Column = equipment::Column;
    type Row = EquipmentAdminRow;
    type Payload = EquipmentPayload;

    const RESOURCE_NAME_SINGULAR: &'static str = "equipment";
    const RESOURCE_NAME_PLURAL: &'static str = "equipment";
    const RESOURCE_DESCRIPTION: &'static str = "Club equipment, optionally assigned to a member.";
    const ID_COLUMN: Self::Column = equipment::Column::Id;

    fn list_display() -> &'static [&'static str] {
        &["name", "equipment_type", "is_functional", "member"]
    }

    fn search_fields() -> Vec<(&'static str, ColumnRef)> {
        vec![named("name", (equipment::Entity, equipment::Column::Name))]
    }

    fn list_filter() -> Vec<(&'static str, Self::Column)> {
        vec![
            ("equipment_type", equipment::Column::EquipmentType),
            ("is_functional", equipment::Column::IsFunctional),
            ("member_id", equipment::Column::MemberId),
        ]
    }

    fn sortable_columns() -> Vec<(&'static str, Self::Column)> {
        vec![
            ("id", equipment::Column::Id),
            ("name", equipment::Column::Name),
            ("equipment_type", equipment::Column::EquipmentType),
        ]
    }

    fn default_ordering() -> Vec<(Self::Column, Order)> {
        vec![(equipment::Column::Name, Order::Asc)]
    }

    async fn get_all(
        db: &DatabaseConnection,
        condition: Condition,
        ordering: Vec<(Self::Column, Order)>,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Self::Row>, ApiError> {
        let mut select = equipment::Entity::find()
            .find_also_related(member::Entity)
            .filter(condition);
        for (column, order) in ordering {
            select = select.order_by(column, order);
        }
        let rows = select
            .order_by_asc(equipment::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(db)
            .await?;
        Ok(rows.into_iter().map(EquipmentAdminRow::from).collect())
    }

    async fn total_count(db: &DatabaseConnection, condition: Condition) -> Result<u64, ApiError> {
        Ok(equipment::Entity::find().filter(condition).count(db).await?)
    }

    async fn get_one(db: &DatabaseConnection, id: i32) -> Result<Self::Row, ApiError> {
        items::detail(db, id).await.map(EquipmentAdminRow::from)
    }

    async fn create(db: &DatabaseConnection, payload: Self::Payload) -> Result<Self::Row, ApiError> {
        let item = items::create(db, payload).await?;
        Self::get_one(db, item.id).await
    }

    async fn update(db: &DatabaseConnection, id: i32, payload: Self::Payload) -> Result<Self::Row, ApiError> {
        items::update(db, id, payload).await?;
        Self::get_one(db, id).await
    }

    async fn delete(db: &DatabaseConnection, id: i32) -> Result<(), ApiError> {
        items::delete(db, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_members() {
        let info = MemberAdmin::describe();
        assert_eq!(info.name, "members");
        assert_eq!(info.endpoint, "/admin/api/members");
        assert!(info.search_fields.contains(&"email"));
        assert!(info.list_filter.contains(&"certification"));
    }

    #[test]
    fn test_dive_search_reaches_member_columns() {
        let names: Vec<_> = DiveAdmin::search_fields().into_iter().map(|(name, _)| name).collect();
        assert_eq!(
            names,
            vec!["location", "member__first_name", "member__last_name", "member__email"]
        );
    }

    #[test]
    fn test_dive_row_inlines_owner_name() {
        let dive = dive::Model {
            id: 7,
            member_id: 2,
            location: "Jadransko more".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
            depth: Decimal::new(1850, 2),
            duration: 45,
        };
        let owner = member::Model {
            id: 2,
            first_name: "Ana".to_string(),
            last_name: "Kovač".to_string(),
            email: "ana@klub.hr".to_string(),
            date_joined: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            certification: "Advanced".to_string(),
        };
        let row = DiveAdminRow::from((dive, Some(owner)));
        assert_eq!(row.member.as_deref(), Some("Ana Kovač"));
        assert_eq!(row.member_id, 2);
    }

    #[test]
    fn test_unassigned_equipment_has_no_member() {
        let item = equipment::Model {
            id: 1,
            name: "Boca 12l".to_string(),
            equipment_type: EquipmentType::Tank,
            is_functional: true,
            member_id: None,
        };
        let row = EquipmentAdminRow::from((item, None));
        assert_eq!(row.member, None);
        assert_eq!(row.equipment_type, EquipmentType::Tank);
    }
}
