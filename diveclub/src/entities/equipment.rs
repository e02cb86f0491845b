use sea_orm::{DeriveActiveEnum, entity::prelude::*, sea_query::StringLen};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use utoipa::ToSchema;

/// The fixed set of equipment categories the club tracks.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(50))")]
#[serde(rename_all = "lowercase")]
pub enum EquipmentType {
    #[sea_orm(string_value = "tank")]
    Tank,
    #[sea_orm(string_value = "fins")]
    Fins,
    #[sea_orm(string_value = "suit")]
    Suit,
    #[sea_orm(string_value = "mask")]
    Mask,
}

impl EquipmentType {
    pub const ALL: [Self; 4] = [Self::Tank, Self::Fins, Self::Suit, Self::Mask];

    /// Stored value, also used as the `type` query parameter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tank => "tank",
            Self::Fins => "fins",
            Self::Suit => "suit",
            Self::Mask => "mask",
        }
    }

    /// Human readable label shown in forms and tables.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Tank => "Boca",
            Self::Fins => "Peraje",
            Self::Suit => "Odijelo",
            Self::Mask => "Maska",
        }
    }
}

impl fmt::Display for EquipmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownEquipmentType(pub String);

impl fmt::Display for UnknownEquipmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown equipment type '{}'", self.0)
    }
}

impl std::error::Error for UnknownEquipmentType {}

impl FromStr for EquipmentType {
    type Err = UnknownEquipmentType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownEquipmentType(s.to_string()))
    }
}

/// A club asset, optionally assigned to a member.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "equipment")]
#[schema(as = Equipment)]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub equipment_type: EquipmentType,
    pub is_functional: bool,
    /// Cleared, not cascaded, when the owning member is deleted.
    pub member_id: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::member::Entity",
        from = "Column::MemberId",
        to = "super::member::Column::Id",
        on_update = "Cascade",
        on_delete = "SetNull"
    )]
    Member,
}

impl Related<super::member::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Member.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_types() {
        assert_eq!("tank".parse::<EquipmentType>(), Ok(EquipmentType::Tank));
        assert_eq!("mask".parse::<EquipmentType>(), Ok(EquipmentType::Mask));
    }

    #[test]
    fn test_parse_is_exact_match() {
        assert!("Tank".parse::<EquipmentType>().is_err());
        assert!("boat".parse::<EquipmentType>().is_err());
        assert!("".parse::<EquipmentType>().is_err());
    }

    #[test]
    fn test_stored_value_matches_active_enum() {
        for kind in EquipmentType::ALL {
            assert_eq!(kind.to_value(), kind.as_str());
        }
    }

    #[test]
    fn test_labels() {
        assert_eq!(EquipmentType::Fins.to_string(), "Peraje");
        assert_eq!(EquipmentType::Suit.label(), "Odijelo");
    }
}
