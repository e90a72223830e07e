//! Collection entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A named grouping of sellable variants sharing a catalog type.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "collection")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(indexed)]
    pub type_id: String,

    pub name: String,

    /// Arabic display name.
    #[sea_orm(nullable)]
    pub name_ar: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,

    /// Collections are never deleted, only deactivated.
    #[sea_orm(default_value = true)]
    pub is_active: bool,

    #[sea_orm(default_value = 0)]
    pub sort_order: i32,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::catalog_type::Entity",
        from = "Column::TypeId",
        to = "super::catalog_type::Column::Id",
        on_delete = "Restrict"
    )]
    CatalogType,
    #[sea_orm(has_many = "super::variant::Entity")]
    Variant,
    #[sea_orm(has_many = "super::subject::Entity")]
    Subject,
}

impl Related<super::catalog_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CatalogType.def()
    }
}

impl Related<super::variant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Variant.def()
    }
}

impl Related<super::subject::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subject.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
