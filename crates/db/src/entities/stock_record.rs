//! Stock record entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Inventory counters for exactly one variant.
///
/// Counters are not checked for sign or for `reserved <= available`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "stock_record")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(unique)]
    pub variant_id: String,

    #[sea_orm(default_value = 0)]
    pub available: i32,

    #[sea_orm(default_value = 0)]
    pub reserved: i32,

    #[sea_orm(default_value = 0)]
    pub reorder_point: i32,

    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::variant::Entity",
        from = "Column::VariantId",
        to = "super::variant::Column::Id",
        on_delete = "Cascade"
    )]
    Variant,
}

impl Related<super::variant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Variant.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
